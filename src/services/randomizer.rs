//! 选项打乱 - 业务能力层
//!
//! 只打乱 mcq / msq 的选项顺序，并同步改写正确选项索引。
//! 连线题保持原顺序，其他题型原样返回

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::answer::CandidateAnswer;
use crate::models::question::{ChoiceQuestion, Question};

/// 展示顺序与原始顺序之间的双射
///
/// `to_original[display] = original`，`to_display[original] = display`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPermutation {
    to_original: Vec<usize>,
    to_display: Vec<usize>,
}

impl DisplayPermutation {
    pub fn identity(len: usize) -> Self {
        Self {
            to_original: (0..len).collect(),
            to_display: (0..len).collect(),
        }
    }

    /// 生成均匀随机排列（inside-out Fisher–Yates）
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut to_original: Vec<usize> = Vec::with_capacity(len);
        for i in 0..len {
            let j = rng.gen_range(0..=i);
            if j == i {
                to_original.push(i);
            } else {
                to_original.push(to_original[j]);
                to_original[j] = i;
            }
        }
        Self::from_order(to_original)
    }

    fn from_order(to_original: Vec<usize>) -> Self {
        let mut to_display = vec![0; to_original.len()];
        for (display, &original) in to_original.iter().enumerate() {
            to_display[original] = display;
        }
        Self {
            to_original,
            to_display,
        }
    }

    pub fn len(&self) -> usize {
        self.to_original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_original.is_empty()
    }

    pub fn is_identity(&self) -> bool {
        self.to_original.iter().enumerate().all(|(i, &o)| i == o)
    }

    /// 展示位置 → 原始索引
    pub fn original_index(&self, display: usize) -> Option<usize> {
        self.to_original.get(display).copied()
    }

    /// 原始索引 → 展示位置
    pub fn display_index(&self, original: usize) -> Option<usize> {
        self.to_display.get(original).copied()
    }

    /// 展示顺序（每个展示位置对应的原始索引）
    pub fn order(&self) -> &[usize] {
        &self.to_original
    }

    /// 把展示顺序下的选择题作答映射回原始索引
    ///
    /// 越界索引原样保留，校验时自然判错
    pub fn answer_to_original(&self, answer: &CandidateAnswer) -> CandidateAnswer {
        match answer {
            CandidateAnswer::Choices(chosen) => CandidateAnswer::Choices(
                chosen
                    .iter()
                    .map(|&d| self.original_index(d).unwrap_or(d))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// 把原始索引下的选择题作答映射到展示顺序
    pub fn answer_to_display(&self, answer: &CandidateAnswer) -> CandidateAnswer {
        match answer {
            CandidateAnswer::Choices(chosen) => CandidateAnswer::Choices(
                chosen
                    .iter()
                    .map(|&o| self.display_index(o).unwrap_or(o))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

/// 打乱后的题目视图
#[derive(Debug, Clone, PartialEq)]
pub struct RandomizedQuestion {
    pub question: Question,
    /// 只有选择题才有排列
    pub permutation: Option<DisplayPermutation>,
}

/// 打乱单个题目的选项
///
/// 调用方需保证题目已通过校验（正确索引不越界）
pub fn randomize<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> RandomizedQuestion {
    match question {
        Question::Mcq(q) => {
            let (shuffled, permutation) = shuffle_choice(q, rng);
            RandomizedQuestion {
                question: Question::Mcq(shuffled),
                permutation: Some(permutation),
            }
        }
        Question::Msq(q) => {
            let (shuffled, permutation) = shuffle_choice(q, rng);
            RandomizedQuestion {
                question: Question::Msq(shuffled),
                permutation: Some(permutation),
            }
        }
        Question::TrueFalse(_) | Question::Short(_) | Question::Match(_) => RandomizedQuestion {
            question: question.clone(),
            permutation: None,
        },
    }
}

/// 不打乱，只为选择题生成恒等排列
pub fn keep_order(question: &Question) -> RandomizedQuestion {
    let permutation = match question {
        Question::Mcq(q) | Question::Msq(q) => Some(DisplayPermutation::identity(q.options.len())),
        _ => None,
    };
    RandomizedQuestion {
        question: question.clone(),
        permutation,
    }
}

fn shuffle_choice<R: Rng + ?Sized>(
    question: &ChoiceQuestion,
    rng: &mut R,
) -> (ChoiceQuestion, DisplayPermutation) {
    let permutation = DisplayPermutation::random(question.options.len(), rng);
    let options = permutation
        .order()
        .iter()
        .map(|&original| question.options[original].clone())
        .collect();
    let correct = question
        .correct
        .iter()
        .filter_map(|&original| permutation.display_index(original))
        .collect();

    (
        ChoiceQuestion {
            text: question.text.clone(),
            options,
            correct,
        },
        permutation,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{MatchQuestion, TrueFalseQuestion};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn correct_texts(question: &Question) -> BTreeSet<String> {
        match question {
            Question::Mcq(q) | Question::Msq(q) => {
                q.correct.iter().map(|&i| q.options[i].clone()).collect()
            }
            _ => BTreeSet::new(),
        }
    }

    #[test]
    fn permutation_is_a_bijection() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 0..12 {
            let permutation = DisplayPermutation::random(len, &mut rng);
            let mut seen: Vec<usize> = permutation.order().to_vec();
            seen.sort_unstable();
            assert_eq!(seen, (0..len).collect::<Vec<_>>());
            for display in 0..len {
                let original = permutation.original_index(display).unwrap();
                assert_eq!(permutation.display_index(original), Some(display));
            }
        }
    }

    #[test]
    fn randomizing_keeps_correct_option_texts() {
        let question = Question::Msq(ChoiceQuestion::new(
            "Pick the primes",
            strings(&["2", "4", "5", "6", "7", "9"]),
            [0, 2, 4],
        ));
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let randomized = randomize(&question, &mut rng);
            assert_eq!(correct_texts(&question), correct_texts(&randomized.question));
        }
    }

    #[test]
    fn duplicate_option_text_is_tracked_by_index() {
        let question = Question::Mcq(ChoiceQuestion::new("q", strings(&["same", "same", "other"]), [1]));
        let mut rng = StdRng::seed_from_u64(3);
        let randomized = randomize(&question, &mut rng);
        let permutation = randomized.permutation.unwrap();
        let Question::Mcq(view) = &randomized.question else {
            panic!("kind changed");
        };
        let display = *view.correct.iter().next().unwrap();
        assert_eq!(permutation.original_index(display), Some(1));
    }

    #[test]
    fn tiny_option_lists_are_identity() {
        let mut rng = StdRng::seed_from_u64(11);
        assert!(DisplayPermutation::random(0, &mut rng).is_identity());
        assert!(DisplayPermutation::random(1, &mut rng).is_identity());
    }

    #[test]
    fn shuffle_reaches_every_position() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut first_positions = BTreeSet::new();
        for _ in 0..200 {
            let permutation = DisplayPermutation::random(4, &mut rng);
            first_positions.insert(permutation.order()[0]);
        }
        assert_eq!(first_positions.len(), 4);
    }

    #[test]
    fn other_kinds_are_untouched() {
        let mut rng = StdRng::seed_from_u64(5);
        let tf = Question::TrueFalse(TrueFalseQuestion {
            text: "t".into(),
            correct: false,
        });
        let pairing = Question::Match(MatchQuestion::new(
            "",
            strings(&["a", "b", "c"]),
            strings(&["x", "y", "z"]),
            [(0, 2), (1, 0), (2, 1)],
        ));
        for question in [tf, pairing] {
            let randomized = randomize(&question, &mut rng);
            assert_eq!(randomized.question, question);
            assert!(randomized.permutation.is_none());
        }
    }

    #[test]
    fn answers_map_between_orders() {
        let permutation = DisplayPermutation::from_order(vec![2, 0, 1]);
        let display = CandidateAnswer::choices([0]);
        assert_eq!(permutation.answer_to_original(&display), CandidateAnswer::choices([2]));
        assert_eq!(
            permutation.answer_to_display(&CandidateAnswer::choices([2])),
            display
        );
        assert_eq!(
            permutation.answer_to_original(&CandidateAnswer::Bool(true)),
            CandidateAnswer::Bool(true)
        );
    }
}
