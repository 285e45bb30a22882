use serde::{Deserialize, Serialize};

use crate::models::answer::CandidateAnswer;

/// 单题批改结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_index: usize,
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_answer: Option<CandidateAnswer>,
    pub correct_answer: CandidateAnswer,
}

/// 一次提交的得分
///
/// 每次提交都会生成新的结果，不做持久化
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub correct_count: usize,
    pub total: usize,
    pub per_question: Vec<QuestionOutcome>,
}

impl ScoreResult {
    pub fn from_outcomes(per_question: Vec<QuestionOutcome>) -> Self {
        Self {
            correct_count: per_question.iter().filter(|o| o.correct).count(),
            total: per_question.len(),
            per_question,
        }
    }

    /// 全部答对才算通过
    pub fn passed(&self) -> bool {
        self.correct_count == self.total
    }

    /// 答错的题目索引
    pub fn failed_indices(&self) -> Vec<usize> {
        self.per_question
            .iter()
            .filter(|o| !o.correct)
            .map(|o| o.question_index)
            .collect()
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct_count as f64 * 100.0 / self.total as f64
    }
}

impl std::fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} ({:.0}%)",
            self.correct_count,
            self.total,
            self.percentage()
        )
    }
}
