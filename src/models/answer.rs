use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::question::{Question, QuestionKind};

/// 用户作答
///
/// 形状取决于题型：选择题为选项索引集合，判断题为布尔值，
/// 简答题为字符串，连线题为 (左, 右) 配对集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateAnswer {
    Choices(BTreeSet<usize>),
    Pairs(BTreeSet<(usize, usize)>),
    Bool(bool),
    Text(String),
}

impl CandidateAnswer {
    pub fn choices(indices: impl IntoIterator<Item = usize>) -> Self {
        CandidateAnswer::Choices(indices.into_iter().collect())
    }

    pub fn pairs(pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        CandidateAnswer::Pairs(pairs.into_iter().collect())
    }

    pub fn text(text: impl Into<String>) -> Self {
        CandidateAnswer::Text(text.into())
    }

    /// 空集合或空白字符串视为未作答
    pub fn is_empty(&self) -> bool {
        match self {
            CandidateAnswer::Choices(set) => set.is_empty(),
            CandidateAnswer::Pairs(set) => set.is_empty(),
            CandidateAnswer::Bool(_) => false,
            CandidateAnswer::Text(text) => text.trim().is_empty(),
        }
    }

    /// 答案形状是否适用于该题型
    ///
    /// 空数组在反序列化时总是落到 `Choices`，因此连线题也接受空的 `Choices`
    pub fn fits(&self, kind: QuestionKind) -> bool {
        match (self, kind) {
            (CandidateAnswer::Choices(_), QuestionKind::Mcq | QuestionKind::Msq) => true,
            (CandidateAnswer::Choices(set), QuestionKind::Match) => set.is_empty(),
            (CandidateAnswer::Pairs(_), QuestionKind::Match) => true,
            (CandidateAnswer::Bool(_), QuestionKind::TrueFalse) => true,
            (CandidateAnswer::Text(_), QuestionKind::Short) => true,
            _ => false,
        }
    }
}

/// 作答记录：题目索引 → 作答
pub type AnswerRecord = BTreeMap<usize, CandidateAnswer>;

/// 答题卡文件中的单条作答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    /// 题目索引（从0开始）
    pub question: usize,
    pub value: CandidateAnswer,
}

/// 答题卡
///
/// 选项索引按测验文件中的原始顺序给出
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheet {
    #[serde(default)]
    pub answers: Vec<AnswerEntry>,
}

impl AnswerSheet {
    /// 转换为作答记录，同一题出现多次时以最后一次为准
    pub fn into_record(self) -> AnswerRecord {
        self.answers
            .into_iter()
            .map(|entry| (entry.question, entry.value))
            .collect()
    }
}

/// 题目的标准答案（以作答的形状表示）
pub fn correct_answer(question: &Question) -> CandidateAnswer {
    match question {
        Question::Mcq(q) | Question::Msq(q) => CandidateAnswer::Choices(q.correct.clone()),
        Question::TrueFalse(q) => CandidateAnswer::Bool(q.correct),
        Question::Short(q) => CandidateAnswer::Text(q.answers.first().cloned().unwrap_or_default()),
        Question::Match(q) => CandidateAnswer::Pairs(q.correct_pairs.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_sheet_values_pick_the_right_shape() {
        let content = r#"
[[answers]]
question = 0
value = true

[[answers]]
question = 1
value = [2, 0]

[[answers]]
question = 2
value = "  paris "

[[answers]]
question = 3
value = [[1, 1], [0, 0]]
"#;
        let sheet: AnswerSheet = toml::from_str(content).unwrap();
        let record = sheet.into_record();
        assert_eq!(record[&0], CandidateAnswer::Bool(true));
        assert_eq!(record[&1], CandidateAnswer::choices([0, 2]));
        assert_eq!(record[&2], CandidateAnswer::text("  paris "));
        assert_eq!(record[&3], CandidateAnswer::pairs([(0, 0), (1, 1)]));
    }

    #[test]
    fn blank_answers_count_as_empty() {
        assert!(CandidateAnswer::text("   ").is_empty());
        assert!(CandidateAnswer::choices(Vec::new()).is_empty());
        assert!(!CandidateAnswer::Bool(false).is_empty());
    }

    #[test]
    fn shape_must_fit_kind() {
        assert!(CandidateAnswer::Bool(true).fits(QuestionKind::TrueFalse));
        assert!(!CandidateAnswer::Bool(true).fits(QuestionKind::Short));
        assert!(CandidateAnswer::choices([1]).fits(QuestionKind::Msq));
        assert!(!CandidateAnswer::choices([1]).fits(QuestionKind::Match));
        assert!(CandidateAnswer::pairs([(0, 1)]).fits(QuestionKind::Match));
    }

    #[test]
    fn record_serializes_to_json() {
        let mut record = AnswerRecord::new();
        record.insert(0, CandidateAnswer::Bool(true));
        record.insert(1, CandidateAnswer::pairs([(0, 1)]));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"0":true,"1":[[0,1]]}"#);
    }
}
