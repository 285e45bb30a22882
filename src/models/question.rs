use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppResult, DefinitionError};

/// 测验：有序的题目列表
///
/// 由外部（人工编辑或 AI 生成）创建，引擎只读使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            title: title.into(),
            description: None,
            questions,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 检查测验是否满足所有结构约束
    ///
    /// 只在加载时调用一次，之后的校验和打乱都假定题目合法
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.questions.is_empty() {
            return Err(DefinitionError::EmptyQuiz {
                title: self.title.clone(),
            });
        }
        for (index, question) in self.questions.iter().enumerate() {
            question.validate(index)?;
        }
        Ok(())
    }

    /// 从 JSON 字符串解析并校验测验（AI 生成流程直接交付 JSON）
    pub fn from_json_str(content: &str) -> AppResult<Self> {
        let quiz: Quiz = serde_json::from_str(content)?;
        quiz.validate()?;
        Ok(quiz)
    }

    /// 从 TOML 字符串解析并校验测验
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let quiz: Quiz = toml::from_str(content)?;
        quiz.validate()?;
        Ok(quiz)
    }
}

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    Mcq,
    Msq,
    TrueFalse,
    Short,
    Match,
}

impl QuestionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::Msq => "msq",
            QuestionKind::TrueFalse => "truefalse",
            QuestionKind::Short => "short",
            QuestionKind::Match => "match",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Question {
    /// 单选/多选（按正确选项个数区分）
    Mcq(ChoiceQuestion),
    /// 多选
    Msq(ChoiceQuestion),
    /// 判断题
    #[serde(rename = "truefalse")]
    TrueFalse(TrueFalseQuestion),
    /// 简答题
    Short(ShortQuestion),
    /// 连线题
    Match(MatchQuestion),
}

/// 选择题（mcq / msq 共用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceQuestion {
    pub text: String,
    pub options: Vec<String>,
    /// 正确选项的索引
    pub correct: BTreeSet<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrueFalseQuestion {
    pub text: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortQuestion {
    pub text: String,
    /// 可接受的答案（忽略大小写和多余空白）
    pub answers: Vec<String>,
}

/// 连线题：左侧术语与右侧释义一一对应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchQuestion {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub left: Vec<String>,
    pub right: Vec<String>,
    /// (左侧索引, 右侧索引)
    #[serde(rename = "correctPairs", alias = "correct_pairs")]
    pub correct_pairs: BTreeSet<(usize, usize)>,
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::Mcq(_) => QuestionKind::Mcq,
            Question::Msq(_) => QuestionKind::Msq,
            Question::TrueFalse(_) => QuestionKind::TrueFalse,
            Question::Short(_) => QuestionKind::Short,
            Question::Match(_) => QuestionKind::Match,
        }
    }

    /// 题干
    pub fn text(&self) -> &str {
        match self {
            Question::Mcq(q) | Question::Msq(q) => &q.text,
            Question::TrueFalse(q) => &q.text,
            Question::Short(q) => &q.text,
            Question::Match(q) => &q.text,
        }
    }

    /// 检查单个题目的结构约束
    ///
    /// # 参数
    /// - `index`: 题目在测验中的索引（用于错误信息）
    pub fn validate(&self, index: usize) -> Result<(), DefinitionError> {
        match self {
            Question::Mcq(q) | Question::Msq(q) => q.validate(index),
            Question::TrueFalse(_) => Ok(()),
            Question::Short(q) => {
                if q.answers.iter().all(|a| a.trim().is_empty()) {
                    return Err(DefinitionError::NoAcceptedAnswers { question: index });
                }
                Ok(())
            }
            Question::Match(q) => q.validate(index),
        }
    }
}

impl ChoiceQuestion {
    pub fn new(text: impl Into<String>, options: Vec<String>, correct: impl IntoIterator<Item = usize>) -> Self {
        Self {
            text: text.into(),
            options,
            correct: correct.into_iter().collect(),
        }
    }

    fn validate(&self, index: usize) -> Result<(), DefinitionError> {
        if self.options.is_empty() {
            return Err(DefinitionError::NoOptions { question: index });
        }
        if self.correct.is_empty() {
            return Err(DefinitionError::NoCorrectOption { question: index });
        }
        if let Some(&bad) = self.correct.iter().find(|&&i| i >= self.options.len()) {
            return Err(DefinitionError::OptionIndexOutOfRange {
                question: index,
                index: bad,
                len: self.options.len(),
            });
        }
        Ok(())
    }
}

impl MatchQuestion {
    pub fn new(
        text: impl Into<String>,
        left: Vec<String>,
        right: Vec<String>,
        correct_pairs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        Self {
            text: text.into(),
            left,
            right,
            correct_pairs: correct_pairs.into_iter().collect(),
        }
    }

    fn validate(&self, index: usize) -> Result<(), DefinitionError> {
        if self.left.len() != self.right.len() {
            return Err(DefinitionError::SidesMismatch {
                question: index,
                left: self.left.len(),
                right: self.right.len(),
            });
        }
        if self.left.is_empty() {
            return Err(DefinitionError::EmptyMatch { question: index });
        }

        let mut seen_left = BTreeSet::new();
        let mut seen_right = BTreeSet::new();
        for &(l, r) in &self.correct_pairs {
            if l >= self.left.len() || r >= self.right.len() {
                return Err(DefinitionError::PairOutOfRange {
                    question: index,
                    left: l,
                    right: r,
                });
            }
            if !seen_left.insert(l) {
                return Err(DefinitionError::NotPerfectMatching {
                    question: index,
                    reason: format!("左侧条目 {} 出现多次", l),
                });
            }
            if !seen_right.insert(r) {
                return Err(DefinitionError::NotPerfectMatching {
                    question: index,
                    reason: format!("右侧条目 {} 出现多次", r),
                });
            }
        }

        if self.correct_pairs.len() != self.left.len() {
            return Err(DefinitionError::NotPerfectMatching {
                question: index,
                reason: format!(
                    "共 {} 对，应为 {} 对",
                    self.correct_pairs.len(),
                    self.left.len()
                ),
            });
        }
        Ok(())
    }
}
