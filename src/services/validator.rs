//! 答案校验 - 业务能力层
//!
//! 纯函数：题目 + 作答 → 是否正确。不做任何 I/O，不会 panic

use crate::models::answer::CandidateAnswer;
use crate::models::question::Question;

/// 判断作答是否正确
///
/// # 参数
/// - `question`: 题目（打乱后的视图也适用）
/// - `candidate`: 用户作答，`None` 表示未作答
///
/// # 返回
/// 未作答、空作答或答案形状与题型不符时返回 `false`
pub fn validate(question: &Question, candidate: Option<&CandidateAnswer>) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };
    if candidate.is_empty() {
        return false;
    }

    match (question, candidate) {
        (Question::Mcq(q) | Question::Msq(q), CandidateAnswer::Choices(chosen)) => {
            *chosen == q.correct
        }
        (Question::TrueFalse(q), CandidateAnswer::Bool(value)) => *value == q.correct,
        (Question::Short(q), CandidateAnswer::Text(text)) => {
            let given = normalize(text);
            q.answers.iter().any(|accepted| normalize(accepted) == given)
        }
        (Question::Match(q), CandidateAnswer::Pairs(pairs)) => *pairs == q.correct_pairs,
        _ => false,
    }
}

/// 简答题归一化：去掉首尾空白，合并中间空白，转小写
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
