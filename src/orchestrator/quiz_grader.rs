//! 单个测验批改器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责用一份答题卡完成一次测验会话，是测验级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **创建会话**：按配置决定是否打乱选项、是否固定种子
//! 2. **填写答题卡**：答题卡按原始选项顺序给出，经排列映射到展示顺序
//! 3. **提交**：通过完成回调拿到结果详情
//! 4. **统计输出**：记录通过/未通过/答题卡不完整

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::Config;
use crate::models::answer::AnswerSheet;
use crate::models::question::Quiz;
use crate::workflow::{CompletionDetails, QuizSession};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// 单个测验的批改结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeOutcome {
    /// 已提交并算分
    Graded(CompletionDetails),
    /// 答题卡没有覆盖全部题目，无法提交
    Incomplete { missing: Vec<usize> },
}

/// 用答题卡批改一个测验
///
/// # 参数
/// - `quiz`: 已校验的测验
/// - `sheet`: 答题卡（原始选项顺序）
/// - `config`: 配置（打乱与种子）
///
/// # 返回
/// 返回批改结果；答题卡中被拒绝的条目只记录警告
pub fn grade_quiz(quiz: Quiz, sheet: AnswerSheet, config: &Config) -> Result<GradeOutcome> {
    let title = quiz.title.clone();
    let captured: Rc<RefCell<Option<CompletionDetails>>> = Rc::new(RefCell::new(None));
    let sink = captured.clone();

    let mut builder = QuizSession::builder(quiz)
        .randomize(config.randomize_options)
        .on_complete(move |_passed, details| {
            *sink.borrow_mut() = Some(details.clone());
        });
    if let Some(seed) = config.shuffle_seed {
        builder = builder.seed(seed);
    }
    let mut session = builder
        .build()
        .with_context(|| format!("无法创建测验会话: {}", title))?;

    for (index, answer) in sheet.into_record() {
        if let Err(e) = session.set_answer_original(index, answer) {
            warn!("[测验 {}] ⚠️ 题目 {} 的作答被拒绝: {}", title, index, e);
        }
    }

    if !session.can_submit() {
        let missing = session.missing_answers();
        warn!("[测验 {}] ⚠️ 答题卡不完整，未作答: {:?}", title, missing);
        return Ok(GradeOutcome::Incomplete { missing });
    }

    if config.verbose_logging {
        for (index, question) in session.questions().enumerate() {
            info!(
                "[测验 {}]   {}. [{}] {}",
                title,
                index + 1,
                question.kind(),
                crate::utils::logging::truncate_text(question.text(), 40)
            );
        }
    }

    session
        .submit()
        .with_context(|| format!("提交失败: {}", title))?;

    let details = captured
        .borrow_mut()
        .take()
        .context("提交完成但没有收到结果回调")?;
    Ok(GradeOutcome::Graded(details))
}
