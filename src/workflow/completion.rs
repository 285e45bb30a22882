//! 提交完成与重做的协作接口
//!
//! 引擎只负责算分，持久化和跨测验的重做策略都交给宿主

use serde::Serialize;

use crate::models::answer::AnswerRecord;
use crate::models::score::ScoreResult;

/// 每次提交后交给宿主的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionDetails {
    pub score: ScoreResult,
    /// 作答记录（选项索引为展示顺序）
    pub answers: AnswerRecord,
    /// 作答记录（选项索引映射回测验定义中的原始顺序）
    pub original_answers: AnswerRecord,
    /// 第几次提交（从1开始）
    pub attempt: u32,
}

impl CompletionDetails {
    pub fn passed(&self) -> bool {
        self.score.passed()
    }
}

/// 提交完成回调：`(是否通过, 结果详情)`
pub type CompletionCallback = Box<dyn FnMut(bool, &CompletionDetails)>;

/// 重做方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryAction {
    /// 清空全部作答，重新开始
    #[default]
    ResetAll,
    /// 只重做答错的题目，答对的题目保留并锁定
    RetryFailedOnly,
    /// 宿主自行处理，会话保持已提交状态
    Handled,
}

/// 宿主注入的重做处理器
pub trait RetryHandler {
    /// # 参数
    /// - `result`: 最近一次提交的得分
    /// - `answers`: 最近一次提交的作答（展示顺序）
    fn on_retry(&mut self, result: &ScoreResult, answers: &AnswerRecord) -> RetryAction;
}

impl<F> RetryHandler for F
where
    F: FnMut(&ScoreResult, &AnswerRecord) -> RetryAction,
{
    fn on_retry(&mut self, result: &ScoreResult, answers: &AnswerRecord) -> RetryAction {
        self(result, answers)
    }
}
