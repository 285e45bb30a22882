//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量批改和流程调度，是整个程序的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_grader` - 批量测验批改器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载测验（Vec<QuizFile>）
//! - 查找并加载答题卡
//! - 输出全局统计信息
//!
//! ### `quiz_grader` - 单个测验批改器
//! - 为单个测验创建会话
//! - 按答题卡作答并提交
//!
//! ## 层次关系
//!
//! ```text
//! batch_grader (处理 Vec<QuizFile>)
//!     ↓
//! quiz_grader (处理单个 Quiz + AnswerSheet)
//!     ↓
//! workflow::QuizSession (一次答题)
//!     ↓
//! services (能力层：validator / randomizer / match_board)
//! ```

pub mod batch_grader;
pub mod quiz_grader;

// 重新导出主要类型
pub use batch_grader::{App, GradingStats};
pub use quiz_grader::{grade_quiz, GradeOutcome};
