//! # Quiz Engine
//!
//! 课程测验引擎：选项打乱、作答校验、连线题状态、答题会话
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 测验、题目、作答、得分，以及 TOML / JSON 加载
//! - `Question` - 五种题型的封闭枚举（mcq / msq / truefalse / short / match）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个 Question
//! - `validator` - 作答校验
//! - `randomizer` - 选项打乱与展示排列
//! - `MatchBoard` - 连线题配对状态
//! - `ResultWriter` - 写结果文件能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次答题"的完整流程
//! - `QuizSession` - 作答 → 提交 → 显示答案 / 重做
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_grader` - 批量测验批改
//! - `orchestrator/quiz_grader` - 单个测验批改

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, DefinitionError, InputRejected};
pub use models::{AnswerRecord, CandidateAnswer, Question, QuestionKind, Quiz, ScoreResult};
pub use orchestrator::App;
pub use services::{validate, DisplayPermutation, MatchBoard};
pub use workflow::{load_quiz, CompletionDetails, QuizSession, RetryAction, SessionState};
