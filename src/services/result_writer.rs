//! 结果写入服务 - 业务能力层
//!
//! 只负责"追加一行批改结果"能力，不关心流程

use anyhow::Result;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::workflow::CompletionDetails;

/// 结果文件中的一行
#[derive(Debug, Serialize)]
pub struct ResultLine<'a> {
    pub timestamp: String,
    pub quiz: &'a str,
    pub file: &'a str,
    pub passed: bool,
    #[serde(flatten)]
    pub details: &'a CompletionDetails,
}

/// 结果写入服务
///
/// 职责：
/// - 把一次提交的结果以 JSON 行追加到结果文件
/// - 只处理单个测验
pub struct ResultWriter {
    results_file_path: String,
}

impl ResultWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            results_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.results_file_path
    }

    /// 写入一次提交结果
    ///
    /// # 参数
    /// - `quiz_title`: 测验标题
    /// - `file`: 测验文件路径
    /// - `details`: 提交结果
    pub fn write(&self, quiz_title: &str, file: &str, details: &CompletionDetails) -> Result<()> {
        debug!(
            "写入结果: 测验 {} | 得分 {} | 第 {} 次",
            quiz_title, details.score, details.attempt
        );

        let line = ResultLine {
            timestamp: chrono::Local::now().to_rfc3339(),
            quiz: quiz_title,
            file,
            passed: details.passed(),
            details,
        };
        let json = serde_json::to_string(&line)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.results_file_path)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }
}

impl Default for ResultWriter {
    fn default() -> Self {
        Self::with_path("quiz_results.jsonl")
    }
}
