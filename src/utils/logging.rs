use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::GradingStats;

/// 初始化 tracing 日志
///
/// 日志级别由 `RUST_LOG` 控制，默认 info。重复调用不会报错
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n测验批改日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 向日志文件追加一行
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(file, "{}", line)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 测验批改模式");
    info!("📁 测验目录: {}", config.quiz_folder);
    info!(
        "🔀 选项打乱: {} (种子: {:?})",
        config.randomize_options, config.shuffle_seed
    );
    info!("{}", "=".repeat(60));
}

/// 记录测验加载信息
///
/// # 参数
/// - `loaded`: 加载成功的测验数
/// - `rejected`: 加载失败的文件数
pub fn log_quizzes_loaded(loaded: usize, rejected: usize) {
    info!("✓ 找到 {} 个可用测验", loaded);
    if rejected > 0 {
        info!("⚠️ {} 个文件未通过校验，已跳过", rejected);
    }
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &GradingStats, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部批改完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📝 已批改: {}/{}", stats.graded, stats.total);
    info!("✅ 通过: {}", stats.passed);
    info!("❌ 未通过: {}", stats.failed);
    info!("⏸️ 答题卡不完整: {}", stats.incomplete);
    info!("📭 无答题卡: {}", stats.without_sheet);
    info!("🚫 定义不合法: {}", stats.rejected);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
