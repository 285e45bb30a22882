//! 批量测验批改器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责扫描测验目录并逐个批改。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化日志文件、结果写入服务
//! 2. **批量加载**：扫描并校验所有测验定义（`Vec<QuizFile>`）
//! 3. **逐个批改**：有答题卡的测验交给 quiz_grader，没有的只做校验
//! 4. **全局统计**：汇总所有测验的批改结果

use crate::config::Config;
use crate::models::loaders::{find_answer_sheet, load_all_quizzes, load_answer_sheet, QuizFile};
use crate::orchestrator::quiz_grader::{grade_quiz, GradeOutcome};
use crate::services::ResultWriter;
use crate::utils::logging::{
    append_log_line, init_log_file, log_quizzes_loaded, log_startup, print_final_stats,
};
use anyhow::Result;
use tracing::{error, info, warn};

/// 批改统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GradingStats {
    /// 合法测验总数
    pub total: usize,
    pub graded: usize,
    pub passed: usize,
    pub failed: usize,
    pub incomplete: usize,
    pub without_sheet: usize,
    /// 定义不合法被跳过的文件数
    pub rejected: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    writer: ResultWriter,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        let writer = ResultWriter::with_path(config.results_file.clone());
        Ok(Self { config, writer })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<GradingStats> {
        info!("\n📁 正在扫描测验目录...");
        let loaded = load_all_quizzes(&self.config.quiz_folder).await?;

        for (path, reason) in &loaded.rejected {
            append_log_line(
                &self.config.output_log_file,
                &format!("🚫 {} | {}", path.display(), reason),
            )?;
        }

        let mut stats = GradingStats {
            total: loaded.quizzes.len(),
            rejected: loaded.rejected.len(),
            ..Default::default()
        };
        log_quizzes_loaded(loaded.quizzes.len(), loaded.rejected.len());

        if loaded.quizzes.is_empty() {
            warn!("⚠️ 没有找到可用的测验文件，程序结束");
            print_final_stats(&stats, &self.config.output_log_file);
            return Ok(stats);
        }

        for (index, quiz_file) in loaded.quizzes.into_iter().enumerate() {
            info!("\n{}", "─".repeat(60));
            info!(
                "📄 [{}/{}] {}",
                index + 1,
                stats.total,
                quiz_file.quiz.title
            );
            if let Err(e) = self.process_quiz(quiz_file, &mut stats).await {
                error!("批改失败: {:#}", e);
            }
        }

        print_final_stats(&stats, &self.config.output_log_file);
        Ok(stats)
    }

    /// 处理单个测验
    async fn process_quiz(&self, quiz_file: QuizFile, stats: &mut GradingStats) -> Result<()> {
        let QuizFile { quiz, file_path } = quiz_file;
        let file = file_path.display().to_string();
        let title = quiz.title.clone();

        let Some(sheet_path) = find_answer_sheet(&file_path).await else {
            info!("[测验 {}] 没有答题卡，仅校验定义", title);
            stats.without_sheet += 1;
            append_log_line(
                &self.config.output_log_file,
                &format!("📭 {} | {} | 定义合法，无答题卡", title, file),
            )?;
            return Ok(());
        };

        let sheet = load_answer_sheet(&sheet_path).await?;
        match grade_quiz(quiz, sheet, &self.config)? {
            GradeOutcome::Graded(details) => {
                stats.graded += 1;
                if details.passed() {
                    stats.passed += 1;
                } else {
                    stats.failed += 1;
                }
                self.writer.write(&title, &file, &details)?;
                append_log_line(
                    &self.config.output_log_file,
                    &format!(
                        "{} {} | {} | {}",
                        if details.passed() { "✅" } else { "❌" },
                        title,
                        file,
                        details.score
                    ),
                )?;
            }
            GradeOutcome::Incomplete { missing } => {
                stats.incomplete += 1;
                append_log_line(
                    &self.config.output_log_file,
                    &format!("⏸️ {} | {} | 未作答: {:?}", title, file, missing),
                )?;
            }
        }
        Ok(())
    }
}
