use crate::error::FileError;
use crate::models::answer::AnswerSheet;
use crate::models::question::Quiz;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 测验文件格式（按扩展名判断）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Some(FileFormat::Toml),
            Some("json") => Some(FileFormat::Json),
            _ => None,
        }
    }
}

/// 已加载的测验及其来源文件
#[derive(Debug, Clone)]
pub struct QuizFile {
    pub quiz: Quiz,
    pub file_path: PathBuf,
}

/// 批量加载结果
#[derive(Debug, Default)]
pub struct LoadedQuizzes {
    pub quizzes: Vec<QuizFile>,
    /// 加载或校验失败的文件及原因
    pub rejected: Vec<(PathBuf, String)>,
}

async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let display = path.display().to_string();
    let format = FileFormat::from_path(path).ok_or_else(|| FileError::UnsupportedFormat {
        path: display.clone(),
    })?;

    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(FileError::NotFound { path: display }.into());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: display.clone(),
            source,
        })?;

    let document = match format {
        FileFormat::Toml => toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
            path: display,
            source,
        })?,
        FileFormat::Json => {
            serde_json::from_str(&content).map_err(|source| FileError::JsonParseFailed {
                path: display,
                source,
            })?
        }
    };
    Ok(document)
}

/// 从 TOML / JSON 文件加载测验并校验
pub async fn load_quiz_file(path: &Path) -> Result<Quiz> {
    let quiz: Quiz = read_document(path).await?;
    quiz.validate()
        .with_context(|| format!("测验定义不合法: {}", path.display()))?;
    Ok(quiz)
}

/// 加载答题卡
pub async fn load_answer_sheet(path: &Path) -> Result<AnswerSheet> {
    read_document(path).await
}

/// 是否为答题卡文件（`xxx.answers.toml` / `xxx.answers.json`）
pub fn is_answer_sheet(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| stem.ends_with(".answers"))
        .unwrap_or(false)
}

/// 查找测验文件旁边的答题卡
pub async fn find_answer_sheet(quiz_path: &Path) -> Option<PathBuf> {
    let stem = quiz_path.file_stem()?.to_str()?;
    let folder = quiz_path.parent().unwrap_or_else(|| Path::new("."));
    for ext in ["toml", "json"] {
        let candidate = folder.join(format!("{}.answers.{}", stem, ext));
        if fs::try_exists(&candidate).await.unwrap_or(false) {
            return Some(candidate);
        }
    }
    None
}

/// 从文件夹中加载所有测验
///
/// 单个文件失败只记录警告，不影响其他文件
pub async fn load_all_quizzes(folder_path: &str) -> Result<LoadedQuizzes> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if FileFormat::from_path(&path).is_some() && !is_answer_sheet(&path) {
            paths.push(path);
        }
    }
    // 目录遍历顺序不确定，排序保证批改顺序稳定
    paths.sort();

    let mut loaded = LoadedQuizzes::default();
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_quiz_file(&path).await {
            Ok(quiz) => {
                tracing::info!("成功加载 {} 个题目", quiz.questions.len());
                loaded.quizzes.push(QuizFile {
                    quiz,
                    file_path: path,
                });
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
                loaded.rejected.push((path, format!("{:#}", e)));
            }
        }
    }

    Ok(loaded)
}
