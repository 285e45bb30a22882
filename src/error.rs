use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 测验定义不合法
    #[error("测验定义错误: {0}")]
    Definition(#[from] DefinitionError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 测验定义错误
///
/// 在加载测验时一次性检查，合法的测验才能进入会话。
/// `question` 为题目索引（从0开始）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// 测验没有任何题目
    #[error("测验 '{title}' 没有题目")]
    EmptyQuiz { title: String },
    /// 选择题没有选项
    #[error("题目 {question}: 选项列表为空")]
    NoOptions { question: usize },
    /// 选择题没有正确选项
    #[error("题目 {question}: 至少需要一个正确选项")]
    NoCorrectOption { question: usize },
    /// 正确选项索引越界
    #[error("题目 {question}: 正确选项索引 {index} 超出范围 [0, {len})")]
    OptionIndexOutOfRange {
        question: usize,
        index: usize,
        len: usize,
    },
    /// 简答题没有可接受答案
    #[error("题目 {question}: 可接受答案列表为空")]
    NoAcceptedAnswers { question: usize },
    /// 连线题左右两侧数量不一致
    #[error("题目 {question}: 左侧 {left} 项与右侧 {right} 项数量不一致")]
    SidesMismatch {
        question: usize,
        left: usize,
        right: usize,
    },
    /// 连线题没有任何条目
    #[error("题目 {question}: 连线题没有条目")]
    EmptyMatch { question: usize },
    /// 连线配对索引越界
    #[error("题目 {question}: 配对 ({left}, {right}) 超出范围")]
    PairOutOfRange {
        question: usize,
        left: usize,
        right: usize,
    },
    /// 连线配对不是完美匹配
    #[error("题目 {question}: 正确配对不是一一对应（{reason}）")]
    NotPerfectMatching { question: usize, reason: String },
}

/// 被拒绝的用户操作
///
/// 这些都不是程序错误，调用方可以直接忽略（等同于空操作）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputRejected {
    /// 已提交，答案已冻结
    #[error("测验已提交，答案已冻结")]
    Frozen,
    /// 测验尚未提交
    #[error("测验尚未提交")]
    NotSubmitted,
    /// 题目索引不存在
    #[error("题目 {question} 不存在")]
    UnknownQuestion { question: usize },
    /// 答案类型与题型不符
    #[error("题目 {question}: 答案类型与题型 {kind} 不符")]
    KindMismatch { question: usize, kind: &'static str },
    /// 重做时只开放答错的题目
    #[error("题目 {question} 已答对，重做时不可修改")]
    QuestionLocked { question: usize },
    /// 全部答对，没有可重做的题目
    #[error("全部答对，无需重做")]
    NothingToRetry,
    /// 还有题目未作答
    #[error("还有 {} 道题未作答", .missing.len())]
    Incomplete { missing: Vec<usize> },
    /// 左侧条目已被使用
    #[error("左侧条目 {left} 已在配对中")]
    LeftAlreadyPaired { left: usize },
    /// 右侧条目已被使用
    #[error("右侧条目 {right} 已在配对中")]
    RightAlreadyPaired { right: usize },
    /// 配对索引越界
    #[error("配对 ({left}, {right}) 超出范围")]
    PairOutOfRange { left: usize, right: usize },
    /// 配对位置不存在
    #[error("配对位置 {position} 不存在")]
    UnknownPair { position: usize },
    /// 没有正在拖动的条目
    #[error("没有正在拖动的条目")]
    NoDragInProgress,
    /// 答案中的选项索引越界
    #[error("题目 {question}: 选项索引 {index} 超出范围")]
    OptionOutOfRange { question: usize, index: usize },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 不支持的文件格式
    #[error("不支持的文件格式: {path}")]
    UnsupportedFormat { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: String::new(),
            source: err,
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: err,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
