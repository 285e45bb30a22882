use crate::error::ConfigError;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 测验定义文件存放目录
    pub quiz_folder: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 批改结果文件（每行一个 JSON）
    pub results_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 是否打乱选择题选项
    pub randomize_options: bool,
    /// 固定随机种子（用于复现打乱顺序）
    pub shuffle_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiz_folder: "quizzes".to_string(),
            output_log_file: "quiz_report.txt".to_string(),
            results_file: "quiz_results.jsonl".to_string(),
            verbose_logging: false,
            randomize_options: true,
            shuffle_seed: None,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，无法解析的值回退到默认值
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            quiz_folder: std::env::var("QUIZ_FOLDER").unwrap_or(default.quiz_folder),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            results_file: std::env::var("RESULTS_FILE").unwrap_or(default.results_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            randomize_options: std::env::var("RANDOMIZE_OPTIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.randomize_options),
            shuffle_seed: std::env::var("QUIZ_SHUFFLE_SEED").ok().and_then(|v| v.parse().ok()).or(default.shuffle_seed),
        }
    }

    /// 严格模式：环境变量存在但无法解析时返回错误
    pub fn try_from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            quiz_folder: std::env::var("QUIZ_FOLDER").unwrap_or(default.quiz_folder),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            results_file: std::env::var("RESULTS_FILE").unwrap_or(default.results_file),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(default.verbose_logging),
            randomize_options: parse_env("RANDOMIZE_OPTIONS", "bool")?.unwrap_or(default.randomize_options),
            shuffle_seed: parse_env("QUIZ_SHUFFLE_SEED", "u64")?.or(default.shuffle_seed),
        })
    }
}

fn parse_env<T: std::str::FromStr>(
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_randomizes_without_seed() {
        let config = Config::default();
        assert!(config.randomize_options);
        assert_eq!(config.shuffle_seed, None);
        assert_eq!(config.quiz_folder, "quizzes");
    }

    #[test]
    fn parse_env_rejects_garbage() {
        std::env::set_var("QUIZ_ENGINE_TEST_BAD_SEED", "not-a-number");
        let result: Result<Option<u64>, _> = parse_env("QUIZ_ENGINE_TEST_BAD_SEED", "u64");
        assert!(matches!(
            result,
            Err(ConfigError::EnvVarParseFailed { ref value, .. }) if value == "not-a-number"
        ));
        std::env::remove_var("QUIZ_ENGINE_TEST_BAD_SEED");
    }

    #[test]
    fn parse_env_missing_is_none() {
        let result: Result<Option<bool>, _> = parse_env("QUIZ_ENGINE_TEST_UNSET_VAR", "bool");
        assert_eq!(result, Ok(None));
    }
}
