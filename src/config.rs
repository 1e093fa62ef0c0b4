use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse JSON.
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// One or more required values are absent. Startup refuses to proceed
    /// and names every missing value.
    MissingValues(Vec<String>),
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(
                    f,
                    "failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            Self::ParseJson { path, source } => {
                write!(
                    f,
                    "failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            Self::MissingValues(names) => {
                write!(f, "missing required config values: {}", names.join(", "))
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::MissingValues(_) | Self::Validation(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    telegram_bot_token: String,
    #[serde(default)]
    yandex_folder_id: String,
    #[serde(default)]
    yandex_auth_token: String,
    #[serde(default = "default_model_name")]
    model_name: String,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
    /// Hard cut point for outbound messages (Telegram caps at 4096).
    #[serde(default = "default_max_message_length")]
    max_message_length: usize,
    /// Long-poll window for getUpdates.
    #[serde(default = "default_poll_timeout")]
    poll_timeout_secs: u32,
    /// Per-call timeout for the completion endpoint.
    #[serde(default = "default_request_timeout")]
    request_timeout_secs: u64,
    /// Declared for the deployment surface; the loop itself does not retry.
    #[serde(default = "default_max_retries")]
    max_retries: u32,
    #[serde(default = "default_retry_delay")]
    retry_delay_secs: u64,
    /// Declared for the deployment surface; questions are answered
    /// statelessly, so no cache is kept.
    #[serde(default = "default_cache_size")]
    conversation_cache_size: usize,
    #[serde(default = "default_cache_timeout")]
    conversation_cache_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    log_level: String,
    /// Directory for state files (logs). Defaults to current directory.
    data_dir: Option<String>,
    /// Directory holding the extracted curriculum `.txt` files.
    curriculum_dir: Option<String>,
}

fn default_model_name() -> String {
    "yandexgpt".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_max_message_length() -> usize {
    4000
}

fn default_poll_timeout() -> u32 {
    30
}

fn default_request_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    2
}

fn default_cache_size() -> usize {
    1000
}

fn default_cache_timeout() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

pub struct Config {
    pub telegram_bot_token: String,
    pub yandex_folder_id: String,
    pub yandex_auth_token: String,
    pub model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_message_length: usize,
    pub poll_timeout_secs: u32,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub conversation_cache_size: usize,
    pub conversation_cache_timeout_secs: u64,
    pub log_level: tracing::Level,
    pub data_dir: PathBuf,
    pub curriculum_dir: PathBuf,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadFile {
            path: config_path.clone(),
            source: e,
        })?;
        let file: ConfigFile =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson {
                path: config_path.clone(),
                source: e,
            })?;

        // Collect every missing credential so the operator fixes them in one go.
        let mut missing = Vec::new();
        if file.telegram_bot_token.trim().is_empty() {
            missing.push("telegram_bot_token".to_string());
        }
        if file.yandex_folder_id.trim().is_empty() {
            missing.push("yandex_folder_id".to_string());
        }
        if file.yandex_auth_token.trim().is_empty() {
            missing.push("yandex_auth_token".to_string());
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingValues(missing));
        }

        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = file.telegram_bot_token.split(':').collect();
        if token_parts.len() != 2
            || token_parts[0].parse::<u64>().is_err()
            || token_parts[1].is_empty()
        {
            return Err(ConfigError::Validation(
                "telegram_bot_token appears invalid (expected format: 123456789:ABCdefGHI...)"
                    .into(),
            ));
        }

        if file.max_message_length == 0 {
            return Err(ConfigError::Validation(
                "max_message_length must be greater than zero".into(),
            ));
        }

        let log_level: tracing::Level = file.log_level.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "log_level '{}' is invalid (expected one of: error, warn, info, debug, trace)",
                file.log_level
            ))
        })?;

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let curriculum_dir = file
            .curriculum_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("curriculum"));

        Ok(Self {
            telegram_bot_token: file.telegram_bot_token,
            yandex_folder_id: file.yandex_folder_id,
            yandex_auth_token: file.yandex_auth_token,
            model_name: file.model_name,
            temperature: file.temperature,
            max_tokens: file.max_tokens,
            max_message_length: file.max_message_length,
            poll_timeout_secs: file.poll_timeout_secs,
            request_timeout_secs: file.request_timeout_secs,
            max_retries: file.max_retries,
            retry_delay_secs: file.retry_delay_secs,
            conversation_cache_size: file.conversation_cache_size,
            conversation_cache_timeout_secs: file.conversation_cache_timeout_secs,
            log_level,
            data_dir,
            curriculum_dir,
        })
    }

    /// Startup summary for the log. Secrets are reported as set/unset only.
    pub fn summary(&self) -> String {
        format!(
            "Bot configuration:\n\
             - Telegram token: {}\n\
             - Yandex folder id: {}\n\
             - Yandex auth token: {}\n\
             - Model: {} (temperature {}, max tokens {})\n\
             - Log level: {}\n\
             - Max message length: {}\n\
             - Poll timeout: {}s, request timeout: {}s\n\
             - Retries: {} (delay {}s)\n\
             - Conversation cache: {} entries, {}s timeout (unused)\n\
             - Curriculum dir: {}",
            set_marker(&self.telegram_bot_token),
            set_marker(&self.yandex_folder_id),
            set_marker(&self.yandex_auth_token),
            self.model_name,
            self.temperature,
            self.max_tokens,
            self.log_level,
            self.max_message_length,
            self.poll_timeout_secs,
            self.request_timeout_secs,
            self.max_retries,
            self.retry_delay_secs,
            self.conversation_cache_size,
            self.conversation_cache_timeout_secs,
            self.curriculum_dir.display(),
        )
    }
}

fn set_marker(value: &str) -> &'static str {
    if value.is_empty() { "✗ missing" } else { "✓ set" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn assert_err<T>(result: Result<T, ConfigError>) -> ConfigError {
        match result {
            Ok(_) => panic!("expected error, got Ok"),
            Err(e) => e,
        }
    }

    #[test]
    fn test_valid_config_with_defaults() {
        let file = write_config(
            r#"{
            "telegram_bot_token": "123456789:ABCdefGHIjklMNOpqrsTUVwxyz",
            "yandex_folder_id": "b1gfolder",
            "yandex_auth_token": "secret"
        }"#,
        );
        let config = Config::load(file.path()).expect("should load valid config");
        assert_eq!(config.model_name, "yandexgpt");
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.max_message_length, 4000);
        assert_eq!(config.poll_timeout_secs, 30);
        assert_eq!(config.conversation_cache_size, 1000);
        assert_eq!(config.log_level, tracing::Level::INFO);
        assert_eq!(config.curriculum_dir, PathBuf::from("curriculum"));
    }

    #[test]
    fn test_all_missing_values_reported_together() {
        let file = write_config("{}");
        let err = assert_err(Config::load(file.path()));
        match err {
            ConfigError::MissingValues(names) => {
                assert_eq!(
                    names,
                    vec!["telegram_bot_token", "yandex_folder_id", "yandex_auth_token"]
                );
            }
            other => panic!("expected MissingValues, got {other:?}"),
        }
    }

    #[test]
    fn test_single_missing_value_named() {
        let file = write_config(
            r#"{
            "telegram_bot_token": "123456789:ABCdef",
            "yandex_folder_id": "b1gfolder"
        }"#,
        );
        let err = assert_err(Config::load(file.path()));
        let msg = err.to_string();
        assert!(msg.contains("yandex_auth_token"));
        assert!(!msg.contains("telegram_bot_token"));
    }

    #[test]
    fn test_invalid_token_format() {
        let file = write_config(
            r#"{
            "telegram_bot_token": "notanumber:ABCdef",
            "yandex_folder_id": "b1gfolder",
            "yandex_auth_token": "secret"
        }"#,
        );
        let err = assert_err(Config::load(file.path()));
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_zero_max_message_length_rejected() {
        let file = write_config(
            r#"{
            "telegram_bot_token": "123456789:ABCdef",
            "yandex_folder_id": "b1gfolder",
            "yandex_auth_token": "secret",
            "max_message_length": 0
        }"#,
        );
        let err = assert_err(Config::load(file.path()));
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_overrides_applied() {
        let file = write_config(
            r#"{
            "telegram_bot_token": "123456789:ABCdef",
            "yandex_folder_id": "b1gfolder",
            "yandex_auth_token": "secret",
            "model_name": "yandexgpt-lite",
            "temperature": 0.7,
            "max_message_length": 1000,
            "curriculum_dir": "plans"
        }"#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.model_name, "yandexgpt-lite");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_message_length, 1000);
        assert_eq!(config.curriculum_dir, PathBuf::from("plans"));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let file = write_config(
            r#"{
            "telegram_bot_token": "123456789:ABCdef",
            "yandex_folder_id": "b1gfolder",
            "yandex_auth_token": "secret",
            "log_level": "loud"
        }"#,
        );
        let err = assert_err(Config::load(file.path()));
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn test_log_level_override_parsed() {
        let file = write_config(
            r#"{
            "telegram_bot_token": "123456789:ABCdef",
            "yandex_folder_id": "b1gfolder",
            "yandex_auth_token": "secret",
            "log_level": "debug"
        }"#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_file_not_found() {
        let err = assert_err(Config::load("/nonexistent/path/config.json"));
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_config("{ invalid json }");
        let err = assert_err(Config::load(file.path()));
        assert!(matches!(err, ConfigError::ParseJson { .. }));
    }

    #[test]
    fn test_summary_redacts_secrets() {
        let file = write_config(
            r#"{
            "telegram_bot_token": "123456789:ABCdefGHI",
            "yandex_folder_id": "b1gfolder",
            "yandex_auth_token": "supersecret"
        }"#,
        );
        let config = Config::load(file.path()).unwrap();
        let summary = config.summary();
        assert!(!summary.contains("supersecret"));
        assert!(!summary.contains("ABCdefGHI"));
        assert!(summary.contains("✓ set"));
    }
}
