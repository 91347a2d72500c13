use crate::utils::error::{Result, ThoughtError};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 12345;
pub const DEFAULT_ACTION_TERMINATOR: &str = r#"{"action": 0}"#;

const MAX_READ_BUFFER_BYTES: usize = 1024 * 1024;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub listener: ListenerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    pub host: String,
    pub port: u16,
    pub read_buffer_bytes: usize,
    /// Upper bound on unanswered bytes held for one connection.
    pub max_pending_bytes: usize,
    /// Every occurrence closes one frame, which is evaluated and answered.
    pub action_terminator: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            read_buffer_bytes: 1024,
            max_pending_bytes: 64 * 1024,
            action_terminator: DEFAULT_ACTION_TERMINATOR.to_string(),
        }
    }
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ServiceConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ThoughtError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ThoughtError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${THOUGHT_PORT})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

impl Validate for ListenerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("listener.host", &self.host)?;
        validate_range(
            "listener.read_buffer_bytes",
            self.read_buffer_bytes,
            1,
            MAX_READ_BUFFER_BYTES,
        )?;
        validate_positive_number(
            "listener.max_pending_bytes",
            self.max_pending_bytes,
            self.read_buffer_bytes,
        )?;
        validate_non_empty_string("listener.action_terminator", &self.action_terminator)?;
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<()> {
        validate_one_of("logging.level", &self.level, &LOG_LEVELS)
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.listener.validate()?;
        self.logging.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[listener]
host = "0.0.0.0"
port = 4000
read_buffer_bytes = 512
max_pending_bytes = 2048
action_terminator = '{"action": 1}'

[logging]
level = "debug"
json = true
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.listener.bind_address(), "0.0.0.0:4000");
        assert_eq!(config.listener.read_buffer_bytes, 512);
        assert_eq!(config.listener.action_terminator, r#"{"action": 1}"#);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config.listener, ListenerConfig::default());
        assert_eq!(config.listener.bind_address(), "localhost:12345");
        assert_eq!(config.listener.action_terminator, DEFAULT_ACTION_TERMINATOR);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_table_keeps_other_defaults() {
        let config = ServiceConfig::from_toml_str("[listener]\nport = 9\n").unwrap();
        assert_eq!(config.listener.port, 9);
        assert_eq!(config.listener.host, DEFAULT_HOST);
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("THOUGHT_SHAPE_TEST_HOST", "10.1.2.3");
        let config =
            ServiceConfig::from_toml_str("[listener]\nhost = \"${THOUGHT_SHAPE_TEST_HOST}\"\n")
                .unwrap();
        assert_eq!(config.listener.host, "10.1.2.3");

        let untouched =
            ServiceConfig::from_toml_str("[listener]\nhost = \"${THOUGHT_SHAPE_UNSET_VAR}\"\n")
                .unwrap();
        assert_eq!(untouched.listener.host, "${THOUGHT_SHAPE_UNSET_VAR}");
    }

    #[test]
    fn test_validation_failures() {
        let mut config = ServiceConfig::default();
        config.listener.max_pending_bytes = 10;
        config.listener.read_buffer_bytes = 100;
        match config.validate() {
            Err(ThoughtError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "listener.max_pending_bytes")
            }
            other => panic!("expected invalid value error, got {other:?}"),
        }

        let mut config = ServiceConfig::default();
        config.listener.read_buffer_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.logging.level = "chatty".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = ServiceConfig::from_toml_str("[listener\nport = ").unwrap_err();
        assert!(matches!(err, ThoughtError::ConfigParseError { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[listener]\nport = 7070").unwrap();
        let config = ServiceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.listener.port, 7070);

        assert!(matches!(
            ServiceConfig::from_file("/definitely/not/here.toml"),
            Err(ThoughtError::IoError(_))
        ));
    }
}
