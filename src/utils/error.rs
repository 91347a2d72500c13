use crate::core::shape::ShapeReport;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThoughtError {
    #[error("Shape mismatch: {0}")]
    Shape(ShapeReport),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration parse error in {field}: {message}")]
    ConfigParseError { field: String, message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Evaluation error: {message}")]
    EvaluationError { message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, ThoughtError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Arithmetic,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ThoughtError {
    pub fn exit_code(&self) -> i32 {
        self.severity().exit_code()
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ThoughtError::Shape(_) | ThoughtError::SerializationError(_) => ErrorCategory::Input,
            ThoughtError::ConfigParseError { .. }
            | ThoughtError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ThoughtError::EvaluationError { .. } => ErrorCategory::Arithmetic,
            ThoughtError::ProcessingError { .. } => ErrorCategory::Network,
            ThoughtError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ThoughtError::ProcessingError { .. } => ErrorSeverity::Medium,
            ThoughtError::Shape(_)
            | ThoughtError::EvaluationError { .. }
            | ThoughtError::SerializationError(_)
            | ThoughtError::ConfigParseError { .. }
            | ThoughtError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            ThoughtError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ThoughtError::Shape(report) => format!(
                "Input does not match the thought shape ({} problem(s))",
                report.len()
            ),
            ThoughtError::SerializationError(e) => format!("Input is not valid JSON: {}", e),
            ThoughtError::ConfigParseError { field, .. } => {
                format!("Could not read configuration ({})", field)
            }
            ThoughtError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            ThoughtError::EvaluationError { message } => format!("Cannot evaluate: {}", message),
            ThoughtError::ProcessingError { message } => format!("Connection aborted: {}", message),
            ThoughtError::IoError(e) => format!("I/O failure: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ThoughtError::Shape(_) => {
                "Check digits are 0-13, operators are + - * /, and '=' and '@' are in place"
            }
            ThoughtError::SerializationError(_) => "Pass a JSON object or an array of objects",
            ThoughtError::ConfigParseError { .. } => "Make sure the file exists and is valid TOML",
            ThoughtError::InvalidConfigValueError { .. } => {
                "Fix the listed field in the config file or command line"
            }
            ThoughtError::EvaluationError { .. } => "Use a non-zero right operand for division",
            ThoughtError::ProcessingError { .. } => {
                "Send the action frame before the pending buffer limit is reached"
            }
            ThoughtError::IoError(_) => "Check file paths, permissions and the bind address",
        }
    }
}
