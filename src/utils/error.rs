use crate::markup::selector::SelectorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid selector: {0}")]
    InvalidSelector(#[from] SelectorError),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Parsing,
    Validation,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a failed run. Never zero.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::SerializationError(_) => ErrorCategory::Serialization,
            EtlError::InvalidSelector(_) => ErrorCategory::Parsing,
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 讀寫失敗多半是路徑或權限問題，可重試
            EtlError::IoError(_) => ErrorSeverity::Medium,
            EtlError::ValidationError { .. }
            | EtlError::InvalidSelector(_)
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            EtlError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::IoError(_) => "Check that the input file exists and the output directory is writable",
            EtlError::SerializationError(_) => "Report the input document; the extracted record could not be encoded",
            EtlError::InvalidSelector(_) => "Fix the selector in the [selectors] section of the config file",
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Correct the reported configuration value"
            }
            EtlError::ValidationError { .. } => {
                "The document does not look like a complete order confirmation; rerun without --strict to inspect the partial record"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::IoError(e) => format!("Could not read or write a file: {}", e),
            EtlError::SerializationError(e) => format!("Could not encode the result: {}", e),
            EtlError::InvalidSelector(e) => format!("A configured selector is invalid: {}", e),
            EtlError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            EtlError::ValidationError { message } => {
                format!("The extracted order is incomplete: {}", message)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_error_converts() {
        let err: EtlError = SelectorError::Empty.into();
        assert_eq!(err.category(), ErrorCategory::Parsing);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_exit_codes() {
        let io = EtlError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.severity().exit_code(), 2);

        let validation = EtlError::ValidationError {
            message: "no trip".to_string(),
        };
        assert_eq!(validation.severity().exit_code(), 1);
        assert!(validation.user_friendly_message().contains("no trip"));
    }

    #[test]
    fn test_every_failure_exits_nonzero() {
        let errors = [
            EtlError::IoError(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")),
            EtlError::InvalidSelector(SelectorError::Empty),
            EtlError::ConfigValidationError {
                field: "pipeline.name".to_string(),
                message: "empty".to_string(),
            },
            EtlError::ValidationError {
                message: "no trip".to_string(),
            },
        ];
        for err in &errors {
            assert_ne!(err.severity().exit_code(), 0, "{}", err);
        }
        assert_eq!(ErrorSeverity::Critical.exit_code(), 3);
    }

    #[test]
    fn test_config_value_message_names_field() {
        let err = EtlError::InvalidConfigValueError {
            field: "source.input_path".to_string(),
            value: String::new(),
            reason: "Path cannot be empty".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.user_friendly_message().contains("source.input_path"));
    }
}
