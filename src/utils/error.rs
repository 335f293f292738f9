use thiserror::Error;

#[derive(Error, Debug)]
pub enum OdictError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration validation error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Usage,
    Configuration,
    Io,
    Processing,
}

impl OdictError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            OdictError::InvalidArgument { .. } | OdictError::PatternError(_) => ErrorCategory::Usage,
            OdictError::TomlError(_)
            | OdictError::ConfigValidationError { .. }
            | OdictError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            OdictError::IoError(_) | OdictError::SerializationError(_) => ErrorCategory::Io,
            OdictError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            OdictError::InvalidArgument { .. } => {
                "Pass a list of values, e.g. values = [\"www.example.com\"]"
            }
            OdictError::PatternError(_) => "Check the regular expression syntax",
            OdictError::IoError(_) => "Check that the file exists and is readable",
            OdictError::SerializationError(_) => {
                "Snapshots must be a JSON array of [key, value] pairs"
            }
            OdictError::TomlError(_)
            | OdictError::ConfigValidationError { .. }
            | OdictError::InvalidConfigValueError { .. } => "Review the rules file",
            OdictError::ProcessingError { .. } => "Inspect the input snapshot and the assertions",
        }
    }

    /// Process exit status for the `odict` binary.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Processing => 1,
            ErrorCategory::Usage => 2,
            ErrorCategory::Configuration => 3,
            ErrorCategory::Io => 4,
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        OdictError::InvalidArgument {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OdictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(
            OdictError::invalid_argument("scalar").category(),
            ErrorCategory::Usage
        );
        assert_eq!(
            OdictError::ConfigValidationError {
                field: "rules[0].pattern".to_string(),
                message: "bad".to_string(),
            }
            .category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_exit_codes_follow_category() {
        assert_eq!(OdictError::invalid_argument("scalar").exit_code(), 2);
        assert_eq!(
            OdictError::InvalidConfigValueError {
                field: "rules[0].values".to_string(),
                value: "x".to_string(),
                reason: "scalar".to_string(),
            }
            .exit_code(),
            3
        );
        assert_eq!(
            OdictError::IoError(std::io::Error::from(std::io::ErrorKind::NotFound)).exit_code(),
            4
        );
        assert_eq!(
            OdictError::ProcessingError {
                message: "assertion".to_string()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_pattern_error_is_propagated_unchanged() {
        let err = regex::Regex::new("(").unwrap_err();
        let expected = err.to_string();
        let wrapped: OdictError = err.into();
        assert_eq!(wrapped.to_string(), format!("Pattern error: {}", expected));
    }
}
