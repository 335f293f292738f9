use crate::core::odict::check_replacement;
use crate::utils::error::{OdictError, Result};
use regex::Regex;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(OdictError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(OdictError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(OdictError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_pattern(field_name: &str, pattern: &str) -> Result<()> {
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| OdictError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!("Invalid regular expression: {}", e),
        })
}

pub fn validate_replacement(field_name: &str, pattern: &str, replacement: &str) -> Result<()> {
    let re = Regex::new(pattern).map_err(|e| OdictError::ConfigValidationError {
        field: field_name.to_string(),
        message: format!("Invalid regular expression: {}", e),
    })?;
    check_replacement(&re, replacement).map_err(|e| OdictError::ConfigValidationError {
        field: field_name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input", "headers.json").is_ok());
        assert!(validate_path("input", "").is_err());
        assert!(validate_path("input", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("key", "Host").is_ok());
        assert!(validate_non_empty_string("key", "   ").is_err());
    }

    #[test]
    fn test_validate_pattern() {
        assert!(validate_pattern("pattern", r"^Host: .*$").is_ok());
        assert!(matches!(
            validate_pattern("pattern", "(("),
            Err(OdictError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_validate_replacement() {
        assert!(validate_replacement("replacement", r"(\d+)", "n=$1").is_ok());
        assert!(validate_replacement("replacement", "cost", "$$5").is_ok());
        assert!(matches!(
            validate_replacement("replacement", "cost", "$5"),
            Err(OdictError::ConfigValidationError { .. })
        ));
    }
}
