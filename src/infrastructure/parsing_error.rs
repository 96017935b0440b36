//! Parsing error types for table extraction
//!
//! Selector failures inside the extraction pipeline are soft failures and never
//! surface through this type; it covers configuration, dictionary compilation
//! and validation problems.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Required field '{field}' missing in row {row}")]
    RequiredFieldMissing { field: String, row: usize },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid label pattern for key '{key}': {pattern} - {reason}")]
    InvalidPattern {
        key: String,
        pattern: String,
        reason: String,
    },

    #[error("Invalid dictionary entry for key '{key}': {reason}")]
    InvalidDictionaryEntry { key: String, reason: String },

    #[error("Unknown text encoding label: {label}")]
    UnknownEncoding { label: String },

    #[error("No table layout named '{name}'")]
    UnknownLayout { name: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),
}

impl ParsingError {
    /// Create an invalid selector error from a selector parse failure
    #[must_use]
    pub fn invalid_selector(selector: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a required field missing error for a record position
    #[must_use]
    pub fn required_field_missing(field: &str, row: usize) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            row,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ParsingError::invalid_selector("tr[", "unexpected end of input");
        assert_eq!(
            err.to_string(),
            "Invalid CSS selector: tr[ - unexpected end of input"
        );

        let err = ParsingError::required_field_missing("id", 3);
        assert_eq!(err.to_string(), "Required field 'id' missing in row 3");
    }
}
