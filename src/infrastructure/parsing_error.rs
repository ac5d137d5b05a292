//! Parsing error types
//!
//! Page content never produces an error; these cover selector and parser
//! configuration problems only.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigurationError { message: String, field: String },
}

impl ParsingError {
    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn configuration(field: &str, message: &str) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
