//! Error types for the template model.

use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while assembling or serializing a template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Duplicate {section} name: {name}")]
    DuplicateKey { section: &'static str, name: String },

    #[error("Invalid logical name: '{0}' (must be non-empty and alphanumeric)")]
    InvalidName(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialized template is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
