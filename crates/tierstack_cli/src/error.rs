//! CLI-level errors that map to dedicated exit codes.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Template validation failed with {0} error(s)")]
    ValidationFailed(usize),

    #[error("Template is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Refusing to overwrite existing file: {0} (use --force)")]
    AlreadyExists(PathBuf),
}
