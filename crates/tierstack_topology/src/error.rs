//! Error types for topology building.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors that can occur while configuring or building the topology.
#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("Template error: {0}")]
    Template(#[from] tierstack_template::TemplateError),

    #[error("Topology config not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
