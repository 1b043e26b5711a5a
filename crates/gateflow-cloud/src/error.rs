//! Cloud resource graph error types

use thiserror::Error;

/// Resource graph and engine handoff errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Resource declared twice: {0}")]
    DuplicateResource(String),

    #[error("Resource '{resource}' references undeclared resource '{reference}'")]
    UnresolvedReference { resource: String, reference: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("No lookup available for resource type: {0}")]
    UnsupportedLookup(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Program file error: {0}")]
    ProgramError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
