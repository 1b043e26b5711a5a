//! GCP builder error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GcpError {
    #[error("gcloud not found. Please install the Google Cloud CLI: https://cloud.google.com/sdk/docs/install")]
    GcloudNotFound,

    #[error("gcloud command failed: {0}")]
    CommandFailed(String),

    #[error(
        "No routable functions in the deployment descriptor: every entry is storage-typed, so the URL map has no default service"
    )]
    NoDefaultBackend,

    #[error("No certificate declared for domain: {0}")]
    CertificateNotFound(String),

    #[error("Function archive not found: {0}")]
    ArchiveNotFound(PathBuf),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Descriptor(#[from] gateflow_core::DescriptorError),

    #[error(transparent)]
    Config(#[from] gateflow_config::ConfigError),

    #[error("Cloud error: {0}")]
    CloudError(#[from] gateflow_cloud::CloudError),
}

pub type Result<T> = std::result::Result<T, GcpError>;
