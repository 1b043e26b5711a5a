//! gcloud CLI wrapper
//!
//! Read-only lookups of resources that the stack expects to already exist.

use crate::error::{GcpError, Result};
use crate::types;
use async_trait::async_trait;
use gateflow_cloud::{AuthStatus, CloudError, ResourceLookup};
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;

/// Marker gcloud prints on stderr for a missing resource
const NOT_FOUND_MARKERS: [&str; 2] = ["was not found", "HTTPError 404"];

/// gcloud CLI wrapper
pub struct Gcloud {
    project: String,
}

impl Gcloud {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
        }
    }

    /// Run a gcloud command and return stdout
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("gcloud");
        cmd.args(args);
        cmd.arg("--project").arg(&self.project);
        cmd.arg("--format=json");
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: gcloud {} --project {}", args.join(" "), self.project);

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GcpError::GcloudNotFound);
            }
            Err(e) => return Err(e.into()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GcpError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Active credentialed accounts
    pub async fn active_accounts(&self) -> Result<Vec<AccountInfo>> {
        let output = self
            .run_command(&["auth", "list", "--filter=status:ACTIVE"])
            .await?;
        parse_accounts(&output)
    }

    /// `describe` a resource, mapping "not found" to `false`
    async fn describe(&self, args: &[&str]) -> Result<bool> {
        match self.run_command(args).await {
            Ok(_) => Ok(true),
            Err(GcpError::CommandFailed(stderr)) if is_not_found(&stderr) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn network_exists(&self, name: &str) -> Result<bool> {
        self.describe(&["compute", "networks", "describe", name])
            .await
    }

    pub async fn managed_zone_exists(&self, zone: &str) -> Result<bool> {
        self.describe(&["dns", "managed-zones", "describe", zone])
            .await
    }
}

fn is_not_found(stderr: &str) -> bool {
    NOT_FOUND_MARKERS.iter().any(|m| stderr.contains(m))
}

/// Account listed by `gcloud auth list`
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    pub account: String,
    pub status: String,
}

fn parse_accounts(output: &str) -> Result<Vec<AccountInfo>> {
    if output.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(output)?)
}

fn to_cloud_error(e: GcpError) -> CloudError {
    match e {
        GcpError::CloudError(inner) => inner,
        other => CloudError::CommandFailed(other.to_string()),
    }
}

#[async_trait]
impl ResourceLookup for Gcloud {
    fn name(&self) -> &str {
        "gcp"
    }

    async fn check_auth(&self) -> gateflow_cloud::Result<AuthStatus> {
        match self.active_accounts().await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) => Ok(AuthStatus::ok(account.account)),
                None => Ok(AuthStatus::failed(
                    "gcloud にアクティブなアカウントがありません（gcloud auth login を実行してください）",
                )),
            },
            Err(GcpError::GcloudNotFound) => Ok(AuthStatus::failed(
                "gcloud がインストールされていません",
            )),
            Err(e) => Ok(AuthStatus::failed(e.to_string())),
        }
    }

    async fn exists(&self, resource_type: &str, id: &str) -> gateflow_cloud::Result<bool> {
        match resource_type {
            types::NETWORK => self.network_exists(id).await.map_err(to_cloud_error),
            types::MANAGED_ZONE => self.managed_zone_exists(id).await.map_err(to_cloud_error),
            other => Err(CloudError::UnsupportedLookup(other.to_string())),
        }
    }
}
