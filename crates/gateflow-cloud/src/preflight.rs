//! Preflight checks for pre-existing resources
//!
//! Resources declared with `get` are read by the engine at apply time. Checking
//! them up front turns a late apply failure into an early, local one.

use crate::error::{CloudError, Result};
use crate::graph::ResourceGraph;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Read-only access to a provider's existing resources
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    /// Returns the provider name (e.g., "gcp")
    fn name(&self) -> &str;

    /// Check if the provider tooling is configured and authenticated
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// Whether a resource of the given type and ID exists
    async fn exists(&self, resource_type: &str, id: &str) -> Result<bool>;
}

/// Authentication status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is valid
    pub authenticated: bool,

    /// Account/user information if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}

/// Result of a successful preflight
#[derive(Debug, Clone, Default)]
pub struct PreflightReport {
    /// Account the lookups ran as
    pub account: Option<String>,

    /// `type (id)` of every resource that was found
    pub verified: Vec<String>,
}

/// Verify every `get`-declared resource of the graph exists
///
/// Stops at the first missing resource.
pub async fn preflight(
    graph: &ResourceGraph,
    lookup: &dyn ResourceLookup,
) -> Result<PreflightReport> {
    let auth = lookup.check_auth().await?;
    if !auth.authenticated {
        return Err(CloudError::AuthenticationFailed(
            auth.error.unwrap_or_else(|| lookup.name().to_string()),
        ));
    }

    let mut report = PreflightReport {
        account: auth.account_info,
        verified: Vec::new(),
    };

    for resource in graph.existing() {
        let Some(id) = resource.existing_id.as_deref() else {
            continue;
        };
        let label = format!("{} ({})", resource.resource_type, id);
        tracing::debug!("Looking up {}", label);

        if !lookup.exists(&resource.resource_type, id).await? {
            return Err(CloudError::ResourceNotFound(label));
        }
        report.verified.push(label);
    }

    tracing::info!(verified = report.verified.len(), "Preflight passed");
    Ok(report)
}
