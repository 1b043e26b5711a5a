//! Compute layer: artifact bucket, archive object, functions, invoke grants

use crate::error::{GcpError, Result};
use crate::network::NetworkEdge;
use crate::types;
use gateflow_cloud::{Resource, ResourceGraph, ResourceHandle};
use gateflow_config::StackSettings;
use gateflow_core::{ArtifactLocation, Descriptor};
use serde_json::json;
use std::path::{Path, PathBuf};

pub const INGRESS_SETTINGS: &str = "ALLOW_INTERNAL_AND_GCLB";
pub const EGRESS_SETTINGS: &str = "PRIVATE_RANGES_ONLY";
pub const INVOKER_ROLE: &str = "roles/cloudfunctions.invoker";
pub const INVOKER_MEMBER: &str = "allUsers";

/// A deployed function and its public invoke grant
#[derive(Debug, Clone)]
pub struct DeployedFunction {
    pub function: ResourceHandle,
    pub invoker: ResourceHandle,
}

/// Handles produced by the compute builder
#[derive(Debug, Clone)]
pub struct Compute {
    pub artifact: ArtifactLocation,
    pub bucket: ResourceHandle,
    pub archive: ResourceHandle,
    pub functions: Vec<DeployedFunction>,
}

/// Local archive uploaded as the shared function source
pub fn archive_path(source_dir: &Path, settings: &StackSettings) -> PathBuf {
    source_dir.join(format!("{}.zip", settings.sls_service_name))
}

/// Declare the bucket, archive and one function per descriptor function
pub fn build_compute(
    graph: &mut ResourceGraph,
    settings: &StackSettings,
    descriptor: &Descriptor,
    archive_file: &Path,
    edge: &NetworkEdge,
) -> Result<Compute> {
    let artifact = descriptor.artifact()?;
    let archive_file = std::fs::canonicalize(archive_file)
        .map_err(|_| GcpError::ArchiveNotFound(archive_file.to_path_buf()))?;

    let bucket = graph.declare(
        Resource::new(types::BUCKET, &artifact.bucket)
            .with("name", artifact.bucket.as_str())
            // regional bucket in the stack's region, not the provider's multi-region default
            .with("location", settings.region.to_uppercase()),
    )?;

    let archive = graph.declare(
        Resource::new(types::BUCKET_OBJECT, &artifact.object)
            .with("name", artifact.object.as_str())
            .with_output("bucket", bucket.output("name"))
            .with(
                "source",
                json!({ "fn::fileAsset": archive_file.to_string_lossy() }),
            ),
    )?;

    let prefix = settings.general_prefix();
    let mut functions = Vec::new();

    for entry in descriptor.functions() {
        if let Some(url) = entry.properties.source_archive_url.as_deref() {
            if url != artifact.url() {
                tracing::warn!(
                    function = %entry.name,
                    url,
                    shared = %artifact.url(),
                    "Function declares a different archive, deploying the shared archive"
                );
            }
        }

        let props = &entry.properties;
        let function = graph.declare(
            Resource::new(types::FUNCTION, &entry.name)
                .with("name", entry.name.as_str())
                .with("region", settings.region.as_str())
                .with_opt("runtime", props.runtime.as_deref())
                .with_opt("availableMemoryMb", props.available_memory_mb)
                .with_output("sourceArchiveBucket", bucket.output("name"))
                .with_output("sourceArchiveObject", archive.output("name"))
                .with_opt("entryPoint", props.entry_point.as_deref())
                .with("triggerHttp", true)
                .with_opt("timeout", entry.timeout_seconds()?)
                .with_opt(
                    "environmentVariables",
                    (!props.environment_variables.is_empty())
                        .then(|| json!(props.environment_variables)),
                )
                .with("ingressSettings", INGRESS_SETTINGS)
                .with_output("vpcConnector", edge.connector.output("selfLink"))
                .with("vpcConnectorEgressSettings", EGRESS_SETTINGS)
                .with("labels", json!({ "tag": settings.general_tag_name })),
        )?;

        let invoker = graph.declare(
            Resource::new(
                types::FUNCTION_IAM_MEMBER,
                &format!("{}-{}-invoker", prefix, entry.name.to_lowercase()),
            )
            .with_output("cloudFunction", function.output("name"))
            .with("region", settings.region.as_str())
            .with("role", INVOKER_ROLE)
            .with("member", INVOKER_MEMBER),
        )?;

        tracing::debug!(function = %entry.name, "Function declared");
        functions.push(DeployedFunction { function, invoker });
    }

    Ok(Compute {
        artifact,
        bucket,
        archive,
        functions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::build_network_edge;
    use crate::testing::{descriptor, settings};

    fn compose(archive: &Path) -> (ResourceGraph, Result<Compute>) {
        let settings = settings();
        let mut graph = ResourceGraph::new();
        let edge = build_network_edge(&mut graph, &settings).unwrap();
        let compute = build_compute(&mut graph, &settings, &descriptor(), archive, &edge);
        (graph, compute)
    }

    fn archive_in(dir: &tempfile::TempDir) -> PathBuf {
        let path = archive_path(dir.path(), &settings());
        std::fs::write(&path, b"PK\x05\x06").unwrap();
        path
    }

    #[test]
    fn test_archive_path() {
        assert_eq!(
            archive_path(Path::new("source_code"), &settings()),
            PathBuf::from("source_code/acme-functions.zip")
        );
    }

    #[test]
    fn test_bucket_and_archive() {
        let dir = tempfile::tempdir().unwrap();
        let (graph, compute) = compose(&archive_in(&dir));
        let compute = compute.unwrap();

        assert_eq!(compute.artifact.bucket, "myfuncs-abc123");
        let bucket = graph.get(compute.bucket.name()).unwrap();
        assert_eq!(bucket.properties["name"], json!("myfuncs-abc123"));

        let archive = graph.get(compute.archive.name()).unwrap();
        assert_eq!(
            archive.properties["name"],
            json!("serverless/acme/dev/1700000000/acme.zip")
        );
        assert_eq!(archive.properties["bucket"], json!("${myfuncs-abc123.name}"));
        let asset = archive.properties["source"]["fn::fileAsset"].as_str().unwrap();
        assert!(Path::new(asset).is_absolute());
        assert!(asset.ends_with("acme-functions.zip"));
    }

    #[test]
    fn test_function_properties() {
        let dir = tempfile::tempdir().unwrap();
        let (graph, compute) = compose(&archive_in(&dir));
        assert_eq!(compute.unwrap().functions.len(), 2);

        let users = graph.get("acme-dev-users").unwrap();
        assert_eq!(users.properties["runtime"], json!("nodejs18"));
        assert_eq!(users.properties["availableMemoryMb"], json!(256));
        assert_eq!(users.properties["entryPoint"], json!("users"));
        assert_eq!(users.properties["timeout"], json!(60));
        assert_eq!(users.properties["triggerHttp"], json!(true));
        assert_eq!(
            users.properties["environmentVariables"],
            json!({ "NODE_ENV": "production" })
        );
        assert_eq!(
            users.properties["vpcConnector"],
            json!("${acme-dev-vpcconn.selfLink}")
        );
        assert_eq!(
            users.properties["vpcConnectorEgressSettings"],
            json!("PRIVATE_RANGES_ONLY")
        );
        assert_eq!(users.properties["labels"], json!({ "tag": "acme" }));

        let orders = graph.get("acme-dev-orders").unwrap();
        assert_eq!(orders.properties["timeout"], json!(540));
        assert!(!orders.properties.contains_key("environmentVariables"));
    }

    #[test]
    fn test_environment_variables_are_copied_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_in(&dir);
        let settings = settings();
        let mut descriptor = descriptor();
        let env = &mut descriptor.update.resources[1].properties.environment_variables;
        env.insert("GREETING".to_string(), "hi ${user.name}".to_string());
        env.insert("HOME_DIR".to_string(), "${HOME}".to_string());

        let mut graph = ResourceGraph::new();
        let edge = build_network_edge(&mut graph, &settings).unwrap();
        build_compute(&mut graph, &settings, &descriptor, &archive, &edge).unwrap();

        let users = graph.get("acme-dev-users").unwrap();
        assert_eq!(
            users.properties["environmentVariables"],
            json!({
                "NODE_ENV": "production",
                "GREETING": "hi $${user.name}",
                "HOME_DIR": "$${HOME}",
            })
        );
        assert!(!users.dependencies().contains(&"user".to_string()));
    }

    #[test]
    fn test_invoker_grant_per_function() {
        let dir = tempfile::tempdir().unwrap();
        let (graph, _) = compose(&archive_in(&dir));

        let grants = graph.by_type(types::FUNCTION_IAM_MEMBER);
        assert_eq!(grants.len(), 2);
        assert_eq!(grants[0].name, "acme-dev-acme-dev-users-invoker");
        assert_eq!(grants[0].properties["role"], json!(INVOKER_ROLE));
        assert_eq!(grants[0].properties["member"], json!("allUsers"));
        assert_eq!(
            grants[0].properties["cloudFunction"],
            json!("${acme-dev-users.name}")
        );
    }

    #[test]
    fn test_missing_archive_file() {
        let dir = tempfile::tempdir().unwrap();
        let (_, compute) = compose(&dir.path().join("missing.zip"));
        assert!(matches!(compute, Err(GcpError::ArchiveNotFound(_))));
    }
}
