//! Network & edge layer: VPC connector, static address, DNS record, certificate

use crate::error::Result;
use crate::types;
use gateflow_cloud::{Resource, ResourceGraph, ResourceHandle};
use gateflow_config::StackSettings;
use indexmap::IndexMap;
use serde_json::json;

/// TTL of the A record pointing at the load balancer
pub const RECORD_TTL: u32 = 600;

/// Handles produced by the network & edge builder
#[derive(Debug, Clone)]
pub struct NetworkEdge {
    pub network: ResourceHandle,
    pub connector: ResourceHandle,
    pub address: ResourceHandle,
    /// Managed certificate per domain, consumed by the HTTPS proxy
    pub certificates: IndexMap<String, ResourceHandle>,
}

/// "api.acme.dev" → "api-acme-dev"
pub fn dashed(domain: &str) -> String {
    domain.replace('.', "-")
}

/// Declare the network and edge resources
pub fn build_network_edge(graph: &mut ResourceGraph, settings: &StackSettings) -> Result<NetworkEdge> {
    let prefix = settings.general_prefix();

    let network = graph.declare(Resource::existing(
        types::NETWORK,
        &settings.vpc_network,
        &settings.vpc_network,
    ))?;

    let connector_name = format!("{}-vpcconn", prefix);
    let connector = graph.declare(
        Resource::new(types::VPC_CONNECTOR, &connector_name)
            .with("name", connector_name.as_str())
            .with("region", settings.region.as_str())
            .with("ipCidrRange", settings.vpc_connector_range.as_str())
            .with_output("network", network.output("name")),
    )?;

    let address = graph.declare(Resource::new(
        types::GLOBAL_ADDRESS,
        &format!("{}-external-ip-backend", prefix),
    ))?;

    let mut edge = NetworkEdge {
        network,
        connector,
        address,
        certificates: IndexMap::new(),
    };
    create_alias_record(graph, &prefix, &settings.target_domain, &mut edge)?;

    tracing::debug!(
        domains = edge.certificates.len(),
        "Network and edge layer declared"
    );
    Ok(edge)
}

/// Point `domain` at the static address and issue a managed certificate for it
fn create_alias_record(
    graph: &mut ResourceGraph,
    prefix: &str,
    domain: &str,
    edge: &mut NetworkEdge,
) -> Result<()> {
    let zone = graph.declare(Resource::existing(
        types::MANAGED_ZONE,
        &format!("{}-zone", dashed(domain)),
        dashed(domain),
    ))?;

    graph.declare(
        Resource::new(types::RECORD_SET, &format!("{}-{}-record-set", prefix, domain))
            .with("name", format!("{}.", domain))
            .with("type", "A")
            .with("ttl", RECORD_TTL)
            .with_output("managedZone", zone.output("name"))
            .with_template("rrdatas", json!([edge.address.output("address").to_string()])),
    )?;

    let certificate = graph.declare(
        Resource::new(
            types::MANAGED_SSL_CERTIFICATE,
            &format!("{}-ssl", dashed(domain)),
        )
        .with("managed", json!({ "domains": [format!("{}.", domain)] })),
    )?;

    edge.certificates.insert(domain.to_string(), certificate);
    Ok(())
}
