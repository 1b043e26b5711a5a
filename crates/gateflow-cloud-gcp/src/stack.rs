//! Stack composition
//!
//! Runs the builders in order (network & edge → routing → compute) and turns
//! the resulting graph into the program handed to the provisioning engine.

use crate::compute::{Compute, archive_path, build_compute};
use crate::error::Result;
use crate::network::{NetworkEdge, build_network_edge};
use crate::routing::{Routing, build_routing};
use gateflow_cloud::{Program, ResourceGraph};
use gateflow_config::StackSettings;
use gateflow_core::Descriptor;
use std::path::Path;
use tracing::{info, instrument};

/// Fully composed stack
#[derive(Debug, Clone)]
pub struct ComposedStack {
    pub graph: ResourceGraph,
    pub edge: NetworkEdge,
    pub routing: Routing,
    pub compute: Compute,
}

/// Compose every resource of the stack
///
/// `source_dir` holds the deployment templates and `<slsServiceName>.zip`.
#[instrument(skip_all, fields(stack = %settings.stack))]
pub fn compose(
    settings: &StackSettings,
    descriptor: &Descriptor,
    source_dir: &Path,
) -> Result<ComposedStack> {
    let mut graph = ResourceGraph::new();

    let edge = build_network_edge(&mut graph, settings)?;
    let routing = build_routing(&mut graph, settings, &edge, descriptor.functions())?;
    let compute = build_compute(
        &mut graph,
        settings,
        descriptor,
        &archive_path(source_dir, settings),
        &edge,
    )?;

    graph.export("externalIp", edge.address.output("address"))?;
    graph.export("urlMap", routing.url_map.output("selfLink"))?;

    info!(
        resources = graph.len(),
        functions = compute.functions.len(),
        "Stack composed"
    );
    Ok(ComposedStack {
        graph,
        edge,
        routing,
        compute,
    })
}

impl ComposedStack {
    /// Program document for the provisioning engine
    pub fn to_program(&self, settings: &StackSettings) -> Program {
        let program = Program::from_graph(settings.general_prefix(), &self.graph)
            .with_description(format!(
                "Serverless backend for {} ({})",
                settings.target_domain, settings.stack
            ))
            .with_config("gcp:project", settings.project.as_str())
            .with_config("gcp:region", settings.region.as_str());

        match &settings.zone {
            Some(zone) => program.with_config("gcp:zone", zone.as_str()),
            None => program,
        }
    }
}
