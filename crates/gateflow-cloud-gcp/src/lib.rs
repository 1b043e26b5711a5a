//! Google Cloud builders for GateFlow
//!
//! Turns stack settings and a deployment descriptor into the resource graph
//! of a serverless backend behind a global HTTPS load balancer.
//!
//! # Layers
//!
//! - Network & edge: VPC connector, global address, DNS A record, managed certificate
//! - Routing: serverless NEGs, backend services, URL map, proxies, forwarding rules
//! - Compute: artifact bucket, archive object, Cloud Functions, invoke grants
//!
//! # Requirements
//!
//! - `gcloud` CLI for `validate --remote` preflight lookups
//!
//! # Example
//!
//! ```ignore
//! use gateflow_cloud_gcp::compose;
//!
//! let (settings, root) = gateflow_config::load_stack("dev")?;
//! let source_dir = root.join("source_code");
//! let descriptor = gateflow_core::load_descriptor(&source_dir)?;
//!
//! let stack = compose(&settings, &descriptor, &source_dir)?;
//! println!("{}", stack.to_program(&settings).to_yaml()?);
//! ```

pub mod compute;
pub mod error;
pub mod gcloud;
pub mod network;
pub mod routing;
pub mod stack;
pub mod types;

#[cfg(test)]
mod testing;

pub use compute::{Compute, DeployedFunction, archive_path};
pub use error::{GcpError, Result};
pub use gcloud::Gcloud;
pub use network::NetworkEdge;
pub use routing::{Backends, PathRule, Routing, security_headers};
pub use stack::{ComposedStack, compose};
