//! GateFlow Cloud
//!
//! Provider-neutral pieces of the composition: the resource graph, the
//! program document handed to the provisioning engine, plan previews and
//! preflight lookups.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  gateflow CLI                    │
//! │            (preview / synth / validate)          │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               gateflow-cloud-gcp                 │
//! │   network & edge → routing → compute builders    │
//! └─────────────────┬───────────────────────────────┘
//!                   │ ResourceGraph
//! ┌─────────────────▼───────────────────────────────┐
//! │                gateflow-cloud                    │
//! │  ┌──────────────┐ ┌──────────┐ ┌─────────────┐  │
//! │  │   Program    │ │   Plan   │ │  Preflight  │  │
//! │  └──────┬───────┘ └──────────┘ └─────────────┘  │
//! └─────────┼───────────────────────────────────────┘
//!           │ Pulumi.yaml
//! ┌─────────▼───────────┐
//! │ provisioning engine │
//! └─────────────────────┘
//! ```

pub mod action;
pub mod error;
pub mod graph;
pub mod preflight;
pub mod program;
pub mod resource;
pub mod store;

// Re-exports
pub use action::{Action, ActionType, Plan, PlanSummary};
pub use error::{CloudError, Result};
pub use graph::ResourceGraph;
pub use preflight::{AuthStatus, PreflightReport, ResourceLookup, preflight};
pub use program::{ConfigValue, GetOptions, Program, ProgramResource};
pub use resource::{Output, Resource, ResourceHandle, escape_literal, logical_name};
pub use store::ProgramStore;
