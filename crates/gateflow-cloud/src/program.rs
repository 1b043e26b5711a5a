//! Engine program document
//!
//! The resource graph is handed to the provisioning engine as a Pulumi YAML
//! program (`Pulumi.yaml` with `runtime: yaml`). References between resources
//! are `${name.attribute}` interpolations which the engine resolves and orders.

use crate::error::Result;
use crate::graph::ResourceGraph;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const RUNTIME: &str = "yaml";

/// A complete engine program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,

    pub runtime: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Project-level config values (e.g., "gcp:project")
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub config: IndexMap<String, ConfigValue>,

    #[serde(default)]
    pub resources: IndexMap<String, ProgramResource>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub outputs: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigValue {
    pub value: Value,
}

/// One entry of the `resources:` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramResource {
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<GetOptions>,
}

/// Read an existing resource instead of creating it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetOptions {
    pub id: String,
}

impl Program {
    /// Build the program document from a composed graph
    pub fn from_graph(name: impl Into<String>, graph: &ResourceGraph) -> Self {
        let resources = graph
            .iter()
            .map(|r| {
                (
                    r.name.clone(),
                    ProgramResource {
                        resource_type: r.resource_type.clone(),
                        properties: r.properties.clone(),
                        get: r.existing_id.clone().map(|id| GetOptions { id }),
                    },
                )
            })
            .collect();

        Self {
            name: name.into(),
            runtime: RUNTIME.to_string(),
            description: None,
            config: IndexMap::new(),
            resources,
            outputs: graph.outputs().clone(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a project-level config value
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(
            key.into(),
            ConfigValue {
                value: value.into(),
            },
        );
        self
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}
