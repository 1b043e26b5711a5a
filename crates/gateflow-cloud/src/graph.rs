//! In-memory resource graph handed to the provisioning engine

use crate::error::{CloudError, Result};
use crate::resource::{Output, Resource, ResourceHandle};
use indexmap::IndexMap;
use serde_json::Value;

/// Ordered set of declared resources and exported outputs
///
/// A resource can only reference resources declared before it, so declaration
/// order is always a valid creation order.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    resources: IndexMap<String, Resource>,
    outputs: IndexMap<String, Value>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a resource
    pub fn declare(&mut self, resource: Resource) -> Result<ResourceHandle> {
        if self.resources.contains_key(&resource.name) {
            return Err(CloudError::DuplicateResource(resource.name));
        }
        if let Some(missing) = resource
            .dependencies()
            .into_iter()
            .find(|dep| !self.resources.contains_key(dep))
        {
            return Err(CloudError::UnresolvedReference {
                resource: resource.name,
                reference: missing,
            });
        }

        tracing::debug!(
            name = %resource.name,
            resource_type = %resource.resource_type,
            existing = resource.is_existing(),
            "Declared resource"
        );
        let handle = ResourceHandle::new(resource.name.clone(), resource.resource_type.clone());
        self.resources.insert(resource.name.clone(), resource);
        Ok(handle)
    }

    /// Export an output of the stack
    pub fn export(&mut self, name: impl Into<String>, output: Output) -> Result<()> {
        let name = name.into();
        if !self.resources.contains_key(output.resource()) {
            return Err(CloudError::UnresolvedReference {
                resource: name,
                reference: output.resource().to_string(),
            });
        }
        self.outputs.insert(name, Value::String(output.to_string()));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resources of a given type, in declaration order
    pub fn by_type(&self, resource_type: &str) -> Vec<&Resource> {
        self.resources
            .values()
            .filter(|r| r.resource_type == resource_type)
            .collect()
    }

    /// Lookups of pre-existing resources
    pub fn existing(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values().filter(|r| r.is_existing())
    }

    pub fn outputs(&self) -> &IndexMap<String, Value> {
        &self.outputs
    }

    /// Count of declared resources per type, in first-seen order
    pub fn type_counts(&self) -> IndexMap<&str, usize> {
        let mut counts = IndexMap::new();
        for resource in self.resources.values() {
            *counts.entry(resource.resource_type.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_in_order() {
        let mut graph = ResourceGraph::new();
        let ip = graph
            .declare(Resource::new("gcp:compute:GlobalAddress", "ip"))
            .unwrap();
        graph
            .declare(
                Resource::new("gcp:dns:RecordSet", "record")
                    .with_template("rrdatas", Value::from(vec![ip.output("address").to_string()])),
            )
            .unwrap();

        let names: Vec<_> = graph.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ip", "record"]);
        assert_eq!(graph.get("record").unwrap().dependencies(), vec!["ip"]);
    }

    #[test]
    fn test_reference_to_undeclared_resource() {
        let mut graph = ResourceGraph::new();
        let result = graph.declare(
            Resource::new("gcp:compute:TargetHttpProxy", "proxy").with_template("urlMap", Value::from("${map.selfLink}")),
        );

        match result {
            Err(CloudError::UnresolvedReference {
                resource,
                reference,
            }) => {
                assert_eq!(resource, "proxy");
                assert_eq!(reference, "map");
            }
            other => panic!("Expected UnresolvedReference, got {:?}", other),
        }
        assert!(graph.is_empty());
    }

    #[test]
    fn test_duplicate_resource() {
        let mut graph = ResourceGraph::new();
        graph
            .declare(Resource::new("gcp:storage:Bucket", "bucket"))
            .unwrap();
        assert!(matches!(
            graph.declare(Resource::new("gcp:storage:Bucket", "bucket")),
            Err(CloudError::DuplicateResource(_))
        ));
    }

    #[test]
    fn test_export_requires_declared_resource() {
        let mut graph = ResourceGraph::new();
        let ip = graph
            .declare(Resource::new("gcp:compute:GlobalAddress", "ip"))
            .unwrap();
        graph.export("externalIp", ip.output("address")).unwrap();
        assert_eq!(graph.outputs()["externalIp"], Value::from("${ip.address}"));

        let dangling = ResourceGraph::new().export("x", ip.output("address"));
        assert!(dangling.is_err());
    }

    #[test]
    fn test_by_type_and_counts() {
        let mut graph = ResourceGraph::new();
        graph
            .declare(Resource::existing("gcp:compute:Network", "vpc", "vpc"))
            .unwrap();
        graph
            .declare(Resource::new("gcp:compute:BackendService", "bs-1"))
            .unwrap();
        graph
            .declare(Resource::new("gcp:compute:BackendService", "bs-2"))
            .unwrap();

        assert_eq!(graph.by_type("gcp:compute:BackendService").len(), 2);
        assert_eq!(graph.existing().count(), 1);
        assert_eq!(graph.type_counts()["gcp:compute:BackendService"], 2);
    }
}
