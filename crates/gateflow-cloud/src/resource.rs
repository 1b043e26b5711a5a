//! Resource declarations and cross-resource references

use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::LazyLock;

// `$$` is matched first so escaped literals (`$${...}`) are skipped
static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$|\$\{([A-Za-z0-9_-]+)\.([A-Za-z0-9_.\[\]]+)\}")
        .expect("valid reference regex")
});

/// Escape literal text so the engine does not interpolate it
///
/// `${` becomes `$${`, which the engine renders back as `${`.
pub fn escape_literal(raw: &str) -> String {
    raw.replace("${", "$${")
}

/// Escape every string inside a literal value
fn escape_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(escape_literal(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(escape_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, escape_value(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Turn an arbitrary name into a logical name usable inside `${name.attr}`
///
/// Anything outside `[A-Za-z0-9_-]` becomes `-`.
pub fn logical_name(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// A single node of the resource graph
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Logical name (unique within a graph)
    pub name: String,

    /// Engine type token (e.g., "gcp:compute:BackendService")
    pub resource_type: String,

    /// Input properties, possibly containing references
    pub properties: Map<String, Value>,

    /// Provider ID when this node reads an existing resource instead of creating one
    pub existing_id: Option<String>,
}

impl Resource {
    /// Declare a resource to be created
    pub fn new(resource_type: impl Into<String>, name: &str) -> Self {
        Self {
            name: logical_name(name),
            resource_type: resource_type.into(),
            properties: Map::new(),
            existing_id: None,
        }
    }

    /// Declare a lookup of a resource that already exists
    pub fn existing(resource_type: impl Into<String>, name: &str, id: impl Into<String>) -> Self {
        Self {
            existing_id: Some(id.into()),
            ..Self::new(resource_type, name)
        }
    }

    /// Set a literal property
    ///
    /// Strings are escaped, so user data such as `"hi ${user}"` reaches the
    /// resource verbatim.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .insert(key.into(), escape_value(value.into()));
        self
    }

    /// Set a property to another resource's output
    pub fn with_output(mut self, key: impl Into<String>, output: Output) -> Self {
        self.properties
            .insert(key.into(), Value::String(output.to_string()));
        self
    }

    /// Set a property that mixes literals and `${name.attr}` references
    ///
    /// Stored as-is. Literal text inside must go through [`escape_literal`].
    pub fn with_template(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Set a property only when a value is present
    pub fn with_opt<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn is_existing(&self) -> bool {
        self.existing_id.is_some()
    }

    /// Logical names this resource references, in first-seen order
    pub fn dependencies(&self) -> Vec<String> {
        let mut deps = Vec::new();
        for value in self.properties.values() {
            collect_references(value, &mut deps);
        }
        deps
    }
}

fn collect_references(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in REFERENCE_PATTERN.captures_iter(s) {
                let Some(name) = caps.get(1) else {
                    continue;
                };
                let name = name.as_str().to_string();
                if !out.contains(&name) {
                    out.push(name);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_references(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_references(v, out)),
        _ => {}
    }
}

/// Handle returned when a resource is declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    name: String,
    resource_type: String,
}

impl ResourceHandle {
    pub(crate) fn new(name: String, resource_type: String) -> Self {
        Self {
            name,
            resource_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Reference to a generated attribute of this resource
    pub fn output(&self, attribute: &str) -> Output {
        Output {
            resource: self.name.clone(),
            attribute: attribute.to_string(),
        }
    }
}

/// A value known only once the engine has materialized a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    resource: String,
    attribute: String,
}

impl Output {
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}.{}}}", self.resource, self.attribute)
    }
}
