//! Planned changes between two engine programs

use crate::program::{Program, ProgramResource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents a planned action for a declared resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Unique identifier for the action
    pub id: String,

    /// Type of action to perform
    pub action_type: ActionType,

    /// Resource type token (e.g., "gcp:compute:URLMap")
    pub resource_type: String,

    /// Logical resource name
    pub resource_id: String,

    /// Description of the action
    pub description: String,

    /// Additional details about the action
    pub details: HashMap<String, serde_json::Value>,
}

/// Type of action to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Newly declared
    Create,
    /// Declared with different inputs
    Update,
    /// No longer declared
    Delete,
    /// No changes needed
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// Plan containing all actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// List of actions, desired resources first in declaration order
    pub actions: Vec<Action>,

    /// Program-level keys that differ (e.g., "config.gcp:project", "outputs.urlMap")
    #[serde(default)]
    pub program_changes: Vec<String>,

    /// Whether the plan has any changes
    pub has_changes: bool,
}

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        let has_changes = actions.iter().any(|a| a.action_type != ActionType::NoOp);
        Self {
            actions,
            program_changes: Vec::new(),
            has_changes,
        }
    }

    /// Attach program-level changes
    pub fn with_program_changes(mut self, changes: Vec<String>) -> Self {
        self.has_changes |= !changes.is_empty();
        self.program_changes = changes;
        self
    }

    /// Compare the desired program with the last written one
    ///
    /// Without a previous program every resource is a create.
    pub fn diff(previous: Option<&Program>, desired: &Program) -> Self {
        let mut actions = Vec::new();

        for (name, resource) in &desired.resources {
            let action = match previous.and_then(|p| p.resources.get(name)) {
                None => action(
                    ActionType::Create,
                    name,
                    resource,
                    format!("{} を作成", name),
                ),
                Some(old) if old == resource => action(
                    ActionType::NoOp,
                    name,
                    resource,
                    format!("{} は変更なし", name),
                ),
                Some(old) => {
                    let changed = changed_keys(old, resource);
                    let mut a = action(
                        ActionType::Update,
                        name,
                        resource,
                        format!("{} を更新 ({})", name, changed.join(", ")),
                    );
                    a.details
                        .insert("changed".to_string(), serde_json::json!(changed));
                    a
                }
            };
            actions.push(action);
        }

        if let Some(previous) = previous {
            for (name, resource) in &previous.resources {
                if !desired.resources.contains_key(name) {
                    actions.push(action(
                        ActionType::Delete,
                        name,
                        resource,
                        format!("{} を削除", name),
                    ));
                }
            }
        }

        let program_changes = match previous {
            Some(previous) => program_changes(previous, desired),
            None => Vec::new(),
        };
        Self::new(actions).with_program_changes(program_changes)
    }

    /// Get actions by type
    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .collect()
    }

    /// Summary of the plan
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.actions_by_type(ActionType::Create).len(),
            update: self.actions_by_type(ActionType::Update).len(),
            delete: self.actions_by_type(ActionType::Delete).len(),
            no_change: self.actions_by_type(ActionType::NoOp).len(),
        }
    }
}

fn action(
    action_type: ActionType,
    name: &str,
    resource: &ProgramResource,
    description: String,
) -> Action {
    Action {
        id: format!("{}-{}", action_type, name),
        action_type,
        resource_type: resource.resource_type.clone(),
        resource_id: name.to_string(),
        description,
        details: HashMap::new(),
    }
}

/// Program-level entries outside `resources` whose values differ
fn program_changes(old: &Program, new: &Program) -> Vec<String> {
    let mut changes = Vec::new();
    if old.name != new.name {
        changes.push("name".to_string());
    }
    if old.runtime != new.runtime {
        changes.push("runtime".to_string());
    }
    if old.description != new.description {
        changes.push("description".to_string());
    }

    let config_keys = new
        .config
        .keys()
        .chain(old.config.keys().filter(|k| !new.config.contains_key(*k)));
    for key in config_keys {
        if old.config.get(key) != new.config.get(key) {
            changes.push(format!("config.{}", key));
        }
    }

    let output_keys = new
        .outputs
        .keys()
        .chain(old.outputs.keys().filter(|k| !new.outputs.contains_key(*k)));
    for key in output_keys {
        if old.outputs.get(key) != new.outputs.get(key) {
            changes.push(format!("outputs.{}", key));
        }
    }
    changes
}

/// Top-level keys whose values differ
fn changed_keys(old: &ProgramResource, new: &ProgramResource) -> Vec<String> {
    let mut keys: Vec<String> = new
        .properties
        .iter()
        .filter(|(k, v)| old.properties.get(*k) != Some(*v))
        .map(|(k, _)| k.clone())
        .chain(
            old.properties
                .keys()
                .filter(|k| !new.properties.contains_key(*k))
                .cloned(),
        )
        .collect();
    if old.resource_type != new.resource_type {
        keys.insert(0, "type".to_string());
    }
    if old.get != new.get {
        keys.push("get".to_string());
    }
    keys
}

/// Summary of planned actions
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub no_change: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete, {} unchanged",
            self.create, self.update, self.delete, self.no_change
        )
    }
}
