//! Resource Registry - Load resource definitions from JSON
//!
//! Columns, actions, console links and default partitions of every
//! resource kind live in an embedded JSON file and are looked up here.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[include_str!("../resources/scaleway.json")];

/// Resource kinds browsable from the UI
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Instances,
    Containers,
    Databases,
    Redis,
}

impl ResourceKind {
    pub const ALL: [Self; 4] = [
        Self::Instances,
        Self::Containers,
        Self::Databases,
        Self::Redis,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Instances => "instances",
            Self::Containers => "containers",
            Self::Databases => "databases",
            Self::Redis => "redis",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// How a column value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFormat {
    /// Status icon plus capitalized status
    Status,
    /// Country flag plus region/zone
    Flag,
    /// Public/private lock accessory
    Privacy,
    /// Image name without its registry
    Image,
    /// Byte count, human readable
    Bytes,
}

/// Column definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub header: String,
    pub json_path: String,
    pub width: u16,
    #[serde(default)]
    pub format: Option<ColumnFormat>,
}

/// What an action does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Deploy,
    #[serde(rename = "poweron")]
    PowerOn,
    #[serde(rename = "poweroff")]
    PowerOff,
    Reboot,
    OpenConsole,
    Logs,
}

impl ActionKind {
    /// Whether the action changes remote state
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::Deploy | Self::PowerOn | Self::PowerOff | Self::Reboot
        )
    }
}

/// Confirmation config for actions
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfirmConfig {
    /// Message to show in confirmation dialog
    #[serde(default)]
    pub message: Option<String>,
    /// If true, default selection is Yes; if false, default is No
    #[serde(default)]
    pub default_yes: bool,
}

/// Action definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ActionDef {
    pub key: ActionKind,
    pub display_name: String,
    #[serde(default)]
    pub shortcut: Option<String>,
    /// Shown in red in the header
    #[serde(default)]
    pub destructive: bool,
    #[serde(default)]
    pub confirm: Option<ConfirmConfig>,
}

impl ActionDef {
    pub fn requires_confirm(&self) -> bool {
        self.confirm.is_some()
    }
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    /// "Zone" or "Region"
    pub partition_label: String,
    /// Default partitions, overridable from the config file
    pub partitions: Vec<String>,
    /// Template with `{location}`, `{id}` and `{parent_id}` placeholders
    pub console_url: String,
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
}

impl ResourceDef {
    pub fn action_for_shortcut(&self, c: char) -> Option<&ActionDef> {
        self.actions
            .iter()
            .find(|a| a.shortcut.as_deref().and_then(|s| s.chars().next()) == Some(c))
    }

    pub fn action(&self, kind: ActionKind) -> Option<&ActionDef> {
        self.actions.iter().find(|a| a.key == kind)
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<ResourceKind, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition
pub fn get_resource(kind: ResourceKind) -> &'static ResourceDef {
    get_registry()
        .resources
        .get(&kind)
        .unwrap_or_else(|| panic!("Resource '{}' missing from embedded registry", kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defines_every_kind() {
        for kind in ResourceKind::ALL {
            let resource = get_resource(kind);
            assert!(!resource.columns.is_empty(), "{} has no columns", kind);
            assert!(!resource.partitions.is_empty(), "{} has no partitions", kind);
        }
    }

    #[test]
    fn test_default_partitions() {
        assert_eq!(
            get_resource(ResourceKind::Containers).partitions,
            vec!["fr-par", "nl-ams", "pl-waw"]
        );
        assert_eq!(get_resource(ResourceKind::Instances).partitions.len(), 7);
        assert_eq!(get_resource(ResourceKind::Redis).partitions.len(), 6);
    }

    #[test]
    fn test_only_deploy_requires_confirm() {
        for kind in ResourceKind::ALL {
            for action in &get_resource(kind).actions {
                assert_eq!(
                    action.requires_confirm(),
                    action.key == ActionKind::Deploy,
                    "unexpected confirm setting on {:?}",
                    action.key
                );
            }
        }
    }

    #[test]
    fn test_action_shortcuts_are_unique_per_kind() {
        for kind in ResourceKind::ALL {
            let mut seen = std::collections::HashSet::new();
            for action in &get_resource(kind).actions {
                let shortcut = action.shortcut.clone().unwrap_or_default();
                assert!(seen.insert(shortcut), "duplicate shortcut in {}", kind);
            }
        }
    }

    #[test]
    fn test_kind_keys_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(ResourceKind::from_key("buckets"), None);
    }
}
