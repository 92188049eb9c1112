//! Configuration Management
//!
//! Handles persistent configuration storage for tscw and merges it with
//! command-line flags and Scaleway credentials.

use crate::resource::{FetchPolicy, PartitionTable, ResourceKind};
use crate::scw::auth::{Credentials, DEFAULT_API_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// minimal, detailed or verbose
    #[serde(default = "default_detail_level")]
    pub detail_level: String,
    #[serde(default = "default_toast_duration")]
    pub toast_duration_secs: u64,
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_detail_level() -> String {
    "detailed".to_string()
}

fn default_toast_duration() -> u64 {
    5
}

fn default_max_history() -> usize {
    50
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            detail_level: default_detail_level(),
            toast_duration_secs: default_toast_duration(),
            max_history: default_max_history(),
        }
    }
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Organization to filter listings by
    #[serde(default)]
    pub organization_id: Option<String>,
    /// API root, for staging or a local mock
    #[serde(default)]
    pub api_url: Option<String>,
    /// Serve canned data instead of calling the API
    #[serde(default)]
    pub fake_data: bool,
    /// Block deploy and power actions
    #[serde(default)]
    pub readonly: bool,
    /// Last viewed resource
    #[serde(default)]
    pub last_view: Option<ResourceKind>,
    #[serde(default)]
    pub fetch_policy: Option<FetchPolicy>,
    /// Per-kind replacement of the default regions/zones
    #[serde(default)]
    pub partitions: HashMap<ResourceKind, Vec<String>>,
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Where this config was loaded from; `None` disables saving
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tscw").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let mut config = if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    tracing::warn!("Ignoring invalid config {:?}: {}", path, e);
                    Self::default()
                }),
                Err(_) => Self::default(),
            }
        } else {
            Self::default()
        };

        config.path = Some(path.to_path_buf());
        config
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Set last view and save
    pub fn set_last_view(&mut self, kind: ResourceKind) -> Result<()> {
        self.last_view = Some(kind);
        self.save()
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub organization_id: Option<String>,
    pub api_url: Option<String>,
    pub fake_data: bool,
    pub view: Option<ResourceKind>,
    pub policy: Option<FetchPolicy>,
    pub readonly: bool,
}

/// Effective settings after merging every source
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub fake_data: bool,
    pub readonly: bool,
    pub view: ResourceKind,
    pub policy: FetchPolicy,
    pub partitions: PartitionTable,
}

impl Settings {
    /// CLI > environment > tscw config > Scaleway CLI profile > defaults
    pub fn resolve(
        cli: &Overrides,
        env: Credentials,
        config: &Config,
        profile: Credentials,
    ) -> Self {
        let organization_id = cli
            .organization_id
            .clone()
            .or(env.organization_id)
            .or_else(|| config.organization_id.clone())
            .or(profile.organization_id);

        let api_url = cli
            .api_url
            .clone()
            .or(env.api_url)
            .or_else(|| config.api_url.clone())
            .or(profile.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            credentials: Credentials {
                secret_key: env.secret_key.or(profile.secret_key),
                organization_id,
                api_url: Some(api_url),
            },
            fake_data: cli.fake_data || config.fake_data,
            readonly: cli.readonly || config.readonly,
            view: cli
                .view
                .or(config.last_view)
                .unwrap_or(ResourceKind::Instances),
            policy: cli.policy.or(config.fetch_policy).unwrap_or_default(),
            partitions: PartitionTable::with_overrides(&config.partitions),
        }
    }

    /// A secret key is only optional with fake data
    pub fn validate(&self) -> Result<()> {
        if self.fake_data || self.credentials.secret_key.is_some() {
            return Ok(());
        }
        anyhow::bail!(
            "No Scaleway secret key configured. Set SCW_SECRET_KEY, run 'scw init', or use --fake-data"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "11111111-2222-3333-4444-555555555555";

    fn creds(org: Option<&str>, url: Option<&str>) -> Credentials {
        Credentials {
            secret_key: None,
            organization_id: org.map(str::to_string),
            api_url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_precedence() {
        let config = Config {
            organization_id: Some("from-config".into()),
            api_url: Some("https://config.example".into()),
            ..Default::default()
        };

        let settings = Settings::resolve(
            &Overrides::default(),
            creds(Some("from-env"), None),
            &config,
            creds(Some("from-profile"), Some("https://profile.example")),
        );
        assert_eq!(settings.credentials.organization_id.as_deref(), Some("from-env"));
        assert_eq!(settings.credentials.api_url.as_deref(), Some("https://config.example"));

        let cli = Overrides {
            organization_id: Some("from-cli".into()),
            ..Default::default()
        };
        let settings = Settings::resolve(&cli, creds(Some("from-env"), None), &config, creds(None, None));
        assert_eq!(settings.credentials.organization_id.as_deref(), Some("from-cli"));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(
            &Overrides::default(),
            Credentials::default(),
            &Config::default(),
            Credentials::default(),
        );
        assert_eq!(settings.credentials.api_url.as_deref(), Some(DEFAULT_API_URL));
        assert_eq!(settings.view, ResourceKind::Instances);
        assert_eq!(settings.policy, FetchPolicy::FailFast);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_fake_data_needs_no_key() {
        let cli = Overrides {
            fake_data: true,
            ..Default::default()
        };
        let settings = Settings::resolve(&cli, Credentials::default(), &Config::default(), Credentials::default());
        assert!(settings.validate().is_ok());

        let profile = Credentials {
            secret_key: Some(KEY.into()),
            ..Default::default()
        };
        let settings = Settings::resolve(&Overrides::default(), Credentials::default(), &Config::default(), profile);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_config_round_trip_on_disk() {
        let dir = std::env::temp_dir().join(format!("tscw-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.json");

        let mut config = Config::load_from(&path);
        assert!(config.last_view.is_none());
        config.partitions.insert(ResourceKind::Redis, vec!["fr-par-1".into()]);
        config.set_last_view(ResourceKind::Containers).unwrap();

        let reloaded = Config::load_from(&path);
        assert_eq!(reloaded.last_view, Some(ResourceKind::Containers));
        assert_eq!(reloaded.partitions[&ResourceKind::Redis], vec!["fr-par-1".to_string()]);

        let settings = Settings::resolve(&Overrides::default(), Credentials::default(), &reloaded, Credentials::default());
        assert_eq!(settings.partitions.get(ResourceKind::Redis), ["fr-par-1".to_string()]);
        assert_eq!(settings.view, ResourceKind::Containers);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_parses_policy_and_views() {
        let config: Config = serde_json::from_str(
            r#"{"fetch_policy": "collect-partial", "last_view": "redis", "partitions": {"databases": ["fr-par"]}}"#,
        )
        .unwrap();
        assert_eq!(config.fetch_policy, Some(FetchPolicy::CollectPartial));
        assert_eq!(config.last_view, Some(ResourceKind::Redis));
        assert_eq!(config.notifications.max_history, 50);
    }
}
