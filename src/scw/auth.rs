//! Scaleway Credentials
//!
//! Resolves the secret key and organization from the environment, falling
//! back to the Scaleway CLI profile file (`~/.config/scw/config.yaml`).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Public API endpoint
pub const DEFAULT_API_URL: &str = "https://api.scaleway.com";

/// Resolved credentials
#[derive(Clone, Default)]
pub struct Credentials {
    pub secret_key: Option<String>,
    pub organization_id: Option<String>,
    pub api_url: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .field("organization_id", &self.organization_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// One profile of the Scaleway CLI config file
#[derive(Debug, Default, Deserialize)]
struct CliProfile {
    secret_key: Option<String>,
    default_organization_id: Option<String>,
    api_url: Option<String>,
}

/// Root of the Scaleway CLI config file
#[derive(Debug, Default, Deserialize)]
struct CliConfig {
    #[serde(flatten)]
    default_profile: CliProfile,
    active_profile: Option<String>,
    #[serde(default)]
    profiles: HashMap<String, CliProfile>,
}

impl Credentials {
    /// `SCW_SECRET_KEY`, `SCW_DEFAULT_ORGANIZATION_ID` and `SCW_API_URL`
    pub fn from_env() -> Self {
        Self::validated(
            env_var("SCW_SECRET_KEY"),
            env_var("SCW_DEFAULT_ORGANIZATION_ID"),
            env_var("SCW_API_URL"),
        )
    }

    /// Active profile of the Scaleway CLI config file
    pub fn from_cli_profile() -> Self {
        let profile = read_cli_profile().unwrap_or_default();
        Self::validated(
            profile.secret_key,
            profile.default_organization_id,
            profile.api_url,
        )
    }

    /// Fill unset fields from `fallback`
    pub fn or(self, fallback: Self) -> Self {
        Self {
            secret_key: self.secret_key.or(fallback.secret_key),
            organization_id: self.organization_id.or(fallback.organization_id),
            api_url: self.api_url.or(fallback.api_url),
        }
    }

    fn validated(
        secret_key: Option<String>,
        organization_id: Option<String>,
        api_url: Option<String>,
    ) -> Self {
        Self {
            secret_key: secret_key.filter(|key| validate_uuid(key, "secret key")),
            organization_id: organization_id.filter(|id| validate_uuid(id, "organization id")),
            api_url,
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Secret keys and organization ids are UUIDs
fn validate_uuid(value: &str, what: &str) -> bool {
    if uuid::Uuid::parse_str(value).is_ok() {
        true
    } else {
        tracing::warn!("Ignoring malformed {}", what);
        false
    }
}

/// Get the Scaleway CLI configuration file path
pub fn cli_config_path() -> Option<PathBuf> {
    if let Some(path) = env_var("SCW_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|p| p.join(".config").join("scw").join("config.yaml"))
}

/// Read the active profile of the Scaleway CLI, if any
fn read_cli_profile() -> Option<CliProfile> {
    let path = cli_config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;

    match parse_cli_profile(&content) {
        Ok(profile) => Some(profile),
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}", path, e);
            None
        },
    }
}

fn parse_cli_profile(content: &str) -> Result<CliProfile, serde_yaml::Error> {
    let mut config: CliConfig = serde_yaml::from_str(content)?;

    let active = env_var("SCW_PROFILE").or(config.active_profile.take());
    let Some(name) = active else {
        return Ok(config.default_profile);
    };

    let Some(mut profile) = config.profiles.remove(&name) else {
        tracing::warn!("Profile '{}' not found in Scaleway CLI config", name);
        return Ok(config.default_profile);
    };

    // Named profiles inherit unset keys from the top level
    profile.secret_key = profile.secret_key.or(config.default_profile.secret_key);
    profile.default_organization_id = profile
        .default_organization_id
        .or(config.default_profile.default_organization_id);
    profile.api_url = profile.api_url.or(config.default_profile.api_url);

    Ok(profile)
}
