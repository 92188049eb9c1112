//! Compute instances

use super::fetcher::{FanOut, ResourceFetcher};
use super::registry::ResourceKind;
use crate::scw::cancel::CancelToken;
use crate::scw::types::{Instance, InstanceAction};
use anyhow::{Context, Result};
use serde_json::json;

fn servers_path(zone: &str) -> String {
    format!("/instance/v1/zones/{}/servers", zone)
}

impl ResourceFetcher {
    /// List servers across every configured zone
    pub async fn list_instances(&self, cancel: &CancelToken) -> Result<FanOut<Instance>> {
        self.list_all(ResourceKind::Instances, servers_path, "servers", cancel)
            .await
    }

    pub async fn power_on_instance(&self, instance: &Instance, cancel: &CancelToken) -> Result<()> {
        self.instance_action(instance, InstanceAction::PowerOn, cancel)
            .await
    }

    pub async fn power_off_instance(&self, instance: &Instance, cancel: &CancelToken) -> Result<()> {
        self.instance_action(instance, InstanceAction::PowerOff, cancel)
            .await
    }

    pub async fn reboot_instance(&self, instance: &Instance, cancel: &CancelToken) -> Result<()> {
        self.instance_action(instance, InstanceAction::Reboot, cancel)
            .await
    }

    /// POST a power action to the instance's own zone
    pub async fn instance_action(
        &self,
        instance: &Instance,
        action: InstanceAction,
        cancel: &CancelToken,
    ) -> Result<()> {
        if action == InstanceAction::Other {
            anyhow::bail!("Unsupported instance action");
        }

        let path = format!(
            "{}/{}/action",
            servers_path(&instance.zone),
            urlencoding::encode(&instance.id)
        );
        tracing::info!("{} instance {} ({})", action.as_str(), instance.name, instance.zone);

        self.transport()
            .post(&path, Some(&json!({ "action": action.as_str() })), cancel)
            .await
            .with_context(|| format!("Failed to {} {}", action.as_str(), instance.name))?;
        Ok(())
    }
}
