//! Managed Redis clusters

use super::fetcher::{FanOut, ResourceFetcher};
use super::registry::ResourceKind;
use crate::scw::cancel::CancelToken;
use crate::scw::types::RedisCluster;
use anyhow::Result;

impl ResourceFetcher {
    /// List clusters across every configured zone
    pub async fn list_clusters(&self, cancel: &CancelToken) -> Result<FanOut<RedisCluster>> {
        self.list_all(
            ResourceKind::Redis,
            |zone| format!("/redis/v1/zones/{}/clusters", zone),
            "clusters",
            cancel,
        )
        .await
    }
}
