//! Managed databases

use super::fetcher::{FanOut, ResourceFetcher};
use super::registry::ResourceKind;
use crate::scw::cancel::CancelToken;
use crate::scw::types::Database;
use anyhow::Result;

impl ResourceFetcher {
    /// List database instances across every configured region
    pub async fn list_databases(&self, cancel: &CancelToken) -> Result<FanOut<Database>> {
        self.list_all(
            ResourceKind::Databases,
            |region| format!("/rdb/v1/regions/{}/instances", region),
            "instances",
            cancel,
        )
        .await
    }
}
