//! Resource Fetcher
//!
//! Lists resources across the regions/zones of a resource kind and merges
//! the per-partition pages into one collection.

use super::registry::{get_resource, ResourceKind};
use crate::scw::cancel::CancelToken;
use crate::scw::client::Transport;
use crate::scw::http::ApiError;
use anyhow::Result;
use clap::ValueEnum;
use futures::future::{join_all, try_join_all};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Items requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// What to do when one partition fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FetchPolicy {
    /// The first failing partition fails the whole listing
    #[default]
    FailFast,
    /// Keep successful partitions and report the failed ones
    CollectPartial,
}

/// Resource kind -> partitions to query
#[derive(Debug, Clone)]
pub struct PartitionTable {
    partitions: HashMap<ResourceKind, Vec<String>>,
}

impl PartitionTable {
    /// Partitions from the embedded registry
    pub fn defaults() -> Self {
        let partitions = ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, get_resource(kind).partitions.clone()))
            .collect();
        Self { partitions }
    }

    /// Defaults with some kinds replaced
    pub fn with_overrides(overrides: &HashMap<ResourceKind, Vec<String>>) -> Self {
        let mut table = Self::defaults();
        for (kind, partitions) in overrides {
            table.set(*kind, partitions.clone());
        }
        table
    }

    pub fn set(&mut self, kind: ResourceKind, partitions: Vec<String>) {
        self.partitions.insert(kind, partitions);
    }

    pub fn get(&self, kind: ResourceKind) -> &[String] {
        self.partitions.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for PartitionTable {
    fn default() -> Self {
        Self::defaults()
    }
}

/// A partition that could not be listed
#[derive(Debug)]
pub struct PartitionFailure {
    pub partition: String,
    pub error: ApiError,
}

/// Merged result of a fan-out listing
#[derive(Debug)]
pub struct FanOut<T> {
    /// Items of every successful partition, in partition order
    pub items: Vec<T>,
    /// Always empty under [`FetchPolicy::FailFast`]
    pub failures: Vec<PartitionFailure>,
}

impl<T> FanOut<T> {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Drop failure details, keeping only the items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Stateless service listing and acting on Scaleway resources
#[derive(Clone)]
pub struct ResourceFetcher {
    transport: Arc<dyn Transport>,
    partitions: PartitionTable,
    policy: FetchPolicy,
    organization_id: Option<String>,
    page_size: u32,
}

impl ResourceFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            partitions: PartitionTable::defaults(),
            policy: FetchPolicy::default(),
            organization_id: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_partitions(mut self, partitions: PartitionTable) -> Self {
        self.partitions = partitions;
        self
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_organization(mut self, organization_id: Option<String>) -> Self {
        self.organization_id = organization_id;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn policy(&self) -> FetchPolicy {
        self.policy
    }

    pub fn partitions(&self, kind: ResourceKind) -> &[String] {
        self.partitions.get(kind)
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Run `list` once per partition of `kind` concurrently and merge the
    /// results in partition order.
    pub async fn fan_out<T, F, Fut>(&self, kind: ResourceKind, list: F) -> Result<FanOut<T>>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<Vec<T>, ApiError>>,
    {
        let partitions = self.partitions(kind).to_vec();
        tracing::debug!("Listing {} across {:?}", kind, partitions);

        match self.policy {
            FetchPolicy::FailFast => {
                let pages = try_join_all(partitions.into_iter().map(|partition| {
                    let request = list(partition.clone());
                    async move {
                        request.await.map_err(|error| {
                            tracing::warn!("Listing {} in {} failed: {}", kind, partition, error);
                            anyhow::Error::new(error)
                                .context(format!("Failed to list {} in {}", kind, partition))
                        })
                    }
                }))
                .await?;

                Ok(FanOut {
                    items: pages.into_iter().flatten().collect(),
                    failures: Vec::new(),
                })
            },
            FetchPolicy::CollectPartial => {
                let results = join_all(partitions.into_iter().map(|partition| {
                    let request = list(partition.clone());
                    async move { (partition, request.await) }
                }))
                .await;

                let mut merged = FanOut {
                    items: Vec::new(),
                    failures: Vec::new(),
                };
                for (partition, result) in results {
                    match result {
                        Ok(page) => merged.items.extend(page),
                        Err(ApiError::Cancelled) => {
                            return Err(anyhow::Error::new(ApiError::Cancelled));
                        },
                        Err(error) => {
                            tracing::warn!("Listing {} in {} failed: {}", kind, partition, error);
                            merged.failures.push(PartitionFailure { partition, error });
                        },
                    }
                }
                Ok(merged)
            },
        }
    }

    /// List every kind-wide collection under `path_for(partition)`
    pub(crate) async fn list_all<T, P>(
        &self,
        kind: ResourceKind,
        path_for: P,
        field: &str,
        cancel: &CancelToken,
    ) -> Result<FanOut<T>>
    where
        T: DeserializeOwned,
        P: Fn(&str) -> String,
    {
        self.fan_out(kind, |partition| {
            let path = path_for(&partition);
            async move { self.list_partition(&path, field, cancel).await }
        })
        .await
    }

    /// Fetch every page of one partition
    pub(crate) async fn list_partition<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let query = self.page_query(page);
            let mut response = self.transport.get(path, &query, cancel).await?;

            let batch: Vec<T> = take_list(&mut response, field)?;
            let received = batch.len();
            items.extend(batch);

            let total = response.get("total_count").and_then(Value::as_u64);
            match total {
                Some(total) if (items.len() as u64) < total && received > 0 => page += 1,
                _ => break,
            }
        }

        Ok(items)
    }

    fn page_query(&self, page: u32) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if let Some(org) = &self.organization_id {
            query.push(("organization_id".to_string(), org.clone()));
        }
        query
    }
}

/// Deserialize the list under `field`; a missing or null field is an empty list
pub(crate) fn take_list<T: DeserializeOwned>(
    response: &mut Value,
    field: &str,
) -> Result<Vec<T>, ApiError> {
    match response.get_mut(field).map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(list) => serde_json::from_value(list)
            .map_err(|e| ApiError::Decode(format!("field '{}': {}", field, e))),
    }
}

/// Extract a value from JSON using a dot-notation path
pub fn extract_json_value(item: &Value, path: &str) -> String {
    let mut current = item;

    for part in path.split('.') {
        // Handle array index
        let next = match part.parse::<usize>() {
            Ok(idx) => current.get(idx),
            Err(_) => current.get(part),
        };
        current = match next {
            Some(v) => v,
            None => return "-".to_string(),
        };
    }

    match current {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(_) => "[object]".to_string(),
    }
}
