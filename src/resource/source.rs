//! Data sources
//!
//! Fetchers talk to a [`Transport`]; this module picks between the live API
//! and the in-memory [`FixtureTransport`] used in fake-data mode.

use super::fixtures;
use crate::scw::auth::Credentials;
use crate::scw::cancel::CancelToken;
use crate::scw::client::{Query, ScwClient, Transport};
use crate::scw::http::ApiError;
use crate::scw::types::{Container, Database, Instance, InstanceAction, InstanceState, RedisCluster};
use crate::scw::types::{ContainerDomain, Namespace};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Live client unless fake data was requested
pub fn build_transport(credentials: &Credentials, fake_data: bool) -> Result<Arc<dyn Transport>> {
    if fake_data {
        tracing::info!("Using fake data");
        return Ok(Arc::new(FixtureTransport::new()));
    }

    Ok(Arc::new(ScwClient::from_credentials(credentials)?))
}

struct FixtureState {
    namespaces: Vec<Namespace>,
    containers: Vec<Container>,
    domains: Vec<ContainerDomain>,
    instances: Vec<Instance>,
    databases: Vec<Database>,
    clusters: Vec<RedisCluster>,
}

/// Serves canned resources and applies power actions to them
pub struct FixtureTransport {
    state: Mutex<FixtureState>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FixtureState {
                namespaces: fixtures::namespaces(),
                containers: fixtures::containers(),
                domains: fixtures::domains(),
                instances: fixtures::instances(),
                databases: fixtures::databases(),
                clusters: fixtures::redis_clusters(),
            }),
        }
    }
}

impl Default for FixtureTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn listing<T: Serialize>(field: &str, items: Vec<&T>) -> Result<Value, ApiError> {
    let total = items.len();
    let items = serde_json::to_value(items).map_err(|e| ApiError::Decode(e.to_string()))?;

    let mut response = serde_json::Map::new();
    response.insert(field.to_string(), items);
    response.insert("total_count".to_string(), json!(total));
    Ok(Value::Object(response))
}

fn not_found(path: &str) -> ApiError {
    ApiError::Api {
        status: 404,
        message: format!("no fixture for {}", path),
    }
}

#[async_trait]
impl Transport for FixtureTransport {
    async fn get(&self, path: &str, _query: &Query, cancel: &CancelToken) -> Result<Value, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let state = self.state.lock().await;
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match segments.as_slice() {
            ["instance", "v1", "zones", zone, "servers"] => listing(
                "servers",
                state.instances.iter().filter(|i| i.zone == *zone).collect(),
            ),
            ["containers", "v1beta1", "regions", region, "namespaces"] => listing(
                "namespaces",
                state.namespaces.iter().filter(|n| n.region == *region).collect(),
            ),
            ["containers", "v1beta1", "regions", region, "containers"] => listing(
                "containers",
                state.containers.iter().filter(|c| c.region == *region).collect(),
            ),
            ["containers", "v1beta1", "regions", region, "domains"] => {
                let in_region = |domain: &&ContainerDomain| {
                    state
                        .containers
                        .iter()
                        .any(|c| c.id == domain.container_id && c.region == *region)
                };
                listing("domains", state.domains.iter().filter(in_region).collect())
            },
            ["containers", "v1beta1", "regions", _, "containers", id, "logs"] => {
                let container = state
                    .containers
                    .iter()
                    .find(|c| c.id == *id)
                    .ok_or_else(|| not_found(path))?;
                let logs = fixtures::logs(container);
                listing("logs", logs.iter().collect())
            },
            ["rdb", "v1", "regions", region, "instances"] => listing(
                "instances",
                state.databases.iter().filter(|d| d.region == *region).collect(),
            ),
            ["redis", "v1", "zones", zone, "clusters"] => listing(
                "clusters",
                state.clusters.iter().filter(|c| c.zone == *zone).collect(),
            ),
            _ => Err(not_found(path)),
        }
    }

    async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        cancel: &CancelToken,
    ) -> Result<Value, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let mut state = self.state.lock().await;
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match segments.as_slice() {
            ["instance", "v1", "zones", _, "servers", id, "action"] => {
                let action: InstanceAction = body
                    .and_then(|b| b.get("action"))
                    .cloned()
                    .map(serde_json::from_value::<InstanceAction>)
                    .transpose()
                    .map_err(|e| ApiError::Decode(e.to_string()))?
                    .unwrap_or(InstanceAction::Other);

                let instance = state
                    .instances
                    .iter_mut()
                    .find(|i| i.id == *id)
                    .ok_or_else(|| not_found(path))?;

                if !instance.allows(action) {
                    return Err(ApiError::Api {
                        status: 400,
                        message: format!(
                            "action {} not allowed in state {}",
                            action.as_str(),
                            instance.state.as_str()
                        ),
                    });
                }

                instance.state = match action {
                    InstanceAction::PowerOff => InstanceState::Stopped,
                    _ => InstanceState::Running,
                };
                instance.allowed_actions = fixtures::allowed_actions(instance.state);

                Ok(json!({ "task": { "description": action.as_str(), "status": "success" } }))
            },
            ["containers", "v1beta1", "regions", _, "containers", id, "deploy"] => {
                let container = state
                    .containers
                    .iter()
                    .find(|c| c.id == *id)
                    .ok_or_else(|| not_found(path))?;
                serde_json::to_value(container).map_err(|e| ApiError::Decode(e.to_string()))
            },
            _ => Err(not_found(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{FetchPolicy, ResourceFetcher};

    fn fetcher() -> ResourceFetcher {
        ResourceFetcher::new(Arc::new(FixtureTransport::new()))
    }

    #[tokio::test]
    async fn test_fixture_containers_join() {
        let views = fetcher()
            .fetch_namespace_views(&CancelToken::never())
            .await
            .unwrap();
        assert_eq!(views.items.len(), 2);
        assert_eq!(views.items[0].containers.len(), 2);
        assert!(!views.is_partial());
    }

    #[tokio::test]
    async fn test_power_off_changes_state_and_actions() {
        let fetcher = fetcher();
        let cancel = CancelToken::never();
        let web = fetcher.list_instances(&cancel).await.unwrap().items[0].clone();
        assert_eq!(web.state, InstanceState::Running);

        fetcher.power_off_instance(&web, &cancel).await.unwrap();

        let web = fetcher.list_instances(&cancel).await.unwrap().items[0].clone();
        assert_eq!(web.state, InstanceState::Stopped);
        assert!(web.allows(InstanceAction::PowerOn));
        assert!(fetcher.power_off_instance(&web, &cancel).await.is_err());
    }

    #[tokio::test]
    async fn test_logs_and_unknown_paths() {
        let fetcher = fetcher().with_policy(FetchPolicy::CollectPartial);
        let cancel = CancelToken::never();
        let api = fixtures::containers()[2].clone();

        let logs = fetcher.container_logs(&api, &cancel).await.unwrap();
        assert_eq!(logs.len(), 3);

        let err = FixtureTransport::new()
            .get("/unknown", &[], &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let (handle, token) = CancelToken::pair();
        handle.cancel();
        let err = FixtureTransport::new()
            .get("/rdb/v1/regions/fr-par/instances", &[], &token)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Cancelled));
    }
}
