//! Serverless containers
//!
//! Namespaces, containers and domains are listed per region independently,
//! then joined into [`NamespaceView`]s.

use super::fetcher::{take_list, FanOut, ResourceFetcher};
use super::join::{join_containers, NamespaceView};
use super::registry::ResourceKind;
use crate::scw::cancel::CancelToken;
use crate::scw::types::{Container, ContainerDomain, Log, Namespace};
use anyhow::{Context, Result};

fn region_path(region: &str, collection: &str) -> String {
    format!("/containers/v1beta1/regions/{}/{}", region, collection)
}

fn container_path(container: &Container) -> String {
    format!(
        "{}/{}",
        region_path(&container.region, "containers"),
        urlencoding::encode(&container.id)
    )
}

impl ResourceFetcher {
    pub async fn list_namespaces(&self, cancel: &CancelToken) -> Result<FanOut<Namespace>> {
        self.list_all(
            ResourceKind::Containers,
            |region| region_path(region, "namespaces"),
            "namespaces",
            cancel,
        )
        .await
    }

    pub async fn list_containers(&self, cancel: &CancelToken) -> Result<FanOut<Container>> {
        self.list_all(
            ResourceKind::Containers,
            |region| region_path(region, "containers"),
            "containers",
            cancel,
        )
        .await
    }

    pub async fn list_domains(&self, cancel: &CancelToken) -> Result<FanOut<ContainerDomain>> {
        self.list_all(
            ResourceKind::Containers,
            |region| region_path(region, "domains"),
            "domains",
            cancel,
        )
        .await
    }

    /// Fetch the three collections concurrently and group them by namespace
    pub async fn fetch_namespace_views(
        &self,
        cancel: &CancelToken,
    ) -> Result<FanOut<NamespaceView>> {
        let (namespaces, containers, domains) = tokio::try_join!(
            self.list_namespaces(cancel),
            self.list_containers(cancel),
            self.list_domains(cancel),
        )?;

        let mut failures = namespaces.failures;
        failures.extend(containers.failures);
        failures.extend(domains.failures);

        Ok(FanOut {
            items: join_containers(namespaces.items, containers.items, domains.items),
            failures,
        })
    }

    /// Trigger a new deployment of the container in its own region
    pub async fn deploy_container(&self, container: &Container, cancel: &CancelToken) -> Result<()> {
        let path = format!("{}/deploy", container_path(container));
        tracing::info!("Deploying container {} ({})", container.name, container.region);

        self.transport()
            .post(&path, None, cancel)
            .await
            .with_context(|| format!("Failed to deploy {}", container.name))?;
        Ok(())
    }

    /// Recent logs of one container
    pub async fn container_logs(&self, container: &Container, cancel: &CancelToken) -> Result<Vec<Log>> {
        let path = format!("{}/logs", container_path(container));

        let mut response = self
            .transport()
            .get(&path, &[], cancel)
            .await
            .with_context(|| format!("Failed to fetch logs of {}", container.name))?;

        let logs = take_list(&mut response, "logs")?;
        Ok(logs)
    }
}
