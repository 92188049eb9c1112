//! Container join
//!
//! Groups containers under their namespace and domains under their container.
//! Records whose parent was not fetched in the same batch are dropped.

use crate::scw::types::{Container, ContainerDomain, Namespace};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerView {
    #[serde(flatten)]
    pub container: Container,
    pub domains: Vec<ContainerDomain>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceView {
    #[serde(flatten)]
    pub namespace: Namespace,
    pub containers: Vec<ContainerView>,
}

/// Hash join preserving the input order of every collection
pub fn join_containers(
    namespaces: Vec<Namespace>,
    containers: Vec<Container>,
    domains: Vec<ContainerDomain>,
) -> Vec<NamespaceView> {
    let mut domains_by_container: HashMap<String, Vec<ContainerDomain>> = HashMap::new();
    for domain in domains {
        domains_by_container
            .entry(domain.container_id.clone())
            .or_default()
            .push(domain);
    }

    let mut containers_by_namespace: HashMap<String, Vec<ContainerView>> = HashMap::new();
    for container in containers {
        let domains = domains_by_container
            .remove(&container.id)
            .unwrap_or_default();
        containers_by_namespace
            .entry(container.namespace_id.clone())
            .or_default()
            .push(ContainerView { container, domains });
    }

    let joined: Vec<NamespaceView> = namespaces
        .into_iter()
        .map(|namespace| NamespaceView {
            containers: containers_by_namespace
                .remove(&namespace.id)
                .unwrap_or_default(),
            namespace,
        })
        .collect();

    let orphans: usize = containers_by_namespace.values().map(Vec::len).sum();
    if orphans > 0 {
        tracing::debug!("Dropped {} containers without a fetched namespace", orphans);
    }

    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::fixtures;

    #[test]
    fn test_join_fixture_data() {
        let views = join_containers(
            fixtures::namespaces(),
            fixtures::containers(),
            fixtures::domains(),
        );

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].namespace.name, "production");
        let names: Vec<_> = views[0]
            .containers
            .iter()
            .map(|c| c.container.name.as_str())
            .collect();
        assert_eq!(names, ["website", "documentation"]);
        assert_eq!(views[0].containers[0].domains[0].hostname, "company.com");
        assert_eq!(views[1].containers[0].container.name, "api");
    }

    #[test]
    fn test_orphans_are_dropped() {
        let mut containers = fixtures::containers();
        containers[2].namespace_id = "gone".to_string();
        let mut domains = fixtures::domains();
        domains[0].container_id = "gone".to_string();

        let views = join_containers(fixtures::namespaces(), containers, domains);

        assert!(views[1].containers.is_empty());
        assert!(views[0].containers[0].domains.is_empty());
        assert_eq!(views[0].containers[1].domains.len(), 1);
    }

    #[test]
    fn test_serializes_flattened() {
        let views = join_containers(
            fixtures::namespaces(),
            fixtures::containers(),
            fixtures::domains(),
        );
        let value = serde_json::to_value(&views[0]).unwrap();
        assert_eq!(value["name"], "production");
        assert_eq!(value["containers"][0]["domains"][0]["url"], "https://company.com");
    }
}
