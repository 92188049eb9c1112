//! Property-based tests using proptest
//!
//! These tests verify the container join, the status mappings, the display
//! helpers and the list filter using randomized inputs.

use proptest::prelude::*;
use serde_json::json;
use tscw::app::Resource;
use tscw::resource::display::{bytes_to_size, country_flag, log_markdown};
use tscw::resource::join_containers;
use tscw::resource::status::{container_status, database_status, instance_state, redis_status, StatusIcon};
use tscw::scw::types::{
    Container, ContainerDomain, ContainerStatus, DatabaseStatus, Instance, InstanceState, Log,
    Namespace, RedisClusterStatus,
};

fn namespace(idx: usize) -> Namespace {
    serde_json::from_value(json!({
        "id": format!("ns-{}", idx),
        "name": format!("namespace-{}", idx),
        "region": "fr-par",
        "status": "ready"
    }))
    .unwrap()
}

fn container(idx: usize, namespace_idx: usize) -> Container {
    serde_json::from_value(json!({
        "id": format!("c-{}", idx),
        "name": format!("container-{}", idx),
        "namespace_id": format!("ns-{}", namespace_idx),
        "status": "ready",
        "privacy": "public",
        "region": "fr-par"
    }))
    .unwrap()
}

fn domain(idx: usize, container_idx: usize) -> ContainerDomain {
    ContainerDomain {
        id: format!("d-{}", idx),
        hostname: format!("host-{}.example.com", idx),
        container_id: format!("c-{}", container_idx),
        url: String::new(),
    }
}

/// Namespace count, container parents and domain parents (indices may dangle)
fn arb_join_input() -> impl Strategy<Value = (usize, Vec<usize>, Vec<usize>)> {
    (0usize..8).prop_flat_map(|namespaces| {
        (
            Just(namespaces),
            prop::collection::vec(0usize..10, 0..30),
            prop::collection::vec(0usize..40, 0..30),
        )
    })
}

fn arb_status_string() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ready".to_string()),
        Just("error".to_string()),
        Just("running".to_string()),
        Just("stopped in place".to_string()),
        Just("disk_full".to_string()),
        Just("backuping".to_string()),
        Just("suspended".to_string()),
        "[a-z_ ]{0,16}",
    ]
}

proptest! {
    /// Namespaces come out in input order, including empty ones
    #[test]
    fn join_preserves_namespace_order((ns_count, parents, domain_parents) in arb_join_input()) {
        let namespaces: Vec<_> = (0..ns_count).map(namespace).collect();
        let containers: Vec<_> = parents.iter().enumerate().map(|(i, p)| container(i, *p)).collect();
        let domains: Vec<_> = domain_parents.iter().enumerate().map(|(i, p)| domain(i, *p)).collect();

        let views = join_containers(namespaces.clone(), containers, domains);
        let ids: Vec<_> = views.iter().map(|v| v.namespace.id.clone()).collect();
        let expected: Vec<_> = namespaces.iter().map(|n| n.id.clone()).collect();
        prop_assert_eq!(ids, expected);
    }

    /// Every container lands under its own namespace; orphans are dropped
    #[test]
    fn join_groups_by_parent((ns_count, parents, domain_parents) in arb_join_input()) {
        let namespaces: Vec<_> = (0..ns_count).map(namespace).collect();
        let containers: Vec<_> = parents.iter().enumerate().map(|(i, p)| container(i, *p)).collect();
        let domains: Vec<_> = domain_parents.iter().enumerate().map(|(i, p)| domain(i, *p)).collect();

        let views = join_containers(namespaces, containers, domains);

        let kept: usize = views.iter().map(|v| v.containers.len()).sum();
        let expected = parents.iter().filter(|p| **p < ns_count).count();
        prop_assert_eq!(kept, expected);

        for view in &views {
            // Containers keep their relative input order
            let indices: Vec<usize> = view
                .containers
                .iter()
                .map(|c| c.container.id.trim_start_matches("c-").parse().unwrap())
                .collect();
            let mut sorted = indices.clone();
            sorted.sort_unstable();
            prop_assert_eq!(&indices, &sorted);

            for c in &view.containers {
                prop_assert_eq!(&c.container.namespace_id, &view.namespace.id);
                for d in &c.domains {
                    prop_assert_eq!(&d.container_id, &c.container.id);
                }
            }
        }
    }

    /// Any status string decodes and maps to a capitalized tooltip
    #[test]
    fn status_mapping_is_total(raw in arb_status_string()) {
        let container: ContainerStatus = serde_json::from_value(json!(raw)).unwrap();
        let instance: InstanceState = serde_json::from_value(json!(raw)).unwrap();
        let database: DatabaseStatus = serde_json::from_value(json!(raw)).unwrap();
        let redis: RedisClusterStatus = serde_json::from_value(json!(raw)).unwrap();

        for presentation in [
            container_status(container),
            instance_state(instance),
            database_status(database),
            redis_status(redis),
        ] {
            prop_assert!(!presentation.tooltip.is_empty());
            let first = presentation.tooltip.chars().next().unwrap();
            prop_assert!(!first.is_lowercase());
            if presentation.icon == StatusIcon::QuestionMark {
                prop_assert!(presentation.tint.is_none());
            }
        }
    }

    /// Log markdown is always a single fenced block
    #[test]
    fn log_markdown_is_fenced(message in ".{0,200}") {
        let log = Log {
            id: "log-1".to_string(),
            message,
            timestamp: "2024-03-01T10:30:00Z".to_string(),
            level: None,
            source: None,
            stream: None,
        };
        let markdown = log_markdown(&log);
        prop_assert!(markdown.starts_with("```\n"));
        prop_assert!(markdown.ends_with("\n```"));
    }

    /// JSON messages are re-indented with tabs without losing data
    #[test]
    fn log_markdown_pretty_prints_json(key in "[a-z]{1,8}", value in 0i64..1_000_000) {
        let mut object = serde_json::Map::new();
        object.insert(key.clone(), json!(value));
        let raw = serde_json::Value::Object(object).to_string();
        let log = Log {
            id: "log-1".to_string(),
            message: raw,
            timestamp: "2024-03-01T10:30:00Z".to_string(),
            level: None,
            source: None,
            stream: None,
        };
        let markdown = log_markdown(&log);
        let expected = format!("\t\"{}\": {}", key, value);
        prop_assert!(markdown.contains(&expected));
    }

    /// Sizes always carry a known unit
    #[test]
    fn bytes_to_size_has_unit(bytes in any::<u64>()) {
        let text = bytes_to_size(bytes);
        let unit = text.rsplit(' ').next().unwrap();
        prop_assert!(["Byte", "Bytes", "Ko", "Mo", "Go", "To", "Po"].contains(&unit));
    }

    /// Flags are two regional indicator symbols or the white flag
    #[test]
    fn country_flag_is_well_formed(region in "[a-zA-Z0-9-]{0,10}") {
        let flag = country_flag(&region);
        let regional = flag
            .chars()
            .all(|c| ('\u{1F1E6}'..='\u{1F1FF}').contains(&c));
        prop_assert!(flag == "🏳" || (flag.chars().count() == 2 && regional));
    }

    /// Filtering by the exact name always matches, case-insensitively
    #[test]
    fn filter_matches_own_name(name in "[a-zA-Z][a-zA-Z0-9-]{0,30}") {
        let instance: Instance = serde_json::from_value(json!({
            "id": "7f3c56a4-7f6e-4f0f-a6a5-9a3a8d0c1e11",
            "name": name,
            "zone": "fr-par-1",
            "state": "running"
        }))
        .unwrap();
        let resource = Resource::Instance(instance);

        prop_assert!(resource.matches(""));
        prop_assert!(resource.matches(&name.to_uppercase()));
        prop_assert!(resource.matches(&name.to_lowercase()));
    }
}
