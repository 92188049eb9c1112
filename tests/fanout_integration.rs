//! Integration tests for the region/zone fan-out using wiremock
//!
//! These tests run the live client against mocked Scaleway endpoints and
//! check request counts, ordering, pagination and failure policies.

use serde_json::json;
use std::sync::Arc;
use tscw::app::{App, Mode};
use tscw::config::Config;
use tscw::resource::{FetchPolicy, PartitionTable, ResourceFetcher, ResourceKind};
use tscw::scw::cancel::CancelToken;
use tscw::scw::client::ScwClient;
use tscw::scw::http::ApiError;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET_KEY: &str = "11111111-2222-3333-4444-555555555555";

fn fetcher(server: &MockServer, kind: ResourceKind, partitions: &[&str]) -> ResourceFetcher {
    let client = ScwClient::new(SECRET_KEY, &server.uri()).expect("client");
    let mut table = PartitionTable::defaults();
    table.set(kind, partitions.iter().map(|p| p.to_string()).collect());
    ResourceFetcher::new(Arc::new(client)).with_partitions(table)
}

fn server(name: &str, zone: &str) -> serde_json::Value {
    json!({
        "id": format!("id-{}", name),
        "name": name,
        "zone": zone,
        "state": "running",
        "allowed_actions": ["poweroff", "reboot", "backup"]
    })
}

fn servers_body(servers: Vec<serde_json::Value>) -> serde_json::Value {
    let total = servers.len();
    json!({ "servers": servers, "total_count": total })
}

/// Fan-out request tests
mod fanout_tests {
    use super::*;

    /// One request per zone, merged in zone order
    #[tokio::test]
    async fn test_one_request_per_zone_in_order() {
        let server = MockServer::start().await;

        for (zone, name) in [("fr-par-1", "a"), ("nl-ams-1", "b"), ("pl-waw-1", "c")] {
            Mock::given(method("GET"))
                .and(path(format!("/instance/v1/zones/{}/servers", zone)))
                .and(header("X-Auth-Token", SECRET_KEY))
                .and(query_param("page", "1"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(servers_body(vec![super::server(name, zone)])),
                )
                .expect(1)
                .mount(&server)
                .await;
        }

        let fetcher = fetcher(&server, ResourceKind::Instances, &["fr-par-1", "nl-ams-1", "pl-waw-1"]);
        let result = fetcher.list_instances(&CancelToken::never()).await.unwrap();

        let names: Vec<_> = result.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(!result.is_partial());
    }

    /// Later pages are requested until total_count is reached
    #[tokio::test]
    async fn test_follows_pages_until_total_count() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/instance/v1/zones/fr-par-1/servers"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "servers": [super::server("a", "fr-par-1"), super::server("b", "fr-par-1")],
                "total_count": 3
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/instance/v1/zones/fr-par-1/servers"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "servers": [super::server("c", "fr-par-1")],
                "total_count": 3
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, ResourceKind::Instances, &["fr-par-1"]).with_page_size(2);
        let result = fetcher.list_instances(&CancelToken::never()).await.unwrap();
        assert_eq!(result.items.len(), 3);
        assert_eq!(result.items[2].name, "c");
    }

    /// The organization filter is sent with every listing
    #[tokio::test]
    async fn test_sends_organization_filter() {
        let server = MockServer::start().await;
        let org = "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee";

        Mock::given(method("GET"))
            .and(path("/rdb/v1/regions/fr-par/instances"))
            .and(query_param("organization_id", org))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "instances": [], "total_count": 0 })))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, ResourceKind::Databases, &["fr-par"])
            .with_organization(Some(org.to_string()));
        let result = fetcher.list_databases(&CancelToken::never()).await.unwrap();
        assert!(result.items.is_empty());
    }
}

/// Failure policy tests
mod policy_tests {
    use super::*;

    async fn mount_mixed(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/instance/v1/zones/fr-par-1/servers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(servers_body(vec![super::server("ok", "fr-par-1")])))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/instance/v1/zones/fr-par-2/servers"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({ "message": "zone is unavailable" })),
            )
            .mount(server)
            .await;
    }

    /// Fail-fast: one failing zone fails the whole listing
    #[tokio::test]
    async fn test_fail_fast_reports_failing_zone() {
        let server = MockServer::start().await;
        mount_mixed(&server).await;

        let fetcher = fetcher(&server, ResourceKind::Instances, &["fr-par-1", "fr-par-2"]);
        let err = fetcher
            .list_instances(&CancelToken::never())
            .await
            .expect_err("listing should fail");

        assert!(format!("{:#}", err).contains("fr-par-2"));
        let api = err
            .chain()
            .find_map(|e| e.downcast_ref::<ApiError>())
            .expect("api error in chain");
        assert_eq!(api.status(), Some(503));
    }

    /// Collect-partial: successful zones are kept next to the failures
    #[tokio::test]
    async fn test_collect_partial_keeps_successes() {
        let server = MockServer::start().await;
        mount_mixed(&server).await;

        let fetcher = fetcher(&server, ResourceKind::Instances, &["fr-par-1", "fr-par-2"])
            .with_policy(FetchPolicy::CollectPartial);
        let result = fetcher.list_instances(&CancelToken::never()).await.unwrap();

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].partition, "fr-par-2");
        assert_eq!(result.failures[0].error.status(), Some(503));
    }
}

/// Every listing issues one request per configured partition
mod per_kind_fanout_tests {
    use super::*;

    async fn mount_listing(server: &MockServer, route: String, field: &str, items: Vec<serde_json::Value>) {
        let total = items.len();
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), json!(items));
        body.insert("total_count".to_string(), json!(total));

        Mock::given(method("GET"))
            .and(path(route))
            .and(header("X-Auth-Token", SECRET_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Object(body)))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_databases_one_request_per_region() {
        let server = MockServer::start().await;
        let regions = ["fr-par", "nl-ams", "pl-waw"];
        for region in regions {
            let db = json!({ "id": format!("db-{}", region), "name": format!("main-{}", region), "region": region, "status": "ready" });
            mount_listing(&server, format!("/rdb/v1/regions/{}/instances", region), "instances", vec![db]).await;
        }

        let fetcher = fetcher(&server, ResourceKind::Databases, &regions);
        let databases = fetcher.list_databases(&CancelToken::never()).await.unwrap().into_items();

        let names: Vec<_> = databases.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["main-fr-par", "main-nl-ams", "main-pl-waw"]);
    }

    #[tokio::test]
    async fn test_clusters_one_request_per_zone() {
        let server = MockServer::start().await;
        let zones = ["fr-par-1", "fr-par-2", "nl-ams-1", "pl-waw-1"];
        for zone in zones {
            let cluster = json!({ "id": format!("rc-{}", zone), "name": format!("cache-{}", zone), "zone": zone, "status": "ready" });
            mount_listing(&server, format!("/redis/v1/zones/{}/clusters", zone), "clusters", vec![cluster]).await;
        }

        let fetcher = fetcher(&server, ResourceKind::Redis, &zones);
        let clusters = fetcher.list_clusters(&CancelToken::never()).await.unwrap().into_items();

        let found: Vec<_> = clusters.iter().map(|c| c.zone.as_str()).collect();
        assert_eq!(found, zones);
    }

    #[tokio::test]
    async fn test_container_collections_one_request_per_region() {
        let server = MockServer::start().await;
        let regions = ["fr-par", "nl-ams", "pl-waw"];
        for region in regions {
            let namespace = json!({ "id": format!("ns-{}", region), "name": region, "region": region, "status": "ready" });
            let container = json!({
                "id": format!("c-{}", region), "name": format!("app-{}", region),
                "namespace_id": format!("ns-{}", region), "status": "ready",
                "privacy": "public", "region": region
            });
            let domain = json!({ "id": format!("d-{}", region), "hostname": format!("{}.example.com", region), "container_id": format!("c-{}", region) });

            let base = format!("/containers/v1beta1/regions/{}", region);
            mount_listing(&server, format!("{}/namespaces", base), "namespaces", vec![namespace]).await;
            mount_listing(&server, format!("{}/containers", base), "containers", vec![container]).await;
            mount_listing(&server, format!("{}/domains", base), "domains", vec![domain]).await;
        }

        let fetcher = fetcher(&server, ResourceKind::Containers, &regions);
        let cancel = CancelToken::never();
        let namespaces = fetcher.list_namespaces(&cancel).await.unwrap().into_items();
        let containers = fetcher.list_containers(&cancel).await.unwrap().into_items();
        let domains = fetcher.list_domains(&cancel).await.unwrap().into_items();

        let ns_regions: Vec<_> = namespaces.iter().map(|n| n.region.as_str()).collect();
        assert_eq!(ns_regions, regions);
        let container_regions: Vec<_> = containers.iter().map(|c| c.region.as_str()).collect();
        assert_eq!(container_regions, regions);
        assert_eq!(domains.len(), 3);
        assert_eq!(domains[2].hostname, "pl-waw.example.com");
    }
}

/// Serverless containers tests
mod container_tests {
    use super::*;

    async fn mount_empty_region(server: &MockServer, region: &str, expected_gets: u64) {
        for collection in ["namespaces", "containers", "domains"] {
            Mock::given(method("GET"))
                .and(path(format!("/containers/v1beta1/regions/{}/{}", region, collection)))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_count": 0 })))
                .expect(expected_gets)
                .mount(server)
                .await;
        }
    }

    async fn mount_fr_par(server: &MockServer, expected_gets: u64) {
        let bodies = [
            (
                "namespaces",
                json!({
                    "namespaces": [
                        { "id": "ns-1", "name": "production", "region": "fr-par", "status": "ready" },
                        { "id": "ns-2", "name": "empty", "region": "fr-par", "status": "ready" }
                    ],
                    "total_count": 2
                }),
            ),
            (
                "containers",
                json!({
                    "containers": [
                        {
                            "id": "c-1", "name": "website", "namespace_id": "ns-1",
                            "status": "ready", "privacy": "public", "region": "fr-par",
                            "registry_image": "rg.fr-par.scw.cloud/company/website:latest"
                        },
                        {
                            "id": "c-2", "name": "orphan", "namespace_id": "ns-gone",
                            "status": "ready", "privacy": "private", "region": "fr-par"
                        }
                    ],
                    "total_count": 2
                }),
            ),
            (
                "domains",
                json!({
                    "domains": [{ "id": "d-1", "hostname": "company.com", "container_id": "c-1" }],
                    "total_count": 1
                }),
            ),
        ];

        for (collection, body) in bodies {
            Mock::given(method("GET"))
                .and(path(format!("/containers/v1beta1/regions/fr-par/{}", collection)))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(expected_gets)
                .mount(server)
                .await;
        }
    }

    /// Only fr-par is populated; empty namespaces are kept and orphans dropped
    #[tokio::test]
    async fn test_join_across_regions() {
        let server = MockServer::start().await;
        mount_fr_par(&server, 1).await;
        mount_empty_region(&server, "nl-ams", 1).await;
        mount_empty_region(&server, "pl-waw", 1).await;

        let fetcher = fetcher(&server, ResourceKind::Containers, &["fr-par", "nl-ams", "pl-waw"]);
        let views = fetcher
            .fetch_namespace_views(&CancelToken::never())
            .await
            .unwrap()
            .into_items();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].namespace.name, "production");
        assert_eq!(views[0].containers.len(), 1);
        assert_eq!(views[0].containers[0].domains[0].hostname, "company.com");
        assert!(views[1].containers.is_empty());
    }

    /// A confirmed deploy sends one POST, then re-lists every region exactly once
    #[tokio::test]
    async fn test_deploy_then_single_refetch() {
        let server = MockServer::start().await;
        mount_fr_par(&server, 2).await;
        mount_empty_region(&server, "nl-ams", 2).await;
        mount_empty_region(&server, "pl-waw", 2).await;

        Mock::given(method("POST"))
            .and(path("/containers/v1beta1/regions/fr-par/containers/c-1/deploy"))
            .and(header("X-Auth-Token", SECRET_KEY))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "c-1" })))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, ResourceKind::Containers, &["fr-par", "nl-ams", "pl-waw"]);
        let mut app = App::new(fetcher, ResourceKind::Containers, Config::default(), false);
        app.refresh_now().await;
        assert_eq!(app.selected_item().unwrap().name(), "website");

        assert!(app.trigger_shortcut('n').await.unwrap());
        assert_eq!(app.mode, Mode::Confirm);
        app.confirm_pending_action(true).await;
        app.finish_fetch().await;

        assert!(app.error_message.is_none());
        assert_eq!(app.namespaces.len(), 2);
    }

    /// A failed deploy keeps the listed data and reports the error
    #[tokio::test]
    async fn test_failed_deploy_keeps_data() {
        let server = MockServer::start().await;
        mount_fr_par(&server, 1).await;

        Mock::given(method("POST"))
            .and(path("/containers/v1beta1/regions/fr-par/containers/c-1/deploy"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({ "message": "container is already deploying" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, ResourceKind::Containers, &["fr-par"]);
        let mut app = App::new(fetcher, ResourceKind::Containers, Config::default(), false);
        app.refresh_now().await;

        app.trigger_shortcut('n').await.unwrap();
        app.confirm_pending_action(true).await;

        assert!(!app.loading);
        assert_eq!(app.items.len(), 1);
        let notif = app.notification_manager.notifications.front().unwrap();
        assert!(matches!(
            notif.status,
            tscw::notification::NotificationStatus::Error(_)
        ));
    }
}

/// Power action tests
mod instance_action_tests {
    use super::*;

    #[tokio::test]
    async fn test_reboot_posts_action_to_instance_zone() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/instance/v1/zones/nl-ams-1/servers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(servers_body(vec![super::server("web", "nl-ams-1")])))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/instance/v1/zones/nl-ams-1/servers/id-web/action"))
            .and(body_json(json!({ "action": "reboot" })))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "task": { "status": "pending" } })))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, ResourceKind::Instances, &["nl-ams-1"]);
        let instances = fetcher
            .list_instances(&CancelToken::never())
            .await
            .unwrap()
            .into_items();
        fetcher
            .reboot_instance(&instances[0], &CancelToken::never())
            .await
            .unwrap();
    }
}

/// Cancellation tests
mod cancel_tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancelled_listing_resolves_as_cancelled() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/redis/v1/zones/fr-par-1/clusters"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "clusters": [], "total_count": 0 }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let fetcher = fetcher(&server, ResourceKind::Redis, &["fr-par-1"]);
        let (handle, token) = CancelToken::pair();

        let task = tokio::spawn(async move { fetcher.list_clusters(&token).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(handle);

        let err = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("cancel should be prompt")
            .expect("task should not panic")
            .expect_err("listing should be cancelled");
        assert!(err
            .chain()
            .any(|e| matches!(e.downcast_ref::<ApiError>(), Some(ApiError::Cancelled))));
    }
}
