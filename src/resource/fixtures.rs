//! Canned resources served in fake-data mode

use crate::scw::types::*;

const PRODUCTION_NS: &str = "4a1a9390-7f17-44ea-9416-b9c35624b53f";
const BETA_NS: &str = "d6f768da-f669-498a-a218-78c1a8b2f02a";
const WEBSITE: &str = "9c917bec-c020-468b-8a17-3a3cdff64823";
const DOCUMENTATION: &str = "c9c0091e-cb5b-44ac-bc9f-8b5d2e3001df";
const API: &str = "1b16216a-81a5-4b85-b7fc-52842729c5c3";

pub fn namespaces() -> Vec<Namespace> {
    vec![
        Namespace {
            id: PRODUCTION_NS.into(),
            name: "production".into(),
            region: "fr-par".into(),
            description: Some("Production namespace".into()),
            status: ContainerStatus::Ready,
        },
        Namespace {
            id: BETA_NS.into(),
            name: "beta".into(),
            region: "fr-par".into(),
            description: Some("Beta namespace for testing".into()),
            status: ContainerStatus::Ready,
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn container(
    id: &str,
    name: &str,
    namespace_id: &str,
    status: ContainerStatus,
    scale: (u32, u32),
    limits: (u32, u32),
    timeout: &str,
    description: &str,
) -> Container {
    Container {
        id: id.into(),
        name: name.into(),
        namespace_id: namespace_id.into(),
        status,
        min_scale: scale.0,
        max_scale: scale.1,
        memory_limit: limits.0,
        cpu_limit: limits.1,
        timeout: Some(timeout.into()),
        error_message: None,
        privacy: Privacy::Public,
        description: Some(description.into()),
        registry_image: format!("rg.fr-par.scw.cloud/company/{}:latest", name),
        max_concurrency: 80,
        domain_name: format!("{}.functions.fnc.fr-par.scw.cloud", name),
        protocol: "unknown_protocol".into(),
        port: 8080,
        region: "fr-par".into(),
    }
}

pub fn containers() -> Vec<Container> {
    let mut api = container(
        API,
        "api",
        BETA_NS,
        ContainerStatus::Error,
        (1, 1),
        (512, 280),
        "300s",
        "Beta API container",
    );
    api.error_message = Some("Error: Cannot find module '@company/types'".into());

    vec![
        container(
            WEBSITE,
            "website",
            PRODUCTION_NS,
            ContainerStatus::Ready,
            (1, 5),
            (1024, 560),
            "300s",
            "Website container for the company",
        ),
        container(
            DOCUMENTATION,
            "documentation",
            PRODUCTION_NS,
            ContainerStatus::Ready,
            (1, 2),
            (512, 280),
            "600s",
            "Application documentation",
        ),
        api,
    ]
}

pub fn domains() -> Vec<ContainerDomain> {
    [
        ("2a2c5d0f-c867-42cb-861a-41f87dc2a78c", "company.com", WEBSITE),
        ("9e8ecdde-29e3-4deb-acad-06eb6b541119", "docs.company.com", DOCUMENTATION),
        ("c57a298b-76d3-4f18-875f-dec1a655e3ee", "api.company.com", API),
    ]
    .into_iter()
    .map(|(id, hostname, container_id)| ContainerDomain {
        id: id.into(),
        hostname: hostname.into(),
        container_id: container_id.into(),
        url: format!("https://{}", hostname),
    })
    .collect()
}

pub fn logs(container: &Container) -> Vec<Log> {
    let mut logs = vec![
        Log {
            id: format!("{}-1", container.id),
            message: format!("Starting {} on port {}", container.name, container.port),
            timestamp: "2024-03-01T10:30:00Z".into(),
            level: Some("info".into()),
            source: Some("core".into()),
            stream: Some("stdout".into()),
        },
        Log {
            id: format!("{}-2", container.id),
            message: r#"{"method":"GET","path":"/","status":200,"duration_ms":3}"#.into(),
            timestamp: "2024-03-01T10:30:02Z".into(),
            level: Some("info".into()),
            source: Some("user".into()),
            stream: Some("stdout".into()),
        },
    ];
    if let Some(error) = &container.error_message {
        logs.push(Log {
            id: format!("{}-3", container.id),
            message: error.clone(),
            timestamp: "2024-03-01T10:30:05Z".into(),
            level: Some("error".into()),
            source: Some("user".into()),
            stream: Some("stderr".into()),
        });
    }
    logs
}

pub fn instances() -> Vec<Instance> {
    let instance = |id: &str, name: &str, zone: &str, state: InstanceState, ip: &str| Instance {
        id: id.into(),
        name: name.into(),
        zone: zone.into(),
        state,
        allowed_actions: allowed_actions(state),
        commercial_type: Some("PLAY2-NANO".into()),
        public_ip: Some(PublicIp { address: ip.into() }),
        image: Some(ServerImage {
            name: "Ubuntu 22.04 Jammy Jellyfish".into(),
        }),
        tags: vec!["company".into()],
        creation_date: Some("2024-01-15T09:00:00Z".into()),
    };

    vec![
        instance("7f3c56a4-7f6e-4f0f-a6a5-9a3a8d0c1e11", "web-1", "fr-par-1", InstanceState::Running, "51.15.10.1"),
        instance("0c2b8e5d-3a7b-4d4e-9f0c-6e1d2a3b4c22", "worker", "fr-par-2", InstanceState::Stopped, "51.15.20.2"),
        instance("5d4e3f2a-1b0c-4a9b-8c7d-6e5f4a3b2c33", "bastion", "nl-ams-1", InstanceState::Running, "51.158.0.3"),
    ]
}

/// Power actions available in a given state
pub fn allowed_actions(state: InstanceState) -> Vec<InstanceAction> {
    match state {
        InstanceState::Running => vec![InstanceAction::PowerOff, InstanceAction::Reboot],
        InstanceState::Stopped | InstanceState::StoppedInPlace => vec![InstanceAction::PowerOn],
        _ => Vec::new(),
    }
}

pub fn databases() -> Vec<Database> {
    vec![
        Database {
            id: "3e2d1c0b-9a8f-4e7d-8c6b-5a4f3e2d1c44".into(),
            name: "company-main".into(),
            region: "fr-par".into(),
            status: DatabaseStatus::Ready,
            engine: Some("PostgreSQL-15".into()),
            node_type: Some("db-dev-s".into()),
            endpoints: vec![DatabaseEndpoint {
                ip: Some("51.159.10.10".into()),
                port: Some(5432),
            }],
            volume: Some(DatabaseVolume {
                size: 10_000_000_000,
                volume_type: Some("lssd".into()),
            }),
        },
        Database {
            id: "8b7a6f5e-4d3c-4b2a-9f8e-7d6c5b4a3f55".into(),
            name: "analytics".into(),
            region: "nl-ams".into(),
            status: DatabaseStatus::Backuping,
            engine: Some("MySQL-8".into()),
            node_type: Some("db-gp-xs".into()),
            endpoints: Vec::new(),
            volume: Some(DatabaseVolume {
                size: 50_000_000_000,
                volume_type: Some("bssd".into()),
            }),
        },
    ]
}

pub fn redis_clusters() -> Vec<RedisCluster> {
    vec![RedisCluster {
        id: "6a5b4c3d-2e1f-4a0b-9c8d-7e6f5a4b3c66".into(),
        name: "sessions".into(),
        zone: "fr-par-1".into(),
        status: RedisClusterStatus::Ready,
        version: Some("7.0.5".into()),
        node_type: Some("RED1-MICRO".into()),
        cluster_size: Some(1),
        tls_enabled: true,
    }]
}
