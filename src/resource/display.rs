//! Display helpers
//!
//! Formatting shared by the list, detail and logs views.

use super::registry::{get_resource, ResourceKind};
use crate::scw::types::{Container, Database, Instance, Log, RedisCluster};
use serde::Serialize;
use serde_json::Value;

const SIZE_UNITS: [&str; 6] = ["Bytes", "Ko", "Mo", "Go", "To", "Po"];

/// Flag emoji of the country a region or zone lives in (`fr-par-1` -> 🇫🇷)
pub fn country_flag(region: &str) -> String {
    let code: Vec<char> = region
        .chars()
        .take(2)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if code.len() != 2 || !code.iter().all(|c| c.is_ascii_lowercase()) {
        return "🏳".to_string();
    }

    code.iter()
        .filter_map(|c| char::from_u32(0x1F1E6 + (*c as u32 - 'a' as u32)))
        .collect()
}

/// Registry part of an image reference (`rg.fr-par.scw.cloud/company`)
pub fn registry_name(container: &Container) -> &str {
    match container.registry_image.rfind('/') {
        Some(idx) => &container.registry_image[..idx],
        None => "",
    }
}

/// Image part of an image reference (`website:latest`)
pub fn image_name(container: &Container) -> &str {
    image_of(&container.registry_image)
}

pub(crate) fn image_of(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Human readable size in decimal units
pub fn bytes_to_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Byte".to_string();
    }

    let mut unit = 0;
    let mut scale = 1u64;
    while unit + 1 < SIZE_UNITS.len() && bytes / scale >= 1000 {
        scale *= 1000;
        unit += 1;
    }

    let value = (bytes as f64 / scale as f64).round();
    format!("{} {}", value, SIZE_UNITS[unit])
}

/// Log message as a fenced code block, pretty-printing JSON payloads
pub fn log_markdown(log: &Log) -> String {
    let body = pretty_json(&log.message).unwrap_or_else(|| log.message.clone());
    format!("```\n{}\n```", body)
}

/// Tab-indented rendering of `message` if it parses as JSON
fn pretty_json(message: &str) -> Option<String> {
    let value: Value = serde_json::from_str(message).ok()?;

    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer).ok()?;

    String::from_utf8(out).ok()
}

/// Long form of a log timestamp, or the raw value when it does not parse
pub fn format_timestamp(timestamp: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt
            .with_timezone(&chrono::Utc)
            .format("%A, %B %-d, %Y at %H:%M:%S UTC")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Web console link of a resource
pub fn console_url(kind: ResourceKind, location: &str, id: &str, parent_id: Option<&str>) -> String {
    get_resource(kind)
        .console_url
        .replace("{location}", location)
        .replace("{id}", id)
        .replace("{parent_id}", parent_id.unwrap_or_default())
}

/// Label/value pairs shown in the detail pane
pub type Metadata = Vec<(&'static str, String)>;

fn push_opt(meta: &mut Metadata, label: &'static str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        meta.push((label, value.to_string()));
    }
}

pub fn instance_metadata(instance: &Instance) -> Metadata {
    let mut meta = vec![
        ("ID", instance.id.clone()),
        ("Name", instance.name.clone()),
        ("Zone", format!("{} {}", country_flag(&instance.zone), instance.zone)),
        ("State", instance.state.as_str().to_string()),
    ];
    push_opt(&mut meta, "Type", instance.commercial_type.as_deref());
    push_opt(
        &mut meta,
        "Public IP",
        instance.public_ip.as_ref().map(|ip| ip.address.as_str()),
    );
    push_opt(
        &mut meta,
        "Image",
        instance.image.as_ref().map(|img| img.name.as_str()),
    );
    if !instance.tags.is_empty() {
        meta.push(("Tags", instance.tags.join(", ")));
    }
    push_opt(&mut meta, "Created", instance.creation_date.as_deref());
    meta
}

pub fn container_metadata(container: &Container, hostnames: &[&str]) -> Metadata {
    let mut meta = vec![
        ("ID", container.id.clone()),
        ("Name", container.name.clone()),
        ("Region", format!("{} {}", country_flag(&container.region), container.region)),
        ("Status", container.status.as_str().to_string()),
    ];
    push_opt(&mut meta, "Description", container.description.as_deref());
    push_opt(&mut meta, "Error", container.error_message.as_deref());
    meta.push(("Registry", registry_name(container).to_string()));
    meta.push(("Image", image_name(container).to_string()));
    meta.push((
        "Scale",
        format!("{} - {}", container.min_scale, container.max_scale),
    ));
    meta.push(("Memory", format!("{} MB", container.memory_limit)));
    meta.push(("vCPU", format!("{} mvCPU", container.cpu_limit)));
    push_opt(&mut meta, "Timeout", container.timeout.as_deref());
    meta.push(("Port", container.port.to_string()));
    push_opt(&mut meta, "Endpoint", Some(container.domain_name.as_str()));
    if !hostnames.is_empty() {
        meta.push(("Domains", hostnames.join(", ")));
    }
    meta
}

pub fn database_metadata(database: &Database) -> Metadata {
    let mut meta = vec![
        ("ID", database.id.clone()),
        ("Name", database.name.clone()),
        ("Region", format!("{} {}", country_flag(&database.region), database.region)),
        ("Status", database.status.as_str().to_string()),
    ];
    push_opt(&mut meta, "Engine", database.engine.as_deref());
    push_opt(&mut meta, "Node", database.node_type.as_deref());
    for endpoint in &database.endpoints {
        if let (Some(ip), Some(port)) = (&endpoint.ip, endpoint.port) {
            meta.push(("Endpoint", format!("{}:{}", ip, port)));
        }
    }
    if let Some(volume) = &database.volume {
        meta.push(("Volume", bytes_to_size(volume.size)));
        push_opt(&mut meta, "Volume type", volume.volume_type.as_deref());
    }
    meta
}

pub fn redis_metadata(cluster: &RedisCluster) -> Metadata {
    let mut meta = vec![
        ("ID", cluster.id.clone()),
        ("Name", cluster.name.clone()),
        ("Zone", format!("{} {}", country_flag(&cluster.zone), cluster.zone)),
        ("Status", cluster.status.as_str().to_string()),
    ];
    push_opt(&mut meta, "Version", cluster.version.as_deref());
    push_opt(&mut meta, "Node", cluster.node_type.as_deref());
    if let Some(size) = cluster.cluster_size {
        meta.push(("Nodes", size.to_string()));
    }
    meta.push(("TLS", if cluster.tls_enabled { "Yes" } else { "No" }.to_string()));
    meta
}

pub fn log_metadata(log: &Log) -> Metadata {
    let mut meta = vec![("Timestamp", format_timestamp(&log.timestamp))];
    push_opt(&mut meta, "Level", log.level.as_deref());
    push_opt(&mut meta, "Source", log.source.as_deref());
    push_opt(&mut meta, "Stream", log.stream.as_deref());
    meta
}
