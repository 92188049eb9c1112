//! Scaleway API records
//!
//! Flat snapshots of the provider's JSON, deserialized as returned by the
//! list endpoints. Enumerations fall back to `Unknown` on values this build
//! does not know about.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerStatus {
    Ready,
    Deleting,
    Error,
    Locked,
    Creating,
    Pending,
    #[serde(other)]
    Unknown,
}

impl ContainerStatus {
    pub const ALL: [Self; 7] = [
        Self::Unknown,
        Self::Ready,
        Self::Deleting,
        Self::Error,
        Self::Locked,
        Self::Creating,
        Self::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Ready => "ready",
            Self::Deleting => "deleting",
            Self::Error => "error",
            Self::Locked => "locked",
            Self::Creating => "creating",
            Self::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceState {
    #[serde(rename = "running")]
    Running,
    #[serde(rename = "stopped")]
    Stopped,
    #[serde(rename = "stopped in place")]
    StoppedInPlace,
    #[serde(rename = "starting")]
    Starting,
    #[serde(rename = "stopping")]
    Stopping,
    #[serde(rename = "locked")]
    Locked,
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl InstanceState {
    pub const ALL: [Self; 7] = [
        Self::Running,
        Self::Stopped,
        Self::StoppedInPlace,
        Self::Starting,
        Self::Stopping,
        Self::Locked,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::StoppedInPlace => "stopped in place",
            Self::Starting => "starting",
            Self::Stopping => "stopping",
            Self::Locked => "locked",
            Self::Unknown => "unknown",
        }
    }
}

/// Power actions accepted by `POST .../servers/{id}/action`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceAction {
    #[serde(rename = "poweron")]
    PowerOn,
    #[serde(rename = "poweroff")]
    PowerOff,
    Reboot,
    /// Actions this tool does not expose (backup, terminate, ...)
    #[serde(other)]
    Other,
}

impl InstanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PowerOn => "poweron",
            Self::PowerOff => "poweroff",
            Self::Reboot => "reboot",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseStatus {
    Ready,
    Provisioning,
    Configuring,
    Deleting,
    Error,
    Autohealing,
    Locked,
    Initializing,
    DiskFull,
    Backuping,
    Snapshotting,
    Restarting,
    #[serde(other)]
    Unknown,
}

impl DatabaseStatus {
    pub const ALL: [Self; 13] = [
        Self::Unknown,
        Self::Ready,
        Self::Provisioning,
        Self::Configuring,
        Self::Deleting,
        Self::Error,
        Self::Autohealing,
        Self::Locked,
        Self::Initializing,
        Self::DiskFull,
        Self::Backuping,
        Self::Snapshotting,
        Self::Restarting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Ready => "ready",
            Self::Provisioning => "provisioning",
            Self::Configuring => "configuring",
            Self::Deleting => "deleting",
            Self::Error => "error",
            Self::Autohealing => "autohealing",
            Self::Locked => "locked",
            Self::Initializing => "initializing",
            Self::DiskFull => "disk_full",
            Self::Backuping => "backuping",
            Self::Snapshotting => "snapshotting",
            Self::Restarting => "restarting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedisClusterStatus {
    Ready,
    Provisioning,
    Configuring,
    Deleting,
    Error,
    Autohealing,
    Locked,
    Suspended,
    Initializing,
    #[serde(other)]
    Unknown,
}

impl RedisClusterStatus {
    pub const ALL: [Self; 10] = [
        Self::Unknown,
        Self::Ready,
        Self::Provisioning,
        Self::Configuring,
        Self::Deleting,
        Self::Error,
        Self::Autohealing,
        Self::Locked,
        Self::Suspended,
        Self::Initializing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Ready => "ready",
            Self::Provisioning => "provisioning",
            Self::Configuring => "configuring",
            Self::Deleting => "deleting",
            Self::Error => "error",
            Self::Autohealing => "autohealing",
            Self::Locked => "locked",
            Self::Suspended => "suspended",
            Self::Initializing => "initializing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privacy {
    Public,
    Private,
    #[serde(rename = "unknown_privacy", other)]
    Unknown,
}

// =============================================================================
// Serverless containers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: String,
    pub name: String,
    pub region: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ContainerStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub namespace_id: String,
    pub status: ContainerStatus,
    #[serde(default)]
    pub min_scale: u32,
    #[serde(default)]
    pub max_scale: u32,
    /// MB
    #[serde(default)]
    pub memory_limit: u32,
    /// mvCPU
    #[serde(default)]
    pub cpu_limit: u32,
    #[serde(default)]
    pub timeout: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    pub privacy: Privacy,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub registry_image: String,
    #[serde(default)]
    pub max_concurrency: u32,
    #[serde(default)]
    pub domain_name: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub port: u16,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerDomain {
    pub id: String,
    pub hostname: String,
    pub container_id: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub id: String,
    pub message: String,
    pub timestamp: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
}

// =============================================================================
// Compute instances
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicIp {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerImage {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub name: String,
    pub zone: String,
    pub state: InstanceState,
    #[serde(default)]
    pub allowed_actions: Vec<InstanceAction>,
    #[serde(default)]
    pub commercial_type: Option<String>,
    #[serde(default)]
    pub public_ip: Option<PublicIp>,
    #[serde(default)]
    pub image: Option<ServerImage>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
}

impl Instance {
    pub fn allows(&self, action: InstanceAction) -> bool {
        self.allowed_actions.contains(&action)
    }
}

// =============================================================================
// Managed databases
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseEndpoint {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseVolume {
    /// Bytes
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "type")]
    pub volume_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub id: String,
    pub name: String,
    pub region: String,
    pub status: DatabaseStatus,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub node_type: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<DatabaseEndpoint>,
    #[serde(default)]
    pub volume: Option<DatabaseVolume>,
}

// =============================================================================
// Managed Redis
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedisCluster {
    pub id: String,
    pub name: String,
    pub zone: String,
    pub status: RedisClusterStatus,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub node_type: Option<String>,
    #[serde(default)]
    pub cluster_size: Option<u32>,
    #[serde(default)]
    pub tls_enabled: bool,
}
