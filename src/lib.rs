//! tscw: terminal UI for Scaleway
//!
//! Lists instances, serverless containers, managed databases and Redis
//! clusters across every region or zone, and runs deploy and power actions.

pub mod app;
pub mod config;
pub mod event;
pub mod notification;
pub mod resource;
pub mod scw;
pub mod shell;
pub mod ui;

/// Version injected at compile time via TSCW_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("TSCW_VERSION") {
    Some(v) => v,
    None => "dev",
};
