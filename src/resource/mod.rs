//! Resource abstraction layer
//!
//! Listing, joining and presenting Scaleway resources.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`fetcher`] - Fans listings out across regions/zones with pagination support
//! - [`source`] - Picks the live API or the fixture data source
//! - [`join`] - Groups containers by namespace and domains by container
//! - [`status`] - Status to icon/tint/tooltip mappings
//! - [`display`] - Flags, sizes, log markdown and console links
//!
//! Per-kind operations (`list_instances`, `deploy_container`, ...) are
//! methods of [`ResourceFetcher`] defined in the `instances`, `containers`,
//! `databases` and `redis` modules.
//!
//! # Example
//!
//! ```ignore
//! use tscw::resource::{FixtureTransport, ResourceFetcher};
//! use tscw::scw::cancel::CancelToken;
//! use std::sync::Arc;
//!
//! async fn list_servers() -> anyhow::Result<()> {
//!     let fetcher = ResourceFetcher::new(Arc::new(FixtureTransport::new()));
//!     let servers = fetcher.list_instances(&CancelToken::never()).await?;
//!     println!("{} servers", servers.items.len());
//!     Ok(())
//! }
//! ```

mod containers;
mod databases;
pub mod display;
mod fetcher;
pub mod fixtures;
mod instances;
pub mod join;
mod redis;
mod registry;
mod source;
pub mod status;

pub use fetcher::{
    extract_json_value, FanOut, FetchPolicy, PartitionFailure, PartitionTable, ResourceFetcher,
    DEFAULT_PAGE_SIZE,
};
pub use join::{join_containers, ContainerView, NamespaceView};
pub use registry::*;
pub use source::{build_transport, FixtureTransport};
