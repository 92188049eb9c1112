//! Scaleway API interaction module
//!
//! # Module Structure
//!
//! - [`auth`] - Credential discovery (environment, Scaleway CLI profile)
//! - [`cancel`] - Cancellation tokens threaded through every request
//! - [`client`] - The [`Transport`](client::Transport) seam and the live client
//! - [`http`] - HTTP utilities and the [`ApiError`](http::ApiError) taxonomy
//! - [`types`] - Records returned by the list endpoints
//!
//! # Example
//!
//! ```ignore
//! use tscw::scw::{cancel::CancelToken, client::{ScwClient, Transport}};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = ScwClient::new("<secret key>", "https://api.scaleway.com")?;
//!     let servers = client
//!         .get("/instance/v1/zones/fr-par-1/servers", &[], &CancelToken::never())
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cancel;
pub mod client;
pub mod http;
pub mod types;
