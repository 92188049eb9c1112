//! Scaleway Client
//!
//! The [`Transport`] seam every fetcher talks through, and its live
//! implementation combining credentials and the HTTP client.

use super::auth::{Credentials, DEFAULT_API_URL};
use super::cancel::CancelToken;
use super::http::{ApiError, ScwHttpClient};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Query string pairs
pub type Query = [(String, String)];

/// Something that answers Scaleway API paths with JSON
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` (relative to the API root)
    async fn get(&self, path: &str, query: &Query, cancel: &CancelToken) -> Result<Value, ApiError>;

    /// POST `path` with an optional JSON body
    async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        cancel: &CancelToken,
    ) -> Result<Value, ApiError>;
}

/// Live Scaleway client
#[derive(Clone)]
pub struct ScwClient {
    http: ScwHttpClient,
    secret_key: String,
    base_url: String,
}

impl ScwClient {
    /// Create a client for the given API root
    pub fn new(secret_key: &str, base_url: &str) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .with_context(|| format!("Invalid Scaleway API URL: {}", base_url))?;

        Ok(Self {
            http: ScwHttpClient::new()?,
            secret_key: secret_key.to_string(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from discovered credentials
    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        let secret_key = credentials
            .secret_key
            .as_deref()
            .context("No Scaleway secret key configured. Set SCW_SECRET_KEY or run 'scw init'")?;

        Self::new(
            secret_key,
            credentials.api_url.as_deref().unwrap_or(DEFAULT_API_URL),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for ScwClient {
    async fn get(&self, path: &str, query: &Query, cancel: &CancelToken) -> Result<Value, ApiError> {
        self.http
            .get(&self.url(path), &self.secret_key, query, cancel)
            .await
    }

    async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        cancel: &CancelToken,
    ) -> Result<Value, ApiError> {
        self.http
            .post(&self.url(path), &self.secret_key, body, cancel)
            .await
    }
}

/// Format an API error for display
pub fn format_scw_error(error: &anyhow::Error) -> String {
    super::http::format_api_error(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ScwClient::new("key", "https://api.example.com/").unwrap();
        assert_eq!(
            client.url("/instance/v1/zones/fr-par-1/servers"),
            "https://api.example.com/instance/v1/zones/fr-par-1/servers"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(ScwClient::new("key", "not a url").is_err());
    }

    #[test]
    fn test_missing_secret_key_is_an_error() {
        let err = ScwClient::from_credentials(&Credentials::default())
            .err()
            .expect("should fail without a key");
        assert!(err.to_string().contains("SCW_SECRET_KEY"));
    }
}
