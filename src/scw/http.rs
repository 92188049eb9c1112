//! HTTP utilities for Scaleway REST API calls

use super::cancel::CancelToken;
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Header carrying the secret key
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Transport failure taxonomy
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("network error: {0}")]
    Network(String),
    /// The API answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    /// The response body was not the JSON we expected
    #[error("invalid response: {0}")]
    Decode(String),
    /// The caller gave up on the request
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Sanitize response body for logging
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.chars().count() > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull the provider's message out of an error body, if any
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        })
}

/// HTTP client wrapper for Scaleway API calls
#[derive(Clone)]
pub struct ScwHttpClient {
    client: Client,
}

impl ScwHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tscw/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request to a Scaleway API
    pub async fn get(
        &self,
        url: &str,
        token: &str,
        query: &[(String, String)],
        cancel: &CancelToken,
    ) -> Result<Value, ApiError> {
        tracing::debug!("GET {} {:?}", url, query);

        let request = self.client.get(url).header(AUTH_HEADER, token).query(query);
        self.send(request, cancel).await
    }

    /// Make a POST request to a Scaleway API
    pub async fn post(
        &self,
        url: &str,
        token: &str,
        body: Option<&Value>,
        cancel: &CancelToken,
    ) -> Result<Value, ApiError> {
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url).header(AUTH_HEADER, token);

        // Scaleway expects a JSON body on every POST
        request = request.json(body.unwrap_or(&Value::Object(Default::default())));

        self.send(request, cancel).await
    }

    async fn send(&self, request: RequestBuilder, cancel: &CancelToken) -> Result<Value, ApiError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("request cancelled");
                Err(ApiError::Cancelled)
            }
            result = Self::execute(request) => result,
        }
    }

    async fn execute(request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Malformed response body: {}", sanitize_for_log(&body));
            ApiError::Decode(e.to_string())
        })
    }
}

/// Format an API error for display
pub fn format_api_error(error: &anyhow::Error) -> String {
    if let Some(api_error) = error.chain().find_map(|e| e.downcast_ref::<ApiError>()) {
        return match api_error {
            ApiError::Api { status: 401, .. } => {
                "Authentication failed. Check SCW_SECRET_KEY.".to_string()
            },
            ApiError::Api { status: 403, .. } => {
                "Permission denied. Check your IAM policies.".to_string()
            },
            ApiError::Api { status: 404, .. } => "Resource not found.".to_string(),
            ApiError::Api { status: 409, .. } => {
                "Resource conflict. The resource may be busy.".to_string()
            },
            ApiError::Api { status: 429, .. } => {
                "Rate limit exceeded. Please try again later.".to_string()
            },
            ApiError::Api { status, .. } if *status >= 500 => {
                "Scaleway service temporarily unavailable. Please try again.".to_string()
            },
            ApiError::Api { message, .. } => truncate_message(message),
            ApiError::Network(_) => {
                "Request failed. Check your network connection and try again.".to_string()
            },
            ApiError::Decode(_) => "Unexpected response from the Scaleway API.".to_string(),
            ApiError::Cancelled => "Request cancelled.".to_string(),
        };
    }

    truncate_message(&error.to_string())
}

fn truncate_message(message: &str) -> String {
    let sanitized: String = message
        .chars()
        .filter(|c| !c.is_control())
        .take(80)
        .collect();

    if sanitized.chars().count() < message.chars().count() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated, 500 bytes total"));
    }

    #[test]
    fn test_error_message_prefers_provider_message() {
        let body = r#"{"message":"quota exceeded","type":"invalid_request_error"}"#;
        assert_eq!(
            error_message(body, reqwest::StatusCode::BAD_REQUEST),
            "quota exceeded"
        );
        assert_eq!(
            error_message("<html>", reqwest::StatusCode::BAD_GATEWAY),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_format_api_error_through_context() {
        let err = anyhow::Error::new(ApiError::Api {
            status: 401,
            message: "denied".into(),
        })
        .context("listing servers in fr-par-1");
        assert!(format_api_error(&err).contains("SCW_SECRET_KEY"));

        let err = anyhow::Error::new(ApiError::Api {
            status: 400,
            message: "bad zone".into(),
        });
        assert_eq!(format_api_error(&err), "bad zone");
    }
}
