use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use publisher_model::ApiEnvelope;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use crate::infra::error::{ApiError, ApiResult};
use crate::infra::transport::{ApiRequest, Transport};

/// `reqwest`-backed transport for the catalog service
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a new transport rooted at `base_url` (for example
    /// `http://localhost:8080/api/v1`)
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = normalize(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Network(format!("Failed to create HTTP client: {err}")))?;

        info!(
            "[HttpTransport] Creating transport with base URL: {}",
            base_url
        );

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL for a route relative to the base
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Adds a missing scheme and trims a trailing slash so routes join cleanly.
fn normalize(raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    if with_scheme != raw {
        warn!(
            "[HttpTransport] Normalized base URL from '{}' to '{}'",
            raw, with_scheme
        );
    }

    Url::parse(&with_scheme)
        .map_err(|err| ApiError::Network(format!("Invalid base URL '{raw}': {err}")))?;
    Ok(with_scheme)
}

/// Error text for a non-success response: the envelope `message` when the
/// body is one, otherwise the raw body or the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<Value>>(body)
        && !envelope.message.is_empty()
    {
        return envelope.message;
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        let url = self.build_url(&request.path);
        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &text);
            warn!(
                "[HttpTransport] {} {} failed with {}: {}",
                request.method, url, status, message
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
