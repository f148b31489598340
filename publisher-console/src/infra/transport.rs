//! Transport abstraction under the resource gateway.
//!
//! The gateway only ever speaks in [`ApiRequest`]s and raw JSON values, so
//! the HTTP client and the in-memory catalog used by demo mode and tests
//! are interchangeable behind one trait object.

use std::fmt::{self, Debug};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::infra::error::ApiResult;

/// One call against the catalog service, relative to the API base.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Query parameter lookup, first match wins.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        if !self.query.is_empty() {
            let query = self
                .query
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// Sends a request and yields the decoded JSON body of a successful
/// response. A body-less success yields [`Value::Null`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value>;
}
