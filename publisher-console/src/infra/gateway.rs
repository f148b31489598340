//! Resource gateway: the single choke point every catalog request passes
//! through.
//!
//! Each call is bracketed by an [`ActivityGuard`](crate::infra::activity::ActivityGuard)
//! held across the transport future, so the busy signal is released exactly
//! once whether the call succeeds, fails, or the caller drops the future.
//! Errors are handed back untouched.

use std::sync::Arc;

use log::{debug, warn};
use publisher_model::{ApiEnvelope, MaybeEnveloped, Page, PageQuery};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::infra::activity::ActivityTracker;
use crate::infra::error::{ApiError, ApiResult};
use crate::infra::transport::{ApiRequest, Transport};

#[derive(Debug, Clone)]
pub struct ResourceGateway {
    transport: Arc<dyn Transport>,
    activity: ActivityTracker,
}

impl ResourceGateway {
    pub fn new(transport: Arc<dyn Transport>, activity: ActivityTracker) -> Self {
        Self {
            transport,
            activity,
        }
    }

    pub fn activity(&self) -> &ActivityTracker {
        &self.activity
    }

    /// Paged list of `path`, decoded from the list envelope.
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &PageQuery,
    ) -> ApiResult<Page<T>> {
        self.page(ApiRequest::get(path), query).await
    }

    /// Paged list with extra query parameters ahead of the cursor (title
    /// search and the like).
    pub async fn list_with<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: Vec<(String, String)>,
        query: &PageQuery,
    ) -> ApiResult<Page<T>> {
        self.page(ApiRequest::get(path).with_query(extra), query)
            .await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let value = self.dispatch(ApiRequest::get(path)).await?;
        decode_entity(value)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::post(path).with_body(serde_json::to_value(body)?);
        let value = self.dispatch(request).await?;
        decode_entity(value)
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::put(path).with_body(serde_json::to_value(body)?);
        let value = self.dispatch(request).await?;
        decode_entity(value)
    }

    /// Deletes `path`; whatever body comes back is ignored.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.dispatch(ApiRequest::delete(path)).await.map(|_| ())
    }

    async fn page<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        query: &PageQuery,
    ) -> ApiResult<Page<T>> {
        let request = request.with_query(query.to_query_pairs());
        let value = self.dispatch(request).await?;
        let envelope: ApiEnvelope<Page<T>> = serde_json::from_value(value)?;

        if !envelope.success {
            warn!("[Gateway] List request rejected: {}", envelope.message);
            return Err(ApiError::Rejected(envelope.message));
        }

        Ok(envelope.data.unwrap_or_else(|| Page::empty(query)))
    }

    async fn dispatch(&self, request: ApiRequest) -> ApiResult<Value> {
        let _guard = self.activity.track();
        debug!("[Gateway] {}", request);

        let result = self.transport.send(request).await;
        if let Err(err) = &result {
            debug!("[Gateway] Request failed: {}", err);
        }
        result
    }
}

/// Decodes a single-entity body that may be bare or enveloped.
fn decode_entity<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    let envelope = serde_json::from_value::<MaybeEnveloped<T>>(value)?.into_envelope();
    if !envelope.success {
        return Err(ApiError::Rejected(envelope.message));
    }
    envelope.data.ok_or(ApiError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::transport::MockTransport;
    use futures::{FutureExt, StreamExt};
    use publisher_model::{AuthorSummary, SortDirection};
    use serde_json::json;

    fn gateway_with(mock: MockTransport) -> ResourceGateway {
        ResourceGateway::new(Arc::new(mock), ActivityTracker::new())
    }

    #[tokio::test]
    async fn list_sends_cursor_and_unwraps_envelope() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|request| {
                request.path == "/authors"
                    && request.query_param("page") == Some("2")
                    && request.query_param("size") == Some("10")
                    && request.query_param("sort") == Some("ASC")
            })
            .times(1)
            .returning(|_| {
                Ok(json!({
                    "success": true,
                    "message": "Authors retrieved",
                    "data": {
                        "content": [{"id": 1, "name": "Ada"}],
                        "totalElements": 21,
                        "totalPages": 3,
                        "size": 10,
                        "number": 2
                    }
                }))
            });

        let gateway = gateway_with(mock);
        let query = PageQuery::new(2, 10, SortDirection::Asc).unwrap();
        let page: Page<AuthorSummary> = gateway.list("/authors", &query).await.unwrap();

        assert_eq!(page.total_elements, 21);
        assert_eq!(page.content[0].name, "Ada");
        assert!(!gateway.activity().is_busy());
    }

    #[tokio::test]
    async fn unsuccessful_list_envelope_is_rejected() {
        let mut mock = MockTransport::new();
        mock.expect_send().returning(|_| {
            Ok(json!({"success": false, "message": "Invalid sort", "data": null}))
        });

        let gateway = gateway_with(mock);
        let result: ApiResult<Page<AuthorSummary>> =
            gateway.list("/authors", &PageQuery::default()).await;

        assert_eq!(result, Err(ApiError::Rejected("Invalid sort".into())));
    }

    #[tokio::test]
    async fn list_without_data_is_an_empty_page() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .returning(|_| Ok(json!({"success": true, "message": "none"})));

        let gateway = gateway_with(mock);
        let page: Page<AuthorSummary> =
            gateway.list("/authors", &PageQuery::default()).await.unwrap();

        assert!(page.is_empty());
        assert_eq!(page.size, 10);
    }

    #[tokio::test]
    async fn transport_error_is_propagated_and_activity_released() {
        let mut mock = MockTransport::new();
        mock.expect_send().returning(|_| {
            Err(ApiError::Status {
                status: 500,
                message: "boom".into(),
            })
        });

        let gateway = gateway_with(mock);
        let mut busy = gateway.activity().observe();
        let result: ApiResult<AuthorSummary> = gateway.get("/authors/1").await;

        assert_eq!(
            result,
            Err(ApiError::Status {
                status: 500,
                message: "boom".into()
            })
        );
        assert_eq!(gateway.activity().in_flight(), 0);

        let mut seen = Vec::new();
        while let Some(Some(value)) = busy.next().now_or_never() {
            seen.push(value);
        }
        assert_eq!(seen, vec![false, true, false]);
    }

    #[tokio::test]
    async fn dropped_future_releases_activity() {
        #[derive(Debug)]
        struct Hanging;

        #[async_trait::async_trait]
        impl Transport for Hanging {
            async fn send(&self, _request: ApiRequest) -> ApiResult<Value> {
                futures::future::pending().await
            }
        }

        let gateway = ResourceGateway::new(Arc::new(Hanging), ActivityTracker::new());
        {
            let mut call = Box::pin(gateway.get::<AuthorSummary>("/authors/1"));
            assert!((&mut call).now_or_never().is_none());
            assert!(gateway.activity().is_busy());
        }
        assert!(!gateway.activity().is_busy());
    }

    #[tokio::test]
    async fn get_accepts_bare_and_enveloped_entities() {
        let mut mock = MockTransport::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json!({"id": 4, "name": "Bare"})));
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(json!({"success": true, "message": "ok", "data": {"id": 4, "name": "Wrapped"}}))
            });
        mock.expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json!({"success": true, "message": "ok", "data": null})));

        let gateway = gateway_with(mock);
        let bare: AuthorSummary = gateway.get("/authors/4").await.unwrap();
        let wrapped: AuthorSummary = gateway.get("/authors/4").await.unwrap();
        let empty: ApiResult<AuthorSummary> = gateway.get("/authors/4").await;

        assert_eq!(bare.name, "Bare");
        assert_eq!(wrapped.name, "Wrapped");
        assert_eq!(empty, Err(ApiError::EmptyResponse));
    }

    #[tokio::test]
    async fn delete_ignores_body() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|request| request.method == reqwest::Method::DELETE)
            .returning(|_| Ok(Value::Null));

        let gateway = gateway_with(mock);
        assert_eq!(gateway.delete("/books/3").await, Ok(()));
    }
}
