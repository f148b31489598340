//! Entity client trait and its REST implementation
//!
//! One generic client covers all four catalog kinds; the kind supplies the
//! routes and types through [`EntityKind`].

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use log::debug;
use publisher_model::{EntityId, Page, PageQuery};

use crate::domains::catalog::kind::EntityKind;
use crate::infra::constants::routes;
use crate::infra::error::{ApiError, ApiResult};
use crate::infra::gateway::ResourceGateway;

/// Server operations a paginated screen needs for one entity kind
#[async_trait]
pub trait EntityClient<K: EntityKind>: Send + Sync + Debug {
    /// Fetch one page of the collection
    async fn list(&self, query: PageQuery) -> ApiResult<Page<K::Item>>;

    /// Fetch one record
    async fn get(&self, id: EntityId) -> ApiResult<K::Detail>;

    /// Create a record from a draft
    async fn create(&self, draft: &K::Draft) -> ApiResult<K::Detail>;

    /// Replace a record with the draft's fields
    async fn update(&self, id: EntityId, draft: &K::Draft) -> ApiResult<K::Detail>;

    /// Delete a record
    async fn delete(&self, id: EntityId) -> ApiResult<()>;

    /// Paged title search; kinds without a search route report
    /// [`ApiError::Unsupported`]
    async fn search_by_title(
        &self,
        title: &str,
        query: PageQuery,
    ) -> ApiResult<Page<K::Item>> {
        let _ = (title, query);
        Err(ApiError::Unsupported("title search"))
    }
}

/// [`EntityClient`] speaking to the catalog service through the gateway
#[derive(Debug, Clone)]
pub struct RestEntityClient<K: EntityKind> {
    gateway: ResourceGateway,
    _kind: PhantomData<K>,
}

impl<K: EntityKind> RestEntityClient<K> {
    pub fn new(gateway: ResourceGateway) -> Self {
        Self {
            gateway,
            _kind: PhantomData,
        }
    }

    pub fn gateway(&self) -> &ResourceGateway {
        &self.gateway
    }

    /// `GET /{collection}/{id}/exists`
    pub async fn exists(&self, id: EntityId) -> ApiResult<bool> {
        let path = format!(
            "{}/{}",
            routes::item(K::RESOURCE, id),
            routes::EXISTS_SUFFIX
        );
        self.gateway.get(&path).await
    }
}

#[async_trait]
impl<K: EntityKind> EntityClient<K> for RestEntityClient<K> {
    async fn list(&self, query: PageQuery) -> ApiResult<Page<K::Item>> {
        debug!(
            "[{}] Listing page {} (size {}, {})",
            K::LABEL,
            query.page,
            query.size,
            query.sort
        );
        self.gateway.list(K::RESOURCE, &query).await
    }

    async fn get(&self, id: EntityId) -> ApiResult<K::Detail> {
        self.gateway.get(&routes::item(K::RESOURCE, id)).await
    }

    async fn create(&self, draft: &K::Draft) -> ApiResult<K::Detail> {
        let body = K::request_from_draft(draft);
        self.gateway.post(K::RESOURCE, &body).await
    }

    async fn update(&self, id: EntityId, draft: &K::Draft) -> ApiResult<K::Detail> {
        let body = K::request_from_draft(draft);
        self.gateway.put(&routes::item(K::RESOURCE, id), &body).await
    }

    async fn delete(&self, id: EntityId) -> ApiResult<()> {
        self.gateway.delete(&routes::item(K::RESOURCE, id)).await
    }

    async fn search_by_title(
        &self,
        title: &str,
        query: PageQuery,
    ) -> ApiResult<Page<K::Item>> {
        let Some(path) = K::SEARCH_PATH else {
            return Err(ApiError::Unsupported("title search"));
        };
        debug!("[{}] Searching titles for '{}'", K::LABEL, title);
        self.gateway
            .list_with(path, vec![("title".to_string(), title.to_string())], &query)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::kind::{AuthorKind, BookKind, MagazineKind, PublicationKind};
    use crate::infra::activity::ActivityTracker;
    use crate::infra::transport::MockTransport;
    use publisher_model::{AuthorRefs, MagazineDraft};
    use reqwest::Method;
    use serde_json::json;
    use std::sync::Arc;

    fn client<K: EntityKind>(mock: MockTransport) -> RestEntityClient<K> {
        RestEntityClient::new(ResourceGateway::new(
            Arc::new(mock),
            ActivityTracker::new(),
        ))
    }

    #[tokio::test]
    async fn magazine_create_sends_normalized_author_ids() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|request| {
                request.method == Method::POST
                    && request.path == "/magazines"
                    && request.body
                        == Some(json!({
                            "title": "Quarterly",
                            "issueNumber": 2,
                            "authorIds": [1, 2, 4]
                        }))
            })
            .times(1)
            .returning(|_| {
                Ok(json!({"id": 11, "title": "Quarterly", "issueNumber": 2, "authors": []}))
            });

        let client = client::<MagazineKind>(mock);
        let draft = MagazineDraft {
            title: "Quarterly".into(),
            issue_number: 2,
            author_ids: AuthorRefs::from("1, 2, abc, 4"),
            ..Default::default()
        };

        let created = client.create(&draft).await.unwrap();
        assert_eq!(created.id, 11);
    }

    #[tokio::test]
    async fn search_routes_title_and_cursor() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|request| {
                request.path == "/publications/search/title"
                    && request.query_param("title") == Some("dune")
                    && request.query_param("page") == Some("0")
            })
            .times(1)
            .returning(|_| Ok(json!({"success": true, "message": "", "data": {"content": []}})));

        let client = client::<PublicationKind>(mock);
        let page = client
            .search_by_title("dune", PageQuery::default())
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn search_is_unsupported_for_authors() {
        let client = client::<AuthorKind>(MockTransport::new());
        let result = client.search_by_title("x", PageQuery::default()).await;
        assert_eq!(result, Err(ApiError::Unsupported("title search")));
    }

    #[tokio::test]
    async fn exists_reads_enveloped_boolean() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|request| request.path == "/books/5/exists")
            .returning(|_| Ok(json!({"success": true, "message": "", "data": true})));

        let client = client::<BookKind>(mock);
        assert_eq!(client.exists(5).await, Ok(true));
    }
}
