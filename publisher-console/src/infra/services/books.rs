//! Book-only lookups that sit beside the generic entity operations

use log::debug;
use publisher_model::{Book, EntityId, Page, PageQuery};

use crate::domains::catalog::kind::BookKind;
use crate::infra::constants::routes;
use crate::infra::error::ApiResult;
use crate::infra::services::entity::RestEntityClient;

impl RestEntityClient<BookKind> {
    /// `GET /books/isbn/{isbn}`
    pub async fn find_by_isbn(&self, isbn: &str) -> ApiResult<Book> {
        debug!("[Books] Looking up ISBN {}", isbn);
        self.gateway()
            .get(&routes::segment(routes::books::BY_ISBN, isbn.trim()))
            .await
    }

    /// `GET /books/author/{author_id}` with the usual page cursor
    pub async fn list_by_author(
        &self,
        author_id: EntityId,
        query: PageQuery,
    ) -> ApiResult<Page<Book>> {
        self.gateway()
            .list(&routes::item(routes::books::BY_AUTHOR, author_id), &query)
            .await
    }
}
