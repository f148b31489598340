//! Publication-only operations: grouped listing and title existence

use publisher_model::GroupedPublications;

use crate::domains::catalog::kind::PublicationKind;
use crate::infra::constants::routes;
use crate::infra::error::ApiResult;
use crate::infra::services::entity::RestEntityClient;

impl RestEntityClient<PublicationKind> {
    /// Every book and magazine, split by type
    pub async fn grouped(&self) -> ApiResult<GroupedPublications> {
        self.gateway().get(routes::publications::GROUPED).await
    }

    /// `GET /publications/title/{title}/exists`
    pub async fn exists_by_title(&self, title: &str) -> ApiResult<bool> {
        let path = format!(
            "{}/{}",
            routes::segment(routes::publications::BY_TITLE, title),
            routes::EXISTS_SUFFIX
        );
        self.gateway().get(&path).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::domains::catalog::kind::PublicationKind;
    use crate::infra::activity::ActivityTracker;
    use crate::infra::gateway::ResourceGateway;
    use crate::infra::services::entity::RestEntityClient;
    use crate::infra::transport::MockTransport;

    #[tokio::test]
    async fn grouped_splits_books_and_magazines() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|request| request.path == "/publications/grouped")
            .returning(|_| {
                Ok(json!({
                    "success": true,
                    "message": "Publications grouped successfully",
                    "data": {
                        "books": [{"id": 1, "title": "Dune", "isbn": "1"}],
                        "magazines": [{"id": 2, "title": "Wired", "issueNumber": 4}]
                    }
                }))
            });

        let client = RestEntityClient::<PublicationKind>::new(ResourceGateway::new(
            Arc::new(mock),
            ActivityTracker::new(),
        ));
        let grouped = client.grouped().await.unwrap();
        assert_eq!(grouped.books.len(), 1);
        assert_eq!(grouped.magazines[0].issue_number, 4);
    }

    #[tokio::test]
    async fn title_existence_uses_encoded_path() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .withf(|request| request.path == "/publications/title/Good%20Omens/exists")
            .returning(|_| Ok(json!({"success": true, "message": "", "data": false})));

        let client = RestEntityClient::<PublicationKind>::new(ResourceGateway::new(
            Arc::new(mock),
            ActivityTracker::new(),
        ));
        assert_eq!(client.exists_by_title("Good Omens").await, Ok(false));
    }
}
