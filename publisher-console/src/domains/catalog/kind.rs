//! Per-kind behavior plugged into the generic controller and REST client.

use std::fmt::Debug;

use log::warn;
use publisher_model::{
    Author, AuthorDraft, Book, BookDraft, Identified, Magazine, MagazineDraft,
    MagazineRequest, Publication, PublicationDraft, PublicationSummary, PublicationType,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domains::catalog::relation::parse_relation_ids;
use crate::infra::constants::routes;

/// Describes one entity kind of the catalog: where it lives on the server,
/// what a list row and a draft look like, and how a draft becomes a request
/// body.
pub trait EntityKind: Debug + Clone + Send + Sync + 'static {
    /// Collection route, e.g. `/authors`
    const RESOURCE: &'static str;
    /// Log prefix and display name
    const LABEL: &'static str;
    /// Paged title search route, for kinds that have one
    const SEARCH_PATH: Option<&'static str> = None;

    /// Row shown in the list
    type Item: Clone + Debug + PartialEq + Identified + DeserializeOwned + Send + Sync + 'static;
    /// Full record returned by get, create and update
    type Detail: Clone + Debug + DeserializeOwned + Send + Sync + 'static;
    /// Editable form fields
    type Draft: Clone + Default + Debug + PartialEq + Send + Sync + 'static;
    /// Body sent on create and update
    type Request: Serialize + Send + Sync;

    /// Seeds an edit draft from a list row.
    fn draft_from_item(item: &Self::Item) -> Self::Draft;

    /// List row for a record fetched on its own.
    fn item_from_detail(detail: &Self::Detail) -> Self::Item;

    /// Converts a draft into the request body.
    fn request_from_draft(draft: &Self::Draft) -> Self::Request;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MagazineKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublicationKind;

impl EntityKind for AuthorKind {
    const RESOURCE: &'static str = routes::authors::COLLECTION;
    const LABEL: &'static str = "Authors";

    type Item = Author;
    type Detail = Author;
    type Draft = AuthorDraft;
    type Request = AuthorDraft;

    fn draft_from_item(item: &Author) -> AuthorDraft {
        AuthorDraft::from(item)
    }

    fn item_from_detail(detail: &Author) -> Author {
        detail.clone()
    }

    fn request_from_draft(draft: &AuthorDraft) -> AuthorDraft {
        draft.clone()
    }
}

impl EntityKind for BookKind {
    const RESOURCE: &'static str = routes::books::COLLECTION;
    const LABEL: &'static str = "Books";

    type Item = Book;
    type Detail = Book;
    type Draft = BookDraft;
    type Request = BookDraft;

    fn draft_from_item(item: &Book) -> BookDraft {
        BookDraft::from(item)
    }

    fn item_from_detail(detail: &Book) -> Book {
        detail.clone()
    }

    fn request_from_draft(draft: &BookDraft) -> BookDraft {
        draft.clone()
    }
}

impl EntityKind for MagazineKind {
    const RESOURCE: &'static str = routes::magazines::COLLECTION;
    const LABEL: &'static str = "Magazines";

    type Item = Magazine;
    type Detail = Magazine;
    type Draft = MagazineDraft;
    type Request = MagazineRequest;

    fn draft_from_item(item: &Magazine) -> MagazineDraft {
        MagazineDraft::from(item)
    }

    fn item_from_detail(detail: &Magazine) -> Magazine {
        detail.clone()
    }

    fn request_from_draft(draft: &MagazineDraft) -> MagazineRequest {
        let parsed = parse_relation_ids(&draft.author_ids);
        if !parsed.rejected.is_empty() {
            warn!(
                "[{}] Dropping author references that are not ids: {:?}",
                Self::LABEL,
                parsed.rejected
            );
        }

        MagazineRequest {
            title: draft.title.clone(),
            publication_date: draft.publication_date.clone(),
            issue_number: draft.issue_number,
            author_ids: parsed.ids,
        }
    }
}

impl EntityKind for PublicationKind {
    const RESOURCE: &'static str = routes::publications::COLLECTION;
    const LABEL: &'static str = "Publications";
    const SEARCH_PATH: Option<&'static str> = Some(routes::publications::SEARCH_TITLE);

    type Item = PublicationSummary;
    type Detail = Publication;
    type Draft = PublicationDraft;
    type Request = PublicationDraft;

    fn draft_from_item(item: &PublicationSummary) -> PublicationDraft {
        PublicationDraft::from(item)
    }

    /// The detail record carries no type, so the row's type is unknown.
    fn item_from_detail(detail: &Publication) -> PublicationSummary {
        PublicationSummary {
            id: detail.id,
            title: detail.title.clone(),
            publication_date: detail.publication_date,
            publication_type: PublicationType::Unknown,
        }
    }

    fn request_from_draft(draft: &PublicationDraft) -> PublicationDraft {
        draft.clone()
    }
}
