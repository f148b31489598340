//! Core data model definitions shared across the publisher console crates.
#![allow(missing_docs)]

pub mod author;
pub mod book;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod magazine;
pub mod page;
pub mod publication;
#[cfg(feature = "serde")]
pub mod serde_util;

// Intentionally curated re-exports for downstream consumers.
pub use author::{Author, AuthorDraft, AuthorSummary};
pub use book::{Book, BookDraft, BookSummary};
pub use envelope::{ApiEnvelope, MaybeEnveloped};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{EntityId, Identified};
pub use magazine::{AuthorRefs, Magazine, MagazineDraft, MagazineRequest, MagazineSummary};
pub use page::{DEFAULT_PAGE_SIZE, Page, PageQuery, SortDirection};
pub use publication::{
    GroupedPublications, Publication, PublicationDraft, PublicationSummary, PublicationType,
};
