use chrono::NaiveDate;

use crate::author::AuthorSummary;
use crate::ids::{EntityId, Identified};
use crate::publication::PublicationType;

/// Book record as returned by list, get, create and update.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub publication_date: Option<NaiveDate>,
    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub publication_type: Option<PublicationType>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub isbn: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub author: Option<AuthorSummary>,
}

/// Book projection embedded in author records and grouped listings.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BookSummary {
    pub id: EntityId,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub publication_date: Option<NaiveDate>,
    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub publication_type: Option<PublicationType>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub isbn: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub author_name: Option<String>,
}

/// Editable book fields; `author_id` is `0` until an author is picked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct BookDraft {
    pub title: String,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "crate::serde_util::is_blank")
    )]
    pub publication_date: String,
    pub isbn: String,
    pub author_id: EntityId,
}

impl Book {
    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            title: self.title.clone(),
            publication_date: self.publication_date,
            publication_type: self.publication_type,
            isbn: self.isbn.clone(),
            author_name: self.author.as_ref().map(|author| author.name.clone()),
        }
    }
}

impl Identified for Book {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Identified for BookSummary {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            publication_date: book
                .publication_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
            isbn: book.isbn.clone(),
            author_id: book.author.as_ref().map(|author| author.id).unwrap_or(0),
        }
    }
}
