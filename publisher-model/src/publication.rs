use std::fmt;

use chrono::NaiveDate;

use crate::book::BookSummary;
use crate::ids::{EntityId, Identified};
use crate::magazine::MagazineSummary;

/// Concrete kind behind a generic publication row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PublicationType {
    Book,
    Magazine,
    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl PublicationType {
    /// Lenient parse; anything unrecognised is `Unknown`.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "BOOK" => PublicationType::Book,
            "MAGAZINE" => PublicationType::Magazine,
            _ => PublicationType::Unknown,
        }
    }
}

impl fmt::Display for PublicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            PublicationType::Book => "BOOK",
            PublicationType::Magazine => "MAGAZINE",
            PublicationType::Unknown => "UNKNOWN",
        };
        f.write_str(token)
    }
}

/// Detail view of a generic publication.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Publication {
    pub id: EntityId,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub publication_date: Option<NaiveDate>,
}

/// List row for the publications screen.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PublicationSummary {
    pub id: EntityId,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub publication_date: Option<NaiveDate>,
    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub publication_type: PublicationType,
}

/// Every publication split by concrete kind.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GroupedPublications {
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::serde_util::null_as_default")
    )]
    pub books: Vec<BookSummary>,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::serde_util::null_as_default")
    )]
    pub magazines: Vec<MagazineSummary>,
}

/// Editable publication fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PublicationDraft {
    pub title: String,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "crate::serde_util::is_blank")
    )]
    pub publication_date: String,
}

impl Identified for Publication {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Identified for PublicationSummary {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl From<&PublicationSummary> for PublicationDraft {
    fn from(summary: &PublicationSummary) -> Self {
        Self {
            title: summary.title.clone(),
            publication_date: summary
                .publication_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
        }
    }
}
