use chrono::NaiveDate;

use crate::book::BookSummary;
use crate::ids::{EntityId, Identified};
use crate::magazine::MagazineSummary;

/// Full author record, including snapshots of the author's publications.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Author {
    pub id: EntityId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub birth_date: Option<NaiveDate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub nationality: Option<String>,
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

/// Reduced author projection embedded in books and magazines.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AuthorSummary {
    pub id: EntityId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub nationality: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub birth_date: Option<NaiveDate>,
}

/// Editable author fields. Dates stay textual (`YYYY-MM-DD`) until the
/// server validates them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct AuthorDraft {
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "crate::serde_util::is_blank")
    )]
    pub birth_date: String,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "crate::serde_util::is_blank")
    )]
    pub nationality: String,
}

impl Author {
    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            name: self.name.clone(),
            nationality: self.nationality.clone(),
            birth_date: self.birth_date,
        }
    }
}

impl Identified for Author {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Identified for AuthorSummary {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl AuthorDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl From<&Author> for AuthorDraft {
    fn from(author: &Author) -> Self {
        Self {
            name: author.name.clone(),
            birth_date: author
                .birth_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
            nationality: author.nationality.clone().unwrap_or_default(),
        }
    }
}
