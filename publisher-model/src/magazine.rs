use chrono::NaiveDate;

use crate::author::AuthorSummary;
use crate::ids::{EntityId, Identified};
use crate::publication::PublicationType;

/// Magazine record; list, get, create and update all return this shape.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Magazine {
    pub id: EntityId,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub publication_date: Option<NaiveDate>,
    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub publication_type: Option<PublicationType>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub issue_number: i32,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::serde_util::null_as_default")
    )]
    pub authors: Vec<AuthorSummary>,
}

/// Magazine projection embedded in author records and grouped listings.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MagazineSummary {
    pub id: EntityId,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub publication_date: Option<NaiveDate>,
    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub publication_type: Option<PublicationType>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub issue_number: i32,
}

/// Author references as held by a magazine form: either the typed id list
/// a multi-select produces, or raw comma-separated text typed by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AuthorRefs {
    Ids(Vec<EntityId>),
    Text(String),
}

impl Default for AuthorRefs {
    fn default() -> Self {
        AuthorRefs::Ids(Vec::new())
    }
}

impl AuthorRefs {
    /// Editable text form, e.g. `"3, 1, 7"`.
    pub fn to_text(&self) -> String {
        match self {
            AuthorRefs::Ids(ids) => ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            AuthorRefs::Text(text) => text.clone(),
        }
    }
}

impl From<Vec<EntityId>> for AuthorRefs {
    fn from(ids: Vec<EntityId>) -> Self {
        AuthorRefs::Ids(ids)
    }
}

impl From<&str> for AuthorRefs {
    fn from(text: &str) -> Self {
        AuthorRefs::Text(text.to_string())
    }
}

/// Editable magazine fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct MagazineDraft {
    pub title: String,
    pub publication_date: String,
    pub issue_number: i32,
    pub author_ids: AuthorRefs,
}

/// Body sent on magazine create/update, with author references already
/// reduced to ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct MagazineRequest {
    pub title: String,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "crate::serde_util::is_blank")
    )]
    pub publication_date: String,
    pub issue_number: i32,
    pub author_ids: Vec<EntityId>,
}

impl Magazine {
    pub fn summary(&self) -> MagazineSummary {
        MagazineSummary {
            id: self.id,
            title: self.title.clone(),
            publication_date: self.publication_date,
            publication_type: self.publication_type,
            issue_number: self.issue_number,
        }
    }
}

impl Identified for Magazine {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Identified for MagazineSummary {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl From<&Magazine> for MagazineDraft {
    fn from(magazine: &Magazine) -> Self {
        Self {
            title: magazine.title.clone(),
            publication_date: magazine
                .publication_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
            issue_number: magazine.issue_number,
            author_ids: AuthorRefs::Ids(magazine.authors.iter().map(|a| a.id).collect()),
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn author_refs_accepts_either_shape() {
        let ids: AuthorRefs = serde_json::from_str("[3, 1]").unwrap();
        assert_eq!(ids, AuthorRefs::Ids(vec![3, 1]));

        let text: AuthorRefs = serde_json::from_str(r#""3, 1""#).unwrap();
        assert_eq!(text, AuthorRefs::Text("3, 1".into()));
    }

    #[test]
    fn edit_seed_lists_author_ids_in_order() {
        let magazine = Magazine {
            id: 9,
            title: "Monthly".into(),
            issue_number: 12,
            authors: vec![
                AuthorSummary { id: 5, name: "B".into(), ..Default::default() },
                AuthorSummary { id: 2, name: "A".into(), ..Default::default() },
            ],
            ..Default::default()
        };

        let draft = MagazineDraft::from(&magazine);
        assert_eq!(draft.author_ids, AuthorRefs::Ids(vec![5, 2]));
        assert_eq!(draft.author_ids.to_text(), "5, 2");
    }
}
