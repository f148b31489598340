//! Author-reference normalization for magazine forms.
//!
//! A magazine's authors arrive either as typed ids (seeded from an existing
//! record) or as hand-typed text like `"1, 2, 4"`. The service only accepts
//! a list of integer ids, so text is split, trimmed and parsed here.

use publisher_model::{AuthorRefs, EntityId};

/// Result of parsing an author reference value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRelation {
    /// Ids in input order, duplicates kept
    pub ids: Vec<EntityId>,
    /// Non-empty trimmed tokens that did not parse as an id
    pub rejected: Vec<String>,
}

/// Parses `refs`, keeping track of the tokens that had to be dropped.
pub fn parse_relation_ids(refs: &AuthorRefs) -> ParsedRelation {
    match refs {
        AuthorRefs::Ids(ids) => ParsedRelation {
            ids: ids.clone(),
            rejected: Vec::new(),
        },
        AuthorRefs::Text(text) => {
            let mut parsed = ParsedRelation::default();
            for token in text.split(',').map(str::trim) {
                match token.parse::<EntityId>() {
                    Ok(id) => parsed.ids.push(id),
                    Err(_) if token.is_empty() => {}
                    Err(_) => parsed.rejected.push(token.to_string()),
                }
            }
            parsed
        }
    }
}

/// Reduces `refs` to the id list sent on create and update. Tokens that are
/// not integers are dropped.
pub fn normalize(refs: &AuthorRefs) -> Vec<EntityId> {
    parse_relation_ids(refs).ids
}
