//! Catalog service routes, relative to the configured API base
//! (for example `http://localhost:8080/api/v1`).

/// Default API base when nothing is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api/v1";

/// Author endpoints
pub mod authors {
    pub const COLLECTION: &str = "/authors";
}

/// Book endpoints
pub mod books {
    pub const COLLECTION: &str = "/books";
    /// Lookup by ISBN (append `/{isbn}`)
    pub const BY_ISBN: &str = "/books/isbn";
    /// Books of one author (append `/{author_id}`)
    pub const BY_AUTHOR: &str = "/books/author";
}

/// Magazine endpoints
pub mod magazines {
    pub const COLLECTION: &str = "/magazines";
}

/// Publication endpoints
pub mod publications {
    pub const COLLECTION: &str = "/publications";
    /// Paged title search (`title` query parameter)
    pub const SEARCH_TITLE: &str = "/publications/search/title";
    /// Books and magazines in one response
    pub const GROUPED: &str = "/publications/grouped";
    /// Title existence check (append `/{title}/exists`)
    pub const BY_TITLE: &str = "/publications/title";
}

/// Suffix for `/{collection}/{id}/exists`
pub const EXISTS_SUFFIX: &str = "exists";

/// Path of one entity inside a collection.
pub fn item(collection: &str, id: i64) -> String {
    format!("{collection}/{id}")
}

/// Path segment with reserved characters percent-encoded.
pub fn segment(collection: &str, raw: &str) -> String {
    format!("{collection}/{}", urlencoding::encode(raw))
}
