use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Default number of rows requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sort direction token accepted by the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortDirection {
    #[cfg_attr(feature = "serde", serde(rename = "ASC"))]
    Asc,
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "DESC"))]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(ModelError::InvalidSort(s.to_string())),
        }
    }
}

/// Page cursor sent with every list or search request.
///
/// `page` is zero-based. The cursor is sent to the server as given; an index
/// past the last page simply yields an empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    pub sort: SortDirection,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: SortDirection::Desc,
        }
    }
}

impl PageQuery {
    pub fn new(page: u32, size: u32, sort: SortDirection) -> crate::error::Result<Self> {
        if size == 0 {
            return Err(ModelError::InvalidPageSize(size));
        }
        Ok(Self { page, size, sort })
    }

    /// Query-string pairs in the order the service documents them.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sort", self.sort.as_str().to_string()),
        ]
    }
}

/// One page of list results as returned inside the list envelope.
///
/// The service serialises a full Spring `Page`; fields beyond these five are
/// ignored on decode.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Page<T> {
    #[cfg_attr(feature = "serde", serde(default = "Vec::new"))]
    pub content: Vec<T>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub total_elements: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub total_pages: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub size: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub number: u32,
}

impl<T> Page<T> {
    /// An empty page positioned at the requested cursor.
    pub fn empty(query: &PageQuery) -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            size: query.size,
            number: query.page,
        }
    }

    /// Builds a page by slicing `all` at the cursor position.
    pub fn from_slice(all: &[T], query: &PageQuery) -> Self
    where
        T: Clone,
    {
        let size = query.size.max(1) as usize;
        let total_elements = all.len() as u64;
        let total_pages = all.len().div_ceil(size) as u32;
        let start = (query.page as usize).saturating_mul(size);
        let content = all.iter().skip(start).take(size).cloned().collect();

        Self {
            content,
            total_elements,
            total_pages,
            size: size as u32,
            number: query.page,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.total_pages == 0 || self.number.saturating_add(1) >= self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
        }
    }
}
