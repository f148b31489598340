//! In-memory stand-in for the catalog service.
//!
//! Speaks the same routes and envelopes as the real server so the console
//! can run without a backend (`--demo`) and integration tests can exercise
//! the full controller → client → gateway path.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use parking_lot::RwLock;
use publisher_model::{
    ApiEnvelope, Author, AuthorDraft, AuthorSummary, Book, BookDraft, BookSummary, EntityId,
    GroupedPublications, Magazine, MagazineRequest, MagazineSummary, Page, PageQuery,
    Publication, PublicationSummary, PublicationType, SortDirection,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::infra::error::{ApiError, ApiResult};
use crate::infra::transport::{ApiRequest, Transport};

#[derive(Debug, Clone)]
struct StoredAuthor {
    id: EntityId,
    name: String,
    birth_date: Option<NaiveDate>,
    nationality: Option<String>,
}

#[derive(Debug, Clone)]
struct StoredBook {
    id: EntityId,
    title: String,
    publication_date: Option<NaiveDate>,
    isbn: String,
    author_id: EntityId,
}

#[derive(Debug, Clone)]
struct StoredMagazine {
    id: EntityId,
    title: String,
    publication_date: Option<NaiveDate>,
    issue_number: i32,
    author_ids: Vec<EntityId>,
}

#[derive(Debug, Default)]
struct CatalogState {
    authors: Vec<StoredAuthor>,
    books: Vec<StoredBook>,
    magazines: Vec<StoredMagazine>,
    next_author_id: EntityId,
    // Books and magazines share one id space, as publications.
    next_publication_id: EntityId,
    requests: Vec<ApiRequest>,
}

/// Transport backed by an in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    inner: Arc<RwLock<CatalogState>>,
}

type Reply = ApiResult<Value>;

fn status(code: u16, message: impl Into<String>) -> ApiError {
    ApiError::Status {
        status: code,
        message: message.into(),
    }
}

fn not_found(kind: &str, id: impl std::fmt::Display) -> ApiError {
    status(404, format!("{kind} not found with id: {id}"))
}

fn envelope<T: Serialize>(data: T, message: &str) -> Reply {
    Ok(serde_json::to_value(ApiEnvelope::ok(data, message))?)
}

fn body<T: DeserializeOwned>(request: &ApiRequest) -> ApiResult<T> {
    let value = request
        .body
        .clone()
        .ok_or_else(|| status(400, "Request body is required"))?;
    serde_json::from_value(value).map_err(|err| status(400, format!("Malformed request: {err}")))
}

fn parse_date(raw: &str) -> ApiResult<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| status(400, format!("Invalid date: {raw}")))
}

fn parse_id(raw: &str) -> ApiResult<EntityId> {
    raw.parse()
        .map_err(|_| status(400, format!("Invalid id: {raw}")))
}

fn required(value: &str, field: &str) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(status(400, format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Cursor from the query string, falling back to the defaults the console
/// would send.
fn page_query(request: &ApiRequest) -> ApiResult<PageQuery> {
    let mut query = PageQuery::default();
    if let Some(page) = request.query_param("page") {
        query.page = page
            .parse()
            .map_err(|_| status(400, format!("Invalid page: {page}")))?;
    }
    if let Some(size) = request.query_param("size") {
        query.size = size
            .parse::<u32>()
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| status(400, format!("Invalid size: {size}")))?;
    }
    if let Some(sort) = request.query_param("sort") {
        query.sort = sort
            .parse()
            .map_err(|_| status(400, format!("Invalid sort: {sort}")))?;
    }
    Ok(query)
}

/// Orders by id in the requested direction, then slices out the page.
fn paginate<T: Clone>(mut rows: Vec<(EntityId, T)>, query: &PageQuery) -> Page<T> {
    rows.sort_by_key(|(id, _)| *id);
    if query.sort == SortDirection::Desc {
        rows.reverse();
    }
    let rows: Vec<T> = rows.into_iter().map(|(_, row)| row).collect();
    Page::from_slice(&rows, query)
}

impl CatalogState {
    fn author_summary(&self, id: EntityId) -> Option<AuthorSummary> {
        self.authors
            .iter()
            .find(|a| a.id == id)
            .map(|a| AuthorSummary {
                id: a.id,
                name: a.name.clone(),
                nationality: a.nationality.clone(),
                birth_date: a.birth_date,
            })
    }

    fn render_book(&self, book: &StoredBook) -> Book {
        Book {
            id: book.id,
            title: book.title.clone(),
            publication_date: book.publication_date,
            publication_type: Some(PublicationType::Book),
            isbn: book.isbn.clone(),
            author: self.author_summary(book.author_id),
        }
    }

    fn render_magazine(&self, magazine: &StoredMagazine) -> Magazine {
        Magazine {
            id: magazine.id,
            title: magazine.title.clone(),
            publication_date: magazine.publication_date,
            publication_type: Some(PublicationType::Magazine),
            issue_number: magazine.issue_number,
            authors: magazine
                .author_ids
                .iter()
                .filter_map(|id| self.author_summary(*id))
                .collect(),
        }
    }

    fn render_author(&self, author: &StoredAuthor) -> Author {
        Author {
            id: author.id,
            name: author.name.clone(),
            birth_date: author.birth_date,
            nationality: author.nationality.clone(),
            books: self
                .books
                .iter()
                .filter(|b| b.author_id == author.id)
                .map(|b| self.render_book(b).summary())
                .collect(),
            magazines: self
                .magazines
                .iter()
                .filter(|m| m.author_ids.contains(&author.id))
                .map(|m| self.render_magazine(m).summary())
                .collect(),
        }
    }

    fn book_summary(&self, book: &StoredBook) -> BookSummary {
        self.render_book(book).summary()
    }

    fn magazine_summary(&self, magazine: &StoredMagazine) -> MagazineSummary {
        self.render_magazine(magazine).summary()
    }

    fn publication_rows(&self) -> Vec<(EntityId, PublicationSummary)> {
        let books = self.books.iter().map(|b| {
            (
                b.id,
                PublicationSummary {
                    id: b.id,
                    title: b.title.clone(),
                    publication_date: b.publication_date,
                    publication_type: PublicationType::Book,
                },
            )
        });
        let magazines = self.magazines.iter().map(|m| {
            (
                m.id,
                PublicationSummary {
                    id: m.id,
                    title: m.title.clone(),
                    publication_date: m.publication_date,
                    publication_type: PublicationType::Magazine,
                },
            )
        });
        books.chain(magazines).collect()
    }

    fn publication(&self, id: EntityId) -> Option<PublicationSummary> {
        self.publication_rows()
            .into_iter()
            .map(|(_, row)| row)
            .find(|row| row.id == id)
    }

    fn isbn_taken(&self, isbn: &str, except: Option<EntityId>) -> bool {
        self.books
            .iter()
            .any(|b| b.isbn == isbn && Some(b.id) != except)
    }

    fn validate_book(&self, draft: &BookDraft, except: Option<EntityId>) -> ApiResult<StoredBook> {
        let title = required(&draft.title, "Title")?;
        let isbn = required(&draft.isbn, "ISBN")?;
        if self.isbn_taken(&isbn, except) {
            return Err(status(409, format!("Book with ISBN {isbn} already exists")));
        }
        if self.author_summary(draft.author_id).is_none() {
            return Err(not_found("Author", draft.author_id));
        }
        Ok(StoredBook {
            id: except.unwrap_or_default(),
            title,
            publication_date: parse_date(&draft.publication_date)?,
            isbn,
            author_id: draft.author_id,
        })
    }

    fn validate_magazine(
        &self,
        request: &MagazineRequest,
        id: EntityId,
    ) -> ApiResult<StoredMagazine> {
        let title = required(&request.title, "Title")?;
        if let Some(missing) = request
            .author_ids
            .iter()
            .find(|id| self.author_summary(**id).is_none())
        {
            return Err(not_found("Author", missing));
        }
        Ok(StoredMagazine {
            id,
            title,
            publication_date: parse_date(&request.publication_date)?,
            issue_number: request.issue_number,
            author_ids: request.author_ids.clone(),
        })
    }

    fn next_publication_id(&mut self) -> EntityId {
        self.next_publication_id += 1;
        self.next_publication_id
    }

    fn remove_author(&mut self, id: EntityId) -> ApiResult<()> {
        let before = self.authors.len();
        self.authors.retain(|a| a.id != id);
        if self.authors.len() == before {
            return Err(not_found("Author", id));
        }
        self.books.retain(|b| b.author_id != id);
        for magazine in &mut self.magazines {
            magazine.author_ids.retain(|author| *author != id);
        }
        Ok(())
    }

    fn remove_publication(&mut self, id: EntityId) -> bool {
        let before = self.books.len() + self.magazines.len();
        self.books.retain(|b| b.id != id);
        self.magazines.retain(|m| m.id != id);
        before != self.books.len() + self.magazines.len()
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with a handful of authors, books and magazines for demo mode.
    pub fn seeded() -> Self {
        let catalog = Self::new();
        {
            let mut state = catalog.inner.write();
            for (name, born, nationality) in [
                ("Ursula K. Le Guin", "1929-10-21", "American"),
                ("Chinua Achebe", "1930-11-16", "Nigerian"),
                ("Italo Calvino", "1923-10-15", "Italian"),
            ] {
                state.next_author_id += 1;
                let id = state.next_author_id;
                state.authors.push(StoredAuthor {
                    id,
                    name: name.to_string(),
                    birth_date: NaiveDate::parse_from_str(born, "%Y-%m-%d").ok(),
                    nationality: Some(nationality.to_string()),
                });
            }
            for (title, date, isbn, author_id) in [
                ("The Dispossessed", "1974-05-01", "978-0-06-051275-9", 1),
                ("Things Fall Apart", "1958-06-17", "978-0-385-47454-2", 2),
                ("Invisible Cities", "1972-11-01", "978-0-15-645380-6", 3),
                ("The Left Hand of Darkness", "1969-03-01", "978-0-441-47812-5", 1),
            ] {
                let id = state.next_publication_id();
                state.books.push(StoredBook {
                    id,
                    title: title.to_string(),
                    publication_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
                    isbn: isbn.to_string(),
                    author_id,
                });
            }
            for (title, issue, authors) in [
                ("Literary Quarterly", 12, vec![1, 3]),
                ("African Letters", 4, vec![2]),
            ] {
                let id = state.next_publication_id();
                state.magazines.push(StoredMagazine {
                    id,
                    title: title.to_string(),
                    publication_date: None,
                    issue_number: issue,
                    author_ids: authors,
                });
            }
        }
        catalog
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.inner.read().requests.clone()
    }

    pub fn author_count(&self) -> usize {
        self.inner.read().authors.len()
    }

    pub fn publication_count(&self) -> usize {
        let state = self.inner.read();
        state.books.len() + state.magazines.len()
    }

    fn route(&self, request: &ApiRequest) -> Reply {
        let segments: Vec<String> = request
            .path
            .trim_matches('/')
            .split('/')
            .map(|segment| {
                urlencoding::decode(segment)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| segment.to_string())
            })
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match segments.as_slice() {
            ["authors", rest @ ..] => self.authors(request, rest),
            ["books", rest @ ..] => self.books(request, rest),
            ["magazines", rest @ ..] => self.magazines(request, rest),
            ["publications", rest @ ..] => self.publications(request, rest),
            _ => Err(status(404, format!("No route for {}", request.path))),
        }
    }

    fn authors(&self, request: &ApiRequest, rest: &[&str]) -> Reply {
        match (request.method.as_str(), rest) {
            ("GET", []) => {
                let query = page_query(request)?;
                let state = self.inner.read();
                let rows = state
                    .authors
                    .iter()
                    .map(|a| (a.id, state.render_author(a)))
                    .collect();
                envelope(paginate(rows, &query), "Authors retrieved successfully")
            }
            ("POST", []) => {
                let draft: AuthorDraft = body(request)?;
                let name = required(&draft.name, "Name")?;
                let birth_date = parse_date(&draft.birth_date)?;
                let mut state = self.inner.write();
                state.next_author_id += 1;
                let author = StoredAuthor {
                    id: state.next_author_id,
                    name,
                    birth_date,
                    nationality: Some(draft.nationality.trim().to_string())
                        .filter(|n| !n.is_empty()),
                };
                let rendered = state.render_author(&author);
                state.authors.push(author);
                envelope(rendered, "Author created successfully")
            }
            ("GET", [id]) => {
                let id = parse_id(id)?;
                let state = self.inner.read();
                let author = state
                    .authors
                    .iter()
                    .find(|a| a.id == id)
                    .ok_or_else(|| not_found("Author", id))?;
                envelope(state.render_author(author), "Author retrieved successfully")
            }
            ("PUT", [id]) => {
                let id = parse_id(id)?;
                let draft: AuthorDraft = body(request)?;
                let name = required(&draft.name, "Name")?;
                let birth_date = parse_date(&draft.birth_date)?;
                let mut state = self.inner.write();
                let author = state
                    .authors
                    .iter_mut()
                    .find(|a| a.id == id)
                    .ok_or_else(|| not_found("Author", id))?;
                author.name = name;
                author.birth_date = birth_date;
                author.nationality =
                    Some(draft.nationality.trim().to_string()).filter(|n| !n.is_empty());
                let author = author.clone();
                envelope(state.render_author(&author), "Author updated successfully")
            }
            ("DELETE", [id]) => {
                let id = parse_id(id)?;
                self.inner.write().remove_author(id)?;
                envelope(Value::Null, "Author deleted successfully")
            }
            _ => Err(status(405, "Method not allowed")),
        }
    }

    fn books(&self, request: &ApiRequest, rest: &[&str]) -> Reply {
        match (request.method.as_str(), rest) {
            ("GET", []) => {
                let query = page_query(request)?;
                let state = self.inner.read();
                let rows = state
                    .books
                    .iter()
                    .map(|b| (b.id, state.render_book(b)))
                    .collect();
                envelope(paginate(rows, &query), "Books retrieved successfully")
            }
            ("POST", []) => {
                let draft: BookDraft = body(request)?;
                let mut state = self.inner.write();
                let mut book = state.validate_book(&draft, None)?;
                book.id = state.next_publication_id();
                let rendered = state.render_book(&book);
                state.books.push(book);
                envelope(rendered, "Book created successfully")
            }
            ("GET", ["isbn", isbn]) => {
                let state = self.inner.read();
                let book = state
                    .books
                    .iter()
                    .find(|b| b.isbn == *isbn)
                    .ok_or_else(|| status(404, format!("Book not found with ISBN: {isbn}")))?;
                envelope(state.render_book(book), "Book retrieved successfully")
            }
            ("GET", ["author", author_id]) => {
                let author_id = parse_id(author_id)?;
                let query = page_query(request)?;
                let state = self.inner.read();
                if state.author_summary(author_id).is_none() {
                    return Err(not_found("Author", author_id));
                }
                let rows = state
                    .books
                    .iter()
                    .filter(|b| b.author_id == author_id)
                    .map(|b| (b.id, state.render_book(b)))
                    .collect();
                envelope(paginate(rows, &query), "Books retrieved successfully")
            }
            ("GET", [id, "exists"]) => {
                let id = parse_id(id)?;
                let exists = self.inner.read().books.iter().any(|b| b.id == id);
                envelope(exists, "Existence checked")
            }
            ("GET", [id]) => {
                let id = parse_id(id)?;
                let state = self.inner.read();
                let book = state
                    .books
                    .iter()
                    .find(|b| b.id == id)
                    .ok_or_else(|| not_found("Book", id))?;
                envelope(state.render_book(book), "Book retrieved successfully")
            }
            ("PUT", [id]) => {
                let id = parse_id(id)?;
                let draft: BookDraft = body(request)?;
                let mut state = self.inner.write();
                if !state.books.iter().any(|b| b.id == id) {
                    return Err(not_found("Book", id));
                }
                let updated = state.validate_book(&draft, Some(id))?;
                let rendered = state.render_book(&updated);
                if let Some(slot) = state.books.iter_mut().find(|b| b.id == id) {
                    *slot = updated;
                }
                envelope(rendered, "Book updated successfully")
            }
            ("DELETE", [id]) => {
                let id = parse_id(id)?;
                let mut state = self.inner.write();
                let before = state.books.len();
                state.books.retain(|b| b.id != id);
                if state.books.len() == before {
                    return Err(not_found("Book", id));
                }
                envelope(Value::Null, "Book deleted successfully")
            }
            _ => Err(status(405, "Method not allowed")),
        }
    }

    fn magazines(&self, request: &ApiRequest, rest: &[&str]) -> Reply {
        match (request.method.as_str(), rest) {
            ("GET", []) => {
                let query = page_query(request)?;
                let state = self.inner.read();
                let rows = state
                    .magazines
                    .iter()
                    .map(|m| (m.id, state.render_magazine(m)))
                    .collect();
                envelope(paginate(rows, &query), "Magazines retrieved successfully")
            }
            ("POST", []) => {
                let payload: MagazineRequest = body(request)?;
                let mut state = self.inner.write();
                let mut magazine = state.validate_magazine(&payload, 0)?;
                magazine.id = state.next_publication_id();
                let rendered = state.render_magazine(&magazine);
                state.magazines.push(magazine);
                envelope(rendered, "Magazine created successfully")
            }
            ("GET", [id]) => {
                let id = parse_id(id)?;
                let state = self.inner.read();
                let magazine = state
                    .magazines
                    .iter()
                    .find(|m| m.id == id)
                    .ok_or_else(|| not_found("Magazine", id))?;
                envelope(state.render_magazine(magazine), "Magazine retrieved successfully")
            }
            ("PUT", [id]) => {
                let id = parse_id(id)?;
                let payload: MagazineRequest = body(request)?;
                let mut state = self.inner.write();
                if !state.magazines.iter().any(|m| m.id == id) {
                    return Err(not_found("Magazine", id));
                }
                let updated = state.validate_magazine(&payload, id)?;
                let rendered = state.render_magazine(&updated);
                if let Some(slot) = state.magazines.iter_mut().find(|m| m.id == id) {
                    *slot = updated;
                }
                envelope(rendered, "Magazine updated successfully")
            }
            ("DELETE", [id]) => {
                let id = parse_id(id)?;
                let mut state = self.inner.write();
                let before = state.magazines.len();
                state.magazines.retain(|m| m.id != id);
                if state.magazines.len() == before {
                    return Err(not_found("Magazine", id));
                }
                envelope(Value::Null, "Magazine deleted successfully")
            }
            _ => Err(status(405, "Method not allowed")),
        }
    }

    fn publications(&self, request: &ApiRequest, rest: &[&str]) -> Reply {
        match (request.method.as_str(), rest) {
            ("GET", []) => {
                let query = page_query(request)?;
                let rows = self.inner.read().publication_rows();
                envelope(paginate(rows, &query), "Publications retrieved successfully")
            }
            ("GET", ["grouped"]) => {
                let state = self.inner.read();
                let grouped = GroupedPublications {
                    books: state.books.iter().map(|b| state.book_summary(b)).collect(),
                    magazines: state
                        .magazines
                        .iter()
                        .map(|m| state.magazine_summary(m))
                        .collect(),
                };
                envelope(grouped, "Publications grouped successfully")
            }
            ("GET", ["search", "title"]) => {
                let title = request
                    .query_param("title")
                    .ok_or_else(|| status(400, "Missing title parameter"))?
                    .to_lowercase();
                let query = page_query(request)?;
                let rows = self
                    .inner
                    .read()
                    .publication_rows()
                    .into_iter()
                    .filter(|(_, row)| row.title.to_lowercase().contains(&title))
                    .collect();
                envelope(paginate(rows, &query), "Publications found")
            }
            ("GET", ["title", title, "exists"]) => {
                let exists = self
                    .inner
                    .read()
                    .publication_rows()
                    .iter()
                    .any(|(_, row)| row.title.eq_ignore_ascii_case(title));
                envelope(exists, "Existence checked")
            }
            ("GET", [id, "exists"]) => {
                let id = parse_id(id)?;
                let exists = self.inner.read().publication(id).is_some();
                envelope(exists, "Existence checked")
            }
            ("GET", [id]) => {
                let id = parse_id(id)?;
                let row = self
                    .inner
                    .read()
                    .publication(id)
                    .ok_or_else(|| not_found("Publication", id))?;
                let publication = Publication {
                    id: row.id,
                    title: row.title,
                    publication_date: row.publication_date,
                };
                envelope(publication, "Publication retrieved successfully")
            }
            ("DELETE", [id]) => {
                let id = parse_id(id)?;
                if !self.inner.write().remove_publication(id) {
                    return Err(not_found("Publication", id));
                }
                envelope(Value::Null, "Publication deleted successfully")
            }
            _ => Err(status(405, "Method not allowed")),
        }
    }
}

#[async_trait]
impl Transport for InMemoryCatalog {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        debug!("[InMemoryCatalog] {}", request);
        self.inner.write().requests.push(request.clone());
        self.route(&request)
    }
}
