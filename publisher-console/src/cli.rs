use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use publisher_model::{
    Author, AuthorDraft, AuthorRefs, Book, BookDraft, EntityId, Magazine, MagazineDraft,
    ModelError, PageQuery, PublicationSummary, SortDirection,
};

use publisher_console::app::Catalog;
use publisher_console::domains::catalog::{
    ControllerState, EntityKind, PaginatedResourceController, parse_relation_ids,
};
use publisher_console::infra::services::EntityClient;

#[derive(Parser, Debug)]
#[command(name = "publisher-console")]
#[command(about = "Administration console for the publisher catalog service")]
pub struct Cli {
    /// Catalog API base URL (overrides PUBLISHER_API_URL)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Use the seeded in-memory catalog instead of a server
    #[arg(long, global = true, default_value_t = false)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EntityArg {
    Authors,
    Books,
    Magazines,
    Publications,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List one page of a collection
    List {
        kind: EntityArg,
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
        /// ASC or DESC
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortDirection>,
    },
    /// Show one record
    Get { kind: EntityArg, id: EntityId },
    /// Delete one record
    Delete { kind: EntityArg, id: EntityId },
    /// Search publications by title
    Search { title: String },
    /// Show all books and magazines, split by type
    Grouped,
    /// Create an author
    AddAuthor {
        name: String,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        birth_date: String,
        #[arg(long, default_value = "")]
        nationality: String,
    },
    /// Create a book
    AddBook {
        title: String,
        #[arg(long)]
        isbn: String,
        #[arg(long)]
        author_id: EntityId,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        publication_date: String,
    },
    /// Create a magazine
    AddMagazine {
        title: String,
        #[arg(long, default_value_t = 0)]
        issue_number: i32,
        /// Comma-separated author ids, e.g. "1, 4"
        #[arg(long, default_value = "")]
        authors: String,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        publication_date: String,
    },
    /// Look a book up by ISBN
    BookByIsbn { isbn: String },
}

fn parse_sort(raw: &str) -> Result<SortDirection, ModelError> {
    raw.parse()
}

/// One-line rendering of a list row
trait Row {
    fn row(&self) -> String;
}

fn date_or_dash(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

impl Row for Author {
    fn row(&self) -> String {
        format!(
            "{:>5}  {:<32} {:<12} {:<14} books: {}, magazines: {}",
            self.id,
            self.name,
            date_or_dash(self.birth_date),
            self.nationality.as_deref().unwrap_or("-"),
            self.books.len(),
            self.magazines.len()
        )
    }
}

impl Row for Book {
    fn row(&self) -> String {
        format!(
            "{:>5}  {:<32} {:<12} {:<20} {}",
            self.id,
            self.title,
            date_or_dash(self.publication_date),
            self.isbn,
            self.author.as_ref().map(|a| a.name.as_str()).unwrap_or("-")
        )
    }
}

impl Row for Magazine {
    fn row(&self) -> String {
        let authors = self
            .authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{:>5}  {:<32} {:<12} issue {:<4} {}",
            self.id,
            self.title,
            date_or_dash(self.publication_date),
            self.issue_number,
            authors
        )
    }
}

impl Row for PublicationSummary {
    fn row(&self) -> String {
        format!(
            "{:>5}  {:<32} {:<12} {}",
            self.id,
            self.title,
            date_or_dash(self.publication_date),
            self.publication_type
        )
    }
}

fn print_page<K>(state: &ControllerState<K>)
where
    K: EntityKind,
    K::Item: Row,
{
    println!(
        "{} - page {} of {} ({} record(s), {} per page, {})",
        K::LABEL,
        state.page + 1,
        state.total_pages.max(1),
        state.total_records,
        state.page_size,
        state.sort
    );
    if state.items.is_empty() {
        println!("  (no records)");
    }
    for item in &state.items {
        println!("  {}", item.row());
    }
}

async fn list<K, C>(
    controller: &PaginatedResourceController<K, C>,
    page: u32,
    size: Option<u32>,
    sort: Option<SortDirection>,
) -> Result<()>
where
    K: EntityKind,
    K::Item: Row,
    C: EntityClient<K>,
{
    let current = controller.snapshot().query();
    let query = PageQuery {
        page,
        size: size.unwrap_or(current.size),
        sort: sort.unwrap_or(current.sort),
    };
    controller
        .load(query)
        .await
        .with_context(|| format!("failed to list {}", K::LABEL))?;
    print_page(&controller.snapshot());
    Ok(())
}

async fn show<K, C>(controller: &PaginatedResourceController<K, C>, id: EntityId) -> Result<()>
where
    K: EntityKind,
    C: EntityClient<K>,
{
    let detail = controller
        .client()
        .get(id)
        .await
        .with_context(|| format!("failed to fetch {} #{id}", K::LABEL))?;
    println!("{detail:#?}");
    Ok(())
}

/// Fetches the record, shows the confirmation, then confirms it.
async fn delete<K, C>(controller: &PaginatedResourceController<K, C>, id: EntityId) -> Result<()>
where
    K: EntityKind,
    C: EntityClient<K>,
{
    let detail = controller
        .client()
        .get(id)
        .await
        .with_context(|| format!("failed to fetch {} #{id}", K::LABEL))?;
    controller.request_delete(K::item_from_detail(&detail))?;
    controller
        .confirm_delete()
        .await
        .with_context(|| format!("failed to delete {} #{id}", K::LABEL))?;
    println!(
        "Deleted {} #{id}; {} record(s) remain",
        K::LABEL,
        controller.snapshot().total_records
    );
    Ok(())
}

/// Opens the create dialog with `draft` and submits it.
async fn create<K, C>(
    controller: &PaginatedResourceController<K, C>,
    draft: K::Draft,
) -> Result<K::Detail>
where
    K: EntityKind,
    C: EntityClient<K>,
{
    controller.open_create();
    controller.set_draft(draft)?;
    let created = controller.save().await;
    if created.is_err() {
        controller.close_dialog();
    }
    let created = created.with_context(|| format!("failed to create {} record", K::LABEL))?;

    let state = controller.snapshot();
    if let Some(err) = state.last_error {
        log::warn!("[Console] Created, but the list could not be refreshed: {err}");
    }
    Ok(created)
}

pub async fn run(command: Command, catalog: &Catalog) -> Result<()> {
    match command {
        Command::List {
            kind,
            page,
            size,
            sort,
        } => match kind {
            EntityArg::Authors => list(&catalog.authors, page, size, sort).await,
            EntityArg::Books => list(&catalog.books, page, size, sort).await,
            EntityArg::Magazines => list(&catalog.magazines, page, size, sort).await,
            EntityArg::Publications => list(&catalog.publications, page, size, sort).await,
        },
        Command::Get { kind, id } => match kind {
            EntityArg::Authors => show(&catalog.authors, id).await,
            EntityArg::Books => show(&catalog.books, id).await,
            EntityArg::Magazines => show(&catalog.magazines, id).await,
            EntityArg::Publications => show(&catalog.publications, id).await,
        },
        Command::Delete { kind, id } => match kind {
            EntityArg::Authors => delete(&catalog.authors, id).await,
            EntityArg::Books => delete(&catalog.books, id).await,
            EntityArg::Magazines => delete(&catalog.magazines, id).await,
            EntityArg::Publications => delete(&catalog.publications, id).await,
        },
        Command::Search { title } => {
            if title.trim().is_empty() {
                bail!("search title must not be blank");
            }
            catalog
                .publications
                .start(Some(&title))
                .await
                .with_context(|| format!("search for '{title}' failed"))?;
            print_page(&catalog.publications.snapshot());
            Ok(())
        }
        Command::Grouped => {
            let grouped = catalog
                .publications
                .client()
                .grouped()
                .await
                .context("failed to fetch grouped publications")?;
            println!("Books ({})", grouped.books.len());
            for book in &grouped.books {
                println!(
                    "  {:>5}  {:<32} {}",
                    book.id,
                    book.title,
                    book.author_name.as_deref().unwrap_or("-")
                );
            }
            println!("Magazines ({})", grouped.magazines.len());
            for magazine in &grouped.magazines {
                println!(
                    "  {:>5}  {:<32} issue {}",
                    magazine.id, magazine.title, magazine.issue_number
                );
            }
            Ok(())
        }
        Command::AddAuthor {
            name,
            birth_date,
            nationality,
        } => {
            let draft = AuthorDraft {
                name,
                birth_date,
                nationality,
            };
            let author = create(&catalog.authors, draft).await?;
            println!("Created author #{}: {}", author.id, author.name);
            Ok(())
        }
        Command::AddBook {
            title,
            isbn,
            author_id,
            publication_date,
        } => {
            let draft = BookDraft {
                title,
                publication_date,
                isbn,
                author_id,
            };
            let book = create(&catalog.books, draft).await?;
            println!("Created book #{}: {}", book.id, book.title);
            Ok(())
        }
        Command::AddMagazine {
            title,
            issue_number,
            authors,
            publication_date,
        } => {
            let author_ids = AuthorRefs::Text(authors);
            let parsed = parse_relation_ids(&author_ids);
            if !parsed.rejected.is_empty() {
                println!(
                    "Ignoring author references that are not ids: {}",
                    parsed.rejected.join(", ")
                );
            }
            let draft = MagazineDraft {
                title,
                publication_date,
                issue_number,
                author_ids,
            };
            let magazine = create(&catalog.magazines, draft).await?;
            println!(
                "Created magazine #{}: {} ({} author(s))",
                magazine.id,
                magazine.title,
                magazine.authors.len()
            );
            Ok(())
        }
        Command::BookByIsbn { isbn } => {
            let book = catalog
                .books
                .client()
                .find_by_isbn(&isbn)
                .await
                .with_context(|| format!("no book with ISBN {isbn}"))?;
            println!("{}", book.row());
            Ok(())
        }
    }
}
