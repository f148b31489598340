use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use publisher_model::{PageQuery, SortDirection};
use url::Url;

use crate::domains::catalog::{
    AuthorKind, BookKind, MagazineKind, PaginatedResourceController, PublicationKind,
};
use crate::infra::activity::ActivityTracker;
use crate::infra::api_client::HttpTransport;
use crate::infra::constants::DEFAULT_API_BASE;
use crate::infra::error::ApiError;
use crate::infra::gateway::ResourceGateway;
use crate::infra::services::RestEntityClient;
use crate::infra::testing::InMemoryCatalog;
use crate::infra::transport::Transport;

pub const ENV_API_URL: &str = "PUBLISHER_API_URL";
pub const ENV_PAGE_SIZE: &str = "PUBLISHER_PAGE_SIZE";
pub const ENV_SORT: &str = "PUBLISHER_SORT";
pub const ENV_HTTP_TIMEOUT: &str = "PUBLISHER_HTTP_TIMEOUT_SECS";
pub const ENV_DEMO_MODE: &str = "PUBLISHER_DEMO_MODE";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not a valid URL: {value}")]
    InvalidUrl { key: &'static str, value: String },

    #[error("{key} must be a positive number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must be ASC or DESC, got '{value}'")]
    InvalidSort { key: &'static str, value: String },

    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),

    #[error(transparent)]
    Transport(#[from] ApiError),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_url: Arc<str>,
    pub page_size: u32,
    pub sort: SortDirection,
    pub request_timeout: Duration,
    pub use_test_stubs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl AppConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        let defaults = PageQuery::default();
        Self {
            server_url: Arc::from(server_url.into()),
            page_size: defaults.size,
            sort: defaults.sort,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_test_stubs: false,
        }
    }

    /// Loads an optional `.env`, then reads the `PUBLISHER_*` variables.
    pub fn from_environment() -> Result<Self, ConfigError> {
        let env_file_loaded = dotenvy::dotenv().map(|_| true).or_else(|err| match err {
            dotenvy::Error::Io(_) => Ok(false),
            _ => Err(err),
        })?;
        if env_file_loaded {
            info!("[Config] Loaded environment from .env");
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys keep their
    /// defaults.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            config = config.with_server_url(&url)?;
        }

        if let Some(raw) = get(ENV_PAGE_SIZE) {
            config.page_size = parse_positive(ENV_PAGE_SIZE, &raw)?;
        }

        if let Some(raw) = get(ENV_SORT) {
            config.sort = raw.parse().map_err(|_| ConfigError::InvalidSort {
                key: ENV_SORT,
                value: raw.clone(),
            })?;
        }

        if let Some(raw) = get(ENV_HTTP_TIMEOUT) {
            config.request_timeout =
                Duration::from_secs(parse_positive(ENV_HTTP_TIMEOUT, &raw)?.into());
        }

        if let Some(raw) = get(ENV_DEMO_MODE) {
            match parse_bool(&raw) {
                Some(enabled) => config.use_test_stubs = enabled,
                None => warn!(
                    "[Config] Ignoring {}={}: expected true/false",
                    ENV_DEMO_MODE, raw
                ),
            }
        }

        Ok(config)
    }

    /// Replaces the API base, rejecting anything that is not an http(s) URL.
    pub fn with_server_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidUrl {
            key: ENV_API_URL,
            value: raw.to_string(),
        };
        let parsed = Url::parse(raw.trim()).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid());
        }
        self.server_url = Arc::from(raw.trim().trim_end_matches('/'));
        Ok(self)
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn use_test_stubs(&self) -> bool {
        self.use_test_stubs
    }

    pub fn with_test_stubs(mut self, enabled: bool) -> Self {
        self.use_test_stubs = enabled;
        self
    }

    /// Cursor every controller starts from.
    pub fn initial_query(&self) -> PageQuery {
        PageQuery {
            page: 0,
            size: self.page_size,
            sort: self.sort,
        }
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| ConfigError::InvalidNumber {
            key,
            value: raw.to_string(),
        })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

pub type AuthorController =
    PaginatedResourceController<AuthorKind, RestEntityClient<AuthorKind>>;
pub type BookController = PaginatedResourceController<BookKind, RestEntityClient<BookKind>>;
pub type MagazineController =
    PaginatedResourceController<MagazineKind, RestEntityClient<MagazineKind>>;
pub type PublicationController =
    PaginatedResourceController<PublicationKind, RestEntityClient<PublicationKind>>;

/// Every screen's controller, wired to one transport and one activity
/// tracker.
#[derive(Debug)]
pub struct Catalog {
    pub activity: ActivityTracker,
    pub authors: AuthorController,
    pub books: BookController,
    pub magazines: MagazineController,
    pub publications: PublicationController,
}

impl Catalog {
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        activity: ActivityTracker,
        query: PageQuery,
    ) -> Self {
        let gateway = ResourceGateway::new(transport, activity.clone());
        Self {
            activity,
            authors: PaginatedResourceController::with_query(
                Arc::new(RestEntityClient::new(gateway.clone())),
                query,
            ),
            books: PaginatedResourceController::with_query(
                Arc::new(RestEntityClient::new(gateway.clone())),
                query,
            ),
            magazines: PaginatedResourceController::with_query(
                Arc::new(RestEntityClient::new(gateway.clone())),
                query,
            ),
            publications: PaginatedResourceController::with_query(
                Arc::new(RestEntityClient::new(gateway)),
                query,
            ),
        }
    }
}

/// Wires the catalog for `config`: the HTTP transport normally, the
/// in-memory stub catalog when test stubs are enabled.
pub fn boot(config: &AppConfig) -> Result<Catalog, ConfigError> {
    let transport: Arc<dyn Transport> = if config.use_test_stubs() {
        info!("[Bootstrap] Using in-memory catalog (demo mode)");
        Arc::new(InMemoryCatalog::seeded())
    } else {
        info!("[Bootstrap] Using catalog service at {}", config.server_url());
        Arc::new(HttpTransport::new(
            config.server_url(),
            config.request_timeout,
        )?)
    };

    Ok(Catalog::with_transport(
        transport,
        ActivityTracker::new(),
        config.initial_query(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server_url(), "http://localhost:8080/api/v1");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.sort, SortDirection::Desc);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.use_test_stubs());
    }

    #[test]
    fn environment_overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://catalog.example/api/v1/"),
            (ENV_PAGE_SIZE, "25"),
            (ENV_SORT, "asc"),
            (ENV_HTTP_TIMEOUT, "5"),
            (ENV_DEMO_MODE, "yes"),
        ]))
        .unwrap();

        assert_eq!(config.server_url(), "https://catalog.example/api/v1");
        assert_eq!(
            config.initial_query(),
            PageQuery::new(0, 25, SortDirection::Asc).unwrap()
        );
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.use_test_stubs());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_API_URL, "ftp://catalog")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_PAGE_SIZE, "0")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_SORT, "sideways")])),
            Err(ConfigError::InvalidSort { .. })
        ));
    }

    #[tokio::test]
    async fn demo_boot_serves_seeded_catalog() {
        let catalog = boot(&AppConfig::default().with_test_stubs(true)).unwrap();
        catalog.authors.start(None).await.unwrap();

        let state = catalog.authors.snapshot();
        assert_eq!(state.total_records, 3);
        assert!(!catalog.activity.is_busy());
    }
}
