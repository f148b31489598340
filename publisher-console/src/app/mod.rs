//! Application wiring: configuration and construction of the catalog
//! controllers.

pub mod bootstrap;

pub use bootstrap::{AppConfig, Catalog, ConfigError, boot};
