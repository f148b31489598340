//! Constants module for centralized configuration values

pub mod routes;

pub use routes::DEFAULT_API_BASE;
