//! Stand-ins for the catalog service, used by demo mode and tests

pub mod stubs;

pub use stubs::InMemoryCatalog;
