//! Catalog service clients
//!
//! [`EntityClient`] is the seam between the controllers and the network;
//! [`RestEntityClient`] is the production implementation, with a few
//! kind-specific extras in the sibling modules.

pub mod books;
pub mod entity;
pub mod publications;

pub use entity::{EntityClient, RestEntityClient};
