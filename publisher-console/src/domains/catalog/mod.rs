//! Catalog domain: entity kinds, the paginated controller that drives every
//! entity screen, and the author-relation normalizer used by magazines.

pub mod controller;
pub mod error;
pub mod kind;
pub mod relation;
pub mod state;

pub use controller::PaginatedResourceController;
pub use error::{ControllerError, ControllerResult};
pub use kind::{AuthorKind, BookKind, EntityKind, MagazineKind, PublicationKind};
pub use relation::{ParsedRelation, normalize, parse_relation_ids};
pub use state::{ControllerState, DialogMode, DialogState};
