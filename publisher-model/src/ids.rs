/// Server-assigned numeric identifier shared by every entity kind.
pub type EntityId = i64;

/// Anything that carries a server-assigned id.
pub trait Identified {
    fn id(&self) -> EntityId;
}
