//! Serde helpers for the service's loosely-typed JSON.

use serde::{Deserialize, Deserializer};

/// Treats an explicit `null` the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Blank optional form text is left out of request bodies.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
