//! Deserialization helpers for platform responses.

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like a missing field.
///
/// The platform encodes empty lists and maps as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
