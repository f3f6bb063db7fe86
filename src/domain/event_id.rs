//! Type-safe completed-event identifier.
//!
//! [`EventId`] is a newtype wrapper around [`uuid::Uuid`] (v4) so archive
//! identifiers cannot be confused with other UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier of a completed event in the archive.
///
/// Generated once at finalization (or import) and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct EventId(uuid::Uuid);

impl EventId {
    /// Creates a new random `EventId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates an `EventId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Maps a free-form identifier to an `EventId`.
    ///
    /// UUID strings are taken as-is; anything else becomes a name-based
    /// UUID (v5), so the same foreign id always maps to the same `EventId`.
    #[must_use]
    pub fn from_foreign(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            Self(uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, raw.as_bytes()))
        })
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<uuid::Uuid> for EventId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}
