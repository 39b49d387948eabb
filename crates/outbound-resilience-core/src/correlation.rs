//! Per-call correlation identifiers.

use std::fmt;
use uuid::Uuid;

/// Opaque identifier attached to every log record produced while serving one call.
///
/// It is read-only context; no proxy uses it for control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Creates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The all-zero identifier, for calls made outside any request context.
    pub const fn empty() -> Self {
        Self(Uuid::nil())
    }

    /// Returns true for the identifier produced by [`CorrelationId::empty`].
    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CorrelationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
