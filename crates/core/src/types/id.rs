//! Menu item identifier.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a menu item.
///
/// Identifiers are opaque strings: the local store issues timestamp-derived
/// values, the remote table service issues its own row ids. Uniqueness within
/// one catalog is an invariant enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(String);

impl MenuItemId {
    /// Create an id from an already-issued value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MenuItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MenuItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}
