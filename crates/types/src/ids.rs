//! Newtype wrapper for heading identifiers.
//!
//! Outline links point at headings through their `id` attribute. Keeping the
//! identifier in its own type stops it from being mixed up with display text
//! or CSS class names, which are also plain strings.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The identifier of a heading element, used as a link fragment target.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(transparent)]
pub struct AnchorId(Arc<str>);

impl AnchorId {
    /// Creates a new AnchorId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this anchor ID
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fragment link pointing at this anchor (`#id`).
    pub fn href(&self) -> String {
        format!("#{}", self.0)
    }
}

impl From<String> for AnchorId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for AnchorId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for AnchorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
