//! IdRegistry trait for abstracting the document-wide identifier namespace.
//!
//! Generated heading identifiers must not collide with any identifier already
//! present in the document. Rather than reaching for a global document, the
//! outline builder asks an `IdRegistry`, so uniqueness can be checked against
//! a real page or a plain in-memory set.

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::RwLock;

/// A trait for querying which element identifiers are already in use.
///
/// # Implementations
///
/// - Every [`Dom`](crate::Dom) is a registry over its own document.
/// - `InMemoryIdRegistry`: a standalone set, useful without any document.
///
/// # Example
///
/// ```ignore
/// let registry = InMemoryIdRegistry::new();
/// registry.reserve("intro");
/// assert!(registry.is_taken("intro"));
/// ```
pub trait IdRegistry {
    /// Returns `true` if some element in the namespace already carries `id`.
    fn is_taken(&self, id: &str) -> bool;
}

impl<R: IdRegistry + ?Sized> IdRegistry for &R {
    fn is_taken(&self, id: &str) -> bool {
        (**self).is_taken(id)
    }
}

/// An in-memory identifier registry.
#[derive(Debug, Default)]
pub struct InMemoryIdRegistry {
    ids: RwLock<HashSet<String>>,
}

impl InMemoryIdRegistry {
    pub fn new() -> Self {
        Self {
            ids: RwLock::new(HashSet::new()),
        }
    }

    /// Marks `id` as taken.
    ///
    /// Returns `false` if it was already taken or the internal lock is poisoned.
    pub fn reserve(&self, id: impl Into<String>) -> bool {
        self.ids
            .write()
            .map(|mut ids| ids.insert(id.into()))
            .unwrap_or(false)
    }

    /// Frees `id` again. Returns `false` if it was not taken.
    pub fn release(&self, id: &str) -> bool {
        self.ids
            .write()
            .map(|mut ids| ids.remove(id))
            .unwrap_or(false)
    }

    /// Clear all identifiers.
    ///
    /// Does nothing if the lock is poisoned.
    pub fn clear(&self) {
        if let Ok(mut ids) = self.ids.write() {
            ids.clear();
        }
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.ids.read().map(|ids| ids.len()).unwrap_or(0)
    }

    /// Returns `true` if the lock is poisoned (safe default).
    pub fn is_empty(&self) -> bool {
        self.ids.read().map(|ids| ids.is_empty()).unwrap_or(true)
    }
}

impl IdRegistry for InMemoryIdRegistry {
    fn is_taken(&self, id: &str) -> bool {
        self.ids
            .read()
            .map(|ids| ids.contains(id))
            .unwrap_or(false)
    }
}
