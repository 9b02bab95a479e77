//! Name-keyed registries of capabilities.
//!
//! Content decoders, tool handlers and security schemes are each stored in a
//! [`Registry`] keyed by the record's own name (see [`Registrable`]). Contexts
//! are composed by merging [`Registrations`] into an existing registry.

use indexmap::IndexMap;
use std::sync::Arc;

/// A capability record that knows the key it is registered under.
pub trait Registrable {
    /// The registry key: a decoder's content type, or a handler's or scheme's name.
    fn registry_key(&self) -> &str;
}

/// Registry of shared capability records, keyed by name.
pub struct Registry<T: ?Sized> {
    entries: IndexMap<String, Arc<T>>,
}

impl<T: ?Sized> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> core::fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl<T: ?Sized> Registry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Registers `entry` under `key`, replacing any entry with the same key.
    pub fn register(&mut self, key: impl Into<String>, entry: Arc<T>) {
        self.entries.insert(key.into(), entry);
    }

    /// Returns the entry registered under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<T>> {
        self.entries.get(key)
    }

    /// Returns whether an entry is registered under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the registered keys in registration order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Returns the number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a new registry with `registrations` merged over this one.
    ///
    /// Entries from `registrations` replace same-keyed existing entries; in a
    /// list, later records replace earlier ones.
    #[must_use]
    pub fn merged(&self, registrations: Registrations<T>) -> Self
    where
        T: Registrable,
    {
        let mut merged = self.clone();
        match registrations {
            Registrations::List(records) => {
                for record in records {
                    merged.insert(record);
                }
            }
            Registrations::Map(map) => merged.entries.extend(map),
        }
        merged
    }
}

impl<T: ?Sized + Registrable> Registry<T> {
    /// Registers `entry` under its own [`registry_key`](Registrable::registry_key).
    pub fn insert(&mut self, entry: Arc<T>) {
        let key = entry.registry_key().to_string();
        self.entries.insert(key, entry);
    }
}

/// Records to merge into a registry: a list keyed by each record's own
/// name, or an explicit keyed map.
pub enum Registrations<T: ?Sized> {
    /// Records keyed by [`Registrable::registry_key`].
    List(Vec<Arc<T>>),
    /// Records keyed explicitly.
    Map(IndexMap<String, Arc<T>>),
}

impl<T: ?Sized> From<Vec<Arc<T>>> for Registrations<T> {
    fn from(records: Vec<Arc<T>>) -> Self {
        Self::List(records)
    }
}

impl<T: ?Sized> From<IndexMap<String, Arc<T>>> for Registrations<T> {
    fn from(map: IndexMap<String, Arc<T>>) -> Self {
        Self::Map(map)
    }
}

impl<T: ?Sized> core::fmt::Debug for Registrations<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::List(records) => f.debug_tuple("List").field(&records.len()).finish(),
            Self::Map(map) => f.debug_tuple("Map").field(&map.keys()).finish(),
        }
    }
}
