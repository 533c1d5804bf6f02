//! Argument store holding caller-supplied `key=value` pairs

use crate::error::{ResolveError, Result};

/// Ordered mapping of argument keys to raw string values
///
/// Insertion order is preserved; setting an existing key replaces its value
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgStore {
    entries: Vec<(String, String)>,
}

impl ArgStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list of `key=value` strings
    ///
    /// The value may itself contain `=`; only the first one separates key
    /// and value. Keys are trimmed, values are kept as-is.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                ResolveError::validation(format!(
                    "argument '{}' is not of the form <key>=<value>",
                    arg
                ))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ResolveError::validation(format!(
                    "argument '{}' has an empty key",
                    arg
                )));
            }
            if store.contains(key) {
                return Err(ResolveError::validation(format!(
                    "argument '{}' provided more than once",
                    key
                )));
            }
            store.set(key, value);
        }
        Ok(store)
    }

    /// Set a value, replacing an existing one for the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Get the value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Snapshot of all keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Iterate over all key/value pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
