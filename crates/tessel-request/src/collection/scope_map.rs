//! Mutable map view over one scope.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::Values;
use crate::attribute::AttributeExtractor;

/// Map semantics over a scope's attributes.
///
/// A `ScopeMap` wraps exactly one [`AttributeExtractor`] and forwards every
/// operation to it. Values stored as [`Value::Null`] are not distinguished
/// from absent keys.
///
/// The key, value and entry views re-read the store each time they are used.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tessel_request::{mock::MemoryStore, ScopeMap};
///
/// let scope = ScopeMap::new(MemoryStore::new());
/// assert_eq!(scope.put("count", json!(1)), None);
/// assert_eq!(scope.put("count", json!(2)), Some(json!(1)));
/// assert_eq!(scope.get("count"), Some(json!(2)));
/// ```
pub struct ScopeMap {
    extractor: Box<dyn AttributeExtractor>,
}

impl ScopeMap {
    /// Wraps a store.
    pub fn new<E>(extractor: E) -> Self
    where
        E: AttributeExtractor + 'static,
    {
        Self::from_boxed(Box::new(extractor))
    }

    /// Wraps an already boxed store.
    pub fn from_boxed(extractor: Box<dyn AttributeExtractor>) -> Self {
        Self { extractor }
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.extractor.value(key)
    }

    /// Returns the value for `key` deserialized into `T`.
    ///
    /// `Ok(None)` when the key is absent.
    pub fn get_deserialized<T>(&self, key: &str) -> Result<Option<T>, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        self.get(key).map(serde_json::from_value).transpose()
    }

    /// Returns true if `key` currently has a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.extractor.value(key).is_some()
    }

    /// Returns true if any current value equals `value`.
    pub fn contains_value(&self, value: &Value) -> bool {
        self.values().contains(value)
    }

    /// Stores `value` under `key`, returning the value the store held before.
    pub fn put(&self, key: &str, value: Value) -> Option<Value> {
        let previous = self.extractor.value(key);
        self.extractor.set_value(key, value);
        previous
    }

    /// Serializes `value` and stores it under `key`.
    pub fn put_serialized<T>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<Option<Value>, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        Ok(self.put(key, value))
    }

    /// Applies [`put`](Self::put) for each entry, in iteration order.
    pub fn put_all<I, K>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        for (key, value) in entries {
            self.extractor.set_value(key.as_ref(), value);
        }
    }

    /// Removes `key`, returning its previous value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let previous = self.extractor.value(key);
        self.extractor.remove_value(key);
        previous
    }

    /// Removes every key enumerable at the time of the call.
    pub fn clear(&self) {
        for key in self.extractor.keys() {
            self.extractor.remove_value(&key);
        }
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.extractor.keys().len()
    }

    /// Returns true if the scope has no keys.
    pub fn is_empty(&self) -> bool {
        self.extractor.keys().is_empty()
    }

    /// Live view over the keys; removals propagate to the store.
    pub fn key_set(&self) -> KeySet<'_> {
        KeySet { map: self }
    }

    /// Read-only live view over the values.
    pub fn values(&self) -> Values<'_, Value, dyn AttributeExtractor> {
        Values::new(self.extractor.as_ref())
    }

    /// Live view over the entries; removals propagate to the store.
    pub fn entry_set(&self) -> EntrySet<'_> {
        EntrySet { map: self }
    }

    /// Copies the current contents into a `HashMap`.
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.entry_set().iter().collect()
    }
}

impl fmt::Debug for ScopeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeMap")
            .field("keys", &self.extractor.keys())
            .finish()
    }
}

/// Removal-aware view over a [`ScopeMap`]'s keys.
#[derive(Clone, Copy)]
pub struct KeySet<'a> {
    map: &'a ScopeMap,
}

impl KeySet<'_> {
    /// Iterates a fresh snapshot of the keys.
    pub fn iter(&self) -> std::vec::IntoIter<String> {
        self.map.extractor.keys().into_iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.extractor.keys().iter().any(|k| k == key)
    }

    /// Removes `key` from the backing store. Returns true if it was present.
    pub fn remove(&self, key: &str) -> bool {
        if !self.contains(key) {
            return false;
        }
        self.map.extractor.remove_value(key);
        true
    }

    /// Removes every key for which `keep` returns false.
    pub fn retain<F>(&self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        for key in self.iter() {
            if !keep(&key) {
                self.map.extractor.remove_value(&key);
            }
        }
    }

    /// Same as [`ScopeMap::clear`].
    pub fn clear(&self) {
        self.map.clear();
    }
}

impl IntoIterator for KeySet<'_> {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Removal-aware view over a [`ScopeMap`]'s entries.
#[derive(Clone, Copy)]
pub struct EntrySet<'a> {
    map: &'a ScopeMap,
}

impl<'a> EntrySet<'a> {
    /// Iterates the entries; values are looked up as the iterator advances.
    pub fn iter(&self) -> impl Iterator<Item = (String, Value)> + 'a {
        let extractor = self.map.extractor.as_ref();
        extractor
            .keys()
            .into_iter()
            .filter_map(move |key| extractor.value(&key).map(|value| (key, value)))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns true if `key` is present with exactly `value`.
    pub fn contains(&self, key: &str, value: &Value) -> bool {
        self.map.get(key).as_ref() == Some(value)
    }

    /// Removes `key` only if it currently maps to `value`.
    pub fn remove(&self, key: &str, value: &Value) -> bool {
        if !self.contains(key, value) {
            return false;
        }
        self.map.extractor.remove_value(key);
        true
    }

    /// Removes every entry for which `keep` returns false.
    pub fn retain<F>(&self, mut keep: F)
    where
        F: FnMut(&str, &Value) -> bool,
    {
        for (key, value) in self.iter() {
            if !keep(&key, &value) {
                self.map.extractor.remove_value(&key);
            }
        }
    }
}
