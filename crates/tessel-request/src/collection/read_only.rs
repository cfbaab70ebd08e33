//! Read-only map view over an enumerable store.

use std::collections::HashMap;
use std::fmt;

use super::Values;
use crate::attribute::HasKeys;

/// Read-only map over a [`HasKeys`] store.
///
/// Used for host data that callers may inspect but never change: init
/// parameters, single-valued request headers, request parameters.
pub struct ReadOnlyEnumerationMap<V> {
    extractor: Box<dyn HasKeys<V>>,
}

impl<V: 'static> ReadOnlyEnumerationMap<V> {
    pub fn new<E>(extractor: E) -> Self
    where
        E: HasKeys<V> + 'static,
    {
        Self::from_boxed(Box::new(extractor))
    }

    pub fn from_boxed(extractor: Box<dyn HasKeys<V>>) -> Self {
        Self { extractor }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.extractor.value(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.extractor.value(key).is_some()
    }

    /// Fresh snapshot of the keys.
    pub fn keys(&self) -> Vec<String> {
        self.extractor.keys()
    }

    pub fn values(&self) -> Values<'_, V, dyn HasKeys<V>> {
        Values::new(self.extractor.as_ref())
    }

    /// Iterates the entries, looking values up lazily.
    pub fn entries(&self) -> impl Iterator<Item = (String, V)> + '_ {
        let extractor = self.extractor.as_ref();
        extractor
            .keys()
            .into_iter()
            .filter_map(move |key| extractor.value(&key).map(|value| (key, value)))
    }

    pub fn len(&self) -> usize {
        self.extractor.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractor.keys().is_empty()
    }

    /// Copies the current contents into a `HashMap`.
    pub fn snapshot(&self) -> HashMap<String, V> {
        self.entries().collect()
    }
}

impl<V: PartialEq + 'static> ReadOnlyEnumerationMap<V> {
    pub fn contains_value(&self, value: &V) -> bool {
        self.values().contains(value)
    }
}

impl<V> fmt::Debug for ReadOnlyEnumerationMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnlyEnumerationMap")
            .field("keys", &self.extractor.keys())
            .finish()
    }
}
