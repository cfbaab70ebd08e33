//! Map views over host attribute stores.
//!
//! Each view wraps exactly one store from [`crate::attribute`] and derives
//! everything from it on demand: nothing is cached, and every `len`, `iter`
//! or containment check drains the store's key enumeration once.
//!
//! | View | Store | Mutation |
//! |------|-------|----------|
//! | [`ScopeMap`] | [`AttributeExtractor`](crate::AttributeExtractor) | get/put/remove/clear, removal-aware key and entry views |
//! | [`ReadOnlyEnumerationMap`] | [`HasKeys`](crate::HasKeys) | none |
//! | [`HeaderValuesMap`] | [`EnumeratedValuesExtractor`](crate::EnumeratedValuesExtractor) | none |
//! | [`AddableParameterMap`] | [`HasAddableKeys`](crate::HasAddableKeys) | put only |

mod addable;
mod header_values;
mod read_only;
mod scope_map;

pub use addable::AddableParameterMap;
pub use header_values::HeaderValuesMap;
pub use read_only::ReadOnlyEnumerationMap;
pub use scope_map::{EntrySet, KeySet, ScopeMap};

use std::marker::PhantomData;

use crate::attribute::HasKeys;

/// Read-only view over the values of a keyed store.
///
/// There are no mutators: values cannot be added or removed through this
/// view. Containment checks realize the whole current value set.
pub struct Values<'a, V, S: ?Sized> {
    store: &'a S,
    _value: PhantomData<fn() -> V>,
}

impl<'a, V, S> Values<'a, V, S>
where
    S: HasKeys<V> + ?Sized,
{
    pub(crate) fn new(store: &'a S) -> Self {
        Self {
            store,
            _value: PhantomData,
        }
    }

    /// Iterates the values, looking each one up lazily.
    ///
    /// Keys that disappear between enumeration and lookup are skipped.
    pub fn iter(&self) -> ValuesIter<'a, V, S> {
        ValuesIter {
            store: self.store,
            keys: self.store.keys().into_iter(),
            _value: PhantomData,
        }
    }

    /// Number of values (one per key).
    pub fn len(&self) -> usize {
        self.store.keys().len()
    }

    /// Returns true if the store has no keys.
    pub fn is_empty(&self) -> bool {
        self.store.keys().is_empty()
    }

    /// Collects the current values.
    pub fn to_vec(&self) -> Vec<V> {
        self.iter().collect()
    }
}

/// Iterator returned by [`Values::iter`].
pub struct ValuesIter<'a, V, S: ?Sized> {
    store: &'a S,
    keys: std::vec::IntoIter<String>,
    _value: PhantomData<fn() -> V>,
}

impl<V, S> Iterator for ValuesIter<'_, V, S>
where
    S: HasKeys<V> + ?Sized,
{
    type Item = V;

    fn next(&mut self) -> Option<V> {
        for key in self.keys.by_ref() {
            if let Some(value) = self.store.value(&key) {
                return Some(value);
            }
        }
        None
    }
}

impl<V, S> Values<'_, V, S>
where
    V: PartialEq,
    S: HasKeys<V> + ?Sized,
{
    /// Returns true if any current value equals `value`.
    pub fn contains(&self, value: &V) -> bool {
        self.iter().any(|v| v == *value)
    }

    /// Returns true if every item of `values` is currently present.
    pub fn contains_all<'v, I>(&self, values: I) -> bool
    where
        V: 'v,
        I: IntoIterator<Item = &'v V>,
    {
        let current = self.to_vec();
        values.into_iter().all(|v| current.contains(v))
    }
}
