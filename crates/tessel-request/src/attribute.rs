//! Keyed attribute stores exposed by a host.
//!
//! A host environment exposes each of its named attribute sets (one scope,
//! the request headers, the init parameters, ...) through one of these
//! traits. The collection types in [`crate::collection`] turn them into map
//! views.
//!
//! # Enumeration
//!
//! [`HasKeys::keys`] must return a fresh snapshot on every call. Hosts whose
//! native enumeration is single-pass collect it here, so the views never
//! assume an enumeration can be replayed without asking again.
//!
//! All mutators take `&self`: a store is a handle onto host state, and several
//! requests in one wrapping chain may hold handles onto the same state.

use serde_json::Value;

/// Read access to a keyed set of values.
pub trait HasKeys<V> {
    /// Returns the keys currently present, in no guaranteed order.
    fn keys(&self) -> Vec<String>;

    /// Returns the value stored under `key`, if any.
    fn value(&self, key: &str) -> Option<V>;
}

/// A keyed set whose entries can be removed.
pub trait HasRemovableKeys<V>: HasKeys<V> {
    /// Removes `key`. Removing an absent key is a no-op.
    fn remove_value(&self, key: &str);
}

/// A keyed set whose entries can be written.
pub trait HasAddableKeys<V>: HasKeys<V> {
    /// Stores `value` under `key`, replacing any previous value.
    fn set_value(&self, key: &str, value: V);
}

/// Full read/write/remove access over a scope's attributes.
///
/// This is the backing store of every [`ScopeMap`](crate::ScopeMap).
pub trait AttributeExtractor: HasRemovableKeys<Value> + HasAddableKeys<Value> {}

impl<T> AttributeExtractor for T where T: HasRemovableKeys<Value> + HasAddableKeys<Value> {}

/// A keyed set where each key maps to several string values, such as HTTP
/// headers or request parameters.
///
/// [`HasKeys::value`] returns the first value.
pub trait EnumeratedValuesExtractor: HasKeys<String> {
    /// Returns every value for `key`, empty if the key is absent.
    fn values(&self, key: &str) -> Vec<String>;
}
