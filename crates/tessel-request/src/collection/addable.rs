//! Write-only-ish map for response headers.

use std::fmt;

use crate::attribute::HasAddableKeys;
use crate::error::RequestError;

/// Map over a store that accepts new values but never removes them.
///
/// Response headers behave this way: once set they can be replaced, not
/// unset. [`remove`](Self::remove) and [`clear`](Self::clear) always fail with
/// [`RequestError::NotAvailable`].
pub struct AddableParameterMap {
    extractor: Box<dyn HasAddableKeys<String>>,
}

impl AddableParameterMap {
    pub fn new<E>(extractor: E) -> Self
    where
        E: HasAddableKeys<String> + 'static,
    {
        Self::from_boxed(Box::new(extractor))
    }

    pub fn from_boxed(extractor: Box<dyn HasAddableKeys<String>>) -> Self {
        Self { extractor }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.extractor.value(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.extractor.keys()
    }

    pub fn len(&self) -> usize {
        self.extractor.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractor.keys().is_empty()
    }

    /// Sets `key`, returning the previous value.
    pub fn put(&self, key: &str, value: impl Into<String>) -> Option<String> {
        let previous = self.extractor.value(key);
        self.extractor.set_value(key, value.into());
        previous
    }

    pub fn put_all<I, K, S>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, S)>,
        K: AsRef<str>,
        S: Into<String>,
    {
        for (key, value) in entries {
            self.extractor.set_value(key.as_ref(), value.into());
        }
    }

    pub fn remove(&self, key: &str) -> Result<Option<String>, RequestError> {
        Err(RequestError::not_available(format!(
            "cannot remove '{}': entries can only be added",
            key
        )))
    }

    pub fn clear(&self) -> Result<(), RequestError> {
        Err(RequestError::not_available(
            "cannot clear: entries can only be added",
        ))
    }
}

impl fmt::Debug for AddableParameterMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddableParameterMap")
            .field("keys", &self.extractor.keys())
            .finish()
    }
}
