//! Multi-valued read-only map, such as request headers.

use std::fmt;

use crate::attribute::EnumeratedValuesExtractor;

/// Read-only map from a key to all of its values.
pub struct HeaderValuesMap {
    extractor: Box<dyn EnumeratedValuesExtractor>,
}

impl HeaderValuesMap {
    pub fn new<E>(extractor: E) -> Self
    where
        E: EnumeratedValuesExtractor + 'static,
    {
        Self::from_boxed(Box::new(extractor))
    }

    pub fn from_boxed(extractor: Box<dyn EnumeratedValuesExtractor>) -> Self {
        Self { extractor }
    }

    /// All values for `key`; `None` when the key has none.
    pub fn get(&self, key: &str) -> Option<Vec<String>> {
        let values = self.extractor.values(key);
        if values.is_empty() {
            None
        } else {
            Some(values)
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        !self.extractor.values(key).is_empty()
    }

    /// Returns true if some key has exactly these values, in this order.
    pub fn contains_value(&self, values: &[String]) -> bool {
        self.entries().any(|(_, v)| v == values)
    }

    pub fn keys(&self) -> Vec<String> {
        self.extractor.keys()
    }

    pub fn entries(&self) -> impl Iterator<Item = (String, Vec<String>)> + '_ {
        let extractor = self.extractor.as_ref();
        extractor.keys().into_iter().map(move |key| {
            let values = extractor.values(&key);
            (key, values)
        })
    }

    pub fn len(&self) -> usize {
        self.extractor.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractor.keys().is_empty()
    }
}

impl fmt::Debug for HeaderValuesMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderValuesMap")
            .field("keys", &self.extractor.keys())
            .finish()
    }
}
