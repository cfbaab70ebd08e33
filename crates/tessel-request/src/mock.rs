//! In-memory implementations for tests and embedding.
//!
//! These stand in for a real hosting environment: attribute stores backed by
//! a concurrent map, a shared application context, and a [`MockHost`] that
//! records every forward/include it is asked to perform.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use crate::attribute::{
    AttributeExtractor, EnumeratedValuesExtractor, HasAddableKeys, HasKeys, HasRemovableKeys,
};
use crate::client::RequestHost;
use crate::collection::{ReadOnlyEnumerationMap, ScopeMap};
use crate::error::HostError;
use crate::request::{ApplicationContext, REQUEST_SCOPE, SESSION_SCOPE};
use crate::writer::SharedWriter;

// === Attribute stores ===

/// Attribute store backed by a concurrent map.
///
/// Clones share the same entries. Storing [`Value::Null`] removes the key.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: impl Into<String>, value: Value) -> Self {
        self.set_value(&key.into(), value);
        self
    }
}

impl HasKeys<Value> for MemoryStore {
    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    fn value(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|v| v.value().clone())
    }
}

impl HasRemovableKeys<Value> for MemoryStore {
    fn remove_value(&self, key: &str) {
        self.entries.remove(key);
    }
}

impl HasAddableKeys<Value> for MemoryStore {
    fn set_value(&self, key: &str, value: Value) {
        if value.is_null() {
            self.entries.remove(key);
        } else {
            self.entries.insert(key.to_string(), value);
        }
    }
}

/// Multi-valued string store, for headers and parameters.
///
/// [`with`](Self::with) appends; [`HasAddableKeys::set_value`] replaces.
#[derive(Debug, Clone, Default)]
pub struct MemoryParams {
    entries: Arc<DashMap<String, Vec<String>>>,
}

impl MemoryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values of `key`.
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    pub fn append(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    pub fn values_of(&self, key: &str) -> Vec<String> {
        self.entries
            .get(key)
            .map(|v| v.value().clone())
            .unwrap_or_default()
    }
}

impl HasKeys<String> for MemoryParams {
    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    fn value(&self, key: &str) -> Option<String> {
        self.entries.get(key).and_then(|v| v.value().first().cloned())
    }
}

impl EnumeratedValuesExtractor for MemoryParams {
    fn values(&self, key: &str) -> Vec<String> {
        self.values_of(key)
    }
}

impl HasAddableKeys<String> for MemoryParams {
    fn set_value(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), vec![value]);
    }
}

// === Application context ===

/// Application context over in-memory stores.
#[derive(Debug, Clone, Default)]
pub struct MemoryApplicationContext {
    scope: MemoryStore,
    init_params: MemoryParams,
}

impl MemoryApplicationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_init_param(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.init_params.append(name, value);
        self
    }

    /// The store behind the application scope.
    pub fn store(&self) -> &MemoryStore {
        &self.scope
    }
}

impl ApplicationContext for MemoryApplicationContext {
    fn application_scope(&self) -> ScopeMap {
        ScopeMap::new(self.scope.clone())
    }

    fn init_params(&self) -> ReadOnlyEnumerationMap<String> {
        ReadOnlyEnumerationMap::new(self.init_params.clone())
    }
}

// === Host ===

/// A forward or include performed by a [`MockHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Forward(String),
    Include(String),
}

/// Host adapter that records dispatches instead of performing them.
///
/// Paths registered with [`without_dispatcher`](Self::without_dispatcher)
/// fail with [`HostError::NotFound`]; paths registered with
/// [`failing`](Self::failing) fail with [`HostError::Failed`]. Either way the
/// attempt is recorded.
#[derive(Debug)]
pub struct MockHost {
    request: MemoryStore,
    session: Option<MemoryStore>,
    headers: MemoryParams,
    params: MemoryParams,
    response_headers: MemoryParams,
    committed: Cell<bool>,
    commit_on_dispatch: bool,
    missing: HashSet<String>,
    failing: HashSet<String>,
    calls: RefCell<Vec<HostCall>>,
    output: Option<(Buffer, SharedWriter)>,
    locale: Option<String>,
}

impl Default for MockHost {
    fn default() -> Self {
        let buffer = Buffer::new();
        let writer = SharedWriter::new(buffer.clone());
        Self {
            request: MemoryStore::new(),
            session: Some(MemoryStore::new()),
            headers: MemoryParams::new(),
            params: MemoryParams::new(),
            response_headers: MemoryParams::new(),
            committed: Cell::new(false),
            commit_on_dispatch: false,
            missing: HashSet::new(),
            failing: HashSet::new(),
            calls: RefCell::new(Vec::new()),
            output: Some((buffer, writer)),
            locale: None,
        }
    }
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn committed(self, committed: bool) -> Self {
        self.committed.set(committed);
        self
    }

    /// Successful dispatches write a `[forward:path]` or `[include:path]`
    /// marker to the output and commit the response.
    pub fn commit_on_dispatch(mut self) -> Self {
        self.commit_on_dispatch = true;
        self
    }

    pub fn without_dispatcher(mut self, path: impl Into<String>) -> Self {
        self.missing.insert(path.into());
        self
    }

    pub fn failing(mut self, path: impl Into<String>) -> Self {
        self.failing.insert(path.into());
        self
    }

    pub fn without_session(mut self) -> Self {
        self.session = None;
        self
    }

    pub fn without_output(mut self) -> Self {
        self.output = None;
        self
    }

    /// Uses `request` as the request scope store.
    pub fn with_request_store(mut self, request: MemoryStore) -> Self {
        self.request = request;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_param(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.append(name, value);
        self
    }

    pub fn set_committed(&self, committed: bool) {
        self.committed.set(committed);
    }

    pub fn request_store(&self) -> &MemoryStore {
        &self.request
    }

    pub fn response_header_store(&self) -> &MemoryParams {
        &self.response_headers
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn forwards(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                HostCall::Forward(p) => Some(p.clone()),
                HostCall::Include(_) => None,
            })
            .collect()
    }

    pub fn includes(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                HostCall::Include(p) => Some(p.clone()),
                HostCall::Forward(_) => None,
            })
            .collect()
    }

    /// Everything written to the response so far.
    pub fn output(&self) -> String {
        self.output
            .as_ref()
            .map(|(buffer, _)| buffer.contents())
            .unwrap_or_default()
    }

    fn perform(&self, call: HostCall) -> Result<(), HostError> {
        let (path, marker) = match &call {
            HostCall::Forward(p) => (p.clone(), format!("[forward:{}]", p)),
            HostCall::Include(p) => (p.clone(), format!("[include:{}]", p)),
        };
        self.calls.borrow_mut().push(call);

        if self.missing.contains(&path) {
            return Err(HostError::NotFound);
        }
        if self.failing.contains(&path) {
            return Err(HostError::failed(format!("host error in {}", path)));
        }
        if self.commit_on_dispatch {
            if let Some((_, writer)) = &self.output {
                writer.clone().write_all(marker.as_bytes())?;
            }
            self.committed.set(true);
        }
        Ok(())
    }
}

impl RequestHost for MockHost {
    fn scopes(&self) -> Vec<String> {
        let mut scopes = vec![REQUEST_SCOPE.to_string()];
        if self.session.is_some() {
            scopes.push(SESSION_SCOPE.to_string());
        }
        scopes
    }

    fn scope_store(&self, scope: &str) -> Option<Box<dyn AttributeExtractor>> {
        match scope {
            REQUEST_SCOPE => Some(Box::new(self.request.clone())),
            SESSION_SCOPE => self
                .session
                .clone()
                .map(|s| Box::new(s) as Box<dyn AttributeExtractor>),
            _ => None,
        }
    }

    fn is_committed(&self) -> bool {
        self.committed.get()
    }

    fn forward(&self, path: &str) -> Result<(), HostError> {
        self.perform(HostCall::Forward(path.to_string()))
    }

    fn include(&self, path: &str) -> Result<(), HostError> {
        self.perform(HostCall::Include(path.to_string()))
    }

    fn writer(&self) -> Result<SharedWriter, HostError> {
        self.output
            .as_ref()
            .map(|(_, writer)| writer.clone())
            .ok_or(HostError::NotFound)
    }

    fn locale(&self) -> Option<String> {
        self.locale.clone()
    }

    fn headers(&self) -> Option<Box<dyn EnumeratedValuesExtractor>> {
        Some(Box::new(self.headers.clone()))
    }

    fn response_headers(&self) -> Option<Box<dyn HasAddableKeys<String>>> {
        Some(Box::new(self.response_headers.clone()))
    }

    fn params(&self) -> Option<Box<dyn EnumeratedValuesExtractor>> {
        Some(Box::new(self.params.clone()))
    }
}

// === Writers ===

/// Growable in-memory output; clones share the same bytes.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer whose writes always fail.
///
/// Counts flush attempts; flushing can be made to fail too.
#[derive(Debug, Clone, Default)]
pub struct FailingWriter {
    flushes: Rc<Cell<usize>>,
    fail_flush: bool,
}

impl FailingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_flush(mut self) -> Self {
        self.fail_flush = true;
        self
    }

    pub fn flush_attempts(&self) -> usize {
        self.flushes.get()
    }
}

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes.set(self.flushes.get() + 1);
        if self.fail_flush {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store_null_removes() {
        let store = MemoryStore::new().with("a", json!(1));
        store.set_value("a", Value::Null);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        store.clone().set_value("a", json!("x"));
        assert_eq!(store.value("a"), Some(json!("x")));
    }

    #[test]
    fn test_memory_params_first_and_all() {
        let params = MemoryParams::new().with("a", "1").with("a", "2");
        assert_eq!(params.value("a").as_deref(), Some("1"));
        assert_eq!(params.values("a"), vec!["1", "2"]);
        params.set_value("a", "3".to_string());
        assert_eq!(params.values_of("a"), vec!["3"]);
    }

    #[test]
    fn test_init_params() {
        let app = MemoryApplicationContext::new().with_init_param("mode", "dev");
        assert_eq!(app.init_params().get("mode").as_deref(), Some("dev"));
    }

    #[test]
    fn test_mock_host_records_calls() {
        let host = MockHost::new().without_dispatcher("/missing");
        host.forward("/a").unwrap();
        assert!(matches!(host.include("/missing"), Err(HostError::NotFound)));

        assert_eq!(host.forwards(), vec!["/a"]);
        assert_eq!(host.includes(), vec!["/missing"]);
        assert_eq!(host.output(), "");
    }

    #[test]
    fn test_mock_host_commit_on_dispatch() {
        let host = MockHost::new().commit_on_dispatch();
        assert!(!host.is_committed());
        host.include("/a").unwrap();
        assert!(host.is_committed());
        assert_eq!(host.output(), "[include:/a]");
    }
}
