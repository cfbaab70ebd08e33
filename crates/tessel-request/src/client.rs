//! Request base over a host adapter.
//!
//! [`RequestHost`] is the narrow interface a hosting environment implements:
//! attribute stores per scope, a commit query, forward/include primitives and
//! the output stream. [`ClientRequest`] builds the full [`Request`] contract
//! on top of it: scope caching, the dispatch state machine, and writer
//! acquisition.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::rc::Rc;
use std::sync::Arc;

use log::debug;
use once_cell::unsync::OnceCell;

use crate::attribute::{AttributeExtractor, EnumeratedValuesExtractor, HasAddableKeys, HasKeys};
use crate::collection::{AddableParameterMap, HeaderValuesMap, ReadOnlyEnumerationMap, ScopeMap};
use crate::dispatch::{self, DispatchMode, DispatchRoute};
use crate::error::{HostError, RequestError};
use crate::request::{ApplicationContext, Request, APPLICATION_SCOPE, REQUEST_SCOPE, SESSION_SCOPE};
use crate::writer::{PrintWriter, SharedWriter};

/// What a hosting environment must provide.
///
/// Each adapter owns exactly one underlying host object (an HTTP request and
/// response pair, an in-memory fake, ...). The application scope is not
/// provided here: it comes from the shared
/// [`ApplicationContext`](crate::ApplicationContext).
pub trait RequestHost {
    /// Native scope names in precedence order. Must include
    /// [`REQUEST_SCOPE`], which holds the force-include flag.
    fn scopes(&self) -> Vec<String> {
        vec![REQUEST_SCOPE.to_string(), SESSION_SCOPE.to_string()]
    }

    /// The store backing `scope`, or `None` if the host cannot provide it.
    fn scope_store(&self, scope: &str) -> Option<Box<dyn AttributeExtractor>>;

    /// Returns true once the response has started emitting bytes.
    fn is_committed(&self) -> bool;

    /// Replaces the response body with the output of `path`.
    fn forward(&self, path: &str) -> Result<(), HostError>;

    /// Appends the output of `path` to the response body.
    fn include(&self, path: &str) -> Result<(), HostError>;

    /// The response output stream.
    fn writer(&self) -> Result<SharedWriter, HostError>;

    fn locale(&self) -> Option<String> {
        None
    }

    fn headers(&self) -> Option<Box<dyn EnumeratedValuesExtractor>> {
        None
    }

    fn response_headers(&self) -> Option<Box<dyn HasAddableKeys<String>>> {
        None
    }

    fn params(&self) -> Option<Box<dyn EnumeratedValuesExtractor>> {
        None
    }
}

/// [`Request`] implementation over a [`RequestHost`].
pub struct ClientRequest<H> {
    application: Arc<dyn ApplicationContext>,
    host: H,
    scopes: RefCell<HashMap<String, Rc<ScopeMap>>>,
    writer: OnceCell<SharedWriter>,
    print_writer: OnceCell<PrintWriter<SharedWriter>>,
}

impl<H: RequestHost> ClientRequest<H> {
    pub fn new(application: Arc<dyn ApplicationContext>, host: H) -> Self {
        Self {
            application,
            host,
            scopes: RefCell::new(HashMap::new()),
            writer: OnceCell::new(),
            print_writer: OnceCell::new(),
        }
    }

    /// The host adapter.
    pub fn host(&self) -> &H {
        &self.host
    }

    fn materialize(&self, scope: &str) -> Result<ScopeMap, RequestError> {
        if scope == APPLICATION_SCOPE {
            return Ok(self.application.application_scope());
        }
        self.host
            .scope_store(scope)
            .map(ScopeMap::from_boxed)
            .ok_or_else(|| RequestError::not_available(format!("scope '{}'", scope)))
    }

    fn host_include(&self, path: &str) -> Result<(), RequestError> {
        debug!("including '{}'", path);
        self.host
            .include(path)
            .map_err(|e| RequestError::from_host(path, e))
    }

    fn host_forward(&self, path: &str) -> Result<(), RequestError> {
        debug!("forwarding to '{}'", path);
        self.host
            .forward(path)
            .map_err(|e| RequestError::from_host(path, e))
    }
}

impl<H: RequestHost> Request for ClientRequest<H> {
    fn application_context(&self) -> Arc<dyn ApplicationContext> {
        Arc::clone(&self.application)
    }

    fn available_scopes(&self) -> Vec<String> {
        let mut scopes = self.host.scopes();
        if !scopes.iter().any(|s| s == APPLICATION_SCOPE) {
            scopes.push(APPLICATION_SCOPE.to_string());
        }
        scopes
    }

    fn context(&self, scope: &str) -> Result<Rc<ScopeMap>, RequestError> {
        if let Some(map) = self.scopes.borrow().get(scope) {
            return Ok(Rc::clone(map));
        }
        if !self.available_scopes().iter().any(|s| s == scope) {
            return Err(RequestError::NoSuchScope(scope.to_string()));
        }

        let map = Rc::new(self.materialize(scope)?);
        debug!("materialized scope '{}'", scope);
        self.scopes
            .borrow_mut()
            .insert(scope.to_string(), Rc::clone(&map));
        Ok(map)
    }

    fn dispatch(&self, path: &str) -> Result<(), RequestError> {
        dispatch::require_path(path)?;
        let mode = dispatch::dispatch_mode(self);
        let committed = self.host.is_committed();
        if mode == DispatchMode::Normal {
            dispatch::mark_force_include(self)?;
        }

        match dispatch::route(mode, committed) {
            DispatchRoute::Forward => self.host_forward(path),
            DispatchRoute::Include => {
                debug!(
                    "dispatch to '{}' degraded to include (mode: {:?}, committed: {})",
                    path, mode, committed
                );
                self.host_include(path)
            }
        }
    }

    fn include(&self, path: &str) -> Result<(), RequestError> {
        dispatch::require_path(path)?;
        dispatch::mark_force_include(self)?;
        self.host_include(path)
    }

    fn writer(&self) -> Result<SharedWriter, RequestError> {
        self.writer
            .get_or_try_init(|| self.host.writer().map_err(writer_error))
            .cloned()
    }

    fn print_writer(&self) -> Result<PrintWriter<SharedWriter>, RequestError> {
        self.print_writer
            .get_or_try_init(|| {
                if self.writer.get().is_some() {
                    debug!("print writer acquired after raw writer; both share one stream");
                }
                self.writer().map(PrintWriter::new)
            })
            .cloned()
    }

    fn is_response_committed(&self) -> bool {
        self.host.is_committed()
    }

    fn request_locale(&self) -> Option<String> {
        self.host.locale()
    }

    fn header(&self) -> Result<ReadOnlyEnumerationMap<String>, RequestError> {
        self.host
            .headers()
            .map(|headers| ReadOnlyEnumerationMap::new(FirstValue(headers)))
            .ok_or_else(|| RequestError::not_available("request headers"))
    }

    fn header_values(&self) -> Result<HeaderValuesMap, RequestError> {
        self.host
            .headers()
            .map(HeaderValuesMap::from_boxed)
            .ok_or_else(|| RequestError::not_available("request header values"))
    }

    fn response_headers(&self) -> Result<AddableParameterMap, RequestError> {
        self.host
            .response_headers()
            .map(AddableParameterMap::from_boxed)
            .ok_or_else(|| RequestError::not_available("response headers"))
    }

    fn param(&self) -> Result<ReadOnlyEnumerationMap<String>, RequestError> {
        self.host
            .params()
            .map(|params| ReadOnlyEnumerationMap::new(FirstValue(params)))
            .ok_or_else(|| RequestError::not_available("request parameters"))
    }

    fn param_values(&self) -> Result<HeaderValuesMap, RequestError> {
        self.host
            .params()
            .map(HeaderValuesMap::from_boxed)
            .ok_or_else(|| RequestError::not_available("request parameter values"))
    }
}

impl<H> fmt::Debug for ClientRequest<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRequest")
            .field("cached_scopes", &self.scopes.borrow().len())
            .field("writer_acquired", &self.writer.get().is_some())
            .finish_non_exhaustive()
    }
}

fn writer_error(err: HostError) -> RequestError {
    match err {
        HostError::NotFound => RequestError::not_available("response writer"),
        HostError::Failed(source) => RequestError::Io(io::Error::other(source)),
    }
}

/// Single-valued view over a multi-valued extractor.
struct FirstValue(Box<dyn EnumeratedValuesExtractor>);

impl HasKeys<String> for FirstValue {
    fn keys(&self) -> Vec<String> {
        self.0.keys()
    }

    fn value(&self, key: &str) -> Option<String> {
        self.0.value(key)
    }
}
