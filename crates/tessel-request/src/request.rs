//! The uniform request contract.
//!
//! Every hosting environment is reached through [`Request`]. A concrete
//! request is either a [`ClientRequest`](crate::ClientRequest) over a host
//! adapter, or a wrapper such as [`PageRequest`](crate::PageRequest) that adds
//! scopes on top of another request.
//!
//! # Scopes
//!
//! A scope is a named attribute bag tied to a lifecycle boundary. Scopes are
//! listed by [`Request::available_scopes`] in precedence order; wrappers list
//! the wrapped request's scopes first and then their own.
//!
//! ```text
//! ClientRequest:  request, session, application
//! PageRequest:    request, session, application, page
//! ```

use std::rc::Rc;
use std::sync::Arc;

use crate::collection::{AddableParameterMap, HeaderValuesMap, ReadOnlyEnumerationMap, ScopeMap};
use crate::error::RequestError;
use crate::writer::{PrintWriter, SharedWriter};

/// Attributes that live for a single request.
pub const REQUEST_SCOPE: &str = "request";

/// Attributes that live for a user session.
pub const SESSION_SCOPE: &str = "session";

/// Attributes shared by every request of the application.
pub const APPLICATION_SCOPE: &str = "application";

/// Attributes local to one template evaluation.
pub const PAGE_SCOPE: &str = "page";

/// Application-level state shared by every request.
///
/// One context is created per hosting process and shared through an `Arc`;
/// requests reference it, they never own it. The store behind
/// [`application_scope`](Self::application_scope) must tolerate concurrent
/// access from several request threads.
pub trait ApplicationContext: Send + Sync {
    /// The application scope.
    fn application_scope(&self) -> ScopeMap;

    /// Initialization parameters of the application.
    fn init_params(&self) -> ReadOnlyEnumerationMap<String>;
}

/// A request addressed uniformly across hosting environments.
pub trait Request {
    /// The shared application context.
    fn application_context(&self) -> Arc<dyn ApplicationContext>;

    /// Scope names available on this request, in precedence order.
    ///
    /// Every call returns a fresh, finite list.
    fn available_scopes(&self) -> Vec<String>;

    /// The map for `scope`, created on first access and cached afterwards.
    ///
    /// Fails with [`RequestError::NoSuchScope`] if `scope` is not among
    /// [`available_scopes`](Self::available_scopes).
    fn context(&self, scope: &str) -> Result<Rc<ScopeMap>, RequestError>;

    /// Delegates output to `path`, forwarding when possible and including
    /// otherwise. Switches the request scope to forced-include mode, so later
    /// dispatches include. See [`crate::dispatch`] for the routing rule.
    fn dispatch(&self, path: &str) -> Result<(), RequestError>;

    /// Includes `path` into the current output and switches this request's
    /// scope chain to forced-include mode.
    fn include(&self, path: &str) -> Result<(), RequestError>;

    /// The raw output writer.
    fn writer(&self) -> Result<SharedWriter, RequestError>;

    /// The print writer over the same output; see [`PrintWriter`].
    fn print_writer(&self) -> Result<PrintWriter<SharedWriter>, RequestError>;

    /// Returns true once the response has started emitting bytes.
    fn is_response_committed(&self) -> bool;

    /// The locale of the request as a language tag (e.g. `"it-IT"`).
    fn request_locale(&self) -> Option<String>;

    /// Request headers, first value per name.
    fn header(&self) -> Result<ReadOnlyEnumerationMap<String>, RequestError> {
        Err(RequestError::not_available("request headers"))
    }

    /// Request headers, all values per name.
    fn header_values(&self) -> Result<HeaderValuesMap, RequestError> {
        Err(RequestError::not_available("request header values"))
    }

    /// Response headers.
    fn response_headers(&self) -> Result<AddableParameterMap, RequestError> {
        Err(RequestError::not_available("response headers"))
    }

    /// Request parameters, first value per name.
    fn param(&self) -> Result<ReadOnlyEnumerationMap<String>, RequestError> {
        Err(RequestError::not_available("request parameters"))
    }

    /// Request parameters, all values per name.
    fn param_values(&self) -> Result<HeaderValuesMap, RequestError> {
        Err(RequestError::not_available("request parameter values"))
    }

    fn request_scope(&self) -> Result<Rc<ScopeMap>, RequestError> {
        self.context(REQUEST_SCOPE)
    }

    fn session_scope(&self) -> Result<Rc<ScopeMap>, RequestError> {
        self.context(SESSION_SCOPE)
    }

    fn application_scope(&self) -> Result<Rc<ScopeMap>, RequestError> {
        self.context(APPLICATION_SCOPE)
    }
}
