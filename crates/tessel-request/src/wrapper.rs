//! Request wrapper adding a page scope.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use once_cell::unsync::OnceCell;

use crate::attribute::AttributeExtractor;
use crate::collection::{AddableParameterMap, HeaderValuesMap, ReadOnlyEnumerationMap, ScopeMap};
use crate::dispatch;
use crate::error::RequestError;
use crate::request::{ApplicationContext, Request, PAGE_SCOPE};
use crate::writer::{PrintWriter, SharedWriter};

/// A request seen from inside one template evaluation.
///
/// Adds the `page` scope after the wrapped request's scopes and may redirect
/// output to its own writer. Every dispatch through a page request is an
/// include: a page is already rendering into a response, so it can never
/// replace that response.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tessel_request::mock::{MemoryApplicationContext, MemoryStore, MockHost};
/// use tessel_request::{ClientRequest, PageRequest, Request};
///
/// let outer = ClientRequest::new(Arc::new(MemoryApplicationContext::new()), MockHost::new());
/// let page = PageRequest::new(outer, MemoryStore::new());
/// assert_eq!(page.available_scopes().last().map(String::as_str), Some("page"));
/// ```
pub struct PageRequest<R> {
    wrapped: R,
    page: Rc<ScopeMap>,
    writer: Option<SharedWriter>,
    print_writer: OnceCell<PrintWriter<SharedWriter>>,
    locale: Option<String>,
}

impl<R: Request> PageRequest<R> {
    pub fn new<E>(wrapped: R, page_store: E) -> Self
    where
        E: AttributeExtractor + 'static,
    {
        Self {
            wrapped,
            page: Rc::new(ScopeMap::new(page_store)),
            writer: None,
            print_writer: OnceCell::new(),
            locale: None,
        }
    }

    /// Sends this page's output to `writer`.
    pub fn with_writer(mut self, writer: SharedWriter) -> Self {
        self.writer = Some(writer);
        self.print_writer = OnceCell::new();
        self
    }

    /// Overrides the wrapped request's locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn wrapped(&self) -> &R {
        &self.wrapped
    }

    pub fn into_wrapped(self) -> R {
        self.wrapped
    }
}

impl<R: Request> Request for PageRequest<R> {
    fn application_context(&self) -> Arc<dyn ApplicationContext> {
        self.wrapped.application_context()
    }

    fn available_scopes(&self) -> Vec<String> {
        let mut scopes = self.wrapped.available_scopes();
        scopes.push(PAGE_SCOPE.to_string());
        scopes
    }

    fn context(&self, scope: &str) -> Result<Rc<ScopeMap>, RequestError> {
        if scope == PAGE_SCOPE {
            return Ok(Rc::clone(&self.page));
        }
        self.wrapped.context(scope)
    }

    fn dispatch(&self, path: &str) -> Result<(), RequestError> {
        self.include(path)
    }

    fn include(&self, path: &str) -> Result<(), RequestError> {
        dispatch::require_path(path)?;
        dispatch::mark_force_include(self)?;
        self.wrapped.include(path)
    }

    fn writer(&self) -> Result<SharedWriter, RequestError> {
        self.writer
            .clone()
            .ok_or_else(|| RequestError::not_available("page writer"))
    }

    fn print_writer(&self) -> Result<PrintWriter<SharedWriter>, RequestError> {
        self.print_writer
            .get_or_try_init(|| self.writer().map(PrintWriter::new))
            .cloned()
    }

    fn is_response_committed(&self) -> bool {
        self.wrapped.is_response_committed()
    }

    fn request_locale(&self) -> Option<String> {
        self.locale
            .clone()
            .or_else(|| self.wrapped.request_locale())
    }

    fn header(&self) -> Result<ReadOnlyEnumerationMap<String>, RequestError> {
        self.wrapped.header()
    }

    fn header_values(&self) -> Result<HeaderValuesMap, RequestError> {
        self.wrapped.header_values()
    }

    fn response_headers(&self) -> Result<AddableParameterMap, RequestError> {
        self.wrapped.response_headers()
    }

    fn param(&self) -> Result<ReadOnlyEnumerationMap<String>, RequestError> {
        self.wrapped.param()
    }

    fn param_values(&self) -> Result<HeaderValuesMap, RequestError> {
        self.wrapped.param_values()
    }
}

impl<R: fmt::Debug> fmt::Debug for PageRequest<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRequest")
            .field("wrapped", &self.wrapped)
            .field("page", &self.page)
            .field("has_writer", &self.writer.is_some())
            .finish()
    }
}
