//! Uniform request access for view renderers.
//!
//! `tessel-request` lets rendering code address "the current request"
//! the same way regardless of the hosting environment that produced it.
//!
//! # Features
//!
//! - **Scopes**: named attribute bags (`request`, `session`, `application`,
//!   `page`) exposed through [`ScopeMap`] with ordinary map semantics
//! - **Dispatch**: a forward/include state machine that degrades to include
//!   once the response is committed or once anything was included
//! - **Writers**: a raw [`SharedWriter`] and a non-failing [`PrintWriter`]
//!   over the same output stream
//! - **Headers and parameters**: read-only, multi-valued and add-only maps
//!
//! # Hosting
//!
//! A hosting environment implements [`RequestHost`]; [`ClientRequest`] turns
//! it into a full [`Request`]:
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use tessel_request::mock::{MemoryApplicationContext, MockHost};
//! use tessel_request::{ClientRequest, Request};
//!
//! let app = Arc::new(MemoryApplicationContext::new());
//! let request = ClientRequest::new(app, MockHost::new());
//!
//! request.request_scope()?.put("user", json!("ada"));
//! request.dispatch("/layout.html")?;
//! assert_eq!(request.host().forwards(), vec!["/layout.html"]);
//! # Ok::<(), tessel_request::RequestError>(())
//! ```

// Core modules
mod attribute;
mod client;
mod collection;
pub mod dispatch;
mod error;
mod request;
mod writer;
mod wrapper;

pub mod mock;

pub use attribute::{
    AttributeExtractor, EnumeratedValuesExtractor, HasAddableKeys, HasKeys, HasRemovableKeys,
};

pub use client::{ClientRequest, RequestHost};

pub use collection::{
    AddableParameterMap, EntrySet, HeaderValuesMap, KeySet, ReadOnlyEnumerationMap, ScopeMap,
    Values, ValuesIter,
};

pub use dispatch::{DispatchMode, DispatchRoute, FORCE_INCLUDE_ATTRIBUTE};

pub use error::{BoxError, HostError, RequestError};

pub use request::{
    ApplicationContext, Request, APPLICATION_SCOPE, PAGE_SCOPE, REQUEST_SCOPE, SESSION_SCOPE,
};

pub use wrapper::PageRequest;

pub use writer::{PrintWriter, SharedWriter};
