//! Error types for request access and dispatch.
//!
//! [`RequestError`] is what callers of a [`Request`](crate::Request) see.
//! [`HostError`] is the narrower error a host adapter returns from its
//! forward/include primitives; [`ClientRequest`](crate::ClientRequest) maps it
//! into the dispatch variants of `RequestError`, keeping the host's cause.

use std::error::Error as StdError;
use std::io;

/// Boxed host-level cause carried by dispatch failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that can occur while accessing or dispatching a request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// A required argument was missing or illegal (e.g. an empty path).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The scope name is not among the request's available scopes.
    #[error("no such scope: '{0}'")]
    NoSuchScope(String),

    /// The host does not provide the requested feature.
    #[error("feature not available: {0}")]
    NotAvailable(String),

    /// The host has no dispatcher registered for the path.
    #[error("no dispatcher available for path '{path}'")]
    NoDispatcher { path: String },

    /// The host's forward/include primitive failed.
    #[error("dispatch to '{path}' failed: {source}")]
    Dispatch {
        path: String,
        #[source]
        source: BoxError,
    },

    /// I/O failure while acquiring or using the output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RequestError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a not-available error.
    pub fn not_available(msg: impl Into<String>) -> Self {
        Self::NotAvailable(msg.into())
    }

    /// Returns true for the I/O-category dispatch failures: a missing
    /// dispatcher or a failed host primitive.
    pub fn is_dispatch_failure(&self) -> bool {
        matches!(
            self,
            RequestError::NoDispatcher { .. } | RequestError::Dispatch { .. }
        )
    }

    /// Wraps a host failure for `path`.
    pub(crate) fn from_host(path: &str, err: HostError) -> Self {
        match err {
            HostError::NotFound => RequestError::NoDispatcher {
                path: path.to_string(),
            },
            HostError::Failed(source) => RequestError::Dispatch {
                path: path.to_string(),
                source,
            },
        }
    }
}

/// Failure reported by a host adapter's dispatch primitives.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// No dispatcher exists for the requested path.
    #[error("no dispatcher for path")]
    NotFound,

    /// The host primitive itself failed.
    #[error("host failure: {0}")]
    Failed(#[source] BoxError),
}

impl HostError {
    /// Wraps any error as a host failure.
    pub fn failed<E>(source: E) -> Self
    where
        E: Into<BoxError>,
    {
        HostError::Failed(source.into())
    }
}

impl From<io::Error> for HostError {
    fn from(err: io::Error) -> Self {
        HostError::Failed(Box::new(err))
    }
}
