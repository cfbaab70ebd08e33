//! Error types for renderer resolution and rendering.

use std::fmt;
use std::io;

use tessel_request::{BoxError, RequestError};
use thiserror::Error;

/// Errors that can occur while resolving or running a renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No renderer is registered under the name; `None` means no default
    /// renderer was set.
    #[error("no such renderer: {}", .0.as_deref().unwrap_or("<default>"))]
    NoSuchRenderer(Option<String>),

    /// The renderer's precondition does not hold for the value.
    #[error("cannot render: {0}")]
    CannotRender(String),

    /// The request refused an operation the renderer needed.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A render listener failed.
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

impl RenderError {
    pub fn cannot_render(msg: impl Into<String>) -> Self {
        Self::CannotRender(msg.into())
    }
}

/// The point at which a listener failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerPhase {
    Start,
    End,
}

impl fmt::Display for ListenerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerPhase::Start => write!(f, "start"),
            ListenerPhase::End => write!(f, "end"),
        }
    }
}

/// Error returned by a [`RendererListener`](crate::RendererListener).
#[derive(Debug, Error)]
#[error("listener error ({phase}): {message}")]
pub struct ListenerError {
    /// Human-readable error message
    pub message: String,
    /// The notification that failed
    pub phase: ListenerPhase,
    /// The underlying error source, if any
    #[source]
    pub source: Option<BoxError>,
}

impl ListenerError {
    /// Creates an error for a failed start notification.
    pub fn start(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase: ListenerPhase::Start,
            source: None,
        }
    }

    /// Creates an error for a failed end notification.
    pub fn end(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase: ListenerPhase::End,
            source: None,
        }
    }

    /// Sets the source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.source = Some(source.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_no_such_renderer_names_the_request() {
        let err = RenderError::NoSuchRenderer(Some("nothing".into()));
        assert_eq!(err.to_string(), "no such renderer: nothing");

        let err = RenderError::NoSuchRenderer(None);
        assert_eq!(err.to_string(), "no such renderer: <default>");
    }

    #[test]
    fn test_listener_error_creation() {
        let err = ListenerError::start("flush failed");
        assert_eq!(err.phase, ListenerPhase::Start);
        assert_eq!(err.to_string(), "listener error (start): flush failed");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_listener_error_with_source() {
        let cause = io::Error::new(io::ErrorKind::Other, "disk full");
        let err = ListenerError::end("log write failed").with_source(cause);
        assert_eq!(err.phase, ListenerPhase::End);
        assert!(err.source().unwrap().to_string().contains("disk full"));
    }

    #[test]
    fn test_request_errors_pass_through() {
        let err: RenderError = RequestError::not_available("writer").into();
        assert_eq!(err.to_string(), "feature not available: writer");
    }
}
