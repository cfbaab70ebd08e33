//! Renderer and listener traits.

use std::sync::Arc;

use tessel_request::Request;

use crate::error::{ListenerError, RenderError};

/// Renders a value against a request.
///
/// What the value means is up to the renderer: a path to include, literal
/// text, a template name. `None` stands for "no value"; renderers must report
/// it as [`RenderError::CannotRender`] rather than skip it.
pub trait Renderer: Send + Sync {
    /// Renders `value` into the request's output.
    fn render(&self, value: Option<&str>, request: &dyn Request) -> Result<(), RenderError>;

    /// Returns true if [`render`](Self::render) can handle `value`.
    fn is_renderable(&self, value: Option<&str>, request: &dyn Request) -> bool;
}

impl<R: Renderer + ?Sized> Renderer for Arc<R> {
    fn render(&self, value: Option<&str>, request: &dyn Request) -> Result<(), RenderError> {
        (**self).render(value, request)
    }

    fn is_renderable(&self, value: Option<&str>, request: &dyn Request) -> bool {
        (**self).is_renderable(value, request)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&self, value: Option<&str>, request: &dyn Request) -> Result<(), RenderError> {
        (**self).render(value, request)
    }

    fn is_renderable(&self, value: Option<&str>, request: &dyn Request) -> bool {
        (**self).is_renderable(value, request)
    }
}

/// Notified immediately before and after a render.
///
/// `end` is called whether or not the render succeeded; see
/// [`PublisherRenderer`](crate::PublisherRenderer).
pub trait RendererListener: Send + Sync {
    fn start(&self, value: Option<&str>, request: &dyn Request) -> Result<(), ListenerError>;

    fn end(&self, value: Option<&str>, request: &dyn Request) -> Result<(), ListenerError>;
}
