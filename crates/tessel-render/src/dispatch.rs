//! Renderer that includes a path.

use log::debug;
use tessel_request::Request;

use crate::error::RenderError;
use crate::renderer::Renderer;

/// Treats the value as a path and includes it into the request's output.
///
/// Any value is renderable except `None`, whatever state the request is in.
#[derive(Debug, Default, Clone, Copy)]
pub struct DispatchRenderer;

impl Renderer for DispatchRenderer {
    fn render(&self, value: Option<&str>, request: &dyn Request) -> Result<(), RenderError> {
        let path =
            value.ok_or_else(|| RenderError::cannot_render("cannot dispatch a null path"))?;
        debug!("rendering '{}' by include", path);
        request.include(path)?;
        Ok(())
    }

    fn is_renderable(&self, value: Option<&str>, _request: &dyn Request) -> bool {
        value.is_some()
    }
}
