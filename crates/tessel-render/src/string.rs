//! Renderer that writes the value as text.

use std::io::Write;

use tessel_request::Request;

use crate::error::RenderError;
use crate::renderer::Renderer;

/// Writes the value verbatim to the request's writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringRenderer;

impl Renderer for StringRenderer {
    fn render(&self, value: Option<&str>, request: &dyn Request) -> Result<(), RenderError> {
        let text =
            value.ok_or_else(|| RenderError::cannot_render("cannot write a null value"))?;
        let mut writer = request.writer()?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }

    fn is_renderable(&self, value: Option<&str>, _request: &dyn Request) -> bool {
        value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tessel_request::mock::{MemoryApplicationContext, MockHost};
    use tessel_request::{ClientRequest, RequestError};

    fn request(host: MockHost) -> ClientRequest<MockHost> {
        ClientRequest::new(Arc::new(MemoryApplicationContext::new()), host)
    }

    #[test]
    fn test_render_writes_value() {
        let req = request(MockHost::new());
        StringRenderer.render(Some("Result"), &req).unwrap();
        StringRenderer.render(Some(" twice"), &req).unwrap();
        assert_eq!(req.host().output(), "Result twice");
    }

    #[test]
    fn test_render_without_writer() {
        let req = request(MockHost::new().without_output());
        assert!(matches!(
            StringRenderer.render(Some("Result"), &req),
            Err(RenderError::Request(RequestError::NotAvailable(_)))
        ));
    }

    #[test]
    fn test_render_none_fails() {
        let req = request(MockHost::new());
        assert!(matches!(
            StringRenderer.render(None, &req),
            Err(RenderError::CannotRender(_))
        ));
        assert!(!StringRenderer.is_renderable(None, &req));
        assert!(StringRenderer.is_renderable(Some("Result"), &req));
    }
}
