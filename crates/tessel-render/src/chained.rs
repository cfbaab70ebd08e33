//! Renderer that picks the first delegate able to render.

use std::fmt;
use std::sync::Arc;

use log::debug;
use tessel_request::Request;

use crate::error::RenderError;
use crate::renderer::Renderer;

/// Ordered list of renderers; the first whose
/// [`is_renderable`](Renderer::is_renderable) accepts the value renders it.
#[derive(Default)]
pub struct ChainedDelegateRenderer {
    delegates: Vec<Arc<dyn Renderer>>,
}

impl ChainedDelegateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a delegate; earlier delegates take precedence.
    pub fn add_renderer<R>(&mut self, renderer: R)
    where
        R: Renderer + 'static,
    {
        self.delegates.push(Arc::new(renderer));
    }

    pub fn add_shared(&mut self, renderer: Arc<dyn Renderer>) {
        self.delegates.push(renderer);
    }

    pub fn with_renderer<R>(mut self, renderer: R) -> Self
    where
        R: Renderer + 'static,
    {
        self.add_renderer(renderer);
        self
    }

    pub fn with_shared(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.add_shared(renderer);
        self
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl Renderer for ChainedDelegateRenderer {
    fn render(&self, value: Option<&str>, request: &dyn Request) -> Result<(), RenderError> {
        let (index, delegate) = self
            .delegates
            .iter()
            .enumerate()
            .find(|(_, d)| d.is_renderable(value, request))
            .ok_or_else(|| {
                RenderError::cannot_render(format!(
                    "no delegate accepts {}",
                    value.map_or_else(|| "a null value".to_string(), |v| format!("'{}'", v))
                ))
            })?;

        debug!("chained renderer using delegate {}", index);
        delegate.render(value, request)
    }

    fn is_renderable(&self, value: Option<&str>, request: &dyn Request) -> bool {
        self.delegates
            .iter()
            .any(|d| d.is_renderable(value, request))
    }
}

impl fmt::Debug for ChainedDelegateRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedDelegateRenderer")
            .field("delegates", &self.delegates.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchRenderer;
    use crate::string::StringRenderer;
    use tessel_request::mock::{MemoryApplicationContext, MockHost};
    use tessel_request::ClientRequest;

    /// Accepts values that look like template paths.
    struct Templates;

    impl Renderer for Templates {
        fn render(&self, value: Option<&str>, request: &dyn Request) -> Result<(), RenderError> {
            DispatchRenderer.render(value, request)
        }

        fn is_renderable(&self, value: Option<&str>, _request: &dyn Request) -> bool {
            value.is_some_and(|v| v.starts_with('/'))
        }
    }

    fn request() -> ClientRequest<MockHost> {
        ClientRequest::new(Arc::new(MemoryApplicationContext::new()), MockHost::new())
    }

    #[test]
    fn test_first_accepting_delegate_renders() {
        let chain = ChainedDelegateRenderer::new()
            .with_renderer(Templates)
            .with_renderer(StringRenderer);
        let req = request();

        chain.render(Some("/layout.html"), &req).unwrap();
        chain.render(Some("plain text"), &req).unwrap();

        assert_eq!(req.host().includes(), vec!["/layout.html"]);
        assert_eq!(req.host().output(), "plain text");
    }

    #[test]
    fn test_no_delegate_accepts() {
        let chain = ChainedDelegateRenderer::new().with_renderer(Templates);
        let req = request();

        assert!(!chain.is_renderable(Some("plain text"), &req));
        assert!(matches!(
            chain.render(Some("plain text"), &req),
            Err(RenderError::CannotRender(_))
        ));
        assert!(matches!(
            chain.render(None, &req),
            Err(RenderError::CannotRender(_))
        ));
    }

    #[test]
    fn test_empty_chain() {
        let chain = ChainedDelegateRenderer::new();
        assert!(chain.is_empty());
        assert!(!chain.is_renderable(Some("x"), &request()));
    }
}
