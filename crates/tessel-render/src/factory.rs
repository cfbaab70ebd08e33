//! Named renderer resolution.
//!
//! A factory is an explicit registry object: it is built once during setup
//! and passed by reference to whatever resolves renderer names. There is no
//! global registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::error::RenderError;
use crate::renderer::Renderer;

/// Resolves renderers by name.
pub trait RendererFactory {
    /// Returns the renderer registered under `name`, or the default renderer
    /// when `name` is `None`.
    ///
    /// An unregistered name fails with [`RenderError::NoSuchRenderer`]; it
    /// never falls back to the default.
    fn get_renderer(&self, name: Option<&str>) -> Result<Arc<dyn Renderer>, RenderError>;
}

/// Map-backed [`RendererFactory`] with a single default slot.
///
/// # Example
///
/// ```
/// use tessel_render::{BasicRendererFactory, DispatchRenderer, RendererFactory, StringRenderer};
///
/// let factory = BasicRendererFactory::new()
///     .with_renderer("string", StringRenderer)
///     .with_renderer("template", DispatchRenderer)
///     .with_default(StringRenderer);
///
/// assert!(factory.get_renderer(Some("template")).is_ok());
/// assert!(factory.get_renderer(None).is_ok());
/// assert!(factory.get_renderer(Some("velocity")).is_err());
/// ```
#[derive(Default, Clone)]
pub struct BasicRendererFactory {
    renderers: HashMap<String, Arc<dyn Renderer>>,
    default: Option<Arc<dyn Renderer>>,
}

impl BasicRendererFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `renderer` under `name`, replacing any previous one.
    pub fn register_renderer<R>(&mut self, name: impl Into<String>, renderer: R)
    where
        R: Renderer + 'static,
    {
        self.register_shared(name, Arc::new(renderer));
    }

    /// Registers an already shared renderer under `name`.
    pub fn register_shared(&mut self, name: impl Into<String>, renderer: Arc<dyn Renderer>) {
        let name = name.into();
        if self.renderers.insert(name.clone(), renderer).is_some() {
            debug!("renderer '{}' replaced", name);
        } else {
            debug!("renderer '{}' registered", name);
        }
    }

    /// Sets the renderer returned for a `None` name.
    pub fn set_default_renderer<R>(&mut self, renderer: R)
    where
        R: Renderer + 'static,
    {
        self.set_default_shared(Arc::new(renderer));
    }

    pub fn set_default_shared(&mut self, renderer: Arc<dyn Renderer>) {
        debug!("default renderer set");
        self.default = Some(renderer);
    }

    pub fn with_renderer<R>(mut self, name: impl Into<String>, renderer: R) -> Self
    where
        R: Renderer + 'static,
    {
        self.register_renderer(name, renderer);
        self
    }

    pub fn with_default<R>(mut self, renderer: R) -> Self
    where
        R: Renderer + 'static,
    {
        self.set_default_renderer(renderer);
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.renderers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl RendererFactory for BasicRendererFactory {
    fn get_renderer(&self, name: Option<&str>) -> Result<Arc<dyn Renderer>, RenderError> {
        let found = match name {
            Some(name) => self.renderers.get(name),
            None => self.default.as_ref(),
        };
        found
            .cloned()
            .ok_or_else(|| RenderError::NoSuchRenderer(name.map(str::to_string)))
    }
}

impl fmt::Debug for BasicRendererFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("BasicRendererFactory")
            .field("renderers", &names)
            .field("has_default", &self.has_default())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string::StringRenderer;
    use tessel_request::Request;

    struct Named;

    impl Renderer for Named {
        fn render(&self, _value: Option<&str>, _request: &dyn Request) -> Result<(), RenderError> {
            Ok(())
        }

        fn is_renderable(&self, _value: Option<&str>, _request: &dyn Request) -> bool {
            true
        }
    }

    fn shared() -> Arc<dyn Renderer> {
        Arc::new(Named)
    }

    #[test]
    fn test_get_renderer_by_name_and_default() {
        let (one, two, three, fallback) = (shared(), shared(), shared(), shared());
        let mut factory = BasicRendererFactory::new();
        factory.register_shared("string", one.clone());
        factory.register_shared("test", two.clone());
        factory.register_shared("test2", three.clone());
        factory.set_default_shared(fallback.clone());

        assert!(Arc::ptr_eq(&factory.get_renderer(Some("string")).unwrap(), &one));
        assert!(Arc::ptr_eq(&factory.get_renderer(Some("test")).unwrap(), &two));
        assert!(Arc::ptr_eq(&factory.get_renderer(Some("test2")).unwrap(), &three));
        assert!(Arc::ptr_eq(&factory.get_renderer(None).unwrap(), &fallback));
    }

    #[test]
    fn test_unregistered_name_never_falls_back() {
        let factory = BasicRendererFactory::new()
            .with_renderer("string", StringRenderer)
            .with_default(StringRenderer);

        match factory.get_renderer(Some("nothing")) {
            Err(RenderError::NoSuchRenderer(Some(name))) => assert_eq!(name, "nothing"),
            other => panic!("expected NoSuchRenderer, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_default() {
        let factory = BasicRendererFactory::new().with_renderer("string", StringRenderer);
        assert!(matches!(
            factory.get_renderer(None),
            Err(RenderError::NoSuchRenderer(None))
        ));
    }

    #[test]
    fn test_last_registration_wins() {
        let (first, second) = (shared(), shared());
        let mut factory = BasicRendererFactory::new();
        factory.register_shared("x", first);
        factory.register_shared("x", second.clone());
        factory.set_default_shared(shared());
        factory.set_default_shared(second.clone());

        assert_eq!(factory.len(), 1);
        assert!(Arc::ptr_eq(&factory.get_renderer(Some("x")).unwrap(), &second));
        assert!(Arc::ptr_eq(&factory.get_renderer(None).unwrap(), &second));
    }

    #[test]
    fn test_debug_lists_names() {
        let factory = BasicRendererFactory::new()
            .with_renderer("b", StringRenderer)
            .with_renderer("a", StringRenderer);
        assert_eq!(
            format!("{:?}", factory),
            r#"BasicRendererFactory { renderers: ["a", "b"], has_default: false }"#
        );
    }
}
