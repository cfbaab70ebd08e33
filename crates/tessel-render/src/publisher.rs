//! Renderer decorator that notifies listeners.
//!
//! ```text
//! L1.start → L2.start → wrapped.render → L1.end → L2.end
//! ```
//!
//! Listeners run in registration order. A failing `start` aborts: the wrapped
//! renderer never runs and no `end` is sent. Once the wrapped renderer has
//! run, every `end` is sent, even after a failed render; the render failure
//! takes precedence over any `end` failure in the returned error.

use std::fmt;
use std::sync::Arc;

use log::{trace, warn};
use tessel_request::Request;

use crate::error::RenderError;
use crate::renderer::{Renderer, RendererListener};

/// Wraps a renderer and brackets each render with listener notifications.
///
/// # Example
///
/// ```
/// use tessel_render::{PublisherRenderer, Renderer, StringRenderer};
///
/// let renderer = PublisherRenderer::new(StringRenderer);
/// assert_eq!(renderer.listener_count(), 0);
/// ```
pub struct PublisherRenderer {
    renderer: Arc<dyn Renderer>,
    listeners: Vec<Arc<dyn RendererListener>>,
}

impl PublisherRenderer {
    pub fn new<R>(renderer: R) -> Self
    where
        R: Renderer + 'static,
    {
        Self::from_shared(Arc::new(renderer))
    }

    pub fn from_shared(renderer: Arc<dyn Renderer>) -> Self {
        Self {
            renderer,
            listeners: Vec::new(),
        }
    }

    /// Appends a listener.
    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: RendererListener + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    pub fn add_shared_listener(&mut self, listener: Arc<dyn RendererListener>) {
        self.listeners.push(listener);
    }

    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: RendererListener + 'static,
    {
        self.add_listener(listener);
        self
    }

    pub fn with_shared_listener(mut self, listener: Arc<dyn RendererListener>) -> Self {
        self.add_shared_listener(listener);
        self
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Renderer for PublisherRenderer {
    fn render(&self, value: Option<&str>, request: &dyn Request) -> Result<(), RenderError> {
        for (index, listener) in self.listeners.iter().enumerate() {
            trace!("listener {} start", index);
            listener.start(value, request)?;
        }

        let rendered = self.renderer.render(value, request);

        let mut end_failure = None;
        for (index, listener) in self.listeners.iter().enumerate() {
            trace!("listener {} end", index);
            if let Err(e) = listener.end(value, request) {
                warn!("listener {} failed at end of render: {}", index, e);
                end_failure.get_or_insert(e);
            }
        }

        rendered?;
        match end_failure {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn is_renderable(&self, value: Option<&str>, request: &dyn Request) -> bool {
        self.renderer.is_renderable(value, request)
    }
}

impl fmt::Debug for PublisherRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublisherRenderer")
            .field("listener_count", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ListenerError, ListenerPhase};
    use crate::string::StringRenderer;
    use std::sync::Mutex;
    use tessel_request::mock::{MemoryApplicationContext, MockHost};
    use tessel_request::ClientRequest;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recording {
        name: &'static str,
        log: Log,
        fail_start: bool,
        fail_end: bool,
    }

    impl Recording {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: log.clone(),
                fail_start: false,
                fail_end: false,
            }
        }
    }

    impl RendererListener for Recording {
        fn start(&self, value: Option<&str>, _request: &dyn Request) -> Result<(), ListenerError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}.start({})", self.name, value.unwrap_or("-")));
            if self.fail_start {
                return Err(ListenerError::start(self.name));
            }
            Ok(())
        }

        fn end(&self, value: Option<&str>, _request: &dyn Request) -> Result<(), ListenerError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}.end({})", self.name, value.unwrap_or("-")));
            if self.fail_end {
                return Err(ListenerError::end(self.name));
            }
            Ok(())
        }
    }

    fn request() -> ClientRequest<MockHost> {
        ClientRequest::new(Arc::new(MemoryApplicationContext::new()), MockHost::new())
    }

    #[test]
    fn test_render_brackets_wrapped_renderer() {
        let log = Log::default();
        let renderer = PublisherRenderer::new(StringRenderer)
            .with_listener(Recording::new("L1", &log))
            .with_listener(Recording::new("L2", &log));
        let req = request();

        renderer.render(Some("Result"), &req).unwrap();

        assert_eq!(req.host().output(), "Result");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["L1.start(Result)", "L2.start(Result)", "L1.end(Result)", "L2.end(Result)"]
        );
    }

    #[test]
    fn test_end_runs_after_failed_render() {
        let log = Log::default();
        let renderer = PublisherRenderer::new(StringRenderer)
            .with_listener(Recording::new("L1", &log))
            .with_listener(Recording::new("L2", &log));
        let req = request();

        let err = renderer.render(None, &req).unwrap_err();

        assert!(matches!(err, RenderError::CannotRender(_)));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["L1.start(-)", "L2.start(-)", "L1.end(-)", "L2.end(-)"]
        );
    }

    #[test]
    fn test_failing_start_aborts() {
        let log = Log::default();
        let mut failing = Recording::new("L1", &log);
        failing.fail_start = true;
        let renderer = PublisherRenderer::new(StringRenderer)
            .with_listener(failing)
            .with_listener(Recording::new("L2", &log));
        let req = request();

        let err = renderer.render(Some("Result"), &req).unwrap_err();

        assert!(matches!(
            err,
            RenderError::Listener(ref e) if e.phase == ListenerPhase::Start
        ));
        assert_eq!(*log.lock().unwrap(), vec!["L1.start(Result)"]);
        assert_eq!(req.host().output(), "");
    }

    #[test]
    fn test_failing_end_still_notifies_others() {
        let log = Log::default();
        let mut failing = Recording::new("L1", &log);
        failing.fail_end = true;
        let renderer = PublisherRenderer::new(StringRenderer)
            .with_listener(failing)
            .with_listener(Recording::new("L2", &log));
        let req = request();

        let err = renderer.render(Some("Result"), &req).unwrap_err();

        assert!(matches!(
            err,
            RenderError::Listener(ref e) if e.phase == ListenerPhase::End && e.message == "L1"
        ));
        assert_eq!(log.lock().unwrap().last().map(String::as_str), Some("L2.end(Result)"));
        assert_eq!(req.host().output(), "Result");
    }

    #[test]
    fn test_render_failure_wins_over_end_failure() {
        let log = Log::default();
        let mut failing = Recording::new("L1", &log);
        failing.fail_end = true;
        let renderer = PublisherRenderer::new(StringRenderer).with_listener(failing);

        let err = renderer.render(None, &request()).unwrap_err();
        assert!(matches!(err, RenderError::CannotRender(_)));
    }

    #[test]
    fn test_is_renderable_delegates_without_notifying() {
        let log = Log::default();
        let renderer =
            PublisherRenderer::new(StringRenderer).with_listener(Recording::new("L1", &log));
        let req = request();

        assert!(renderer.is_renderable(Some("Result"), &req));
        assert!(!renderer.is_renderable(None, &req));
        assert!(log.lock().unwrap().is_empty());
    }
}
