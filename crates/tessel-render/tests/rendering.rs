//! Renderers resolved through a factory and run against real request chains.

use std::sync::{Arc, Mutex};

use tessel_render::{
    BasicRendererFactory, DispatchRenderer, ListenerError, PublisherRenderer, RenderError,
    Renderer, RendererFactory, RendererListener, StringRenderer,
};
use tessel_request::mock::{HostCall, MemoryApplicationContext, MemoryStore, MockHost};
use tessel_request::{ClientRequest, PageRequest, Request, SharedWriter};

type Events = Arc<Mutex<Vec<String>>>;

struct Recorder {
    name: &'static str,
    events: Events,
}

impl RendererListener for Recorder {
    fn start(&self, value: Option<&str>, _request: &dyn Request) -> Result<(), ListenerError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("{}.start:{}", self.name, value.unwrap_or_default()));
        Ok(())
    }

    fn end(&self, value: Option<&str>, _request: &dyn Request) -> Result<(), ListenerError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("{}.end:{}", self.name, value.unwrap_or_default()));
        Ok(())
    }
}

/// Records the render itself into the shared event log.
struct Marker(Events);

impl Renderer for Marker {
    fn render(&self, value: Option<&str>, _request: &dyn Request) -> Result<(), RenderError> {
        self.0
            .lock()
            .unwrap()
            .push(format!("render:{}", value.unwrap_or_default()));
        Ok(())
    }

    fn is_renderable(&self, value: Option<&str>, _request: &dyn Request) -> bool {
        value.is_some()
    }
}

fn request(host: MockHost) -> ClientRequest<MockHost> {
    ClientRequest::new(Arc::new(MemoryApplicationContext::new()), host)
}

#[test]
fn listeners_bracket_render_in_registration_order() {
    let events = Events::default();
    let renderer = PublisherRenderer::new(Marker(events.clone()))
        .with_listener(Recorder {
            name: "L1",
            events: events.clone(),
        })
        .with_listener(Recorder {
            name: "L2",
            events: events.clone(),
        });

    renderer.render(Some("v"), &request(MockHost::new())).unwrap();

    assert_eq!(
        *events.lock().unwrap(),
        vec!["L1.start:v", "L2.start:v", "render:v", "L1.end:v", "L2.end:v"]
    );
}

#[test]
fn factory_resolves_named_and_default_renderers() {
    let factory = BasicRendererFactory::new()
        .with_renderer("string", StringRenderer)
        .with_renderer("template", DispatchRenderer)
        .with_default(StringRenderer);
    let req = request(MockHost::new());

    factory
        .get_renderer(Some("template"))
        .unwrap()
        .render(Some("/header.html"), &req)
        .unwrap();
    factory
        .get_renderer(None)
        .unwrap()
        .render(Some("<main/>"), &req)
        .unwrap();

    assert_eq!(req.host().includes(), vec!["/header.html"]);
    assert_eq!(req.host().output(), "<main/>");
}

#[test]
fn factory_rejects_unknown_names() {
    let factory = BasicRendererFactory::new().with_default(StringRenderer);
    let err = factory
        .get_renderer(Some("unregistered-name"))
        .err()
        .expect("expected an error for an unregistered renderer name");
    assert!(err.to_string().contains("unregistered-name"));
}

#[test]
fn dispatch_renderer_contract() {
    let req = request(MockHost::new());
    assert!(!DispatchRenderer.is_renderable(None, &req));
    assert!(DispatchRenderer.is_renderable(Some("/x"), &req));
    assert!(matches!(
        DispatchRenderer.render(None, &req),
        Err(RenderError::CannotRender(_))
    ));
}

#[test]
fn dispatch_renderer_forces_include_for_later_dispatches() {
    let req = request(MockHost::new());
    DispatchRenderer.render(Some("/a.html"), &req).unwrap();
    req.dispatch("/b.html").unwrap();

    assert_eq!(
        req.host().calls(),
        vec![
            HostCall::Include("/a.html".to_string()),
            HostCall::Include("/b.html".to_string()),
        ]
    );
}

#[test]
fn string_renderer_writes_into_page_writer() {
    let buffer = tessel_request::mock::Buffer::new();
    let page = PageRequest::new(request(MockHost::new()), MemoryStore::new())
        .with_writer(SharedWriter::new(buffer.clone()));

    StringRenderer.render(Some("fragment"), &page).unwrap();

    assert_eq!(buffer.contents(), "fragment");
    assert_eq!(page.wrapped().host().output(), "");
}
