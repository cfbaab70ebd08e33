//! Renderer resolution and composable renderers.
//!
//! `tessel-render` decides how a named template reference is turned into
//! output on a [`Request`](tessel_request::Request):
//!
//! - [`RendererFactory`] resolves a renderer by name, with a default for
//!   unnamed references
//! - [`DispatchRenderer`] includes the value as a path
//! - [`StringRenderer`] writes the value as text
//! - [`PublisherRenderer`] brackets another renderer with listener calls
//! - [`ChainedDelegateRenderer`] tries several renderers in order
//!
//! ```
//! use std::sync::Arc;
//! use tessel_render::{BasicRendererFactory, DispatchRenderer, RendererFactory, StringRenderer};
//! use tessel_request::mock::{MemoryApplicationContext, MockHost};
//! use tessel_request::ClientRequest;
//!
//! let factory = BasicRendererFactory::new()
//!     .with_renderer("string", StringRenderer)
//!     .with_default(DispatchRenderer);
//!
//! let request = ClientRequest::new(Arc::new(MemoryApplicationContext::new()), MockHost::new());
//! factory.get_renderer(Some("string"))?.render(Some("hello"), &request)?;
//! factory.get_renderer(None)?.render(Some("/footer.html"), &request)?;
//!
//! assert_eq!(request.host().output(), "hello");
//! assert_eq!(request.host().includes(), vec!["/footer.html"]);
//! # Ok::<(), tessel_render::RenderError>(())
//! ```

mod chained;
mod dispatch;
mod error;
mod factory;
mod publisher;
mod renderer;
mod string;

pub use chained::ChainedDelegateRenderer;
pub use dispatch::DispatchRenderer;
pub use error::{ListenerError, ListenerPhase, RenderError};
pub use factory::{BasicRendererFactory, RendererFactory};
pub use publisher::PublisherRenderer;
pub use renderer::{Renderer, RendererListener};
pub use string::StringRenderer;
