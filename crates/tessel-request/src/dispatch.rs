//! Forward/include routing.
//!
//! A dispatch either replaces the response body (forward) or appends into it
//! (include). Which one happens is decided on every call:
//!
//! ```text
//! ForcedInclude            → include
//! Normal, not committed    → forward
//! Normal, committed        → include
//! ```
//!
//! The mode starts as [`DispatchMode::Normal`] and moves to
//! [`DispatchMode::ForcedInclude`] on the first dispatch or include, whichever
//! route that call takes. It never moves back, so only the first dispatch of a
//! request can forward. The mode is stored as the
//! [`FORCE_INCLUDE_ATTRIBUTE`] attribute of the request scope rather than in
//! the request object, so every request wrapping the same request scope sees
//! the same mode.

use log::debug;
use serde_json::Value;

use crate::error::RequestError;
use crate::request::Request;

/// Request-scope attribute holding the force-include flag.
pub const FORCE_INCLUDE_ATTRIBUTE: &str = "tessel.request.force_include";

/// Dispatch mode of a request scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Forward while the response is uncommitted.
    #[default]
    Normal,
    /// Always include.
    ForcedInclude,
}

/// The host primitive chosen for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchRoute {
    Forward,
    Include,
}

/// Chooses the host primitive for a dispatch.
pub fn route(mode: DispatchMode, committed: bool) -> DispatchRoute {
    match mode {
        DispatchMode::ForcedInclude => DispatchRoute::Include,
        DispatchMode::Normal if committed => DispatchRoute::Include,
        DispatchMode::Normal => DispatchRoute::Forward,
    }
}

/// Reads the dispatch mode from the request scope.
///
/// A request without a request scope is always in normal mode.
pub fn dispatch_mode<R>(request: &R) -> DispatchMode
where
    R: Request + ?Sized,
{
    let forced = request
        .request_scope()
        .ok()
        .and_then(|scope| scope.get(FORCE_INCLUDE_ATTRIBUTE))
        .and_then(|value| value.as_bool())
        .unwrap_or(false);

    if forced {
        DispatchMode::ForcedInclude
    } else {
        DispatchMode::Normal
    }
}

/// Returns true if the request scope is in forced-include mode.
pub fn is_force_include<R>(request: &R) -> bool
where
    R: Request + ?Sized,
{
    dispatch_mode(request) == DispatchMode::ForcedInclude
}

/// Switches the request scope to forced-include mode.
pub fn mark_force_include<R>(request: &R) -> Result<(), RequestError>
where
    R: Request + ?Sized,
{
    let scope = request.request_scope()?;
    if scope.put(FORCE_INCLUDE_ATTRIBUTE, Value::Bool(true)).is_none() {
        debug!("request scope switched to forced-include mode");
    }
    Ok(())
}

/// Rejects empty dispatch paths.
pub(crate) fn require_path(path: &str) -> Result<(), RequestError> {
    if path.is_empty() {
        return Err(RequestError::invalid_argument(
            "dispatch path must not be empty",
        ));
    }
    Ok(())
}
