//! View-session context for log entries
//!
//! Thread-local storage for the view being rendered, so every span opened
//! while a page is mounted carries the view name and a per-session id.

use std::cell::RefCell;

use uuid::Uuid;

/// View context stored in thread-local storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewContextData {
    /// Name of the mounted view, e.g. `"portfolio"`
    pub view: String,
    /// Unique id for this mount of the view
    pub session_id: Uuid,
}

thread_local! {
    static VIEW_CONTEXT: RefCell<Option<ViewContextData>> = const { RefCell::new(None) };
}

/// RAII guard for view context
///
/// Creating the guard sets the view context for the current thread.
/// Dropping it restores whatever context was active before.
///
/// # Example
///
/// ```ignore
/// use folio_logging::ViewContextGuard;
///
/// let _guard = ViewContextGuard::new("portfolio");
///
/// // Spans opened in this scope carry view = "portfolio"
/// tracing::info_span!("mount").in_scope(|| tracing::info!("Page mounted"));
/// ```
pub struct ViewContextGuard {
    previous: Option<ViewContextData>,
}

impl ViewContextGuard {
    /// Enter a view with a fresh session id
    pub fn new(view: impl Into<String>) -> Self {
        Self::with_session_id(view, Uuid::new_v4())
    }

    /// Enter a view with a known session id
    pub fn with_session_id(view: impl Into<String>, session_id: Uuid) -> Self {
        let next = ViewContextData {
            view: view.into(),
            session_id,
        };
        let previous = VIEW_CONTEXT.with(|ctx| ctx.borrow_mut().replace(next));
        Self { previous }
    }

    /// Get the current view context (if any)
    pub fn current() -> Option<ViewContextData> {
        VIEW_CONTEXT.with(|ctx| ctx.borrow().clone())
    }

    pub fn current_view() -> Option<String> {
        Self::current().map(|ctx| ctx.view)
    }

    pub fn current_session_id() -> Option<Uuid> {
        Self::current().map(|ctx| ctx.session_id)
    }
}

impl Drop for ViewContextGuard {
    fn drop(&mut self) {
        VIEW_CONTEXT.with(|ctx| *ctx.borrow_mut() = self.previous.take());
    }
}

/// Run a block inside a view context
///
/// # Example
///
/// ```ignore
/// with_view_context!("portfolio", {
///     tracing::info!("Rendering header");
/// });
/// ```
#[macro_export]
macro_rules! with_view_context {
    ($view:expr, $body:block) => {{
        let _guard = $crate::context::ViewContextGuard::new($view);
        $body
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_context_guard() {
        assert!(ViewContextGuard::current().is_none());

        {
            let _guard = ViewContextGuard::new("portfolio");
            let ctx = ViewContextGuard::current().unwrap();
            assert_eq!(ctx.view, "portfolio");
        }

        assert!(ViewContextGuard::current().is_none());
    }

    #[test]
    fn test_nested_contexts() {
        let _outer = ViewContextGuard::new("portfolio");
        let outer_session = ViewContextGuard::current_session_id().unwrap();

        {
            let _inner = ViewContextGuard::new("preview");
            assert_eq!(ViewContextGuard::current_view().as_deref(), Some("preview"));
            assert_ne!(ViewContextGuard::current_session_id(), Some(outer_session));
        }

        // Restored to the outer view, same session
        assert_eq!(ViewContextGuard::current_view().as_deref(), Some("portfolio"));
        assert_eq!(ViewContextGuard::current_session_id(), Some(outer_session));
    }

    #[test]
    fn test_with_session_id() {
        let session_id = Uuid::new_v4();
        let _guard = ViewContextGuard::with_session_id("portfolio", session_id);
        assert_eq!(ViewContextGuard::current_session_id(), Some(session_id));
    }

    #[test]
    fn test_macro_scopes_context() {
        let view = with_view_context!("portfolio", { ViewContextGuard::current_view() });
        assert_eq!(view.as_deref(), Some("portfolio"));
        assert!(ViewContextGuard::current().is_none());
    }
}
