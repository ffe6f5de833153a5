//! High-level window handle
//!
//! [`WindowHandle`] is the runtime's window resource: a stable identifier, a
//! boxed platform backend, and the bookkeeping the rest of the runtime needs
//! (cached logical size, clear color). It is exclusively owned by the
//! runtime; panel renderers only ever see the frame being built, never the
//! handle itself.

use crate::config::{Color, WindowSpec};
use crate::window::backend::WindowBackend;
use crate::window::{WindowId, WindowResult};

/// One native window + graphics context pair owned by the runtime
pub struct WindowHandle {
    id: WindowId,
    backend: Box<dyn WindowBackend>,
    cached_size: (u32, u32),
    clear_color: Color,
}

impl WindowHandle {
    /// Wrap a freshly created platform backend
    pub fn new(id: WindowId, spec: &WindowSpec, backend: Box<dyn WindowBackend>) -> Self {
        Self {
            id,
            backend,
            cached_size: (spec.width, spec.height),
            clear_color: spec.clear_color,
        }
    }

    /// Stable identifier, valid for the handle's entire lifetime
    #[must_use]
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Title bar text
    #[must_use]
    pub fn title(&self) -> &str {
        self.backend.title()
    }

    /// Configured per-frame clear color
    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Current logical size
    ///
    /// Queries the native handle and refreshes the cache; if the native
    /// handle is gone, the last cached size is returned instead of failing.
    pub fn size(&mut self) -> (u32, u32) {
        if let Some(size) = self.backend.query_size() {
            self.cached_size = size;
        }
        self.cached_size
    }

    /// Resize the native window and update the cached size
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.backend.set_size(width, height);
        self.cached_size = (width, height);
    }

    /// Record a size reported by a platform resize event without touching
    /// the native window
    pub fn record_size(&mut self, width: u32, height: u32) {
        self.cached_size = (width, height);
    }

    /// Switch the process-wide current-context pointer to this window's
    /// context
    ///
    /// Prefer going through [`CurrentContext::make_current`] so the switch is
    /// tracked by the guard.
    ///
    /// # Errors
    /// Propagates the backend's context-binding failure.
    ///
    /// [`CurrentContext::make_current`]: crate::context::CurrentContext::make_current
    pub fn make_current(&mut self) -> WindowResult<()> {
        self.backend.make_current()
    }

    /// Present the completed frame
    pub fn swap_buffers(&mut self) {
        self.backend.swap_buffers();
    }

    /// Whether this window has a pending close request
    #[must_use]
    pub fn should_close(&self) -> bool {
        self.backend.should_close()
    }

    /// Request that this window be closed
    ///
    /// Only sets the window-local close-intent flag; the scheduler observes
    /// it at the next tick boundary and then tears down every window.
    pub fn request_close(&mut self) {
        self.backend.set_should_close(true);
    }

    /// Set or clear the window-local close-intent flag
    pub fn set_should_close(&mut self, should_close: bool) {
        self.backend.set_should_close(should_close);
    }

    /// Internal backend access for draw-backend attachment
    pub(crate) fn backend_mut(&mut self) -> &mut dyn WindowBackend {
        self.backend.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CallLog, MockWindowBackend};
    use crate::window::WindowId;

    fn spec() -> WindowSpec {
        WindowSpec::new("test", 640, 480, Color::new(0.1, 0.2, 0.3, 1.0))
    }

    #[test]
    fn test_size_falls_back_to_cache_when_handle_gone() {
        let log = CallLog::default();
        let backend = MockWindowBackend::new(WindowId(0), "test", (640, 480), &log);
        let lost = backend.lost_flag();
        let mut handle = WindowHandle::new(WindowId(0), &spec(), Box::new(backend));

        assert_eq!(handle.size(), (640, 480));
        handle.set_size(800, 200);
        assert_eq!(handle.size(), (800, 200));

        // Native handle disappears; the last cached size must survive
        lost.set(true);
        assert_eq!(handle.size(), (800, 200));
    }

    #[test]
    fn test_close_flag_is_local_and_settable() {
        let log = CallLog::default();
        let backend = MockWindowBackend::new(WindowId(3), "test", (640, 480), &log);
        let mut handle = WindowHandle::new(WindowId(3), &spec(), Box::new(backend));

        assert!(!handle.should_close());
        handle.request_close();
        assert!(handle.should_close());
        handle.set_should_close(false);
        assert!(!handle.should_close());
    }

    #[test]
    fn test_identifier_is_stable() {
        let log = CallLog::default();
        let backend = MockWindowBackend::new(WindowId(7), "test", (640, 480), &log);
        let mut handle = WindowHandle::new(WindowId(7), &spec(), Box::new(backend));
        assert_eq!(handle.id(), WindowId(7));
        handle.make_current().unwrap();
        handle.request_close();
        assert_eq!(handle.id(), WindowId(7));
    }
}
