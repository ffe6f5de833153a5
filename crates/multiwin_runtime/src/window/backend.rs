//! Platform and window backend traits
//!
//! These traits are the internal seam between the runtime and the windowing
//! system. The runtime only ever talks to `dyn Platform` and
//! `dyn WindowBackend`, which keeps the scheduler, router, and teardown logic
//! independent of GLFW and lets tests drive the full lifecycle headlessly.

use crate::config::WindowSpec;
use crate::context::{BackendError, DrawBackend};
use crate::events::RuntimeEvent;
use crate::window::{WindowId, WindowResult};

/// Internal trait for one native window + graphics context pair
///
/// Implementations own the native handles. Dropping a backend releases the
/// native window; the runtime guarantees the backend's context was made
/// current immediately beforehand.
pub trait WindowBackend {
    /// Switch the process-wide current-context pointer to this window's
    /// context
    ///
    /// # Errors
    /// Fails if the native context can no longer be bound.
    fn make_current(&mut self) -> WindowResult<()>;

    /// Present the completed frame
    fn swap_buffers(&mut self);

    /// Current client-area size, or `None` if the native handle is gone
    fn query_size(&self) -> Option<(u32, u32)>;

    /// Resize the client area
    fn set_size(&mut self, width: u32, height: u32);

    /// Move the window so its top-left corner sits at the given screen
    /// coordinates
    fn set_position(&mut self, x: i32, y: i32);

    /// Whether closing has been requested for this window
    fn should_close(&self) -> bool;

    /// Set the window-local close-intent flag
    fn set_should_close(&mut self, should_close: bool);

    /// Title bar text
    fn title(&self) -> &str;
}

/// Internal trait for the platform windowing subsystem
///
/// One platform instance owns the process-wide windowing state (the GLFW
/// instance in production) and produces the per-tick event stream.
pub trait Platform {
    /// Create a native window + graphics context pair
    ///
    /// `position` is the deterministic initial placement computed by the
    /// runtime from the window's ordinal. Anything allocated by a failing
    /// call must be released before the error is returned; the runtime
    /// treats every creation failure as fatal and rolls back.
    ///
    /// # Errors
    /// [`WindowError::WindowCreation`] if the native window cannot be
    /// created, [`WindowError::ContextCreation`] if the graphics context
    /// cannot.
    ///
    /// [`WindowError::WindowCreation`]: crate::window::WindowError::WindowCreation
    /// [`WindowError::ContextCreation`]: crate::window::WindowError::ContextCreation
    fn create_window(
        &mut self,
        spec: &WindowSpec,
        id: WindowId,
        position: (i32, i32),
    ) -> WindowResult<Box<dyn WindowBackend>>;

    /// Attach a draw backend to a window + context pair
    ///
    /// Called once per window during startup, immediately after the window's
    /// context has been made current.
    ///
    /// # Errors
    /// [`BackendError::Attach`] if the draw backend cannot bind to the pair.
    fn attach_renderer(
        &mut self,
        window: &mut dyn WindowBackend,
    ) -> Result<Box<dyn DrawBackend>, BackendError>;

    /// Drain the platform event queue
    ///
    /// Produces the finite event sequence for one tick; each call restarts
    /// the sequence. Window-scoped events carry the [`WindowId`] the
    /// platform tagged them with at creation time.
    fn pump_events(&mut self) -> Vec<RuntimeEvent>;

    /// Release process-wide windowing state
    ///
    /// Called once, after every window has been destroyed.
    fn shutdown(&mut self);
}
