//! Window management subsystem
//!
//! Owns the native window + graphics context pairs the runtime drives. The
//! subsystem is layered the same way on every platform:
//!
//! - [`WindowHandle`]: the application-facing window resource (`handle.rs`)
//! - [`WindowBackend`] / [`Platform`]: internal traits defining the platform
//!   contract (`backend.rs`)
//! - [`GlfwPlatform`]: the concrete GLFW backend (`glfw.rs`)
//!
//! Keeping the platform behind a trait is what lets the full window
//! lifecycle (creation, event pumping, teardown ordering) run under mock
//! backends in tests without a display server.

pub mod backend;
pub mod glfw;
pub mod handle;

pub use backend::{Platform, WindowBackend};
pub use glfw::GlfwPlatform;
pub use handle::WindowHandle;

use crate::config::WindowSpec;

/// Stable identifier for one window, assigned at creation from the window's
/// ordinal position in the configured window list
///
/// Used as the event-routing key; valid for the window's entire lifetime and
/// never reused within one runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window {}", self.0)
    }
}

/// Window management errors
#[derive(thiserror::Error, Debug)]
pub enum WindowError {
    /// Platform windowing subsystem failed to start
    #[error("windowing subsystem initialization failed")]
    Initialization,

    /// Native window could not be created
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// Graphics context could not be created for an otherwise valid window
    #[error("graphics context creation failed: {0}")]
    ContextCreation(String),

    /// An existing graphics context could not be made current
    #[error("context binding failed: {0}")]
    ContextBinding(String),
}

/// Result alias for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Horizontal origin of the first window
const PLACEMENT_BASE_X: i32 = 100;
/// Vertical origin shared by every window
const PLACEMENT_BASE_Y: i32 = 100;
/// Horizontal gap between adjacent windows
const PLACEMENT_GAP_X: u32 = 50;

/// Initial screen position for the window at `ordinal` in the configured list
///
/// Positions are derived purely from list order: each window starts past the
/// cumulative width of every earlier window plus a fixed gap, so the initial
/// layout is deterministic and non-overlapping regardless of titles.
#[must_use]
pub fn placement_for(specs: &[WindowSpec], ordinal: usize) -> (i32, i32) {
    let offset: u32 = specs
        .iter()
        .take(ordinal)
        .map(|spec| spec.width + PLACEMENT_GAP_X)
        .sum();
    (PLACEMENT_BASE_X + offset as i32, PLACEMENT_BASE_Y)
}
