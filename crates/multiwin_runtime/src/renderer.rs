//! Panel renderer seam
//!
//! The runtime draws nothing of its own; each window's widget content comes
//! from a [`FrameRenderer`] collaborator supplied at startup. The contract
//! is deliberately narrow so collaborator faults cannot corrupt scheduler
//! state: errors are reported by value, never panicked across the boundary,
//! and the frame borrow ends with the call, so no window or context handle
//! can be retained past it.

use std::sync::atomic::AtomicBool;

use crate::context::Frame;

/// Error reported by a panel renderer
///
/// A failing renderer closes its own window; the runtime and the other
/// windows keep going.
#[derive(thiserror::Error, Debug)]
#[error("panel renderer failed: {0}")]
pub struct RendererError(pub String);

/// Supplies one window's widget content, once per window per tick
pub trait FrameRenderer {
    /// Build this tick's widget content into `frame`
    ///
    /// `size` is the window's current logical size. `running` is the shared
    /// running flag: collaborator code may clear it to request a runtime-wide
    /// shutdown, and the scheduler observes it at the next tick boundary.
    ///
    /// # Errors
    /// Implementations must report failure by value rather than panicking;
    /// the scheduler scopes the failure to this renderer's window.
    fn render(
        &mut self,
        frame: &mut Frame,
        size: (u32, u32),
        running: &AtomicBool,
    ) -> Result<(), RendererError>;
}
