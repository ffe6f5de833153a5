//! Render contexts and current-context management
//!
//! Each window owns exactly one [`RenderContext`]: the per-window UI state
//! that input events are fed into and frames are built against. The graphics
//! stack underneath has a single process-wide "current context" pointer, so
//! every context operation must be immediately preceded by making the owning
//! window's context current.
//!
//! Rather than relying on that implicit global, the runtime threads an
//! explicit [`CurrentContext`] guard through every render and input call.
//! The guard performs the switch, records which window is active, and backs
//! the debug-mode assertions inside each context operation. Because the
//! runtime is single-threaded, strict ordering is all that is required; no
//! locking.

use crate::config::Color;
use crate::events::InputEvent;
use crate::window::{WindowHandle, WindowId, WindowResult};

/// Render context errors
#[derive(thiserror::Error, Debug)]
pub enum ContextError {
    /// `begin_frame` called while a frame was already open
    #[error("frame already open for {0}")]
    FrameAlreadyOpen(WindowId),

    /// A frame operation was issued with no frame open
    #[error("no frame open for {0}")]
    FrameNotOpen(WindowId),
}

/// Draw backend errors
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    /// Backend could not bind to a window + context pair
    #[error("draw backend failed to attach: {0}")]
    Attach(String),

    /// `begin_pass` called while a pass was already open
    #[error("draw pass already open")]
    PassAlreadyOpen,

    /// `submit` or `end_pass` called with no pass open
    #[error("no draw pass open")]
    PassNotOpen,

    /// Command submission was rejected by the backend
    #[error("draw submission failed: {0}")]
    Submit(String),
}

/// One draw call recorded while building a frame
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Solid-color rectangle in window coordinates
    Quad {
        /// Left edge
        x: f32,
        /// Top edge
        y: f32,
        /// Width in pixels
        width: f32,
        /// Height in pixels
        height: f32,
        /// Fill color
        color: Color,
    },
    /// Text run in window coordinates
    Label {
        /// Left edge of the baseline origin
        x: f32,
        /// Top edge of the baseline origin
        y: f32,
        /// Text content
        text: String,
        /// Text color
        color: Color,
    },
}

/// The frame currently being built for one window
///
/// Panel renderers receive a mutable borrow of this for the duration of a
/// single call; the borrow ends with the call, so no handle can be retained
/// across ticks.
#[derive(Debug, Default)]
pub struct Frame {
    commands: Vec<DrawCommand>,
    input: Vec<InputEvent>,
}

impl Frame {
    /// Record a solid-color rectangle
    pub fn quad(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.commands.push(DrawCommand::Quad {
            x,
            y,
            width,
            height,
            color,
        });
    }

    /// Record a text run
    pub fn label(&mut self, x: f32, y: f32, text: impl Into<String>, color: Color) {
        self.commands.push(DrawCommand::Label {
            x,
            y,
            text: text.into(),
            color,
        });
    }

    /// Input events routed to this window since its previous frame
    #[must_use]
    pub fn input(&self) -> &[InputEvent] {
        &self.input
    }

    /// Number of draw commands recorded so far
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

/// A completed frame, ready for submission to the draw backend
#[derive(Debug)]
pub struct FrameData {
    /// Recorded draw commands in submission order
    pub commands: Vec<DrawCommand>,
    /// Viewport the frame was built for
    pub viewport: (u32, u32),
    /// Monotonic per-window frame index
    pub frame_index: u64,
}

/// Backend-agnostic draw submission interface
///
/// One backend is attached per window + context pair at startup. The pass
/// protocol is strict: `begin_pass`, any number of `submit`s, `end_pass`.
/// The runtime guarantees the owning window's context is current for every
/// call, including `shutdown`.
pub trait DrawBackend {
    /// Open a draw pass, clearing to the given color across the viewport
    ///
    /// # Errors
    /// [`BackendError::PassAlreadyOpen`] if the previous pass was never ended.
    fn begin_pass(&mut self, clear_color: Color, viewport: (u32, u32)) -> Result<(), BackendError>;

    /// Submit one completed frame's command list
    ///
    /// # Errors
    /// [`BackendError::PassNotOpen`] outside a pass, or
    /// [`BackendError::Submit`] if the backend rejects the commands.
    fn submit(&mut self, frame: &FrameData) -> Result<(), BackendError>;

    /// Close the current draw pass
    ///
    /// # Errors
    /// [`BackendError::PassNotOpen`] if no pass is open.
    fn end_pass(&mut self) -> Result<(), BackendError>;

    /// Release backend resources for this window + context pair
    fn shutdown(&mut self);
}

/// Per-window UI state: queued input, the open frame, size bookkeeping
///
/// Lifetime is strictly contained within the owning window's lifetime; the
/// scheduler shuts contexts down (reverse creation order, context current)
/// before any window is destroyed.
pub struct RenderContext {
    window: WindowId,
    pending_input: Vec<InputEvent>,
    open_frame: Option<Frame>,
    viewport: (u32, u32),
    frame_index: u64,
}

impl RenderContext {
    /// Create the context for one window
    #[must_use]
    pub fn new(window: WindowId, initial_size: (u32, u32)) -> Self {
        Self {
            window,
            pending_input: Vec::new(),
            open_frame: None,
            viewport: initial_size,
            frame_index: 0,
        }
    }

    /// The owning window
    #[must_use]
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Input events queued for the next frame
    #[must_use]
    pub fn pending_input(&self) -> &[InputEvent] {
        &self.pending_input
    }

    /// Frames completed so far
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }

    /// Queue an input event for this window's next frame
    ///
    /// The owning window's context must be current.
    pub fn feed_input(&mut self, current: &CurrentContext, event: InputEvent) {
        current.assert_current(self.window);
        self.pending_input.push(event);
    }

    /// Open a new frame, consuming the queued input
    ///
    /// # Errors
    /// [`ContextError::FrameAlreadyOpen`] if the previous frame was never
    /// ended.
    pub fn begin_frame(&mut self, current: &CurrentContext) -> Result<(), ContextError> {
        current.assert_current(self.window);
        if self.open_frame.is_some() {
            return Err(ContextError::FrameAlreadyOpen(self.window));
        }
        self.open_frame = Some(Frame {
            commands: Vec::new(),
            input: std::mem::take(&mut self.pending_input),
        });
        Ok(())
    }

    /// Set the viewport the open frame is being built for
    pub fn set_viewport(&mut self, viewport: (u32, u32)) {
        self.viewport = viewport;
    }

    /// The frame currently being built
    ///
    /// # Errors
    /// [`ContextError::FrameNotOpen`] outside `begin_frame`/`end_frame`.
    pub fn frame_mut(&mut self) -> Result<&mut Frame, ContextError> {
        self.open_frame
            .as_mut()
            .ok_or(ContextError::FrameNotOpen(self.window))
    }

    /// Finalize the open frame
    ///
    /// # Errors
    /// [`ContextError::FrameNotOpen`] if no frame is open.
    pub fn end_frame(&mut self, current: &CurrentContext) -> Result<FrameData, ContextError> {
        current.assert_current(self.window);
        let frame = self
            .open_frame
            .take()
            .ok_or(ContextError::FrameNotOpen(self.window))?;
        self.frame_index += 1;
        Ok(FrameData {
            commands: frame.commands,
            viewport: self.viewport,
            frame_index: self.frame_index,
        })
    }

    /// Release per-frame state ahead of window destruction
    ///
    /// The owning window's context must be current. Dropping an open frame
    /// here is not an error; teardown may interrupt a tick at its boundary.
    pub fn shutdown(&mut self, current: &CurrentContext) {
        current.assert_current(self.window);
        self.open_frame = None;
        self.pending_input.clear();
        log::debug!("render context for {} shut down", self.window);
    }
}

/// Explicit owner of the process-wide current-context pointer
///
/// At most one window's context is current at any instant. Every switch goes
/// through [`CurrentContext::make_current`], which performs the native switch
/// and records the active window so context operations can assert they run
/// against the window that is actually current. Single-threaded by design:
/// ordering, not locking, upholds the invariant.
#[derive(Debug, Default)]
pub struct CurrentContext {
    active: Option<WindowId>,
    switches: u64,
}

impl CurrentContext {
    /// Create the guard with no context current
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the given window's context current
    ///
    /// # Errors
    /// Propagates the native context-binding failure; the guard then records
    /// no active window.
    pub fn make_current(&mut self, window: &mut WindowHandle) -> WindowResult<()> {
        match window.make_current() {
            Ok(()) => {
                self.active = Some(window.id());
                self.switches += 1;
                Ok(())
            }
            Err(e) => {
                self.active = None;
                Err(e)
            }
        }
    }

    /// The window whose context is current, if any
    #[must_use]
    pub fn active(&self) -> Option<WindowId> {
        self.active
    }

    /// Number of context switches performed so far
    #[must_use]
    pub fn switch_count(&self) -> u64 {
        self.switches
    }

    /// Debug-mode check that `expected` is the current window
    ///
    /// # Panics
    /// In debug builds, panics when a context operation runs for a window
    /// that is not current, the ordering bug this guard exists to catch.
    pub fn assert_current(&self, expected: WindowId) {
        debug_assert_eq!(
            self.active,
            Some(expected),
            "context operation for {expected} while current context is {:?}",
            self.active
        );
    }

    /// Forget the active context after the final window teardown
    pub fn release(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Color, WindowSpec};
    use crate::testing::{CallLog, MockWindowBackend};
    use crate::window::WindowHandle;

    fn handle(id: WindowId, log: &CallLog) -> WindowHandle {
        let spec = WindowSpec::new(format!("w{}", id.0), 320, 200, Color::default());
        let backend = MockWindowBackend::new(id, &spec.title, (320, 200), log);
        WindowHandle::new(id, &spec, Box::new(backend))
    }

    fn current_for(window: &mut WindowHandle) -> CurrentContext {
        let mut current = CurrentContext::new();
        current.make_current(window).unwrap();
        current
    }

    #[test]
    fn test_only_one_context_current() {
        let log = CallLog::default();
        let mut w0 = handle(WindowId(0), &log);
        let mut w1 = handle(WindowId(1), &log);
        let mut current = CurrentContext::new();
        assert_eq!(current.active(), None);

        current.make_current(&mut w0).unwrap();
        assert_eq!(current.active(), Some(WindowId(0)));

        current.make_current(&mut w1).unwrap();
        assert_eq!(current.active(), Some(WindowId(1)));
        assert_eq!(current.switch_count(), 2);

        current.release();
        assert_eq!(current.active(), None);
    }

    #[test]
    fn test_frame_lifecycle() {
        let log = CallLog::default();
        let mut window = handle(WindowId(0), &log);
        let current = current_for(&mut window);
        let mut ctx = RenderContext::new(WindowId(0), (320, 200));

        ctx.feed_input(&current, InputEvent::CloseRequested);
        ctx.begin_frame(&current).unwrap();

        // Queued input moved into the frame
        assert!(ctx.pending_input().is_empty());
        let frame = ctx.frame_mut().unwrap();
        assert_eq!(frame.input().len(), 1);
        frame.quad(0.0, 0.0, 10.0, 10.0, Color::default());
        frame.label(2.0, 2.0, "status", Color::default());

        ctx.set_viewport((640, 480));
        let data = ctx.end_frame(&current).unwrap();
        assert_eq!(data.commands.len(), 2);
        assert_eq!(data.viewport, (640, 480));
        assert_eq!(data.frame_index, 1);
        assert_eq!(ctx.frame_count(), 1);
    }

    #[test]
    fn test_frame_misuse_is_an_error() {
        let log = CallLog::default();
        let mut window = handle(WindowId(0), &log);
        let current = current_for(&mut window);
        let mut ctx = RenderContext::new(WindowId(0), (320, 200));

        assert!(matches!(
            ctx.end_frame(&current),
            Err(ContextError::FrameNotOpen(_))
        ));
        assert!(matches!(
            ctx.frame_mut(),
            Err(ContextError::FrameNotOpen(_))
        ));

        ctx.begin_frame(&current).unwrap();
        assert!(matches!(
            ctx.begin_frame(&current),
            Err(ContextError::FrameAlreadyOpen(_))
        ));
    }

    #[test]
    #[should_panic(expected = "context operation")]
    fn test_operation_against_non_current_window_panics() {
        let log = CallLog::default();
        let mut w0 = handle(WindowId(0), &log);
        let mut current = CurrentContext::new();
        current.make_current(&mut w0).unwrap();

        // Context for window 1 while window 0 is current
        let mut ctx = RenderContext::new(WindowId(1), (320, 200));
        ctx.begin_frame(&current).unwrap();
    }

    #[test]
    fn test_failed_switch_leaves_no_active_context() {
        let log = CallLog::default();
        let backend = MockWindowBackend::new(WindowId(0), "w0", (320, 200), &log);
        backend.fail_next_make_current();
        let spec = WindowSpec::new("w0", 320, 200, Color::default());
        let mut window = WindowHandle::new(WindowId(0), &spec, Box::new(backend));

        let mut current = CurrentContext::new();
        assert!(current.make_current(&mut window).is_err());
        assert_eq!(current.active(), None);
    }
}
