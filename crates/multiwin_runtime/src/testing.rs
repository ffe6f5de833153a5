//! Mock backends for headless lifecycle tests
//!
//! Every platform seam in the runtime is a trait, so the full window
//! lifecycle (creation, event routing, render passes, reverse-order
//! teardown) can be exercised without a display server. The mocks here
//! record every significant call into a shared [`CallLog`] so tests can
//! assert ordering, not just outcomes.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{Color, WindowSpec};
use crate::context::{BackendError, DrawBackend, Frame, FrameData};
use crate::events::{InputEvent, RuntimeEvent};
use crate::renderer::{FrameRenderer, RendererError};
use crate::window::backend::{Platform, WindowBackend};
use crate::window::{WindowError, WindowId, WindowResult};

/// Shared, cloneable call log
#[derive(Clone, Default)]
pub(crate) struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

/// Per-tick event batches a [`MockPlatform`] will pump
pub(crate) type EventQueue = Rc<RefCell<VecDeque<Vec<RuntimeEvent>>>>;

/// Window backend that records every call and whose native handle can be
/// simulated away
pub(crate) struct MockWindowBackend {
    id: WindowId,
    title: String,
    size: Cell<(u32, u32)>,
    lost: Rc<Cell<bool>>,
    should_close: bool,
    fail_make_current: Cell<bool>,
    log: CallLog,
}

impl MockWindowBackend {
    pub(crate) fn new(id: WindowId, title: &str, size: (u32, u32), log: &CallLog) -> Self {
        Self {
            id,
            title: title.to_string(),
            size: Cell::new(size),
            lost: Rc::new(Cell::new(false)),
            should_close: false,
            fail_make_current: Cell::new(false),
            log: log.clone(),
        }
    }

    /// Flag that, once set, makes the backend report its native handle gone
    pub(crate) fn lost_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.lost)
    }

    /// Make the next `make_current` fail
    pub(crate) fn fail_next_make_current(&self) {
        self.fail_make_current.set(true);
    }
}

impl WindowBackend for MockWindowBackend {
    fn make_current(&mut self) -> WindowResult<()> {
        if self.fail_make_current.take() {
            return Err(WindowError::ContextBinding(self.title.clone()));
        }
        self.log.push(format!("make_current:{}", self.id.0));
        Ok(())
    }

    fn swap_buffers(&mut self) {
        self.log.push(format!("swap:{}", self.id.0));
    }

    fn query_size(&self) -> Option<(u32, u32)> {
        if self.lost.get() {
            None
        } else {
            Some(self.size.get())
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size.set((width, height));
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.log.push(format!("set_position:{}:{x},{y}", self.id.0));
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.should_close = should_close;
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Drop for MockWindowBackend {
    fn drop(&mut self) {
        self.log.push(format!("destroy_window:{}", self.id.0));
    }
}

/// Platform whose failures and event stream are scripted by the test
pub(crate) struct MockPlatform {
    log: CallLog,
    events: EventQueue,
    created: usize,
    attached: usize,
    fail_window_at: Option<usize>,
    fail_context_at: Option<usize>,
    fail_backend_at: Option<usize>,
}

impl MockPlatform {
    pub(crate) fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            events: Rc::new(RefCell::new(VecDeque::new())),
            created: 0,
            attached: 0,
            fail_window_at: None,
            fail_context_at: None,
            fail_backend_at: None,
        }
    }

    /// Handle the test keeps to queue per-tick event batches
    pub(crate) fn event_queue(&self) -> EventQueue {
        Rc::clone(&self.events)
    }

    /// Fail native window creation for the given creation ordinal
    pub(crate) fn fail_window_creation_at(mut self, ordinal: usize) -> Self {
        self.fail_window_at = Some(ordinal);
        self
    }

    /// Fail graphics context creation for the given creation ordinal
    pub(crate) fn fail_context_creation_at(mut self, ordinal: usize) -> Self {
        self.fail_context_at = Some(ordinal);
        self
    }

    /// Fail draw backend attachment for the given attach ordinal
    pub(crate) fn fail_backend_attach_at(mut self, ordinal: usize) -> Self {
        self.fail_backend_at = Some(ordinal);
        self
    }
}

impl Platform for MockPlatform {
    fn create_window(
        &mut self,
        spec: &WindowSpec,
        id: WindowId,
        position: (i32, i32),
    ) -> WindowResult<Box<dyn WindowBackend>> {
        let ordinal = self.created;
        self.created += 1;
        if self.fail_window_at == Some(ordinal) {
            return Err(WindowError::WindowCreation(spec.title.clone()));
        }
        if self.fail_context_at == Some(ordinal) {
            // The simulated native window is released before returning, as
            // the platform contract requires
            return Err(WindowError::ContextCreation(spec.title.clone()));
        }
        self.log.push(format!(
            "create_window:{}:{},{}",
            id.0, position.0, position.1
        ));
        Ok(Box::new(MockWindowBackend::new(
            id,
            &spec.title,
            (spec.width, spec.height),
            &self.log,
        )))
    }

    fn attach_renderer(
        &mut self,
        window: &mut dyn WindowBackend,
    ) -> Result<Box<dyn DrawBackend>, BackendError> {
        let ordinal = self.attached;
        self.attached += 1;
        if self.fail_backend_at == Some(ordinal) {
            return Err(BackendError::Attach("scripted attach failure".into()));
        }
        Ok(Box::new(RecordingBackend {
            title: window.title().to_string(),
            pass_open: false,
            log: self.log.clone(),
        }))
    }

    fn pump_events(&mut self) -> Vec<RuntimeEvent> {
        self.events.borrow_mut().pop_front().unwrap_or_default()
    }

    fn shutdown(&mut self) {
        self.log.push("platform_shutdown");
    }
}

/// Draw backend that records the pass protocol
pub(crate) struct RecordingBackend {
    title: String,
    pass_open: bool,
    log: CallLog,
}

impl DrawBackend for RecordingBackend {
    fn begin_pass(&mut self, _clear_color: Color, _viewport: (u32, u32)) -> Result<(), BackendError> {
        if self.pass_open {
            return Err(BackendError::PassAlreadyOpen);
        }
        self.pass_open = true;
        self.log.push(format!("begin_pass:{}", self.title));
        Ok(())
    }

    fn submit(&mut self, frame: &FrameData) -> Result<(), BackendError> {
        if !self.pass_open {
            return Err(BackendError::PassNotOpen);
        }
        self.log
            .push(format!("submit:{}:{}", self.title, frame.commands.len()));
        Ok(())
    }

    fn end_pass(&mut self) -> Result<(), BackendError> {
        if !self.pass_open {
            return Err(BackendError::PassNotOpen);
        }
        self.pass_open = false;
        self.log.push(format!("end_pass:{}", self.title));
        Ok(())
    }

    fn shutdown(&mut self) {
        self.log.push(format!("backend_shutdown:{}", self.title));
    }
}

/// Panel renderer with scriptable failure and shutdown behavior
pub(crate) struct ScriptedRenderer {
    name: String,
    log: CallLog,
    calls: u64,
    fail_on_call: Option<u64>,
    clear_running_on_call: Option<u64>,
}

impl ScriptedRenderer {
    pub(crate) fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            calls: 0,
            fail_on_call: None,
            clear_running_on_call: None,
        }
    }

    /// Report failure on the nth call (1-based)
    pub(crate) fn fail_on_call(mut self, call: u64) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Clear the shared running flag on the nth call (1-based)
    pub(crate) fn clear_running_on_call(mut self, call: u64) -> Self {
        self.clear_running_on_call = Some(call);
        self
    }
}

impl FrameRenderer for ScriptedRenderer {
    fn render(
        &mut self,
        frame: &mut Frame,
        _size: (u32, u32),
        running: &AtomicBool,
    ) -> Result<(), RendererError> {
        self.calls += 1;
        self.log.push(format!("render:{}", self.name));
        if frame.input().contains(&InputEvent::ExitRequested) {
            self.log.push(format!("exit_seen:{}", self.name));
        }
        if self.clear_running_on_call == Some(self.calls) {
            running.store(false, Ordering::SeqCst);
        }
        if self.fail_on_call == Some(self.calls) {
            return Err(RendererError("scripted render failure".into()));
        }
        frame.quad(0.0, 0.0, 16.0, 16.0, Color::default());
        Ok(())
    }
}
