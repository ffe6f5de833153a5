//! Event model and per-tick routing
//!
//! The platform pumps its event queue once per tick into a finite sequence
//! of [`RuntimeEvent`]s. The [`EventRouter`] then dispatches each event:
//! window-scoped events go to the single owning window (looked up by stable
//! identifier), global events are broadcast to every window in creation
//! order. Every delivery into a window's input layer is preceded by a switch
//! to that window's context, because the UI state underneath is only valid
//! for the current context.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::context::{CurrentContext, RenderContext};
use crate::window::{WindowHandle, WindowId};

/// Key identity for the subset of keys the runtime distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// Escape key
    Escape,
    /// Enter / Return key
    Enter,
    /// Space bar
    Space,
    /// Tab key
    Tab,
    /// Any other key, identified by platform scancode
    Other(i32),
}

/// Platform-agnostic input event payload
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The user asked this window to close
    CloseRequested,
    /// The window was resized to a new logical size
    Resized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// A key changed state
    Key {
        /// Which key
        key: KeyCode,
        /// True for press or repeat, false for release
        pressed: bool,
    },
    /// A mouse button changed state
    MouseButton {
        /// Platform button index
        button: u8,
        /// True for press, false for release
        pressed: bool,
    },
    /// The cursor moved, in window coordinates
    CursorMoved {
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// The window gained or lost input focus
    Focused(bool),
    /// Program-exit signal
    ExitRequested,
}

/// One event as produced by the platform pump
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    /// Event scoped to a single window
    Window {
        /// Routing key assigned at window creation
        id: WindowId,
        /// Event payload
        event: InputEvent,
    },
    /// Event addressed to no particular window
    Global(InputEvent),
}

/// Demultiplexes the per-tick event sequence across the window list
#[derive(Debug, Default)]
pub struct EventRouter {
    dropped: u64,
}

impl EventRouter {
    /// Create a router
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events dropped so far because their window identifier was unknown
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Route one tick's events
    ///
    /// `windows` and `contexts` are the runtime's ordered, index-paired
    /// window list. A context-switch failure during delivery is scoped to
    /// the affected window: the window is marked should-close and routing
    /// continues.
    pub fn route(
        &mut self,
        events: Vec<RuntimeEvent>,
        windows: &mut [WindowHandle],
        contexts: &mut [RenderContext],
        current: &mut CurrentContext,
        running: &AtomicBool,
    ) {
        for event in events {
            match event {
                RuntimeEvent::Window { id, event } => {
                    self.route_to_window(id, event, windows, contexts, current);
                }
                RuntimeEvent::Global(event) => {
                    Self::broadcast(&event, windows, contexts, current);
                    if event == InputEvent::ExitRequested {
                        log::info!("exit signal received, stopping runtime");
                        running.store(false, Ordering::SeqCst);
                    }
                }
            }
        }
    }

    fn route_to_window(
        &mut self,
        id: WindowId,
        event: InputEvent,
        windows: &mut [WindowHandle],
        contexts: &mut [RenderContext],
        current: &mut CurrentContext,
    ) {
        // Stale identifiers (for example from a window destroyed while events
        // were still queued) are dropped without any state change.
        let Some(index) = windows.iter().position(|w| w.id() == id) else {
            self.dropped += 1;
            log::debug!("dropped event for unknown {id}");
            return;
        };

        let window = &mut windows[index];
        if let Err(e) = current.make_current(window) {
            log::warn!("context switch failed for '{}': {e}; closing it", window.title());
            window.set_should_close(true);
            return;
        }
        contexts[index].feed_input(current, event.clone());

        match event {
            InputEvent::CloseRequested => {
                log::info!("close requested for '{}'", window.title());
                window.set_should_close(true);
            }
            InputEvent::Resized { width, height } => {
                window.record_size(width, height);
            }
            _ => {}
        }
    }

    fn broadcast(
        event: &InputEvent,
        windows: &mut [WindowHandle],
        contexts: &mut [RenderContext],
        current: &mut CurrentContext,
    ) {
        for (window, context) in windows.iter_mut().zip(contexts.iter_mut()) {
            if let Err(e) = current.make_current(window) {
                log::warn!("context switch failed for '{}': {e}; closing it", window.title());
                window.set_should_close(true);
                continue;
            }
            context.feed_input(current, event.clone());
        }
    }
}
