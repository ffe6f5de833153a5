//! Frame scheduler
//!
//! The top-level loop: pump and route events, render each window in fixed
//! order, pace to the configured tick rate, and tear everything down when a
//! termination condition is observed. Shutdown is expressed as an explicit
//! state machine rather than scattered boolean checks:
//!
//! ```text
//! Running ──(running flag cleared, or any window should-close)──▶ Terminating ──▶ Stopped
//! ```
//!
//! The transition guard is evaluated exactly once, at the top of each tick,
//! so cancellation is cooperative and never interrupts a render pass.
//!
//! One thread owns event polling, rendering, and teardown for every window;
//! windows are processed strictly sequentially within a tick, which is what
//! makes the single current-context pointer safe without synchronization.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::{ConfigError, RuntimeConfig, WindowSpec};
use crate::context::{BackendError, ContextError, CurrentContext, DrawBackend, RenderContext};
use crate::events::EventRouter;
use crate::foundation::time::{FramePacer, Timer};
use crate::renderer::{FrameRenderer, RendererError};
use crate::window::{placement_for, Platform, WindowError, WindowHandle, WindowId};

/// Frame loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Ticking: events are routed and every window is rendered
    Running,
    /// A termination condition was observed; teardown is in progress
    Terminating,
    /// Every window and the platform have been released
    Stopped,
}

/// Fatal runtime errors
///
/// All of these occur during startup; steady-state render failures are
/// scoped to the affected window instead (see [`Runtime::tick`]).
#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    /// Configuration failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Windowing subsystem, window, or context creation failed
    #[error(transparent)]
    Window(#[from] WindowError),

    /// Draw backend failed to attach to a window + context pair
    #[error("draw backend failed to attach to '{title}': {source}")]
    BackendInit {
        /// Title of the window the backend was being attached to
        title: String,
        /// Underlying attach failure
        source: BackendError,
    },

    /// Window list and renderer list lengths differ
    #[error("{expected} windows configured but {actual} panel renderers supplied")]
    RendererCount {
        /// Configured window count
        expected: usize,
        /// Supplied renderer count
        actual: usize,
    },
}

/// Failure inside a single window's render pass
///
/// Never fatal to the runtime: the scheduler marks the offending window
/// should-close and the ordinary termination guard takes it from there.
#[derive(thiserror::Error, Debug)]
pub enum RenderPassError {
    /// Context switch failed
    #[error(transparent)]
    Window(#[from] WindowError),
    /// Frame lifecycle violation
    #[error(transparent)]
    Context(#[from] ContextError),
    /// Draw backend rejected the pass
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// Panel renderer reported failure
    #[error(transparent)]
    Renderer(#[from] RendererError),
}

/// The multi-window runtime: owns every window/context pair and drives the
/// frame loop
///
/// Windows are created once during [`Runtime::initialize`] in configured
/// order and destroyed during shutdown in reverse creation order, each
/// destruction preceded by making its own context current.
pub struct Runtime {
    platform: Box<dyn Platform>,
    windows: Vec<WindowHandle>,
    contexts: Vec<RenderContext>,
    backends: Vec<Box<dyn DrawBackend>>,
    renderers: Vec<Box<dyn FrameRenderer>>,
    router: EventRouter,
    current: CurrentContext,
    running: Arc<AtomicBool>,
    pacer: FramePacer,
    timer: Timer,
    state: LoopState,
}

impl Runtime {
    /// Build the runtime: one window + render context + draw backend per
    /// configured window spec, paired with the renderer at the same index
    ///
    /// Fail-fast: any failure rolls back every resource created earlier in
    /// the same call (reverse order, context made current per teardown) and
    /// shuts the platform down, so no partially-registered window survives.
    ///
    /// # Errors
    /// [`RuntimeError::Config`] for invalid configuration or
    /// [`RuntimeError::RendererCount`] for a renderer/window mismatch before
    /// anything is created; otherwise the underlying creation failure.
    pub fn initialize(
        config: RuntimeConfig,
        mut platform: Box<dyn Platform>,
        renderers: Vec<Box<dyn FrameRenderer>>,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;
        if renderers.len() != config.windows.len() {
            return Err(RuntimeError::RendererCount {
                expected: config.windows.len(),
                actual: renderers.len(),
            });
        }

        let mut current = CurrentContext::new();
        let mut windows = Vec::with_capacity(config.windows.len());
        let mut contexts = Vec::with_capacity(config.windows.len());
        let mut backends = Vec::with_capacity(config.windows.len());

        for (ordinal, spec) in config.windows.iter().enumerate() {
            let id = WindowId(ordinal as u32);
            let position = placement_for(&config.windows, ordinal);
            match Self::create_slot(platform.as_mut(), spec, id, position, &mut current) {
                Ok((window, context, backend)) => {
                    windows.push(window);
                    contexts.push(context);
                    backends.push(backend);
                }
                Err(e) => {
                    log::error!("startup failed while creating '{}': {e}", spec.title);
                    Self::release_windows(
                        &mut windows,
                        &mut contexts,
                        &mut backends,
                        &mut current,
                    );
                    platform.shutdown();
                    return Err(e);
                }
            }
        }

        log::info!("runtime initialized with {} windows", windows.len());
        Ok(Self {
            platform,
            windows,
            contexts,
            backends,
            renderers,
            router: EventRouter::new(),
            current,
            running: Arc::new(AtomicBool::new(true)),
            pacer: FramePacer::from_rate(config.tick_rate_hz),
            timer: Timer::new(),
            state: LoopState::Running,
        })
    }

    fn create_slot(
        platform: &mut dyn Platform,
        spec: &WindowSpec,
        id: WindowId,
        position: (i32, i32),
        current: &mut CurrentContext,
    ) -> Result<(WindowHandle, RenderContext, Box<dyn DrawBackend>), RuntimeError> {
        let backend = platform.create_window(spec, id, position)?;
        let mut window = WindowHandle::new(id, spec, backend);
        current.make_current(&mut window)?;
        let context = RenderContext::new(id, (spec.width, spec.height));
        let draw = platform
            .attach_renderer(window.backend_mut())
            .map_err(|source| RuntimeError::BackendInit {
                title: spec.title.clone(),
                source,
            })?;
        Ok((window, context, draw))
    }

    /// The shared running flag
    ///
    /// Cleared by the global exit signal or by collaborator code; observed
    /// once per tick. Atomic so the flag stays safely observable if event
    /// sources ever move off-thread.
    #[must_use]
    pub fn running(&self) -> &Arc<AtomicBool> {
        &self.running
    }

    /// Current loop state
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of live windows
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// The ordered live window list
    #[must_use]
    pub fn windows(&self) -> &[WindowHandle] {
        &self.windows
    }

    /// Mutable access to the ordered live window list
    pub fn windows_mut(&mut self) -> &mut [WindowHandle] {
        &mut self.windows
    }

    /// The ordered render context list, index-paired with the windows
    #[must_use]
    pub fn contexts(&self) -> &[RenderContext] {
        &self.contexts
    }

    /// The current-context guard
    #[must_use]
    pub fn current(&self) -> &CurrentContext {
        &self.current
    }

    /// Events dropped because their window identifier was unknown
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.router.dropped_count()
    }

    fn should_terminate(&self) -> bool {
        !self.running.load(Ordering::SeqCst) || self.windows.iter().any(WindowHandle::should_close)
    }

    /// Execute one tick
    ///
    /// Evaluates the termination guard once, then routes this tick's events
    /// and renders every window in creation order. Pacing is the caller's
    /// concern ([`Runtime::run`] paces; tests step un-paced).
    ///
    /// A render-pass failure is scoped to the affected window: it is marked
    /// should-close and every other window renders normally.
    pub fn tick(&mut self) -> LoopState {
        if self.state != LoopState::Running {
            return self.state;
        }
        if self.should_terminate() {
            log::info!("termination condition observed");
            self.state = LoopState::Terminating;
            return self.state;
        }

        let events = self.platform.pump_events();
        self.router.route(
            events,
            &mut self.windows,
            &mut self.contexts,
            &mut self.current,
            &self.running,
        );
        self.render_each_window();
        self.timer.update();
        self.state
    }

    fn render_each_window(&mut self) {
        for index in 0..self.windows.len() {
            let result = Self::render_window(
                &mut self.windows[index],
                &mut self.contexts[index],
                self.backends[index].as_mut(),
                self.renderers[index].as_mut(),
                &mut self.current,
                &self.running,
            );
            if let Err(e) = result {
                let window = &mut self.windows[index];
                log::warn!("render pass failed for '{}': {e}; closing it", window.title());
                window.set_should_close(true);
            }
        }
    }

    fn render_window(
        window: &mut WindowHandle,
        context: &mut RenderContext,
        backend: &mut dyn DrawBackend,
        renderer: &mut dyn FrameRenderer,
        current: &mut CurrentContext,
        running: &AtomicBool,
    ) -> Result<(), RenderPassError> {
        current.make_current(window)?;
        context.begin_frame(current)?;
        let size = window.size();
        context.set_viewport(size);
        renderer.render(context.frame_mut()?, size, running)?;
        let frame = context.end_frame(current)?;
        backend.begin_pass(window.clear_color(), size)?;
        backend.submit(&frame)?;
        backend.end_pass()?;
        window.swap_buffers();
        Ok(())
    }

    /// Run the frame loop until a termination condition stops it, then tear
    /// everything down
    ///
    /// # Errors
    /// Reserved for future fatal steady-state conditions; the current
    /// implementation always tears down cleanly and returns `Ok`.
    pub fn run(mut self) -> Result<(), RuntimeError> {
        log::info!("entering frame loop");
        loop {
            self.pacer.begin_tick();
            match self.tick() {
                LoopState::Running => self.pacer.pace(),
                _ => break,
            }
        }
        let ticks = self.timer.frame_count();
        let fps = self.timer.average_fps();
        self.shutdown();
        log::info!("frame loop ended after {ticks} ticks ({fps:.1} avg ticks/s)");
        Ok(())
    }

    /// Tear down every window and the platform
    ///
    /// Reverse creation order; each window's context is made current before
    /// its draw backend and render context shut down, then windows are
    /// destroyed, then process-wide platform state is released. Idempotent.
    pub fn shutdown(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Terminating;
        Self::release_windows(
            &mut self.windows,
            &mut self.contexts,
            &mut self.backends,
            &mut self.current,
        );
        self.renderers.clear();
        self.platform.shutdown();
        self.state = LoopState::Stopped;
        log::info!("runtime stopped");
    }

    fn release_windows(
        windows: &mut Vec<WindowHandle>,
        contexts: &mut Vec<RenderContext>,
        backends: &mut Vec<Box<dyn DrawBackend>>,
        current: &mut CurrentContext,
    ) {
        // Contexts and backends first, reverse creation order, each with its
        // own context current; then the windows themselves, newest first.
        for index in (0..windows.len()).rev() {
            let window = &mut windows[index];
            match current.make_current(window) {
                Ok(()) => {
                    if let Some(backend) = backends.get_mut(index) {
                        backend.shutdown();
                    }
                    if let Some(context) = contexts.get_mut(index) {
                        context.shutdown(current);
                    }
                    log::info!("released render resources for '{}'", window.title());
                }
                Err(e) => {
                    log::warn!("context switch failed tearing down '{}': {e}", window.title());
                }
            }
        }
        backends.clear();
        contexts.clear();
        current.release();
        while windows.pop().is_some() {}
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
