//! # Multiwin Runtime
//!
//! A single-threaded multi-window rendering and event runtime.
//!
//! The runtime owns a fixed, ordered set of native window + render context
//! pairs, demultiplexes the platform event queue across them, enforces the
//! single-current-context invariant required by the underlying graphics
//! stack, and paces a fixed-rate frame loop until shutdown is requested.
//!
//! ## Features
//!
//! - **Window Resources**: native window + graphics context pairs with
//!   deterministic creation and reverse-order teardown
//! - **Current-Context Guard**: explicit, instrumented replacement for the
//!   process-wide "current context" global
//! - **Event Routing**: per-window demultiplexing by stable identifier plus
//!   ordered global broadcast
//! - **Frame Scheduling**: explicit Running/Terminating/Stopped state machine
//!   with best-effort fixed-rate pacing
//! - **Headless Testing**: every platform seam is a trait, so the full
//!   lifecycle runs under mock backends without a display server
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::atomic::AtomicBool;
//! use multiwin_runtime::{
//!     Frame, FrameRenderer, GlfwPlatform, RendererError, Runtime, RuntimeConfig,
//! };
//!
//! struct BlankPanel;
//!
//! impl FrameRenderer for BlankPanel {
//!     fn render(
//!         &mut self,
//!         _frame: &mut Frame,
//!         _size: (u32, u32),
//!         _running: &AtomicBool,
//!     ) -> Result<(), RendererError> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RuntimeConfig::default();
//!     let platform = GlfwPlatform::new()?;
//!     let renderers: Vec<Box<dyn FrameRenderer>> = config
//!         .windows
//!         .iter()
//!         .map(|_| Box::new(BlankPanel) as Box<dyn FrameRenderer>)
//!         .collect();
//!     let runtime = Runtime::initialize(config, Box::new(platform), renderers)?;
//!     runtime.run()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod context;
pub mod events;
pub mod foundation;
pub mod renderer;
pub mod scheduler;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Color, Config, ConfigError, RuntimeConfig, WindowSpec};
pub use context::{
    BackendError, ContextError, CurrentContext, DrawBackend, DrawCommand, Frame, FrameData,
    RenderContext,
};
pub use events::{EventRouter, InputEvent, KeyCode, RuntimeEvent};
pub use renderer::{FrameRenderer, RendererError};
pub use scheduler::{LoopState, Runtime, RuntimeError};
pub use window::{GlfwPlatform, Platform, WindowError, WindowHandle, WindowId, WindowResult};
