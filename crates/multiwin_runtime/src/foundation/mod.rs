//! Foundation module - Core utilities
//!
//! This module provides fundamental utilities used throughout the runtime:
//! - Time management and frame pacing
//! - Logging utilities

pub mod logging;
pub mod time;
