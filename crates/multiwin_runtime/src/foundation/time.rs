//! Time management utilities

use std::time::{Duration, Instant};

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per tick)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last tick in seconds
    #[must_use]
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    #[must_use]
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current tick count
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average ticks per second since timer creation
    #[must_use]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Best-effort fixed-rate frame pacer
///
/// Sleeps away whatever remains of the tick budget after event routing and
/// rendering. This is cooperative pacing, not hard real-time: an overlong
/// tick simply starts the next one immediately.
pub struct FramePacer {
    target: Duration,
    tick_start: Instant,
}

impl FramePacer {
    /// Create a pacer for the given tick rate in ticks per second
    ///
    /// A zero rate is clamped to one tick per second rather than dividing by
    /// zero; configuration validation rejects it earlier.
    #[must_use]
    pub fn from_rate(ticks_per_second: u32) -> Self {
        let rate = ticks_per_second.max(1);
        Self {
            target: Duration::from_secs(1) / rate,
            tick_start: Instant::now(),
        }
    }

    /// The fixed tick budget
    #[must_use]
    pub fn target(&self) -> Duration {
        self.target
    }

    /// Mark the start of a tick
    pub fn begin_tick(&mut self) {
        self.tick_start = Instant::now();
    }

    /// Time left in the current tick budget, zero if already exceeded
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.target.saturating_sub(self.tick_start.elapsed())
    }

    /// Sleep away the remainder of the current tick budget
    pub fn pace(&self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }
}
