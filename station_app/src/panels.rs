//! Panel renderers for the station windows
//!
//! These are the collaborators the runtime invokes once per window per tick.
//! They draw into the frame's command list and report errors by value; they
//! never see the window or context handles themselves.

use std::sync::atomic::{AtomicBool, Ordering};

use multiwin_runtime::{
    Color, Frame, FrameRenderer, InputEvent, KeyCode, RendererError,
};
use rand::Rng;

const PANEL_BG: Color = Color::new(0.12, 0.12, 0.16, 0.9);
const ACCENT: Color = Color::new(0.3, 0.8, 0.5, 1.0);
const TEXT: Color = Color::new(0.9, 0.9, 0.9, 1.0);

/// Device-control panel shown in the operations window
///
/// Escape requests a station-wide shutdown through the shared running flag.
pub struct OperationsPanel {
    title: String,
    axis_jog: [f32; 3],
    vacuum_on: bool,
    ticks: u64,
}

impl OperationsPanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            axis_jog: [0.0; 3],
            vacuum_on: false,
            ticks: 0,
        }
    }

    fn handle_input(&mut self, input: &[InputEvent], running: &AtomicBool) {
        for event in input {
            match event {
                InputEvent::Key {
                    key: KeyCode::Escape,
                    pressed: true,
                } => {
                    log::info!("escape pressed, requesting station shutdown");
                    running.store(false, Ordering::SeqCst);
                }
                InputEvent::Key {
                    key: KeyCode::Space,
                    pressed: true,
                } => {
                    self.vacuum_on = !self.vacuum_on;
                }
                _ => {}
            }
        }
    }
}

impl FrameRenderer for OperationsPanel {
    fn render(
        &mut self,
        frame: &mut Frame,
        size: (u32, u32),
        running: &AtomicBool,
    ) -> Result<(), RendererError> {
        let input = frame.input().to_vec();
        self.handle_input(&input, running);
        self.ticks += 1;

        // Slow idle sweep so the jog readouts visibly update
        let phase = self.ticks as f32 / 120.0;
        for (axis, jog) in self.axis_jog.iter_mut().enumerate() {
            *jog = (phase + axis as f32).sin() * 10.0;
        }

        let width = size.0 as f32;
        frame.quad(10.0, 10.0, width - 20.0, 30.0, PANEL_BG);
        frame.label(18.0, 18.0, &self.title, TEXT);

        frame.quad(10.0, 50.0, width - 20.0, 120.0, PANEL_BG);
        for (axis, jog) in self.axis_jog.iter().enumerate() {
            let y = 58.0 + axis as f32 * 24.0;
            frame.label(18.0, y, format!("axis {axis} jog: {jog:+.2} mm"), TEXT);
        }
        frame.label(
            18.0,
            58.0 + 3.0 * 24.0,
            if self.vacuum_on {
                "vacuum: ON (space toggles)"
            } else {
                "vacuum: off (space toggles)"
            },
            ACCENT,
        );
        Ok(())
    }
}

/// Rolling strip chart shown in the diagnostics window
pub struct DiagnosticsPanel {
    title: String,
    samples: Vec<f32>,
    ticks: u64,
}

/// Number of sample columns kept in the chart
const SAMPLE_CAPACITY: usize = 120;

impl DiagnosticsPanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            samples: Vec::with_capacity(SAMPLE_CAPACITY),
            ticks: 0,
        }
    }

    fn push_sample(&mut self) {
        let base = (self.ticks as f32 / 30.0).sin() * 0.4 + 0.5;
        let jitter: f32 = rand::thread_rng().gen_range(-0.05..0.05);
        let sample = (base + jitter).clamp(0.0, 1.0);
        if self.samples.len() == SAMPLE_CAPACITY {
            self.samples.remove(0);
        }
        self.samples.push(sample);
    }
}

impl FrameRenderer for DiagnosticsPanel {
    fn render(
        &mut self,
        frame: &mut Frame,
        size: (u32, u32),
        _running: &AtomicBool,
    ) -> Result<(), RendererError> {
        self.ticks += 1;
        self.push_sample();

        let (width, height) = (size.0 as f32, size.1 as f32);
        frame.quad(10.0, 10.0, width - 20.0, 30.0, PANEL_BG);
        frame.label(18.0, 18.0, &self.title, TEXT);

        // Strip chart: one slim column per sample, newest on the right
        let chart_top = 50.0;
        let chart_height = (height - chart_top - 10.0).max(20.0);
        let column = ((width - 20.0) / SAMPLE_CAPACITY as f32).max(1.0);
        frame.quad(10.0, chart_top, width - 20.0, chart_height, PANEL_BG);
        for (i, sample) in self.samples.iter().enumerate() {
            let bar = sample * (chart_height - 4.0);
            frame.quad(
                10.0 + i as f32 * column,
                chart_top + chart_height - 2.0 - bar,
                column,
                bar,
                ACCENT,
            );
        }
        Ok(())
    }
}
