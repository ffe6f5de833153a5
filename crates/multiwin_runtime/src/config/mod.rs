//! Configuration system
//!
//! Startup configuration for the runtime: the ordered window list and the
//! frame loop tick rate. Supports TOML and RON on disk behind the [`Config`]
//! trait, with defaults reproducing the stock two-window station layout.

use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Semantic validation failure
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// RGBA clear color, each channel in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl Color {
    /// Create a color from channel values
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

/// Descriptor for one window in the startup window list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Title bar text
    pub title: String,
    /// Initial logical width in pixels
    pub width: u32,
    /// Initial logical height in pixels
    pub height: u32,
    /// Per-frame clear color
    pub clear_color: Color,
}

impl WindowSpec {
    /// Create a window descriptor
    pub fn new(title: impl Into<String>, width: u32, height: u32, clear_color: Color) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            clear_color,
        }
    }
}

/// Top-level runtime configuration
///
/// The window list is ordered: creation, per-tick rendering, and global event
/// broadcast all follow list order, and teardown runs in reverse list order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Frame loop target rate in ticks per second
    pub tick_rate_hz: u32,
    /// Ordered window list; fixed for the lifetime of the runtime
    pub windows: Vec<WindowSpec>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            windows: vec![
                WindowSpec::new(
                    "Station - Operations",
                    800,
                    600,
                    Color::new(0.2, 0.3, 0.4, 1.0),
                ),
                WindowSpec::new(
                    "Station - Diagnostics",
                    600,
                    400,
                    Color::new(0.4, 0.2, 0.4, 1.0),
                ),
            ],
        }
    }
}

impl Config for RuntimeConfig {}

impl RuntimeConfig {
    /// Validate the configuration before handing it to the runtime
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for an empty window list, zero window
    /// dimensions, or a zero tick rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid("tick_rate_hz must be non-zero".into()));
        }
        if self.windows.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one window must be configured".into(),
            ));
        }
        for spec in &self.windows {
            if spec.width == 0 || spec.height == 0 {
                return Err(ConfigError::Invalid(format!(
                    "window '{}' has zero dimensions",
                    spec.title
                )));
            }
        }
        Ok(())
    }
}
