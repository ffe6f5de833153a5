//! Logging setup for runtime consumers

pub use log::{debug, error, info, trace, warn};

/// Initialize logging at the default info level
///
/// `RUST_LOG` overrides the level as usual. Call once, from the binary.
pub fn init() {
    init_with_level(log::LevelFilter::Info);
}

/// Initialize logging with an explicit default level
pub fn init_with_level(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
