//! Dual-window control station front end
//!
//! Drives two independently rendered windows from one thread: an operations
//! window with device-control panel content and a diagnostics window with a
//! rolling data monitor. All window/context lifecycle, event routing, and
//! frame pacing is handled by the runtime; this binary only wires together
//! configuration, logging, the platform, and the panel renderers.

mod panels;

use multiwin_runtime::foundation::logging;
use multiwin_runtime::{Config, FrameRenderer, GlfwPlatform, Runtime, RuntimeConfig};
use panels::{DiagnosticsPanel, OperationsPanel};

const CONFIG_PATH: &str = "station.toml";

fn load_config() -> RuntimeConfig {
    match RuntimeConfig::load_from_file(CONFIG_PATH) {
        Ok(config) => {
            log::info!("loaded configuration from {CONFIG_PATH}");
            config
        }
        Err(e) => {
            log::warn!("using default configuration ({CONFIG_PATH}: {e})");
            let config = RuntimeConfig::default();
            if let Err(e) = config.save_to_file(CONFIG_PATH) {
                log::warn!("could not write default {CONFIG_PATH}: {e}");
            }
            config
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = load_config();
    config.validate()?;

    // First window carries the operations panel, any further windows get a
    // diagnostics monitor each
    let renderers: Vec<Box<dyn FrameRenderer>> = config
        .windows
        .iter()
        .enumerate()
        .map(|(ordinal, spec)| {
            if ordinal == 0 {
                Box::new(OperationsPanel::new(&spec.title)) as Box<dyn FrameRenderer>
            } else {
                Box::new(DiagnosticsPanel::new(&spec.title)) as Box<dyn FrameRenderer>
            }
        })
        .collect();

    let platform = GlfwPlatform::new()?;
    let runtime = Runtime::initialize(config, Box::new(platform), renderers)?;

    log::info!("station started; close any window or press Escape to exit");
    runtime.run()?;
    Ok(())
}
