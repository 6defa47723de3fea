//! Logger setup
//!
//! `RUST_LOG` overrides the default level (e.g. `RUST_LOG=pinhole_raster=trace`),
//! and `RUST_LOG_STYLE` controls color output.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Install the global logger. Only the first call has any effect.
pub fn init_logging(default_level: LevelFilter) {
    let env = Env::default().default_filter_or(default_level.as_str());
    let installed = Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .try_init()
        .is_ok();

    if installed {
        log::debug!("logger ready, default level {}", default_level);
    }
}
