//! Logger setup for native and browser builds.

use crate::config::LogLevel;

/// Install the platform logger at `level`. Calling it twice is harmless.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .format_timestamp_millis()
        .try_init();
    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Install the platform logger at `level`. Calling it twice is harmless.
#[cfg(target_arch = "wasm32")]
pub fn init(level: LogLevel) {
    if console_log::init_with_level(level.to_level()).is_err() {
        log::debug!("Logger already initialized");
    }
}
