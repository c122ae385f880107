//! Logger bootstrap for the binary and for tests that want to see
//! pipeline diagnostics.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Environment variable consulted for log filters, e.g.
/// `SMOOTH_NAV_LOG=smooth_nav::smoothing=debug`.
pub const LOG_ENV: &str = "SMOOTH_NAV_LOG";

/// Initializes the global logger.
///
/// When `verbose` is `true`, debug messages (smoothing stage sizes, waypoint
/// advances) are printed. Otherwise only info level and above are shown.
/// Filters set through [`LOG_ENV`] take precedence.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    init_with_level(level);
}

/// Initializes the global logger with an explicit default level.
///
/// Calling this more than once is harmless: later calls keep the logger
/// installed by the first one.
pub fn init_with_level(level: LevelFilter) {
    let env = Env::default().filter_or(LOG_ENV, level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    if builder.try_init().is_err() {
        log::debug!("logger already initialised; keeping the existing one");
    }
}
