//! Logging setup

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Default level when RUST_LOG is not set
pub fn default_level(verbose: bool, quiet: bool, debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else if quiet {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Install a stderr subscriber. RUST_LOG overrides the level.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reorder_tree={}", level)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}
