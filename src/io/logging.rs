//! Diagnostic logging setup

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Level used when `RUST_LOG` is not set
pub const fn default_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::WARN }
}

/// Install the stderr subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flag. Returns `false` when
/// a subscriber was already installed, which leaves that one in place.
pub fn init_logging(verbose: bool) -> bool {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(default_level(verbose)).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init()
        .is_ok()
}
