//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Install a global subscriber
///
/// `RUST_LOG` takes precedence over `config.filter`. Returns `false` if a
/// subscriber was already installed, which is not an error.
pub fn init_tracing(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(filter = %config.filter, json = config.json, "tracing initialised");
    }
    installed
}
