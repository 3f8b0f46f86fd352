//! Tracing initialisation shared by the binaries
//!
//! Author: hephaex@gmail.com

use ecc_core::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Per-crate directives appended to the configured level
pub const DEFAULT_DIRECTIVES: &str = "ecc_api=debug,ecc_rag=info,tower_http=debug";

/// Filter used when `RUST_LOG` is unset
pub fn fallback_filter(level: &str) -> String {
    format!("{level},{DEFAULT_DIRECTIVES}")
}

/// Install the global subscriber. `RUST_LOG` wins over the config.
///
/// Logs go to stderr so CLI output on stdout stays machine-readable.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_filter(&config.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    // A subscriber may already be installed
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already set");
    }
}
