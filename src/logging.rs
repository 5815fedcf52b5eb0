//! Tracing setup
//!
//! Log lines go to stderr so command output on stdout stays clean.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Fallback filter when neither RUST_LOG nor settings provide one
pub const DEFAULT_FILTER: &str = "pocket_ledger=info";

/// Install the global subscriber; later calls are no-ops
///
/// `RUST_LOG` takes precedence over `filter`. An unparsable filter falls
/// back to [`DEFAULT_FILTER`].
pub fn init_tracing(filter: &str) {
    TRACING_INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(filter))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // Another subscriber may already be installed by an embedding host
        let _ = fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
