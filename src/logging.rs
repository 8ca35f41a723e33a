// src/logging.rs
//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter,
/// e.g. `DEPFENCE_LOG=depfence_core::graph=debug`.
pub const LOG_ENV: &str = "DEPFENCE_LOG";

/// Initializes logging to stderr. Idempotent.
///
/// `DEPFENCE_LOG` wins when set and valid; otherwise `verbose` selects
/// `info` over the default `warn`.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "depfence=info,depfence_core=info"
        } else {
            "depfence=warn,depfence_core=warn"
        };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .try_init();
    });
}
