//! Tracing subscriber setup.

use std::sync::Once;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Log line encoding on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Install the global subscriber. Idempotent; only the first call wins.
///
/// `quiet` raises the fallback filter to `warn` for one-shot commands whose
/// stdout is the product.
pub fn init_logging(format: LogFormat, quiet: bool) {
    INIT.call_once(|| {
        let fallback = if quiet { "warn" } else { DEFAULT_FILTER };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true);

        // A subscriber installed elsewhere (tests, embedding) takes precedence.
        let _ = match format {
            LogFormat::Text => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
    });
}
