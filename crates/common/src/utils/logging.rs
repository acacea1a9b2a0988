use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Fallback filter when neither `RUST_LOG` nor configuration provides one.
pub const DEFAULT_FILTER: &str = "info,tower_http=info,sea_orm=warn";

fn env_filter(fallback: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback.unwrap_or(DEFAULT_FILTER)))
}

/// Initialize tracing subscriber with compact, human readable output.
/// - Respects `RUST_LOG` if set, otherwise uses `fallback` or [`DEFAULT_FILTER`]
/// - Writes to stdout so container runtimes collect it
pub fn init_logging_default(fallback: Option<&str>) {
    let _ = fmt()
        .with_env_filter(env_filter(fallback))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
pub fn init_logging_json(fallback: Option<&str>) {
    let _ = fmt()
        .with_env_filter(env_filter(fallback))
        .with_target(true)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the output format from configuration.
pub fn init_logging(json: bool, fallback: Option<&str>) {
    if json {
        init_logging_json(fallback);
    } else {
        init_logging_default(fallback);
    }
}
