//! Structured logging initialization shared by every Nebula binary.
//!
//! Crates instrument with the `tracing` macros directly (re-exported below
//! for convenience); this crate only owns turning that instrumentation into
//! output, via [`init`].

mod format;

pub use format::LogFormat;

// Re-export so downstream crates depend on `nebula_log::{info, warn, ...}`
// instead of adding `tracing` to every Cargo.toml by hand.
pub use tracing::{debug, error, info, trace, warn};
pub use tracing::{instrument, Instrument};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration, layered default → env the way every other Nebula
/// binary loads its configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `RUST_LOG`-style filter directive. Defaults to `"info"`.
    pub filter: String,
    /// Output encoding.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// Build a config from `RUST_LOG` / `NEBULA_LOG_FORMAT`, falling back to
    /// sane defaults for each.
    #[must_use]
    pub fn from_env() -> Self {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned());
        let format = match std::env::var("NEBULA_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        Self { filter, format }
    }
}

/// Install a global `tracing` subscriber built from `config`.
///
/// Idempotent only in the sense that `tracing`'s own global dispatcher is —
/// calling this twice in the same process panics, matching `tracing`'s own
/// contract. Binaries call this once at startup; tests use
/// `tracing_subscriber::fmt().with_test_writer()` directly instead.
pub fn init(config: &LogConfig) {
    let env_filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).init(),
        LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).init(),
    }
}
