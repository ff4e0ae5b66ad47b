//! Tracing subscriber setup for the service binary.
//!
//! `LOG_FORMAT=text` (or `pretty`) switches from JSON lines to multi-line
//! human output. `RUST_LOG` filters as usual and falls back to `info`.
//! `SERVICE_NAME` overrides the name logged at startup.
//!
//! ```no_run
//! use rotafacil_service::logging::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::from_env("rotafacil"));
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// JSON lines when true, pretty text otherwise.
    pub json: bool,
    pub service: String,
}

impl LoggingConfig {
    /// Read `LOG_FORMAT` and `SERVICE_NAME`; `service` is the fallback name.
    pub fn from_env(service: &str) -> Self {
        Self::from_values(
            std::env::var("LOG_FORMAT").ok().as_deref(),
            std::env::var("SERVICE_NAME").ok().as_deref(),
            service,
        )
    }

    fn from_values(format: Option<&str>, name: Option<&str>, fallback: &str) -> Self {
        let json = !matches!(
            format.map(|f| f.trim().to_ascii_lowercase()).as_deref(),
            Some("text" | "pretty")
        );
        let service = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback)
            .to_string();
        Self { json, service }
    }
}

/// Install the global subscriber. A second call leaves the first in place.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let base = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        base.with(fmt::layer().json().flatten_event(true).with_span_list(false))
            .try_init()
    } else {
        base.with(fmt::layer().pretty()).try_init()
    };

    if installed.is_ok() {
        tracing::info!(service = %config.service, json = config.json, "logging initialized");
    }
}
