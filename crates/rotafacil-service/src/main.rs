//! RotaFácil HTTP service.
//!
//! # Endpoints
//!
//! - `GET|POST|DELETE /api/v1/waypoints` - list, add, clear
//! - `DELETE /api/v1/waypoints/{id}` - remove one waypoint
//! - `PUT /api/v1/base` - move or rename the base
//! - `POST /api/v1/extract` - coordinates from a pasted map link
//! - `POST /api/v1/route` - compute the round trip; `GET` returns the last one
//! - `GET /metrics`, `GET /health/live`, `GET /health/ready`
//!
//! # Configuration
//!
//! - `ROTAFACIL_STATE_PATH` - state file (default: platform data directory)
//! - `ROTAFACIL_OSRM_URL`, `ROTAFACIL_OSRM_PROFILE`, `ROTAFACIL_OSRM_TIMEOUT_SECS`
//! - `RUST_LOG` - log level (default: info)
//! - `LOG_FORMAT` - json (default) or text
//! - `SERVICE_NAME` - name logged at startup (default: rotafacil)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `METRICS_ENABLED` - default: true

use std::env;
use std::net::SocketAddr;

use tracing::{error, info, warn};

use rotafacil_service::{app, init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env("rotafacil"));

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let port = match env::var("SERVICE_PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(value = %raw, default = DEFAULT_PORT, "ignoring invalid SERVICE_PORT");
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    };

    let state = AppState::from_env().map_err(|e| {
        error!(error = %e, "failed to build application state");
        e
    })?;
    {
        let session = state.session();
        info!(
            waypoints = session.waypoints().len(),
            base = %session.base().name,
            "session loaded"
        );
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
