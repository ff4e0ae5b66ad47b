// Command handlers, one module per group of related subcommands.
//
// main.rs parses arguments and dispatches here; handlers open the session,
// apply one event, and render the outcome.

pub mod extract;
pub mod route;
pub mod waypoints;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use rotafacil_lib::{
    parse_coordinate, JsonFileStore, OsrmClient, OsrmConfig, Point, RouteOrchestrator, Session,
};

/// Global options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// State file override (`--state`).
    pub state: Option<PathBuf>,
    /// Routing service override (`--osrm-url`).
    pub osrm_url: Option<String>,
}

impl GlobalOptions {
    pub fn store(&self) -> Result<JsonFileStore> {
        match &self.state {
            Some(path) => Ok(JsonFileStore::new(path)),
            None => JsonFileStore::at_default_path()
                .context("failed to resolve the state file location"),
        }
    }

    pub fn open_session(&self) -> Result<Session> {
        let store = self.store()?;
        tracing::debug!(path = %store.path().display(), "opening session");
        Ok(Session::open(Arc::new(store)))
    }

    pub fn orchestrator(&self) -> Result<RouteOrchestrator> {
        let mut config = OsrmConfig::from_env();
        if let Some(url) = &self.osrm_url {
            config = config.with_base_url(url.clone());
        }
        let client = OsrmClient::new(config).context("failed to set up the routing client")?;
        Ok(RouteOrchestrator::new(Arc::new(client)))
    }
}

/// Parse a manually entered `lat`/`lng` pair.
pub fn parse_point(lat: &str, lng: &str) -> Result<Point> {
    let lat = parse_coordinate(lat).context("invalid latitude")?;
    let lng = parse_coordinate(lng).context("invalid longitude")?;
    Ok(Point::validated(lat, lng)?)
}
