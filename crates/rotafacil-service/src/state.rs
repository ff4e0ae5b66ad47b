//! Application state for the HTTP service.
//!
//! Holds the single [`Session`] behind a mutex and the route orchestrator.
//! The mutex is never held across an `.await`: route handlers claim a ticket,
//! release the lock while the routing backend is queried, and lock again to
//! apply the outcome.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rotafacil_lib::{
    Error as LibError, JsonFileStore, OsrmClient, RouteOrchestrator, RoutingBackend, Session,
    SnapshotStore,
};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// The state file location could not be resolved.
    StateLocation(LibError),

    /// The routing client could not be configured.
    RoutingClient(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StateLocation(e) => write!(f, "failed to resolve state file: {}", e),
            Self::RoutingClient(e) => write!(f, "failed to configure routing client: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StateLocation(e) | Self::RoutingClient(e) => Some(e),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` internally); share it via axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    session: Mutex<Session>,
    orchestrator: RouteOrchestrator,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(session: Session, orchestrator: RouteOrchestrator) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                session: Mutex::new(session),
                orchestrator,
            }),
        }
    }

    /// Open the session from `store` and route through `backend`.
    pub fn with_parts(store: Arc<dyn SnapshotStore>, backend: Arc<dyn RoutingBackend>) -> Self {
        Self::new(Session::open(store), RouteOrchestrator::new(backend))
    }

    /// Build the state from `ROTAFACIL_STATE_PATH` and the `ROTAFACIL_OSRM_*`
    /// variables.
    pub fn from_env() -> Result<Self, AppStateError> {
        let store = JsonFileStore::at_default_path().map_err(AppStateError::StateLocation)?;
        tracing::info!(path = %store.path().display(), "using state file");
        let client = OsrmClient::from_env().map_err(AppStateError::RoutingClient)?;
        tracing::info!(
            osrm_url = %client.config().base_url,
            profile = %client.config().profile,
            "routing client configured"
        );
        Ok(Self::with_parts(Arc::new(store), Arc::new(client)))
    }

    /// Lock the session, recovering from poisoning.
    pub fn session(&self) -> MutexGuard<'_, Session> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn orchestrator(&self) -> &RouteOrchestrator {
        &self.inner.orchestrator
    }
}
