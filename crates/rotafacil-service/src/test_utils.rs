//! Test utilities for handler testing: in-memory application state over the
//! library's scripted routing backend.

use std::sync::Arc;

use rotafacil_lib::MemoryStore;

pub use rotafacil_lib::test_utils::{ok_route, ok_trip, ScriptedBackend};

use crate::state::AppState;

/// Fresh state over an empty in-memory store.
pub fn test_state(backend: Arc<ScriptedBackend>) -> AppState {
    AppState::with_parts(Arc::new(MemoryStore::new()), backend)
}
