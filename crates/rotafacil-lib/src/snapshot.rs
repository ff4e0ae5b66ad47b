//! Durable projection of the session state and the stores that hold it.
//!
//! The JSON layout is the one the browser front end keeps in local storage:
//!
//! ```json
//! {"base":{"lat":-2.5297,"lng":-44.2825,"name":"Central (Base)"},
//!  "clients":[{"id":1,"name":"Cliente 1","lat":-2.53,"lng":-44.28}],
//!  "nextId":2}
//! ```
//!
//! Stores are best-effort: callers log and swallow their errors, so the
//! in-memory state always wins.

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::BasePoint;
use crate::registry::Waypoint;

/// Default filename for the persisted state.
const STATE_FILENAME: &str = "state.json";
/// Environment override for the state file location.
pub const STATE_PATH_ENV: &str = "ROTAFACIL_STATE_PATH";

/// Base point, waypoints in display order, and the id counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireSnapshot")]
pub struct StateSnapshot {
    pub base: BasePoint,
    #[serde(rename = "clients")]
    pub waypoints: Vec<Waypoint>,
    #[serde(rename = "nextId")]
    pub next_id: u64,
}

/// Lenient on-disk shape: every field may be missing.
#[derive(Deserialize)]
struct WireSnapshot {
    #[serde(default)]
    base: Option<BasePoint>,
    #[serde(default)]
    clients: Option<Vec<Waypoint>>,
    #[serde(default, rename = "nextId")]
    next_id: Option<u64>,
}

impl From<WireSnapshot> for StateSnapshot {
    fn from(wire: WireSnapshot) -> Self {
        let waypoints = wire.clients.unwrap_or_default();
        let next_id = wire
            .next_id
            .filter(|id| *id > 0)
            .unwrap_or(waypoints.len() as u64 + 1);
        Self {
            base: wire.base.unwrap_or_default(),
            waypoints,
            next_id,
        }
    }
}

/// Serialize a snapshot to its JSON wire form.
pub fn encode(snapshot: &StateSnapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Parse a snapshot from its JSON wire form.
pub fn decode(text: &str) -> Result<StateSnapshot> {
    Ok(serde_json::from_str(text)?)
}

/// Persistence boundary.
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<StateSnapshot>>;

    fn save(&self, snapshot: &StateSnapshot) -> Result<()>;
}

/// Resolve the state file location: `ROTAFACIL_STATE_PATH` when set, else the
/// platform data directory.
pub fn default_state_path() -> Result<PathBuf> {
    if let Some(path) = env::var_os(STATE_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    let dirs =
        ProjectDirs::from("com", "rotafacil", "rotafacil").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(STATE_FILENAME))
}

/// Stores the snapshot as a JSON file, replacing it atomically on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`default_state_path`].
    pub fn at_default_path() -> Result<Self> {
        default_state_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn failure(&self, err: impl ToString) -> Error {
        Error::Persistence {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<StateSnapshot>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no saved state");
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path).map_err(|e| self.failure(e))?;
        let snapshot = decode(&text).map_err(|e| self.failure(e))?;
        debug!(
            path = %self.path.display(),
            waypoints = snapshot.waypoints.len(),
            "loaded saved state"
        );
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &StateSnapshot) -> Result<()> {
        let text = encode(snapshot)?;
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| self.failure(e))?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| self.failure(e))?;
        tmp.write_all(text.as_bytes())
            .map_err(|e| self.failure(e))?;
        tmp.flush().map_err(|e| self.failure(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.failure(e.error))?;
        Ok(())
    }
}

/// Keeps the encoded snapshot in memory. Useful for tests and for running
/// without any durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw JSON, as if a previous run had saved it.
    pub fn with_contents(text: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(text.into())),
        }
    }

    /// Raw JSON of the last save, if any.
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn failure(message: impl ToString) -> Error {
        Error::Persistence {
            path: PathBuf::from("<memory>"),
            message: message.to_string(),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<StateSnapshot>> {
        let slot = self.slot.lock().map_err(Self::failure)?;
        slot.as_deref().map(decode).transpose()
    }

    fn save(&self, snapshot: &StateSnapshot) -> Result<()> {
        let text = encode(snapshot)?;
        *self.slot.lock().map_err(Self::failure)? = Some(text);
        Ok(())
    }
}
