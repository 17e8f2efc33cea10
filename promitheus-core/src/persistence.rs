//! Persistence layer for agent state documents.
//!
//! Each agent's [`PersistedDocument`] is stored as one pretty-printed JSON
//! file:
//!
//! ```text
//! <data_dir>/
//!   <agent_id>/
//!     state.json
//! ```
//!
//! Behaviour:
//! - The whole document is rewritten on every save, via a temporary file in
//!   the same directory and a rename; readers never see a partial file.
//! - A missing or unparseable file is not an error: `load` returns `None`
//!   and the engine starts the agent from defaults. A corrupt file is logged
//!   and left in place until the next save replaces it.
//! - There is no locking. One process owns an agent's file at a time.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::error::{PromitheusError, Result};
use crate::types::{AgentId, PersistedDocument};

/// Where agent documents are kept.
pub trait StateStore: Send + Sync {
    /// Load the document for `agent`.
    ///
    /// Returns `Ok(None)` when nothing usable is stored: no file yet, or a
    /// file that does not parse.
    ///
    /// # Errors
    ///
    /// Returns [`PromitheusError::Io`] for read failures other than
    /// "not found".
    fn load(&self, agent: &AgentId) -> Result<Option<PersistedDocument>>;

    /// Replace the stored document for `document.agent_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PromitheusError::Serialization`] if encoding fails or
    /// [`PromitheusError::Io`] if the write fails.
    fn save(&self, document: &PersistedDocument) -> Result<()>;
}

impl<T: StateStore + ?Sized> StateStore for std::sync::Arc<T> {
    fn load(&self, agent: &AgentId) -> Result<Option<PersistedDocument>> {
        (**self).load(agent)
    }

    fn save(&self, document: &PersistedDocument) -> Result<()> {
        (**self).save(document)
    }
}

/// Serialize a document exactly as it is written to disk.
///
/// # Errors
///
/// Returns [`PromitheusError::Serialization`] if encoding fails.
pub fn encode(document: &PersistedDocument) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(|e| PromitheusError::Serialization(e.to_string()))
}

/// Parse a stored document.
///
/// # Errors
///
/// Returns [`PromitheusError::Serialization`] if the JSON is malformed or
/// does not match the schema.
pub fn decode(json: &str) -> Result<PersistedDocument> {
    serde_json::from_str(json).map_err(|e| PromitheusError::Serialization(e.to_string()))
}

fn decode_or_discard(agent: &AgentId, json: &str, source: &str) -> Option<PersistedDocument> {
    match decode(json) {
        Ok(document) => Some(document),
        Err(e) => {
            warn!(
                agent = %agent,
                source,
                error = %e,
                "Stored state is corrupt, starting from defaults"
            );
            None
        }
    }
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// One JSON file per agent under a data directory.
///
/// # Usage
///
/// ```no_run
/// # use promitheus_core::persistence::{JsonFileStore, StateStore};
/// # use promitheus_core::types::AgentId;
/// let store = JsonFileStore::new("/var/lib/promitheus");
/// let agent = AgentId::new("main")?;
/// if let Some(document) = store.load(&agent)? {
///     store.save(&document)?;
/// }
/// # Ok::<(), promitheus_core::error::PromitheusError>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    file_name: String,
}

impl JsonFileStore {
    /// Store documents under `data_dir` as `state.json`.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        info!(path = %data_dir.display(), "Promitheus state store opened");
        Self {
            data_dir,
            file_name: "state.json".to_string(),
        }
    }

    /// Build a store from the `[storage]` config section.
    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.resolved_data_dir()).with_file_name(&config.file_name)
    }

    /// Use a different file name inside each agent directory.
    #[must_use]
    pub fn with_file_name(mut self, file_name: &str) -> Self {
        self.file_name = file_name.to_string();
        self
    }

    /// Root directory of this store.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the state file for `agent`.
    #[must_use]
    pub fn path_for(&self, agent: &AgentId) -> PathBuf {
        self.data_dir.join(agent.as_str()).join(&self.file_name)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, agent: &AgentId) -> Result<Option<PersistedDocument>> {
        let start = Instant::now();
        let path = self.path_for(agent);

        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(agent = %agent, path = %path.display(), "No stored state");
                return Ok(None);
            }
            // Non-UTF-8 content is corruption, not an I/O failure.
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(agent = %agent, path = %path.display(), error = %e, "Stored state is not UTF-8, starting from defaults");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let document = decode_or_discard(agent, &json, &path.display().to_string());

        debug!(
            agent = %agent,
            bytes = json.len(),
            events = document.as_ref().map_or(0, |d| d.events.len()),
            elapsed_us = start.elapsed().as_micros(),
            "Loaded state"
        );

        Ok(document)
    }

    fn save(&self, document: &PersistedDocument) -> Result<()> {
        let start = Instant::now();
        let path = self.path_for(&document.agent_id);
        let json = encode(document)?;

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let tmp = path.with_file_name(format!("{}.tmp", self.file_name));
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, &path)?;

        debug!(
            agent = %document.agent_id,
            events = document.events.len(),
            bytes = json.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Saved state"
        );

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory store (tests, benchmarks).
///
/// Documents are kept in their serialized form so loads go through the same
/// decode path as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<AgentId, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored JSON for `agent`, if any.
    #[must_use]
    pub fn raw(&self, agent: &AgentId) -> Option<String> {
        self.documents.lock().get(agent).cloned()
    }

    /// Put raw JSON in place for `agent` (used to simulate corruption).
    pub fn insert_raw(&self, agent: &AgentId, json: impl Into<String>) {
        self.documents.lock().insert(agent.clone(), json.into());
    }
}

impl StateStore for MemoryStore {
    fn load(&self, agent: &AgentId) -> Result<Option<PersistedDocument>> {
        let Some(json) = self.raw(agent) else {
            return Ok(None);
        };
        Ok(decode_or_discard(agent, &json, "memory"))
    }

    fn save(&self, document: &PersistedDocument) -> Result<()> {
        let json = encode(document)?;
        self.documents.lock().insert(document.agent_id.clone(), json);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
