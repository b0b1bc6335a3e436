// src/session.rs
//! Persistent anonymous session identifier.
//!
//! Guest requests are attributed to a stable pseudo-identity: a v4 UUID
//! generated once per installation and stored under the data directory. It
//! never expires and is never rotated; a file that no longer parses as a UUID
//! is replaced with a fresh one.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

const SESSION_FILE: &str = "session_id";

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    /// The single accessor: returns the persisted identifier, creating and
    /// persisting one on first use.
    pub fn get_or_create(&self) -> Result<Uuid> {
        if let Some(existing) = self.read_existing()? {
            return Ok(existing);
        }

        let id = Uuid::new_v4();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.path, id.to_string())
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;

        debug!("Created session identifier {}", id);
        Ok(id)
    }

    fn read_existing(&self) -> Result<Option<Uuid>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;

        match raw.trim().parse::<Uuid>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                warn!("Session file does not contain a valid UUID, regenerating");
                Ok(None)
            }
        }
    }
}
