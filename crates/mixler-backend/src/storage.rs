use std::fs;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::error::BackendError;
use crate::types::Session;

/// Where the client keeps the current session between calls.
pub trait SessionStorage: Send + Sync {
    /// Current session, if any.
    fn load(&self) -> Result<Option<Session>, BackendError>;

    /// Replace the current session.
    fn store(&self, session: &Session) -> Result<(), BackendError>;

    /// Forget the current session.
    fn clear(&self) -> Result<(), BackendError>;
}

/// Session held in memory for the lifetime of the client.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<Session>, BackendError> {
        Ok(self.session.read().clone())
    }

    fn store(&self, session: &Session) -> Result<(), BackendError> {
        *self.session.write() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), BackendError> {
        *self.session.write() = None;
        Ok(())
    }
}

/// Session persisted as JSON so it survives restarts.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Store the session at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<Session>, BackendError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .map_err(|e| BackendError::Storage(format!("Failed to read session file: {}", e)))?;

        let session = serde_json::from_str(&json).map_err(|e| {
            BackendError::Storage(format!("Failed to deserialize session: {}", e))
        })?;

        Ok(Some(session))
    }

    fn store(&self, session: &Session) -> Result<(), BackendError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BackendError::Storage(format!("Failed to create session directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| BackendError::Storage(format!("Failed to serialize session: {}", e)))?;

        fs::write(&self.path, json)
            .map_err(|e| BackendError::Storage(format!("Failed to write session file: {}", e)))?;

        tracing::debug!("Stored session at {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<(), BackendError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                BackendError::Storage(format!("Failed to delete session file: {}", e))
            })?;
            tracing::debug!("Deleted session file {:?}", self.path);
        }
        Ok(())
    }
}
