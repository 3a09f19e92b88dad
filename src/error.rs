//! Error taxonomy for the vault core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    /// Hook payload is missing required fields or carries an empty session id.
    /// Logged and dropped by the hook command, never surfaced to the host.
    #[error("malformed hook payload: {0}")]
    MalformedPayload(String),

    /// The store is locked by another writer and bounded retries ran out.
    #[error("store busy: gave up after {attempts} attempts")]
    StoreBusy { attempts: u32 },

    /// The store file cannot be opened or its parent created.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store opened but its schema is not what we expect.
    #[error("store corrupt: {0}")]
    StoreCorrupt(String),

    /// No session matches the given id or prefix.
    #[error("session '{0}' not found")]
    SessionNotFound(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VaultError {
    /// True for transient lock contention, the only condition worth retrying.
    pub fn is_busy(&self) -> bool {
        match self {
            VaultError::Sqlite(rusqlite::Error::SqliteFailure(code, _)) => matches!(
                code.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            VaultError::StoreBusy { .. } => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;
