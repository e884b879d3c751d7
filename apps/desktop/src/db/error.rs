//! Database error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("checksum mismatch for asset {0}")]
    Corrupted(String),

    #[error("asset store lock poisoned")]
    LockPoisoned,

    #[error("invalid data: {0}")]
    InvalidData(String),
}
