//! Repository pattern for asset storage.

use crate::db::error::DbError;
use crate::db::schema::{INIT_SCHEMA_VERSION, SCHEMA, SCHEMA_VERSION};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// A stored asset payload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoredAsset {
    pub key: String,
    pub data: String,
    pub checksum: String,
    pub stored_at: DateTime<Utc>,
}

/// Repository for asset operations.
pub trait AssetRepository {
    fn get_asset(&self, key: &str) -> Result<Option<StoredAsset>>;
    fn put_asset(&self, key: &str, data: &str) -> Result<StoredAsset>;
    fn delete_asset(&self, key: &str) -> Result<bool>;
    fn clear_assets(&self) -> Result<usize>;
    fn count_assets(&self) -> Result<usize>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        self.conn.execute(INIT_SCHEMA_VERSION, params![SCHEMA_VERSION])?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Highest schema version recorded in the database.
    pub fn schema_version(&self) -> Result<i32> {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

/// Hex-encoded SHA-256 of an asset payload.
fn checksum(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::InvalidData(format!("bad timestamp {}: {}", value, e)))
}

impl AssetRepository for SqliteRepository {
    fn get_asset(&self, key: &str) -> Result<Option<StoredAsset>> {
        let row = self
            .conn
            .query_row(
                "SELECT key, data, checksum, stored_at FROM assets WHERE key = ?1",
                params![key],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((key, data, stored_checksum, stored_at)) = row else {
            return Ok(None);
        };

        if checksum(&data) != stored_checksum {
            return Err(DbError::Corrupted(key));
        }

        Ok(Some(StoredAsset {
            key,
            data,
            checksum: stored_checksum,
            stored_at: parse_timestamp(&stored_at)?,
        }))
    }

    fn put_asset(&self, key: &str, data: &str) -> Result<StoredAsset> {
        let asset = StoredAsset {
            key: key.to_string(),
            data: data.to_string(),
            checksum: checksum(data),
            stored_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT OR REPLACE INTO assets (key, data, checksum, stored_at) VALUES (?1, ?2, ?3, ?4)",
            params![asset.key, asset.data, asset.checksum, asset.stored_at.to_rfc3339()],
        )?;
        Ok(asset)
    }

    fn delete_asset(&self, key: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM assets WHERE key = ?1", params![key])?;
        Ok(deleted > 0)
    }

    fn clear_assets(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM assets", [])?)
    }

    fn count_assets(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM assets", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.put_asset("img_left", "data:image/png;base64,AAAA").unwrap();

        let asset = repo.get_asset("img_left").unwrap().unwrap();
        assert_eq!(asset.key, "img_left");
        assert_eq!(asset.data, "data:image/png;base64,AAAA");
        assert_eq!(asset.checksum.len(), 64);
    }

    #[test]
    fn test_missing_asset() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert!(repo.get_asset("img_under").unwrap().is_none());
    }

    #[test]
    fn test_put_replaces_existing() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.put_asset("img_go", "first").unwrap();
        repo.put_asset("img_go", "second").unwrap();
        assert_eq!(repo.count_assets().unwrap(), 1);
        assert_eq!(repo.get_asset("img_go").unwrap().unwrap().data, "second");
    }

    #[test]
    fn test_corrupted_payload_detected() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.put_asset("img_cross", "payload").unwrap();
        repo.conn
            .execute("UPDATE assets SET data = 'tampered' WHERE key = 'img_cross'", [])
            .unwrap();
        assert!(matches!(
            repo.get_asset("img_cross"),
            Err(DbError::Corrupted(key)) if key == "img_cross"
        ));
    }

    #[test]
    fn test_delete_and_clear() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.put_asset("img_a", "a").unwrap();
        repo.put_asset("img_b", "b").unwrap();
        repo.put_asset("img_c", "c").unwrap();

        assert!(repo.delete_asset("img_a").unwrap());
        assert!(!repo.delete_asset("img_a").unwrap());
        assert_eq!(repo.clear_assets().unwrap(), 2);
        assert_eq!(repo.count_assets().unwrap(), 0);
    }

    #[test]
    fn test_schema_version_recorded_once() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.initialize().unwrap();
        assert_eq!(repo.schema_version().unwrap(), SCHEMA_VERSION);
    }
}
