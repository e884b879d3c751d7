//! Local SQLite storage for generated assets.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{AssetRepository, SqliteRepository, StoredAsset};
