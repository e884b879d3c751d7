//! Where each deal reads its vocabulary from.

use crate::config::{load_catalog_file, ConfigError};
use polyglot_core::Catalog;
use std::path::{Path, PathBuf};

/// Supplies the catalog for a deal. Called once per reset, off the async runtime.
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> Result<Catalog, ConfigError>;
}

impl CatalogSource for Catalog {
    fn load(&self) -> Result<Catalog, ConfigError> {
        Ok(self.clone())
    }
}

/// JSON catalog re-read from disk on every deal.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileCatalog {
    fn load(&self) -> Result<Catalog, ConfigError> {
        load_catalog_file(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_source_always_loads() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.load().unwrap(), catalog);
    }

    #[test]
    fn test_file_source_rereads_each_load() {
        let dir = std::env::temp_dir().join(format!("polyglot-catalog-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        let json = serde_json::to_string(Catalog::builtin().concepts()).unwrap();
        std::fs::write(&path, json).unwrap();

        let source = FileCatalog::new(&path);
        assert_eq!(source.load().unwrap().len(), 16);

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(source.load(), Err(ConfigError::CatalogIo { .. })));

        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(source.load(), Err(ConfigError::CatalogInvalid(_))));

        std::fs::remove_dir_all(&dir).ok();
    }
}
