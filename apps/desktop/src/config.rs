//! Runtime configuration read from the environment (and `.env`).

use crate::engine::{CatalogSource, FileCatalog, Timings};
use polyglot_core::{Catalog, CatalogError, Concept, DifficultyLevel, GameMode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const APP_DIR: &str = "polyglot-directions";
const DB_FILE: &str = "assets.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cannot read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed catalog: {0}")]
    CatalogFormat(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    CatalogInvalid(#[from] CatalogError),
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// JSON file replacing the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    pub mode: GameMode,
    pub difficulty: DifficultyLevel,
    pub timings: Timings,
    pub image_api_url: Option<String>,
    pub image_api_key: Option<String>,
    /// TTS command line, e.g. `espeak-ng -v {voice}`.
    pub speech_command: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_path: None,
            mode: GameMode::default(),
            difficulty: DifficultyLevel::default(),
            timings: Timings::default(),
            image_api_url: None,
            image_api_key: None,
            speech_command: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl AppConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or blank
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(dir) = get("POLYGLOT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.catalog_path = get("POLYGLOT_CATALOG").map(PathBuf::from);

        if let Some(value) = get("POLYGLOT_MODE") {
            config.mode = value.parse().map_err(|e: polyglot_core::ParseError| ConfigError::Invalid {
                var: "POLYGLOT_MODE",
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(value) = get("POLYGLOT_DIFFICULTY") {
            config.difficulty =
                value.parse().map_err(|e: polyglot_core::ParseError| ConfigError::Invalid {
                    var: "POLYGLOT_DIFFICULTY",
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
        }

        let timings = &mut config.timings;
        for (var, slot) in [
            ("MATCH_SETTLE_MS", &mut timings.match_settle),
            ("MISMATCH_REVERT_MS", &mut timings.mismatch_revert),
            ("TIMER_TICK_MS", &mut timings.tick),
            ("NOTICE_TTL_MS", &mut timings.notice_ttl),
        ] {
            if let Some(value) = get(var) {
                *slot = parse_millis(var, &value)?;
            }
        }

        config.image_api_url = get("IMAGE_API_URL");
        config.image_api_key = get("IMAGE_API_KEY");
        config.speech_command = get("SPEECH_COMMAND");

        Ok(config)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    /// Catalog source for dealing: the configured file, re-read on every
    /// deal, or the built-in catalog. A file that cannot be read now is an error.
    pub fn catalog_source(&self) -> Result<Arc<dyn CatalogSource>, ConfigError> {
        match &self.catalog_path {
            Some(path) => {
                let source = FileCatalog::new(path);
                source.load()?;
                Ok(Arc::new(source))
            }
            None => Ok(Arc::new(Catalog::builtin())),
        }
    }
}

fn parse_millis(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let millis: u64 = value.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if millis == 0 && var == "TIMER_TICK_MS" {
        return Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(Duration::from_millis(millis))
}

/// Read a JSON array of concepts.
pub fn load_catalog_file(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogIo {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&content)
}

pub fn parse_catalog(json: &str) -> Result<Catalog, ConfigError> {
    let concepts: Vec<Concept> = serde_json::from_str(json)?;
    Ok(Catalog::from_concepts(concepts)?)
}
