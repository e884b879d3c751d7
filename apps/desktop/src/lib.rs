pub mod cache;
pub mod commands;
pub mod config;
pub mod db;
pub mod engine;
pub mod services;
pub mod shell;
pub mod state;

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::{AssetCache, MemoryAssetCache};
use crate::config::AppConfig;
use crate::db::{AssetRepository, SqliteRepository};
use crate::engine::GameController;
use crate::services::{
    CommandSpeech, DisabledImageGenerator, HttpImageGenerator, ImageGenerator, LogSpeech,
    SpeechPlayer,
};
use crate::state::AppState;

/// Open the durable asset cache, falling back to memory if the database is unusable.
pub fn open_cache(db_path: &Path) -> Arc<dyn AssetCache> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    match SqliteRepository::open(db_path) {
        Ok(repository) => {
            match repository.count_assets() {
                Ok(assets) => tracing::info!(path = %db_path.display(), assets, "opened asset cache"),
                Err(e) => tracing::warn!(path = %db_path.display(), error = %e, "cannot count cached assets"),
            }
            Arc::new(Mutex::new(repository))
        }
        Err(e) => {
            tracing::warn!(path = %db_path.display(), error = %e, "asset cache unavailable, images will not persist");
            Arc::new(MemoryAssetCache::new())
        }
    }
}

/// Wire the collaborators described by `config` into application state.
pub fn build_state(config: &AppConfig, cache: Arc<dyn AssetCache>) -> anyhow::Result<AppState> {
    let catalog = config.catalog_source()?;

    let speech: Arc<dyn SpeechPlayer> = match config.speech_command.as_deref().and_then(CommandSpeech::parse) {
        Some(player) => Arc::new(player),
        None => Arc::new(LogSpeech),
    };
    let images: Arc<dyn ImageGenerator> = match &config.image_api_url {
        Some(url) => Arc::new(HttpImageGenerator::new(url.clone(), config.image_api_key.clone())),
        None => Arc::new(DisabledImageGenerator),
    };

    let controller = GameController::new(
        catalog,
        Arc::clone(&cache),
        config.timings,
        config.mode,
        config.difficulty,
    );
    Ok(AppState::new(controller, cache, speech, images))
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        mode = config.mode.as_str(),
        difficulty = config.difficulty.as_str(),
        images = config.image_api_url.is_some(),
        "starting"
    );

    let cache = open_cache(&config.db_path());
    let state = build_state(&config, cache)?;

    commands::reset_game(&state)
        .await
        .map_err(|e| anyhow::anyhow!(e.message))?;

    shell::run(&state).await
}
