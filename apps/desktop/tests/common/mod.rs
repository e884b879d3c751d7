//! Shared setup for integration tests.
//!
//! Provides a `TestContext` wiring a controller to an in-memory asset cache
//! and fake collaborators, plus helpers to locate cards on the board.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use polyglot_core::{CardId, Catalog, DifficultyLevel, GameMode};
use polyglot_directions_lib::cache::{AssetCache, MemoryAssetCache};
use polyglot_directions_lib::engine::{CatalogSource, GameController, GameView, Timings};
use polyglot_directions_lib::services::{ImageGenerator, SpeechPlayer};
use polyglot_directions_lib::state::AppState;

use fixtures::{FakeImageGenerator, RecordingSpeech, ScriptedCatalog};

pub struct TestContext {
    pub state: AppState,
    pub speech: Arc<RecordingSpeech>,
    pub images: Arc<FakeImageGenerator>,
    pub catalog: Arc<ScriptedCatalog>,
}

impl TestContext {
    /// Context with a memory cache and default timings. No round is dealt.
    pub fn new() -> Self {
        Self::with_cache(Arc::new(MemoryAssetCache::new()))
    }

    pub fn with_cache(cache: Arc<dyn AssetCache>) -> Self {
        let speech = Arc::new(RecordingSpeech::default());
        let images = Arc::new(FakeImageGenerator::default());
        let catalog = Arc::new(ScriptedCatalog::new(Catalog::builtin()));
        let controller = GameController::new(
            Arc::clone(&catalog) as Arc<dyn CatalogSource>,
            Arc::clone(&cache),
            Timings::default(),
            GameMode::Same,
            DifficultyLevel::Easy,
        );
        let state = AppState::new(
            controller,
            cache,
            Arc::clone(&speech) as Arc<dyn SpeechPlayer>,
            Arc::clone(&images) as Arc<dyn ImageGenerator>,
        );
        Self {
            state,
            speech,
            images,
            catalog,
        }
    }

    /// Replace the speech player with one that always fails.
    pub fn with_failing_speech() -> Self {
        let mut ctx = Self::new();
        ctx.state.speech = Arc::new(fixtures::FailingSpeech);
        ctx
    }

    pub fn game(&self) -> &GameController {
        &self.state.controller
    }

    pub async fn deal(&self) -> GameView {
        self.game().reset(None, None).await.expect("deal")
    }
}

/// Ids of the cards showing `concept_key`.
pub fn cards_of(view: &GameView, concept_key: &str) -> Vec<CardId> {
    view.round
        .as_ref()
        .expect("round dealt")
        .cards
        .iter()
        .filter(|c| c.concept_key == concept_key)
        .map(|c| c.id)
        .collect()
}

/// Concept keys on the board, in deal order of first appearance.
pub fn concepts(view: &GameView) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for card in &view.round.as_ref().expect("round dealt").cards {
        if !keys.contains(&card.concept_key) {
            keys.push(card.concept_key.clone());
        }
    }
    keys
}
