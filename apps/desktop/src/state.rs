//! Application state.

use crate::cache::AssetCache;
use crate::engine::GameController;
use crate::services::{ImageGenerator, SpeechPlayer};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Global application state.
pub struct AppState {
    pub controller: GameController,
    pub cache: Arc<dyn AssetCache>,
    pub speech: Arc<dyn SpeechPlayer>,
    pub images: Arc<dyn ImageGenerator>,
    /// Concept keys with an image generation in flight.
    pub generating: Mutex<HashSet<String>>,
}

impl AppState {
    pub fn new(
        controller: GameController,
        cache: Arc<dyn AssetCache>,
        speech: Arc<dyn SpeechPlayer>,
        images: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            controller,
            cache,
            speech,
            images,
            generating: Mutex::new(HashSet::new()),
        }
    }
}
