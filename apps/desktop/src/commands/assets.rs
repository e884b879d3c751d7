//! Speech and illustration commands.

use super::CommandError;
use crate::engine::{GameView, NoticeKind};
use crate::state::AppState;
use polyglot_core::{asset_key, CardId};
use std::sync::Arc;

/// Speak a card's text in its language.
///
/// Playback failures are logged and never surface as errors.
pub async fn speak_card(card_id: CardId, state: &AppState) -> Result<(), CommandError> {
    let card = state.controller.card(card_id)?;
    if let Err(e) = state.speech.speak(&card.text, card.language).await {
        tracing::warn!(card = %card_id, error = %e, "speech failed");
    }
    Ok(())
}

/// Removes the concept from the in-flight set when dropped.
struct GenerationGuard<'a> {
    state: &'a AppState,
    concept_key: String,
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut generating) = self.state.generating.lock() {
            generating.remove(&self.concept_key);
        }
    }
}

/// Generate an illustration for a card's concept, cache it and attach it
/// to both cards of the pair.
///
/// A request for a card that already has an image, or whose concept is
/// already being generated from either card of the pair, is ignored.
pub async fn generate_card_image(card_id: CardId, state: &AppState) -> Result<GameView, CommandError> {
    let card = state.controller.card(card_id)?;
    if card.image_url.is_some() {
        return Ok(state.controller.view());
    }

    {
        let mut generating = state
            .generating
            .lock()
            .map_err(|_| CommandError::new("Generation registry poisoned"))?;
        if !generating.insert(card.concept_key.clone()) {
            tracing::debug!(concept = %card.concept_key, "image generation already in flight");
            return Ok(state.controller.view());
        }
    }
    let _guard = GenerationGuard {
        state,
        concept_key: card.concept_key.clone(),
    };

    tracing::info!(concept = %card.concept_key, "generating image");
    let url = match state.images.generate(&card.text).await {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(concept = %card.concept_key, error = %e, "image generation failed");
            state
                .controller
                .notify(NoticeKind::Error, format!("Could not generate image: {}", e));
            return Err(e.into());
        }
    };

    let cache = Arc::clone(&state.cache);
    let key = asset_key(&card.concept_key);
    let value = url.clone();
    match tokio::task::spawn_blocking(move || cache.put(&key, &value)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(concept = %card.concept_key, error = %e, "failed to cache image"),
        Err(e) => tracing::warn!(error = %e, "cache write task failed"),
    }

    state.controller.attach_image(&card.concept_key, &url);
    Ok(state.controller.view())
}

/// Drop every cached illustration.
pub async fn clear_assets(state: &AppState) -> Result<GameView, CommandError> {
    let cache = Arc::clone(&state.cache);
    let removed = tokio::task::spawn_blocking(move || cache.clear())
        .await
        .map_err(|e| CommandError::new(format!("Cache task failed: {}", e)))??;
    Ok(state
        .controller
        .notify(NoticeKind::Info, format!("Cleared {} cached images", removed)))
}
