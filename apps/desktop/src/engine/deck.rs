//! Dealing a deck decorated with cached illustrations.

use crate::cache::AssetCache;
use polyglot_core::{asset_key, build_pairs, shuffle_deck, Card, Catalog, DifficultyLevel, GameMode, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Build a shuffled deck for `mode` and `level`.
///
/// Cache lookups run concurrently on the blocking pool. A failed lookup is
/// logged and the card is dealt without an image.
pub async fn build_deck(
    catalog: &Catalog,
    mode: GameMode,
    level: DifficultyLevel,
    cache: &Arc<dyn AssetCache>,
) -> Result<Vec<Card>> {
    let mut cards = build_pairs(catalog, mode, level)?;

    let mut keys: Vec<String> = cards.iter().map(|c| c.concept_key.clone()).collect();
    keys.dedup();

    let mut lookups = JoinSet::new();
    for key in keys {
        let cache = Arc::clone(cache);
        lookups.spawn_blocking(move || {
            let result = cache.get(&asset_key(&key));
            (key, result)
        });
    }

    let mut images: HashMap<String, String> = HashMap::new();
    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok((key, Ok(Some(url)))) => {
                images.insert(key, url);
            }
            Ok((_, Ok(None))) => {}
            Ok((key, Err(e))) => {
                tracing::warn!(concept = %key, error = %e, "asset lookup failed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "asset lookup task failed");
            }
        }
    }

    for card in &mut cards {
        if let Some(url) = images.get(&card.concept_key) {
            card.image_url = Some(url.clone());
        }
    }
    tracing::debug!(cards = cards.len(), cached = images.len(), "deck dealt");

    shuffle_deck(&mut cards, &mut rand::rng());
    Ok(cards)
}
