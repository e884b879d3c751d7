//! Deck construction: concept selection, pairing, image decoration and shuffling.

use crate::catalog::{Catalog, ADVANCED_RANGE, MIN_CONCEPTS};
use crate::difficulty::Ruleset;
use crate::error::{CatalogError, Result};
use crate::types::{Card, Concept, DifficultyLevel, GameMode, Language};
use rand::seq::SliceRandom;
use rand::Rng;

/// Cache key under which a concept's generated illustration is stored.
pub fn asset_key(concept_key: &str) -> String {
    format!("img_{}", concept_key)
}

/// Concepts dealt at `level`.
///
/// Hard always draws the advanced half; Easy and Medium take the first
/// `pair_count` concepts in catalog order.
pub fn select_concepts(catalog: &Catalog, level: DifficultyLevel) -> Result<&[Concept]> {
    let concepts = catalog.concepts();
    if concepts.len() < MIN_CONCEPTS {
        return Err(CatalogError::TooSmall {
            needed: MIN_CONCEPTS,
            available: concepts.len(),
        });
    }

    let range = match level {
        DifficultyLevel::Hard => ADVANCED_RANGE,
        _ => 0..level.profile().pair_count as usize,
    };
    Ok(&concepts[range])
}

/// Unshuffled deck: two cards per selected concept.
pub fn build_pairs(catalog: &Catalog, mode: GameMode, level: DifficultyLevel) -> Result<Vec<Card>> {
    let ruleset = Ruleset::for_round(mode, level);
    let partner_language = if ruleset.translation_required {
        Language::SECONDARY
    } else {
        Language::PRIMARY
    };

    let concepts = select_concepts(catalog, level)?;
    let mut cards = Vec::with_capacity(concepts.len() * 2);
    for concept in concepts {
        cards.push(Card::for_concept(concept, Language::PRIMARY));
        cards.push(Card::for_concept(concept, partner_language));
    }
    Ok(cards)
}

/// Attach `url` to every card of `concept_key` that has no image yet.
///
/// Returns the number of cards updated.
pub fn attach_image(cards: &mut [Card], concept_key: &str, url: &str) -> usize {
    let mut updated = 0;
    for card in cards
        .iter_mut()
        .filter(|c| c.concept_key == concept_key && c.image_url.is_none())
    {
        card.image_url = Some(url.to_string());
        updated += 1;
    }
    updated
}

/// Uniform random permutation of the deck.
pub fn shuffle_deck<R: Rng + ?Sized>(cards: &mut [Card], rng: &mut R) {
    cards.shuffle(rng);
}
