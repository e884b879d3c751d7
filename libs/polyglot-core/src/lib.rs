//! Core game rules shared by the desktop application.
//!
//! Provides:
//! - The vocabulary catalog of directional concepts
//! - Difficulty profiles and the pairing ruleset
//! - Deck construction (selection, pairing, shuffling)
//! - The round state machine and its session timer

pub mod catalog;
pub mod deck;
pub mod difficulty;
pub mod error;
pub mod matching;
pub mod round;
pub mod timer;
pub mod types;

pub use catalog::{Catalog, ADVANCED_RANGE};
pub use deck::{asset_key, attach_image, build_pairs, select_concepts, shuffle_deck};
pub use difficulty::{DifficultyProfile, Ruleset};
pub use error::{CatalogError, ParseError, Result};
pub use matching::is_match;
pub use round::{
    FlipOutcome, IgnoreReason, PendingResolution, Resolution, RoundPhase, RoundState, Verdict,
};
pub use timer::{format_clock, SessionTimer};
pub use types::{
    Card, CardId, CardView, Concept, DifficultyLevel, GameMode, Language, RoundView,
};
