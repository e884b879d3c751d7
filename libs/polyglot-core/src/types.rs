//! Core types for the direction memory game.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Language a card is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "EN")]
    En,
    #[serde(rename = "PT")]
    Pt,
}

impl Language {
    /// Language every pair's first card is written in.
    pub const PRIMARY: Language = Language::En;
    /// Language used for the translated card of a pair.
    pub const SECONDARY: Language = Language::Pt;

    /// Short tag shown on the card face.
    pub fn tag(self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::Pt => "PT",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// How the second card of each pair is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Both cards in the primary language.
    #[default]
    Same,
    /// One card per language.
    Translate,
}

impl GameMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Same => "same",
            Self::Translate => "translate",
        }
    }
}

impl FromStr for GameMode {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "same" => Ok(Self::Same),
            "translate" => Ok(Self::Translate),
            _ => Err(ParseError::UnknownMode(value.to_string())),
        }
    }
}

/// Difficulty level of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for DifficultyLevel {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseError::UnknownDifficulty(value.to_string())),
        }
    }
}

/// A directional vocabulary item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub key: String,
    /// English rendering.
    pub primary: String,
    /// Portuguese rendering.
    pub secondary: String,
    pub glyph: String,
}

impl Concept {
    pub fn new(key: &str, primary: &str, secondary: &str, glyph: &str) -> Self {
        Self {
            key: key.to_string(),
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            glyph: glyph.to_string(),
        }
    }

    /// Text of this concept in the given language.
    pub fn text(&self, language: Language) -> &str {
        match language {
            Language::En => &self.primary,
            Language::Pt => &self.secondary,
        }
    }
}

/// Opaque card identifier, unique within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(Uuid);

impl CardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A card in a round's deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub concept_key: String,
    pub glyph: String,
    pub text: String,
    pub language: Language,
    pub is_matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Card {
    /// Card for `concept` written in `language`.
    pub fn for_concept(concept: &Concept, language: Language) -> Self {
        Self {
            id: CardId::new(),
            concept_key: concept.key.clone(),
            glyph: concept.glyph.clone(),
            text: concept.text(language).to_string(),
            language,
            is_matched: false,
            image_url: None,
        }
    }
}

/// Card as presented to the player, with its transient flip state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: CardId,
    pub concept_key: String,
    pub glyph: String,
    pub text: String,
    pub language: Language,
    pub is_flipped: bool,
    pub is_matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Snapshot of a round for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundView {
    pub generation: u64,
    pub mode: GameMode,
    pub difficulty: DifficultyLevel,
    pub label: String,
    pub cards: Vec<CardView>,
    pub move_count: u32,
    pub match_count: u32,
    pub pair_count: u32,
    pub elapsed_seconds: u64,
    pub clock: String,
    pub timer_running: bool,
    pub locked: bool,
    pub complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_is_case_insensitive() {
        assert_eq!("Translate".parse::<GameMode>(), Ok(GameMode::Translate));
        assert_eq!(" same ".parse::<GameMode>(), Ok(GameMode::Same));
        assert_eq!(
            "mirror".parse::<GameMode>(),
            Err(ParseError::UnknownMode("mirror".to_string()))
        );
    }

    #[test]
    fn test_parse_difficulty() {
        for level in DifficultyLevel::ALL {
            assert_eq!(level.as_str().parse::<DifficultyLevel>(), Ok(level));
        }
        assert!("expert".parse::<DifficultyLevel>().is_err());
    }

    #[test]
    fn test_concept_text_per_language() {
        let concept = Concept::new("left", "Left", "Esquerda", "⬅️");
        assert_eq!(concept.text(Language::En), "Left");
        assert_eq!(concept.text(Language::Pt), "Esquerda");
    }

    #[test]
    fn test_card_for_concept_uses_language_text() {
        let card = Card::for_concept(&Concept::new("go", "Go", "Inicie", "🚶"), Language::Pt);
        assert_eq!(card.language.tag(), "PT");
        assert_eq!(card.text, "Inicie");
        assert!(!card.is_matched);
        assert!(card.image_url.is_none());
    }
}
