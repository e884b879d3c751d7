//! Difficulty policy and the matching ruleset it implies.

use crate::types::{DifficultyLevel, GameMode};
use serde::Serialize;

/// Fixed settings for a difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DifficultyProfile {
    pub pair_count: u32,
    /// Advisory only; no round behavior reads it.
    pub reveal_duration_ms: u32,
    pub label: &'static str,
}

impl DifficultyLevel {
    /// Look up the profile for this level.
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile {
                pair_count: 4,
                reveal_duration_ms: 5000,
                label: "Easy",
            },
            Self::Medium => DifficultyProfile {
                pair_count: 8,
                reveal_duration_ms: 3000,
                label: "Medium",
            },
            Self::Hard => DifficultyProfile {
                pair_count: 8,
                reveal_duration_ms: 1500,
                label: "Hard",
            },
        }
    }

    /// Number of cards dealt at this level.
    pub fn card_count(self) -> usize {
        self.profile().pair_count as usize * 2
    }
}

/// Language relationship a pair must satisfy in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ruleset {
    pub translation_required: bool,
}

impl Ruleset {
    /// Hard rounds always require translation, whatever the mode.
    pub fn for_round(mode: GameMode, level: DifficultyLevel) -> Self {
        Self {
            translation_required: level == DifficultyLevel::Hard || mode == GameMode::Translate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pair_counts() {
        assert_eq!(DifficultyLevel::Easy.profile().pair_count, 4);
        assert_eq!(DifficultyLevel::Medium.profile().pair_count, 8);
        assert_eq!(DifficultyLevel::Hard.profile().pair_count, 8);
        assert_eq!(DifficultyLevel::Easy.card_count(), 8);
        assert_eq!(DifficultyLevel::Hard.card_count(), 16);
    }

    #[test]
    fn test_labels_and_reveal_durations() {
        let labels: Vec<_> = DifficultyLevel::ALL
            .iter()
            .map(|level| (level.profile().label, level.profile().reveal_duration_ms))
            .collect();
        assert_eq!(labels, vec![("Easy", 5000), ("Medium", 3000), ("Hard", 1500)]);
    }

    #[test]
    fn test_ruleset_selection() {
        assert!(!Ruleset::for_round(GameMode::Same, DifficultyLevel::Easy).translation_required);
        assert!(!Ruleset::for_round(GameMode::Same, DifficultyLevel::Medium).translation_required);
        assert!(Ruleset::for_round(GameMode::Translate, DifficultyLevel::Easy).translation_required);
        assert!(Ruleset::for_round(GameMode::Same, DifficultyLevel::Hard).translation_required);
        assert!(Ruleset::for_round(GameMode::Translate, DifficultyLevel::Hard).translation_required);
    }
}
