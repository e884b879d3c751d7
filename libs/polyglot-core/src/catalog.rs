//! Vocabulary catalog of directional concepts.
//!
//! The catalog is ordered and split in two halves: the first eight concepts
//! feed Easy and Medium rounds, the last eight feed Hard rounds only.

use crate::error::{CatalogError, Result};
use crate::types::Concept;
use std::collections::HashSet;
use std::ops::Range;

/// Positions of the advanced concepts drawn by Hard rounds.
pub const ADVANCED_RANGE: Range<usize> = 8..16;

/// Minimum number of concepts a catalog must hold.
pub const MIN_CONCEPTS: usize = ADVANCED_RANGE.end;

const BUILTIN: [(&str, &str, &str, &str); 16] = [
    // Foundations
    ("start", "Start", "Comece", "🏁"),
    ("go", "Go", "Inicie", "🚶"),
    ("left", "Left", "Esquerda", "⬅️"),
    ("right", "Right", "Direita", "➡️"),
    // Basic relations
    ("turn", "Turn", "Vire", "↪️"),
    ("next_to", "Next to", "Do lado", "🏘️"),
    ("there_is", "There is", "Existe", "👤"),
    ("there_are", "There are", "Existem", "👥"),
    // Advanced
    ("under", "Under", "Debaixo", "⬇️"),
    ("between", "Between", "No meio", "↕️"),
    ("through", "Through", "Através", "🚇"),
    ("opposite", "Opposite", "Contrário", "🔃"),
    ("go_past", "Go past", "Passe por", "⏭️"),
    ("cross", "Cross", "Atravesse", "🦓"),
    ("walk_along", "Walk along", "Ande pela", "🛣️"),
    ("go_straight", "Go straight", "Siga reto", "⬆️"),
];

/// Validated, ordered list of concepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    concepts: Vec<Concept>,
}

impl Catalog {
    /// The sixteen built-in direction concepts.
    pub fn builtin() -> Self {
        Self {
            concepts: BUILTIN
                .iter()
                .map(|(key, primary, secondary, glyph)| Concept::new(key, primary, secondary, glyph))
                .collect(),
        }
    }

    /// Validate a custom list of concepts.
    pub fn from_concepts(concepts: Vec<Concept>) -> Result<Self> {
        if concepts.len() < MIN_CONCEPTS {
            return Err(CatalogError::TooSmall {
                needed: MIN_CONCEPTS,
                available: concepts.len(),
            });
        }

        let mut seen = HashSet::with_capacity(concepts.len());
        for (index, concept) in concepts.iter().enumerate() {
            if concept.key.trim().is_empty() {
                return Err(CatalogError::EmptyKey { index });
            }
            if !seen.insert(concept.key.as_str()) {
                return Err(CatalogError::DuplicateKey {
                    key: concept.key.clone(),
                    index,
                });
            }
        }

        Ok(Self { concepts })
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// The advanced half of the catalog.
    pub fn advanced(&self) -> &[Concept] {
        &self.concepts[ADVANCED_RANGE]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
