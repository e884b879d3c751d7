//! Pairing rule for two flipped cards.

use crate::difficulty::Ruleset;
use crate::types::Card;

/// Whether two distinct cards form a pair under the round's ruleset.
///
/// Cards pair when they share a concept and their languages differ (translation
/// rounds) or agree (same-language rounds).
pub fn is_match(ruleset: Ruleset, a: &Card, b: &Card) -> bool {
    if a.id == b.id || a.concept_key != b.concept_key {
        return false;
    }
    if ruleset.translation_required {
        a.language != b.language
    } else {
        a.language == b.language
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Concept, Language};

    const SAME: Ruleset = Ruleset {
        translation_required: false,
    };
    const TRANSLATE: Ruleset = Ruleset {
        translation_required: true,
    };

    fn card(key: &str, language: Language) -> Card {
        Card::for_concept(&Concept::new(key, key, key, "?"), language)
    }

    #[test]
    fn test_same_language_rules() {
        let a = card("start", Language::En);
        let b = card("start", Language::En);
        let c = card("start", Language::Pt);
        assert!(is_match(SAME, &a, &b));
        assert!(!is_match(SAME, &a, &c));
    }

    #[test]
    fn test_translation_rules() {
        let a = card("cross", Language::En);
        let b = card("cross", Language::Pt);
        let c = card("cross", Language::En);
        assert!(is_match(TRANSLATE, &a, &b));
        assert!(!is_match(TRANSLATE, &a, &c));
    }

    #[test]
    fn test_different_concepts_never_match() {
        let a = card("start", Language::En);
        let b = card("go", Language::En);
        let c = card("go", Language::Pt);
        assert!(!is_match(SAME, &a, &b));
        assert!(!is_match(TRANSLATE, &a, &c));
    }

    #[test]
    fn test_rule_is_symmetric() {
        let cards = [
            card("left", Language::En),
            card("left", Language::Pt),
            card("left", Language::En),
            card("right", Language::Pt),
        ];
        for ruleset in [SAME, TRANSLATE] {
            for a in &cards {
                for b in &cards {
                    assert_eq!(is_match(ruleset, a, b), is_match(ruleset, b, a));
                }
            }
        }
    }

    #[test]
    fn test_card_does_not_match_itself() {
        let a = card("turn", Language::En);
        assert!(!is_match(SAME, &a, &a));
    }
}
