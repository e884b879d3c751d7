//! Round state machine: flip requests, pair evaluation and completion.
//!
//! A round moves through `Idle -> OneFlipped -> Evaluating` and back to `Idle`
//! once the pending pair is resolved, until every pair is matched. Evaluation
//! happens at the second flip; applying the verdict is deferred to
//! [`RoundState::resolve`] so the caller can hold the pair on screen first.

use crate::deck;
use crate::difficulty::{DifficultyProfile, Ruleset};
use crate::matching::is_match;
use crate::timer::{format_clock, SessionTimer};
use crate::types::{Card, CardId, CardView, DifficultyLevel, GameMode, RoundView};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where a round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Idle,
    OneFlipped,
    Evaluating,
    Complete,
}

/// Why a flip request was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Locked,
    TwoFlipped,
    UnknownCard,
    AlreadyFlipped,
    AlreadyMatched,
}

/// Outcome of comparing two flipped cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Match,
    Mismatch,
}

/// A flipped pair waiting for its verdict to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResolution {
    pub generation: u64,
    pub cards: [CardId; 2],
    pub verdict: Verdict,
}

/// Result of a flip request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// First card of a pair is face up.
    Revealed { timer_started: bool },
    /// Second card is face up; the round is locked until resolved.
    Evaluating(PendingResolution),
}

/// Result of applying a pending verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Matched { round_complete: bool },
    Reverted,
    /// The pending pair belongs to another round or was already applied.
    Stale,
}

/// Live state of one round.
#[derive(Debug, Clone)]
pub struct RoundState {
    generation: u64,
    mode: GameMode,
    difficulty: DifficultyLevel,
    profile: DifficultyProfile,
    ruleset: Ruleset,
    deck: Vec<Card>,
    flipped: Vec<CardId>,
    locked: bool,
    move_count: u32,
    match_count: u32,
    timer: SessionTimer,
}

impl RoundState {
    /// Start a round over an already shuffled deck.
    pub fn new(deck: Vec<Card>, mode: GameMode, difficulty: DifficultyLevel, generation: u64) -> Self {
        Self {
            generation,
            mode,
            difficulty,
            profile: difficulty.profile(),
            ruleset: Ruleset::for_round(mode, difficulty),
            deck,
            flipped: Vec::with_capacity(2),
            locked: false,
            move_count: 0,
            match_count: 0,
            timer: SessionTimer::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    pub fn profile(&self) -> DifficultyProfile {
        self.profile
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.deck.iter().find(|c| c.id == id)
    }

    pub fn flipped(&self) -> &[CardId] {
        &self.flipped
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn match_count(&self) -> u32 {
        self.match_count
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn is_complete(&self) -> bool {
        self.match_count == self.profile.pair_count
    }

    pub fn phase(&self) -> RoundPhase {
        if self.is_complete() {
            RoundPhase::Complete
        } else if self.locked {
            RoundPhase::Evaluating
        } else if self.flipped.len() == 1 {
            RoundPhase::OneFlipped
        } else {
            RoundPhase::Idle
        }
    }

    /// Flip a card face up.
    ///
    /// Requests that would break the round's invariants are dropped without
    /// touching any state.
    pub fn request_flip(&mut self, id: CardId, now: DateTime<Utc>) -> FlipOutcome {
        if self.locked {
            return FlipOutcome::Ignored(IgnoreReason::Locked);
        }
        if self.flipped.len() >= 2 {
            return FlipOutcome::Ignored(IgnoreReason::TwoFlipped);
        }
        let Some(card) = self.card(id) else {
            return FlipOutcome::Ignored(IgnoreReason::UnknownCard);
        };
        if card.is_matched {
            return FlipOutcome::Ignored(IgnoreReason::AlreadyMatched);
        }
        if self.flipped.contains(&id) {
            return FlipOutcome::Ignored(IgnoreReason::AlreadyFlipped);
        }

        let timer_started = self.timer.start(now);
        self.flipped.push(id);

        if self.flipped.len() < 2 {
            return FlipOutcome::Revealed { timer_started };
        }

        self.move_count += 1;
        self.locked = true;

        let cards = [self.flipped[0], self.flipped[1]];
        let verdict = match (self.card(cards[0]), self.card(cards[1])) {
            (Some(a), Some(b)) if is_match(self.ruleset, a, b) => Verdict::Match,
            _ => Verdict::Mismatch,
        };

        FlipOutcome::Evaluating(PendingResolution {
            generation: self.generation,
            cards,
            verdict,
        })
    }

    /// Apply the verdict of the pending pair.
    pub fn resolve(&mut self, pending: PendingResolution, now: DateTime<Utc>) -> Resolution {
        if pending.generation != self.generation || self.flipped[..] != pending.cards[..] {
            return Resolution::Stale;
        }

        self.flipped.clear();
        self.locked = false;

        match pending.verdict {
            Verdict::Match => {
                for card in self.deck.iter_mut().filter(|c| pending.cards.contains(&c.id)) {
                    card.is_matched = true;
                }
                self.match_count += 1;
                let round_complete = self.is_complete();
                if round_complete {
                    self.timer.stop(now);
                }
                Resolution::Matched { round_complete }
            }
            Verdict::Mismatch => Resolution::Reverted,
        }
    }

    /// Refresh the elapsed time.
    pub fn tick_timer(&mut self, now: DateTime<Utc>) -> u64 {
        self.timer.tick(now)
    }

    /// Decorate the cards of `concept_key` with an illustration.
    pub fn attach_image(&mut self, concept_key: &str, url: &str) -> usize {
        deck::attach_image(&mut self.deck, concept_key, url)
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> RoundView {
        let cards = self
            .deck
            .iter()
            .map(|card| CardView {
                id: card.id,
                concept_key: card.concept_key.clone(),
                glyph: card.glyph.clone(),
                text: card.text.clone(),
                language: card.language,
                is_flipped: self.flipped.contains(&card.id),
                is_matched: card.is_matched,
                image_url: card.image_url.clone(),
            })
            .collect();

        RoundView {
            generation: self.generation,
            mode: self.mode,
            difficulty: self.difficulty,
            label: self.profile.label.to_string(),
            cards,
            move_count: self.move_count,
            match_count: self.match_count,
            pair_count: self.profile.pair_count,
            elapsed_seconds: self.timer.elapsed_seconds(),
            clock: format_clock(self.timer.elapsed_seconds()),
            timer_running: self.timer.is_running(),
            locked: self.locked,
            complete: self.is_complete(),
        }
    }
}
