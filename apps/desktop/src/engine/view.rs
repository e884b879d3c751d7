//! Presentation snapshot published to subscribers.

use polyglot_core::RoundView;
use serde::Serialize;

/// Grid width used outside fullscreen and for small decks.
pub const DEFAULT_COLUMNS: u32 = 4;
/// Grid width for large decks in fullscreen.
pub const WIDE_COLUMNS: u32 = 6;
/// Deck size from which fullscreen switches to the wide grid.
pub const WIDE_DECK_THRESHOLD: usize = 30;

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Short-lived message shown above the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
}

/// Everything a presentation layer needs to draw the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    /// `None` until the first deck has been dealt.
    pub round: Option<RoundView>,
    pub loading: bool,
    pub fullscreen: bool,
    pub columns: u32,
    pub notice: Option<Notice>,
}

impl GameView {
    pub fn empty() -> Self {
        Self {
            round: None,
            loading: false,
            fullscreen: false,
            columns: DEFAULT_COLUMNS,
            notice: None,
        }
    }
}

/// Number of grid columns for a deck of `card_count` cards.
pub fn grid_columns(card_count: usize, fullscreen: bool) -> u32 {
    if fullscreen && card_count >= WIDE_DECK_THRESHOLD {
        WIDE_COLUMNS
    } else {
        DEFAULT_COLUMNS
    }
}
