//! Commands exposed to the presentation layer.

pub mod assets;
pub mod game;

pub use assets::{clear_assets, generate_card_image, speak_card};
pub use game::{
    dismiss_notice, exit_fullscreen, flip_card, get_game, request_fullscreen, reset_game,
    set_difficulty, set_mode, toggle_fullscreen,
};

/// Error returned to the presentation layer.
#[derive(Debug, serde::Serialize)]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<crate::engine::GameError> for CommandError {
    fn from(e: crate::engine::GameError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<crate::db::DbError> for CommandError {
    fn from(e: crate::db::DbError) -> Self {
        Self {
            message: format!("Database error: {}", e),
        }
    }
}

impl From<crate::services::ServiceError> for CommandError {
    fn from(e: crate::services::ServiceError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<polyglot_core::ParseError> for CommandError {
    fn from(e: polyglot_core::ParseError) -> Self {
        Self { message: e.to_string() }
    }
}
