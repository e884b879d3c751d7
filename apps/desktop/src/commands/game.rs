//! Round commands.

use super::CommandError;
use crate::engine::GameView;
use crate::state::AppState;
use polyglot_core::{CardId, DifficultyLevel, FlipOutcome, GameMode};

/// Current snapshot.
pub async fn get_game(state: &AppState) -> Result<GameView, CommandError> {
    Ok(state.controller.view())
}

/// Flip a card; ignored flips return the unchanged snapshot.
pub async fn flip_card(card_id: CardId, state: &AppState) -> Result<GameView, CommandError> {
    if let FlipOutcome::Ignored(reason) = state.controller.flip(card_id) {
        tracing::trace!(card = %card_id, ?reason, "flip_card ignored");
    }
    Ok(state.controller.view())
}

pub async fn set_mode(mode: &str, state: &AppState) -> Result<GameView, CommandError> {
    let mode: GameMode = mode.parse()?;
    Ok(state.controller.set_mode(mode).await?)
}

pub async fn set_difficulty(difficulty: &str, state: &AppState) -> Result<GameView, CommandError> {
    let difficulty: DifficultyLevel = difficulty.parse()?;
    Ok(state.controller.set_difficulty(difficulty).await?)
}

/// Deal a new round with the current mode and difficulty.
pub async fn reset_game(state: &AppState) -> Result<GameView, CommandError> {
    Ok(state.controller.reset(None, None).await?)
}

pub async fn request_fullscreen(state: &AppState) -> Result<GameView, CommandError> {
    Ok(state.controller.set_fullscreen(true))
}

pub async fn exit_fullscreen(state: &AppState) -> Result<GameView, CommandError> {
    Ok(state.controller.set_fullscreen(false))
}

pub async fn toggle_fullscreen(state: &AppState) -> Result<GameView, CommandError> {
    Ok(state.controller.toggle_fullscreen())
}

pub async fn dismiss_notice(state: &AppState) -> Result<GameView, CommandError> {
    Ok(state.controller.dismiss_notice())
}
