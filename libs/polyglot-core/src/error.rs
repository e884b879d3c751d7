//! Error types for polyglot-core.

use thiserror::Error;

/// Result type alias using CatalogError.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised while validating a catalog or drawing a deck from it.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("empty concept key at position {index}")]
    EmptyKey { index: usize },

    #[error("duplicate concept key {key} at position {index}")]
    DuplicateKey { key: String, index: usize },

    #[error("catalog has {available} concepts, at least {needed} required")]
    TooSmall { needed: usize, available: usize },
}

/// Errors raised when parsing a mode or difficulty from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown game mode: {0}")]
    UnknownMode(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}
