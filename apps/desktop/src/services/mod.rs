//! External collaborators: speech playback and image generation.

pub mod image;
pub mod speech;

use std::future::Future;
use std::pin::Pin;

pub use image::{DisabledImageGenerator, HttpImageGenerator, ImageGenerator};
pub use speech::{CommandSpeech, LogSpeech, SpeechPlayer};

/// Boxed future returned by collaborator traits so they stay object safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Failures reported by external services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Process error: {0}")]
    Process(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}
