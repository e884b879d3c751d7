//! Text-to-speech playback.

use super::{BoxFuture, ServiceError};
use polyglot_core::Language;
use tokio::process::Command;

/// Speaks card text aloud.
pub trait SpeechPlayer: Send + Sync {
    fn speak<'a>(&'a self, text: &'a str, language: Language) -> BoxFuture<'a, Result<(), ServiceError>>;
}

/// Player that only records what would have been spoken.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSpeech;

impl SpeechPlayer for LogSpeech {
    fn speak<'a>(&'a self, text: &'a str, language: Language) -> BoxFuture<'a, Result<(), ServiceError>> {
        Box::pin(async move {
            tracing::info!(%language, text, "speak");
            Ok(())
        })
    }
}

/// Player backed by an external TTS program.
///
/// The configured command line may contain a `{voice}` placeholder; the text
/// to speak is appended as the last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
}

impl CommandSpeech {
    /// Parse a command line such as `espeak-ng -v {voice}`.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Voice name for a language.
    pub fn voice(language: Language) -> &'static str {
        match language {
            Language::En => "en",
            Language::Pt => "pt-br",
        }
    }

    fn arguments(&self, text: &str, language: Language) -> Vec<String> {
        let voice = Self::voice(language);
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace("{voice}", voice))
            .collect();
        args.push(text.to_string());
        args
    }
}

impl SpeechPlayer for CommandSpeech {
    fn speak<'a>(&'a self, text: &'a str, language: Language) -> BoxFuture<'a, Result<(), ServiceError>> {
        Box::pin(async move {
            let status = Command::new(&self.program)
                .args(self.arguments(text, language))
                .status()
                .await
                .map_err(|e| ServiceError::Process(format!("{}: {}", self.program, e)))?;

            if !status.success() {
                return Err(ServiceError::Process(format!(
                    "{} exited with {}",
                    self.program, status
                )));
            }
            Ok(())
        })
    }
}
