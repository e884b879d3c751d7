//! Fake collaborators.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex};
use std::time::Duration;

use polyglot_core::{Catalog, Language};
use polyglot_directions_lib::config::ConfigError;
use polyglot_directions_lib::engine::CatalogSource;
use polyglot_directions_lib::services::{BoxFuture, ImageGenerator, ServiceError, SpeechPlayer};

pub const FAKE_IMAGE: &str = "data:image/png;base64,ZmFrZQ==";

/// Records every utterance.
#[derive(Default)]
pub struct RecordingSpeech {
    pub spoken: Mutex<Vec<(String, Language)>>,
}

impl SpeechPlayer for RecordingSpeech {
    fn speak<'a>(&'a self, text: &'a str, language: Language) -> BoxFuture<'a, Result<(), ServiceError>> {
        Box::pin(async move {
            self.spoken.lock().unwrap().push((text.to_string(), language));
            Ok(())
        })
    }
}

pub struct FailingSpeech;

impl SpeechPlayer for FailingSpeech {
    fn speak<'a>(&'a self, _text: &'a str, _language: Language) -> BoxFuture<'a, Result<(), ServiceError>> {
        Box::pin(async { Err(ServiceError::Process("no audio device".to_string())) })
    }
}

/// Returns a fixed image after an optional delay, or fails on demand.
#[derive(Default)]
pub struct FakeImageGenerator {
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    pub delay: Mutex<Option<Duration>>,
    pub fail: Mutex<bool>,
}

impl FakeImageGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn set_failing(&self) {
        *self.fail.lock().unwrap() = true;
    }
}

impl ImageGenerator for FakeImageGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ServiceError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            let delay = *self.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if *self.fail.lock().unwrap() {
                return Err(ServiceError::Backend {
                    status: 503,
                    message: "overloaded".to_string(),
                });
            }
            Ok(FAKE_IMAGE.to_string())
        })
    }
}

/// Catalog source that can be made to fail, or to block one load until released.
pub struct ScriptedCatalog {
    catalog: Catalog,
    failing: AtomicBool,
    held: Mutex<Option<(mpsc::Receiver<()>, bool)>>,
    entered_held: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            failing: AtomicBool::new(false),
            held: Mutex::new(None),
            entered_held: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Block the next load until the returned sender fires; it then fails
    /// if `fail` is set.
    pub fn hold_next(&self, fail: bool) -> mpsc::Sender<()> {
        let (tx, rx) = mpsc::channel();
        *self.held.lock().unwrap() = Some((rx, fail));
        tx
    }

    /// Number of held loads that have started.
    pub fn entered_held(&self) -> usize {
        self.entered_held.load(Ordering::SeqCst)
    }

    fn missing() -> ConfigError {
        ConfigError::CatalogIo {
            path: PathBuf::from("catalog.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "catalog removed"),
        }
    }
}

impl CatalogSource for ScriptedCatalog {
    fn load(&self) -> Result<Catalog, ConfigError> {
        let held = self.held.lock().unwrap().take();
        if let Some((release, fail)) = held {
            self.entered_held.fetch_add(1, Ordering::SeqCst);
            release.recv().ok();
            if fail {
                return Err(Self::missing());
            }
        } else if self.failing.load(Ordering::SeqCst) {
            return Err(Self::missing());
        }
        Ok(self.catalog.clone())
    }
}
