//! Session timer measured against the wall clock.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Elapsed-time tracker for a round.
///
/// Elapsed seconds are always derived from the start instant, never
/// accumulated per tick, so missed or late ticks cannot drift the clock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionTimer {
    started_at: Option<DateTime<Utc>>,
    running: bool,
    elapsed_seconds: u64,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the timer. Does nothing once a start instant is recorded.
    ///
    /// Returns true if this call started it.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        self.running = true;
        self.elapsed_seconds = 0;
        true
    }

    /// Recompute elapsed seconds while running; frozen otherwise.
    pub fn tick(&mut self, now: DateTime<Utc>) -> u64 {
        if let (true, Some(started_at)) = (self.running, self.started_at) {
            let millis = (now - started_at).num_milliseconds().max(0);
            self.elapsed_seconds = (millis / 1000) as u64;
        }
        self.elapsed_seconds
    }

    /// Freeze elapsed time at `now`.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        self.tick(now);
        self.running = false;
    }

    /// Clear the start instant and elapsed time.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }
}

/// Format seconds as `MM:SS`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
