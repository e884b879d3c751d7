//! Async driver for rounds: deals decks, schedules deferred resolutions,
//! runs the session clock and publishes snapshots.
//!
//! Every spawned task captures the round generation it was created for and
//! a weak handle to the controller; a task that wakes up for a round that
//! has since been replaced does nothing.

pub mod deck;
pub mod source;
pub mod view;

pub use deck::build_deck;
pub use source::{CatalogSource, FileCatalog};
pub use view::{grid_columns, GameView, Notice, NoticeKind};

use crate::cache::AssetCache;
use crate::config::ConfigError;
use chrono::{DateTime, Utc};
use polyglot_core::{
    Card, CardId, CatalogError, DifficultyLevel, FlipOutcome, GameMode, IgnoreReason,
    PendingResolution, Resolution, RoundState, Verdict,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Delays that drive the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// How long a matching pair stays face up before being marked matched.
    pub match_settle: Duration,
    /// How long a mismatched pair stays face up before flipping back.
    pub mismatch_revert: Duration,
    /// Clock refresh period.
    pub tick: Duration,
    /// Lifetime of a notice.
    pub notice_ttl: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            match_settle: Duration::from_millis(600),
            mismatch_revert: Duration::from_millis(1000),
            tick: Duration::from_millis(1000),
            notice_ttl: Duration::from_millis(4000),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Cannot deal deck: {0}")]
    Deck(#[from] CatalogError),

    #[error("Cannot read catalog: {0}")]
    Catalog(#[from] ConfigError),

    #[error("Catalog task failed: {0}")]
    Task(String),

    #[error("No round in progress")]
    NoRound,

    #[error("Card not found: {0}")]
    CardNotFound(CardId),
}

/// Wall clock anchored to the tokio clock, so paused test time drives it too.
struct Clock {
    origin_utc: DateTime<Utc>,
    origin: Instant,
}

impl Clock {
    fn new() -> Self {
        Self {
            origin_utc: Utc::now(),
            origin: Instant::now(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.origin.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.origin_utc + elapsed
    }
}

struct Session {
    round: Option<RoundState>,
    mode: GameMode,
    difficulty: DifficultyLevel,
    pending_builds: u32,
    latest_request: u64,
    next_generation: u64,
    fullscreen: bool,
    notice: Option<Notice>,
    next_notice_id: u64,
    resolver: Option<JoinHandle<()>>,
    ticker: Option<JoinHandle<()>>,
    notice_timer: Option<JoinHandle<()>>,
}

impl Session {
    fn view(&self) -> GameView {
        let card_count = self.round.as_ref().map_or(0, |r| r.deck().len());
        GameView {
            round: self.round.as_ref().map(RoundState::view),
            loading: self.pending_builds > 0,
            fullscreen: self.fullscreen,
            columns: grid_columns(card_count, self.fullscreen),
            notice: self.notice.clone(),
        }
    }

    fn abort_round_tasks(&mut self) {
        if let Some(handle) = self.resolver.take() {
            handle.abort();
        }
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

struct ControllerInner {
    catalog: Arc<dyn CatalogSource>,
    cache: Arc<dyn AssetCache>,
    timings: Timings,
    clock: Clock,
    session: Mutex<Session>,
    view_tx: watch::Sender<GameView>,
}

impl ControllerInner {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        let session = self.session.get_mut().unwrap_or_else(PoisonError::into_inner);
        session.abort_round_tasks();
        if let Some(handle) = session.notice_timer.take() {
            handle.abort();
        }
    }
}

/// Handle to the running game. Clones share the same session.
#[derive(Clone)]
pub struct GameController {
    inner: Arc<ControllerInner>,
}

impl GameController {
    /// Create a controller with no round dealt yet; call [`reset`](Self::reset) to deal.
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        cache: Arc<dyn AssetCache>,
        timings: Timings,
        mode: GameMode,
        difficulty: DifficultyLevel,
    ) -> Self {
        let (view_tx, _) = watch::channel(GameView::empty());
        let session = Session {
            round: None,
            mode,
            difficulty,
            pending_builds: 0,
            latest_request: 0,
            next_generation: 0,
            fullscreen: false,
            notice: None,
            next_notice_id: 0,
            resolver: None,
            ticker: None,
            notice_timer: None,
        };

        Self {
            inner: Arc::new(ControllerInner {
                catalog,
                cache,
                timings,
                clock: Clock::new(),
                session: Mutex::new(session),
                view_tx,
            }),
        }
    }

    fn from_weak(weak: &Weak<ControllerInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn mode(&self) -> GameMode {
        self.inner.session().mode
    }

    pub fn difficulty(&self) -> DifficultyLevel {
        self.inner.session().difficulty
    }

    /// Deal a fresh round, optionally switching mode or difficulty.
    ///
    /// The catalog is reloaded for every deal. The current round stays
    /// gated until the new deck is ready and is left untouched if dealing
    /// fails. If several resets overlap, the last one requested wins.
    pub async fn reset(
        &self,
        mode: Option<GameMode>,
        difficulty: Option<DifficultyLevel>,
    ) -> Result<GameView, GameError> {
        let (mode, difficulty, request) = {
            let mut session = self.inner.session();
            session.pending_builds += 1;
            session.latest_request += 1;
            (
                mode.unwrap_or(session.mode),
                difficulty.unwrap_or(session.difficulty),
                session.latest_request,
            )
        };
        self.publish();

        let built = self.deal(mode, difficulty).await;

        let mut session = self.inner.session();
        session.pending_builds = session.pending_builds.saturating_sub(1);
        let superseded = request != session.latest_request;

        let deck = match built {
            Ok(deck) => deck,
            Err(e) if superseded => {
                tracing::debug!(request, error = %e, "superseded deal failed");
                let view = session.view();
                drop(session);
                self.inner.view_tx.send_replace(view.clone());
                return Ok(view);
            }
            Err(e) => {
                drop(session);
                tracing::error!(error = %e, ?mode, ?difficulty, "failed to deal deck");
                self.notify(NoticeKind::Error, format!("Could not deal cards: {}", e));
                return Err(e);
            }
        };

        if superseded {
            tracing::debug!(request, "discarding superseded deck");
        } else {
            session.abort_round_tasks();
            session.next_generation += 1;
            let generation = session.next_generation;
            session.mode = mode;
            session.difficulty = difficulty;
            session.round = Some(RoundState::new(deck, mode, difficulty, generation));
            tracing::info!(generation, mode = mode.as_str(), difficulty = difficulty.as_str(), "new round");
        }

        let view = session.view();
        drop(session);
        self.inner.view_tx.send_replace(view.clone());
        Ok(view)
    }

    async fn deal(&self, mode: GameMode, difficulty: DifficultyLevel) -> Result<Vec<Card>, GameError> {
        let source = Arc::clone(&self.inner.catalog);
        let catalog = tokio::task::spawn_blocking(move || source.load())
            .await
            .map_err(|e| GameError::Task(e.to_string()))??;
        Ok(build_deck(&catalog, mode, difficulty, &self.inner.cache).await?)
    }

    pub async fn set_mode(&self, mode: GameMode) -> Result<GameView, GameError> {
        self.reset(Some(mode), None).await
    }

    pub async fn set_difficulty(&self, difficulty: DifficultyLevel) -> Result<GameView, GameError> {
        self.reset(None, Some(difficulty)).await
    }

    /// Flip a card. Requests that cannot be honored are ignored.
    pub fn flip(&self, id: CardId) -> FlipOutcome {
        let now = self.inner.clock.now();
        let mut session = self.inner.session();

        if session.pending_builds > 0 {
            tracing::debug!(card = %id, "flip ignored while dealing");
            return FlipOutcome::Ignored(IgnoreReason::Locked);
        }
        let Some(round) = session.round.as_mut() else {
            return FlipOutcome::Ignored(IgnoreReason::UnknownCard);
        };

        let generation = round.generation();
        let outcome = round.request_flip(id, now);
        match outcome {
            FlipOutcome::Ignored(reason) => {
                tracing::debug!(card = %id, ?reason, "flip ignored");
                return outcome;
            }
            FlipOutcome::Revealed { timer_started } => {
                if timer_started {
                    session.ticker = Some(self.spawn_ticker(generation));
                }
            }
            FlipOutcome::Evaluating(pending) => {
                let delay = match pending.verdict {
                    Verdict::Match => self.inner.timings.match_settle,
                    Verdict::Mismatch => self.inner.timings.mismatch_revert,
                };
                tracing::debug!(generation, verdict = ?pending.verdict, "pair evaluated");
                session.resolver = Some(self.spawn_resolver(pending, delay));
            }
        }

        let view = session.view();
        drop(session);
        self.inner.view_tx.send_replace(view);
        outcome
    }

    fn spawn_resolver(&self, pending: PendingResolution, delay: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(controller) = Self::from_weak(&weak) {
                controller.apply_resolution(pending);
            }
        })
    }

    fn spawn_ticker(&self, generation: u64) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        let period = self.inner.timings.tick;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(controller) = Self::from_weak(&weak) else {
                    break;
                };
                if !controller.tick(generation) {
                    break;
                }
            }
        })
    }

    fn apply_resolution(&self, pending: PendingResolution) {
        let now = self.inner.clock.now();
        let mut session = self.inner.session();
        let Some(round) = session.round.as_mut() else {
            return;
        };

        let resolution = round.resolve(pending, now);
        let moves = round.move_count();
        let elapsed = round.timer().elapsed_seconds();
        match resolution {
            Resolution::Stale => {
                tracing::debug!(generation = pending.generation, "stale resolution dropped");
                return;
            }
            Resolution::Matched { round_complete } => {
                session.resolver = None;
                if round_complete {
                    if let Some(handle) = session.ticker.take() {
                        handle.abort();
                    }
                }
            }
            Resolution::Reverted => {
                session.resolver = None;
            }
        }
        drop(session);

        match resolution {
            Resolution::Matched { round_complete: true } => {
                tracing::info!(moves, elapsed, "round complete");
                self.notify(NoticeKind::Success, "Mastered!");
            }
            Resolution::Matched { round_complete: false } => {
                self.notify(NoticeKind::Success, "Matched!");
            }
            _ => {
                self.publish();
            }
        }
    }

    /// Refresh the clock of round `generation`. Returns false once that
    /// round is gone or its timer has stopped.
    fn tick(&self, generation: u64) -> bool {
        let now = self.inner.clock.now();
        let mut session = self.inner.session();
        match session.round.as_mut() {
            Some(round) if round.generation() == generation && round.timer().is_running() => {
                round.tick_timer(now);
            }
            _ => return false,
        }
        let view = session.view();
        drop(session);
        self.inner.view_tx.send_replace(view);
        true
    }

    /// Decorate the current round's cards of `concept_key` with an image.
    pub fn attach_image(&self, concept_key: &str, url: &str) -> usize {
        let updated = {
            let mut session = self.inner.session();
            session
                .round
                .as_mut()
                .map_or(0, |round| round.attach_image(concept_key, url))
        };
        if updated > 0 {
            self.publish();
        }
        updated
    }

    /// Look up a card of the current round.
    pub fn card(&self, id: CardId) -> Result<Card, GameError> {
        let session = self.inner.session();
        let round = session.round.as_ref().ok_or(GameError::NoRound)?;
        round.card(id).cloned().ok_or(GameError::CardNotFound(id))
    }

    pub fn view(&self) -> GameView {
        self.inner.session().view()
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<GameView> {
        self.inner.view_tx.subscribe()
    }

    /// Enter or leave the fullscreen layout.
    pub fn set_fullscreen(&self, fullscreen: bool) -> GameView {
        self.inner.session().fullscreen = fullscreen;
        self.publish()
    }

    pub fn toggle_fullscreen(&self) -> GameView {
        let fullscreen = !self.inner.session().fullscreen;
        self.set_fullscreen(fullscreen)
    }

    pub fn dismiss_notice(&self) -> GameView {
        {
            let mut session = self.inner.session();
            session.notice = None;
            if let Some(handle) = session.notice_timer.take() {
                handle.abort();
            }
        }
        self.publish()
    }

    /// Show a notice, replacing any current one. It clears itself after the
    /// configured lifetime unless replaced first.
    pub fn notify(&self, kind: NoticeKind, text: impl Into<String>) -> GameView {
        let weak = Arc::downgrade(&self.inner);
        let ttl = self.inner.timings.notice_ttl;
        {
            let mut session = self.inner.session();
            session.next_notice_id += 1;
            let id = session.next_notice_id;
            session.notice = Some(Notice {
                id,
                kind,
                text: text.into(),
            });
            if let Some(handle) = session.notice_timer.take() {
                handle.abort();
            }
            session.notice_timer = Some(tokio::spawn(async move {
                tokio::time::sleep(ttl).await;
                if let Some(controller) = Self::from_weak(&weak) {
                    controller.expire_notice(id);
                }
            }));
        }
        self.publish()
    }

    fn expire_notice(&self, id: u64) {
        {
            let mut session = self.inner.session();
            if session.notice.as_ref().map(|n| n.id) != Some(id) {
                return;
            }
            session.notice = None;
            session.notice_timer = None;
        }
        self.publish();
    }

    fn publish(&self) -> GameView {
        let view = self.view();
        self.inner.view_tx.send_replace(view.clone());
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryAssetCache;
    use polyglot_core::Catalog;

    fn controller() -> GameController {
        GameController::new(
            Arc::new(Catalog::builtin()),
            Arc::new(MemoryAssetCache::new()),
            Timings::default(),
            GameMode::Same,
            DifficultyLevel::Easy,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_follows_paused_time() {
        let clock = Clock::new();
        let start = clock.now();
        tokio::time::advance(Duration::from_millis(2500)).await;
        assert_eq!((clock.now() - start).num_milliseconds(), 2500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flip_before_deal_is_ignored() {
        let game = controller();
        assert_eq!(
            game.flip(CardId::new()),
            FlipOutcome::Ignored(IgnoreReason::UnknownCard)
        );
        assert!(matches!(game.card(CardId::new()), Err(GameError::NoRound)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_expires_unless_replaced() {
        let game = controller();
        game.notify(NoticeKind::Info, "first");
        tokio::time::sleep(Duration::from_millis(3000)).await;
        game.notify(NoticeKind::Info, "second");

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(game.view().notice.map(|n| n.text).as_deref(), Some("second"));

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert!(game.view().notice.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_clears_notice() {
        let game = controller();
        game.notify(NoticeKind::Error, "boom");
        assert!(game.dismiss_notice().notice.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fullscreen_toggles() {
        let game = controller();
        game.reset(None, None).await.unwrap();
        let view = game.toggle_fullscreen();
        assert!(view.fullscreen);
        assert_eq!(view.columns, 4);
        assert!(!game.toggle_fullscreen().fullscreen);
    }
}
