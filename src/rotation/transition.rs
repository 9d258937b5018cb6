//! Fade-out → fetch → render → fade-in sequencing
//!
//! # State machine
//!
//! ```text
//!            tick
//!   Idle ───────────▶ FadingOut   (opacity → fade level)
//!    ▲                    │ fade delay
//!    │                    ▼
//!    │                 Fetching ──── failure ────┐
//!    │                    │ success              │
//!    │                    ▼                      ▼
//!    └──── FadingIn ◀── Rendering            FadingIn
//!        (opacity → 1.0)
//! ```
//!
//! Every cycle ends in `Idle`, including failure paths. A tick that arrives
//! while a cycle is in flight is skipped rather than run concurrently.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

use crate::metrics;

use super::client::SelectionSource;
use super::config::{RotationConfig, DEFAULT_FADE_DELAY_MS, DEFAULT_FADE_OPACITY};
use super::render::{BannerRenderer, BannerSurface};

const FULL_OPACITY: f32 = 1.0;

// ============================================================================
// State and Events
// ============================================================================

/// Phase of the current rotation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum RotationState {
    Idle = 0,
    FadingOut = 1,
    Fetching = 2,
    Rendering = 3,
    FadingIn = 4,
}

impl RotationState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::FadingOut,
            2 => Self::Fetching,
            3 => Self::Rendering,
            4 => Self::FadingIn,
            _ => Self::Idle,
        }
    }

    /// Upper-case label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::FadingOut => "FADING_OUT",
            Self::Fetching => "FETCHING",
            Self::Rendering => "RENDERING",
            Self::FadingIn => "FADING_IN",
        }
    }
}

impl fmt::Display for RotationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a tick ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// New selection rendered
    Rendered { count: usize },
    /// Fetch failed; previous banners kept
    Unchanged { reason: String },
    /// Another cycle was in flight
    Skipped,
}

impl CycleOutcome {
    /// Whether the cycle actually ran (rendered or kept the old banners)
    pub fn is_attempt(&self) -> bool {
        !matches!(self, Self::Skipped)
    }

    /// Metric label for the outcome
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rendered { .. } => "rendered",
            Self::Unchanged { .. } => "unchanged",
            Self::Skipped => "skipped",
        }
    }
}

/// Events broadcast by the coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum RotationEvent {
    /// The cycle entered a new phase
    StateChanged(RotationState),
    /// A tick finished
    CycleCompleted(CycleOutcome),
}

/// Cycle counters since creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RotationStats {
    pub rendered: u64,
    pub unchanged: u64,
    pub skipped: u64,
}

// Clears the busy flag and returns to Idle even if the cycle future is
// dropped part-way through.
struct CycleGuard<'a> {
    busy: &'a AtomicBool,
    state: &'a AtomicU8,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.state.store(RotationState::Idle as u8, Ordering::Release);
        self.busy.store(false, Ordering::Release);
    }
}

// ============================================================================
// Transition Coordinator
// ============================================================================

/// Owns the rotation state and drives one cycle per tick
pub struct TransitionCoordinator<S: BannerSurface> {
    container: Arc<Mutex<S>>,
    source: Arc<dyn SelectionSource>,
    renderer: BannerRenderer,
    fade_delay: Duration,
    fade_opacity: f32,
    state: AtomicU8,
    busy: AtomicBool,
    rendered: AtomicU64,
    unchanged: AtomicU64,
    skipped: AtomicU64,
    events: broadcast::Sender<RotationEvent>,
}

impl<S: BannerSurface> TransitionCoordinator<S> {
    /// Create a coordinator with the default fade timing
    pub fn new(container: S, source: Arc<dyn SelectionSource>, renderer: BannerRenderer) -> Self {
        Self::with_shared_container(Arc::new(Mutex::new(container)), source, renderer)
    }

    /// Create a coordinator around a container the caller keeps a handle to
    pub fn with_shared_container(
        container: Arc<Mutex<S>>,
        source: Arc<dyn SelectionSource>,
        renderer: BannerRenderer,
    ) -> Self {
        let (events, _) = broadcast::channel(64);

        Self {
            container,
            source,
            renderer,
            fade_delay: Duration::from_millis(DEFAULT_FADE_DELAY_MS),
            fade_opacity: DEFAULT_FADE_OPACITY,
            state: AtomicU8::new(RotationState::Idle as u8),
            busy: AtomicBool::new(false),
            rendered: AtomicU64::new(0),
            unchanged: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            events,
        }
    }

    /// Override fade timing and level
    #[must_use]
    pub fn with_fade(mut self, delay: Duration, opacity: f32) -> Self {
        self.fade_delay = delay;
        self.fade_opacity = opacity.clamp(0.0, FULL_OPACITY);
        self
    }

    /// Apply fade settings from configuration
    #[must_use]
    pub fn with_config(self, config: &RotationConfig) -> Self {
        self.with_fade(config.fade_delay(), config.fade_opacity)
    }

    /// Shared handle to the container
    pub fn container(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.container)
    }

    /// Current phase
    pub fn state(&self) -> RotationState {
        RotationState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether a cycle is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Cycle counters
    pub fn stats(&self) -> RotationStats {
        RotationStats {
            rendered: self.rendered.load(Ordering::Relaxed),
            unchanged: self.unchanged.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    /// Subscribe to state changes and cycle outcomes
    pub fn subscribe(&self) -> broadcast::Receiver<RotationEvent> {
        self.events.subscribe()
    }

    fn enter(&self, state: RotationState) {
        self.state.store(state as u8, Ordering::Release);
        tracing::trace!(state = %state, "Rotation state changed");
        let _ = self.events.send(RotationEvent::StateChanged(state));
    }

    fn finish(&self, outcome: CycleOutcome) -> CycleOutcome {
        let counter = match outcome {
            CycleOutcome::Rendered { .. } => &self.rendered,
            CycleOutcome::Unchanged { .. } => &self.unchanged,
            CycleOutcome::Skipped => &self.skipped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        metrics::record_rotation_cycle(outcome.as_str());
        let _ = self.events.send(RotationEvent::CycleCompleted(outcome.clone()));
        outcome
    }

    /// Run one full rotation cycle
    ///
    /// Returns [`CycleOutcome::Skipped`] without touching the container if a
    /// cycle is already in flight. Fetch failures are logged and leave the
    /// rendered banners untouched.
    pub async fn run_cycle(&self) -> CycleOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(state = %self.state(), "Rotation tick skipped, cycle in progress");
            return self.finish(CycleOutcome::Skipped);
        }
        let guard = CycleGuard {
            busy: &self.busy,
            state: &self.state,
        };

        self.enter(RotationState::FadingOut);
        self.container.lock().await.set_opacity(self.fade_opacity);
        tokio::time::sleep(self.fade_delay).await;

        self.enter(RotationState::Fetching);
        let outcome = match self.source.fetch_selection().await {
            Ok(selection) => {
                self.enter(RotationState::Rendering);
                let mut container = self.container.lock().await;
                self.renderer.render(&mut *container, &selection);
                CycleOutcome::Rendered {
                    count: selection.len(),
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    network = e.is_network(),
                    "Failed to load banner ads, keeping current banners"
                );
                CycleOutcome::Unchanged {
                    reason: e.to_string(),
                }
            }
        };

        self.enter(RotationState::FadingIn);
        self.container.lock().await.set_opacity(FULL_OPACITY);

        // Idle and the outcome are published while busy is still held
        self.enter(RotationState::Idle);
        let outcome = self.finish(outcome);
        drop(guard);
        outcome
    }
}

impl<S: BannerSurface> fmt::Debug for TransitionCoordinator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionCoordinator")
            .field("state", &self.state())
            .field("busy", &self.is_busy())
            .field("fade_delay", &self.fade_delay)
            .field("fade_opacity", &self.fade_opacity)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
