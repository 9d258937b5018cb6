//! Periodic driver for the transition coordinator

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::error::{RotationError, RotationResult};
use super::render::BannerSurface;
use super::transition::TransitionCoordinator;

struct RunningTimer {
    interval: Duration,
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Fires one rotation cycle per interval
///
/// The first tick fires immediately on [`start`](Self::start). Each tick
/// runs its cycle on a separate task; the coordinator skips ticks that
/// arrive while a cycle is still in flight.
pub struct RotationScheduler<S: BannerSurface + 'static> {
    coordinator: Arc<TransitionCoordinator<S>>,
    running: Mutex<Option<RunningTimer>>,
}

impl<S: BannerSurface + 'static> RotationScheduler<S> {
    /// Create a stopped scheduler
    pub fn new(coordinator: Arc<TransitionCoordinator<S>>) -> Self {
        Self {
            coordinator,
            running: Mutex::new(None),
        }
    }

    /// Coordinator driven by this scheduler
    pub fn coordinator(&self) -> &Arc<TransitionCoordinator<S>> {
        &self.coordinator
    }

    /// Start ticking every `interval`
    ///
    /// Fails with [`RotationError::AlreadyRunning`] if a timer is already
    /// registered, so a second call can never produce a second timer.
    pub async fn start(&self, interval: Duration) -> RotationResult<()> {
        if interval.is_zero() {
            return Err(RotationError::InvalidInterval(
                "interval must be greater than 0".to_string(),
            ));
        }

        let mut running = self.running.lock().await;
        if running.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            tracing::warn!("Rotation scheduler start requested while already running");
            return Err(RotationError::AlreadyRunning);
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let coordinator = Arc::clone(&self.coordinator);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;

                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {
                        let coordinator = Arc::clone(&coordinator);
                        tokio::spawn(async move {
                            coordinator.run_cycle().await;
                        });
                    }
                }
            }

            tracing::debug!("Rotation timer loop exited");
        });

        *running = Some(RunningTimer {
            interval,
            stop_tx,
            handle,
        });

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            "Rotation scheduler started"
        );
        Ok(())
    }

    /// Cancel the timer
    ///
    /// No new cycles start after this returns. A cycle already in flight
    /// runs to completion. Returns `false` if the scheduler was not running.
    pub async fn stop(&self) -> bool {
        let Some(timer) = self.running.lock().await.take() else {
            return false;
        };

        let _ = timer.stop_tx.send(true);
        if let Err(e) = timer.handle.await {
            tracing::warn!(error = %e, "Rotation timer task ended abnormally");
        }

        tracing::info!("Rotation scheduler stopped");
        true
    }

    /// Whether a timer is registered
    pub async fn is_running(&self) -> bool {
        self.running
            .lock()
            .await
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    /// Interval of the registered timer
    pub async fn interval(&self) -> Option<Duration> {
        self.running.lock().await.as_ref().map(|t| t.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ad, Selection};
    use crate::rotation::client::SelectionSource;
    use crate::rotation::error::FeedError;
    use crate::rotation::render::{BannerContainer, BannerRenderer};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SelectionSource for CountingSource {
        async fn fetch_selection(&self) -> Result<Selection, FeedError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Ad::new(format!("ad-{n}"), "s", "d", "b", "#fff")])
        }
    }

    fn scheduler() -> (RotationScheduler<BannerContainer>, Arc<CountingSource>) {
        let source = Arc::new(CountingSource::default());
        let coordinator = Arc::new(TransitionCoordinator::new(
            BannerContainer::default(),
            source.clone(),
            BannerRenderer::default(),
        ));
        (RotationScheduler::new(coordinator), source)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_is_immediate() {
        let (scheduler, source) = scheduler();

        scheduler.start(Duration::from_secs(5)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        let container = scheduler.coordinator().container();
        assert_eq!(container.lock().await.titles(), vec!["ad-0"]);

        scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_interval() {
        let (scheduler, source) = scheduler();

        scheduler.start(Duration::from_secs(5)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10_400)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_is_rejected() {
        let (scheduler, source) = scheduler();

        scheduler.start(Duration::from_secs(5)).await.unwrap();
        let second = scheduler.start(Duration::from_secs(1)).await;
        assert_eq!(second, Err(RotationError::AlreadyRunning));

        // Still ticking at the first interval
        tokio::time::sleep(Duration::from_millis(5_400)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.interval().await, Some(Duration::from_secs(5)));

        scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_ticks() {
        let (scheduler, source) = scheduler();

        scheduler.start(Duration::from_secs(5)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(scheduler.stop().await);
        assert!(!scheduler.is_running().await);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop() {
        let (scheduler, source) = scheduler();

        scheduler.start(Duration::from_secs(5)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        scheduler.stop().await;

        scheduler.start(Duration::from_secs(5)).await.unwrap();
        assert!(scheduler.is_running().await);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        scheduler.stop().await;
    }

    #[tokio::test]
    async fn test_stop_when_idle() {
        let (scheduler, _) = scheduler();
        assert!(!scheduler.stop().await);
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let (scheduler, _) = scheduler();
        let result = scheduler.start(Duration::ZERO).await;
        assert!(matches!(result, Err(RotationError::InvalidInterval(_))));
    }
}
