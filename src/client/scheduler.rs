//! Background refresh of the session's access token.
//!
//! Flow:
//! 1. `activate` spawns one task per scheduler; a second `activate` while the
//!    task is alive does nothing.
//! 2. Every period (jittered to 80-100% of the interval) the task calls
//!    [`Refresh::refresh_session`].
//! 3. Failures are logged and the timer keeps going. A session that has truly
//!    lapsed surfaces as a `401` on the caller's next API request.
//! 4. `deactivate`, or dropping the scheduler, cancels the task.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{fmt::Display, future::Future, sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A bit under the 15 minutes a refreshed access token lives.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(12 * 60);

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);
const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Anything that can renew the current session.
pub trait Refresh: Send + Sync + 'static {
    type Error: Display + Send;

    fn refresh_session(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

pub struct RefreshScheduler<R: Refresh> {
    refresher: Arc<R>,
    interval: Duration,
    task: Option<(CancellationToken, JoinHandle<()>)>,
}

impl<R: Refresh> RefreshScheduler<R> {
    #[must_use]
    pub fn new(refresher: Arc<R>) -> Self {
        Self {
            refresher,
            interval: DEFAULT_REFRESH_INTERVAL,
            task: None,
        }
    }

    /// Clamped to between one second and one day.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL);
        self
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `true` while the background task is alive and not cancelled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|(cancel, handle)| !cancel.is_cancelled() && !handle.is_finished())
    }

    /// Start the timer. Returns `false` if it was already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn activate(&mut self) -> bool {
        if self.is_active() {
            debug!("Refresh scheduler already active");
            return false;
        }

        // A task that died on its own leaves a stale token behind.
        self.deactivate();

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(
            Arc::clone(&self.refresher),
            self.interval,
            cancel.clone(),
        ));
        self.task = Some((cancel, handle));

        info!(
            interval_seconds = self.interval.as_secs(),
            "Refresh scheduler activated"
        );
        true
    }

    /// Stop the timer; it never fires again.
    pub fn deactivate(&mut self) {
        if let Some((cancel, _)) = self.task.take() {
            if !cancel.is_cancelled() {
                cancel.cancel();
                info!("Refresh scheduler deactivated");
            }
        }
    }
}

impl<R: Refresh> Drop for RefreshScheduler<R> {
    fn drop(&mut self) {
        if let Some((cancel, _)) = self.task.take() {
            cancel.cancel();
        }
    }
}

fn jittered(interval: Duration, rng: &mut StdRng) -> Duration {
    let factor: u32 = rng.gen_range(80..=100);
    interval
        .checked_mul(factor)
        .map_or(interval, |scaled| scaled / 100)
}

async fn run<R: Refresh>(refresher: Arc<R>, interval: Duration, cancel: CancellationToken) {
    let mut rng = StdRng::from_entropy();

    loop {
        let period = jittered(interval, &mut rng);
        debug!(
            next_refresh_seconds = period.as_secs(),
            "Will refresh session"
        );

        tokio::select! {
            () = cancel.cancelled() => break,
            () = sleep(period) => {}
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            result = refresher.refresh_session() => match result {
                Ok(()) => debug!("Session refreshed"),
                Err(e) => warn!("Failed to refresh session: {}", e),
            },
        }
    }

    debug!("Refresh scheduler stopped");
}
