use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

use exam_core::TickOutcome;

use super::service::TestSession;
use crate::error::SessionError;

/// Countdown resolution.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Session handle shared between the UI and the ticker task.
pub type SharedSession = Arc<Mutex<TestSession>>;

/// Why a ticker loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerExit {
    /// The countdown reached zero.
    Expired,
    /// The session was submitted while the ticker was running.
    Closed,
    /// The ticker was cancelled by its owner.
    Cancelled,
}

/// Call `tick` once per `period` until the countdown finishes.
///
/// The first tick fires one full period after the call.
pub async fn run_ticker<F>(period: Duration, mut tick: F) -> TickerExit
where
    F: FnMut() -> Result<TickOutcome, SessionError>,
{
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        match tick() {
            Ok(TickOutcome::Running { .. }) => {}
            Ok(TickOutcome::Expired) => return TickerExit::Expired,
            Ok(TickOutcome::Stopped) | Err(_) => return TickerExit::Closed,
        }
    }
}

/// Background task driving a shared session's countdown.
///
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct SessionTicker {
    cancel: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<TickerExit>>,
}

impl SessionTicker {
    /// Spawn the ticker on the current tokio runtime.
    #[must_use]
    pub fn spawn(session: SharedSession, period: Duration) -> Self {
        let (cancel_tx, mut cancel_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let ticks = run_ticker(period, || {
                session
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .tick()
            });
            let exit = tokio::select! {
                exit = ticks => exit,
                _ = &mut cancel_rx => TickerExit::Cancelled,
            };
            debug!(?exit, "session ticker stopped");
            exit
        });
        Self {
            cancel: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    /// Ask the task to stop at its next await point.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the task to finish.
    ///
    /// A task that panicked or was aborted reports `TickerExit::Cancelled`.
    pub async fn join(mut self) -> TickerExit {
        match self.handle.take() {
            Some(handle) => handle.await.unwrap_or(TickerExit::Cancelled),
            None => TickerExit::Cancelled,
        }
    }
}

impl Drop for SessionTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
