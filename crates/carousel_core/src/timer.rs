//! Repeating timers used for autoplay.

use std::time::Duration;

use thiserror::Error;
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

/// Callback run on every timer period.
pub type TickFn = Box<dyn FnMut() + Send + 'static>;

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("no async runtime is available to drive the timer")]
    NoRuntime,
    #[error("timer period must be non-zero")]
    ZeroPeriod,
    #[error("timer unavailable: {0}")]
    Unavailable(String),
}

/// Source of repeating timers.
///
/// Implementations must not invoke `tick` from inside `schedule_repeating`;
/// the engine calls it while holding its state lock.
pub trait TimerDriver: Send + Sync {
    fn schedule_repeating(&self, period: Duration, tick: TickFn)
        -> Result<TimerHandle, TimerError>;
}

/// Owns a running timer. Dropping the handle cancels it.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    pub fn from_task(task: JoinHandle<()>) -> Self {
        Self::from_cancel(move || task.abort())
    }

    pub fn from_cancel(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Timer driver backed by a tokio task per timer, spawned on the runtime of
/// the calling context. Scheduling outside any runtime fails with
/// [`TimerError::NoRuntime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimerDriver;

impl TokioTimerDriver {
    pub fn new() -> Self {
        Self
    }
}

impl TimerDriver for TokioTimerDriver {
    fn schedule_repeating(
        &self,
        period: Duration,
        mut tick: TickFn,
    ) -> Result<TimerHandle, TimerError> {
        if period.is_zero() {
            return Err(TimerError::ZeroPeriod);
        }
        let runtime = Handle::try_current().map_err(|_| TimerError::NoRuntime)?;

        let task = runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tick();
            }
        });
        Ok(TimerHandle::from_task(task))
    }
}
