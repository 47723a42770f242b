use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// Ticks shown while the advertisement plays.
pub const AD_COUNTDOWN_TICKS: u8 = 5;

/// A fixed-length countdown driven by a tokio interval.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    ticks: u8,
    period: Duration,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(AD_COUNTDOWN_TICKS)
    }
}

impl Countdown {
    pub fn new(ticks: u8) -> Self {
        Self {
            ticks,
            period: Duration::from_secs(1),
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn ticks(&self) -> u8 {
        self.ticks
    }

    /// Spawn the countdown.
    ///
    /// `on_tick` receives the remaining count after every period, ending with `0`;
    /// `on_done` runs once afterwards. Neither runs again once the countdown has
    /// finished or been cancelled.
    pub fn start<T, D>(self, mut on_tick: T, on_done: D) -> CountdownHandle
    where
        T: FnMut(u8) + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        let Countdown { ticks, period } = self;
        let task = tokio::spawn(async move {
            // tokio rejects a zero period
            let mut interval = time::interval(period.max(Duration::from_millis(1)));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            interval.tick().await;

            let mut remaining = ticks;
            while remaining > 0 {
                interval.tick().await;
                remaining -= 1;
                on_tick(remaining);
            }

            debug!(ticks, "countdown finished");
            on_done();
        });

        CountdownHandle { task }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    Completed,
    Cancelled,
}

/// Handle on a running [`Countdown`].
#[derive(Debug)]
pub struct CountdownHandle {
    task: JoinHandle<()>,
}

impl CountdownHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the countdown to stop, whichever way it ends.
    pub async fn wait(self) -> CountdownOutcome {
        match self.task.await {
            Ok(()) => CountdownOutcome::Completed,
            Err(_) => CountdownOutcome::Cancelled,
        }
    }
}
