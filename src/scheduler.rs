//! Poll scheduler
//!
//! Drives poll/write cycles either once or on a fixed period.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::envoy::ReadingSource;
use crate::errors::PollError;
use crate::influx::ReadingSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Once,
    Every(Duration),
}

impl Schedule {
    /// A zero interval means a single cycle.
    pub fn from_interval(interval: Duration) -> Self {
        if interval.is_zero() {
            Schedule::Once
        } else {
            Schedule::Every(interval)
        }
    }
}

pub struct Poller<S, W> {
    source: S,
    sink: W,
}

impl<S, W> Poller<S, W>
where
    S: ReadingSource,
    W: ReadingSink,
{
    pub fn new(source: S, sink: W) -> Self {
        Self { source, sink }
    }

    /// One poll/write cycle. Errors come back untouched.
    pub async fn poll_once(&mut self) -> Result<(), PollError> {
        let (production, consumption) = self.source.poll().await?;
        self.sink.write(&production, &consumption).await?;
        debug!("Cycle done: {} readings written", consumption.len() + 1);
        Ok(())
    }

    /// `Once` returns the cycle's result. `Every` logs failed cycles and
    /// keeps going until `shutdown` changes; missed ticks are skipped.
    pub async fn run(
        &mut self,
        schedule: Schedule,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), PollError> {
        let period = match schedule {
            Schedule::Once => return self.poll_once().await,
            Schedule::Every(period) => period,
        };

        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.changed() => {
                    info!("Shutdown requested, stopping poll loop");
                    return Ok(());
                }
            }

            if let Err(e) = self.poll_once().await {
                error!("Poll cycle failed: {}", e);
            }
        }
    }

    pub fn into_parts(self) -> (S, W) {
        (self.source, self.sink)
    }
}
