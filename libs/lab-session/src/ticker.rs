//! Frame clock for animations
//!
//! A [`Ticker`] stands in for a per-frame callback: each `tick` waits for the
//! next frame and reports how much time passed since the previous one.

use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Source of frame ticks
pub trait Ticker: Send {
    /// Wait for the next frame; returns time elapsed since the previous one
    fn tick(&mut self) -> impl Future<Output = Duration> + Send;
}

/// Ticker driven by a tokio interval
///
/// The first tick completes immediately and reports zero elapsed time.
pub struct IntervalTicker {
    interval: Interval,
    last: Option<Instant>,
}

impl IntervalTicker {
    /// A zero period is raised to one millisecond
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            last: None,
        }
    }

    pub fn from_millis(period_ms: u64) -> Self {
        Self::new(Duration::from_millis(period_ms))
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> Duration {
        self.interval.tick().await;
        let now = Instant::now();
        let elapsed = self
            .last
            .map(|last| now.duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);
        elapsed
    }
}
