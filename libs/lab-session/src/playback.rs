//! Projectile playback
//!
//! Replays a launch frame by frame: every tick advances simulation time by
//! `elapsed × time_scale` and emits the projectile position at that time.
//! Playback ends when the projectile lands or the cancellation token fires.

use lab_calc::mechanics::{ProjectileParams, TrajectoryPoint};
use lab_calc::CalcError;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{Result, SessionError};
use crate::ticker::Ticker;

/// How a playback run ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaybackOutcome {
    /// Projectile reached the ground
    Finished { frames: usize, sim_time: f64 },
    /// Stopped by the cancellation token
    Cancelled { frames: usize, sim_time: f64 },
}

impl PlaybackOutcome {
    pub fn frames(&self) -> usize {
        match self {
            Self::Finished { frames, .. } | Self::Cancelled { frames, .. } => *frames,
        }
    }

    pub fn sim_time(&self) -> f64 {
        match self {
            Self::Finished { sim_time, .. } | Self::Cancelled { sim_time, .. } => *sim_time,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Playback {
    params: ProjectileParams,
    time_scale: f64,
    flight_time: f64,
}

impl Playback {
    pub fn new(params: ProjectileParams, time_scale: f64) -> Result<Self> {
        params.validate()?;
        if !time_scale.is_finite() || time_scale <= 0.0 {
            return Err(CalcError::invalid_input(format!(
                "time scale must be positive, got {}",
                time_scale
            ))
            .into());
        }
        Ok(Self {
            params,
            time_scale,
            flight_time: params.flight_time(),
        })
    }

    pub fn flight_time(&self) -> f64 {
        self.flight_time
    }

    /// Drive the animation until landing or cancellation
    ///
    /// `on_frame` sees every emitted position; the last one is the landing
    /// point at exactly the flight time.
    pub async fn run<T, F>(
        &self,
        ticker: &mut T,
        token: &CancellationToken,
        mut on_frame: F,
    ) -> PlaybackOutcome
    where
        T: Ticker,
        F: FnMut(TrajectoryPoint),
    {
        let mut sim_time = 0.0;
        let mut frames = 0;

        debug!(
            flight_time = self.flight_time,
            time_scale = self.time_scale,
            "playback start"
        );

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    info!(frames, sim_time, "playback cancelled");
                    return PlaybackOutcome::Cancelled { frames, sim_time };
                }
                elapsed = ticker.tick() => {
                    sim_time += elapsed.as_secs_f64() * self.time_scale;
                    let landed = sim_time >= self.flight_time;
                    if landed {
                        sim_time = self.flight_time;
                    }

                    on_frame(self.params.position_at(sim_time));
                    frames += 1;

                    if landed {
                        info!(frames, sim_time, "playback finished");
                        return PlaybackOutcome::Finished { frames, sim_time };
                    }
                }
            }
        }
    }

    /// Run on a background task, streaming frames over a channel
    pub fn spawn<T>(self, mut ticker: T, token: CancellationToken) -> PlaybackHandle
    where
        T: Ticker + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            self.run(&mut ticker, &token, |point| {
                // Dropped receiver is fine
                let _ = tx.send(point);
            })
            .await
        });
        PlaybackHandle { task, frames: rx }
    }
}

/// Background playback
pub struct PlaybackHandle {
    task: JoinHandle<PlaybackOutcome>,
    pub frames: mpsc::UnboundedReceiver<TrajectoryPoint>,
}

impl PlaybackHandle {
    /// Wait for the task; an aborted or panicked task maps to `Cancelled`
    pub async fn join(self) -> Result<PlaybackOutcome> {
        self.task
            .await
            .map_err(|e| SessionError::cancelled(format!("playback task: {}", e)))
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}
