//! Physics commands: projectile motion, dynamics, energy and playback

use anyhow::Result;
use clap::Args;
use common::config::{PlaybackConfig, ProjectileConfig};
use lab_calc::format::fmt_num;
use lab_calc::mechanics::{
    dynamics as solve_dynamics, free_fall_energy, projectile as solve_projectile,
    DynamicsResult, EnergyResult, ProjectileParams, Trajectory, STANDARD_GRAVITY,
};
use lab_session::{IntervalTicker, Playback, PlaybackOutcome};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::output::{field, heading, quantity, yes_no, Output};

/// Launch parameters shared by `projectile` and `playback`
#[derive(Debug, Clone, Args)]
pub struct LaunchArgs {
    /// Launch speed, m/s
    #[arg(long, default_value_t = 20.0)]
    pub speed: f64,

    /// Launch angle above horizontal, degrees
    #[arg(long, default_value_t = 45.0, allow_negative_numbers = true)]
    pub angle: f64,

    /// Launch height, m
    #[arg(long, default_value_t = 0.0)]
    pub height: f64,

    /// Gravitational acceleration, m/s²
    #[arg(long, default_value_t = STANDARD_GRAVITY)]
    pub gravity: f64,
}

impl From<&LaunchArgs> for ProjectileParams {
    fn from(args: &LaunchArgs) -> Self {
        ProjectileParams {
            speed: args.speed,
            angle_deg: args.angle,
            height: args.height,
            gravity: args.gravity,
        }
    }
}

// ============================================================================
// Projectile
// ============================================================================

#[derive(Debug, Args)]
pub struct ProjectileArgs {
    #[command(flatten)]
    pub launch: LaunchArgs,

    /// Trajectory samples (default from config)
    #[arg(long)]
    pub samples: Option<usize>,
}

pub fn projectile(out: &Output, args: ProjectileArgs, config: &ProjectileConfig) -> Result<()> {
    let params = ProjectileParams::from(&args.launch);
    let trajectory = solve_projectile(&params, args.samples.unwrap_or(config.samples))?;
    out.emit(&trajectory, render_trajectory)
}

pub fn render_trajectory(t: &Trajectory) -> String {
    let mut lines = vec![
        heading("Projectile motion"),
        field(
            "Velocity (vx, vy)",
            format!("({}, {}) m/s", fmt_num(t.vx), fmt_num(t.vy)),
        ),
        field("Flight time", quantity(t.flight_time, "s")),
        field("Max height", quantity(t.max_height, "m")),
        field("Range", quantity(t.range, "m")),
        format!("  {:>8} {:>10} {:>10}", "t (s)", "x (m)", "y (m)"),
    ];
    for p in &t.points {
        lines.push(format!(
            "  {:>8} {:>10} {:>10}",
            fmt_num(p.t),
            fmt_num(p.x),
            fmt_num(p.y)
        ));
    }
    lines.join("\n")
}

// ============================================================================
// Dynamics and energy
// ============================================================================

#[derive(Debug, Args)]
pub struct DynamicsArgs {
    /// Applied horizontal force, N
    #[arg(long, allow_negative_numbers = true)]
    pub force: f64,

    /// Mass, kg
    #[arg(long)]
    pub mass: f64,

    /// Kinetic friction coefficient
    #[arg(long, default_value_t = 0.0)]
    pub mu: f64,

    #[arg(long, default_value_t = STANDARD_GRAVITY)]
    pub gravity: f64,
}

pub fn dynamics(out: &Output, args: DynamicsArgs) -> Result<()> {
    let result = solve_dynamics(args.force, args.mass, args.mu, args.gravity)?;
    out.emit(&result, render_dynamics)
}

pub fn render_dynamics(d: &DynamicsResult) -> String {
    [
        heading("Newton's second law"),
        field("Friction force", quantity(d.friction_force, "N")),
        field("Net force", quantity(d.net_force, "N")),
        field("Acceleration", quantity(d.acceleration, "m/s²")),
        field("Moving", yes_no(d.moving)),
    ]
    .join("\n")
}

#[derive(Debug, Args)]
pub struct EnergyArgs {
    /// Mass, kg
    #[arg(long)]
    pub mass: f64,

    /// Drop height, m
    #[arg(long)]
    pub height: f64,

    #[arg(long, default_value_t = STANDARD_GRAVITY)]
    pub gravity: f64,
}

pub fn energy(out: &Output, args: EnergyArgs) -> Result<()> {
    let result = free_fall_energy(args.mass, args.height, args.gravity)?;
    out.emit(&result, render_energy)
}

pub fn render_energy(e: &EnergyResult) -> String {
    [
        heading("Energy conservation"),
        field("Potential energy", quantity(e.potential_energy, "J")),
        field("Kinetic energy at impact", quantity(e.kinetic_energy_at_impact, "J")),
        field("Impact speed", quantity(e.impact_speed, "m/s")),
    ]
    .join("\n")
}

// ============================================================================
// Playback
// ============================================================================

#[derive(Debug, Args)]
pub struct PlaybackArgs {
    #[command(flatten)]
    pub launch: LaunchArgs,

    /// Frame period, ms (default from config)
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Simulation seconds per real second (default from config)
    #[arg(long)]
    pub time_scale: Option<f64>,
}

/// Animate the launch in real time; Ctrl-C stops it
pub async fn playback(out: &Output, args: PlaybackArgs, config: &PlaybackConfig) -> Result<()> {
    let tick_ms = args.tick_ms.unwrap_or(config.tick_ms);
    let time_scale = args.time_scale.unwrap_or(config.time_scale);
    let playback = Playback::new(ProjectileParams::from(&args.launch), time_scale)?;

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received");
            interrupt.cancel();
        }
    });

    if !out.is_json() {
        println!(
            "{} flight time {} s, {} ms frames, ×{}",
            heading("Playback"),
            fmt_num(playback.flight_time()),
            tick_ms,
            fmt_num(time_scale)
        );
    }

    let mut handle = playback.spawn(IntervalTicker::from_millis(tick_ms), token.clone());
    while let Some(point) = handle.frames.recv().await {
        out.record(&point, || {
            format!(
                "  t={:>8}  x={:>10}  y={:>10}",
                fmt_num(point.t),
                fmt_num(point.x),
                fmt_num(point.y)
            )
        })?;
    }

    let outcome = handle.join().await?;
    token.cancel();
    out.record(&outcome, || render_outcome(&outcome))
}

pub fn render_outcome(outcome: &PlaybackOutcome) -> String {
    match outcome {
        PlaybackOutcome::Finished { frames, sim_time } => {
            format!("Landed after {} s ({} frames)", fmt_num(*sim_time), frames)
        },
        PlaybackOutcome::Cancelled { frames, sim_time } => {
            format!("Stopped at {} s ({} frames)", fmt_num(*sim_time), frames)
        },
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_launch_args_to_params() {
        let args = LaunchArgs {
            speed: 10.0,
            angle: 30.0,
            height: 2.0,
            gravity: 9.81,
        };
        let params = ProjectileParams::from(&args);
        assert_eq!(params.angle_deg, 30.0);
        assert_eq!(params.height, 2.0);
    }

    #[test]
    fn test_render_outcome() {
        let text = render_outcome(&PlaybackOutcome::Finished {
            frames: 12,
            sim_time: 2.0,
        });
        assert_eq!(text, "Landed after 2 s (12 frames)");

        let text = render_outcome(&PlaybackOutcome::Cancelled {
            frames: 3,
            sim_time: 0.25,
        });
        assert_eq!(text, "Stopped at 0.25 s (3 frames)");
    }

    #[test]
    fn test_render_energy() {
        colored::control::set_override(false);
        let text = render_energy(&free_fall_energy(2.0, 10.0, 9.81).unwrap());
        assert!(text.contains("196.2 J"));
    }
}
