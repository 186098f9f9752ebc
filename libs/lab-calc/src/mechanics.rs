//! Kinematics, dynamics and energy formulas
//!
//! SI units throughout: m, s, kg, N, J. Angles are in degrees.

use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, CalcError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Standard gravity, m/s²
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Default number of trajectory samples
pub const DEFAULT_SAMPLES: usize = 50;

/// Upper bound on trajectory samples
pub const MAX_SAMPLES: usize = 100_000;

// ============================================================================
// Projectile motion
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileParams {
    /// Launch speed, m/s
    pub speed: f64,
    /// Launch angle above horizontal, degrees
    pub angle_deg: f64,
    /// Launch height, m
    pub height: f64,
    /// Gravitational acceleration, m/s²
    pub gravity: f64,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            speed: 20.0,
            angle_deg: 45.0,
            height: 0.0,
            gravity: STANDARD_GRAVITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub t: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub vx: f64,
    pub vy: f64,
    pub flight_time: f64,
    pub max_height: f64,
    pub range: f64,
    pub points: Vec<TrajectoryPoint>,
}

impl ProjectileParams {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("speed", self.speed)?;
        ensure_finite("angle", self.angle_deg)?;
        ensure_non_negative("height", self.height)?;
        ensure_positive("gravity", self.gravity)?;
        Ok(())
    }

    /// Velocity components `(vx, vy)`
    pub fn components(&self) -> (f64, f64) {
        let theta = self.angle_deg.to_radians();
        (self.speed * theta.cos(), self.speed * theta.sin())
    }

    /// Positive root of `h + vy·t - g·t²/2 = 0`
    pub fn flight_time(&self) -> f64 {
        let (_, vy) = self.components();
        (vy + (vy * vy + 2.0 * self.gravity * self.height).sqrt()) / self.gravity
    }

    /// Peak height above ground; the launch height when fired downward
    pub fn max_height(&self) -> f64 {
        let (_, vy) = self.components();
        if vy > 0.0 {
            self.height + vy * vy / (2.0 * self.gravity)
        } else {
            self.height
        }
    }

    /// Horizontal distance at landing
    pub fn range(&self) -> f64 {
        let (vx, _) = self.components();
        vx * self.flight_time()
    }

    /// Position at time `t`, height floored at ground level
    pub fn position_at(&self, t: f64) -> TrajectoryPoint {
        let (vx, vy) = self.components();
        let y = self.height + vy * t - 0.5 * self.gravity * t * t;
        TrajectoryPoint {
            t,
            x: vx * t,
            y: y.max(0.0),
        }
    }
}

/// Sample `samples` evenly spaced points over `[0, flight_time]`
pub fn projectile(params: &ProjectileParams, samples: usize) -> Result<Trajectory> {
    params.validate()?;
    if samples < 2 {
        return Err(CalcError::invalid_input(
            "A trajectory needs at least two samples",
        ));
    }
    if samples > MAX_SAMPLES {
        return Err(CalcError::invalid_input(format!(
            "A trajectory takes at most {} samples",
            MAX_SAMPLES
        )));
    }

    let (vx, vy) = params.components();
    let flight_time = params.flight_time();
    let dt = flight_time / (samples - 1) as f64;
    let points = (0..samples)
        .map(|i| params.position_at(i as f64 * dt))
        .collect();

    debug!(vx, vy, flight_time, "projectile");
    Ok(Trajectory {
        vx,
        vy,
        flight_time,
        max_height: params.max_height(),
        range: params.range(),
        points,
    })
}

// ============================================================================
// Dynamics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DynamicsResult {
    /// μ·m·g, N
    pub friction_force: f64,
    /// max(F - friction, 0), N
    pub net_force: f64,
    /// net / m, m/s²
    pub acceleration: f64,
    /// Whether the applied force overcomes friction
    pub moving: bool,
}

/// Block pushed along a horizontal surface with kinetic friction
pub fn dynamics(
    force: f64,
    mass: f64,
    friction_coefficient: f64,
    gravity: f64,
) -> Result<DynamicsResult> {
    ensure_finite("force", force)?;
    ensure_positive("mass", mass)?;
    ensure_non_negative("friction coefficient", friction_coefficient)?;
    ensure_positive("gravity", gravity)?;

    let friction_force = friction_coefficient * mass * gravity;
    let net_force = (force - friction_force).max(0.0);
    Ok(DynamicsResult {
        friction_force,
        net_force,
        acceleration: net_force / mass,
        moving: net_force > 0.0,
    })
}

// ============================================================================
// Energy
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyResult {
    /// m·g·h, J
    pub potential_energy: f64,
    /// Equal to the potential energy at impact, J
    pub kinetic_energy_at_impact: f64,
    /// √(2·g·h), m/s
    pub impact_speed: f64,
}

/// Free fall from rest, by energy conservation
pub fn free_fall_energy(mass: f64, height: f64, gravity: f64) -> Result<EnergyResult> {
    ensure_positive("mass", mass)?;
    ensure_non_negative("height", height)?;
    ensure_positive("gravity", gravity)?;

    let potential_energy = mass * gravity * height;
    Ok(EnergyResult {
        potential_energy,
        kinetic_energy_at_impact: potential_energy,
        impact_speed: (2.0 * gravity * height).sqrt(),
    })
}
