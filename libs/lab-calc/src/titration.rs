//! Titration curve generator
//!
//! Samples pH against added base volume for a monoprotic acid titrated with a
//! strong base. Volumes are in mL and concentrations in mol/L.

use crate::error::{ensure_positive, CalcError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// pKa used for the weak acid (acetic acid)
pub const WEAK_ACID_PKA: f64 = 4.75;

/// Ion product of water at 25 °C
pub const KW: f64 = 1.0e-14;

/// Half-width of the band around Ve treated as the equivalence point, mL
pub const EQUIVALENCE_TOLERANCE: f64 = 0.05;

/// Default base volume increment, mL
pub const DEFAULT_STEP_ML: f64 = 0.5;

/// Upper bound on generated samples
const MAX_SAMPLES: usize = 100_000;

/// Acid/base pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitrationType {
    StrongStrong,
    WeakStrong,
}

impl std::str::FromStr for TitrationType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strong-strong" => Ok(Self::StrongStrong),
            "weak-strong" => Ok(Self::WeakStrong),
            other => Err(CalcError::invalid_input(format!(
                "Invalid titration type '{}', expected strong-strong or weak-strong",
                other
            ))),
        }
    }
}

/// Titration inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TitrationParams {
    pub kind: TitrationType,
    /// Acid concentration, mol/L
    pub acid_concentration: f64,
    /// Acid volume, mL
    pub acid_volume: f64,
    /// Base concentration, mol/L
    pub base_concentration: f64,
}

/// One point on the curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Added base, mL
    pub volume: f64,
    pub ph: f64,
}

/// Generated curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitrationCurve {
    /// Equivalence volume Ve = Ca·Va / Cb, mL
    pub equivalence_volume: f64,
    /// pH exactly at Ve
    pub equivalence_ph: f64,
    /// Ve / 2; for a weak acid pH = pKa here
    pub half_equivalence_volume: f64,
    pub points: Vec<CurvePoint>,
}

impl TitrationParams {
    fn validate(&self) -> Result<()> {
        ensure_positive("acid concentration", self.acid_concentration)?;
        ensure_positive("acid volume", self.acid_volume)?;
        ensure_positive("base concentration", self.base_concentration)?;
        Ok(())
    }

    /// Ve = Ca·Va / Cb
    pub fn equivalence_volume(&self) -> f64 {
        self.acid_concentration * self.acid_volume / self.base_concentration
    }

    /// pH after `base_volume` mL of base, clamped to [0, 14]
    pub fn ph_at(&self, base_volume: f64) -> f64 {
        let ve = self.equivalence_volume();
        let acid_moles = self.acid_concentration * self.acid_volume / 1000.0;
        let base_moles = self.base_concentration * base_volume / 1000.0;
        let total_litres = (self.acid_volume + base_volume) / 1000.0;

        let ph = if (base_volume - ve).abs() <= EQUIVALENCE_TOLERANCE {
            self.equivalence_ph()
        } else if base_volume > ve {
            excess_base_ph(base_moles - acid_moles, total_litres)
        } else {
            match self.kind {
                TitrationType::StrongStrong => {
                    let h = (acid_moles - base_moles) / total_litres;
                    -h.log10()
                },
                TitrationType::WeakStrong if base_volume <= 0.0 => {
                    let ka = 10f64.powf(-WEAK_ACID_PKA);
                    -(ka * self.acid_concentration).sqrt().log10()
                },
                TitrationType::WeakStrong => {
                    // Henderson–Hasselbalch in the buffer region
                    WEAK_ACID_PKA + (base_moles / (acid_moles - base_moles)).log10()
                },
            }
        };

        ph.clamp(0.0, 14.0)
    }

    /// Analytic pH at the equivalence point
    pub fn equivalence_ph(&self) -> f64 {
        match self.kind {
            TitrationType::StrongStrong => 7.0,
            TitrationType::WeakStrong => {
                let ve = self.equivalence_volume();
                let acid_moles = self.acid_concentration * self.acid_volume / 1000.0;
                let conjugate = acid_moles / ((self.acid_volume + ve) / 1000.0);
                let kb = KW / 10f64.powf(-WEAK_ACID_PKA);
                let oh = (kb * conjugate).sqrt();
                (14.0 + oh.log10()).clamp(0.0, 14.0)
            },
        }
    }
}

fn excess_base_ph(excess_moles: f64, total_litres: f64) -> f64 {
    let oh = excess_moles / total_litres;
    14.0 + oh.log10()
}

/// Sample the curve from 0 to 2·Ve in `step_ml` increments
///
/// Sample volumes are `i·step_ml`; the last sample is pinned to exactly 2·Ve.
pub fn generate_curve(params: &TitrationParams, step_ml: f64) -> Result<TitrationCurve> {
    params.validate()?;
    ensure_positive("volume step", step_ml)?;

    let ve = params.equivalence_volume();
    let end = 2.0 * ve;
    let steps = (end / step_ml + 1e-9).floor() as usize;
    if steps >= MAX_SAMPLES {
        return Err(CalcError::invalid_input(format!(
            "Volume step {} mL is too small for a {} mL range",
            step_ml, end
        )));
    }

    let mut points: Vec<CurvePoint> = (0..=steps)
        .map(|i| {
            let volume = i as f64 * step_ml;
            CurvePoint {
                volume,
                ph: params.ph_at(volume),
            }
        })
        .collect();

    if points.last().map(|p| end - p.volume > 1e-9).unwrap_or(true) {
        points.push(CurvePoint {
            volume: end,
            ph: params.ph_at(end),
        });
    }

    debug!(
        kind = ?params.kind,
        equivalence_volume = ve,
        samples = points.len(),
        "titration curve"
    );

    Ok(TitrationCurve {
        equivalence_volume: ve,
        equivalence_ph: params.equivalence_ph(),
        half_equivalence_volume: ve / 2.0,
        points,
    })
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn params(kind: TitrationType) -> TitrationParams {
        TitrationParams {
            kind,
            acid_concentration: 0.1,
            acid_volume: 20.0,
            base_concentration: 0.1,
        }
    }

    #[test]
    fn test_strong_strong_curve() {
        let p = params(TitrationType::StrongStrong);
        let curve = generate_curve(&p, DEFAULT_STEP_ML).unwrap();

        assert!((curve.equivalence_volume - 20.0).abs() < 1e-9);
        assert_eq!(curve.points.len(), 81);

        let first = curve.points.first().unwrap();
        let last = curve.points.last().unwrap();
        assert_eq!(first.volume, 0.0);
        assert!((first.ph - 1.0).abs() < 1e-9);
        assert!((last.volume - 40.0).abs() < 1e-9);
        assert!(last.ph > 7.0);

        let at_ve = curve
            .points
            .iter()
            .find(|pt| (pt.volume - 20.0).abs() < 1e-9)
            .unwrap();
        assert_eq!(at_ve.ph, 7.0);
    }

    #[test]
    fn test_strong_curve_is_monotonic() {
        let curve = generate_curve(&params(TitrationType::StrongStrong), 0.25).unwrap();
        for pair in curve.points.windows(2) {
            assert!(pair[1].ph >= pair[0].ph - 1e-9);
        }
    }

    #[test]
    fn test_curve_is_clamped() {
        for kind in [TitrationType::StrongStrong, TitrationType::WeakStrong] {
            let p = TitrationParams {
                kind,
                acid_concentration: 12.0,
                acid_volume: 10.0,
                base_concentration: 12.0,
            };
            let curve = generate_curve(&p, 0.5).unwrap();
            assert!(curve.points.iter().all(|pt| (0.0..=14.0).contains(&pt.ph)));
            // 12 M strong acid would be pH < 0 before clamping
            if kind == TitrationType::StrongStrong {
                assert_eq!(curve.points[0].ph, 0.0);
            }
        }
    }

    #[test]
    fn test_weak_acid_landmarks() {
        let p = params(TitrationType::WeakStrong);
        // Initial pH of 0.1 M acetic acid is about 2.87
        assert!((p.ph_at(0.0) - 2.875).abs() < 0.01);
        // Half-equivalence: pH = pKa
        assert!((p.ph_at(10.0) - WEAK_ACID_PKA).abs() < 1e-9);
        // Equivalence point is basic
        let eq = p.equivalence_ph();
        assert!(eq > 8.0 && eq < 9.5);
        assert_eq!(p.ph_at(20.0), eq);
    }

    #[test]
    fn test_last_sample_pinned_to_double_ve() {
        let p = TitrationParams {
            kind: TitrationType::StrongStrong,
            acid_concentration: 0.1,
            acid_volume: 25.0,
            base_concentration: 0.15,
        };
        let curve = generate_curve(&p, 1.0).unwrap();
        let last = curve.points.last().unwrap();
        assert!((last.volume - 2.0 * curve.equivalence_volume).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_invalid_params() {
        let mut p = params(TitrationType::StrongStrong);
        p.base_concentration = 0.0;
        assert!(generate_curve(&p, 0.5).is_err());
        assert!(generate_curve(&params(TitrationType::StrongStrong), 0.0).is_err());
        assert!("strong-weak".parse::<TitrationType>().is_err());
    }

    #[test]
    fn test_rejects_oversized_ranges() {
        // Ve = 2e7 mL, far beyond the sample cap at the default step
        let mut p = params(TitrationType::StrongStrong);
        p.acid_volume = 2.0e7;
        let err = generate_curve(&p, DEFAULT_STEP_ML).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidInput);

        // Ve overflows to infinity; the step count saturates instead of wrapping
        let mut p = params(TitrationType::StrongStrong);
        p.acid_concentration = 1.0e300;
        p.acid_volume = 1.0e300;
        assert!(generate_curve(&p, DEFAULT_STEP_ML).is_err());
    }
}
