//! Solution chemistry solvers
//!
//! Algebraic rearrangements of:
//! - Molarity: C = n / V
//! - Dilution: C1·V1 = C2·V2
//! - pH: pH = -log10[H+], pH + pOH = 14
//! - Conductivity: κ = Σ λᵢ·cᵢ

use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, CalcError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Molarity
// ============================================================================

/// Known values for C = n / V; exactly one must be `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MolarityInput {
    /// mol/L
    pub concentration: Option<f64>,
    /// mol
    pub moles: Option<f64>,
    /// L
    pub volume: Option<f64>,
}

/// All three quantities after solving
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Molarity {
    pub concentration: f64,
    pub moles: f64,
    pub volume: f64,
}

pub fn solve_molarity(input: MolarityInput) -> Result<Molarity> {
    let result = match (input.concentration, input.moles, input.volume) {
        (None, Some(n), Some(v)) => {
            ensure_non_negative("moles", n)?;
            ensure_positive("volume", v)?;
            Molarity {
                concentration: n / v,
                moles: n,
                volume: v,
            }
        },
        (Some(c), None, Some(v)) => {
            ensure_non_negative("concentration", c)?;
            ensure_non_negative("volume", v)?;
            Molarity {
                concentration: c,
                moles: c * v,
                volume: v,
            }
        },
        (Some(c), Some(n), None) => {
            ensure_non_negative("moles", n)?;
            ensure_finite("concentration", c)?;
            if c <= 0.0 {
                return Err(CalcError::degenerate(
                    "Concentration is zero, volume is undefined",
                ));
            }
            Molarity {
                concentration: c,
                moles: n,
                volume: n / c,
            }
        },
        _ => {
            return Err(CalcError::invalid_input(
                "Provide exactly two of concentration, moles and volume",
            ))
        },
    };

    debug!(?result, "molarity");
    Ok(result)
}

// ============================================================================
// Dilution
// ============================================================================

/// Known values for C1·V1 = C2·V2; exactly one must be `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DilutionInput {
    pub c1: Option<f64>,
    pub v1: Option<f64>,
    pub c2: Option<f64>,
    pub v2: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dilution {
    pub c1: f64,
    pub v1: f64,
    pub c2: f64,
    pub v2: f64,
}

pub fn solve_dilution(input: DilutionInput) -> Result<Dilution> {
    let known = [input.c1, input.v1, input.c2, input.v2];
    if known.iter().filter(|v| v.is_none()).count() != 1 {
        return Err(CalcError::invalid_input(
            "Provide exactly three of C1, V1, C2 and V2",
        ));
    }
    for value in known.iter().flatten() {
        ensure_non_negative("dilution quantity", *value)?;
    }

    let divide = |numerator: f64, denominator: f64, unknown: &str| -> Result<f64> {
        if denominator == 0.0 {
            Err(CalcError::degenerate(format!(
                "Cannot solve for {} with a zero denominator",
                unknown
            )))
        } else {
            Ok(numerator / denominator)
        }
    };

    let result = match (input.c1, input.v1, input.c2, input.v2) {
        (None, Some(v1), Some(c2), Some(v2)) => Dilution {
            c1: divide(c2 * v2, v1, "C1")?,
            v1,
            c2,
            v2,
        },
        (Some(c1), None, Some(c2), Some(v2)) => Dilution {
            c1,
            v1: divide(c2 * v2, c1, "V1")?,
            c2,
            v2,
        },
        (Some(c1), Some(v1), None, Some(v2)) => Dilution {
            c1,
            v1,
            c2: divide(c1 * v1, v2, "C2")?,
            v2,
        },
        (Some(c1), Some(v1), Some(c2), None) => Dilution {
            c1,
            v1,
            c2,
            v2: divide(c1 * v1, c2, "V2")?,
        },
        _ => {
            return Err(CalcError::invalid_input(
                "Provide exactly three of C1, V1, C2 and V2",
            ))
        },
    };

    debug!(?result, "dilution");
    Ok(result)
}

// ============================================================================
// pH
// ============================================================================

/// What the user measured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "from", content = "value", rename_all = "snake_case")]
pub enum PhInput {
    /// [H+] in mol/L
    Hydronium(f64),
    /// [OH-] in mol/L
    Hydroxide(f64),
    Ph(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Acidity {
    Acidic,
    Neutral,
    Basic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhResult {
    pub ph: f64,
    pub poh: f64,
    pub hydronium: f64,
    pub hydroxide: f64,
    pub acidity: Acidity,
}

/// Band around 7 reported as neutral
const NEUTRAL_BAND: f64 = 1e-6;

pub fn solve_ph(input: PhInput) -> Result<PhResult> {
    let ph = match input {
        PhInput::Hydronium(h) => -ensure_positive("[H+]", h)?.log10(),
        PhInput::Hydroxide(oh) => 14.0 + ensure_positive("[OH-]", oh)?.log10(),
        PhInput::Ph(ph) => ensure_finite("pH", ph)?,
    };
    let poh = 14.0 - ph;
    let acidity = if (ph - 7.0).abs() < NEUTRAL_BAND {
        Acidity::Neutral
    } else if ph < 7.0 {
        Acidity::Acidic
    } else {
        Acidity::Basic
    };

    Ok(PhResult {
        ph,
        poh,
        hydronium: 10f64.powf(-ph),
        hydroxide: 10f64.powf(-poh),
        acidity,
    })
}

// ============================================================================
// Conductivity
// ============================================================================

/// Limiting molar conductivities at 25 °C, S·cm²/mol
pub static ION_CONDUCTIVITY: [(&str, f64); 16] = [
    ("H+", 349.8),
    ("OH-", 198.6),
    ("Na+", 50.1),
    ("K+", 73.5),
    ("Li+", 38.7),
    ("NH4+", 73.5),
    ("Ag+", 61.9),
    ("Ca2+", 119.0),
    ("Mg2+", 106.0),
    ("Cl-", 76.3),
    ("Br-", 78.1),
    ("I-", 76.8),
    ("NO3-", 71.4),
    ("SO4^2-", 160.0),
    ("CH3COO-", 40.9),
    ("HCO3-", 44.5),
];

pub fn ion_conductivity(ion: &str) -> Option<f64> {
    ION_CONDUCTIVITY
        .iter()
        .find(|(name, _)| *name == ion)
        .map(|(_, lambda)| *lambda)
}

/// Contribution of one ion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IonContribution {
    pub ion: String,
    pub concentration: f64,
    pub molar_conductivity: f64,
    /// λ·c in mS/cm
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conductivity {
    /// κ in mS/cm
    pub total: f64,
    pub ions: Vec<IonContribution>,
}

/// κ = Σ λᵢ·cᵢ for `(ion, concentration mol/L)` pairs
///
/// With λ in S·cm²/mol and c in mol/L the sum comes out in mS/cm.
pub fn conductivity(ions: &[(String, f64)]) -> Result<Conductivity> {
    if ions.is_empty() {
        return Err(CalcError::invalid_input("No ions supplied"));
    }

    let ions = ions
        .iter()
        .map(|(ion, concentration)| {
            ensure_non_negative("ion concentration", *concentration)?;
            let lambda = ion_conductivity(ion)
                .ok_or_else(|| CalcError::invalid_input(format!("Unknown ion: {}", ion)))?;
            Ok(IonContribution {
                ion: ion.clone(),
                concentration: *concentration,
                molar_conductivity: lambda,
                contribution: lambda * concentration,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let total = ions.iter().map(|i| i.contribution).sum();
    Ok(Conductivity { total, ions })
}
