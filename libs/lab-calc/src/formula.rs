//! Chemical formula parser and molar mass calculator
//!
//! Formulas are tokenized greedily as `([A-Z][a-z]?)(\d*)`. Anything that is not
//! an element token (parentheses, charges, hydrate dots) is skipped.

use crate::elements;
use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, CalcError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Molar volume of an ideal gas at STP, L/mol
pub const MOLAR_VOLUME_STP: f64 = 22.4;

/// Avogadro constant, particles/mol
pub const AVOGADRO: f64 = 6.022e23;

/// Element symbol to atom count
pub type Composition = BTreeMap<String, u32>;

/// Parse a formula string into element counts
///
/// Returns `InvalidInput` when no element token is found (e.g. empty string).
pub fn parse_formula(formula: &str) -> Result<Composition> {
    let re = Regex::new(r"([A-Z][a-z]?)(\d*)")
        .map_err(|e| CalcError::evaluation(format!("Regex error: {}", e)))?;

    let mut composition = Composition::new();
    for captures in re.captures_iter(formula) {
        let symbol = match captures.get(1) {
            Some(m) => m.as_str(),
            None => continue,
        };
        let count = captures
            .get(2)
            .map(|m| m.as_str())
            .filter(|digits| !digits.is_empty())
            .map(|digits| {
                digits.parse::<u32>().map_err(|e| {
                    CalcError::invalid_input(format!("Invalid count '{}': {}", digits, e))
                })
            })
            .transpose()?
            .unwrap_or(1)
            .max(1);

        trace!(symbol, count, "formula token");
        let entry = composition.entry(symbol.to_string()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    if composition.is_empty() {
        return Err(CalcError::invalid_input(format!(
            "No element symbols found in formula '{}'",
            formula
        )));
    }

    Ok(composition)
}

/// Sum of atomic masses, g/mol
///
/// Fails with `InvalidInput` naming the first element missing from the table.
pub fn molar_mass(composition: &Composition) -> Result<f64> {
    let mut total = 0.0;
    for (symbol, count) in composition {
        let mass = elements::atomic_mass(symbol)
            .ok_or_else(|| CalcError::invalid_input(format!("Unknown element: {}", symbol)))?;
        total += mass * f64::from(*count);
    }
    Ok(total)
}

/// Molar mass that yields 0 for any unknown element instead of failing
pub fn molar_mass_lenient(composition: &Composition) -> f64 {
    molar_mass(composition).unwrap_or_else(|e| {
        debug!(error = %e, "molar mass lookup miss, reporting 0");
        0.0
    })
}

/// Parse and weigh in one step
pub fn formula_molar_mass(formula: &str) -> Result<f64> {
    molar_mass(&parse_formula(formula)?)
}

/// Mass contribution of one element to a compound
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementShare {
    pub symbol: String,
    pub count: u32,
    /// count × atomic mass, g/mol
    pub mass: f64,
    /// Share of the total molar mass, 0..=100
    pub percent: f64,
}

/// Mass percent per element, in symbol order
pub fn percent_composition(composition: &Composition) -> Result<Vec<ElementShare>> {
    let total = molar_mass(composition)?;
    if total <= 0.0 {
        return Err(CalcError::degenerate("Compound has zero molar mass"));
    }

    composition
        .iter()
        .map(|(symbol, count)| {
            let mass = elements::atomic_mass(symbol)
                .ok_or_else(|| CalcError::invalid_input(format!("Unknown element: {}", symbol)))?
                * f64::from(*count);
            Ok(ElementShare {
                symbol: symbol.clone(),
                count: *count,
                mass,
                percent: mass / total * 100.0,
            })
        })
        .collect()
}

/// Which quantity the user supplied to the mole converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoleInput {
    /// Mass in grams
    Mass,
    /// Amount in moles
    Moles,
    /// Gas volume at STP in litres
    Volume,
}

impl std::str::FromStr for MoleInput {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mass" => Ok(Self::Mass),
            "moles" | "mol" => Ok(Self::Moles),
            "volume" => Ok(Self::Volume),
            other => Err(CalcError::invalid_input(format!(
                "Invalid mole input mode '{}', expected mass, moles or volume",
                other
            ))),
        }
    }
}

/// Every quantity derivable from one known amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoleConversion {
    pub moles: f64,
    pub mass_g: f64,
    pub volume_l: f64,
    pub particles: f64,
}

/// Convert between mass, moles, STP volume and particle count
pub fn mole_conversion(mode: MoleInput, value: f64, molar_mass: f64) -> Result<MoleConversion> {
    ensure_non_negative("value", value)?;
    ensure_positive("molar mass", molar_mass)?;

    let moles = match mode {
        MoleInput::Mass => value / molar_mass,
        MoleInput::Moles => value,
        MoleInput::Volume => value / MOLAR_VOLUME_STP,
    };
    ensure_finite("moles", moles)?;

    Ok(MoleConversion {
        moles,
        mass_g: moles * molar_mass,
        volume_l: moles * MOLAR_VOLUME_STP,
        particles: moles * AVOGADRO,
    })
}
