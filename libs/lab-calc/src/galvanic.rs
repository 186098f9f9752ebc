//! Galvanic cell potential calculator
//!
//! Standard reduction potentials (V, 25 °C) are kept in a static table ordered
//! by decreasing potential. Of two selected half-reactions the higher one is
//! reduced at the cathode and the lower one oxidized at the anode.

use crate::error::{ensure_positive, CalcError, Result};
use serde::Serialize;
use tracing::debug;

/// Faraday constant, C/mol
pub const FARADAY: f64 = 96485.0;

/// One reduction half-reaction `oxidized + n e⁻ → reduced`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HalfReaction {
    pub oxidized: &'static str,
    pub reduced: &'static str,
    /// Standard reduction potential in volts
    pub potential: f64,
}

const fn half(oxidized: &'static str, reduced: &'static str, potential: f64) -> HalfReaction {
    HalfReaction {
        oxidized,
        reduced,
        potential,
    }
}

/// Reference table, highest potential first
pub static STANDARD_POTENTIALS: [HalfReaction; 16] = [
    half("F2", "F-", 2.87),
    half("Au3+", "Au", 1.50),
    half("Cl2", "Cl-", 1.36),
    half("Ag+", "Ag", 0.80),
    half("Fe3+", "Fe2+", 0.77),
    half("Cu2+", "Cu", 0.34),
    half("2H+", "H2", 0.00),
    half("Pb2+", "Pb", -0.13),
    half("Sn2+", "Sn", -0.14),
    half("Ni2+", "Ni", -0.25),
    half("Fe2+", "Fe", -0.44),
    half("Zn2+", "Zn", -0.76),
    half("Al3+", "Al", -1.66),
    half("Mg2+", "Mg", -2.37),
    half("Na+", "Na", -2.71),
    half("Li+", "Li", -3.04),
];

/// Computed cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellResult {
    pub cathode: HalfReaction,
    pub anode: HalfReaction,
    /// E(cathode) - E(anode), never negative
    pub potential: f64,
    /// `reducedAnode/oxidizedAnode // oxidizedCathode/reducedCathode`
    pub notation: String,
    pub spontaneous: bool,
}

impl CellResult {
    /// Standard Gibbs energy ΔG° = -nFE in J/mol for `electrons` transferred
    pub fn gibbs_energy(&self, electrons: u32) -> Result<f64> {
        ensure_positive("electrons transferred", f64::from(electrons))?;
        Ok(-f64::from(electrons) * FARADAY * self.potential)
    }
}

fn half_reaction(index: usize) -> Result<HalfReaction> {
    STANDARD_POTENTIALS.get(index).copied().ok_or_else(|| {
        CalcError::invalid_input(format!(
            "Half-reaction index {} out of range (0..{})",
            index,
            STANDARD_POTENTIALS.len()
        ))
    })
}

/// Build a cell from two table indices
///
/// Selecting the same entry twice yields a 0 V cell with anode = cathode.
pub fn cell_potential(first: usize, second: usize) -> Result<CellResult> {
    let a = half_reaction(first)?;
    let b = half_reaction(second)?;

    let (cathode, anode) = if a.potential >= b.potential {
        (a, b)
    } else {
        (b, a)
    };
    let potential = cathode.potential - anode.potential;
    let notation = format!(
        "{}/{} // {}/{}",
        anode.reduced, anode.oxidized, cathode.oxidized, cathode.reduced
    );

    debug!(
        cathode = cathode.oxidized,
        anode = anode.reduced,
        potential,
        "galvanic cell"
    );

    Ok(CellResult {
        cathode,
        anode,
        potential,
        notation,
        spontaneous: potential > 0.0,
    })
}

/// Index of the half-reaction labelled `label`
///
/// Oxidized labels win over reduced ones, so `Fe2+` selects `Fe2+/Fe`
/// rather than `Fe3+/Fe2+`.
pub fn find_half_reaction(label: &str) -> Option<usize> {
    STANDARD_POTENTIALS
        .iter()
        .position(|h| h.oxidized == label)
        .or_else(|| STANDARD_POTENTIALS.iter().position(|h| h.reduced == label))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_descending() {
        for pair in STANDARD_POTENTIALS.windows(2) {
            assert!(pair[0].potential > pair[1].potential);
        }
    }

    #[test]
    fn test_daniell_cell() {
        let zn = find_half_reaction("Zn").unwrap();
        let cu = find_half_reaction("Cu").unwrap();

        // Order of selection does not matter
        for (x, y) in [(zn, cu), (cu, zn)] {
            let cell = cell_potential(x, y).unwrap();
            assert!((cell.potential - 1.10).abs() < 1e-9);
            assert_eq!(cell.cathode.reduced, "Cu");
            assert_eq!(cell.anode.reduced, "Zn");
            assert_eq!(cell.notation, "Zn/Zn2+ // Cu2+/Cu");
            assert!(cell.spontaneous);
        }
    }

    #[test]
    fn test_shared_label_prefers_oxidized_form() {
        let ferrous = find_half_reaction("Fe2+").unwrap();
        assert_eq!(STANDARD_POTENTIALS[ferrous].oxidized, "Fe2+");
        assert_eq!(STANDARD_POTENTIALS[ferrous].potential, -0.44);
        assert_eq!(find_half_reaction("Fe"), Some(ferrous));
        assert_eq!(STANDARD_POTENTIALS[find_half_reaction("Fe3+").unwrap()].reduced, "Fe2+");

        let cell = cell_potential(ferrous, find_half_reaction("Zn").unwrap()).unwrap();
        assert!((cell.potential - 0.32).abs() < 1e-9);
        assert_eq!(cell.notation, "Zn/Zn2+ // Fe2+/Fe");
        assert!(find_half_reaction("Xe").is_none());
    }

    #[test]
    fn test_identical_selection() {
        let cell = cell_potential(3, 3).unwrap();
        assert_eq!(cell.potential, 0.0);
        assert_eq!(cell.anode, cell.cathode);
        assert!(!cell.spontaneous);
    }

    #[test]
    fn test_gibbs_energy() {
        let cell = cell_potential(
            find_half_reaction("Zn").unwrap(),
            find_half_reaction("Cu").unwrap(),
        )
        .unwrap();
        let dg = cell.gibbs_energy(2).unwrap();
        assert!((dg + 212_267.0).abs() < 1.0);
        assert!(cell.gibbs_energy(0).is_err());
    }

    #[test]
    fn test_index_out_of_range() {
        assert!(cell_potential(0, 99).is_err());
    }
}
