//! Equation balance checker
//!
//! Verifies atom conservation between the two sides of a reaction. It never
//! proposes coefficients.

use crate::elements;
use crate::error::{CalcError, Result};
use crate::formula::parse_formula;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// One species in a reaction, e.g. `2 H2O`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub coefficient: u32,
    pub formula: String,
}

impl Term {
    pub fn new(coefficient: u32, formula: impl Into<String>) -> Self {
        Self {
            coefficient,
            formula: formula.into(),
        }
    }
}

/// Atom counts for a single element on both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElementBalance {
    pub reactant_count: u64,
    pub product_count: u64,
    pub balanced: bool,
}

/// Result of a balance check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    pub is_balanced: bool,
    /// Every element seen on either side, in symbol order
    pub per_element: BTreeMap<String, ElementBalance>,
}

impl BalanceReport {
    /// Elements whose counts differ between sides
    pub fn unbalanced_elements(&self) -> Vec<&str> {
        self.per_element
            .iter()
            .filter(|(_, status)| !status.balanced)
            .map(|(symbol, _)| symbol.as_str())
            .collect()
    }
}

/// Total atoms per element for one side
///
/// Symbols missing from the periodic table are listed with a count of 0.
fn side_totals(terms: &[Term]) -> Result<BTreeMap<String, u64>> {
    let mut totals = BTreeMap::new();
    for term in terms {
        if term.coefficient == 0 {
            return Err(CalcError::invalid_input(format!(
                "Coefficient for {} must be a positive integer",
                term.formula
            )));
        }
        let composition = parse_formula(&term.formula)?;
        for (symbol, count) in composition {
            let atoms = if elements::by_symbol(&symbol).is_some() {
                u64::from(count) * u64::from(term.coefficient)
            } else {
                debug!(symbol = %symbol, "unknown element counted as 0");
                0
            };
            *totals.entry(symbol).or_insert(0u64) += atoms;
        }
    }
    Ok(totals)
}

/// Compare element counts between reactants and products
pub fn check_balance(reactants: &[Term], products: &[Term]) -> Result<BalanceReport> {
    if reactants.is_empty() || products.is_empty() {
        return Err(CalcError::invalid_input(
            "Both sides of the reaction need at least one species",
        ));
    }

    let left = side_totals(reactants)?;
    let right = side_totals(products)?;

    let symbols: BTreeSet<&String> = left.keys().chain(right.keys()).collect();
    let per_element: BTreeMap<String, ElementBalance> = symbols
        .into_iter()
        .map(|symbol| {
            let reactant_count = left.get(symbol).copied().unwrap_or(0);
            let product_count = right.get(symbol).copied().unwrap_or(0);
            (
                symbol.clone(),
                ElementBalance {
                    reactant_count,
                    product_count,
                    balanced: reactant_count == product_count,
                },
            )
        })
        .collect();

    let is_balanced = per_element.values().all(|status| status.balanced);
    debug!(
        is_balanced,
        elements = per_element.len(),
        "balance check"
    );

    Ok(BalanceReport {
        is_balanced,
        per_element,
    })
}

/// Parse one side of a reaction such as `2H2 + O2`
///
/// A missing leading coefficient means 1.
pub fn parse_reaction_side(side: &str) -> Result<Vec<Term>> {
    let re = Regex::new(r"^\s*(\d*)\s*(\S+)\s*$")
        .map_err(|e| CalcError::evaluation(format!("Regex error: {}", e)))?;

    side.split('+')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            let captures = re.captures(part).ok_or_else(|| {
                CalcError::invalid_input(format!("Cannot read reaction term '{}'", part.trim()))
            })?;
            let digits = captures.get(1).map(|m| m.as_str()).unwrap_or("");
            let coefficient = if digits.is_empty() {
                1
            } else {
                digits.parse::<u32>().map_err(|e| {
                    CalcError::invalid_input(format!("Invalid coefficient '{}': {}", digits, e))
                })?
            };
            let formula = captures
                .get(2)
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| CalcError::invalid_input("Reaction term has no formula"))?;
            Ok(Term {
                coefficient,
                formula,
            })
        })
        .collect()
}

/// Parse `reactants -> products` (also accepts `=` and `→`)
pub fn parse_reaction(equation: &str) -> Result<(Vec<Term>, Vec<Term>)> {
    let (left, right) = ["->", "→", "="]
        .iter()
        .find_map(|arrow| equation.split_once(arrow))
        .ok_or_else(|| {
            CalcError::invalid_input("Reaction needs an arrow ('->' or '=') between sides")
        })?;
    Ok((parse_reaction_side(left)?, parse_reaction_side(right)?))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_unbalanced_water_synthesis() {
        let reactants = vec![Term::new(1, "H2"), Term::new(1, "O2")];
        let products = vec![Term::new(2, "H2O")];

        let report = check_balance(&reactants, &products).unwrap();
        assert!(!report.is_balanced);
        assert_eq!(report.per_element["H"].reactant_count, 2);
        assert_eq!(report.per_element["H"].product_count, 4);
        assert!(report.per_element["O"].balanced);
        assert_eq!(report.unbalanced_elements(), vec!["H"]);
    }

    #[test]
    fn test_partial_balance() {
        let reactants = vec![Term::new(1, "H2"), Term::new(1, "O2")];
        let products = vec![Term::new(1, "H2O")];

        let report = check_balance(&reactants, &products).unwrap();
        assert!(!report.is_balanced);
        assert!(report.per_element["H"].balanced);
        assert!(!report.per_element["O"].balanced);
    }

    #[test]
    fn test_balanced_equation() {
        let (reactants, products) = parse_reaction("2H2 + O2 -> 2H2O").unwrap();
        assert_eq!(reactants[0], Term::new(2, "H2"));
        assert_eq!(reactants[1], Term::new(1, "O2"));
        assert!(check_balance(&reactants, &products).unwrap().is_balanced);
    }

    #[test]
    fn test_element_on_one_side_only() {
        let reactants = vec![Term::new(1, "NaCl")];
        let products = vec![Term::new(1, "Na")];
        let report = check_balance(&reactants, &products).unwrap();
        assert_eq!(report.per_element["Cl"].product_count, 0);
        assert!(!report.is_balanced);
    }

    #[test]
    fn test_unknown_symbols_count_as_zero() {
        let report = check_balance(&[Term::new(1, "Xx2")], &[Term::new(1, "Xx")]).unwrap();
        let status = report.per_element["Xx"];
        assert_eq!(status.reactant_count, 0);
        assert_eq!(status.product_count, 0);
        assert!(report.is_balanced);

        let report = check_balance(&[Term::new(1, "H2Qq")], &[Term::new(1, "H")]).unwrap();
        assert!(report.per_element["Qq"].balanced);
        assert!(!report.per_element["H"].balanced);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(check_balance(&[], &[Term::new(1, "H2")]).is_err());
        assert!(check_balance(&[Term::new(0, "H2")], &[Term::new(1, "H2")]).is_err());
        assert!(parse_reaction("H2 + O2").is_err());
    }
}
