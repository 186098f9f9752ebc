//! Lab tool catalog
//!
//! Closed set of calculators with their display metadata.

use crate::error::CalcError;
use serde::{Deserialize, Serialize};

/// Subject area a tool belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Chemistry,
    Physics,
    Mathematics,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chemistry => "chemistry",
            Self::Physics => "physics",
            Self::Mathematics => "mathematics",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One virtual lab calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabTool {
    EquationSolver,
    MolarMass,
    EquationBalance,
    GalvanicCell,
    Titration,
    SolutionChemistry,
    Statistics,
    TruthTable,
    SetOperations,
    Mechanics,
}

impl LabTool {
    pub const ALL: [LabTool; 10] = [
        Self::EquationSolver,
        Self::MolarMass,
        Self::EquationBalance,
        Self::GalvanicCell,
        Self::Titration,
        Self::SolutionChemistry,
        Self::Statistics,
        Self::TruthTable,
        Self::SetOperations,
        Self::Mechanics,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::EquationSolver => "equation-solver",
            Self::MolarMass => "molar-mass",
            Self::EquationBalance => "equation-balance",
            Self::GalvanicCell => "galvanic-cell",
            Self::Titration => "titration",
            Self::SolutionChemistry => "solution-chemistry",
            Self::Statistics => "statistics",
            Self::TruthTable => "truth-table",
            Self::SetOperations => "set-operations",
            Self::Mechanics => "mechanics",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::EquationSolver => "Linear & Quadratic Equation Solver",
            Self::MolarMass => "Molar Mass Calculator",
            Self::EquationBalance => "Equation Balance Checker",
            Self::GalvanicCell => "Galvanic Cell Potential",
            Self::Titration => "Titration Curve",
            Self::SolutionChemistry => "Molarity, Dilution, pH & Conductivity",
            Self::Statistics => "Statistics & Probability",
            Self::TruthTable => "Truth Tables & Equivalence",
            Self::SetOperations => "Set Operations",
            Self::Mechanics => "Kinematics, Dynamics & Energy",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::MolarMass
            | Self::EquationBalance
            | Self::GalvanicCell
            | Self::Titration
            | Self::SolutionChemistry => Category::Chemistry,
            Self::Mechanics => Category::Physics,
            Self::EquationSolver | Self::Statistics | Self::TruthTable | Self::SetOperations => {
                Category::Mathematics
            },
        }
    }

    /// Tools in one category, in catalog order
    pub fn in_category(category: Category) -> impl Iterator<Item = LabTool> {
        Self::ALL
            .into_iter()
            .filter(move |tool| tool.category() == category)
    }
}

impl std::fmt::Display for LabTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for LabTool {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.slug() == s)
            .ok_or_else(|| CalcError::invalid_input(format!("Unknown lab tool: '{}'", s)))
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for tool in LabTool::ALL {
            assert_eq!(tool.slug().parse::<LabTool>().unwrap(), tool);
        }
        assert!("flux-capacitor".parse::<LabTool>().is_err());
    }

    #[test]
    fn test_serde_matches_slug() {
        for tool in LabTool::ALL {
            let json = serde_json::to_value(tool).unwrap();
            assert_eq!(json, serde_json::Value::String(tool.slug().to_string()));
        }
    }

    #[test]
    fn test_categories_cover_catalog() {
        let total: usize = [Category::Chemistry, Category::Physics, Category::Mathematics]
            .into_iter()
            .map(|c| LabTool::in_category(c).count())
            .sum();
        assert_eq!(total, LabTool::ALL.len());
        assert_eq!(LabTool::Titration.category(), Category::Chemistry);
    }
}
