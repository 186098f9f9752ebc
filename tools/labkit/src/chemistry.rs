//! Chemistry commands

use anyhow::Result;
use clap::Args;
use colored::*;
use lab_calc::balance::{check_balance, parse_reaction, BalanceReport, Term};
use lab_calc::format::fmt_num;
use lab_calc::formula::{
    molar_mass, molar_mass_lenient, mole_conversion, parse_formula, percent_composition,
    Composition, ElementShare, MoleConversion, MoleInput,
};
use lab_calc::galvanic::{cell_potential, find_half_reaction, CellResult, STANDARD_POTENTIALS};
use lab_calc::solution::{
    conductivity as solve_conductivity, solve_dilution, solve_molarity, solve_ph, Conductivity,
    DilutionInput, MolarityInput, PhInput, PhResult,
};
use lab_calc::titration::{generate_curve, TitrationCurve, TitrationParams, TitrationType};
use lab_calc::CalcError;
use serde::Serialize;

use crate::output::{field, heading, quantity, yes_no, Output};

// ============================================================================
// Formula and moles
// ============================================================================

#[derive(Debug, Args)]
pub struct MolarMassArgs {
    /// Chemical formula, e.g. C6H12O6
    pub formula: String,

    /// Count unknown elements as zero mass instead of failing
    #[arg(long)]
    pub lenient: bool,
}

#[derive(Debug, Serialize)]
pub struct MolarMassReport {
    pub formula: String,
    pub composition: Composition,
    pub molar_mass: f64,
    pub shares: Vec<ElementShare>,
}

pub fn molar_mass_cmd(out: &Output, args: MolarMassArgs) -> Result<()> {
    let composition = parse_formula(&args.formula)?;
    let (mass, shares) = if args.lenient {
        (
            molar_mass_lenient(&composition),
            percent_composition(&composition).unwrap_or_default(),
        )
    } else {
        (molar_mass(&composition)?, percent_composition(&composition)?)
    };

    let report = MolarMassReport {
        formula: args.formula,
        composition,
        molar_mass: mass,
        shares,
    };
    out.emit(&report, render_molar_mass)
}

pub fn render_molar_mass(report: &MolarMassReport) -> String {
    let mut lines = vec![
        heading(&format!("Molar mass of {}", report.formula)),
        field("Molar mass", quantity(report.molar_mass, "g/mol")),
    ];
    for share in &report.shares {
        lines.push(format!(
            "  {:<4} ×{:<4} {:>10} g/mol {:>8} %",
            share.symbol,
            share.count,
            fmt_num(share.mass),
            fmt_num(share.percent)
        ));
    }
    lines.join("\n")
}

#[derive(Debug, Args)]
pub struct MolesArgs {
    /// Chemical formula used for the molar mass
    pub formula: String,

    /// Known quantity: mass (g), moles or volume (L at STP)
    #[arg(long, default_value = "mass")]
    pub from: MoleInput,

    /// Value of the known quantity
    pub value: f64,
}

pub fn moles(out: &Output, args: MolesArgs) -> Result<()> {
    let mass = molar_mass(&parse_formula(&args.formula)?)?;
    let conversion = mole_conversion(args.from, args.value, mass)?;
    out.emit(&conversion, |c| render_moles(&args.formula, c))
}

pub fn render_moles(formula: &str, c: &MoleConversion) -> String {
    [
        heading(&format!("Mole conversion for {}", formula)),
        field("Moles", quantity(c.moles, "mol")),
        field("Mass", quantity(c.mass_g, "g")),
        field("Volume at STP", quantity(c.volume_l, "L")),
        field("Particles", format!("{:.4e}", c.particles)),
    ]
    .join("\n")
}

// ============================================================================
// Balance and galvanic cells
// ============================================================================

#[derive(Debug, Args)]
pub struct BalanceArgs {
    /// Reaction such as "2 H2 + O2 -> 2 H2O"
    pub equation: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceOutput {
    pub reactants: Vec<Term>,
    pub products: Vec<Term>,
    #[serde(flatten)]
    pub report: BalanceReport,
}

pub fn balance(out: &Output, args: BalanceArgs) -> Result<()> {
    let (reactants, products) = parse_reaction(&args.equation)?;
    let report = check_balance(&reactants, &products)?;
    out.emit(
        &BalanceOutput {
            reactants,
            products,
            report,
        },
        render_balance,
    )
}

pub fn render_balance(output: &BalanceOutput) -> String {
    let verdict = if output.report.is_balanced {
        "Balanced".green().bold()
    } else {
        "Not balanced".red().bold()
    };
    let mut lines = vec![verdict.to_string()];
    for (symbol, counts) in &output.report.per_element {
        let mark = if counts.balanced { "✓".green() } else { "✗".red() };
        lines.push(format!(
            "  {} {:<3} {} → {}",
            mark, symbol, counts.reactant_count, counts.product_count
        ));
    }
    lines.join("\n")
}

#[derive(Debug, Args)]
pub struct CellArgs {
    /// First half-reaction: table index or species label (Cu2+, Zn, ...)
    pub first: Option<String>,

    /// Second half-reaction
    pub second: Option<String>,

    /// Electrons transferred, for ΔG°
    #[arg(short = 'n', long)]
    pub electrons: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CellReport {
    #[serde(flatten)]
    pub cell: CellResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gibbs_energy: Option<f64>,
}

fn half_reaction_index(selector: &str) -> Result<usize, CalcError> {
    if let Ok(index) = selector.parse::<usize>() {
        return Ok(index);
    }
    find_half_reaction(selector)
        .ok_or_else(|| CalcError::invalid_input(format!("Unknown half-reaction: {}", selector)))
}

pub fn cell(out: &Output, args: CellArgs) -> Result<()> {
    let (first, second) = match (args.first, args.second) {
        (None, None) => return out.emit(&STANDARD_POTENTIALS, |table| render_potentials(table)),
        (Some(first), Some(second)) => (first, second),
        _ => return Err(CalcError::invalid_input("Select two half-reactions").into()),
    };

    let cell = cell_potential(half_reaction_index(&first)?, half_reaction_index(&second)?)?;
    let gibbs_energy = args
        .electrons
        .map(|n| cell.gibbs_energy(n))
        .transpose()?;
    out.emit(&CellReport { cell, gibbs_energy }, render_cell)
}

pub fn render_potentials(table: &[lab_calc::galvanic::HalfReaction]) -> String {
    let mut lines = vec![heading("Standard reduction potentials")];
    for (i, h) in table.iter().enumerate() {
        lines.push(format!(
            "  {:>2}  {:>5} + e⁻ → {:<4} {:>6} V",
            i,
            h.oxidized,
            h.reduced,
            format!("{:+.2}", h.potential)
        ));
    }
    lines.join("\n")
}

pub fn render_cell(report: &CellReport) -> String {
    let c = &report.cell;
    let mut lines = vec![
        heading("Galvanic cell"),
        field("Cell notation", &c.notation),
        field(
            "Cathode",
            format!("{}/{} ({} V)", c.cathode.oxidized, c.cathode.reduced, fmt_num(c.cathode.potential)),
        ),
        field(
            "Anode",
            format!("{}/{} ({} V)", c.anode.reduced, c.anode.oxidized, fmt_num(c.anode.potential)),
        ),
        field("E°cell", quantity(c.potential, "V")),
        field("Spontaneous", yes_no(c.spontaneous)),
    ];
    if let Some(g) = report.gibbs_energy {
        lines.push(field("ΔG°", quantity(g / 1000.0, "kJ/mol")));
    }
    lines.join("\n")
}

// ============================================================================
// Titration
// ============================================================================

#[derive(Debug, Args)]
pub struct TitrationArgs {
    /// strong-strong or weak-strong
    #[arg(long, default_value = "strong-strong")]
    pub kind: TitrationType,

    /// Acid concentration, mol/L
    #[arg(long = "ca")]
    pub acid_concentration: f64,

    /// Acid volume, mL
    #[arg(long = "va")]
    pub acid_volume: f64,

    /// Base concentration, mol/L
    #[arg(long = "cb")]
    pub base_concentration: f64,

    /// Volume step, mL (default from config)
    #[arg(long)]
    pub step: Option<f64>,
}

pub fn titration(out: &Output, args: TitrationArgs, default_step: f64) -> Result<()> {
    let params = TitrationParams {
        kind: args.kind,
        acid_concentration: args.acid_concentration,
        acid_volume: args.acid_volume,
        base_concentration: args.base_concentration,
    };
    let curve = generate_curve(&params, args.step.unwrap_or(default_step))?;
    out.emit(&curve, render_titration)
}

pub fn render_titration(curve: &TitrationCurve) -> String {
    let mut lines = vec![
        heading("Titration curve"),
        field("Equivalence volume", quantity(curve.equivalence_volume, "mL")),
        field("pH at equivalence", fmt_num(curve.equivalence_ph)),
        field("Half-equivalence", quantity(curve.half_equivalence_volume, "mL")),
        format!("  {:>10} {:>8}", "base (mL)", "pH"),
    ];
    for point in &curve.points {
        lines.push(format!(
            "  {:>10} {:>8}",
            fmt_num(point.volume),
            format!("{:.2}", point.ph)
        ));
    }
    lines.join("\n")
}

// ============================================================================
// Solutions
// ============================================================================

/// Give any two of the three quantities
#[derive(Debug, Args)]
pub struct MolarityArgs {
    /// Concentration, mol/L
    #[arg(long)]
    pub concentration: Option<f64>,
    /// Amount, mol
    #[arg(long)]
    pub moles: Option<f64>,
    /// Volume, L
    #[arg(long)]
    pub volume: Option<f64>,
}

pub fn molarity(out: &Output, args: MolarityArgs) -> Result<()> {
    let result = solve_molarity(MolarityInput {
        concentration: args.concentration,
        moles: args.moles,
        volume: args.volume,
    })?;
    out.emit(&result, |m| {
        [
            heading("Molarity"),
            field("Concentration", quantity(m.concentration, "mol/L")),
            field("Moles", quantity(m.moles, "mol")),
            field("Volume", quantity(m.volume, "L")),
        ]
        .join("\n")
    })
}

/// Give any three of C1, V1, C2, V2
#[derive(Debug, Args)]
pub struct DilutionArgs {
    #[arg(long)]
    pub c1: Option<f64>,
    #[arg(long)]
    pub v1: Option<f64>,
    #[arg(long)]
    pub c2: Option<f64>,
    #[arg(long)]
    pub v2: Option<f64>,
}

pub fn dilution(out: &Output, args: DilutionArgs) -> Result<()> {
    let result = solve_dilution(DilutionInput {
        c1: args.c1,
        v1: args.v1,
        c2: args.c2,
        v2: args.v2,
    })?;
    out.emit(&result, |d| {
        [
            heading("Dilution C1·V1 = C2·V2"),
            field("C1", fmt_num(d.c1)),
            field("V1", fmt_num(d.v1)),
            field("C2", fmt_num(d.c2)),
            field("V2", fmt_num(d.v2)),
        ]
        .join("\n")
    })
}

/// Give exactly one of --hydronium, --hydroxide, --ph
#[derive(Debug, Args)]
pub struct PhArgs {
    /// [H3O+], mol/L
    #[arg(long)]
    pub hydronium: Option<f64>,
    /// [OH-], mol/L
    #[arg(long)]
    pub hydroxide: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub ph: Option<f64>,
}

impl PhArgs {
    fn input(&self) -> Result<PhInput, CalcError> {
        match (self.hydronium, self.hydroxide, self.ph) {
            (Some(h), None, None) => Ok(PhInput::Hydronium(h)),
            (None, Some(oh), None) => Ok(PhInput::Hydroxide(oh)),
            (None, None, Some(ph)) => Ok(PhInput::Ph(ph)),
            _ => Err(CalcError::invalid_input(
                "Give exactly one of --hydronium, --hydroxide, --ph",
            )),
        }
    }
}

pub fn ph(out: &Output, args: PhArgs) -> Result<()> {
    let result = solve_ph(args.input()?)?;
    out.emit(&result, render_ph)
}

pub fn render_ph(r: &PhResult) -> String {
    [
        heading("pH"),
        field("pH", fmt_num(r.ph)),
        field("pOH", fmt_num(r.poh)),
        field("[H3O+]", format!("{:.4e} mol/L", r.hydronium)),
        field("[OH-]", format!("{:.4e} mol/L", r.hydroxide)),
        field("Solution", format!("{:?}", r.acidity).to_lowercase()),
    ]
    .join("\n")
}

#[derive(Debug, Args)]
pub struct ConductivityArgs {
    /// Ion concentrations as ION=MOL_PER_L, e.g. Na+=0.1 Cl-=0.1
    #[arg(required = true)]
    pub ions: Vec<String>,
}

fn parse_ion(spec: &str) -> Result<(String, f64), CalcError> {
    let (ion, value) = spec
        .rsplit_once('=')
        .ok_or_else(|| CalcError::invalid_input(format!("Expected ION=VALUE, got '{}'", spec)))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| CalcError::invalid_input(format!("Bad concentration for {}: {}", ion, e)))?;
    Ok((ion.trim().to_string(), value))
}

pub fn conductivity(out: &Output, args: ConductivityArgs) -> Result<()> {
    let ions = args
        .ions
        .iter()
        .map(|spec| parse_ion(spec))
        .collect::<Result<Vec<_>, _>>()?;
    let result = solve_conductivity(&ions)?;
    out.emit(&result, render_conductivity)
}

pub fn render_conductivity(c: &Conductivity) -> String {
    let mut lines = vec![heading("Conductivity κ = Σ λ·c")];
    for ion in &c.ions {
        lines.push(format!(
            "  {:<8} {:>8} mol/L × {:>6} = {:>8} mS/cm",
            ion.ion,
            fmt_num(ion.concentration),
            fmt_num(ion.molar_conductivity),
            fmt_num(ion.contribution)
        ));
    }
    lines.push(field("Total", quantity(c.total, "mS/cm")));
    lines.join("\n")
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_half_reaction_selector() {
        assert_eq!(half_reaction_index("3").unwrap(), 3);
        let zinc = half_reaction_index("Zn").unwrap();
        assert_eq!(STANDARD_POTENTIALS[zinc].reduced, "Zn");
        assert!(half_reaction_index("Xx").is_err());

        let ferrous = half_reaction_index("Fe2+").unwrap();
        assert_eq!(STANDARD_POTENTIALS[ferrous].reduced, "Fe");
    }

    #[test]
    fn test_parse_ion() {
        assert_eq!(parse_ion("Na+=0.1").unwrap(), ("Na+".to_string(), 0.1));
        assert_eq!(parse_ion(" SO4^2- = 0.05 ").unwrap().0, "SO4^2-");
        assert!(parse_ion("Na+").is_err());
        assert!(parse_ion("Na+=lots").is_err());
    }

    #[test]
    fn test_ph_args_exclusive() {
        let args = PhArgs {
            hydronium: Some(1e-3),
            hydroxide: None,
            ph: Some(3.0),
        };
        assert!(args.input().is_err());

        let args = PhArgs {
            hydronium: None,
            hydroxide: None,
            ph: Some(3.0),
        };
        assert_eq!(args.input().unwrap(), PhInput::Ph(3.0));
    }

    #[test]
    fn test_render_balance() {
        colored::control::set_override(false);
        let (reactants, products) = parse_reaction("2 H2 + O2 -> 2 H2O").unwrap();
        let report = check_balance(&reactants, &products).unwrap();
        let text = render_balance(&BalanceOutput {
            reactants,
            products,
            report,
        });
        assert!(text.starts_with("Balanced"));
        assert!(text.contains("H   4 → 4"));
    }

    #[test]
    fn test_render_molar_mass() {
        colored::control::set_override(false);
        let composition = parse_formula("NaCl").unwrap();
        let report = MolarMassReport {
            formula: "NaCl".to_string(),
            molar_mass: molar_mass(&composition).unwrap(),
            shares: percent_composition(&composition).unwrap(),
            composition,
        };
        let text = render_molar_mass(&report);
        assert!(text.contains("58.443 g/mol"));
    }
}
