//! labkit - command-line front end for the virtual lab calculators
//!
//! Every calculator in `lab-calc` is a subcommand. Results print as text, or
//! as JSON with `--json`. Favorites and lesson progress are kept in the JSON
//! state file named by the `store.path` setting.

mod chemistry;
mod math;
mod output;
mod physics;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use common::{logging, LabConfig};
use lab_calc::{Category, LabTool};
use lab_session::JsonFileStateStore;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::output::{error_kind, error_message, heading, Output};

#[derive(Parser)]
#[command(name = "labkit")]
#[command(about = "Virtual lab calculators for chemistry, physics and mathematics")]
#[command(long_about = "Virtual lab calculators for chemistry, physics and mathematics

Examples:
  labkit quadratic 1 -5 6                    # Roots, discriminant, vertex
  labkit molar-mass C6H12O6                  # Molar mass and composition
  labkit balance \"2 H2 + O2 -> 2 H2O\"        # Atom conservation check
  labkit titration --ca 0.1 --va 20 --cb 0.1 # pH curve
  labkit truth-table \"p implies q\"           # Full truth table
  labkit --json stats \"4 8 15 16 23 42\"      # JSON output

Configuration is read from labkit.yaml (or --config / LABKIT_CONFIG) and
LABKIT_* environment variables; LABKIT_LOG sets the log filter.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file (default: labkit.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the lab tools
    List {
        /// Only tools in this category: chemistry, physics or mathematics
        #[arg(long)]
        category: Option<String>,
    },

    /// Show the effective configuration
    Config,

    // === Mathematics ===
    /// Solve a linear equation a·x + b = c
    Linear(math::LinearArgs),
    /// Solve a quadratic equation a·x² + b·x + c = 0
    Quadratic(math::QuadraticArgs),
    /// Descriptive statistics of a dataset
    Stats(math::StatsArgs),
    /// Factorial, permutations and combinations
    Combinatorics(math::CombinatoricsArgs),
    /// Binomial probability P(X = k)
    Binomial(math::BinomialArgs),
    /// Conditional probability P(A | B)
    Conditional(math::ConditionalArgs),
    /// Truth table of a propositional expression
    TruthTable(math::TruthTableArgs),
    /// Check two expressions for logical equivalence
    Equiv(math::EquivArgs),
    /// Union, intersection and differences of two sets
    Sets(math::SetsArgs),

    // === Chemistry ===
    /// Molar mass and percent composition
    MolarMass(chemistry::MolarMassArgs),
    /// Convert between mass, moles, STP volume and particles
    Moles(chemistry::MolesArgs),
    /// Check atom conservation in a reaction
    Balance(chemistry::BalanceArgs),
    /// Galvanic cell potential; without arguments lists the table
    Cell(chemistry::CellArgs),
    /// Acid-base titration curve
    Titration(chemistry::TitrationArgs),
    /// Solve C = n / V for the missing quantity
    Molarity(chemistry::MolarityArgs),
    /// Solve C1·V1 = C2·V2 for the missing quantity
    Dilution(chemistry::DilutionArgs),
    /// pH, pOH and ion concentrations
    Ph(chemistry::PhArgs),
    /// Solution conductivity from ion concentrations
    Conductivity(chemistry::ConductivityArgs),

    // === Physics ===
    /// Projectile trajectory
    Projectile(physics::ProjectileArgs),
    /// Force, friction and acceleration on a block
    Dynamics(physics::DynamicsArgs),
    /// Free-fall energy conservation
    Energy(physics::EnergyArgs),
    /// Animate a projectile launch in real time
    Playback(physics::PlaybackArgs),

    // === Session ===
    /// Manage favorite tools
    Favorites {
        #[command(subcommand)]
        command: session::FavoritesCommands,
    },
    /// Lesson progress
    Progress {
        #[command(subcommand)]
        command: session::ProgressCommands,
    },
}

#[derive(Serialize)]
struct ToolEntry {
    slug: &'static str,
    title: &'static str,
    category: Category,
}

fn parse_category(name: &str) -> Result<Category> {
    [Category::Chemistry, Category::Physics, Category::Mathematics]
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            lab_calc::CalcError::invalid_input(format!("Unknown category: {}", name)).into()
        })
}

fn list_tools(out: &Output, category: Option<&str>) -> Result<()> {
    let tools: Vec<LabTool> = match category {
        Some(name) => LabTool::in_category(parse_category(name)?).collect(),
        None => LabTool::ALL.to_vec(),
    };
    let entries: Vec<ToolEntry> = tools
        .iter()
        .map(|t| ToolEntry {
            slug: t.slug(),
            title: t.title(),
            category: t.category(),
        })
        .collect();

    out.emit(&entries, |entries| {
        let mut lines = vec![heading("Lab tools")];
        for e in entries {
            lines.push(format!(
                "  {:<20} {:<40} {}",
                e.slug.bright_yellow(),
                e.title,
                e.category.to_string().dimmed()
            ));
        }
        lines.join("\n")
    })
}

async fn run(cli: Cli) -> Result<()> {
    let config = LabConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging, cli.verbose, !cli.no_color)?;
    debug!(store = %config.store.path.display(), "configuration loaded");

    let out = Output::new(cli.json);
    match cli.command {
        Commands::List { category } => list_tools(&out, category.as_deref()),
        Commands::Config => {
            if out.is_json() {
                out.emit(&config, |_| String::new())
            } else {
                print!("{}", config.to_yaml()?);
                Ok(())
            }
        },

        Commands::Linear(args) => math::linear(&out, args),
        Commands::Quadratic(args) => math::quadratic(&out, args),
        Commands::Stats(args) => math::stats(&out, args),
        Commands::Combinatorics(args) => math::combinatorics(&out, args),
        Commands::Binomial(args) => math::binomial(&out, args),
        Commands::Conditional(args) => math::conditional(&out, args),
        Commands::TruthTable(args) => math::truth_table(&out, args),
        Commands::Equiv(args) => math::equiv(&out, args),
        Commands::Sets(args) => math::sets(&out, args),

        Commands::MolarMass(args) => chemistry::molar_mass_cmd(&out, args),
        Commands::Moles(args) => chemistry::moles(&out, args),
        Commands::Balance(args) => chemistry::balance(&out, args),
        Commands::Cell(args) => chemistry::cell(&out, args),
        Commands::Titration(args) => chemistry::titration(&out, args, config.titration.step_ml),
        Commands::Molarity(args) => chemistry::molarity(&out, args),
        Commands::Dilution(args) => chemistry::dilution(&out, args),
        Commands::Ph(args) => chemistry::ph(&out, args),
        Commands::Conductivity(args) => chemistry::conductivity(&out, args),

        Commands::Projectile(args) => physics::projectile(&out, args, &config.projectile),
        Commands::Dynamics(args) => physics::dynamics(&out, args),
        Commands::Energy(args) => physics::energy(&out, args),
        Commands::Playback(args) => physics::playback(&out, args, &config.playback).await,

        Commands::Favorites { command } => {
            let store = JsonFileStateStore::new(&config.store.path);
            session::favorites(&out, store, command).await
        },
        Commands::Progress { command } => {
            let store = JsonFileStateStore::new(&config.store.path);
            session::progress(&out, store, command).await
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{} {}",
                format!("[{}]", error_kind(&e)).red().bold(),
                error_message(&e)
            );
            ExitCode::FAILURE
        },
    }
}
