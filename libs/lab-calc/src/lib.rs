//! lab-calc - Scientific calculation library for the virtual lab tools
//!
//! Pure, synchronous calculators. Each takes plain numbers or strings and
//! returns a plain data structure; none of them performs I/O or keeps state.
//!
//! # Features
//!
//! - **Equations**: linear and quadratic roots with derivation steps
//! - **Chemistry**: formula parsing, molar mass, balance checking, galvanic cells,
//!   titration curves, molarity/dilution/pH/conductivity
//! - **Mathematics**: descriptive statistics, combinatorics, binomial and
//!   conditional probability, truth tables, set algebra
//! - **Physics**: projectile motion, friction dynamics, free-fall energy
//!
//! # Example
//!
//! ```rust
//! use lab_calc::equation::{solve_quadratic, QuadraticRoots};
//! use lab_calc::formula::formula_molar_mass;
//!
//! let solution = solve_quadratic(1.0, -5.0, 6.0).unwrap();
//! assert_eq!(solution.roots, QuadraticRoots::TwoReal { x1: 2.0, x2: 3.0 });
//!
//! let water = formula_molar_mass("H2O").unwrap();
//! assert!((water - 18.015).abs() < 0.01);
//! ```
//!
//! # Errors
//!
//! Every fallible calculator returns [`Result`]. [`CalcError::kind`] sorts a
//! failure into one of three categories:
//!
//! | Kind | Meaning |
//! |------|---------|
//! | `InvalidInput` | Malformed formula, empty dataset, out-of-domain parameter |
//! | `Degenerate` | Well-defined but non-standard result, e.g. P(B) = 0 |
//! | `Evaluation` | A logic expression could not be parsed or evaluated |

pub mod balance;
pub mod catalog;
pub mod elements;
pub mod equation;
pub mod error;
pub mod format;
pub mod formula;
pub mod galvanic;
pub mod logic;
pub mod mechanics;
pub mod probability;
pub mod sets;
pub mod solution;
pub mod statistics;
pub mod titration;

// Re-exports for convenience
pub use catalog::{Category, LabTool};
pub use error::{CalcError, ErrorKind, Result};
