//! Linear and quadratic equation solver
//!
//! Closed-form root finding with a human-readable derivation trace:
//! - Linear: `a·x + b = c`
//! - Quadratic: `a·x² + b·x + c = 0`, falling back to the linear solver when `a = 0`

use crate::error::{ensure_finite, Result};
use crate::format::{fmt_num, signed_term};
use serde::Serialize;
use tracing::debug;

/// Residual tolerance used when re-substituting a root
pub const VERIFY_EPSILON: f64 = 1e-4;

/// Outcome of solving `a·x + b = c`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LinearSolution {
    /// Exactly one root
    Unique { x: f64, steps: Vec<String> },
    /// `a = 0` and `b = c`: every x satisfies the equation
    Infinite { steps: Vec<String> },
    /// `a = 0` and `b ≠ c`: no x satisfies the equation
    NoSolution { steps: Vec<String> },
}

impl LinearSolution {
    pub fn steps(&self) -> &[String] {
        match self {
            Self::Unique { steps, .. } | Self::Infinite { steps } | Self::NoSolution { steps } => {
                steps
            },
        }
    }

    pub fn root(&self) -> Option<f64> {
        match self {
            Self::Unique { x, .. } => Some(*x),
            _ => None,
        }
    }
}

/// Roots of a quadratic, tagged by discriminant sign
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuadraticRoots {
    /// Δ > 0, `x1 < x2`
    TwoReal { x1: f64, x2: f64 },
    /// Δ = 0
    OneReal { x: f64 },
    /// Δ < 0, roots are `real ± imaginary·i`
    Complex { real: f64, imaginary: f64 },
    /// `a = 0`, solved as `b·x + c = 0`
    Linear { solution: LinearSolution },
}

impl QuadraticRoots {
    /// Discriminator string shown next to the result
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TwoReal { .. } => "two_real",
            Self::OneReal { .. } => "one_real",
            Self::Complex { .. } => "complex",
            Self::Linear { .. } => "linear",
        }
    }
}

/// Full quadratic result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadraticSolution {
    pub roots: QuadraticRoots,
    /// `b² - 4ac`, absent for the linear fallback
    pub discriminant: Option<f64>,
    /// Parabola vertex `(h, k)`, absent for the linear fallback
    pub vertex: Option<(f64, f64)>,
    pub steps: Vec<String>,
}

/// Solve `a·x + b = c`
pub fn solve_linear(a: f64, b: f64, c: f64) -> Result<LinearSolution> {
    ensure_finite("a", a)?;
    ensure_finite("b", b)?;
    ensure_finite("c", c)?;

    let mut steps = vec![format!("{}x {} = {}", fmt_num(a), signed_term(b), fmt_num(c))];

    if a == 0.0 {
        steps.push(format!("0 {} = {}", signed_term(b), fmt_num(c)));
        if b == c {
            steps.push("The statement is always true: infinite solutions".to_string());
            debug!(b, c, "linear identity");
            return Ok(LinearSolution::Infinite { steps });
        }
        steps.push("The statement is never true: no solution".to_string());
        debug!(b, c, "linear contradiction");
        return Ok(LinearSolution::NoSolution { steps });
    }

    let rhs = c - b;
    steps.push(format!(
        "Subtract {} from both sides: {}x = {}",
        fmt_num(b),
        fmt_num(a),
        fmt_num(rhs)
    ));
    let x = rhs / a;
    steps.push(format!(
        "Divide both sides by {}: x = {}",
        fmt_num(a),
        fmt_num(x)
    ));

    debug!(a, b, c, x, "linear");
    Ok(LinearSolution::Unique { x, steps })
}

/// Solve `a·x² + b·x + c = 0`
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Result<QuadraticSolution> {
    ensure_finite("a", a)?;
    ensure_finite("b", b)?;
    ensure_finite("c", c)?;

    if a == 0.0 {
        let solution = solve_linear(b, c, 0.0)?;
        let mut steps = vec!["a = 0, so the equation is linear".to_string()];
        steps.extend(solution.steps().iter().cloned());
        return Ok(QuadraticSolution {
            roots: QuadraticRoots::Linear { solution },
            discriminant: None,
            vertex: None,
            steps,
        });
    }

    let mut steps = vec![format!(
        "{}x² {}x {} = 0",
        fmt_num(a),
        signed_term(b),
        signed_term(c)
    )];

    let discriminant = b * b - 4.0 * a * c;
    steps.push(format!(
        "Δ = b² - 4ac = ({})² - 4·({})·({}) = {}",
        fmt_num(b),
        fmt_num(a),
        fmt_num(c),
        fmt_num(discriminant)
    ));

    let h = -b / (2.0 * a);
    let k = a * h * h + b * h + c;
    let denom = 2.0 * a;

    let roots = if discriminant > 0.0 {
        let sqrt_d = discriminant.sqrt();
        let r1 = (-b + sqrt_d) / denom;
        let r2 = (-b - sqrt_d) / denom;
        let (x1, x2) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };
        steps.push("Δ > 0: two distinct real roots".to_string());
        steps.push(format!(
            "x = (-b ± √Δ) / 2a = ({} ± {}) / {}",
            fmt_num(-b),
            fmt_num(sqrt_d),
            fmt_num(denom)
        ));
        steps.push(format!("x₁ = {}, x₂ = {}", fmt_num(x1), fmt_num(x2)));
        QuadraticRoots::TwoReal { x1, x2 }
    } else if discriminant == 0.0 {
        steps.push("Δ = 0: one repeated real root".to_string());
        steps.push(format!(
            "x = -b / 2a = {} / {} = {}",
            fmt_num(-b),
            fmt_num(denom),
            fmt_num(h)
        ));
        QuadraticRoots::OneReal { x: h }
    } else {
        let imaginary = ((-discriminant).sqrt() / denom).abs();
        steps.push("Δ < 0: complex conjugate roots".to_string());
        steps.push(format!(
            "x = (-b ± i√|Δ|) / 2a = {} ± {}i",
            fmt_num(h),
            fmt_num(imaginary)
        ));
        QuadraticRoots::Complex { real: h, imaginary }
    };

    debug!(a, b, c, discriminant, kind = roots.kind(), "quadratic");

    Ok(QuadraticSolution {
        roots,
        discriminant: Some(discriminant),
        vertex: Some((h, k)),
        steps,
    })
}

/// Check that `x` satisfies `a·x² + b·x + c = 0` within [`VERIFY_EPSILON`]
pub fn verify_root(a: f64, b: f64, c: f64, x: f64) -> bool {
    (a * x * x + b * x + c).abs() < VERIFY_EPSILON
}

/// Check that `x` satisfies `a·x + b = c` within [`VERIFY_EPSILON`]
pub fn verify_linear(a: f64, b: f64, c: f64, x: f64) -> bool {
    (a * x + b - c).abs() < VERIFY_EPSILON
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_unique() {
        let solution = solve_linear(2.0, 3.0, 7.0).unwrap();
        assert_eq!(solution.root(), Some(2.0));
        assert_eq!(solution.steps().len(), 3);
        assert_eq!(solution.steps()[0], "2x + 3 = 7");
        assert!(verify_linear(2.0, 3.0, 7.0, 2.0));
    }

    #[test]
    fn test_linear_degenerate() {
        assert!(matches!(
            solve_linear(0.0, 5.0, 5.0).unwrap(),
            LinearSolution::Infinite { .. }
        ));
        assert!(matches!(
            solve_linear(0.0, 5.0, 7.0).unwrap(),
            LinearSolution::NoSolution { .. }
        ));
    }

    #[test]
    fn test_quadratic_two_real() {
        let solution = solve_quadratic(1.0, -5.0, 6.0).unwrap();
        assert_eq!(solution.roots, QuadraticRoots::TwoReal { x1: 2.0, x2: 3.0 });
        assert_eq!(solution.roots.kind(), "two_real");
        assert_eq!(solution.discriminant, Some(1.0));
        assert!(verify_root(1.0, -5.0, 6.0, 2.0));
        assert!(verify_root(1.0, -5.0, 6.0, 3.0));
    }

    #[test]
    fn test_quadratic_one_real() {
        let solution = solve_quadratic(1.0, -4.0, 4.0).unwrap();
        assert_eq!(solution.roots, QuadraticRoots::OneReal { x: 2.0 });
        assert_eq!(solution.vertex, Some((2.0, 0.0)));
    }

    #[test]
    fn test_quadratic_complex() {
        let solution = solve_quadratic(1.0, 0.0, 1.0).unwrap();
        match solution.roots {
            QuadraticRoots::Complex { real, imaginary } => {
                assert_eq!(real, 0.0);
                assert_eq!(imaginary, 1.0);
            },
            other => panic!("expected complex roots, got {:?}", other),
        }
    }

    #[test]
    fn test_quadratic_negative_leading_coefficient() {
        // -x² + 5x - 6 = 0 has the same roots as x² - 5x + 6
        let solution = solve_quadratic(-1.0, 5.0, -6.0).unwrap();
        assert_eq!(solution.roots, QuadraticRoots::TwoReal { x1: 2.0, x2: 3.0 });
    }

    #[test]
    fn test_quadratic_linear_fallback() {
        // 0x² + 2x - 4 = 0 -> x = 2
        let solution = solve_quadratic(0.0, 2.0, -4.0).unwrap();
        assert_eq!(solution.roots.kind(), "linear");
        assert!(solution.discriminant.is_none());
        match solution.roots {
            QuadraticRoots::Linear { solution } => assert_eq!(solution.root(), Some(2.0)),
            other => panic!("expected linear fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_nan() {
        assert!(solve_quadratic(f64::NAN, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_serialized_tag() {
        let solution = solve_quadratic(1.0, -4.0, 4.0).unwrap();
        let json = serde_json::to_value(&solution.roots).unwrap();
        assert_eq!(json["type"], "one_real");
    }
}
