//! Mathematics commands: equations, statistics, probability, logic, sets

use anyhow::Result;
use clap::Args;
use colored::*;
use lab_calc::equation::{
    solve_linear, solve_quadratic, LinearSolution, QuadraticRoots, QuadraticSolution,
};
use lab_calc::format::fmt_num;
use lab_calc::logic::{build_truth_table, check_equivalence, Equivalence, RowResult, TruthTable};
use lab_calc::probability::{
    binomial_probability, combinations, conditional_probability, factorial, permutations,
};
use lab_calc::sets::{render, SetAlgebra};
use lab_calc::statistics::{frequency_table, parse_dataset, summarize, FrequencyRow, Summary};
use serde::Serialize;

use crate::output::{field, heading, steps, yes_no, Output};

// ============================================================================
// Equations
// ============================================================================

/// Solve a·x + b = c
#[derive(Debug, Args)]
pub struct LinearArgs {
    #[arg(allow_negative_numbers = true)]
    pub a: f64,
    #[arg(allow_negative_numbers = true)]
    pub b: f64,
    #[arg(allow_negative_numbers = true)]
    pub c: f64,
}

/// Solve a·x² + b·x + c = 0
#[derive(Debug, Args)]
pub struct QuadraticArgs {
    #[arg(allow_negative_numbers = true)]
    pub a: f64,
    #[arg(allow_negative_numbers = true)]
    pub b: f64,
    #[arg(allow_negative_numbers = true)]
    pub c: f64,
}

pub fn linear(out: &Output, args: LinearArgs) -> Result<()> {
    let solution = solve_linear(args.a, args.b, args.c)?;
    out.emit(&solution, render_linear)
}

pub fn quadratic(out: &Output, args: QuadraticArgs) -> Result<()> {
    let solution = solve_quadratic(args.a, args.b, args.c)?;
    out.emit(&solution, render_quadratic)
}

fn linear_verdict(solution: &LinearSolution) -> String {
    match solution {
        LinearSolution::Unique { x, .. } => format!("x = {}", fmt_num(*x)),
        LinearSolution::Infinite { .. } => "infinitely many solutions".to_string(),
        LinearSolution::NoSolution { .. } => "no solution".to_string(),
    }
}

pub fn render_linear(solution: &LinearSolution) -> String {
    format!(
        "{}\n{}\n{}",
        heading("Linear equation"),
        steps(solution.steps()),
        field("Result", linear_verdict(solution))
    )
}

pub fn render_quadratic(solution: &QuadraticSolution) -> String {
    let mut lines = vec![heading("Quadratic equation"), steps(&solution.steps)];
    if let Some(d) = solution.discriminant {
        lines.push(field("Discriminant", fmt_num(d)));
    }
    let roots = match &solution.roots {
        QuadraticRoots::TwoReal { x1, x2 } => {
            format!("x1 = {}, x2 = {}", fmt_num(*x1), fmt_num(*x2))
        },
        QuadraticRoots::OneReal { x } => format!("x = {} (double root)", fmt_num(*x)),
        QuadraticRoots::Complex { real, imaginary } => {
            format!("x = {} ± {}i", fmt_num(*real), fmt_num(*imaginary))
        },
        QuadraticRoots::Linear { solution } => format!("a = 0, {}", linear_verdict(solution)),
    };
    lines.push(field("Roots", roots));
    if let Some((h, k)) = solution.vertex {
        lines.push(field("Vertex", format!("({}, {})", fmt_num(h), fmt_num(k))));
    }
    lines.join("\n")
}

// ============================================================================
// Statistics and probability
// ============================================================================

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Numbers separated by commas, semicolons or whitespace
    pub data: String,

    /// Also print the frequency table
    #[arg(short, long)]
    pub frequency: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Vec<FrequencyRow>>,
}

pub fn stats(out: &Output, args: StatsArgs) -> Result<()> {
    let values = parse_dataset(&args.data)?;
    let summary = summarize(&values)?;
    let frequency = if args.frequency {
        Some(frequency_table(&values)?)
    } else {
        None
    };
    out.emit(&StatsReport { summary, frequency }, render_stats)
}

fn optional(value: Option<f64>) -> String {
    value.map(fmt_num).unwrap_or_else(|| "n/a".to_string())
}

pub fn render_stats(report: &StatsReport) -> String {
    let s = &report.summary;
    let mode: Vec<String> = s.mode.iter().map(|v| fmt_num(*v)).collect();
    let mut lines = vec![
        heading("Descriptive statistics"),
        field("Count", s.count),
        field("Sum", fmt_num(s.sum)),
        field("Min / Max", format!("{} / {}", fmt_num(s.min), fmt_num(s.max))),
        field("Range", fmt_num(s.range)),
        field("Mean", fmt_num(s.mean)),
        field("Median", fmt_num(s.median)),
        field("Mode", mode.join(", ")),
        field("Population variance", fmt_num(s.population_variance)),
        field("Population std dev", fmt_num(s.population_std_dev)),
        field("Sample variance", optional(s.sample_variance)),
        field("Sample std dev", optional(s.sample_std_dev)),
    ];

    if let Some(rows) = &report.frequency {
        lines.push(String::new());
        lines.push(heading("Frequency table"));
        lines.push(format!(
            "  {:>10} {:>6} {:>10} {:>6}",
            "value", "freq", "relative", "cum"
        ));
        for row in rows {
            lines.push(format!(
                "  {:>10} {:>6} {:>10} {:>6}",
                fmt_num(row.value),
                row.frequency,
                fmt_num(row.relative),
                row.cumulative
            ));
        }
    }
    lines.join("\n")
}

#[derive(Debug, Args)]
pub struct CombinatoricsArgs {
    /// Number of items
    pub n: u64,
    /// Items chosen
    pub r: u64,
}

#[derive(Debug, Serialize)]
pub struct CombinatoricsReport {
    pub n: u64,
    pub r: u64,
    /// n!, absent when it overflows
    pub n_factorial: Option<u128>,
    pub permutations: u128,
    pub combinations: u128,
}

pub fn combinatorics(out: &Output, args: CombinatoricsArgs) -> Result<()> {
    let report = CombinatoricsReport {
        n: args.n,
        r: args.r,
        n_factorial: factorial(args.n).ok(),
        permutations: permutations(args.n, args.r)?,
        combinations: combinations(args.n, args.r)?,
    };
    out.emit(&report, |r| {
        [
            heading("Combinatorics"),
            field(
                "n!",
                r.n_factorial
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "overflow".to_string()),
            ),
            field(&format!("P({}, {})", r.n, r.r), r.permutations),
            field(&format!("C({}, {})", r.n, r.r), r.combinations),
        ]
        .join("\n")
    })
}

#[derive(Debug, Args)]
pub struct BinomialArgs {
    /// Trials
    pub n: u64,
    /// Successes
    pub k: u64,
    /// Success probability per trial
    pub p: f64,
}

#[derive(Debug, Serialize)]
pub struct ProbabilityReport {
    pub expression: String,
    pub probability: f64,
}

fn render_probability(report: &ProbabilityReport) -> String {
    field(&report.expression, fmt_num(report.probability))
}

pub fn binomial(out: &Output, args: BinomialArgs) -> Result<()> {
    let probability = binomial_probability(args.n, args.k, args.p)?;
    let report = ProbabilityReport {
        expression: format!("P(X = {}), n = {}, p = {}", args.k, args.n, fmt_num(args.p)),
        probability,
    };
    out.emit(&report, render_probability)
}

#[derive(Debug, Args)]
pub struct ConditionalArgs {
    /// P(A ∩ B)
    pub p_a_and_b: f64,
    /// P(B)
    pub p_b: f64,
}

pub fn conditional(out: &Output, args: ConditionalArgs) -> Result<()> {
    let probability = conditional_probability(args.p_a_and_b, args.p_b)?;
    let report = ProbabilityReport {
        expression: "P(A | B)".to_string(),
        probability,
    };
    out.emit(&report, render_probability)
}

// ============================================================================
// Logic
// ============================================================================

#[derive(Debug, Args)]
pub struct TruthTableArgs {
    /// Expression, e.g. "(p implies q) and p"
    pub expr: String,
}

#[derive(Debug, Args)]
pub struct EquivArgs {
    pub left: String,
    pub right: String,
}

pub fn truth_table(out: &Output, args: TruthTableArgs) -> Result<()> {
    let table = build_truth_table(&args.expr)?;
    out.emit(&table, |t| render_truth_table(&args.expr, t))
}

fn bit(value: bool) -> &'static str {
    if value {
        "T"
    } else {
        "F"
    }
}

pub fn render_truth_table(expr: &str, table: &TruthTable) -> String {
    let mut lines = vec![heading(&format!("Truth table: {}", expr))];
    let mut header: Vec<String> = table.variables.iter().map(|v| format!("{:^5}", v)).collect();
    header.push("| result".to_string());
    lines.push(format!("  {}", header.join("")));

    for row in &table.rows {
        let cells: String = row
            .assignment
            .iter()
            .map(|value| format!("{:^5}", bit(*value)))
            .collect();
        let result = match &row.result {
            RowResult::Value(v) => bit(*v).to_string(),
            RowResult::Error(message) => format!("error: {}", message).red().to_string(),
        };
        lines.push(format!("  {}| {}", cells, result));
    }

    let classification = table
        .classification
        .map(|c| format!("{:?}", c).to_lowercase())
        .unwrap_or_else(|| "undetermined".to_string());
    lines.push(field("Classification", classification));
    lines.join("\n")
}

pub fn equiv(out: &Output, args: EquivArgs) -> Result<()> {
    let result = check_equivalence(&args.left, &args.right)?;
    out.emit(&result, render_equivalence)
}

pub fn render_equivalence(result: &Equivalence) -> String {
    match result {
        Equivalence::Equivalent {
            variables,
            rows_checked,
        } => format!(
            "{} over {} ({} rows)",
            "Equivalent".green().bold(),
            variables.join(", "),
            rows_checked
        ),
        Equivalence::NotEquivalent {
            counterexample,
            left,
            right,
        } => {
            let assignment: Vec<String> = counterexample
                .iter()
                .map(|(name, value)| format!("{}={}", name, bit(*value)))
                .collect();
            format!(
                "{}\n{}\n{}",
                "Not equivalent".red().bold(),
                field("Counterexample", assignment.join(" ")),
                field("Left / Right", format!("{} / {}", bit(*left), bit(*right)))
            )
        },
    }
}

// ============================================================================
// Sets
// ============================================================================

#[derive(Debug, Args)]
pub struct SetsArgs {
    /// Set A, comma separated
    pub a: String,
    /// Set B, comma separated
    pub b: String,
}

pub fn sets(out: &Output, args: SetsArgs) -> Result<()> {
    let algebra = SetAlgebra::from_text(&args.a, &args.b);
    out.emit(&algebra, render_sets)
}

fn braces(set: &lab_calc::sets::TokenSet) -> String {
    format!("{{{}}}", render(set))
}

pub fn render_sets(s: &SetAlgebra) -> String {
    [
        heading("Set operations"),
        field("A", braces(&s.a)),
        field("B", braces(&s.b)),
        field("A ∪ B", braces(&s.union)),
        field("A ∩ B", braces(&s.intersection)),
        field("A − B", braces(&s.a_minus_b)),
        field("B − A", braces(&s.b_minus_a)),
        field("A △ B", braces(&s.symmetric_difference)),
        field("A ⊆ B", yes_no(s.a_subset_of_b)),
        field("B ⊆ A", yes_no(s.b_subset_of_a)),
        field("Disjoint", yes_no(s.disjoint)),
    ]
    .join("\n")
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_render_quadratic_two_real() {
        plain();
        let text = render_quadratic(&solve_quadratic(1.0, -5.0, 6.0).unwrap());
        assert!(text.contains("x1 = 2, x2 = 3"));
        assert!(text.contains("Discriminant:"));
    }

    #[test]
    fn test_render_quadratic_complex() {
        plain();
        let text = render_quadratic(&solve_quadratic(1.0, 0.0, 1.0).unwrap());
        assert!(text.contains("x = 0 ± 1i"));
    }

    #[test]
    fn test_render_linear_degenerate() {
        plain();
        let text = render_linear(&solve_linear(0.0, 5.0, 7.0).unwrap());
        assert!(text.contains("no solution"));
    }

    #[test]
    fn test_render_truth_table() {
        plain();
        let table = build_truth_table("A and not A").unwrap();
        let text = render_truth_table("A and not A", &table);
        assert_eq!(text.lines().filter(|l| l.ends_with("| F")).count(), 2);
        assert!(text.contains("contradiction"));
    }

    #[test]
    fn test_render_equivalence_counterexample() {
        plain();
        let result = check_equivalence("p implies q", "q implies p").unwrap();
        let text = render_equivalence(&result);
        assert!(text.contains("Not equivalent"));
        assert!(text.contains("p=F q=T"));
    }

    #[test]
    fn test_render_sets() {
        plain();
        let text = render_sets(&SetAlgebra::from_text("1, 2", "2, 3"));
        assert!(text.contains("{1, 2, 3}"));
        assert!(text.contains("{2}"));
    }

    #[test]
    fn test_stats_report_json_omits_missing_frequency() {
        let values = parse_dataset("1 2 3").unwrap();
        let report = StatsReport {
            summary: summarize(&values).unwrap(),
            frequency: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("frequency").is_none());
        assert_eq!(json["summary"]["mean"], 2.0);
    }
}
