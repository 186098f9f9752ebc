//! Descriptive statistics
//!
//! Aggregations over a dataset typed as free text: mean, median, mode,
//! population/sample variance and standard deviation, plus a frequency table.

use crate::error::{CalcError, Result};
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// Parse comma/whitespace separated numbers, dropping anything non-numeric
pub fn parse_dataset(input: &str) -> Result<Vec<f64>> {
    let re = Regex::new(r"[,;\s]+")
        .map_err(|e| CalcError::evaluation(format!("Regex error: {}", e)))?;

    let values: Vec<f64> = re
        .split(input)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .collect();

    debug!(count = values.len(), "dataset parsed");
    Ok(values)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

fn require_data(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        Err(CalcError::invalid_input("Dataset is empty"))
    } else {
        Ok(())
    }
}

pub fn mean(values: &[f64]) -> Result<f64> {
    require_data(values)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Result<f64> {
    require_data(values)?;
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Every value sharing the highest frequency, ascending
pub fn mode(values: &[f64]) -> Result<Vec<f64>> {
    let table = frequency_table(values)?;
    let top = table.iter().map(|row| row.frequency).max().unwrap_or(0);
    Ok(table
        .iter()
        .filter(|row| row.frequency == top)
        .map(|row| row.value)
        .collect())
}

/// Σ(x - mean)² / n
pub fn population_variance(values: &[f64]) -> Result<f64> {
    let m = mean(values)?;
    Ok(values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64)
}

/// Σ(x - mean)² / (n - 1)
pub fn sample_variance(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(CalcError::degenerate(
            "Sample variance needs at least two values",
        ));
    }
    let m = mean(values)?;
    Ok(values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64)
}

/// Aggregate view of a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub mean: f64,
    pub median: f64,
    pub mode: Vec<f64>,
    pub population_variance: f64,
    pub population_std_dev: f64,
    /// Absent when fewer than two values
    pub sample_variance: Option<f64>,
    pub sample_std_dev: Option<f64>,
}

pub fn summarize(values: &[f64]) -> Result<Summary> {
    require_data(values)?;

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let population_variance = population_variance(values)?;
    let sample_variance = sample_variance(values).ok();

    Ok(Summary {
        count: values.len(),
        sum: values.iter().sum(),
        min,
        max,
        range: max - min,
        mean: mean(values)?,
        median: median(values)?,
        mode: mode(values)?,
        population_variance,
        population_std_dev: population_variance.sqrt(),
        sample_variance,
        sample_std_dev: sample_variance.map(f64::sqrt),
    })
}

/// One distinct value in the frequency table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrequencyRow {
    pub value: f64,
    pub frequency: usize,
    /// frequency / n
    pub relative: f64,
    /// Running total of `frequency` up to and including this row
    pub cumulative: usize,
}

/// Group by distinct value in ascending order
pub fn frequency_table(values: &[f64]) -> Result<Vec<FrequencyRow>> {
    require_data(values)?;
    let n = values.len() as f64;

    let mut rows: Vec<FrequencyRow> = Vec::new();
    for value in sorted(values) {
        match rows.last_mut() {
            Some(row) if row.value == value => row.frequency += 1,
            _ => rows.push(FrequencyRow {
                value,
                frequency: 1,
                relative: 0.0,
                cumulative: 0,
            }),
        }
    }

    let mut running = 0;
    for row in &mut rows {
        running += row.frequency;
        row.cumulative = running;
        row.relative = row.frequency as f64 / n;
    }

    Ok(rows)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset_drops_garbage() {
        let values = parse_dataset("1, 2,  3\n4 abc 5;6 NaN").unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(parse_dataset("   ").unwrap().is_empty());
    }

    #[test]
    fn test_central_tendency() {
        let values = vec![4.0, 1.0, 2.0, 2.0, 3.0];
        assert_eq!(mean(&values).unwrap(), 2.4);
        assert_eq!(median(&values).unwrap(), 2.0);
        assert_eq!(mode(&values).unwrap(), vec![2.0]);
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_multimodal() {
        assert_eq!(mode(&[3.0, 1.0, 3.0, 1.0, 2.0]).unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_variance() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(population_variance(&values).unwrap(), 4.0);
        assert!((sample_variance(&values).unwrap() - 32.0 / 7.0).abs() < 1e-12);

        let summary = summarize(&values).unwrap();
        assert_eq!(summary.population_std_dev, 2.0);
        assert_eq!(summary.range, 7.0);
        assert_eq!(summary.count, 8);
    }

    #[test]
    fn test_single_value_summary() {
        let summary = summarize(&[5.0]).unwrap();
        assert!(summary.sample_variance.is_none());
        assert_eq!(summary.population_variance, 0.0);
        assert_eq!(
            sample_variance(&[5.0]).unwrap_err().kind(),
            crate::ErrorKind::Degenerate
        );
    }

    #[test]
    fn test_frequency_table() {
        let table = frequency_table(&[3.0, 1.0, 2.0, 3.0, 3.0, 1.0]).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].value, 1.0);
        assert_eq!(table[0].frequency, 2);
        assert_eq!(table[2].frequency, 3);
        assert_eq!(table[2].cumulative, 6);
        assert!((table[2].relative - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_dataset() {
        assert_eq!(
            mean(&[]).unwrap_err().kind(),
            crate::ErrorKind::InvalidInput
        );
        assert!(frequency_table(&[]).is_err());
    }
}
