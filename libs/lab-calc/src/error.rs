//! Error types for lab-calc

use serde::Serialize;
use thiserror::Error;

/// Broad category of a calculation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-domain input
    InvalidInput,
    /// Well-defined but non-standard result (zero denominator, undefined value)
    Degenerate,
    /// A sub-expression could not be evaluated
    Evaluation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Degenerate => "degenerate",
            Self::Evaluation => "evaluation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calculation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate result: {0}")]
    Degenerate(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),
}

impl CalcError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::Degenerate(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Degenerate(_) => ErrorKind::Degenerate,
            Self::Evaluation(_) => ErrorKind::Evaluation,
        }
    }

    /// Message without the category prefix
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(m) | Self::Degenerate(m) | Self::Evaluation(m) => m,
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;

/// Reject NaN and infinite inputs before they reach a formula
pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(format!(
            "{} must be a finite number, got {}",
            name, value
        )))
    }
}

/// Reject values that are not strictly positive
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(format!(
            "{} must be greater than zero, got {}",
            name, value
        )))
    }
}

/// Reject negative values (zero allowed)
pub(crate) fn ensure_non_negative(name: &str, value: f64) -> Result<f64> {
    ensure_finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(format!(
            "{} must not be negative, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            CalcError::invalid_input("x").kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(CalcError::degenerate("x").kind(), ErrorKind::Degenerate);
        assert_eq!(CalcError::evaluation("x").kind(), ErrorKind::Evaluation);
    }

    #[test]
    fn test_display_and_message() {
        let err = CalcError::degenerate("P(B) = 0");
        assert_eq!(err.to_string(), "Degenerate result: P(B) = 0");
        assert_eq!(err.message(), "P(B) = 0");
    }

    #[test]
    fn test_guards() {
        assert!(ensure_finite("a", f64::NAN).is_err());
        assert!(ensure_positive("mass", 0.0).is_err());
        assert!(ensure_non_negative("height", 0.0).is_ok());
        assert!(ensure_non_negative("height", -1.0).is_err());
    }
}
