//! Combinatorics and probability

use crate::error::{ensure_finite, CalcError, Result};
use tracing::debug;

/// n!
pub fn factorial(n: u64) -> Result<u128> {
    (1..=u128::from(n)).try_fold(1u128, |acc, k| {
        acc.checked_mul(k)
            .ok_or_else(|| CalcError::invalid_input(format!("{}! is too large", n)))
    })
}

/// Number of ordered selections nPr = n! / (n-r)!
pub fn permutations(n: u64, r: u64) -> Result<u128> {
    if r > n {
        return Err(CalcError::invalid_input(format!(
            "r ({}) cannot exceed n ({})",
            r, n
        )));
    }
    (0..r).try_fold(1u128, |acc, i| {
        acc.checked_mul(u128::from(n - i))
            .ok_or_else(|| CalcError::invalid_input(format!("P({}, {}) is too large", n, r)))
    })
}

/// Number of unordered selections nCr
pub fn combinations(n: u64, r: u64) -> Result<u128> {
    if r > n {
        return Err(CalcError::invalid_input(format!(
            "r ({}) cannot exceed n ({})",
            r, n
        )));
    }
    let r = r.min(n - r);
    // Multiplicative form keeps every intermediate value an exact integer
    (0..r).try_fold(1u128, |acc, i| {
        acc.checked_mul(u128::from(n - i))
            .map(|product| product / u128::from(i + 1))
            .ok_or_else(|| CalcError::invalid_input(format!("C({}, {}) is too large", n, r)))
    })
}

/// Largest trial count accepted by [`binomial_probability`]
pub const MAX_BINOMIAL_TRIALS: u64 = 1_000_000;

/// ln C(n, k), summed term by term so large n stays finite
fn ln_combinations(n: u64, k: u64) -> f64 {
    let k = k.min(n - k);
    (0..k)
        .map(|i| ((n - i) as f64).ln() - ((i + 1) as f64).ln())
        .sum()
}

/// P(X = k) for X ~ Binomial(n, p)
///
/// Evaluated in log space: `exp(ln C(n,k) + k·ln p + (n-k)·ln(1-p))`.
pub fn binomial_probability(n: u64, k: u64, p: f64) -> Result<f64> {
    ensure_finite("p", p)?;
    if n > MAX_BINOMIAL_TRIALS {
        return Err(CalcError::invalid_input(format!(
            "n ({}) must not exceed {}",
            n, MAX_BINOMIAL_TRIALS
        )));
    }
    if k > n {
        return Err(CalcError::invalid_input(format!(
            "k ({}) must be between 0 and n ({})",
            k, n
        )));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(CalcError::invalid_input(format!(
            "p ({}) must be between 0 and 1",
            p
        )));
    }

    // ln 0 would turn the k = 0 or k = n edge into 0·(-∞)
    let probability = if p == 0.0 || p == 1.0 {
        let certain = if p == 0.0 { k == 0 } else { k == n };
        if certain {
            1.0
        } else {
            0.0
        }
    } else {
        let successes = k as f64;
        let failures = (n - k) as f64;
        let ln_p = ln_combinations(n, k) + successes * p.ln() + failures * (-p).ln_1p();
        ln_p.exp().min(1.0)
    };
    debug!(n, k, p, probability, "binomial");
    Ok(probability)
}

/// P(A|B) = P(A∩B) / P(B)
pub fn conditional_probability(p_a_and_b: f64, p_b: f64) -> Result<f64> {
    for (name, value) in [("P(A∩B)", p_a_and_b), ("P(B)", p_b)] {
        ensure_finite(name, value)?;
        if !(0.0..=1.0).contains(&value) {
            return Err(CalcError::invalid_input(format!(
                "{} ({}) must be between 0 and 1",
                name, value
            )));
        }
    }
    if p_a_and_b > p_b {
        return Err(CalcError::invalid_input("P(A∩B) cannot exceed P(B)"));
    }
    if p_b == 0.0 {
        return Err(CalcError::degenerate("P(A|B) is undefined when P(B) = 0"));
    }
    Ok(p_a_and_b / p_b)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0).unwrap(), 1);
        assert_eq!(factorial(5).unwrap(), 120);
        assert_eq!(factorial(34).unwrap(), 295232799039604140847618609643520000000);
        assert!(factorial(35).is_err());
    }

    #[test]
    fn test_permutations_and_combinations() {
        assert_eq!(permutations(5, 2).unwrap(), 20);
        assert_eq!(permutations(5, 0).unwrap(), 1);
        assert_eq!(combinations(5, 2).unwrap(), 10);
        assert_eq!(combinations(52, 5).unwrap(), 2_598_960);
        assert_eq!(combinations(10, 10).unwrap(), 1);
        assert!(combinations(3, 4).is_err());
        assert!(permutations(3, 4).is_err());
    }

    #[test]
    fn test_combinatorics_top_of_range() {
        assert_eq!(permutations(u64::MAX, 0).unwrap(), 1);
        assert_eq!(permutations(u64::MAX, 1).unwrap(), u128::from(u64::MAX));
        assert!(permutations(u64::MAX, 3).is_err());
        assert_eq!(combinations(u64::MAX, 0).unwrap(), 1);
        assert_eq!(combinations(u64::MAX, u64::MAX).unwrap(), 1);
        assert_eq!(combinations(u64::MAX, 1).unwrap(), u128::from(u64::MAX));
    }

    #[test]
    fn test_binomial() {
        let p = binomial_probability(10, 5, 0.5).unwrap();
        assert!((p - 252.0 / 1024.0).abs() < 1e-12);

        let total: f64 = (0..=10)
            .map(|k| binomial_probability(10, k, 0.3).unwrap())
            .sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_binomial_bounds() {
        assert!(binomial_probability(10, 15, 0.5).is_err());
        assert!(binomial_probability(10, 5, 1.5).is_err());
        assert!(binomial_probability(10, 5, -0.1).is_err());
        assert_eq!(binomial_probability(4, 4, 1.0).unwrap(), 1.0);
        assert_eq!(binomial_probability(4, 3, 1.0).unwrap(), 0.0);
        assert_eq!(binomial_probability(4, 0, 0.0).unwrap(), 1.0);
        assert_eq!(binomial_probability(4, 1, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_binomial_large_n() {
        // Central term of B(2000, 0.5) ≈ 1 / sqrt(1000π)
        let p = binomial_probability(2000, 1000, 0.5).unwrap();
        assert!((p - 0.017839).abs() < 1e-4);

        let tail = binomial_probability(MAX_BINOMIAL_TRIALS, MAX_BINOMIAL_TRIALS, 0.5).unwrap();
        assert!((0.0..1e-300).contains(&tail));

        for n in [3_000_000_000, (1u64 << 32) + 1, u64::MAX] {
            let err = binomial_probability(n, n, 0.5).unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn test_conditional() {
        assert_eq!(conditional_probability(0.2, 0.5).unwrap(), 0.4);
        let err = conditional_probability(0.0, 0.0).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Degenerate);
        assert!(conditional_probability(0.6, 0.5).is_err());
    }
}
