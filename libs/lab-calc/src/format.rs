//! Number rendering for derivation traces

/// Render a number with at most 4 decimals, trailing zeros trimmed
///
/// `-0` is normalised to `0` so traces never show a signed zero.
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{:.4}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

/// Render a signed term for an equation, e.g. `+ 3` or `- 2.5`
pub(crate) fn signed_term(value: f64) -> String {
    if value < 0.0 {
        format!("- {}", fmt_num(-value))
    } else {
        format!("+ {}", fmt_num(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(2.0), "2");
        assert_eq!(fmt_num(2.5), "2.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.3333");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(-0.00001), "0");
        assert_eq!(fmt_num(-12.125), "-12.125");
    }

    #[test]
    fn test_signed_term() {
        assert_eq!(signed_term(3.0), "+ 3");
        assert_eq!(signed_term(-2.5), "- 2.5");
    }
}
