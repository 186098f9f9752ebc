//! Output rendering and error reporting

use anyhow::Result;
use colored::*;
use lab_calc::format::fmt_num;
use lab_calc::CalcError;
use lab_session::SessionError;
use serde::Serialize;

/// Chooses between human-readable text and JSON
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print `value` as pretty JSON, or the text produced by `render`
    pub fn emit<T: Serialize>(&self, value: &T, render: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", render(value));
        }
        Ok(())
    }

    /// One streamed record: a compact JSON line, or `text`
    pub fn record<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

/// Section heading
pub fn heading(title: &str) -> String {
    title.bright_cyan().bold().to_string()
}

/// `label: value` line with the value highlighted
pub fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {:<22} {}", format!("{}:", label), value.to_string().bright_yellow())
}

/// Number with an optional unit
pub fn quantity(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        fmt_num(value)
    } else {
        format!("{} {}", fmt_num(value), unit)
    }
}

pub fn yes_no(flag: bool) -> ColoredString {
    if flag {
        "yes".green()
    } else {
        "no".red()
    }
}

/// Numbered derivation steps
pub fn steps(lines: &[String]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("  {}. {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Category tag printed in front of an error message
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<CalcError>() {
        return e.kind().as_str();
    }
    if let Some(e) = err.downcast_ref::<SessionError>() {
        return match e {
            SessionError::Calc(calc) => calc.kind().as_str(),
            SessionError::Store(_) | SessionError::Io(_) => "store",
            SessionError::Serialization(_) => "serialization",
            SessionError::Cancelled(_) => "cancelled",
        };
    }
    if err.downcast_ref::<common::Error>().is_some() {
        return "config";
    }
    "error"
}

/// Error text without a redundant category prefix
pub fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<CalcError>() {
        Some(e) => e.message().to_string(),
        None => match err.downcast_ref::<SessionError>() {
            Some(SessionError::Calc(e)) => e.message().to_string(),
            _ => format!("{:#}", err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_and_message() {
        let err = anyhow::Error::new(CalcError::degenerate("P(B) is zero"));
        assert_eq!(error_kind(&err), "degenerate");
        assert_eq!(error_message(&err), "P(B) is zero");

        let err = anyhow::Error::new(SessionError::Calc(CalcError::invalid_input("bad")));
        assert_eq!(error_kind(&err), "invalid_input");
        assert_eq!(error_message(&err), "bad");

        let err = anyhow::Error::new(SessionError::store("disk full"));
        assert_eq!(error_kind(&err), "store");

        let err = anyhow::Error::new(common::Error::config("oops"));
        assert_eq!(error_kind(&err), "config");

        let err = anyhow::anyhow!("plain");
        assert_eq!(error_kind(&err), "error");
        assert_eq!(error_message(&err), "plain");
    }

    #[test]
    fn test_steps_numbered() {
        let text = steps(&["a".to_string(), "b".to_string()]);
        assert_eq!(text, "  1. a\n  2. b");
    }

    #[test]
    fn test_quantity() {
        assert_eq!(quantity(2.5, "mL"), "2.5 mL");
        assert_eq!(quantity(3.0, ""), "3");
    }
}
