//! Logging initialisation for the lab tools
//!
//! Text output uses the bracketed format
//! `2026-01-01T00:00:00.000000Z [INFO] message key=value`; JSON output emits
//! one object per event. Both go to stderr so command output on stdout stays
//! machine-readable.

use std::sync::OnceLock;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::Writer, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Environment variable overriding the configured filter
pub const LOG_ENV: &str = "LABKIT_LOG";

/// Filter installed by the first successful [`init`]
static ACTIVE_FILTER: OnceLock<String> = OnceLock::new();

/// Custom format for log level with brackets: `[INFO]`, `[WARN]`, etc.
fn format_level(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "[TRACE]",
        Level::DEBUG => "[DEBUG]",
        Level::INFO => "[INFO]",
        Level::WARN => "[WARN]",
        Level::ERROR => "[ERROR]",
    }
}

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "\x1b[35m", // magenta
        Level::DEBUG => "\x1b[34m", // blue
        Level::INFO => "\x1b[32m",  // green
        Level::WARN => "\x1b[33m",  // yellow
        Level::ERROR => "\x1b[31m", // red
    }
}

/// Event formatter that outputs: `timestamp [LEVEL] message`
pub struct BracketedLevelFormat;

impl<S, N> FormatEvent<S, N> for BracketedLevelFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = chrono::Utc::now();
        write!(writer, "{} ", now.format("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        let level = event.metadata().level();
        if writer.has_ansi_escapes() {
            write!(writer, "{}{}\x1b[0m ", level_color(level), format_level(level))?;
        } else {
            write!(writer, "{} ", format_level(level))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Resolve the filter directive
///
/// Priority: `LABKIT_LOG` > `verbose` (debug) > configured level > `info`.
pub fn resolve_filter(env: Option<&str>, configured: &str, verbose: bool) -> String {
    if let Some(directive) = env.map(str::trim).filter(|d| !d.is_empty()) {
        return directive.to_string();
    }
    if verbose {
        return "debug".to_string();
    }
    let configured = configured.trim();
    if configured.is_empty() {
        "info".to_string()
    } else {
        configured.to_lowercase()
    }
}

/// Install the global subscriber
///
/// Returns `Ok(false)` when logging was already initialised; the first
/// configuration stays in effect.
pub fn init(config: &LoggingConfig, verbose: bool, ansi: bool) -> Result<bool> {
    if ACTIVE_FILTER.get().is_some() {
        return Ok(false);
    }

    let env = std::env::var(LOG_ENV).ok();
    let directive = resolve_filter(env.as_deref(), &config.level, verbose);
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| Error::logging(format!("Invalid log filter '{}': {}", directive, e)))?;

    let layer = if config.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_level(true)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(ansi)
            .event_format(BracketedLevelFormat)
            .boxed()
    };

    match tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
    {
        Ok(()) => {
            let _ = ACTIVE_FILTER.set(directive.clone());
            tracing::debug!(filter = %directive, json = config.json, "logging initialised");
            Ok(true)
        },
        // Another subscriber was installed outside this module
        Err(_) => Ok(false),
    }
}

/// Filter installed by [`init`], if any
pub fn active_filter() -> Option<&'static str> {
    ACTIVE_FILTER.get().map(String::as_str)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_bracketed_format() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .event_format(BracketedLevelFormat)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(samples = 81, "curve ready");
            tracing::warn!("step too small");
        });

        let text = captured.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(" [INFO] curve ready samples=81"));
        assert!(lines[1].contains(" [WARN] step too small"));

        let stamp = lines[0].split(' ').next().unwrap();
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn test_resolve_filter_priority() {
        assert_eq!(resolve_filter(Some("trace"), "warn", true), "trace");
        assert_eq!(resolve_filter(Some("  "), "warn", false), "warn");
        assert_eq!(resolve_filter(None, "WARN", false), "warn");
        assert_eq!(resolve_filter(None, "warn", true), "debug");
        assert_eq!(resolve_filter(None, "", false), "info");
        assert_eq!(
            resolve_filter(Some("info,lab_calc=debug"), "warn", false),
            "info,lab_calc=debug"
        );
    }

    #[test]
    fn test_format_level() {
        assert_eq!(format_level(&Level::ERROR), "[ERROR]");
        assert_eq!(format_level(&Level::TRACE), "[TRACE]");
    }
}
