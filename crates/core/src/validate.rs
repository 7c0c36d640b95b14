//! Validation pipeline.
//! This module wires caption parsing, coverage and language checks together.

use crate::caption;
use crate::coverage::{evaluate_coverage, TimeRange};
use crate::language::{validate_language, LanguageDetector, LanguageTag};
use crate::report::FailureSink;
use crate::text::aggregate_text;
use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, trace};

/// Settings for one validation run, already checked by the caller.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub file: PathBuf,
    pub window: TimeRange,
    /// Fraction of the window in `[0.0, 1.0]` that captions must cover.
    pub required_coverage: f64,
    pub expected_language: LanguageTag,
}

/// Kind of validation failure as reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    FileParseError,
    InsufficientCoverage,
    InvalidLanguage,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::FileParseError => "file_parse_error",
            FailureKind::InsufficientCoverage => "insufficient_coverage",
            FailureKind::InvalidLanguage => "invalid_language",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationFailure {
    #[serde(rename = "type")]
    pub kind: FailureKind,
    pub description: String,
}

impl ValidationFailure {
    fn new(kind: FailureKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }
}

/// Validate a caption file and return every failure found.
/// A parse failure ends the run with a single failure; otherwise coverage
/// and language are both checked.
pub async fn validate_file<D>(config: &ValidationConfig, detector: &D) -> Vec<ValidationFailure>
where
    D: LanguageDetector + ?Sized,
{
    trace!("validate_file(file={})", config.file.display());
    let entries = match caption::parse_caption_file(&config.file) {
        Ok(entries) => entries,
        Err(err) => {
            info!("could not parse {}: {}", config.file.display(), err);
            return vec![ValidationFailure::new(
                FailureKind::FileParseError,
                format!("Failed to parse caption file: {err}"),
            )];
        }
    };

    let mut failures = Vec::new();
    if !evaluate_coverage(&entries, config.window, config.required_coverage) {
        failures.push(ValidationFailure::new(
            FailureKind::InsufficientCoverage,
            format!(
                "Captions do not cover required {:.1}% of time range {} to {}",
                config.required_coverage * 100.0,
                format_span(config.window.start),
                format_span(config.window.end),
            ),
        ));
    }

    let text = aggregate_text(&entries);
    if !validate_language(&text, &config.expected_language, detector).await {
        failures.push(ValidationFailure::new(
            FailureKind::InvalidLanguage,
            format!(
                "Caption language is not {} or language detection failed",
                config.expected_language
            ),
        ));
    }
    info!(
        "validated {} caption entries with {} failure(s)",
        entries.len(),
        failures.len()
    );
    failures
}

/// Render a duration like `1h2m3.5s`, `1m30s`, `250ms` or `0s`.
fn format_span(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000_000_000 {
        let (unit, scale) = if nanos < 1_000 {
            ("ns", 1)
        } else if nanos < 1_000_000 {
            ("µs", 1_000)
        } else {
            ("ms", 1_000_000)
        };
        return format!("{}{unit}", decimal(nanos, scale));
    }
    let secs = nanos / 1_000_000_000;
    let (h, m) = (secs / 3600, (secs % 3600) / 60);
    let s = decimal(nanos % 60_000_000_000, 1_000_000_000);
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}

/// `value / scale` with trailing fractional zeros removed.
fn decimal(value: u128, scale: u128) -> String {
    let (whole, frac) = (value / scale, value % scale);
    if frac == 0 {
        return whole.to_string();
    }
    let width = scale.to_string().len() - 1;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Hand every failure to `sink` in order.
pub fn report_failures<S: FailureSink + ?Sized>(
    failures: &[ValidationFailure],
    sink: &mut S,
) -> Result<()> {
    for failure in failures {
        sink.report(failure.kind.as_str(), &failure.description)?;
    }
    Ok(())
}
