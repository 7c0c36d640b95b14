//! Command line options and their conversion into a validation config.

use anyhow::{anyhow, bail, Result};
use capcheck_core::caption::Format;
use capcheck_core::coverage::TimeRange;
use capcheck_core::language::http::DEFAULT_TIMEOUT;
use capcheck_core::language::LanguageTag;
use capcheck_core::validate::ValidationConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Validate caption coverage and language for an SRT or WebVTT file.
#[derive(Parser, Debug)]
#[command(name = "capcheck")]
pub struct Cli {
    /// Path to the caption file (.srt or .vtt).
    #[arg(long)]
    pub file: PathBuf,

    /// Start of the validation window (e.g. 30s, 1m30s).
    #[arg(long, default_value = "0s", value_parser = parse_duration, aliases = ["t_start", "start"])]
    pub t_start: Duration,

    /// End of the validation window.
    #[arg(long, value_parser = parse_duration, aliases = ["t_end", "end"])]
    pub t_end: Duration,

    /// Required coverage fraction between 0.0 and 1.0.
    #[arg(long, default_value_t = 0.8)]
    pub coverage: f64,

    /// Language detection endpoint URL.
    #[arg(long)]
    pub endpoint: String,

    /// Expected language tag.
    #[arg(long, default_value = "en-US")]
    pub language: String,

    /// Language detection timeout in seconds (at least 1).
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Enable verbose debug and trace logs.
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Check flag combinations and build the validation config.
    pub fn to_config(&self) -> Result<ValidationConfig> {
        if self.t_start >= self.t_end {
            bail!("start time must be less than end time");
        }
        if !(0.0..=1.0).contains(&self.coverage) {
            bail!("coverage must be between 0.0 and 1.0");
        }
        if Format::from_path(&self.file).is_none() {
            bail!(
                "unsupported file type: {} (expected .srt or .vtt)",
                self.file.display()
            );
        }
        Ok(ValidationConfig {
            file: self.file.clone(),
            window: TimeRange::new(self.t_start, self.t_end),
            required_coverage: self.coverage,
            expected_language: LanguageTag::new(self.language.clone()),
        })
    }

    pub fn detection_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Parse a Go style duration such as `1h2m3.5s`, `250ms` or `0`.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let s = input.strip_prefix('+').unwrap_or(input);
    if s.starts_with('-') {
        bail!("negative duration: {input}");
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        bail!("invalid duration: {input:?}");
    }

    let mut total = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| anyhow!("missing unit in duration: {input}"))?;
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() || number == "." {
            bail!("invalid duration: {input}");
        }
        let value: f64 = number
            .parse()
            .map_err(|_| anyhow!("invalid duration: {input}"))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let nanos_per_unit = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => bail!("unknown unit {unit:?} in duration {input}"),
        };
        total += value * nanos_per_unit;
        rest = tail;
    }
    if total > u64::MAX as f64 {
        bail!("duration out of range: {input}");
    }
    Ok(Duration::from_nanos(total.round() as u64))
}
