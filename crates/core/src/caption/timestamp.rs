//! Conversion between caption timestamps and durations.
//! SRT writes `HH:MM:SS,mmm` while WebVTT writes `HH:MM:SS.mmm`.

use super::Format;
use std::num::ParseIntError;
use std::time::Duration;
use thiserror::Error;

/// Reasons a timestamp string can be rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    /// The string does not have exactly three `:`-separated components.
    #[error("invalid time format: {0}")]
    InvalidTimeFormat(String),
    /// The seconds component does not split into seconds and milliseconds.
    #[error("invalid seconds format: {0}")]
    InvalidSecondsFormat(String),
    /// A component is not an unsigned integer.
    #[error("invalid digits in `{component}`: {source}")]
    InvalidDigits {
        component: String,
        #[source]
        source: ParseIntError,
    },
    /// The components are numeric but the total does not fit in milliseconds.
    #[error("timestamp out of range: {0}")]
    OutOfRange(String),
}

/// Parse `HH:MM:SS<sep>mmm` into a duration, where `<sep>` depends on `format`.
/// Components are not length checked here; the scanner's timing pattern does that.
pub fn parse_timestamp(s: &str, format: Format) -> Result<Duration, TimestampError> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return Err(TimestampError::InvalidTimeFormat(s.to_string()));
    }
    let hours = parse_component(parts[0])?;
    let minutes = parse_component(parts[1])?;

    let sec_parts: Vec<&str> = parts[2].split(format.separator()).collect();
    if sec_parts.len() != 2 {
        return Err(TimestampError::InvalidSecondsFormat(parts[2].to_string()));
    }
    let seconds = parse_component(sec_parts[0])?;
    let millis = parse_component(sec_parts[1])?;

    hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes.checked_mul(60_000)?))
        .and_then(|ms| ms.checked_add(seconds.checked_mul(1_000)?))
        .and_then(|ms| ms.checked_add(millis))
        .map(Duration::from_millis)
        .ok_or_else(|| TimestampError::OutOfRange(s.to_string()))
}

fn parse_component(component: &str) -> Result<u64, TimestampError> {
    component
        .parse()
        .map_err(|source| TimestampError::InvalidDigits {
            component: component.to_string(),
            source,
        })
}

/// Format a duration back to `HH:MM:SS<sep>mmm`.
/// Sub-millisecond precision is dropped; hours grow past two digits when needed.
pub fn format_timestamp(d: Duration, format: Format) -> String {
    let ms = d.as_millis();
    let h = ms / 3_600_000;
    let m = (ms % 3_600_000) / 60_000;
    let s = (ms % 60_000) / 1000;
    let ms = ms % 1000;
    format!("{h:02}:{m:02}:{s:02}{}{ms:03}", format.separator())
}
