//! This module is responsible for reading SubRip and WebVTT caption files.
//! It exposes the timestamp codec and a single scanner parameterized by `Format`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

mod scanner;
mod timestamp;

pub use scanner::parse_captions;
pub use timestamp::{format_timestamp, parse_timestamp, TimestampError};

/// One timed text block of a caption file.
/// `start <= end` is not guaranteed for malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptionEntry {
    pub start: Duration,
    pub end: Duration,
    pub text: String,
}

/// Supported caption formats.
/// Each variant describes its own grammar so both share one scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Srt,
    Vtt,
}

static SRT_TIMING: Lazy<Regex> = Lazy::new(|| timing_regex(Format::Srt.separator()));
static VTT_TIMING: Lazy<Regex> = Lazy::new(|| timing_regex(Format::Vtt.separator()));

/// Build the `start --> end` pattern for a millisecond separator.
/// Digits and whitespace are ASCII only; anything else is caption text.
fn timing_regex(separator: char) -> Regex {
    let separator = regex::escape(&separator.to_string());
    let stamp = format!(r"[0-9]{{2}}:[0-9]{{2}}:[0-9]{{2}}{separator}[0-9]{{3}}");
    let space = r"[\t\n\x0C\r ]+";
    Regex::new(&format!(r"({stamp}){space}-->{space}({stamp})")).expect("timing pattern is valid")
}

impl Format {
    /// Pick the format from a file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("srt") {
            Some(Format::Srt)
        } else if ext.eq_ignore_ascii_case("vtt") {
            Some(Format::Vtt)
        } else {
            None
        }
    }

    /// Character between seconds and milliseconds.
    pub fn separator(self) -> char {
        match self {
            Format::Srt => ',',
            Format::Vtt => '.',
        }
    }

    /// Whether every block opens with an ordinal line to discard.
    pub fn has_sequence_line(self) -> bool {
        matches!(self, Format::Srt)
    }

    /// Whether the file opens with a header section to skip.
    pub fn skips_header(self) -> bool {
        matches!(self, Format::Vtt)
    }

    /// Pattern matching a timing line; captures start and end stamps.
    pub fn timing_pattern(self) -> &'static Regex {
        match self {
            Format::Srt => &*SRT_TIMING,
            Format::Vtt => &*VTT_TIMING,
        }
    }
}

/// Errors that abort a caption parse.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("error parsing {side} time on line {line}: {source}")]
    Timing {
        line: usize,
        side: &'static str,
        #[source]
        source: TimestampError,
    },
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read a caption file and parse it with the format implied by its extension.
pub fn parse_caption_file(path: &Path) -> Result<Vec<CaptionEntry>, ParseError> {
    trace!("parse_caption_file(path={})", path.display());
    let format = Format::from_path(path)
        .ok_or_else(|| ParseError::UnsupportedFormat(path.display().to_string()))?;
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let entries = parse_captions(&content, format)?;
    debug!("parsed {} caption entries as {:?}", entries.len(), format);
    Ok(entries)
}
