//! Text aggregation for language detection.

use crate::caption::CaptionEntry;

/// Join the text of every non-blank entry with a single space, in file order.
/// Entry text is used as stored; only the blank check trims.
pub fn aggregate_text(entries: &[CaptionEntry]) -> String {
    entries
        .iter()
        .map(|e| e.text.as_str())
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
