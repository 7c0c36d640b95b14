//! Time coverage of a validation window by caption entries.

use crate::caption::{format_timestamp, CaptionEntry, Format};
use std::time::Duration;
use tracing::{debug, trace};

/// Validation window supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Duration,
    pub end: Duration,
}

impl TimeRange {
    pub fn new(start: Duration, end: Duration) -> Self {
        Self { start, end }
    }

    /// Window length, or `None` when `end <= start`.
    pub fn length(&self) -> Option<Duration> {
        self.end
            .checked_sub(self.start)
            .filter(|len| !len.is_zero())
    }

    /// Part of `[start, end)` that falls inside the window.
    fn overlap(&self, start: Duration, end: Duration) -> Option<(Duration, Duration)> {
        let from = start.max(self.start);
        let to = end.min(self.end);
        (from < to).then_some((from, to))
    }
}

/// Sum of every entry's overlap with `window`.
/// Entries overlapping each other are counted once per entry, so the result
/// can exceed the window length.
pub fn covered_duration(entries: &[CaptionEntry], window: TimeRange) -> Duration {
    entries
        .iter()
        .filter_map(|e| window.overlap(e.start, e.end))
        .map(|(from, to)| to - from)
        .sum()
}

/// Length of the union of entry intervals inside `window`.
pub fn union_duration(entries: &[CaptionEntry], window: TimeRange) -> Duration {
    let mut spans: Vec<(Duration, Duration)> = entries
        .iter()
        .filter_map(|e| window.overlap(e.start, e.end))
        .collect();
    spans.sort_unstable();

    let mut total = Duration::ZERO;
    let mut current: Option<(Duration, Duration)> = None;
    for (from, to) in spans {
        current = match current {
            Some((cur_from, cur_to)) if from <= cur_to => Some((cur_from, cur_to.max(to))),
            Some((cur_from, cur_to)) => {
                total += cur_to - cur_from;
                Some((from, to))
            }
            None => Some((from, to)),
        };
    }
    if let Some((from, to)) = current {
        total += to - from;
    }
    total
}

/// Decide whether captions cover at least `required_fraction` of `window`.
/// A degenerate or inverted window never passes.
pub fn evaluate_coverage(
    entries: &[CaptionEntry],
    window: TimeRange,
    required_fraction: f64,
) -> bool {
    trace!(
        "evaluate_coverage(entries={}, window={}..{}, required={})",
        entries.len(),
        format_timestamp(window.start, Format::Vtt),
        format_timestamp(window.end, Format::Vtt),
        required_fraction
    );
    let Some(length) = window.length() else {
        debug!("coverage window is empty or inverted");
        return false;
    };
    let covered = covered_duration(entries, window);
    let fraction = covered.as_nanos() as f64 / length.as_nanos() as f64;
    debug!(
        "covered {:?} of {:?} ({:.3}), union {:?}",
        covered,
        length,
        fraction,
        union_duration(entries, window)
    );
    fraction >= required_fraction
}
