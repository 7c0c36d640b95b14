//! Line-oriented block scanner shared by SRT and WebVTT.
//! The way this works is by folding every trimmed line into a `ScanState`
//! and flushing whatever text is still pending once the input runs out.

use super::{parse_timestamp, CaptionEntry, Format, ParseError};
use std::time::Duration;

const HEADER_MARKER: &str = "WEBVTT";
const COMMENT_MARKER: &str = "NOTE";

/// Where the scanner is within the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Leading WebVTT header, comments and blank lines.
    Header,
    /// Next non-blank line is an SRT ordinal and is discarded.
    Sequence,
    /// Timing or text lines of the current block.
    Body,
}

#[derive(Debug)]
struct ScanState {
    format: Format,
    phase: Phase,
    /// Timing of the most recent timing line; kept across blocks.
    timing: (Duration, Duration),
    text_lines: Vec<String>,
    entries: Vec<CaptionEntry>,
}

impl ScanState {
    fn new(format: Format) -> Self {
        let phase = if format.skips_header() {
            Phase::Header
        } else if format.has_sequence_line() {
            Phase::Sequence
        } else {
            Phase::Body
        };
        Self {
            format,
            phase,
            timing: (Duration::ZERO, Duration::ZERO),
            text_lines: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Phase entered after a blank line closes a block.
    fn block_start(&self) -> Phase {
        if self.format.has_sequence_line() {
            Phase::Sequence
        } else {
            Phase::Body
        }
    }

    /// Consume one raw line numbered from 1.
    fn step(mut self, number: usize, raw: &str) -> Result<Self, ParseError> {
        let line = raw.trim();

        if self.phase == Phase::Header {
            if line.is_empty()
                || line.starts_with(HEADER_MARKER)
                || line.starts_with(COMMENT_MARKER)
            {
                return Ok(self);
            }
            self.phase = Phase::Body;
        }

        if line.is_empty() {
            self.flush();
            self.phase = self.block_start();
            return Ok(self);
        }

        if self.phase == Phase::Sequence {
            self.phase = Phase::Body;
            return Ok(self);
        }

        match self.format.timing_pattern().captures(line) {
            Some(caps) => {
                let start = parse_side(&caps[1], self.format, number, "start")?;
                let end = parse_side(&caps[2], self.format, number, "end")?;
                self.timing = (start, end);
            }
            None => self.text_lines.push(line.to_string()),
        }
        Ok(self)
    }

    /// Turn pending text lines into an entry with the current timing.
    fn flush(&mut self) {
        if self.text_lines.is_empty() {
            return;
        }
        let (start, end) = self.timing;
        let text = std::mem::take(&mut self.text_lines).join(" ");
        self.entries.push(CaptionEntry { start, end, text });
    }

    fn finish(mut self) -> Vec<CaptionEntry> {
        self.flush();
        self.entries
    }
}

fn parse_side(
    stamp: &str,
    format: Format,
    line: usize,
    side: &'static str,
) -> Result<Duration, ParseError> {
    parse_timestamp(stamp, format).map_err(|source| ParseError::Timing { line, side, source })
}

/// Parse caption text into entries in file order.
/// Lines that do not look like timing are text; a timing-shaped line that
/// fails conversion aborts the whole parse.
pub fn parse_captions(content: &str, format: Format) -> Result<Vec<CaptionEntry>, ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .enumerate()
        .try_fold(ScanState::new(format), |state, (i, line)| {
            state.step(i + 1, line)
        })
        .map(ScanState::finish)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(start_ms: u64, end_ms: u64, text: &str) -> CaptionEntry {
        CaptionEntry {
            start: Duration::from_millis(start_ms),
            end: Duration::from_millis(end_ms),
            text: text.to_string(),
        }
    }

    #[test]
    fn parses_two_srt_blocks() {
        let input = "1\n00:00:01,000 --> 00:00:04,000\nHello world\n\n2\n00:00:05,000 --> 00:00:08,000\nSecond line\n";
        let entries = parse_captions(input, Format::Srt).unwrap();
        assert_eq!(
            entries,
            vec![
                entry(1_000, 4_000, "Hello world"),
                entry(5_000, 8_000, "Second line"),
            ]
        );
    }

    #[test]
    fn joins_multiline_text_with_spaces() {
        let input = "1\n00:00:01,000 --> 00:00:04,000\nHello @world! #test <b>HTML</b> \"quotes\"\nLine 2";
        let entries = parse_captions(input, Format::Srt).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].text,
            "Hello @world! #test <b>HTML</b> \"quotes\" Line 2"
        );
    }

    #[test]
    fn handles_crlf_line_endings() {
        let input = "1\r\n00:00:01,000 --> 00:00:04,000\r\nHello world\r\n\r\n2\r\n00:00:05,000 --> 00:00:08,000\r\nAnother caption\r\n";
        let entries = parse_captions(input, Format::Srt).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "Hello world");
        assert_eq!(entries[1].text, "Another caption");
    }

    #[test]
    fn allows_extra_spaces_around_arrow() {
        let input = "1\n00:00:01,000    -->    00:00:04,000\nHello world";
        let entries = parse_captions(input, Format::Srt).unwrap();
        assert_eq!(entries, vec![entry(1_000, 4_000, "Hello world")]);
    }

    #[test]
    fn line_without_arrow_is_text() {
        let input = "1\n00:00:01-00:00:04\nHello\n";
        let entries = parse_captions(input, Format::Srt).unwrap();
        assert_eq!(entries, vec![entry(0, 0, "00:00:01-00:00:04 Hello")]);
    }

    /// Four digit seconds do not match the timing pattern and fall through to text.
    #[test]
    fn oversized_seconds_are_text() {
        let mut input = String::new();
        for i in 1..=1000 {
            input.push_str(&format!(
                "{i}\n00:00:{i:02},000 --> 00:00:{:02},500\nCaption number {i}\n\n",
                i + 1
            ));
        }
        let entries = parse_captions(&input, Format::Srt).unwrap();
        assert_eq!(entries.len(), 1000);
        assert_eq!(entries[0].text, "Caption number 1");
        assert_eq!(
            entries[999].text,
            "00:00:1000,000 --> 00:00:1001,500 Caption number 1000"
        );
    }

    #[test]
    fn non_ascii_digits_are_text() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\n٠٠:٠٠:٠١,٠٠٠ --> ٠٠:٠٠:٠٢,٠٠٠\n";
        let entries = parse_captions(input, Format::Srt).unwrap();
        assert_eq!(
            entries,
            vec![entry(1_000, 2_000, "٠٠:٠٠:٠١,٠٠٠ --> ٠٠:٠٠:٠٢,٠٠٠")]
        );
    }

    #[test]
    fn non_breaking_space_around_arrow_is_text() {
        let input = "1\n00:00:01,000\u{a0}-->\u{a0}00:00:02,000\nhi\n";
        let entries = parse_captions(input, Format::Srt).unwrap();
        assert_eq!(
            entries,
            vec![entry(0, 0, "00:00:01,000\u{a0}-->\u{a0}00:00:02,000 hi")]
        );
    }

    #[test]
    fn block_without_timing_reuses_previous_timing() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nfirst\n\n2\nsecond\n";
        let entries = parse_captions(input, Format::Srt).unwrap();
        assert_eq!(
            entries,
            vec![entry(1_000, 2_000, "first"), entry(1_000, 2_000, "second")]
        );
    }

    #[test]
    fn block_with_only_timing_is_dropped() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:03,000 --> 00:00:04,000\nkept\n";
        let entries = parse_captions(input, Format::Srt).unwrap();
        assert_eq!(entries, vec![entry(3_000, 4_000, "kept")]);
    }

    #[test]
    fn srt_sequence_line_is_never_validated() {
        let input = "not a number\n00:00:01,000 --> 00:00:02,000\ntext\n";
        let entries = parse_captions(input, Format::Srt).unwrap();
        assert_eq!(entries, vec![entry(1_000, 2_000, "text")]);
    }

    #[test]
    fn consecutive_blank_lines_are_harmless() {
        let input = "\n\n1\n00:00:01,000 --> 00:00:02,000\na\n\n\n\n2\n00:00:02,000 --> 00:00:03,000\nb\n\n";
        let entries = parse_captions(input, Format::Srt).unwrap();
        assert_eq!(entries, vec![entry(1_000, 2_000, "a"), entry(2_000, 3_000, "b")]);
    }

    #[test]
    fn empty_input_yields_no_entries() {
        assert!(parse_captions("", Format::Srt).unwrap().is_empty());
        assert!(parse_captions("WEBVTT\n\n", Format::Vtt).unwrap().is_empty());
    }

    #[test]
    fn parses_vtt_after_header_and_notes() {
        let input = "WEBVTT - sample\n\nNOTE written by hand\n\n00:00:01.000 --> 00:00:03.000\nHi there\n\n00:00:04.000 --> 00:00:06.000 align:start\n<v Bob>Bye\nnow\n";
        let entries = parse_captions(input, Format::Vtt).unwrap();
        assert_eq!(
            entries,
            vec![
                entry(1_000, 3_000, "Hi there"),
                entry(4_000, 6_000, "<v Bob>Bye now"),
            ]
        );
    }

    #[test]
    fn vtt_header_phase_is_left_once() {
        let input = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nfirst\n\nNOTE not skipped here\n";
        let entries = parse_captions(input, Format::Vtt).unwrap();
        assert_eq!(
            entries,
            vec![
                entry(1_000, 2_000, "first"),
                entry(1_000, 2_000, "NOTE not skipped here"),
            ]
        );
    }

    #[test]
    fn vtt_cue_identifier_becomes_text() {
        let input = "WEBVTT\n\nintro\n00:00:01.000 --> 00:00:02.000\nHello\n";
        let entries = parse_captions(input, Format::Vtt).unwrap();
        assert_eq!(entries, vec![entry(1_000, 2_000, "intro Hello")]);
    }

    #[test]
    fn strips_byte_order_mark() {
        let input = "\u{feff}WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello\n";
        let entries = parse_captions(input, Format::Vtt).unwrap();
        assert_eq!(entries, vec![entry(1_000, 2_000, "Hello")]);
    }

    #[test]
    fn srt_timing_in_vtt_file_is_text() {
        let input = "WEBVTT\n\n00:00:01,000 --> 00:00:02,000\nHello\n";
        let entries = parse_captions(input, Format::Vtt).unwrap();
        assert_eq!(
            entries,
            vec![entry(0, 0, "00:00:01,000 --> 00:00:02,000 Hello")]
        );
    }

    #[test]
    fn inverted_timing_is_kept_as_is() {
        let input = "1\n00:00:05,000 --> 00:00:01,000\nbackwards\n";
        let entries = parse_captions(input, Format::Srt).unwrap();
        assert_eq!(entries, vec![entry(5_000, 1_000, "backwards")]);
    }

    #[test]
    fn step_flushes_block_on_blank_line() {
        let state = ScanState::new(Format::Srt)
            .step(1, "1")
            .and_then(|s| s.step(2, "00:00:01,000 --> 00:00:02,000"))
            .and_then(|s| s.step(3, "  hello  "))
            .unwrap();
        assert!(state.entries.is_empty());
        assert_eq!(state.text_lines, vec!["hello".to_string()]);
        let state = state.step(4, "   ").unwrap();
        assert_eq!(state.phase, Phase::Sequence);
        assert!(state.text_lines.is_empty());
        assert_eq!(state.entries, vec![entry(1_000, 2_000, "hello")]);
    }
}
