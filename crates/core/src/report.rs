//! Sinks for validation failures.

use serde::Serialize;
use std::io::{self, Write};

/// Receives one `(kind, description)` pair per failed validation.
pub trait FailureSink {
    fn report(&mut self, kind: &str, description: &str) -> io::Result<()>;
}

#[derive(Serialize)]
struct Line<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    description: &'a str,
}

/// Writes each failure as a compact JSON object on its own line.
pub struct JsonLineSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLineSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FailureSink for JsonLineSink<W> {
    fn report(&mut self, kind: &str, description: &str) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, &Line { kind, description })?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}
