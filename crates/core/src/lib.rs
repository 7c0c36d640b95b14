//! Caption file validation: SRT/WebVTT parsing, time coverage and language checks.

pub mod caption;
pub mod coverage;
pub mod language;
pub mod report;
pub mod text;
pub mod validate;
