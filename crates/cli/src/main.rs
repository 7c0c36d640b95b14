//! Binary entry point for the caption validator.

use anyhow::Result;
use capcheck_core::language::http::HttpLanguageDetector;
use capcheck_core::report::JsonLineSink;
use capcheck_core::validate::{report_failures, validate_file};
use clap::Parser;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod args;

use args::Cli;

/// Application entry point which parses CLI args and runs one validation.
/// Failed validations are printed as JSON lines and still exit successfully.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.debug {
        EnvFilter::default()
            .add_directive("capcheck=trace".parse()?)
            .add_directive("capcheck_core=trace".parse()?)
            .add_directive("info".parse()?)
    } else {
        EnvFilter::default()
            .add_directive("capcheck=info".parse()?)
            .add_directive("capcheck_core=info".parse()?)
            .add_directive("warn".parse()?)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = cli.to_config()?;
    let detector = HttpLanguageDetector::new(cli.endpoint.as_str(), cli.detection_timeout())?;
    info!("validating {}", config.file.display());
    let failures = validate_file(&config, &detector).await;
    let mut sink = JsonLineSink::new(io::stdout().lock());
    report_failures(&failures, &mut sink)?;
    Ok(())
}
