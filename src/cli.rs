//! Command-line interface for codeshape.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;

/// Environment variable that overrides `--log-level`.
pub const LOG_ENV: &str = "CODESHAPE_LOG";

/// Structural source extractor for PHP and TypeScript/TSX.
///
/// Prints one JSON document describing the file's namespace, dependencies,
/// functions, classes, types, exports and UI components. On failure prints
/// `{"error": ...}` instead and exits non-zero.
#[derive(Parser)]
#[command(name = "codeshape")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source file to extract
    pub path: PathBuf,

    /// Print single-line JSON instead of pretty-printed output
    #[arg(long)]
    pub compact: bool,

    /// Log filter for stderr diagnostics (overridden by CODESHAPE_LOG)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Install the stderr log subscriber.
///
/// stdout is reserved for the JSON document.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

/// Run one extraction and print exactly one document.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    match crate::extract_file(&cli.path) {
        Ok(unit) => {
            tracing::debug!(
                path = %cli.path.display(),
                records = unit.record_count(),
                "extraction complete"
            );
            report::write_json(&unit, cli.compact)?;
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            tracing::error!(
                path = %cli.path.display(),
                repair_attempted = e.repair_attempted(),
                error = %e,
                "extraction failed"
            );
            report::write_error(&e.to_string(), cli.compact)?;
            Ok(EXIT_ERROR)
        }
    }
}
