//! Codeshape CLI entry point.

use clap::Parser;
use codeshape::cli::{self, Cli, EXIT_ERROR};
use codeshape::report;

fn main() {
    let cli = Cli::parse();
    cli::init_logging(&cli.log_level);

    let exit_code = match cli::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            let _ = report::write_error(&format!("{:#}", e), cli.compact);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
