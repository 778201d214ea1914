//! `sealctl` — binary entry point.
//!
//! Startup sequence:
//! 1. Parse command-line arguments.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured JSON logging on stderr.
//! 4. Run the subcommand over stdin/stdout and map failures to exit statuses.

mod cli;
mod commands;
mod config;
mod telemetry;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use seal::SealError;
use tracing::error;

use cli::Cli;
use config::Config;

/// Exit status for failures outside the envelope error taxonomy (I/O, config, bad JSON).
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    // -----------------------------------------------------------------------
    // 1. Arguments
    // -----------------------------------------------------------------------
    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Telemetry is not yet up; write to stderr directly.
            eprintln!("ERROR: configuration invalid: {e:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    if let Err(e) = telemetry::init(&cfg.log_level) {
        eprintln!("ERROR: {e:#}");
        return ExitCode::from(EXIT_FAILURE);
    }

    // -----------------------------------------------------------------------
    // 4. Command
    // -----------------------------------------------------------------------
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    match commands::run(&cli.command, &cfg, &mut stdin, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (code, status) = match e.downcast_ref::<SealError>() {
                Some(seal_err) => (seal_err.code(), seal_err.exit_code()),
                None => ("internal_error", EXIT_FAILURE),
            };
            error!(error = %format!("{e:#}"), code, "command failed");
            ExitCode::from(status)
        }
    }
}
