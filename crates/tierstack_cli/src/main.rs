//! tierstack CLI - Main entry point.
//!
//! With no arguments, prints the two-tier load balancer template to stdout.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure

use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tierstack_topology::TopologyError;

mod commands;
mod error;

use commands::{Cli, Commands};
use error::CliError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
}

fn main() -> ExitCode {
    let cli = Cli::parse_checked();

    // stdout carries the template, so logs go to stderr
    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tierstack={level},warn")));
    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let result = match cli.command {
        None => commands::generate::execute(cli.generate),
        Some(Commands::Check(args)) => commands::check::execute(args),
        Some(Commands::InitConfig(args)) => commands::init_config::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(err) = e.downcast_ref::<CliError>() {
        return match err {
            CliError::ValidationFailed(_) | CliError::InvalidJson(_) => ExitCodes::VALIDATION_FAILURE,
            CliError::AlreadyExists(_) => ExitCodes::INVALID_ARGS,
        };
    }

    match e.downcast_ref::<TopologyError>() {
        Some(TopologyError::ConfigNotFound(_)) | Some(TopologyError::Yaml(_)) => {
            ExitCodes::INVALID_ARGS
        }
        _ => ExitCodes::GENERAL_ERROR,
    }
}
