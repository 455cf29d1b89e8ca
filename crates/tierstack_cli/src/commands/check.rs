//! Check command - verify references of a template file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tracing::{error, info, warn};

use tierstack_template::ReferenceValidator;

use crate::error::CliError;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Template file to check
    pub file: PathBuf,
}

pub fn execute(args: CheckArgs) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read template {}", args.file.display()))?;

    let count = check_document(&content)?;
    println!("✅ {}: {} references resolved", args.file.display(), count);
    Ok(())
}

/// Parse and validate a template, returning the number of distinct references.
pub fn check_document(json: &str) -> Result<usize> {
    let document: Value = serde_json::from_str(json).map_err(CliError::from)?;
    let result = ReferenceValidator::validate(&document);

    for warning in &result.warnings {
        warn!("{}", warning);
    }

    if !result.valid {
        for message in &result.errors {
            error!("{}", message);
        }
        return Err(CliError::ValidationFailed(result.errors.len()).into());
    }

    let count = ReferenceValidator::references(&document).len();
    info!("Template references check passed ({} targets)", count);
    Ok(count)
}
