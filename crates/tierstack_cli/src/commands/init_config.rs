//! Init-config command - write the default topology settings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use tierstack_topology::TopologyConfig;

use crate::error::CliError;

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Destination file
    #[arg(short, long, default_value = "tierstack.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InitConfigArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        return Err(CliError::AlreadyExists(args.output).into());
    }

    TopologyConfig::default()
        .to_file(&args.output)
        .with_context(|| format!("Failed to write config to {}", args.output.display()))?;

    println!("📝 Wrote default topology settings to {}", args.output.display());
    Ok(())
}
