//! CLI command definitions.
//!
//! Running `tierstack` without a subcommand generates the template; the
//! generation flags live on the top-level command for that reason.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

pub mod check;
pub mod generate;
pub mod init_config;

/// tierstack - two-tier load balancer template generator
#[derive(Parser, Debug)]
#[command(name = "tierstack")]
#[command(version, about = "tierstack - two-tier load balancer template generator")]
#[command(long_about = r#"
tierstack emits a CloudFormation template for a web and an api instance
behind an application load balancer. Requests under /api/* go to the api
tier, everything else to the web tier.

USAGE:
  tierstack                 → Print the template with default settings
  tierstack --check         → Verify references before printing
  tierstack check <FILE>    → Verify references of an existing template
  tierstack init-config     → Write the default settings as YAML

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
"#)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub generate: generate::GenerateArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse process arguments, exiting with a usage error on conflicts.
    pub fn parse_checked() -> Self {
        let cli = Self::parse();
        if let Err(e) = cli.check_conflicts() {
            e.exit();
        }
        cli
    }

    /// Generation flags only apply when no subcommand is given.
    pub fn check_conflicts(&self) -> Result<(), clap::Error> {
        if self.command.is_some() && self.generate.is_set() {
            return Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "--config, --output, --compact and --check cannot be combined with a subcommand",
            ));
        }
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that every reference in a template file resolves
    Check(check::CheckArgs),

    /// Write the default topology settings to a YAML file
    #[command(name = "init-config")]
    InitConfig(init_config::InitConfigArgs),
}
