//! Generate command - build and emit the template.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use tierstack_topology::{render, TopologyConfig};

use super::check::check_document;

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Topology settings (YAML); built-in defaults when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the template to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Check references before writing; nothing is written on failure
    #[arg(long)]
    pub check: bool,
}

impl GenerateArgs {
    /// Whether any generation flag was given.
    pub fn is_set(&self) -> bool {
        self.config.is_some() || self.output.is_some() || self.compact || self.check
    }
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let stdout = io::stdout();
    execute_to(args, &mut stdout.lock())
}

/// Run generation, sending the document to `out` unless `--output` is set.
pub fn execute_to<W: Write>(args: GenerateArgs, out: &mut W) -> Result<()> {
    let config = match &args.config {
        Some(path) => TopologyConfig::from_file(path)
            .with_context(|| format!("Failed to load topology config {}", path.display()))?,
        None => {
            debug!("Using built-in topology defaults");
            TopologyConfig::default()
        }
    };

    let json = render(&config, args.compact).context("Failed to render template")?;

    if args.check {
        check_document(&json)?;
    }

    match args.output.as_deref() {
        Some(path) => write_file(&json, path),
        None => write_document(&json, out),
    }
}

/// Write the document followed by a newline.
pub fn write_document<W: Write>(json: &str, out: &mut W) -> Result<()> {
    writeln!(out, "{json}").context("Failed to write template to stdout")?;
    out.flush()?;
    Ok(())
}

fn write_file(json: &str, path: &Path) -> Result<()> {
    fs::write(path, format!("{json}\n"))
        .with_context(|| format!("Failed to write template to {}", path.display()))?;
    info!("Wrote template to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_run_writes_template_to_stream() {
        let mut out = Vec::new();
        execute_to(GenerateArgs::default(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let expected = render(&TopologyConfig::default(), false).unwrap();
        assert_eq!(text, format!("{expected}\n"));

        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["AWSTemplateFormatVersion"], "2010-09-09");
    }

    #[test]
    fn test_default_run_is_byte_identical() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        execute_to(GenerateArgs::default(), &mut first).unwrap();
        execute_to(GenerateArgs::default(), &mut second).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_output_file_leaves_stream_empty() {
        let dir = tempdir().unwrap();
        let mut out = Vec::new();

        execute_to(
            GenerateArgs {
                output: Some(dir.path().join("template.json")),
                ..Default::default()
            },
            &mut out,
        )
        .unwrap();

        assert!(out.is_empty());
    }

    #[test]
    fn test_generate_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("template.json");

        execute(GenerateArgs {
            output: Some(path.clone()),
            check: true,
            ..Default::default()
        })
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("}\n"));
        let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(doc["Outputs"]["URL"]["Description"], "URL of the sample website");
    }

    #[test]
    fn test_generate_compact_with_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("topology.yaml");
        let output = dir.path().join("template.json");
        fs::write(&config_path, "listener_port: \"8080\"\n").unwrap();

        execute(GenerateArgs {
            config: Some(config_path),
            output: Some(output.clone()),
            compact: true,
            check: false,
        })
        .unwrap();

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains(r#""Port":"8080""#));
    }

    #[test]
    fn test_missing_config_is_reported() {
        let dir = tempdir().unwrap();
        let err = execute(GenerateArgs {
            config: Some(dir.path().join("absent.yaml")),
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<tierstack_topology::TopologyError>(),
            Some(tierstack_topology::TopologyError::ConfigNotFound(_))
        ));
    }
}
