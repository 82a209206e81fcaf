//! Configuration management

use crate::types::{FolderPair, OnewayError};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Command-line interface for oneway
#[derive(Parser, Debug)]
#[command(
    name = "oneway",
    version,
    about = "One-way folder synchronization - copy what's missing, never touch what's there"
)]
pub struct Cli {
    /// Source folder (single-pair mode)
    #[arg(value_name = "FROM", requires = "to")]
    pub from: Option<PathBuf>,

    /// Destination folder (single-pair mode)
    #[arg(value_name = "TO")]
    pub to: Option<PathBuf>,

    /// TOML manifest with one [[pair]] table per folder pair
    #[arg(short, long, value_name = "FILE", conflicts_with = "from")]
    pub manifest: Option<PathBuf>,

    /// Worker threads for copies within a pair
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report: ReportFormat,

    /// Suppress per-file output
    #[arg(short, long)]
    pub quiet: bool,
}

/// How the event stream is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Styled console output
    Text,
    /// One timestamped JSON object per event
    Json,
}

/// Global configuration for oneway
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder pairs, processed in this order
    pub pairs: Vec<FolderPair>,

    /// Worker threads for copies within a pair
    pub threads: usize,

    /// Report rendering
    pub report: ReportFormat,

    /// Suppress per-file output
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pairs: Vec::new(),
            threads: 1,
            report: ReportFormat::Text,
            quiet: false,
        }
    }
}

/// On-disk manifest shape: repeated `[[pair]]` tables.
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "pair", default)]
    pairs: Vec<FolderPair>,
}

impl TryFrom<Cli> for Config {
    type Error = OnewayError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let pairs = match (&cli.manifest, &cli.from, &cli.to) {
            (Some(manifest), _, _) => load_manifest(manifest)?,
            (None, Some(from), Some(to)) => vec![FolderPair::new(from, to)],
            _ => {
                return Err(OnewayError::Config(
                    "supply FROM and TO folders, or --manifest <FILE>".to_string(),
                ))
            }
        };

        let config = Config {
            pairs,
            threads: cli.threads.max(1),
            report: cli.report,
            quiet: cli.quiet,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), OnewayError> {
        if self.pairs.is_empty() {
            return Err(OnewayError::Config(
                "no folder pairs configured".to_string(),
            ));
        }

        for pair in &self.pairs {
            if pair.from == pair.to {
                return Err(OnewayError::Config(format!(
                    "source and destination cannot be the same: {:?}",
                    pair.from
                )));
            }
        }

        Ok(())
    }
}

/// Load folder pairs from a TOML manifest, preserving file order.
fn load_manifest(path: &PathBuf) -> Result<Vec<FolderPair>, OnewayError> {
    let text = fs::read_to_string(path)
        .map_err(|e| OnewayError::Config(format!("cannot read manifest {:?}: {}", path, e)))?;

    let manifest: Manifest = toml::from_str(&text)
        .map_err(|e| OnewayError::Config(format!("invalid manifest {:?}: {}", path, e)))?;

    Ok(manifest.pairs)
}
