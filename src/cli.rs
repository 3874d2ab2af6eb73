//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// TreeCensus - inspect the 2015 NYC Street Tree Census data pipeline
///
/// Loads the census flat files (per-borough CSV shards, species counts,
/// choropleth GeoJSON) and prints the tables the dashboard renders.
///
/// Examples:
///   treecensus
///   treecensus --data-dir ./data --top 20
///   treecensus --species "pin oak" --format json
///   treecensus --region nta --output ntas.md
///   treecensus --dry-run
///   treecensus --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing the census source files
    ///
    /// Expects the standard export layout: region GeoJSON files at the
    /// top level, CSV shards under trees_boro_data/.
    #[arg(
        short,
        long,
        default_value = "data",
        value_name = "DIR",
        env = "TREECENSUS_DATA_DIR"
    )]
    pub data_dir: PathBuf,

    /// Path to configuration file
    ///
    /// If not specified, looks for .treecensus.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the N most common species and exit
    #[arg(long, value_name = "N", conflicts_with_all = ["bottom", "species", "region"])]
    pub top: Option<usize>,

    /// Print the N least common species and exit
    #[arg(long, value_name = "N", conflicts_with_all = ["species", "region"])]
    pub bottom: Option<usize>,

    /// Print every tree of one species (case-insensitive)
    ///
    /// Example: --species "pin oak"
    #[arg(short, long, value_name = "NAME", conflicts_with = "region")]
    pub species: Option<String>,

    /// Print the tree counts for one geographic granularity
    #[arg(short, long, value_name = "KIND")]
    pub region: Option<RegionArg>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// List the CSV shards that would be loaded, then exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .treecensus.toml and exit
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for tables and the summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable Markdown tables.
    Markdown,
    /// Pretty-printed JSON.
    Json,
}

/// Geographic granularity selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegionArg {
    /// The five boroughs.
    Boro,
    /// Neighborhood Tabulation Areas.
    Nta,
    /// Quarter-square-mile hex grid.
    Hex,
}

impl From<RegionArg> for crate::models::RegionKind {
    fn from(arg: RegionArg) -> Self {
        match arg {
            RegionArg::Boro => crate::models::RegionKind::Borough,
            RegionArg::Nta => crate::models::RegionKind::Nta,
            RegionArg::Hex => crate::models::RegionKind::HexGrid,
        }
    }
}

impl Args {
    /// Parse arguments from the process command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("--verbose and --quiet are mutually exclusive".to_string());
        }

        if self.top == Some(0) || self.bottom == Some(0) {
            return Err("--top/--bottom must be at least 1".to_string());
        }

        if let Some(ref species) = self.species {
            if species.trim().is_empty() {
                return Err("--species requires a non-empty name".to_string());
            }
        }

        Ok(())
    }

    /// Logging level derived from the verbosity flags.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
