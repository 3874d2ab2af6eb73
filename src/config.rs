//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.treecensus.toml` files. The config mostly describes where the
//! census files live; everything has a default matching the standard
//! export layout.

use crate::store::DataLayout;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Source file layout.
    #[serde(default)]
    pub data: DataConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the census source files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the GeoJSON region files.
    #[serde(default = "default_root")]
    pub root: String,

    /// Shard directory name, relative to the root.
    #[serde(default = "default_shard_dir")]
    pub shard_dir: String,

    /// Species count file name, relative to the root.
    #[serde(default = "default_species_counts")]
    pub species_counts: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            shard_dir: default_shard_dir(),
            species_counts: default_species_counts(),
        }
    }
}

fn default_root() -> String {
    "data".to_string()
}

fn default_shard_dir() -> String {
    "trees_boro_data".to_string()
}

fn default_species_counts() -> String {
    "common_species_count.csv".to_string()
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// How many species the summary's most/least common tables show.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            verbose: false,
        }
    }
}

fn default_top_n() -> usize {
    20
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists
    /// but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".treecensus.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Data root - always override since it has a default in the CLI
        self.data.root = args.data_dir.display().to_string();

        // Ranking depth - only override if explicitly provided
        if let Some(n) = args.top {
            self.output.top_n = n;
        } else if let Some(n) = args.bottom {
            self.output.top_n = n;
        }

        // Flags always override
        if args.verbose {
            self.output.verbose = true;
        }
    }

    /// Resolve the configured paths into a concrete layout.
    pub fn layout(&self) -> DataLayout {
        let root = Path::new(&self.data.root);
        DataLayout {
            root: root.to_path_buf(),
            shard_dir: root.join(&self.data.shard_dir),
            species_counts: root.join(&self.data.species_counts),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.root, "data");
        assert_eq!(config.data.shard_dir, "trees_boro_data");
        assert_eq!(config.output.top_n, 20);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[data]
root = "exports/2015"
shard_dir = "shards"

[output]
top_n = 10
verbose = true
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.data.root, "exports/2015");
        assert_eq!(config.data.shard_dir, "shards");
        // Unset fields keep their defaults.
        assert_eq!(config.data.species_counts, "common_species_count.csv");
        assert_eq!(config.output.top_n, 10);
        assert!(config.output.verbose);
    }

    #[test]
    fn test_layout_resolution() {
        let mut config = Config::default();
        config.data.root = "exports".to_string();

        let layout = config.layout();
        assert_eq!(layout.root, Path::new("exports"));
        assert_eq!(layout.shard_dir, Path::new("exports/trees_boro_data"));
        assert_eq!(
            layout.species_counts,
            Path::new("exports/common_species_count.csv")
        );
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[output]"));
    }
}
