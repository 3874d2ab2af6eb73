//! Data pipeline for the 2015 NYC Street Tree Census dashboard.
//!
//! The census ships as flat files: per-borough CSV shards of tree
//! points, a pre-aggregated species count CSV, and three GeoJSON
//! choropleth sources (borough, NTA, quarter-mile hex grid). This crate
//! loads those files into immutable in-memory tables, memoizes them in
//! an explicit [`store::DataStore`], and exposes the pure queries the
//! presentation layer needs (top-N species, filter by species).
//!
//! All loading is synchronous and runs to completion; failures are the
//! typed [`error::PipelineError`] with exactly two kinds, I/O and
//! format, both of which indicate a deployment defect rather than a
//! transient condition.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;
pub mod store;

pub use analysis::{filter_by_species, species_names, top_n, RankOrder};
pub use error::PipelineError;
pub use models::{RegionKind, RegionStats, SpeciesCount, TreeRecord};
pub use store::{DataLayout, DataStore};
