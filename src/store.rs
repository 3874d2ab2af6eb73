//! Memoized access to the loaded tables.
//!
//! `DataStore` wraps the loaders with one lazy cache cell per table.
//! Tables are loaded on first access, kept for the life of the store,
//! and never invalidated; the source files are static, so a reload can
//! only ever produce the same data. A failed load is not cached and a
//! later call retries from disk.

use crate::error::Result;
use crate::loader;
use crate::models::{RegionKind, RegionStats, SpeciesCount, TreeRecord};
use once_cell::sync::OnceCell;
use std::path::PathBuf;

/// Resolved locations of every source file the pipeline reads.
#[derive(Debug, Clone)]
pub struct DataLayout {
    /// Directory holding the GeoJSON region files.
    pub root: PathBuf,
    /// Directory holding the per-borough CSV shards.
    pub shard_dir: PathBuf,
    /// The pre-aggregated species count CSV.
    pub species_counts: PathBuf,
}

impl DataLayout {
    /// Standard layout rooted at `root`, matching the census export.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            shard_dir: root.join("trees_boro_data"),
            species_counts: root.join("common_species_count.csv"),
            root,
        }
    }
}

/// Lazily-populated, immutable set of census tables.
///
/// Pass the store to whatever consumes the tables; there is no global
/// instance. Shared references are fine across threads, each table is
/// populated at most once.
pub struct DataStore {
    layout: DataLayout,
    show_progress: bool,
    points: OnceCell<Vec<TreeRecord>>,
    species: OnceCell<Vec<SpeciesCount>>,
    boroughs: OnceCell<Vec<RegionStats>>,
    ntas: OnceCell<Vec<RegionStats>>,
    hexes: OnceCell<Vec<RegionStats>>,
}

impl DataStore {
    /// Create a store over `layout`. No files are touched yet.
    pub fn new(layout: DataLayout) -> Self {
        Self {
            layout,
            show_progress: false,
            points: OnceCell::new(),
            species: OnceCell::new(),
            boroughs: OnceCell::new(),
            ntas: OnceCell::new(),
            hexes: OnceCell::new(),
        }
    }

    /// Show a progress bar while the shard table loads.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The layout this store reads from.
    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// The full point table, loaded from the CSV shards on first access.
    pub fn points(&self) -> Result<&[TreeRecord]> {
        self.points
            .get_or_try_init(|| loader::load_points(&self.layout.shard_dir, self.show_progress))
            .map(Vec::as_slice)
    }

    /// The species count table.
    pub fn species_counts(&self) -> Result<&[SpeciesCount]> {
        self.species
            .get_or_try_init(|| loader::load_species_counts(&self.layout.species_counts))
            .map(Vec::as_slice)
    }

    /// The region table for one geographic granularity.
    pub fn region_stats(&self, kind: RegionKind) -> Result<&[RegionStats]> {
        let cell = match kind {
            RegionKind::Borough => &self.boroughs,
            RegionKind::Nta => &self.ntas,
            RegionKind::HexGrid => &self.hexes,
        };
        cell.get_or_try_init(|| loader::load_region_stats(&self.layout.root, kind))
            .map(Vec::as_slice)
    }
}
