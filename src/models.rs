//! Data models for the census pipeline.
//!
//! This module contains the core data structures shared by the loaders,
//! the aggregation helpers, and the report generator.

use geo_types::MultiPolygon;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single street tree from the census point data.
///
/// One row per tree, assembled from the per-borough CSV shards. Records
/// are immutable once loaded; the pipeline never mutates or deduplicates
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Common species name, title-cased at load time (e.g. "Pin Oak").
    pub spc_common: String,
    /// Latitude in WGS84 degrees.
    pub latitude: f64,
    /// Longitude in WGS84 degrees.
    pub longitude: f64,
    /// Street address nearest the tree.
    pub address: String,
}

/// City-wide count for one species.
///
/// Loaded pass-through from the pre-aggregated species count file; one
/// row per distinct species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCount {
    /// Common species name.
    pub spc_common: String,
    /// Number of trees of this species across the city.
    pub count: u64,
}

/// The three geographic granularities the choropleth sources come in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// The five boroughs.
    Borough,
    /// Neighborhood Tabulation Areas.
    Nta,
    /// Quarter-square-mile hex grid cells.
    HexGrid,
}

impl RegionKind {
    /// All kinds, in coarse-to-fine order.
    pub const ALL: [RegionKind; 3] = [RegionKind::Borough, RegionKind::Nta, RegionKind::HexGrid];

    /// File name of this kind's GeoJSON source under the data root.
    pub fn file_name(&self) -> &'static str {
        match self {
            RegionKind::Borough => "boroughs_with_stats.geojson",
            RegionKind::Nta => "ntas_with_stats.geojson",
            RegionKind::HexGrid => "quarter_mile_trees.geojson",
        }
    }

    /// Feature property holding the region identifier.
    ///
    /// Hex cells carry no identifier; they are keyed by feature index.
    pub fn id_property(&self) -> Option<&'static str> {
        match self {
            RegionKind::Borough => Some("Boro"),
            RegionKind::Nta => Some("NTA"),
            RegionKind::HexGrid => None,
        }
    }

    /// Feature property holding the precomputed tree count.
    pub fn count_property(&self) -> &'static str {
        match self {
            RegionKind::Borough | RegionKind::Nta => "Count of Trees",
            RegionKind::HexGrid => "Count Trees",
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionKind::Borough => write!(f, "Borough"),
            RegionKind::Nta => write!(f, "Neighborhood Tabulation Area"),
            RegionKind::HexGrid => write!(f, "1/4 Sq Mile Hex-Grid"),
        }
    }
}

/// Polygon geometry plus precomputed tree count for one region.
///
/// `region_id` is unique within a kind: borough name, NTA code, or the
/// zero-based feature index for hex cells.
#[derive(Debug, Clone)]
pub struct RegionStats {
    /// Region identifier, unique within its kind.
    pub region_id: String,
    /// Region footprint. Single-polygon features are promoted to a
    /// one-element multipolygon.
    pub geometry: MultiPolygon<f64>,
    /// Precomputed number of street trees inside the region.
    pub tree_count: u64,
}

/// One row of a region table as exported in reports (geometry dropped).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionCountRow {
    /// Region identifier.
    pub region_id: String,
    /// Number of street trees inside the region.
    pub tree_count: u64,
}

impl From<&RegionStats> for RegionCountRow {
    fn from(stats: &RegionStats) -> Self {
        Self {
            region_id: stats.region_id.clone(),
            tree_count: stats.tree_count,
        }
    }
}

/// Summary of the whole census as rendered by the CLI report.
#[derive(Debug, Clone, Serialize)]
pub struct CensusSummary {
    /// When the summary was generated.
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// Number of CSV shards the point table was assembled from.
    pub shard_files: usize,
    /// Total number of street trees (sum over the species counts).
    pub total_trees: u64,
    /// Number of distinct species in the species count table.
    pub distinct_species: usize,
    /// Per-borough tree counts, highest first.
    pub boroughs: Vec<RegionCountRow>,
    /// Most common species, highest count first.
    pub most_common: Vec<SpeciesCount>,
    /// Least common species, lowest count first.
    pub least_common: Vec<SpeciesCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_kind_file_names() {
        assert_eq!(
            RegionKind::Borough.file_name(),
            "boroughs_with_stats.geojson"
        );
        assert_eq!(RegionKind::Nta.file_name(), "ntas_with_stats.geojson");
        assert_eq!(RegionKind::HexGrid.file_name(), "quarter_mile_trees.geojson");
    }

    #[test]
    fn test_region_kind_properties() {
        assert_eq!(RegionKind::Borough.id_property(), Some("Boro"));
        assert_eq!(RegionKind::Nta.id_property(), Some("NTA"));
        assert_eq!(RegionKind::HexGrid.id_property(), None);

        assert_eq!(RegionKind::Borough.count_property(), "Count of Trees");
        assert_eq!(RegionKind::HexGrid.count_property(), "Count Trees");
    }

    #[test]
    fn test_region_count_row_from_stats() {
        let stats = RegionStats {
            region_id: "Queens".to_string(),
            geometry: MultiPolygon(vec![]),
            tree_count: 240_998,
        };
        let row = RegionCountRow::from(&stats);
        assert_eq!(row.region_id, "Queens");
        assert_eq!(row.tree_count, 240_998);
    }
}
