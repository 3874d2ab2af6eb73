//! Pre-aggregated species count loading.
//!
//! The counting itself happens in an offline preprocessing step; this
//! loader is a pass-through read of the resulting CSV, one row per
//! distinct species.

use crate::error::{PipelineError, Result};
use crate::loader::csv_error;
use crate::models::SpeciesCount;
use std::path::Path;
use tracing::info;

/// Load the species count table from `path`.
///
/// Expects the columns `spc_common` and `count`; rows come back in file
/// order, untouched.
pub fn load_species_counts(path: &Path) -> Result<Vec<SpeciesCount>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .clone();

    let species_idx = column_index(path, &headers, "spc_common")?;
    let count_idx = column_index(path, &headers, "count")?;

    let mut counts = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(path, e))?;

        let raw_count = record.get(count_idx).unwrap_or_default().trim();
        let count = raw_count.parse::<u64>().map_err(|_| {
            PipelineError::format(
                path,
                format!("row {}: invalid `count` value `{}`", row + 1, raw_count),
            )
        })?;

        counts.push(SpeciesCount {
            spc_common: record.get(species_idx).unwrap_or_default().to_string(),
            count,
        });
    }

    info!("Loaded counts for {} species", counts.len());
    Ok(counts)
}

fn column_index(path: &Path, headers: &csv::StringRecord, column: &str) -> Result<usize> {
    headers.iter().position(|h| h == column).ok_or_else(|| {
        PipelineError::format(path, format!("missing required column `{}`", column))
    })
}
