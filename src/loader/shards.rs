//! Per-borough CSV shard loading.
//!
//! The census point data arrives as an arbitrary number of CSV shards in
//! one directory, one shard per borough export. This module discovers the
//! shards, reads them in sorted filename order, and concatenates their
//! rows into a single point table. Concatenation is a pure union: no
//! deduplication across shards.

use crate::error::{PipelineError, Result};
use crate::loader::{csv_error, title_case};
use crate::models::TreeRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Required shard columns.
///
/// The 2015 census export capitalizes `Latitude` but nothing else; that
/// observed casing is authoritative, so the loader matches it exactly.
const REQUIRED_COLUMNS: [&str; 4] = ["spc_common", "Latitude", "longitude", "address"];

/// Find all CSV shards under `dir`, sorted by filename.
///
/// Fails with the I/O kind when the directory is missing or contains no
/// `.csv` files at all.
pub fn discover_shards(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PipelineError::io(
            dir,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "shard directory does not exist",
            ),
        ));
    }

    let mut shards: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            PipelineError::io(dir, source)
        })?;

        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if entry.file_type().is_file() && is_csv {
            shards.push(path.to_path_buf());
        }
    }

    if shards.is_empty() {
        return Err(PipelineError::io(
            dir,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no CSV shards in shard directory",
            ),
        ));
    }

    // Sorted filenames give deterministic concatenation order.
    shards.sort();
    Ok(shards)
}

/// Load every shard under `dir` into one concatenated point table.
///
/// Species names are title-cased during the read. Row order within a
/// shard is preserved; shards are appended in sorted filename order.
pub fn load_points(dir: &Path, show_progress: bool) -> Result<Vec<TreeRecord>> {
    let shards = discover_shards(dir)?;
    info!("Loading {} CSV shards from {}", shards.len(), dir.display());

    let bar = if show_progress {
        let bar = ProgressBar::new(shards.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} shards {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let mut points = Vec::new();
    for shard in &shards {
        if let Some(ref bar) = bar {
            bar.set_message(
                shard
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        }

        let before = points.len();
        read_shard(shard, &mut points)?;
        debug!(
            "Shard {}: {} rows",
            shard.display(),
            points.len() - before
        );

        if let Some(ref bar) = bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = bar {
        bar.finish_with_message(format!("{} trees", points.len()));
    }

    info!("Loaded {} tree records", points.len());
    Ok(points)
}

/// Read a single shard, appending its rows to `out`.
fn read_shard(path: &Path, out: &mut Vec<TreeRecord>) -> Result<()> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .clone();

    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| {
                PipelineError::format(path, format!("missing required column `{}`", column))
            })?;
    }
    let [species_idx, lat_idx, lon_idx, address_idx] = indices;

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(path, e))?;

        let latitude = parse_coordinate(path, &record, lat_idx, row, "Latitude")?;
        let longitude = parse_coordinate(path, &record, lon_idx, row, "longitude")?;

        out.push(TreeRecord {
            spc_common: title_case(record.get(species_idx).unwrap_or_default()),
            latitude,
            longitude,
            address: record.get(address_idx).unwrap_or_default().to_string(),
        });
    }

    Ok(())
}

/// Parse one coordinate field, reporting the row on failure.
fn parse_coordinate(
    path: &Path,
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    column: &str,
) -> Result<f64> {
    let raw = record.get(idx).unwrap_or_default().trim();
    raw.parse::<f64>().map_err(|_| {
        PipelineError::format(
            path,
            format!("row {}: invalid `{}` value `{}`", row + 1, column, raw),
        )
    })
}
