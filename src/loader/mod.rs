//! Flat-file loaders for the census sources.
//!
//! Each loader reads one of the fixed files under the data root and
//! produces an immutable in-memory table. Loaders are pure functions of
//! the on-disk files; memoization lives in [`crate::store::DataStore`],
//! not here.

use crate::error::PipelineError;
use std::path::Path;

pub mod regions;
pub mod shards;
pub mod species;

pub use regions::load_region_stats;
pub use shards::{discover_shards, load_points};
pub use species::load_species_counts;

/// Map a csv crate error onto the pipeline's two kinds.
pub(crate) fn csv_error(path: &Path, err: csv::Error) -> PipelineError {
    match err.into_kind() {
        csv::ErrorKind::Io(source) => PipelineError::io(path, source),
        other => PipelineError::format(path, format!("malformed CSV: {:?}", other)),
    }
}

/// Title-case a species name the way the census dashboard does.
///
/// Follows Python `str.title()` semantics: a letter that follows a
/// non-letter is uppercased, every other letter is lowercased. The
/// operation is idempotent, so already-normalized names pass through
/// unchanged.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_was_letter = false;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if prev_was_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_was_letter = true;
        } else {
            out.push(ch);
            prev_was_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_basic() {
        assert_eq!(title_case("pin oak"), "Pin Oak");
        assert_eq!(title_case("LONDON PLANETREE"), "London Planetree");
        assert_eq!(title_case("crab apple"), "Crab Apple");
    }

    #[test]
    fn test_title_case_idempotent() {
        let once = title_case("schubert chokecherry");
        assert_eq!(title_case(&once), once);
        assert_eq!(title_case("Pin Oak"), "Pin Oak");
    }

    #[test]
    fn test_title_case_after_punctuation() {
        // Python str.title() uppercases after any non-letter.
        assert_eq!(title_case("tree-of-heaven"), "Tree-Of-Heaven");
        assert_eq!(title_case("kentucky coffeetree"), "Kentucky Coffeetree");
    }

    #[test]
    fn test_title_case_empty() {
        assert_eq!(title_case(""), "");
    }
}
