//! Pure queries over the loaded census tables.
//!
//! Everything in this module is deterministic and side-effect free:
//! ranking species by count, filtering the point table by species, and
//! small derivations used by the report.

use crate::loader::title_case;
use crate::models::{RegionCountRow, RegionStats, SpeciesCount, TreeRecord};

/// Which end of the count ranking `top_n` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    /// Largest counts first.
    MostCommon,
    /// Smallest counts first.
    LeastCommon,
}

/// Return the `n` species with the largest or smallest counts.
///
/// Ties keep their input order (the sort is stable). Asking for more
/// rows than exist returns the whole table, ranked.
pub fn top_n(counts: &[SpeciesCount], n: usize, order: RankOrder) -> Vec<SpeciesCount> {
    let mut ranked: Vec<SpeciesCount> = counts.to_vec();
    match order {
        RankOrder::MostCommon => ranked.sort_by(|a, b| b.count.cmp(&a.count)),
        RankOrder::LeastCommon => ranked.sort_by(|a, b| a.count.cmp(&b.count)),
    }
    ranked.truncate(n);
    ranked
}

/// Return the trees whose species matches `species`, case-insensitively.
///
/// The query is title-cased with the same normalization the loader
/// applies, so `"pin oak"` and `"PIN OAK"` both match `"Pin Oak"`. An
/// unknown species yields an empty vector, not an error.
pub fn filter_by_species(points: &[TreeRecord], species: &str) -> Vec<TreeRecord> {
    let wanted = title_case(species);
    points
        .iter()
        .filter(|p| p.spc_common == wanted)
        .cloned()
        .collect()
}

/// Distinct species names, sorted alphabetically.
///
/// Feeds the species selector; the count table already has one row per
/// species, so this is a sort plus a defensive dedup.
pub fn species_names(counts: &[SpeciesCount]) -> Vec<String> {
    let mut names: Vec<String> = counts.iter().map(|c| c.spc_common.clone()).collect();
    names.sort();
    names.dedup();
    names
}

/// Sum of all species counts, i.e. the city-wide tree total.
pub fn total_trees(counts: &[SpeciesCount]) -> u64 {
    counts.iter().map(|c| c.count).sum()
}

/// Region rows sorted by descending tree count, geometry dropped.
pub fn region_table(regions: &[RegionStats]) -> Vec<RegionCountRow> {
    let mut rows: Vec<RegionCountRow> = regions.iter().map(RegionCountRow::from).collect();
    rows.sort_by(|a, b| b.tree_count.cmp(&a.tree_count));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(name: &str, count: u64) -> SpeciesCount {
        SpeciesCount {
            spc_common: name.to_string(),
            count,
        }
    }

    fn tree(name: &str, lat: f64, lon: f64, address: &str) -> TreeRecord {
        TreeRecord {
            spc_common: name.to_string(),
            latitude: lat,
            longitude: lon,
            address: address.to_string(),
        }
    }

    #[test]
    fn test_top_n_most_and_least_common() {
        let counts = vec![count("Elm", 50), count("Oak", 5), count("Pine", 200)];

        let most = top_n(&counts, 1, RankOrder::MostCommon);
        assert_eq!(most, vec![count("Pine", 200)]);

        let least = top_n(&counts, 1, RankOrder::LeastCommon);
        assert_eq!(least, vec![count("Oak", 5)]);
    }

    #[test]
    fn test_top_n_ties_keep_input_order() {
        let counts = vec![count("Elm", 10), count("Oak", 10), count("Pine", 10)];

        let most = top_n(&counts, 2, RankOrder::MostCommon);
        assert_eq!(most[0].spc_common, "Elm");
        assert_eq!(most[1].spc_common, "Oak");

        let least = top_n(&counts, 2, RankOrder::LeastCommon);
        assert_eq!(least[0].spc_common, "Elm");
    }

    #[test]
    fn test_top_n_larger_than_input() {
        let counts = vec![count("Elm", 50), count("Oak", 5)];
        let all = top_n(&counts, 20, RankOrder::MostCommon);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].spc_common, "Elm");
    }

    #[test]
    fn test_top_and_bottom_never_overlap_with_distinct_counts() {
        // 40 species with distinct counts: the two ends of the ranking
        // must be disjoint.
        let counts: Vec<SpeciesCount> = (0..40)
            .map(|i| count(&format!("Species {:02}", i), (i as u64 + 1) * 3))
            .collect();

        let most = top_n(&counts, 20, RankOrder::MostCommon);
        let least = top_n(&counts, 20, RankOrder::LeastCommon);

        for m in &most {
            assert!(!least.iter().any(|l| l.spc_common == m.spc_common));
        }
    }

    #[test]
    fn test_filter_by_species_case_insensitive() {
        let points = vec![
            tree("Oak", 1.0, 2.0, "1 Main St"),
            tree("Elm", 3.0, 4.0, "2 Main St"),
            tree("Oak", 5.0, 6.0, "3 Main St"),
        ];

        let oaks = filter_by_species(&points, "oak");
        assert_eq!(oaks.len(), 2);
        assert!(oaks.iter().all(|p| p.spc_common == "Oak"));

        let shouting = filter_by_species(&points, "OAK");
        assert_eq!(shouting, oaks);
    }

    #[test]
    fn test_filter_by_species_absent_is_empty_not_error() {
        let points = vec![tree("Oak", 1.0, 2.0, "1 Main St")];
        let none = filter_by_species(&points, "Ginkgo");
        assert!(none.is_empty());
    }

    #[test]
    fn test_species_names_sorted_and_distinct() {
        let counts = vec![count("Pine", 200), count("Elm", 50), count("Oak", 5)];
        assert_eq!(species_names(&counts), vec!["Elm", "Oak", "Pine"]);
    }

    #[test]
    fn test_total_trees() {
        let counts = vec![count("Elm", 50), count("Oak", 5), count("Pine", 200)];
        assert_eq!(total_trees(&counts), 255);
    }

    #[test]
    fn test_region_table_sorted_descending() {
        use geo_types::MultiPolygon;

        let regions = vec![
            RegionStats {
                region_id: "Manhattan".to_string(),
                geometry: MultiPolygon(vec![]),
                tree_count: 64_972,
            },
            RegionStats {
                region_id: "Queens".to_string(),
                geometry: MultiPolygon(vec![]),
                tree_count: 240_998,
            },
        ];

        let rows = region_table(&regions);
        assert_eq!(rows[0].region_id, "Queens");
        assert_eq!(rows[1].region_id, "Manhattan");
    }
}
