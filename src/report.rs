//! Summary assembly and text rendering.
//!
//! This module builds the census summary from the loaded tables and
//! renders the pipeline's outputs as Markdown tables or JSON for the
//! CLI.

use crate::analysis::{region_table, top_n, total_trees, RankOrder};
use crate::error::Result;
use crate::loader::discover_shards;
use crate::models::{CensusSummary, RegionCountRow, RegionKind, SpeciesCount, TreeRecord};
use crate::store::DataStore;
use chrono::Utc;

/// Assemble the full census summary from a store.
///
/// Touches the shard directory, the species counts, and the borough
/// regions; the finer-grained region tables are left to on-demand
/// queries.
pub fn build_summary(store: &DataStore, n: usize) -> Result<CensusSummary> {
    let shards = discover_shards(&store.layout().shard_dir)?;
    let species = store.species_counts()?;
    let boroughs = store.region_stats(RegionKind::Borough)?;

    Ok(CensusSummary {
        generated_at: Utc::now(),
        shard_files: shards.len(),
        total_trees: total_trees(species),
        distinct_species: species.len(),
        boroughs: region_table(boroughs),
        most_common: top_n(species, n, RankOrder::MostCommon),
        least_common: top_n(species, n, RankOrder::LeastCommon),
    })
}

/// Render the summary as a Markdown report.
pub fn summary_markdown(summary: &CensusSummary) -> String {
    let mut output = String::new();

    output.push_str("# NYC Street Tree Census 2015\n\n");

    output.push_str("## Overview\n\n");
    output.push_str(&format!(
        "- **Generated:** {}\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("- **Shard files:** {}\n", summary.shard_files));
    output.push_str(&format!("- **Total trees:** {}\n", summary.total_trees));
    output.push_str(&format!(
        "- **Distinct species:** {}\n\n",
        summary.distinct_species
    ));

    output.push_str("## Trees by Borough\n\n");
    output.push_str(&count_table("Borough", &summary.boroughs));

    output.push_str(&format!(
        "## {} Most Common Species\n\n",
        summary.most_common.len()
    ));
    output.push_str(&species_table(&summary.most_common));

    output.push_str(&format!(
        "## {} Least Common Species\n\n",
        summary.least_common.len()
    ));
    output.push_str(&species_table(&summary.least_common));

    output
}

/// Render the summary as pretty-printed JSON.
pub fn summary_json(summary: &CensusSummary) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Render one region table as Markdown, highest count first.
pub fn region_table_markdown(kind: RegionKind, rows: &[RegionCountRow]) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Trees by {}\n\n", kind));
    output.push_str(&count_table("Region", rows));
    output
}

/// Render a ranked species table as Markdown.
pub fn species_ranking_markdown(title: &str, counts: &[SpeciesCount]) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", title));
    output.push_str(&species_table(counts));
    output
}

/// Render the point table for one species as Markdown.
pub fn species_points_markdown(species: &str, points: &[TreeRecord]) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Map of {}\n\n", species));

    if points.is_empty() {
        output.push_str("No trees of this species were recorded.\n");
        return output;
    }

    output.push_str(&format!("{} trees\n\n", points.len()));
    output.push_str("| Latitude | Longitude | Address |\n");
    output.push_str("|----------|-----------|--------|\n");
    for point in points {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            point.latitude, point.longitude, point.address
        ));
    }
    output
}

fn count_table(label: &str, rows: &[RegionCountRow]) -> String {
    let mut table = String::new();
    table.push_str(&format!("| {} | Count of Trees |\n", label));
    table.push_str("|---|---|\n");
    for row in rows {
        table.push_str(&format!("| {} | {} |\n", row.region_id, row.tree_count));
    }
    table.push('\n');
    table
}

fn species_table(counts: &[SpeciesCount]) -> String {
    let mut table = String::new();
    table.push_str("| Species | Count |\n");
    table.push_str("|---|---|\n");
    for count in counts {
        table.push_str(&format!("| {} | {} |\n", count.spc_common, count.count));
    }
    table.push('\n');
    table
}
