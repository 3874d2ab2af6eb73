//! TreeCensus - 2015 NYC Street Tree Census pipeline CLI
//!
//! Loads the census flat files and prints the tables the dashboard
//! renders: the summary report, per-region tree counts, species
//! rankings, and per-species point dumps.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing or malformed source files, bad config)

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;
use treecensus::analysis::{filter_by_species, region_table, top_n, RankOrder};
use treecensus::cli::{Args, OutputFormat};
use treecensus::config::Config;
use treecensus::loader::discover_shards;
use treecensus::models::RegionKind;
use treecensus::report;
use treecensus::store::DataStore;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        match handle_init_config() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Initialize logging
    init_logging(&args);

    info!("TreeCensus v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(()) => {}
        Err(e) => {
            error!("Pipeline failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .treecensus.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".treecensus.toml");

    if path.exists() {
        anyhow::bail!(".treecensus.toml already exists. Remove it first or edit it manually.");
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .treecensus.toml")?;

    println!("✅ Created .treecensus.toml with default settings.");
    println!("   Edit it to point at a non-standard data layout.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the requested query against the pipeline.
fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let store = DataStore::new(config.layout()).with_progress(!args.quiet);

    // Handle --dry-run: list shards and exit
    if args.dry_run {
        return handle_dry_run(&store);
    }

    let output = render_query(&args, &config, &store)?;
    emit(&args, &output)
}

/// Produce the output for whichever query the flags selected.
fn render_query(args: &Args, config: &Config, store: &DataStore) -> Result<String> {
    // Per-species point dump
    if let Some(ref species) = args.species {
        let points = store.points()?;
        let filtered = filter_by_species(points, species);
        info!("{} trees match species `{}`", filtered.len(), species);

        return Ok(match args.format {
            OutputFormat::Markdown => report::species_points_markdown(species, &filtered),
            OutputFormat::Json => serde_json::to_string_pretty(&filtered)?,
        });
    }

    // Region table
    if let Some(region) = args.region {
        let kind = RegionKind::from(region);
        let rows = region_table(store.region_stats(kind)?);

        return Ok(match args.format {
            OutputFormat::Markdown => report::region_table_markdown(kind, &rows),
            OutputFormat::Json => serde_json::to_string_pretty(&rows)?,
        });
    }

    // Species ranking
    if args.top.is_some() || args.bottom.is_some() {
        let species = store.species_counts()?;
        let (title, ranked) = if let Some(n) = args.top {
            (
                format!("{} Most Common Species", n),
                top_n(species, n, RankOrder::MostCommon),
            )
        } else {
            let n = args.bottom.unwrap_or(config.output.top_n);
            (
                format!("{} Least Common Species", n),
                top_n(species, n, RankOrder::LeastCommon),
            )
        };

        return Ok(match args.format {
            OutputFormat::Markdown => report::species_ranking_markdown(&title, &ranked),
            OutputFormat::Json => serde_json::to_string_pretty(&ranked)?,
        });
    }

    // Default: the full summary report
    let summary = report::build_summary(store, config.output.top_n)?;
    Ok(match args.format {
        OutputFormat::Markdown => report::summary_markdown(&summary),
        OutputFormat::Json => report::summary_json(&summary)?,
    })
}

/// Handle --dry-run: list the shards that would be loaded, then exit.
fn handle_dry_run(store: &DataStore) -> Result<()> {
    println!("\n🔍 Dry run: discovering CSV shards (nothing loaded)...\n");

    let shards = discover_shards(&store.layout().shard_dir)?;
    println!("   Found {} shards:\n", shards.len());
    for shard in &shards {
        println!("     📄 {}", shard.display());
    }
    println!("\n✅ Dry run complete.");
    Ok(())
}

/// Write output to the requested file, or print it.
fn emit(args: &Args, output: &str) -> Result<()> {
    match args.output {
        Some(ref path) => {
            std::fs::write(path, output)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            println!("✅ Output saved to: {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .treecensus.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}
