///! CLI commands for railway-route

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::formats::TurnCostFile;
use crate::import::{import, load_crossing_ids, GraphDocument};
use crate::profile::{Profile, ProfileRegistry, RailwayConfig, KNOWN_PROFILES};
use crate::turns::{apply_geometric_restrictions, TurnCostTable};

#[derive(Parser)]
#[command(name = "railway-route")]
#[command(about = "Junction turn restrictions for railway routing graphs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive junction turn restrictions and write per-profile turn cost tables
    Restrict {
        /// Graph document (JSON)
        #[arg(long)]
        graph: PathBuf,

        /// Extra level crossing node ids (JSON list), merged with tagged nodes
        #[arg(long)]
        crossings: Option<PathBuf>,

        /// Profile configuration (.toml or .json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Comma separated profile names, overrides `use` from the config
        #[arg(long, value_delimiter = ',')]
        profiles: Vec<String>,

        /// Output directory for turn_costs.*.bin
        #[arg(short, long)]
        outdir: PathBuf,
    },

    /// Verify turn cost files (structure and checksums)
    Verify {
        /// Files to verify
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print a turn cost file header and its first records
    Inspect {
        file: PathBuf,

        /// Number of records to print
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// List known profiles
    Profiles {
        /// Profile configuration (.toml or .json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Restrict {
            graph,
            crossings,
            config,
            profiles,
            outdir,
        } => restrict(&graph, crossings.as_deref(), config.as_deref(), profiles, &outdir),
        Commands::Verify { files } => {
            for file in &files {
                let header = TurnCostFile::verify(file)?;
                println!(
                    "  ✓ {} verified ({} entries, profile {}, dimension {})",
                    file.display(),
                    header.count,
                    header.profile,
                    header.dimension.0
                );
            }
            Ok(())
        }
        Commands::Inspect { file, limit } => inspect(&file, limit),
        Commands::Profiles { config } => list_profiles(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<RailwayConfig> {
    match path {
        Some(p) => RailwayConfig::load(p).context("Failed to load profile configuration"),
        None => Ok(RailwayConfig::default()),
    }
}

fn resolve_profiles(config: &RailwayConfig, requested: Vec<String>) -> Result<Vec<Profile>> {
    let registry = config.registry()?;
    let mut names = if requested.is_empty() {
        config.requested()
    } else {
        requested
    };
    if names.is_empty() {
        names = KNOWN_PROFILES.iter().map(|s| s.to_string()).collect();
    }
    Ok(registry.resolve(&names)?)
}

fn restrict(
    graph_path: &Path,
    crossings_path: Option<&Path>,
    config_path: Option<&Path>,
    requested: Vec<String>,
    outdir: &Path,
) -> Result<()> {
    let start_time = Instant::now();

    println!("🚆 Starting junction turn restrictions");
    println!("📂 Graph: {}", graph_path.display());
    println!("📂 Output: {}", outdir.display());
    println!();

    let config = load_config(config_path)?;
    let profiles = resolve_profiles(&config, requested)?;
    println!(
        "  ✓ Resolved {} profile(s), {} with turn costs",
        profiles.len(),
        profiles.iter().filter(|p| p.supports_turn_costs()).count()
    );

    println!("Importing graph...");
    let doc = GraphDocument::load(graph_path)?;
    let mut output = import(doc).context("Graph import failed")?;
    if let Some(path) = crossings_path {
        let extra = load_crossing_ids(path)?;
        output.crossings = output.crossings.merge(extra);
    }
    println!(
        "  ✓ {} nodes, {} edges, {} level crossings",
        output.graph.n_nodes(),
        output.graph.n_edges(),
        output.crossings.len()
    );

    println!("Classifying junction movements...");
    let mut table = TurnCostTable::new();
    let stats = apply_geometric_restrictions(&output.graph, &output.crossings, &profiles, &mut table)
        .context("Turn restriction pass failed")?;
    println!(
        "  ✓ {} junctions, {} pairs evaluated, {} forbidden",
        stats.junctions, stats.pairs_evaluated, stats.pairs_forbidden
    );

    std::fs::create_dir_all(outdir)
        .with_context(|| format!("Failed to create {}", outdir.display()))?;

    println!();
    println!("Writing output files...");
    for profile in &profiles {
        let Some(dimension) = profile.turn_cost_dimension() else {
            continue;
        };
        let records = TurnCostFile::records_from_table(&table, dimension);
        let path = outdir.join(TurnCostFile::file_name(profile.name()));
        TurnCostFile::write(&path, profile.name(), dimension, &records)?;
        println!("  ✓ Wrote {} ({} entries)", path.display(), records.len());
    }

    println!();
    println!("✅ Turn restrictions complete!");
    println!("  Entries: {}", stats.entries_written);
    println!("  Time: {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

fn inspect(file: &Path, limit: usize) -> Result<()> {
    let (header, records) = TurnCostFile::read(file)?;
    println!("File:      {}", file.display());
    println!("Profile:   {}", header.profile);
    println!("Dimension: {}", header.dimension.0);
    println!("Entries:   {}", header.count);
    println!();
    println!("{:>10} {:>10} {:>10} {:>8}", "via_node", "from_edge", "to_edge", "cost");
    for r in records.iter().take(limit) {
        println!("{:>10} {:>10} {:>10} {:>8}", r.via_node, r.from_edge, r.to_edge, r.cost);
    }
    if records.len() > limit {
        println!("... {} more", records.len() - limit);
    }
    Ok(())
}

fn list_profiles(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let registry: ProfileRegistry = config.registry()?;

    println!("{:<36} {:>9} {:>6}  turn costs", "name", "maxspeed", "gauge");
    for name in registry.known_names() {
        if let Some(p) = registry.lookup(&name) {
            println!(
                "{:<36} {:>9} {:>6}  {}",
                p.name,
                p.maxspeed,
                p.gauges,
                if p.turn_costs { "yes" } else { "no" }
            );
        }
    }
    Ok(())
}
