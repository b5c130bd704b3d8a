//! kgsplit CLI
//!
//! Command-line interface for:
//! - Splitting a label-triple TSV into training/testing/validation files
//! - Printing store statistics (counts, most frequent relations)
//! - Timing deterministic vs randomized coverage repair

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use kgsplit_triples::{
    tsv::write_labeled_triples, CleanupMode, InverseTriples, SplitConfig, StoreOptions,
    TopRelations, TripleStore, UNKNOWN_LABEL,
};

mod bench;

#[derive(Parser)]
#[command(name = "kgsplit")]
#[command(
    author,
    version,
    about = "kgsplit: coverage-preserving knowledge-graph splits"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a triple file into partitions where training covers every
    /// entity and relation of the other partitions.
    Split {
        /// Input TSV (`head<TAB>relation<TAB>tail`)
        input: PathBuf,
        /// Comma-separated ratios, e.g. `0.8,0.1`
        #[arg(long, value_delimiter = ',', num_args = 1.., default_value = "0.8")]
        ratios: Vec<f64>,
        /// Seed for the permutation (drawn and logged when absent)
        #[arg(long)]
        seed: Option<u64>,
        /// Use randomized cleanup instead of deterministic
        #[arg(long)]
        randomized: bool,
        /// Inverse triple handling; bare `--inverse` means `create`
        #[arg(
            long,
            value_enum,
            default_value_t = InverseArg::Skip,
            num_args = 0..=1,
            default_missing_value = "create"
        )]
        inverse: InverseArg,
        /// Output directory for the partition files
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Print counts and the most frequent relations.
    Stats {
        /// Input TSV
        input: PathBuf,
        #[arg(
            long,
            value_enum,
            default_value_t = InverseArg::Skip,
            num_args = 0..=1,
            default_missing_value = "create"
        )]
        inverse: InverseArg,
        /// How many relations to list
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Time both cleanup modes on a `[ratio, (1-ratio)/2]` split.
    Bench {
        /// Input TSV
        input: PathBuf,
        /// Training ratio
        #[arg(long, default_value_t = 0.8)]
        ratio: f64,
        /// Replicates per mode; replicate `i` uses seed `i`
        #[arg(long, default_value_t = 3)]
        replicates: usize,
        /// Write the timing table as TSV
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InverseArg {
    Skip,
    Create,
    Existing,
}

impl From<InverseArg> for InverseTriples {
    fn from(arg: InverseArg) -> Self {
        match arg {
            InverseArg::Skip => InverseTriples::Skip,
            InverseArg::Create => InverseTriples::Create,
            InverseArg::Existing => InverseTriples::Existing,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Split {
            input,
            ratios,
            seed,
            randomized,
            inverse,
            out,
        } => {
            let mode = if randomized {
                CleanupMode::Randomized
            } else {
                CleanupMode::Deterministic
            };
            let mut config = SplitConfig::new(ratios).with_cleanup(mode);
            config.seed = seed;
            cmd_split(&input, inverse.into(), &config, &out)?;
        }
        Commands::Stats {
            input,
            inverse,
            top,
            json,
        } => {
            cmd_stats(&input, inverse.into(), top, json)?;
        }
        Commands::Bench {
            input,
            ratio,
            replicates,
            out,
        } => {
            let store = load_store(&input, InverseTriples::Skip)?;
            let rows = bench::run(&store, ratio, replicates)?;
            bench::print(&rows);
            if let Some(out) = out {
                fs::write(&out, bench::to_tsv(&rows))
                    .with_context(|| format!("failed to write {}", out.display()))?;
                eprintln!("{} {}", "wrote".green().bold(), out.display().to_string().bold());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_store(input: &Path, inverse: InverseTriples) -> Result<TripleStore> {
    let options = StoreOptions::default().with_inverse(inverse);
    TripleStore::from_file(input, &options)
        .with_context(|| format!("failed to load triples from {}", input.display()))
}

// ============================================================================
// split
// ============================================================================

/// File name of partition `index`.
fn partition_file_name(index: usize) -> String {
    match index {
        0 => "training.tsv".to_string(),
        1 => "testing.tsv".to_string(),
        2 => "validation.tsv".to_string(),
        i => format!("part-{i}.tsv"),
    }
}

fn cmd_split(input: &Path, inverse: InverseTriples, config: &SplitConfig, out: &Path) -> Result<()> {
    println!("{} {}", "Splitting".green().bold(), input.display());
    let store = load_store(input, inverse)?;
    println!("  {store}");

    let outcome = store.split(config).context("split failed")?;
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;

    for (i, part) in outcome.parts.iter().enumerate() {
        let path = out.join(partition_file_name(i));
        let rows = part.label_triples(part.triples(), UNKNOWN_LABEL);
        write_labeled_triples(&path, &rows)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let report = &outcome.report;
    let report_path = out.join("split_report.json");
    fs::write(&report_path, serde_json::to_string_pretty(report)?)
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    println!("  seed={} cleanup={:?}", report.seed, report.cleanup);
    for (i, (requested, actual)) in report
        .requested_sizes
        .iter()
        .zip(&report.actual_sizes)
        .enumerate()
    {
        let line = format!(
            "  {:<16} requested={:<8} actual={:<8} ({:.3})",
            partition_file_name(i),
            requested,
            actual,
            report.actual_ratio(i).unwrap_or(0.0)
        );
        if requested == actual {
            println!("{line}");
        } else {
            println!("{}", line.yellow());
        }
    }
    eprintln!("{} {}", "wrote".green().bold(), out.display().to_string().bold());
    Ok(())
}

// ============================================================================
// stats
// ============================================================================

#[derive(Debug, Serialize)]
struct StoreSummary {
    num_entities: usize,
    num_relations: usize,
    num_triples: usize,
    inverse_pairs: usize,
    top_relations: Vec<RelationCount>,
}

#[derive(Debug, Serialize)]
struct RelationCount {
    id: u32,
    label: String,
    triples: usize,
}

fn summarize(store: &TripleStore, top: usize) -> Result<StoreSummary> {
    let mut counts = vec![0usize; store.relation_index().id_bound()];
    for t in store.triples() {
        counts[t.relation as usize] += 1;
    }
    let mut top_relations = Vec::new();
    for id in store.most_frequent_relations(TopRelations::Count(top))? {
        top_relations.push(RelationCount {
            id,
            label: store.relation_index().label_of(id)?.to_string(),
            triples: counts[id as usize],
        });
    }
    top_relations.sort_by(|a, b| b.triples.cmp(&a.triples).then(a.id.cmp(&b.id)));

    Ok(StoreSummary {
        num_entities: store.num_entities(),
        num_relations: store.num_relations(),
        num_triples: store.num_triples(),
        inverse_pairs: store.inverse_relations().map_or(0, |m| m.len()),
        top_relations,
    })
}

fn cmd_stats(input: &Path, inverse: InverseTriples, top: usize, json: bool) -> Result<()> {
    let store = load_store(input, inverse)?;
    let summary = summarize(&store, top)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} {}", "Store".green().bold(), input.display());
    println!("  entities={}", summary.num_entities);
    println!("  relations={}", summary.num_relations);
    println!("  triples={}", summary.num_triples);
    if store.has_inverse_triples() {
        println!("  inverse_pairs={}", summary.inverse_pairs);
    }
    if !summary.top_relations.is_empty() {
        println!("{}", "Most frequent relations".bold());
        for r in &summary.top_relations {
            println!("  {:>8}  {} (id={})", r.triples, r.label, r.id);
        }
    }
    Ok(())
}
