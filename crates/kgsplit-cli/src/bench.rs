//! Timing harness for the two cleanup modes.
//!
//! Not a microbenchmark framework. It answers one practical question: on a
//! given graph, how much slower is randomized cleanup, and how much closer
//! does it stay to the requested sizes?
//!
//! ```bash
//! cargo run -p kgsplit-cli --release -- bench data/train.tsv --ratio 0.8 --replicates 5
//! ```

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::time::{Duration, Instant};

use kgsplit_triples::{CleanupMode, SplitConfig, TripleStore};

#[derive(Debug, Clone, Serialize)]
pub struct BenchRow {
    pub replicate: usize,
    pub mode: CleanupMode,
    pub seconds: f64,
    pub training: usize,
    pub testing: usize,
    pub validation: usize,
}

/// Split `store` once per `(replicate, mode)`; replicate `i` uses seed `i`
/// so both modes see the same permutation.
pub fn run(store: &TripleStore, ratio: f64, replicates: usize) -> Result<Vec<BenchRow>> {
    let ratios = vec![ratio, (1.0 - ratio) / 2.0];
    let mut rows = Vec::with_capacity(replicates * 2);

    for replicate in 0..replicates {
        for mode in [CleanupMode::Deterministic, CleanupMode::Randomized] {
            let config = SplitConfig::new(ratios.clone())
                .with_seed(replicate as u64)
                .with_cleanup(mode);

            let start = Instant::now();
            let outcome = store
                .split(&config)
                .with_context(|| format!("split failed for replicate {replicate}"))?;
            let elapsed = start.elapsed();

            let sizes = &outcome.report.actual_sizes;
            rows.push(BenchRow {
                replicate,
                mode,
                seconds: elapsed.as_secs_f64(),
                training: sizes.first().copied().unwrap_or(0),
                testing: sizes.get(1).copied().unwrap_or(0),
                validation: sizes.get(2).copied().unwrap_or(0),
            });
            tracing::info!(replicate, ?mode, elapsed = ?elapsed, "benchmarked split");
        }
    }

    Ok(rows)
}

pub fn print(rows: &[BenchRow]) {
    println!("{}", "Cleanup benchmark".green().bold());
    for row in rows {
        println!(
            "  replicate={} mode={:<13} time={:?} training={} testing={} validation={}",
            row.replicate,
            format!("{:?}", row.mode),
            Duration::from_secs_f64(row.seconds),
            row.training,
            row.testing,
            row.validation
        );
    }
}

pub fn to_tsv(rows: &[BenchRow]) -> String {
    let mut out = String::from("replicate\tmode\tseconds\ttraining\ttesting\tvalidation\n");
    for row in rows {
        let mode = match row.mode {
            CleanupMode::Deterministic => "deterministic",
            CleanupMode::Randomized => "randomized",
        };
        out.push_str(&format!(
            "{}\t{}\t{:.6}\t{}\t{}\t{}\n",
            row.replicate, mode, row.seconds, row.training, row.testing, row.validation
        ));
    }
    out
}
