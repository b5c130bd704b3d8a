//! Ratio-based splitting of a store into training/testing/validation groups.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::cleanup::{repair_groups, CleanupMode, RepairStats};
use crate::error::{Result, TripleError};
use crate::store::TripleStore;
use crate::triple::Triple;

/// Tolerance for "the ratios sum to 1".
const RATIO_SUM_EPSILON: f64 = 1e-9;

// ============================================================================
// Ratios
// ============================================================================

/// Requested group ratios.
///
/// - `Single(p)`: `p` for training, the rest for one other group.
/// - `List([..])`: one group per entry; if the entries sum to less than 1 the
///   remainder forms a final group, if they sum to 1 the last entry is the
///   remainder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ratios {
    Single(f64),
    List(Vec<f64>),
}

impl Default for Ratios {
    fn default() -> Self {
        Ratios::Single(0.8)
    }
}

impl From<f64> for Ratios {
    fn from(p: f64) -> Self {
        Ratios::Single(p)
    }
}

impl From<Vec<f64>> for Ratios {
    fn from(list: Vec<f64>) -> Self {
        Ratios::List(list)
    }
}

impl From<&[f64]> for Ratios {
    fn from(list: &[f64]) -> Self {
        Ratios::List(list.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Ratios {
    fn from(list: [f64; N]) -> Self {
        Ratios::List(list.to_vec())
    }
}

impl Ratios {
    /// The explicit ratios used for sizing; the last group is implicit.
    pub fn normalize(&self) -> Result<Vec<f64>> {
        let list = match self {
            Ratios::Single(p) => {
                if !(*p > 0.0 && *p < 1.0) {
                    return Err(TripleError::InvalidRatioShape(format!(
                        "a single ratio must lie in (0, 1), got {p}"
                    )));
                }
                return Ok(vec![*p]);
            }
            Ratios::List(list) => list,
        };

        if list.is_empty() {
            return Err(TripleError::InvalidRatioShape(
                "ratio list is empty".to_string(),
            ));
        }
        if let Some(bad) = list.iter().find(|r| !(r.is_finite() && **r >= 0.0)) {
            return Err(TripleError::InvalidRatioShape(format!(
                "ratios must be non-negative and finite, got {bad}"
            )));
        }

        let sum: f64 = list.iter().sum();
        if sum > 1.0 + RATIO_SUM_EPSILON {
            return Err(TripleError::InvalidRatios {
                ratios: list.clone(),
                sum,
            });
        }
        if (sum - 1.0).abs() <= RATIO_SUM_EPSILON {
            return Ok(list[..list.len() - 1].to_vec());
        }
        Ok(list.clone())
    }
}

// ============================================================================
// Split Plan
// ============================================================================

/// Pre-repair group sizes for a given triple count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPlan {
    /// Explicit ratios after normalization.
    pub ratios: Vec<f64>,
    /// One size per group: `floor(ratio * total)` each, then the remainder.
    pub sizes: Vec<usize>,
}

impl SplitPlan {
    pub fn new(ratios: &Ratios, total: usize) -> Result<Self> {
        let ratios = ratios.normalize()?;
        let mut sizes: Vec<usize> = ratios
            .iter()
            .map(|r| (r * total as f64).floor() as usize)
            .collect();
        let assigned: usize = sizes.iter().sum();
        sizes.push(total.saturating_sub(assigned));
        Ok(Self { ratios, sizes })
    }

    pub fn num_groups(&self) -> usize {
        self.sizes.len()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Configured ratio of `group`; the last group gets the remainder.
    pub fn group_ratio(&self, group: usize) -> Option<f64> {
        match group.cmp(&self.ratios.len()) {
            std::cmp::Ordering::Less => Some(self.ratios[group]),
            std::cmp::Ordering::Equal => Some((1.0 - self.ratios.iter().sum::<f64>()).max(0.0)),
            std::cmp::Ordering::Greater => None,
        }
    }

    /// Cut `triples`, visited in `order`, into contiguous groups.
    pub fn slice(&self, order: &[usize], triples: &[Triple]) -> Vec<Vec<Triple>> {
        let mut groups = Vec::with_capacity(self.sizes.len());
        let mut start = 0;
        for &size in &self.sizes {
            let end = (start + size).min(order.len());
            groups.push(order[start..end].iter().map(|&i| triples[i]).collect());
            start = end;
        }
        groups
    }
}

// ============================================================================
// Split Configuration
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub ratios: Ratios,
    /// Fixed seed; a fresh one is drawn (and logged) when absent.
    pub seed: Option<u64>,
    pub cleanup: CleanupMode,
}

impl SplitConfig {
    pub fn new(ratios: impl Into<Ratios>) -> Self {
        Self {
            ratios: ratios.into(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_cleanup(mut self, cleanup: CleanupMode) -> Self {
        self.cleanup = cleanup;
        self
    }
}

/// Requested versus delivered group sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitReport {
    /// Seed actually used; rerun with it to reproduce the split.
    pub seed: u64,
    pub cleanup: CleanupMode,
    pub total: usize,
    pub requested_sizes: Vec<usize>,
    pub actual_sizes: Vec<usize>,
    /// One entry per repaired `(training, group i)` pair.
    pub repairs: Vec<RepairStats>,
}

impl SplitReport {
    /// Share of all triples planned for `group`; `None` past the last group.
    pub fn requested_ratio(&self, group: usize) -> Option<f64> {
        self.requested_sizes
            .get(group)
            .map(|&size| ratio_of(size, self.total))
    }

    /// Share of all triples in `group` after repair.
    pub fn actual_ratio(&self, group: usize) -> Option<f64> {
        self.actual_sizes
            .get(group)
            .map(|&size| ratio_of(size, self.total))
    }

    /// Rows moved into training across all pairs.
    pub fn moved(&self) -> usize {
        self.repairs.iter().map(|r| r.moved).sum()
    }
}

fn ratio_of(size: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        size as f64 / total as f64
    }
}

#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// Training first, then the other groups in ratio order.
    pub parts: Vec<TripleStore>,
    pub report: SplitReport,
}

impl SplitOutcome {
    pub fn into_parts(self) -> Vec<TripleStore> {
        self.parts
    }
}

// ============================================================================
// Splitting
// ============================================================================

impl TripleStore {
    /// Split into groups by ratio, then repair coverage so every entity and
    /// relation in any group also occurs in the first (training) group.
    ///
    /// Ratios are validated before any randomness is drawn. The same seed and
    /// cleanup mode always give the same groups in the same order.
    pub fn split(&self, config: &SplitConfig) -> Result<SplitOutcome> {
        let total = self.num_triples();
        let plan = SplitPlan::new(&config.ratios, total)?;

        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed: u64 = rand::random();
                tracing::info!(seed, "no split seed given; drew a fresh one");
                seed
            }
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut order: Vec<usize> = (0..total).collect();
        order.shuffle(&mut rng);
        let groups = plan.slice(&order, self.triples());
        tracing::info!(sizes = ?plan.sizes(), seed, "done splitting triples to groups");

        tracing::debug!(mode = ?config.cleanup, "cleaning up groups");
        let (groups, repairs) = repair_groups(groups, config.cleanup, &mut rng);
        tracing::debug!("done cleaning up groups");

        let report = SplitReport {
            seed,
            cleanup: config.cleanup,
            total,
            requested_sizes: plan.sizes().to_vec(),
            actual_sizes: groups.iter().map(Vec::len).collect(),
            repairs,
        };
        for (i, (&requested, &actual)) in report
            .requested_sizes
            .iter()
            .zip(&report.actual_sizes)
            .enumerate()
        {
            if requested != actual {
                tracing::warn!(
                    group = i,
                    requested_ratio = format_args!("{:.3}", plan.group_ratio(i).unwrap_or(0.0)),
                    requested_size = requested,
                    actual_ratio = format_args!("{:.3}", ratio_of(actual, total)),
                    actual_size = actual,
                    "split size differs from request so that all entities/relations occur in training"
                );
            }
        }

        let parts = groups.into_iter().map(|g| self.with_triples(g)).collect();
        Ok(SplitOutcome { parts, report })
    }
}
