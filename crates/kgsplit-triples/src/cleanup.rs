//! Coverage repair between the training group and every other group.
//!
//! After slicing a permutation, a test or validation group can mention an
//! entity or relation that never occurs in training, which no embedding model
//! can score. Repair moves such rows into training until every id of the other
//! group is covered.
//!
//! - **Deterministic**: one scan, move every offending row at once. O(n), may
//!   overshoot the requested ratio.
//! - **Randomized**: move one random offending row, rescan, repeat until
//!   clean. O(k·n) for k missing ids, but moves fewer rows since one row can
//!   cover several missing ids at once.

use rand::seq::SliceRandom;
use rand::Rng;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

use crate::dense::{Column, IdMask, TripleMask};
use crate::store::{entity_ids, relation_ids};
use crate::triple::Triple;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupMode {
    #[default]
    Deterministic,
    Randomized,
}

/// Work done repairing one `(training, other)` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairStats {
    /// Rows moved from the other group into training.
    pub moved: usize,
    /// Full must-move scans over the other group.
    pub scans: usize,
}

/// Rows of `other` carrying an entity or relation id absent from `training`.
pub fn must_move_mask(training: &[Triple], other: &[Triple]) -> TripleMask {
    let missing_entities = entity_ids(other) - entity_ids(training);
    let missing_relations = relation_ids(other) - relation_ids(training);

    let entities = IdMask::from_bitmap(&missing_entities, bound_of(&missing_entities));
    let relations = IdMask::from_bitmap(&missing_relations, bound_of(&missing_relations));

    TripleMask::columns_any(other, &entities, &Column::ENTITIES).or(&TripleMask::columns_any(
        other,
        &relations,
        &Column::RELATION,
    ))
}

fn bound_of(ids: &RoaringBitmap) -> usize {
    ids.max().map(|max| max as usize + 1).unwrap_or(0)
}

/// Move the whole must-move subset of `other` into `training` in one batch.
///
/// Relative order is kept on both sides; moved rows are appended to training.
pub fn repair_deterministic(training: &mut Vec<Triple>, other: &mut Vec<Triple>) -> RepairStats {
    let mask = must_move_mask(training, other);
    let moved = mask.count();
    if moved > 0 {
        training.extend(mask.select(other));
        *other = mask.not().select(other);
    }
    RepairStats { moved, scans: 1 }
}

/// Move one uniformly chosen must-move row at a time, rescanning after each.
pub fn repair_randomized<R: Rng + ?Sized>(
    training: &mut Vec<Triple>,
    other: &mut Vec<Triple>,
    rng: &mut R,
) -> RepairStats {
    let mut stats = RepairStats::default();
    loop {
        let mask = must_move_mask(training, other);
        stats.scans += 1;
        let candidates = mask.selected_rows();
        let Some(&row) = candidates.choose(rng) else {
            return stats;
        };
        training.push(other.remove(row));
        stats.moved += 1;
    }
}

/// Repair `groups[0]` against each later group in order.
///
/// Each pass can grow the training group, which can only shrink the work
/// needed for the groups after it.
pub fn repair_groups<R: Rng + ?Sized>(
    groups: Vec<Vec<Triple>>,
    mode: CleanupMode,
    rng: &mut R,
) -> (Vec<Vec<Triple>>, Vec<RepairStats>) {
    let mut groups = groups.into_iter();
    let Some(mut training) = groups.next() else {
        return (Vec::new(), Vec::new());
    };

    let mut others = Vec::new();
    let mut stats = Vec::new();
    for mut other in groups {
        let pass = match mode {
            CleanupMode::Deterministic => repair_deterministic(&mut training, &mut other),
            CleanupMode::Randomized => repair_randomized(&mut training, &mut other, rng),
        };
        tracing::debug!(
            group = others.len() + 1,
            moved = pass.moved,
            scans = pass.scans,
            "repaired coverage"
        );
        stats.push(pass);
        others.push(other);
    }

    let mut out = Vec::with_capacity(others.len() + 1);
    out.push(training);
    out.extend(others);
    (out, stats)
}
