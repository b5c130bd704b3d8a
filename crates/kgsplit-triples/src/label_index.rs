//! Label ↔ id mappings for entities and relations.
//!
//! Ids are assigned by sorting labels, never by first appearance, so the same
//! triple set yields the same mapping no matter how the input rows are
//! ordered.

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;

use crate::dense::DenseTable;
use crate::error::{LabelKind, Result, TripleError};
use crate::triple::LabeledTriple;

/// Default suffix marking a synthesized inverse relation.
pub const INVERSE_SUFFIX: &str = "_inverse";

/// Immutable bijection between labels and ids.
#[derive(Debug, Clone)]
pub struct LabelIndex {
    kind: LabelKind,
    ids: AHashMap<String, u32>,
    labels: DenseTable<Option<String>>,
}

impl LabelIndex {
    /// Assign ids `0..n` to `labels` in the given order.
    ///
    /// Duplicate labels keep their first id.
    pub fn from_ordered_labels<I, S>(kind: LabelKind, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids = AHashMap::new();
        let mut ordered: Vec<Option<String>> = Vec::new();
        for label in labels {
            let label = label.into();
            if ids.contains_key(&label) {
                continue;
            }
            ids.insert(label.clone(), ordered.len() as u32);
            ordered.push(Some(label));
        }
        Self {
            kind,
            ids,
            labels: ordered.into_iter().collect(),
        }
    }

    /// Adopt a caller-supplied mapping.
    ///
    /// Ids need not be contiguous, but the mapping must be a bijection: two
    /// labels sharing an id (or one label listed twice with different ids) is
    /// rejected.
    pub fn from_mapping<I, S>(kind: LabelKind, mapping: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut ids: AHashMap<String, u32> = AHashMap::new();
        let mut by_id: BTreeMap<u32, String> = BTreeMap::new();
        for (label, id) in mapping {
            let label = label.into();
            if let Some(&existing) = ids.get(&label) {
                if existing != id {
                    return Err(TripleError::InvalidMapping {
                        kind,
                        message: format!("label `{label}` is mapped to both {existing} and {id}"),
                    });
                }
                continue;
            }
            if let Some(other) = by_id.get(&id) {
                return Err(TripleError::InvalidMapping {
                    kind,
                    message: format!("id {id} is shared by `{other}` and `{label}`"),
                });
            }
            by_id.insert(id, label.clone());
            ids.insert(label, id);
        }

        let bound = by_id.keys().next_back().map(|&max| max as usize + 1).unwrap_or(0);
        let mut labels = DenseTable::filled(bound, None);
        for (id, label) in by_id {
            labels.set(id, Some(label));
        }
        Ok(Self { kind, ids, labels })
    }

    pub fn kind(&self) -> LabelKind {
        self.kind
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// One past the largest id; the size of any dense table over this space.
    pub fn id_bound(&self) -> usize {
        self.labels.bound()
    }

    /// Whether ids are exactly `0..len`.
    pub fn is_compact(&self) -> bool {
        self.len() == self.id_bound()
    }

    pub fn get(&self, label: &str) -> Option<u32> {
        self.ids.get(label).copied()
    }

    /// Id of `label`, or a lookup error naming it.
    pub fn id_of(&self, label: &str) -> Result<u32> {
        self.get(label).ok_or_else(|| TripleError::UnknownLabel {
            kind: self.kind,
            label: label.to_string(),
        })
    }

    pub fn label(&self, id: u32) -> Option<&str> {
        self.labels.get(id).and_then(|l| l.as_deref())
    }

    /// Label of `id`, or a lookup error naming it.
    pub fn label_of(&self, id: u32) -> Result<&str> {
        self.label(id).ok_or(TripleError::UnknownId {
            kind: self.kind,
            id,
        })
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.label(id).is_some()
    }

    /// Resolve a batch of labels at the API boundary.
    pub fn ids_of<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<u32>> {
        labels.iter().map(|l| self.id_of(l.as_ref())).collect()
    }

    /// Check that every id exists in this index.
    pub fn check_ids(&self, ids: &[u32]) -> Result<()> {
        match ids.iter().find(|&&id| !self.contains_id(id)) {
            Some(&id) => Err(TripleError::UnknownId {
                kind: self.kind,
                id,
            }),
            None => Ok(()),
        }
    }

    /// `(id, label)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.labels
            .iter()
            .filter_map(|(id, label)| label.as_deref().map(|l| (id, l)))
    }

    /// Plain label → id map, for handing to external consumers.
    pub fn to_mapping(&self) -> BTreeMap<String, u32> {
        self.iter().map(|(id, l)| (l.to_string(), id)).collect()
    }
}

impl PartialEq for LabelIndex {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.labels == other.labels
    }
}

impl Eq for LabelIndex {}

/// Entity mapping from the union of head and tail labels, sorted.
pub fn build_entity_mapping(triples: &[LabeledTriple]) -> LabelIndex {
    let labels: BTreeSet<&str> = triples
        .iter()
        .flat_map(|t| [t.head.as_str(), t.tail.as_str()])
        .collect();
    LabelIndex::from_ordered_labels(LabelKind::Entity, labels)
}

/// Relation mapping sorted by `(base name, carries suffix)`.
///
/// `r` and `r<suffix>` therefore receive adjacent ids, with `r` first.
pub fn build_relation_mapping<I, S>(relations: I, inverse_suffix: &str) -> LabelIndex
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let unique: BTreeSet<String> = relations
        .into_iter()
        .map(|r| r.as_ref().to_string())
        .collect();
    let mut labels: Vec<String> = unique.into_iter().collect();
    labels.sort_by(|a, b| relation_sort_key(a, inverse_suffix).cmp(&relation_sort_key(b, inverse_suffix)));
    LabelIndex::from_ordered_labels(LabelKind::Relation, labels)
}

fn relation_sort_key<'a>(label: &'a str, suffix: &str) -> (&'a str, bool) {
    match strip_inverse_suffix(label, suffix) {
        Some(base) => (base, true),
        None => (label, false),
    }
}

/// `label` without a trailing `suffix`, if it carries one.
pub fn strip_inverse_suffix<'a>(label: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() {
        return None;
    }
    label.strip_suffix(suffix)
}

/// Renumber `mapping` to `0..len` preserving relative id order.
///
/// Also returns the old-id → new-id translation table.
pub fn compact(mapping: &LabelIndex) -> (LabelIndex, DenseTable<Option<u32>>) {
    let mut translation = DenseTable::filled(mapping.id_bound(), None);
    let mut ordered = Vec::with_capacity(mapping.len());
    for (new_id, (old_id, label)) in mapping.iter().enumerate() {
        translation.set(old_id, Some(new_id as u32));
        ordered.push(label.to_string());
    }
    (
        LabelIndex::from_ordered_labels(mapping.kind(), ordered),
        translation,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lt(h: &str, r: &str, t: &str) -> LabeledTriple {
        LabeledTriple::new(h, r, t)
    }

    #[test]
    fn entity_mapping_is_sorted_union_of_heads_and_tails() {
        let triples = vec![lt("zeta", "r", "alpha"), lt("mid", "r", "zeta")];
        let index = build_entity_mapping(&triples);
        assert_eq!(index.len(), 3);
        assert_eq!(index.get("alpha"), Some(0));
        assert_eq!(index.get("mid"), Some(1));
        assert_eq!(index.get("zeta"), Some(2));
        assert!(index.is_compact());
    }

    #[test]
    fn entity_mapping_ignores_row_order() {
        let a = vec![lt("b", "r", "c"), lt("a", "r", "b")];
        let b = vec![lt("a", "r", "b"), lt("b", "r", "c")];
        assert_eq!(build_entity_mapping(&a), build_entity_mapping(&b));
    }

    #[test]
    fn relation_mapping_keeps_inverse_adjacent() {
        let index = build_relation_mapping(
            ["likes_inverse", "knows", "likes", "knows_inverse", "likesx"],
            INVERSE_SUFFIX,
        );
        let order: Vec<&str> = index.iter().map(|(_, l)| l).collect();
        assert_eq!(
            order,
            vec!["knows", "knows_inverse", "likes", "likes_inverse", "likesx"]
        );
    }

    #[test]
    fn from_mapping_rejects_shared_ids() {
        let err = LabelIndex::from_mapping(LabelKind::Entity, [("a", 0), ("b", 0)]).unwrap_err();
        assert!(matches!(err, TripleError::InvalidMapping { .. }));
    }

    #[test]
    fn compact_preserves_relative_order() {
        let sparse =
            LabelIndex::from_mapping(LabelKind::Entity, [("a", 7), ("b", 2), ("c", 4)]).unwrap();
        assert!(!sparse.is_compact());
        assert_eq!(sparse.id_bound(), 8);

        let (dense, translation) = compact(&sparse);
        assert!(dense.is_compact());
        assert_eq!(dense.get("b"), Some(0));
        assert_eq!(dense.get("c"), Some(1));
        assert_eq!(dense.get("a"), Some(2));
        assert_eq!(translation.get(7), Some(&Some(2)));
        assert_eq!(translation.get(3), Some(&None));
    }

    #[test]
    fn lookups_fail_with_the_missing_key() {
        let index = LabelIndex::from_ordered_labels(LabelKind::Relation, ["r"]);
        match index.id_of("s") {
            Err(TripleError::UnknownLabel { kind, label }) => {
                assert_eq!(kind, LabelKind::Relation);
                assert_eq!(label, "s");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            index.label_of(3),
            Err(TripleError::UnknownId { id: 3, .. })
        ));
    }
}
