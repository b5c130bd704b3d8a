//! The triple store: label indexes plus an immutable id-triple array.
//!
//! Every transform returns a new store that shares the parent's label indexes
//! through `Arc`, so partitions stay index-compatible with embedding tables
//! sized for the parent.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

use crate::dense::{Column, IdMask, TripleMask};
use crate::error::{LabelKind, Result, TripleError};
use crate::inverse::InverseRelationMap;
use crate::label_index::{
    build_entity_mapping, build_relation_mapping, compact, strip_inverse_suffix, LabelIndex,
    INVERSE_SUFFIX,
};
use crate::mapper::{map_to_ids, MappingReport};
use crate::triple::{LabeledTriple, Triple};
use crate::tsv::read_labeled_triples;

/// Placeholder label for ids missing from a mapping.
pub const UNKNOWN_LABEL: &str = "[UNKNOWN]";

// ============================================================================
// Store Configuration
// ============================================================================

/// How inverse relations are handled at construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InverseTriples {
    /// Take relation labels literally; no inverse bookkeeping.
    #[default]
    Skip,
    /// Synthesize `(t, r<suffix>, h)` for every `(h, r, t)`.
    ///
    /// Fails if any input relation already ends with the suffix.
    Create,
    /// The input already contains the suffixed inverse triples.
    Existing,
}

/// Options for building a [`TripleStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreOptions {
    pub inverse: InverseTriples,
    /// Suffix that marks an inverse relation label
    pub inverse_suffix: String,
    /// Renumber supplied mappings to `0..n`
    pub compact_ids: bool,
    /// Entity mapping to reuse instead of building one from the triples
    #[serde(skip)]
    pub entity_mapping: Option<Arc<LabelIndex>>,
    /// Relation mapping to reuse instead of building one from the triples
    #[serde(skip)]
    pub relation_mapping: Option<Arc<LabelIndex>>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            inverse: InverseTriples::Skip,
            inverse_suffix: INVERSE_SUFFIX.to_string(),
            compact_ids: true,
            entity_mapping: None,
            relation_mapping: None,
        }
    }
}

impl StoreOptions {
    pub fn with_inverse(mut self, inverse: InverseTriples) -> Self {
        self.inverse = inverse;
        self
    }

    pub fn with_inverse_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.inverse_suffix = suffix.into();
        self
    }

    pub fn with_compact_ids(mut self, compact_ids: bool) -> Self {
        self.compact_ids = compact_ids;
        self
    }

    /// Reuse the mappings of an existing store, e.g. to load a test file
    /// against the training vocabulary.
    pub fn with_mappings_of(mut self, store: &TripleStore) -> Self {
        self.entity_mapping = Some(Arc::clone(&store.entities));
        self.relation_mapping = Some(Arc::clone(&store.relations));
        self
    }

    pub fn with_entity_mapping(mut self, mapping: Arc<LabelIndex>) -> Self {
        self.entity_mapping = Some(mapping);
        self
    }

    pub fn with_relation_mapping(mut self, mapping: Arc<LabelIndex>) -> Self {
        self.relation_mapping = Some(mapping);
        self
    }
}

/// How many relations [`TripleStore::most_frequent_relations`] keeps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TopRelations {
    Count(usize),
    /// Fraction of `num_relations`, in `(0, 1)`.
    Fraction(f64),
}

// ============================================================================
// TripleStore
// ============================================================================

/// Immutable knowledge-graph triple store.
#[derive(Debug, Clone)]
pub struct TripleStore {
    entities: Arc<LabelIndex>,
    relations: Arc<LabelIndex>,
    triples: Arc<[Triple]>,
    inverse: Option<Arc<InverseRelationMap>>,
}

impl TripleStore {
    /// Load a tab-separated label-triple file.
    pub fn from_file(path: impl AsRef<Path>, options: &StoreOptions) -> Result<Self> {
        let path = path.as_ref();
        let triples = read_labeled_triples(path)?;
        tracing::debug!(path = %path.display(), rows = triples.len(), "loaded label triples");
        Self::from_labels(&triples, options)
    }

    pub fn from_labels(label_triples: &[LabeledTriple], options: &StoreOptions) -> Result<Self> {
        Self::from_labels_with_report(label_triples, options).map(|(store, _)| store)
    }

    /// Like [`TripleStore::from_labels`], also returning the mapping report.
    pub fn from_labels_with_report(
        label_triples: &[LabeledTriple],
        options: &StoreOptions,
    ) -> Result<(Self, MappingReport)> {
        let suffix = options.inverse_suffix.as_str();
        let unique_relations: BTreeSet<&str> =
            label_triples.iter().map(|t| t.relation.as_str()).collect();
        let suffixed = unique_relations
            .iter()
            .copied()
            .find(|r| strip_inverse_suffix(r, suffix).is_some());

        let mut all_triples: Vec<LabeledTriple>;
        let triples: &[LabeledTriple];
        let relation_labels: BTreeSet<String>;
        match options.inverse {
            InverseTriples::Skip => {
                if let Some(relation) = suffixed {
                    tracing::warn!(
                        relation,
                        suffix,
                        "relation label carries the inverse suffix but inverse triples are skipped; \
                         treating it as an ordinary relation"
                    );
                }
                triples = label_triples;
                relation_labels = unique_relations.iter().map(|r| r.to_string()).collect();
            }
            InverseTriples::Create => {
                if let Some(relation) = suffixed {
                    return Err(TripleError::InverseSuffixPresent {
                        relation: relation.to_string(),
                        suffix: suffix.to_string(),
                    });
                }
                all_triples = Vec::with_capacity(label_triples.len() * 2);
                all_triples.extend_from_slice(label_triples);
                all_triples.extend(label_triples.iter().map(|t| {
                    LabeledTriple::new(t.tail.clone(), format!("{}{suffix}", t.relation), t.head.clone())
                }));
                triples = &all_triples;
                relation_labels = unique_relations
                    .iter()
                    .flat_map(|r| [r.to_string(), format!("{r}{suffix}")])
                    .collect();
            }
            InverseTriples::Existing => {
                if suffixed.is_none() && !unique_relations.is_empty() {
                    return Err(TripleError::NoInverseRelations {
                        suffix: suffix.to_string(),
                    });
                }
                tracing::info!(
                    suffix,
                    "input already contains inverse triples; building store on them"
                );
                triples = label_triples;
                relation_labels = unique_relations
                    .iter()
                    .flat_map(|&r| {
                        let base = strip_inverse_suffix(r, suffix).unwrap_or(r);
                        [base.to_string(), format!("{base}{suffix}")]
                    })
                    .collect();
            }
        }

        let entities = match &options.entity_mapping {
            Some(mapping) => Arc::clone(mapping),
            None => Arc::new(build_entity_mapping(triples)),
        };
        let relations = match &options.relation_mapping {
            Some(mapping) => Arc::clone(mapping),
            None => Arc::new(build_relation_mapping(&relation_labels, suffix)),
        };
        let (entities, relations) = if options.compact_ids {
            (compacted(entities), compacted(relations))
        } else {
            (entities, relations)
        };

        let (mapped, report) = map_to_ids(triples, &entities, &relations);

        let inverse = match options.inverse {
            InverseTriples::Skip => None,
            InverseTriples::Create | InverseTriples::Existing => Some(Arc::new(
                InverseRelationMap::from_relation_index(&relations, suffix),
            )),
        };

        let store = Self {
            entities,
            relations,
            triples: mapped.into(),
            inverse,
        };
        tracing::debug!(%store, "created triple store");
        Ok((store, report))
    }

    /// New store over `triples` sharing this store's mappings.
    pub(crate) fn with_triples(&self, triples: Vec<Triple>) -> Self {
        Self {
            entities: Arc::clone(&self.entities),
            relations: Arc::clone(&self.relations),
            triples: triples.into(),
            inverse: self.inverse.clone(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    pub fn num_relations(&self) -> usize {
        self.relations.len()
    }

    pub fn num_triples(&self) -> usize {
        self.triples.len()
    }

    pub fn has_inverse_triples(&self) -> bool {
        self.inverse.is_some()
    }

    /// The id-triple array.
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// The id-triple array as `[head, relation, tail]` rows.
    pub fn to_rows(&self) -> Vec<[u32; 3]> {
        self.triples.iter().map(|t| t.to_row()).collect()
    }

    pub fn entity_index(&self) -> &Arc<LabelIndex> {
        &self.entities
    }

    pub fn relation_index(&self) -> &Arc<LabelIndex> {
        &self.relations
    }

    pub fn inverse_relations(&self) -> Option<&InverseRelationMap> {
        self.inverse.as_deref()
    }

    /// Whether both stores use the very same mapping objects.
    pub fn shares_mapping_with(&self, other: &TripleStore) -> bool {
        Arc::ptr_eq(&self.entities, &other.entities)
            && Arc::ptr_eq(&self.relations, &other.relations)
    }

    /// Id of the inverse of the relation labelled `relation`.
    pub fn get_inverse_relation_id(&self, relation: &str) -> Result<u32> {
        let inverse = self.inverse.as_ref().ok_or(TripleError::NoInverseTriples)?;
        let id = self.relations.id_of(relation)?;
        inverse
            .inverse_of(id)
            .ok_or_else(|| TripleError::UnknownLabel {
                kind: LabelKind::Relation,
                label: format!("{relation}{}", inverse.suffix()),
            })
    }

    /// Id form of [`TripleStore::get_inverse_relation_id`].
    pub fn inverse_of(&self, relation: u32) -> Result<u32> {
        let inverse = self.inverse.as_ref().ok_or(TripleError::NoInverseTriples)?;
        self.relations.check_ids(&[relation])?;
        inverse.inverse_of(relation).ok_or(TripleError::UnknownId {
            kind: LabelKind::Relation,
            id: relation,
        })
    }

    /// Entity ids occurring as head or tail.
    pub fn entity_ids_in_use(&self) -> RoaringBitmap {
        entity_ids(&self.triples)
    }

    /// Relation ids occurring in any triple.
    pub fn relation_ids_in_use(&self) -> RoaringBitmap {
        relation_ids(&self.triples)
    }

    // ========================================================================
    // Masks
    // ========================================================================

    /// Rows whose head AND tail are in `entities` (with `invert`: both outside).
    pub fn mask_for_entities(&self, entities: &[u32], invert: bool) -> Result<TripleMask> {
        self.entities.check_ids(entities)?;
        let mut ids = IdMask::from_ids(entities.iter().copied(), self.entities.id_bound());
        if invert {
            ids = ids.invert();
        }
        Ok(TripleMask::columns_all(&self.triples, &ids, &Column::ENTITIES))
    }

    pub fn mask_for_entity_labels<S: AsRef<str>>(
        &self,
        entities: &[S],
        invert: bool,
    ) -> Result<TripleMask> {
        let ids = self.entities.ids_of(entities)?;
        self.mask_for_entities(&ids, invert)
    }

    /// Rows whose relation is in `relations` (with `invert`: outside).
    pub fn mask_for_relations(&self, relations: &[u32], invert: bool) -> Result<TripleMask> {
        self.relations.check_ids(relations)?;
        let mut ids = IdMask::from_ids(relations.iter().copied(), self.relations.id_bound());
        if invert {
            ids = ids.invert();
        }
        Ok(TripleMask::columns_all(&self.triples, &ids, &Column::RELATION))
    }

    pub fn mask_for_relation_labels<S: AsRef<str>>(
        &self,
        relations: &[S],
        invert: bool,
    ) -> Result<TripleMask> {
        let ids = self.relations.ids_of(relations)?;
        self.mask_for_relations(&ids, invert)
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// Keep (`keep = true`) or drop the triples with the given relations.
    pub fn filtered_by_relations(&self, relations: &[u32], keep: bool) -> Result<TripleStore> {
        let mask = self.mask_for_relations(relations, !keep)?;
        tracing::info!(
            relations = relations.len(),
            num_relations = self.num_relations(),
            kept_triples = mask.count(),
            num_triples = self.num_triples(),
            keep,
            store = %self,
            "filtering by relation"
        );
        Ok(self.with_triples(mask.select(&self.triples)))
    }

    pub fn filtered_by_relation_labels<S: AsRef<str>>(
        &self,
        relations: &[S],
        keep: bool,
    ) -> Result<TripleStore> {
        let ids = self.relations.ids_of(relations)?;
        self.filtered_by_relations(&ids, keep)
    }

    /// Keep only triples whose entities and relations are all in the given
    /// sets; `None` leaves that dimension unrestricted.
    ///
    /// On a store with inverse relations, the relation set is extended with
    /// the inverse of every requested relation.
    pub fn restricted(
        &self,
        entities: Option<&[u32]>,
        relations: Option<&[u32]>,
    ) -> Result<TripleStore> {
        let relations: Option<Vec<u32>> = match (relations, self.inverse.as_deref()) {
            (Some(ids), Some(inverse)) => {
                self.relations.check_ids(ids)?;
                tracing::info!(
                    store = %self,
                    "store contains inverse relations; extending the relation filter with them"
                );
                let mut extended = ids.to_vec();
                extended.extend(ids.iter().filter_map(|&r| inverse.inverse_of(r)));
                Some(extended)
            }
            (Some(ids), None) => Some(ids.to_vec()),
            (None, _) => None,
        };

        let mut keep: Option<TripleMask> = None;

        if let Some(ids) = entities {
            keep = Some(self.mask_for_entities(ids, false)?);
            tracing::info!(
                kept = ids.len(),
                total = self.num_entities(),
                "keeping entities"
            );
        }

        if let Some(ids) = &relations {
            let mask = self.mask_for_relations(ids, false)?;
            tracing::info!(
                kept = ids.len(),
                total = self.num_relations(),
                "keeping relations"
            );
            keep = Some(match keep {
                Some(k) => k.and(&mask),
                None => mask,
            });
        }

        let Some(keep) = keep else {
            return Ok(self.clone());
        };

        tracing::info!(
            kept = keep.count(),
            total = self.num_triples(),
            "keeping triples"
        );
        Ok(self.with_triples(keep.select(&self.triples)))
    }

    /// Label-based [`TripleStore::restricted`].
    pub fn restricted_by_labels<S: AsRef<str>>(
        &self,
        entities: Option<&[S]>,
        relations: Option<&[S]>,
    ) -> Result<TripleStore> {
        let entities = entities.map(|l| self.entities.ids_of(l)).transpose()?;
        let relations = relations.map(|l| self.relations.ids_of(l)).transpose()?;
        self.restricted(entities.as_deref(), relations.as_deref())
    }

    // ========================================================================
    // Label Translation
    // ========================================================================

    /// Map external label triples with this store's mapping.
    pub fn map_labeled_triples(
        &self,
        label_triples: &[LabeledTriple],
    ) -> (Vec<Triple>, MappingReport) {
        map_to_ids(label_triples, &self.entities, &self.relations)
    }

    /// Render id triples as labels, substituting `unknown_label` for ids
    /// missing from the mapping.
    pub fn label_triples(&self, triples: &[Triple], unknown_label: &str) -> Vec<LabeledTriple> {
        let entity = |id: u32| self.entities.label(id).unwrap_or(unknown_label);
        let relation = |id: u32| self.relations.label(id).unwrap_or(unknown_label);
        triples
            .iter()
            .map(|t| LabeledTriple::new(entity(t.head), relation(t.relation), entity(t.tail)))
            .collect()
    }

    /// All triples of this store as labels.
    pub fn labeled_triples(&self) -> Vec<LabeledTriple> {
        tracing::warn!("reconstructing all label-based triples; this is expensive and rarely needed");
        self.label_triples(&self.triples, UNKNOWN_LABEL)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Ids of the most frequent relations; ties go to the smaller id.
    pub fn most_frequent_relations(&self, top: TopRelations) -> Result<BTreeSet<u32>> {
        let n = match top {
            TopRelations::Count(n) => n,
            TopRelations::Fraction(f) => {
                if !(f > 0.0 && f < 1.0) {
                    return Err(TripleError::InvalidRatioShape(format!(
                        "relation fraction must be in (0, 1), got {f}"
                    )));
                }
                (self.num_relations() as f64 * f) as usize
            }
        };
        tracing::info!(n, store = %self, "applying relation frequency cutoff");

        let mut counts = vec![0usize; self.relations.id_bound()];
        for t in self.triples.iter() {
            counts[t.relation as usize] += 1;
        }
        let mut used: Vec<(u32, usize)> = counts
            .into_iter()
            .enumerate()
            .filter(|&(_, c)| c > 0)
            .map(|(id, c)| (id as u32, c))
            .collect();
        used.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(used.into_iter().take(n).map(|(id, _)| id).collect())
    }
}

impl fmt::Display for TripleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TripleStore(num_entities={}, num_relations={}, num_triples={}, inverse_triples={})",
            self.num_entities(),
            self.num_relations(),
            self.num_triples(),
            self.has_inverse_triples()
        )
    }
}

fn compacted(mapping: Arc<LabelIndex>) -> Arc<LabelIndex> {
    if mapping.is_compact() {
        mapping
    } else {
        Arc::new(compact(&mapping).0)
    }
}

/// Entity ids in head or tail position.
pub(crate) fn entity_ids(triples: &[Triple]) -> RoaringBitmap {
    let mut ids = RoaringBitmap::new();
    for t in triples {
        ids.insert(t.head);
        ids.insert(t.tail);
    }
    ids
}

pub(crate) fn relation_ids(triples: &[Triple]) -> RoaringBitmap {
    triples.iter().map(|t| t.relation).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lt(h: &str, r: &str, t: &str) -> LabeledTriple {
        LabeledTriple::new(h, r, t)
    }

    fn family() -> TripleStore {
        let triples = vec![
            lt("ann", "parent_of", "bob"),
            lt("bob", "parent_of", "cid"),
            lt("ann", "knows", "cid"),
            lt("dan", "knows", "ann"),
            lt("bob", "parent_of", "cid"),
        ];
        TripleStore::from_labels(&triples, &StoreOptions::default()).unwrap()
    }

    #[test]
    fn construction_deduplicates_and_counts() {
        let store = family();
        assert_eq!(store.num_entities(), 4);
        assert_eq!(store.num_relations(), 2);
        assert_eq!(store.num_triples(), 4);
        assert!(!store.has_inverse_triples());
        assert_eq!(
            store.to_string(),
            "TripleStore(num_entities=4, num_relations=2, num_triples=4, inverse_triples=false)"
        );
    }

    #[test]
    fn create_inverse_doubles_relations_and_rows() {
        let triples = vec![lt("a", "likes", "b")];
        let options = StoreOptions::default().with_inverse(InverseTriples::Create);
        let store = TripleStore::from_labels(&triples, &options).unwrap();

        assert_eq!(store.num_relations(), 2);
        assert_eq!(store.num_triples(), 2);
        let likes_inverse = store.relation_index().get("likes_inverse").unwrap();
        assert_eq!(store.get_inverse_relation_id("likes").unwrap(), likes_inverse);
        assert_eq!(
            store.inverse_of(likes_inverse).unwrap(),
            store.relation_index().get("likes").unwrap()
        );
    }

    #[test]
    fn create_inverse_rejects_already_suffixed_input() {
        let triples = vec![lt("a", "likes", "b"), lt("b", "likes_inverse", "a")];
        let options = StoreOptions::default().with_inverse(InverseTriples::Create);
        let err = TripleStore::from_labels(&triples, &options).unwrap_err();
        assert!(matches!(err, TripleError::InverseSuffixPresent { .. }));
    }

    #[test]
    fn existing_inverse_is_not_doubled_again() {
        let triples = vec![lt("a", "likes", "b"), lt("b", "likes_inverse", "a")];
        let options = StoreOptions::default().with_inverse(InverseTriples::Existing);
        let store = TripleStore::from_labels(&triples, &options).unwrap();
        assert_eq!(store.num_relations(), 2);
        assert_eq!(store.num_triples(), 2);
        assert!(store.get_inverse_relation_id("likes").is_ok());
    }

    #[test]
    fn existing_inverse_requires_a_suffixed_relation() {
        let triples = vec![lt("a", "likes", "b")];
        let options = StoreOptions::default().with_inverse(InverseTriples::Existing);
        assert!(matches!(
            TripleStore::from_labels(&triples, &options),
            Err(TripleError::NoInverseRelations { .. })
        ));
    }

    #[test]
    fn skip_takes_suffixed_labels_literally() {
        let triples = vec![lt("a", "undo_inverse", "b")];
        let store = TripleStore::from_labels(&triples, &StoreOptions::default()).unwrap();
        assert_eq!(store.num_relations(), 1);
        assert!(matches!(
            store.get_inverse_relation_id("undo_inverse"),
            Err(TripleError::NoInverseTriples)
        ));
    }

    #[test]
    fn entity_mask_needs_both_ends() {
        let store = family();
        let mask = store.mask_for_entity_labels(&["ann", "bob"], false).unwrap();
        let kept = store.label_triples(&mask.select(store.triples()), UNKNOWN_LABEL);
        assert_eq!(kept, vec![lt("ann", "parent_of", "bob")]);

        let outside = store.mask_for_entity_labels(&["ann"], true).unwrap();
        let kept = store.label_triples(&outside.select(store.triples()), UNKNOWN_LABEL);
        assert_eq!(kept, vec![lt("bob", "parent_of", "cid")]);
    }

    #[test]
    fn relation_filters_share_the_parent_mapping() {
        let store = family();
        let knows = store.filtered_by_relation_labels(&["knows"], true).unwrap();
        let without = store.filtered_by_relation_labels(&["knows"], false).unwrap();
        assert_eq!(knows.num_triples(), 2);
        assert_eq!(without.num_triples(), 2);
        assert!(knows.shares_mapping_with(&store));
        assert_eq!(knows.num_entities(), store.num_entities());
        assert_eq!(store.num_triples(), 4);
    }

    #[test]
    fn unknown_labels_and_ids_are_lookup_errors() {
        let store = family();
        assert!(matches!(
            store.mask_for_relation_labels(&["married_to"], false),
            Err(TripleError::UnknownLabel { .. })
        ));
        assert!(matches!(
            store.mask_for_entities(&[99], false),
            Err(TripleError::UnknownId { id: 99, .. })
        ));
    }

    #[test]
    fn restriction_on_inverse_store_adds_inverse_relations() {
        let triples = vec![lt("a", "likes", "b"), lt("b", "knows", "c")];
        let options = StoreOptions::default().with_inverse(InverseTriples::Create);
        let store = TripleStore::from_labels(&triples, &options).unwrap();

        let restricted = store.restricted_by_labels(None, Some(&["likes"][..])).unwrap();
        let labels: BTreeSet<LabeledTriple> = restricted.labeled_triples().into_iter().collect();
        assert_eq!(
            labels,
            BTreeSet::from([lt("a", "likes", "b"), lt("b", "likes_inverse", "a")])
        );
    }

    #[test]
    fn unrestricted_restriction_returns_shared_store() {
        let store = family();
        let same = store.restricted(None, None).unwrap();
        assert_eq!(same.triples(), store.triples());
        assert!(same.shares_mapping_with(&store));
    }

    #[test]
    fn supplied_mapping_drops_unknown_rows() {
        let train = family();
        let test_rows = vec![lt("ann", "knows", "bob"), lt("eve", "knows", "ann")];
        let options = StoreOptions::default().with_mappings_of(&train);
        let (test, report) = TripleStore::from_labels_with_report(&test_rows, &options).unwrap();
        assert_eq!(test.num_triples(), 1);
        assert_eq!(report.dropped_rows, 1);
        assert!(test.shares_mapping_with(&train));
    }

    #[test]
    fn sparse_supplied_mapping_is_compacted_on_request() {
        let entities = Arc::new(
            LabelIndex::from_mapping(LabelKind::Entity, [("a", 10), ("b", 20)]).unwrap(),
        );
        let rows = vec![lt("a", "r", "b")];

        let compacted = TripleStore::from_labels(
            &rows,
            &StoreOptions::default().with_entity_mapping(Arc::clone(&entities)),
        )
        .unwrap();
        assert_eq!(compacted.triples(), &[Triple::new(0, 0, 1)]);

        let sparse = TripleStore::from_labels(
            &rows,
            &StoreOptions::default()
                .with_entity_mapping(entities)
                .with_compact_ids(false),
        )
        .unwrap();
        assert_eq!(sparse.triples(), &[Triple::new(10, 0, 20)]);
        assert_eq!(sparse.num_entities(), 2);
    }

    #[test]
    fn unknown_ids_render_with_placeholder() {
        let store = family();
        let rows = store.label_triples(&[Triple::new(0, 7, 42)], UNKNOWN_LABEL);
        assert_eq!(rows, vec![lt("ann", UNKNOWN_LABEL, UNKNOWN_LABEL)]);
    }

    #[test]
    fn most_frequent_relations_breaks_ties_by_id() {
        let triples = vec![
            lt("a", "r1", "b"),
            lt("a", "r2", "b"),
            lt("b", "r2", "c"),
            lt("a", "r3", "c"),
        ];
        let store = TripleStore::from_labels(&triples, &StoreOptions::default()).unwrap();
        let r1 = store.relation_index().get("r1").unwrap();
        let r2 = store.relation_index().get("r2").unwrap();

        let top = store.most_frequent_relations(TopRelations::Count(2)).unwrap();
        assert_eq!(top, BTreeSet::from([r1, r2]));

        let top = store.most_frequent_relations(TopRelations::Fraction(0.5)).unwrap();
        assert_eq!(top, BTreeSet::from([r2]));

        assert!(store
            .most_frequent_relations(TopRelations::Fraction(1.5))
            .is_err());
    }
}
