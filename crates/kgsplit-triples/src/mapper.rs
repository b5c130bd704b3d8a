//! Label triples → id triples.

use serde::{Deserialize, Serialize};

use crate::label_index::LabelIndex;
use crate::triple::{LabeledTriple, Triple};

/// What happened while mapping a batch of label triples.
///
/// Unmappable rows are counted here, not raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingReport {
    pub input_rows: usize,
    pub missing_heads: usize,
    pub missing_relations: usize,
    pub missing_tails: usize,
    /// Rows with at least one unmapped label.
    pub dropped_rows: usize,
    /// Mappable rows collapsed into an identical earlier row.
    pub duplicate_rows: usize,
}

impl MappingReport {
    pub fn kept_rows(&self) -> usize {
        self.input_rows - self.dropped_rows - self.duplicate_rows
    }
}

/// Map each row through `entities`/`relations`, dropping unmappable rows.
///
/// The surviving rows are sorted and deduplicated; repeated facts collapse
/// into one row.
pub fn map_to_ids(
    label_triples: &[LabeledTriple],
    entities: &LabelIndex,
    relations: &LabelIndex,
) -> (Vec<Triple>, MappingReport) {
    let mut report = MappingReport {
        input_rows: label_triples.len(),
        ..MappingReport::default()
    };

    if label_triples.is_empty() {
        tracing::warn!("provided empty triples to map");
        return (Vec::new(), report);
    }

    let mut mapped = Vec::with_capacity(label_triples.len());
    for row in label_triples {
        let head = entities.get(&row.head);
        let relation = relations.get(&row.relation);
        let tail = entities.get(&row.tail);
        report.missing_heads += usize::from(head.is_none());
        report.missing_relations += usize::from(relation.is_none());
        report.missing_tails += usize::from(tail.is_none());
        match (head, relation, tail) {
            (Some(h), Some(r), Some(t)) => mapped.push(Triple::new(h, r, t)),
            _ => report.dropped_rows += 1,
        }
    }

    if report.dropped_rows > 0 {
        tracing::warn!(
            missing_entities = report.missing_heads + report.missing_tails,
            missing_relations = report.missing_relations,
            "some triples reference entities or relations outside the mapping; they are excluded"
        );
        tracing::warn!(
            dropped = report.dropped_rows,
            total = report.input_rows,
            "filtered out unmappable triples"
        );
    }

    let before = mapped.len();
    mapped.sort_unstable();
    mapped.dedup();
    report.duplicate_rows = before - mapped.len();

    (mapped, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabelKind;

    fn index(kind: LabelKind, labels: &[&str]) -> LabelIndex {
        LabelIndex::from_ordered_labels(kind, labels.iter().copied())
    }

    #[test]
    fn unmappable_rows_are_counted_not_raised() {
        let entities = index(LabelKind::Entity, &["a", "b"]);
        let relations = index(LabelKind::Relation, &["r"]);
        let rows = vec![
            LabeledTriple::new("a", "r", "b"),
            LabeledTriple::new("a", "s", "b"),
            LabeledTriple::new("x", "r", "y"),
        ];

        let (mapped, report) = map_to_ids(&rows, &entities, &relations);
        assert_eq!(mapped, vec![Triple::new(0, 0, 1)]);
        assert_eq!(report.dropped_rows, 2);
        assert_eq!(report.missing_relations, 1);
        assert_eq!(report.missing_heads, 1);
        assert_eq!(report.missing_tails, 1);
        assert_eq!(report.kept_rows(), 1);
    }

    #[test]
    fn duplicates_collapse_and_rows_come_out_sorted() {
        let entities = index(LabelKind::Entity, &["a", "b"]);
        let relations = index(LabelKind::Relation, &["r"]);
        let rows = vec![
            LabeledTriple::new("b", "r", "a"),
            LabeledTriple::new("a", "r", "b"),
            LabeledTriple::new("b", "r", "a"),
        ];

        let (mapped, report) = map_to_ids(&rows, &entities, &relations);
        assert_eq!(mapped, vec![Triple::new(0, 0, 1), Triple::new(1, 0, 0)]);
        assert_eq!(report.duplicate_rows, 1);
    }

    #[test]
    fn nothing_mappable_yields_empty_array() {
        let entities = index(LabelKind::Entity, &["a"]);
        let relations = index(LabelKind::Relation, &["r"]);
        let (mapped, report) =
            map_to_ids(&[LabeledTriple::new("q", "q", "q")], &entities, &relations);
        assert!(mapped.is_empty());
        assert_eq!(report.dropped_rows, 1);

        let (mapped, report) = map_to_ids(&[], &entities, &relations);
        assert!(mapped.is_empty());
        assert_eq!(report, MappingReport::default());
    }
}
