use crate::dense::DenseTable;
use crate::label_index::{strip_inverse_suffix, LabelIndex};

/// Bijection between each base relation id and its inverse relation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InverseRelationMap {
    suffix: String,
    partner: DenseTable<Option<u32>>,
    inverse: DenseTable<bool>,
    pairs: usize,
}

impl InverseRelationMap {
    /// Pair every `r` with `r<suffix>` where both labels are in `relations`.
    ///
    /// Labels without a partner in the index stay unpaired.
    pub fn from_relation_index(relations: &LabelIndex, suffix: &str) -> Self {
        let bound = relations.id_bound();
        let mut partner = DenseTable::filled(bound, None);
        let mut inverse = DenseTable::filled(bound, false);
        let mut pairs = 0;
        let mut unpaired = 0usize;

        for (id, label) in relations.iter() {
            if let Some(base) = strip_inverse_suffix(label, suffix) {
                inverse.set(id, true);
                if relations.get(base).is_none() {
                    unpaired += 1;
                }
                continue;
            }
            match relations.get(&format!("{label}{suffix}")) {
                Some(inv) => {
                    partner.set(id, Some(inv));
                    partner.set(inv, Some(id));
                    pairs += 1;
                }
                None => unpaired += 1,
            }
        }

        if unpaired > 0 {
            tracing::warn!(
                unpaired,
                suffix,
                "relation mapping lacks inverse partners for some relations"
            );
        }

        Self {
            suffix: suffix.to_string(),
            partner,
            inverse,
            pairs,
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The paired id; works in both directions.
    pub fn inverse_of(&self, relation: u32) -> Option<u32> {
        self.partner.get(relation).copied().flatten()
    }

    /// Whether `relation` is the synthesized (suffixed) side of a pair.
    pub fn is_inverse(&self, relation: u32) -> bool {
        self.inverse.get(relation).copied().unwrap_or(false)
    }

    /// Number of `(base, inverse)` pairs.
    pub fn len(&self) -> usize {
        self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }

    /// `(base, inverse)` id pairs in ascending base-id order.
    pub fn pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.partner.iter().filter_map(move |(id, p)| match p {
            Some(inv) if !self.is_inverse(id) => Some((id, *inv)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label_index::{build_relation_mapping, INVERSE_SUFFIX};

    #[test]
    fn pairs_are_bidirectional_and_adjacent() {
        let relations = build_relation_mapping(
            ["likes", "likes_inverse", "knows", "knows_inverse"],
            INVERSE_SUFFIX,
        );
        let map = InverseRelationMap::from_relation_index(&relations, INVERSE_SUFFIX);
        assert_eq!(map.len(), 2);

        let likes = relations.get("likes").unwrap();
        let likes_inv = relations.get("likes_inverse").unwrap();
        assert_eq!(likes_inv, likes + 1);
        assert_eq!(map.inverse_of(likes), Some(likes_inv));
        assert_eq!(map.inverse_of(likes_inv), Some(likes));
        assert!(map.is_inverse(likes_inv));
        assert!(!map.is_inverse(likes));
        assert_eq!(map.pairs().collect::<Vec<_>>(), vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn missing_partner_stays_unpaired() {
        let relations = build_relation_mapping(["likes", "knows_inverse"], INVERSE_SUFFIX);
        let map = InverseRelationMap::from_relation_index(&relations, INVERSE_SUFFIX);
        assert!(map.is_empty());
        assert_eq!(map.inverse_of(relations.get("likes").unwrap()), None);
    }
}
