//! Dense id-indexed lookup tables.
//!
//! Every bulk translation in this crate (id → label rendering, "is this id in
//! the selection?" tests for masks, "is this id missing from training?" tests
//! for coverage repair) goes through a table of length `max_id + 1` indexed
//! directly by id, instead of a hash lookup per element.

use roaring::RoaringBitmap;

use crate::triple::Triple;

/// Array of `T` indexed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseTable<T> {
    slots: Vec<T>,
}

impl<T: Clone> DenseTable<T> {
    /// A table covering ids `0..bound`, every slot set to `value`.
    pub fn filled(bound: usize, value: T) -> Self {
        Self {
            slots: vec![value; bound],
        }
    }
}

impl<T> DenseTable<T> {
    /// Number of addressable ids.
    pub fn bound(&self) -> usize {
        self.slots.len()
    }

    /// Overwrite the slot for `id`. Returns false when `id` is out of range.
    pub fn set(&mut self, id: u32, value: T) -> bool {
        match self.slots.get_mut(id as usize) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Slot for `id`, or `None` beyond the bound.
    pub fn get(&self, id: u32) -> Option<&T> {
        self.slots.get(id as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.slots.iter().enumerate().map(|(i, v)| (i as u32, v))
    }
}

impl<T> FromIterator<T> for DenseTable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

/// Boolean membership table over an id space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdMask(DenseTable<bool>);

impl IdMask {
    /// Mask of length `bound` with exactly `ids` selected.
    ///
    /// Ids at or beyond `bound` are ignored; callers validate them first.
    pub fn from_ids<I: IntoIterator<Item = u32>>(ids: I, bound: usize) -> Self {
        let mut table = DenseTable::filled(bound, false);
        for id in ids {
            table.set(id, true);
        }
        Self(table)
    }

    pub fn from_bitmap(ids: &RoaringBitmap, bound: usize) -> Self {
        Self::from_ids(ids.iter(), bound)
    }

    /// Flip every slot.
    pub fn invert(mut self) -> Self {
        for slot in self.0.slots.iter_mut() {
            *slot = !*slot;
        }
        self
    }

    /// Membership test; ids beyond the bound are not members.
    pub fn contains(&self, id: u32) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    pub fn bound(&self) -> usize {
        self.0.bound()
    }

    pub fn is_empty(&self) -> bool {
        !self.0.slots.iter().any(|&b| b)
    }
}

/// Row selection over a triple array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripleMask(Vec<bool>);

impl TripleMask {
    pub fn all(len: usize) -> Self {
        Self(vec![true; len])
    }

    /// Rows whose every listed column id is in `ids`.
    pub fn columns_all(triples: &[Triple], ids: &IdMask, columns: &[Column]) -> Self {
        Self(
            triples
                .iter()
                .map(|t| columns.iter().all(|c| ids.contains(c.of(t))))
                .collect(),
        )
    }

    /// Rows where any listed column id is in `ids`.
    pub fn columns_any(triples: &[Triple], ids: &IdMask, columns: &[Column]) -> Self {
        Self(
            triples
                .iter()
                .map(|t| columns.iter().any(|c| ids.contains(c.of(t))))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of selected rows.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|&b| b)
    }

    pub fn get(&self, row: usize) -> bool {
        self.0.get(row).copied().unwrap_or(false)
    }

    pub fn and(mut self, other: &TripleMask) -> Self {
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a = *a && *b;
        }
        self
    }

    pub fn or(mut self, other: &TripleMask) -> Self {
        for (a, b) in self.0.iter_mut().zip(&other.0) {
            *a = *a || *b;
        }
        self
    }

    pub fn not(mut self) -> Self {
        for a in self.0.iter_mut() {
            *a = !*a;
        }
        self
    }

    /// Indices of selected rows, ascending.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect()
    }

    /// Copy the selected rows out of `triples`, preserving order.
    pub fn select(&self, triples: &[Triple]) -> Vec<Triple> {
        triples
            .iter()
            .zip(&self.0)
            .filter_map(|(t, &keep)| keep.then_some(*t))
            .collect()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

/// A column of the `(head, relation, tail)` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Head,
    Relation,
    Tail,
}

impl Column {
    pub const ENTITIES: [Column; 2] = [Column::Head, Column::Tail];
    pub const RELATION: [Column; 1] = [Column::Relation];

    pub fn of(self, t: &Triple) -> u32 {
        match self {
            Column::Head => t.head,
            Column::Relation => t.relation,
            Column::Tail => t.tail,
        }
    }
}
