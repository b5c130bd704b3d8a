use serde::{Deserialize, Serialize};

/// An id-based triple: one row of the `(n, 3)` array handed to training code.
///
/// Field order matches the column order, so the derived `Ord` sorts rows
/// lexicographically by `(head, relation, tail)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub head: u32,
    pub relation: u32,
    pub tail: u32,
}

impl Triple {
    pub const fn new(head: u32, relation: u32, tail: u32) -> Self {
        Self {
            head,
            relation,
            tail,
        }
    }

    pub const fn to_row(self) -> [u32; 3] {
        [self.head, self.relation, self.tail]
    }
}

impl From<[u32; 3]> for Triple {
    fn from([head, relation, tail]: [u32; 3]) -> Self {
        Self::new(head, relation, tail)
    }
}

/// A label-based triple, as read from a TSV file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LabeledTriple {
    pub head: String,
    pub relation: String,
    pub tail: String,
}

impl LabeledTriple {
    pub fn new(head: impl Into<String>, relation: impl Into<String>, tail: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            relation: relation.into(),
            tail: tail.into(),
        }
    }
}

impl<H, R, T> From<(H, R, T)> for LabeledTriple
where
    H: Into<String>,
    R: Into<String>,
    T: Into<String>,
{
    fn from((head, relation, tail): (H, R, T)) -> Self {
        Self::new(head, relation, tail)
    }
}
