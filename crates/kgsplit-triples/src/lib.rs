//! kgsplit-triples: Label-Indexed Knowledge-Graph Triple Store
//!
//! Turns `(head, relation, tail)` label triples into a dense id-triple array
//! and splits it into training/testing/validation groups that stay usable for
//! embedding models.
//!
//! Key pieces:
//! 1. **Label indexes**: sorted, contiguous label ↔ id bijections per kind
//! 2. **Inverse relations**: optional `r_inverse` twins with adjacent ids
//! 3. **Masks**: dense lookup tables for entity/relation filtering
//! 4. **Splitting**: seeded ChaCha permutation, then coverage repair so that
//!    every entity and relation of any group also occurs in training
//!
//! ## Module Organization
//!
//! - `label_index`: label ↔ id bijections and their construction
//! - `mapper`: label triples → id triples, with drop/dedup accounting
//! - `store`: the immutable [`TripleStore`] and its transforms
//! - `split`: ratio normalization, group sizing and the split itself
//! - `cleanup`: deterministic and randomized coverage repair
//! - `table`: labelled rendering of id triples with extra columns
//! - `tsv`: tab-separated label-triple files

pub mod cleanup;
pub mod dense;
pub mod error;
pub mod inverse;
pub mod label_index;
pub mod mapper;
pub mod split;
pub mod store;
pub mod table;
pub mod triple;
pub mod tsv;

// Re-export key types
pub use cleanup::{CleanupMode, RepairStats};
pub use dense::{Column, DenseTable, IdMask, TripleMask};
pub use error::{LabelKind, Result, TripleError};
pub use inverse::InverseRelationMap;
pub use label_index::{LabelIndex, INVERSE_SUFFIX};
pub use mapper::MappingReport;
pub use split::{Ratios, SplitConfig, SplitOutcome, SplitPlan, SplitReport};
pub use store::{InverseTriples, StoreOptions, TopRelations, TripleStore, UNKNOWN_LABEL};
pub use table::{LabeledRow, LabeledTable, TRIPLE_COLUMNS};
pub use triple::{LabeledTriple, Triple};
