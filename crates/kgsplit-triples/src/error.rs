//! Error taxonomy for the triple store.
//!
//! Structural problems (bad ratios, reserved column names, malformed files,
//! unknown labels) are returned as [`TripleError`]. Data-quality problems
//! (unmappable rows, splits that drift from their requested size) are never
//! errors: they are logged and reported through `MappingReport` /
//! `SplitReport`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which label space a lookup went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Entity,
    Relation,
}

impl std::fmt::Display for LabelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelKind::Entity => f.write_str("entity"),
            LabelKind::Relation => f.write_str("relation"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TripleError {
    #[error("ratios sum to more than 1.0: {ratios:?} (sum={sum})")]
    InvalidRatios { ratios: Vec<f64>, sum: f64 },

    #[error("unsupported ratio specification: {0}")]
    InvalidRatioShape(String),

    #[error("extra column names must not be any of the reserved triple columns, but {0:?} were used")]
    ReservedColumn(Vec<String>),

    #[error("extra column `{column}` has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {kind} mapping: {message}")]
    InvalidMapping { kind: LabelKind, message: String },

    #[error(
        "relation `{relation}` already ends with `{suffix}`; use InverseTriples::Existing to \
         confirm the input already contains inverse triples, or pick a different suffix"
    )]
    InverseSuffixPresent { relation: String, suffix: String },

    #[error("InverseTriples::Existing was requested but no relation ends with `{suffix}`")]
    NoInverseRelations { suffix: String },

    #[error("cannot get an inverse relation: inverse triples were not created")]
    NoInverseTriples,

    #[error("unknown {kind} label `{label}`")]
    UnknownLabel { kind: LabelKind, label: String },

    #[error("unknown {kind} id {id}")]
    UnknownId { kind: LabelKind, id: u32 },

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, TripleError>;
