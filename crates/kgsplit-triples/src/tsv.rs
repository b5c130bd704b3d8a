//! Flat tab-separated label-triple files.
//!
//! One triple per line, `head<TAB>relation<TAB>tail`, UTF-8, no header and no
//! escaping. Empty lines are skipped; a line with an empty field is an error.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, TripleError};
use crate::triple::LabeledTriple;

pub fn read_labeled_triples(path: impl AsRef<Path>) -> Result<Vec<LabeledTriple>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    parse_labeled_triples(&text, path)
}

/// Parse TSV text; `origin` only names the source in error messages.
pub fn parse_labeled_triples(text: &str, origin: &Path) -> Result<Vec<LabeledTriple>> {
    let mut out = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let [head, relation, tail] = fields.as_slice() else {
            return Err(TripleError::Parse {
                path: origin.to_path_buf(),
                line: i + 1,
                message: format!("expected 3 tab-separated fields, found {}", fields.len()),
            });
        };
        if let Some(column) = [head, relation, tail].iter().position(|f| f.is_empty()) {
            return Err(TripleError::Parse {
                path: origin.to_path_buf(),
                line: i + 1,
                message: format!("empty label in field {}", column + 1),
            });
        }
        out.push(LabeledTriple::new(*head, *relation, *tail));
    }
    Ok(out)
}

pub fn write_labeled_triples(path: impl AsRef<Path>, triples: &[LabeledTriple]) -> Result<()> {
    let file = fs::File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    for t in triples {
        writeln!(writer, "{}\t{}\t{}", t.head, t.relation, t.tail)?;
    }
    writer.flush()?;
    Ok(())
}
