//! Id triples rendered as a labelled table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TripleError};
use crate::store::TripleStore;
use crate::triple::Triple;

/// Column names reserved for the triple itself.
pub const TRIPLE_COLUMNS: [&str; 6] = [
    "head_id",
    "head_label",
    "relation_id",
    "relation_label",
    "tail_id",
    "tail_label",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRow {
    pub head_id: u32,
    pub head_label: String,
    pub relation_id: u32,
    pub relation_label: String,
    pub tail_id: u32,
    pub tail_label: String,
    /// Caller-supplied columns, keyed by column name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Six triple columns followed by the extra columns in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledTable {
    pub extra_columns: Vec<String>,
    pub rows: Vec<LabeledRow>,
}

impl LabeledTable {
    pub fn columns(&self) -> Vec<&str> {
        TRIPLE_COLUMNS
            .iter()
            .copied()
            .chain(self.extra_columns.iter().map(String::as_str))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Tab-separated rendering with a header line.
    pub fn to_tsv(&self) -> String {
        let mut out = self.columns().join("\t");
        out.push('\n');
        for row in &self.rows {
            let mut fields = vec![
                row.head_id.to_string(),
                row.head_label.clone(),
                row.relation_id.to_string(),
                row.relation_label.clone(),
                row.tail_id.to_string(),
                row.tail_label.clone(),
            ];
            for column in &self.extra_columns {
                fields.push(match row.extra.get(column) {
                    Some(Value::String(s)) => s.clone(),
                    Some(v) => v.to_string(),
                    None => String::new(),
                });
            }
            out.push_str(&fields.join("\t"));
            out.push('\n');
        }
        out
    }
}

impl TripleStore {
    /// Label a batch of id triples, attaching per-row `extra_columns`.
    ///
    /// Every extra column must hold one value per triple and must not reuse a
    /// name from [`TRIPLE_COLUMNS`]. Ids absent from the mapping are lookup
    /// errors; see [`TripleStore::label_triples`] for a lenient variant.
    pub fn render_labeled(
        &self,
        triples: &[Triple],
        extra_columns: BTreeMap<String, Vec<Value>>,
    ) -> Result<LabeledTable> {
        let forbidden: Vec<String> = extra_columns
            .keys()
            .filter(|k| TRIPLE_COLUMNS.contains(&k.as_str()))
            .cloned()
            .collect();
        if !forbidden.is_empty() {
            return Err(TripleError::ReservedColumn(forbidden));
        }
        for (column, values) in &extra_columns {
            if values.len() != triples.len() {
                return Err(TripleError::ColumnLength {
                    column: column.clone(),
                    expected: triples.len(),
                    actual: values.len(),
                });
            }
        }

        let entities = self.entity_index();
        let relations = self.relation_index();
        let mut rows = Vec::with_capacity(triples.len());
        for t in triples {
            rows.push(LabeledRow {
                head_id: t.head,
                head_label: entities.label_of(t.head)?.to_string(),
                relation_id: t.relation,
                relation_label: relations.label_of(t.relation)?.to_string(),
                tail_id: t.tail,
                tail_label: entities.label_of(t.tail)?.to_string(),
                extra: BTreeMap::new(),
            });
        }

        let extra_names: Vec<String> = extra_columns.keys().cloned().collect();
        for (column, values) in extra_columns {
            for (row, value) in rows.iter_mut().zip(values) {
                row.extra.insert(column.clone(), value);
            }
        }

        Ok(LabeledTable {
            extra_columns: extra_names,
            rows,
        })
    }
}
