//! Document reference merge
//!
//! A reference table keyed by `pubmed_id` carries curated flags that
//! override the document's own. Rows are matched by PMID digits and the
//! first reference row for a PMID wins, so every document row maps to
//! exactly one output row.

use crate::prepare::PMID_COLUMN;
use crate::review::BASE_FLAG_COLUMN;
use imrec_identifiers::sanitize_pmid;
use imrec_io::{Table, Value};
use std::collections::HashMap;

pub const REFERENCE_KEY_COLUMN: &str = "pubmed_id";
/// Curated review classification; non-zero means review
pub const CLASSIFICATION_COLUMN: &str = "classification";
/// Flags copied from the reference when present there
pub const OVERRIDE_COLUMNS: [&str; 2] = ["document_contains_external_links", "is_experimental_doc"];

/// Numeric flag; non-zero is true, non-numeric is unknown
fn numeric_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        other => other.as_f64().map(|f| f != 0.0),
    }
}

/// Row index of the first reference row per PMID
fn index_reference(reference: &Table) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (row, record) in reference.records().enumerate() {
        if let Some(pmid) = sanitize_pmid(&record.text(REFERENCE_KEY_COLUMN)) {
            index.entry(pmid).or_insert(row);
        }
    }
    index
}

/// Override `target` with the reference column `source` where known
fn override_column(
    document: &mut Table,
    matches: &[Option<usize>],
    reference: &Table,
    source: &str,
    target: &str,
) -> crate::Result<()> {
    let values: Vec<Value> = document
        .records()
        .zip(matches)
        .map(|(record, matched)| {
            let referenced = matched.and_then(|row| numeric_flag(reference.get(row, source)));
            match referenced {
                Some(flag) => Value::Bool(flag),
                None => {
                    let current = record.get(target);
                    current
                        .as_bool()
                        .map(Value::Bool)
                        .unwrap_or_else(|| current.clone())
                }
            }
        })
        .collect();
    document.set_column(target, values)?;
    Ok(())
}

/// Left-join curated reference flags onto the document table
pub fn merge_reference(document: &mut Table, reference: &Table) -> crate::Result<()> {
    if document.is_empty() || reference.is_empty() {
        return Ok(());
    }
    if !document.has_column(PMID_COLUMN) {
        tracing::warn!("Document table has no {} column; skipping reference merge", PMID_COLUMN);
        return Ok(());
    }
    if !reference.has_column(REFERENCE_KEY_COLUMN) {
        tracing::warn!(
            "Reference table has no {} column; skipping reference merge",
            REFERENCE_KEY_COLUMN
        );
        return Ok(());
    }

    let index = index_reference(reference);
    let matches: Vec<Option<usize>> = document
        .records()
        .map(|record| {
            sanitize_pmid(&record.text(PMID_COLUMN)).and_then(|pmid| index.get(&pmid).copied())
        })
        .collect();
    let matched = matches.iter().filter(|m| m.is_some()).count();

    if reference.has_column(CLASSIFICATION_COLUMN) {
        override_column(document, &matches, reference, CLASSIFICATION_COLUMN, BASE_FLAG_COLUMN)?;
    }
    for column in OVERRIDE_COLUMNS {
        if reference.has_column(column) {
            override_column(document, &matches, reference, column, column)?;
        }
    }

    tracing::info!(
        "Merged reference flags for {} of {} documents",
        matched,
        document.num_rows()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Table {
        Table::from_rows(
            ["PMID", "review", "is_experimental_doc"],
            vec![
                vec!["1".into(), "False".into(), Value::Null],
                vec!["2".into(), "True".into(), "1".into()],
                vec![Value::Null, Value::Null, Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let reference = Table::from_rows(
            ["pubmed_id", "classification"],
            vec![
                vec!["PMID1".into(), "1".into()],
                vec!["1".into(), "0".into()],
            ],
        )
        .unwrap();
        let mut doc = document();
        merge_reference(&mut doc, &reference).unwrap();
        assert_eq!(doc.num_rows(), 3);
        assert_eq!(doc.get(0, "review"), &Value::Bool(true));
        assert_eq!(doc.get(1, "review"), &Value::Bool(true));
        assert!(doc.get(2, "review").is_null());
    }

    #[test]
    fn test_override_columns() {
        let reference = Table::from_rows(
            ["pubmed_id", "is_experimental_doc", "document_contains_external_links"],
            vec![vec!["2".into(), "0".into(), "x".into()]],
        )
        .unwrap();
        let mut doc = document();
        merge_reference(&mut doc, &reference).unwrap();
        assert_eq!(doc.get(1, "is_experimental_doc"), &Value::Bool(false));
        assert!(doc.get(0, "is_experimental_doc").is_null());
        assert!(doc.has_column("document_contains_external_links"));
        assert!(doc.get(1, "document_contains_external_links").is_null());
        assert_eq!(doc.get(0, "review"), &Value::text("False"));
    }

    #[test]
    fn test_reference_without_key_is_ignored() {
        let reference = Table::from_rows(["classification"], vec![vec!["1".into()]]).unwrap();
        let mut doc = document();
        let before = doc.clone();
        merge_reference(&mut doc, &reference).unwrap();
        assert_eq!(doc, before);
    }
}
