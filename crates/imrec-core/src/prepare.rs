//! Preparation of the merged provider table
//!
//! Provider exports use their own column names; this stage maps them onto
//! the names the rest of the pipeline reads, rebuilds the page range from
//! PubMed's split page columns and resolves a single PMID per record.

use crate::coalesce::combine_pages;
use crate::sources::Source;
use imrec_identifiers::sanitize_pmid;
use imrec_io::{Table, Value};
use std::collections::BTreeMap;

/// Provider column renames applied before any row is read
pub const SOURCE_RENAMES: [(&str, &str); 10] = [
    ("PubMed.DOI", "PubMed.doi"),
    ("PubMed.ArticleTitle", "title"),
    ("PubMed.Abstract", "abstract"),
    ("PubMed.PublicationType", "PubMed.publication_type"),
    ("PubMed.MeSH_Descriptors", "MeSH.descriptors"),
    ("PubMed.JournalISOAbbrev", "journal"),
    ("PubMed.Volume", "volume"),
    ("PubMed.Issue", "issue"),
    ("ChEMBL.authors", "authors"),
    ("scholar.DOI", "scholar.doi"),
];

pub const START_PAGE_COLUMN: &str = "PubMed.StartPage";
pub const END_PAGE_COLUMN: &str = "PubMed.EndPage";

/// Resolved PubMed identifier
pub const PMID_COLUMN: &str = "PMID";

/// Columns searched for a PMID, in order
pub const PMID_CANDIDATES: [&str; 6] = [
    "PMID",
    "PubMed.PMID",
    "ChEMBL.pubmed_id",
    "scholar.PMID",
    "crossref.PMID",
    "OpenAlex.PMID",
];

/// Map provider columns onto pipeline names and resolve the PMID
pub fn prepare_sources(table: &mut Table) -> crate::Result<()> {
    let renames: BTreeMap<String, String> = SOURCE_RENAMES
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();
    let applied = table.rename_columns(&renames);
    if !applied.is_empty() {
        tracing::debug!("Renamed provider columns: {:?}", applied);
    }

    if table.has_column(START_PAGE_COLUMN) || table.has_column(END_PAGE_COLUMN) {
        let pages: Vec<Value> = table
            .records()
            .map(|record| {
                Value::text(combine_pages(
                    &record.text(START_PAGE_COLUMN),
                    &record.text(END_PAGE_COLUMN),
                ))
            })
            .collect();
        table.set_column("page", pages)?;
    }

    let text_columns = Source::ALL
        .iter()
        .map(|source| source.doi_column())
        .chain(std::iter::once("authors"));
    for column in text_columns {
        table.map_column(column, |value| Value::text(value.to_text()));
    }

    let pmids = resolve_pmids(table);
    table.set_column(PMID_COLUMN, pmids)?;
    Ok(())
}

/// Digits of the first candidate column with any, per row
pub fn resolve_pmids(table: &Table) -> Vec<Value> {
    let present: Vec<&str> = PMID_CANDIDATES
        .iter()
        .copied()
        .filter(|column| table.has_column(column))
        .collect();

    table
        .records()
        .map(|record| {
            present
                .iter()
                .find_map(|column| sanitize_pmid(&record.text(column)))
                .into()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_sources() {
        let mut table = Table::from_rows(
            [
                "PubMed.DOI",
                "PubMed.ArticleTitle",
                "PubMed.StartPage",
                "PubMed.EndPage",
                "ChEMBL.pubmed_id",
                "crossref.doi",
            ],
            vec![
                vec![
                    " 10.1/A ".into(),
                    "Title".into(),
                    "100".into(),
                    "109".into(),
                    "PMID: 123".into(),
                    Value::Null,
                ],
                vec![
                    Value::Null,
                    Value::Null,
                    Value::Null,
                    "7".into(),
                    Value::Null,
                    "10.1/b".into(),
                ],
            ],
        )
        .unwrap();

        prepare_sources(&mut table).unwrap();

        assert!(table.has_column("PubMed.doi"));
        assert!(table.has_column("title"));
        assert!(!table.has_column("PubMed.DOI"));
        assert_eq!(table.get(0, "PubMed.doi"), &Value::text("10.1/A"));
        assert_eq!(table.get(1, "PubMed.doi"), &Value::text(""));
        assert_eq!(table.get(0, "page"), &Value::text("100-109"));
        assert_eq!(table.get(1, "page"), &Value::text("7"));
        assert_eq!(table.get(0, PMID_COLUMN), &Value::text("123"));
        assert!(table.get(1, PMID_COLUMN).is_null());
    }

    #[test]
    fn test_pmid_candidates_in_order() {
        let table = Table::from_rows(
            ["OpenAlex.PMID", "PubMed.PMID", "PMID"],
            vec![
                vec!["3".into(), "2".into(), "".into()],
                vec!["3".into(), "none".into(), Value::Null],
            ],
        )
        .unwrap();
        let pmids = resolve_pmids(&table);
        assert_eq!(pmids, vec![Value::text("2"), Value::text("3")]);
    }
}
