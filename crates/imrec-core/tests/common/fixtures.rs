//! Test table builders

use imrec_core::imrec_io::{Table, Value};

/// The five provider DOI columns in trust order
pub const DOI_COLUMNS: [&str; 5] = [
    "PubMed.doi",
    "crossref.doi",
    "OpenAlex.doi",
    "ChEMBL.doi",
    "scholar.doi",
];

/// One-row table holding the given provider DOIs
#[allow(dead_code)]
pub fn doi_table(dois: [&str; 5]) -> Table {
    let row = dois.iter().map(|d| text_or_null(d)).collect();
    Table::from_rows(DOI_COLUMNS, vec![row]).expect("fixture table")
}

/// Table from string cells; empty strings become nulls
#[allow(dead_code)]
pub fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    let rows = rows
        .iter()
        .map(|row| row.iter().map(|cell| text_or_null(cell)).collect())
        .collect();
    Table::from_rows(columns.iter().copied(), rows).expect("fixture table")
}

/// A small merged provider export covering the main reconciliation paths
#[allow(dead_code)]
pub fn sample_document() -> Table {
    table(
        &[
            "PMID",
            "PubMed.DOI",
            "crossref.doi",
            "OpenAlex.doi",
            "ChEMBL.doi",
            "scholar.DOI",
            "PubMed.ArticleTitle",
            "crossref.title",
            "PubMed.PublicationType",
            "PubMed.Volume",
            "ChEMBL.volume",
            "PubMed.Issue",
            "PubMed.StartPage",
            "PubMed.EndPage",
            "ISSN",
            "completed.year",
            "completed.month",
            "completed.day",
        ],
        &[
            &[
                "101", "10.1000/A", "10.1000/b", "10.1000/b", "10.1000/b", "", "Primary Title", "",
                "Journal Article", "12", "", "3", "100", "110", "1234-5678", "2020", "1", "15",
            ],
            &[
                "102", "", "10.1000/xyz", "10.1000/XYZ", "", "", "", "Crossref Title",
                "Review Article", "", "7", "4b", "", "", "", "", "", "",
            ],
            &[
                "103", "not a doi", "", "", "", "doi:10.2000/solo", "", "", "", "", "", "", "", "",
                "", "", "", "",
            ],
            &[
                "104", "", "", "", "", "", "Untitled", "", "", "", "", "", "", "", "", "", "", "",
            ],
        ],
    )
}

fn text_or_null(cell: &str) -> Value {
    if cell.is_empty() {
        Value::Null
    } else {
        Value::text(cell)
    }
}
