//! Field coalescing
//!
//! Simple descriptive fields are filled from the first provider that has a
//! non-empty value. Volume and issue are additionally parsed as integers.

use imrec_io::{RawRecord, Value};
use serde::{Deserialize, Serialize};

/// Candidate columns for the coalesced title, in preference order
pub const TITLE_CANDIDATES: [&str; 3] = ["title", "crossref.title", "ChEMBL.title"];
/// Candidate columns for the coalesced abstract
pub const ABSTRACT_CANDIDATES: [&str; 2] = ["abstract", "ChEMBL.abstract"];
/// Candidate columns for the coalesced page range
pub const PAGE_CANDIDATES: [&str; 3] = ["page", "crossref.page", "ChEMBL.page"];
/// Candidate columns for the volume number
pub const VOLUME_CANDIDATES: [&str; 2] = ["volume", "ChEMBL.volume"];
/// Candidate columns for the issue number
pub const ISSUE_CANDIDATES: [&str; 2] = ["issue", "ChEMBL.issue"];

/// First candidate whose cleaned text is non-empty
pub fn coalesce_text<I, S>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates.into_iter().find_map(|candidate| {
        let text = imrec_identifiers::clean_text(candidate.as_ref());
        (!text.is_empty()).then_some(text)
    })
}

/// First non-empty value among the named columns of a record
pub fn coalesce_columns(record: &RawRecord<'_>, columns: &[&str]) -> Option<String> {
    coalesce_text(columns.iter().map(|column| record.text(column)))
}

/// Normalize a page range: unify dashes, remove spaces, strip edge dashes
pub fn normalize_page(value: &str) -> Option<String> {
    let page: String = imrec_identifiers::clean_text(value)
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect();
    let page = page.trim_matches('-');
    (!page.is_empty()).then(|| page.to_string())
}

/// Combine separate start and end pages into one range
pub fn combine_pages(start: &str, end: &str) -> String {
    let start = imrec_identifiers::clean_text(start);
    let end = imrec_identifiers::clean_text(end);
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{}-{}", start, end),
        (false, true) => start,
        (true, false) => end,
        (true, true) => String::new(),
    }
}

/// Result of parsing an integer field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInt {
    pub value: Option<i64>,
    /// A non-empty candidate existed but was not an integer
    pub invalid: bool,
}

/// Parse the first non-empty candidate as an integer
///
/// Empty candidates are skipped without being an error; only the first
/// non-empty one is considered.
pub fn parse_int_field(record: &RawRecord<'_>, columns: &[&str]) -> ParsedInt {
    columns
        .iter()
        .map(|column| record.get(column))
        .find(|value| !value.is_blank())
        .map(parse_int_value)
        .unwrap_or_default()
}

fn parse_int_value(value: &Value) -> ParsedInt {
    match value.as_i64() {
        Some(parsed) => ParsedInt {
            value: Some(parsed),
            invalid: false,
        },
        None => ParsedInt {
            value: None,
            invalid: true,
        },
    }
}

/// Coalesced descriptive fields of one record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoalescedFields {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub page: Option<String>,
    pub volume: ParsedInt,
    pub issue: ParsedInt,
}

/// Coalesce every descriptive field of a record
pub fn coalesce_fields(record: &RawRecord<'_>) -> CoalescedFields {
    let pages = PAGE_CANDIDATES
        .iter()
        .filter_map(|column| normalize_page(&record.text(column)));

    CoalescedFields {
        title: coalesce_columns(record, &TITLE_CANDIDATES),
        abstract_text: coalesce_columns(record, &ABSTRACT_CANDIDATES),
        page: coalesce_text(pages),
        volume: parse_int_field(record, &VOLUME_CANDIDATES),
        issue: parse_int_field(record, &ISSUE_CANDIDATES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imrec_io::Table;

    #[test]
    fn test_coalesce_text_skips_blank() {
        assert_eq!(
            coalesce_text(["", "  ", "Second", "Third"]),
            Some("Second".to_string())
        );
        assert_eq!(coalesce_text(["", "\u{0007}"]), None);
        assert_eq!(coalesce_text(Vec::<String>::new()), None);
    }

    #[test]
    fn test_normalize_page() {
        assert_eq!(normalize_page("12 \u{2013} 19"), Some("12-19".to_string()));
        assert_eq!(normalize_page("e1234\u{2014}"), Some("e1234".to_string()));
        assert_eq!(normalize_page("--"), None);
        assert_eq!(normalize_page(""), None);
    }

    #[test]
    fn test_combine_pages() {
        assert_eq!(combine_pages("101", "110"), "101-110");
        assert_eq!(combine_pages("101", ""), "101");
        assert_eq!(combine_pages("", "110"), "110");
        assert_eq!(combine_pages(" ", ""), "");
    }

    #[test]
    fn test_parse_int_uses_first_non_empty() {
        let table = Table::from_rows(
            ["volume", "ChEMBL.volume", "issue", "ChEMBL.issue"],
            vec![
                vec![Value::Null, "12".into(), "4a".into(), "4".into()],
                vec![Value::Float(7.0), Value::Null, Value::Null, Value::Null],
            ],
        )
        .unwrap();

        let first = table.record(0).unwrap();
        assert_eq!(
            parse_int_field(&first, &VOLUME_CANDIDATES),
            ParsedInt {
                value: Some(12),
                invalid: false
            }
        );
        assert_eq!(
            parse_int_field(&first, &ISSUE_CANDIDATES),
            ParsedInt {
                value: None,
                invalid: true
            }
        );

        let second = table.record(1).unwrap();
        assert_eq!(parse_int_field(&second, &VOLUME_CANDIDATES).value, Some(7));
        assert_eq!(parse_int_field(&second, &ISSUE_CANDIDATES), ParsedInt::default());
    }

    #[test]
    fn test_coalesce_fields() {
        let table = Table::from_rows(
            ["title", "crossref.title", "ChEMBL.abstract", "crossref.page"],
            vec![vec![
                Value::Null,
                "Crossref Title".into(),
                "Abstract".into(),
                "5 \u{2013} 9".into(),
            ]],
        )
        .unwrap();
        let fields = coalesce_fields(&table.record(0).unwrap());
        assert_eq!(fields.title.as_deref(), Some("Crossref Title"));
        assert_eq!(fields.abstract_text.as_deref(), Some("Abstract"));
        assert_eq!(fields.page.as_deref(), Some("5-9"));
        assert_eq!(fields.volume, ParsedInt::default());
    }
}
