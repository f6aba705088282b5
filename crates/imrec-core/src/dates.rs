//! Completion date and stable sort key

use imrec_identifiers::pmid_sort_key;
use imrec_io::RawRecord;

/// Date used when no component set is complete
pub const UNKNOWN_DATE: &str = "0000-00-00";
/// ISSN placeholder in the sort key
pub const UNKNOWN_ISSN: &str = "unknown";

pub const COMPLETED_COLUMN: &str = "completed";
pub const SORT_ORDER_COLUMN: &str = "sort_order";
pub const ISSN_COLUMN: &str = "ISSN";
pub const CHEMBL_YEAR_COLUMN: &str = "ChEMBL.year";

/// Year/month/day columns of one dated event
#[derive(Debug, Clone, Copy)]
struct DateColumns {
    year: &'static str,
    month: &'static str,
    day: &'static str,
}

const COMPLETED_DATE: DateColumns = DateColumns {
    year: "completed.year",
    month: "completed.month",
    day: "completed.day",
};

const REVISED_DATE: DateColumns = DateColumns {
    year: "revised.year",
    month: "revised.month",
    day: "revised.day",
};

/// Cleaned text left-padded with zeros; empty becomes all zeros
fn component(record: &RawRecord<'_>, column: &str, width: usize) -> String {
    format!("{:0>width$}", record.text(column), width = width)
}

fn is_zero(part: &str) -> bool {
    part.chars().all(|c| c == '0')
}

fn full_date(record: &RawRecord<'_>, columns: DateColumns) -> Option<String> {
    let year = component(record, columns.year, 4);
    let month = component(record, columns.month, 2);
    let day = component(record, columns.day, 2);
    if is_zero(&year) || is_zero(&month) || is_zero(&day) {
        None
    } else {
        Some(format!("{}-{}-{}", year, month, day))
    }
}

/// Whether the table has any complete set of date columns
pub fn has_date_columns(has_column: impl Fn(&str) -> bool) -> bool {
    [COMPLETED_DATE, REVISED_DATE]
        .iter()
        .any(|d| has_column(d.year) && has_column(d.month) && has_column(d.day))
}

/// Completion date: completed, then revised, then the ChEMBL year
pub fn build_completed(record: &RawRecord<'_>) -> String {
    full_date(record, COMPLETED_DATE)
        .or_else(|| full_date(record, REVISED_DATE))
        .or_else(|| {
            let year = component(record, CHEMBL_YEAR_COLUMN, 4);
            (!is_zero(&year)).then(|| format!("{}-00-00", year))
        })
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// `ISSN:completed:PMID` with the PMID zero-padded
pub fn build_sort_order(record: &RawRecord<'_>, completed: &str) -> String {
    let issn = record.text(ISSN_COLUMN);
    let issn = if issn.is_empty() { UNKNOWN_ISSN } else { issn.as_str() };
    let completed = if completed.is_empty() { UNKNOWN_DATE } else { completed };
    format!("{}:{}:{}", issn, completed, pmid_sort_key(&record.text("PMID")))
}
