//! PubMed identifier sanitizing

use crate::text::clean_text;

/// Width PMIDs are padded to in sort keys
pub const PMID_SORT_WIDTH: usize = 8;

/// Keep only the ASCII digits of a value
pub fn sanitize_digits(value: &str) -> String {
    clean_text(value)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect()
}

/// Sanitize a PMID, returning `None` when no digits remain
pub fn sanitize_pmid(value: &str) -> Option<String> {
    let digits = sanitize_digits(value);
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Zero-pad a PMID for lexicographic ordering ("00000000" when absent)
pub fn pmid_sort_key(value: &str) -> String {
    let digits = sanitize_digits(value);
    if digits.is_empty() {
        "0".repeat(PMID_SORT_WIDTH)
    } else {
        format!("{:0>width$}", digits, width = PMID_SORT_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_pmid() {
        assert_eq!(sanitize_pmid("PMID: 12345"), Some("12345".to_string()));
        assert_eq!(sanitize_pmid("1001.0"), Some("10010".to_string()));
        assert_eq!(sanitize_pmid("n/a"), None);
        assert_eq!(sanitize_pmid(""), None);
    }

    #[test]
    fn test_pmid_sort_key() {
        assert_eq!(pmid_sort_key("1001"), "00001001");
        assert_eq!(pmid_sort_key(""), "00000000");
        assert_eq!(pmid_sort_key("123456789"), "123456789");
    }
}
