//! Pipe-list classification rules

use crate::config::ClassificationRule;
use imrec_io::{Table, Value};

/// Rewrite each rule's column with its alias and drop lists
///
/// Token order is preserved. Rules naming absent columns are skipped.
/// Returns the number of rules applied.
pub fn apply_classification_rules(table: &mut Table, rules: &[ClassificationRule]) -> usize {
    let mut applied = 0;
    for rule in rules {
        let normalizer = rule.rules.normalizer();
        let found = table.map_column(&rule.column, |value| {
            if value.is_null() {
                return Value::Null;
            }
            normalizer.apply(&value.to_text(), false).into()
        });
        if found {
            tracing::debug!("Normalized pipe column {}", rule.column);
            applied += 1;
        } else {
            tracing::debug!("Classification column {} not present", rule.column);
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use imrec_identifiers::PipeRules;

    #[test]
    fn test_rules_rewrite_columns() {
        let mut table = Table::from_rows(
            ["PubMed.publication_type"],
            vec![
                vec!["Journal Article|Review Article|journal article".into()],
                vec!["Journal Article".into()],
                vec![Value::Null],
            ],
        )
        .unwrap();

        let mut rules = PipeRules::default();
        rules.alias.insert("Review Article".to_string(), "review".to_string());
        rules.drop.push("journal article".to_string());
        let rule = ClassificationRule {
            column: "PubMed.publication_type".to_string(),
            rules,
        };
        let missing = ClassificationRule {
            column: "absent".to_string(),
            ..Default::default()
        };

        assert_eq!(apply_classification_rules(&mut table, &[rule, missing]), 1);
        assert_eq!(table.get(0, "PubMed.publication_type"), &Value::text("review"));
        assert!(table.get(1, "PubMed.publication_type").is_null());
        assert!(table.get(2, "PubMed.publication_type").is_null());
    }
}
