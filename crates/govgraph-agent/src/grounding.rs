//! Grounding validator — every answer word must trace to retrieved data
//!
//! Conservative by design: whitespace-granularity membership, no partial
//! credit. A word stuck to punctuation that the data doesn't contain fails
//! the check, which is the accepted false-negative cost of never showing a
//! fabricated word.

use govgraph_store::Record;
use std::collections::HashSet;

/// True iff every whitespace-delimited token of `candidate` appears in the
/// retrieved records — either as a whole stringified field value or as a
/// word within one. An empty candidate is vacuously grounded.
pub fn validate(records: &[Record], candidate: &str) -> bool {
    let mut allowed: HashSet<String> = HashSet::new();
    for record in records {
        for value in record.stringified_values() {
            for word in value.split_whitespace() {
                allowed.insert(word.to_string());
            }
            allowed.insert(value);
        }
    }

    candidate
        .split_whitespace()
        .all(|token| allowed.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, serde_json::Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn empty_candidate_is_vacuously_grounded() {
        assert!(validate(&[], ""));
        assert!(validate(
            &[record(&[("description", json!("anything"))])],
            ""
        ));
    }

    #[test]
    fn grounded_when_every_token_traces_to_data() {
        let records = [record(&[(
            "description",
            json!("Child Benefit is a weekly payment for parents"),
        )])];
        assert!(validate(&records, "Child Benefit is a weekly payment"));
        assert!(validate(&records, "payment for parents"));
    }

    #[test]
    fn one_untraceable_word_fails() {
        let records = [record(&[(
            "description",
            json!("Child Benefit is a weekly payment"),
        )])];
        assert!(!validate(&records, "Child Benefit is a generous payment"));
    }

    #[test]
    fn tokens_may_come_from_different_records_and_fields() {
        let records = [
            record(&[("name", json!("Child Benefit"))]),
            record(&[("amount", json!(25)), ("period", json!("weekly"))]),
        ];
        assert!(validate(&records, "Child Benefit 25 weekly"));
    }

    #[test]
    fn non_string_values_are_stringified() {
        let records = [record(&[("eligible", json!(true)), ("age", json!(16))])];
        assert!(validate(&records, "true 16"));
        assert!(!validate(&records, "false 16"));
    }

    #[test]
    fn punctuation_stuck_tokens_fail() {
        // Known conservative false negative: "payment." is not "payment".
        let records = [record(&[("description", json!("a weekly payment"))])];
        assert!(!validate(&records, "a weekly payment."));
    }

    #[test]
    fn no_records_grounds_nothing_but_empty() {
        assert!(!validate(&[], "anything"));
    }
}
