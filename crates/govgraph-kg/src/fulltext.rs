//! Full-text search helpers for the benefits graph
//!
//! Fuzzy lookups run against Neo4j full-text indexes. The index bootstrap
//! is idempotent and issued once at startup.

use govgraph_store::{GraphStore, ParamValue, Params, Record, StoreResult};
use std::sync::Arc;
use tracing::debug;

/// Lucene query syntax characters, stripped from user terms before they
/// reach the index.
const LUCENE_SPECIAL: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/',
];

const FULLTEXT_INDEXES: &[(&str, &str, &str)] = &[
    ("child_benefit_topic", "ChildBenefit", "topic"),
    ("document_type", "Document", "documentType"),
    ("requirement_type", "Requirement", "requirementType"),
];

/// Remove Lucene special characters from a single term.
pub fn sanitize_lucene(term: &str) -> String {
    term.chars().filter(|c| !LUCENE_SPECIAL.contains(c)).collect()
}

/// Build a fuzzy full-text clause from free-text input: each sanitized
/// word becomes `word~2`, joined with AND.
pub fn fulltext_query(input: &str) -> String {
    input
        .split_whitespace()
        .map(sanitize_lucene)
        .filter(|w| !w.is_empty())
        .map(|w| format!("{}~2", w))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Create the full-text indexes the benefit queries rely on. Idempotent.
pub async fn ensure_fulltext_indexes(store: &Arc<dyn GraphStore>) -> StoreResult<()> {
    for (name, label, property) in FULLTEXT_INDEXES {
        let statement = format!(
            "CREATE FULLTEXT INDEX {} IF NOT EXISTS FOR (n:{}) ON EACH [n.{}]",
            name, label, property
        );
        store.run(&statement).await?;
        debug!(index = name, "full-text index ensured");
    }
    Ok(())
}

/// Run a fuzzy full-text lookup against one of the bootstrapped indexes.
pub async fn search(
    store: &Arc<dyn GraphStore>,
    index: &str,
    input: &str,
) -> StoreResult<Vec<Record>> {
    let clause = fulltext_query(input);
    if clause.is_empty() {
        return Ok(Vec::new());
    }
    let mut params = Params::new();
    params.insert("index", ParamValue::String(index.to_string()));
    params.insert("clause", ParamValue::String(clause));
    store
        .query(
            "CALL db.index.fulltext.queryNodes($index, $clause) \
             YIELD node, score RETURN node.name AS name, score",
            params,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_specials() {
        assert_eq!(sanitize_lucene("child*"), "child");
        assert_eq!(sanitize_lucene("bene~fit?"), "benefit");
        assert_eq!(sanitize_lucene("plain"), "plain");
    }

    #[test]
    fn fulltext_joins_fuzzy_words() {
        assert_eq!(
            fulltext_query("child benefit"),
            "child~2 AND benefit~2"
        );
        assert_eq!(fulltext_query("benefit"), "benefit~2");
    }

    #[test]
    fn fulltext_drops_words_reduced_to_nothing() {
        assert_eq!(fulltext_query("child *?"), "child~2");
        assert_eq!(fulltext_query("*?"), "");
    }
}
