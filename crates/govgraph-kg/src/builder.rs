//! Relationship fetch & completion — the edge list behind the visualization
//!
//! Fetches all (start)-[rel]->(end) triples and, when the store comes back
//! empty or malformed, asks the model to fill the gaps. Nothing here is
//! allowed to fail the host: store and model faults degrade to an empty
//! edge list.

use govgraph_core::{RawRelationship, Relationship};
use govgraph_llm::LlmProvider;
use govgraph_store::{GraphStore, Params, Record};
use std::sync::Arc;
use tracing::{info, warn};

const RELATIONSHIP_QUERY: &str = "\
MATCH (start)-[rel]->(end)
RETURN start.name AS start_node, type(rel) AS relationship, end.name AS end_node";

const MISSING_DATA_PROMPT: &str =
    "Generate relationships for a knowledge graph about UK child benefits. \
     Output one relationship per line as: start node, RELATIONSHIP_TYPE, end node";

pub struct GraphBuilder {
    store: Arc<dyn GraphStore>,
    llm: Arc<dyn LlmProvider>,
}

impl GraphBuilder {
    pub fn new(store: Arc<dyn GraphStore>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { store, llm }
    }

    /// Produce the completed edge list. Fetched data that is well-formed
    /// and non-empty passes through untouched; otherwise one completion
    /// call fills the gaps.
    pub async fn build(&self) -> Vec<Relationship> {
        let fetched = self.fetch().await;

        if fetched.is_empty() {
            info!("no relationships in store, asking model to generate");
            return self.complete(MISSING_DATA_PROMPT.to_string()).await;
        }

        if fetched.iter().any(|raw| !raw.is_complete()) {
            let listing = fetched
                .iter()
                .map(|raw| raw.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            info!("incomplete relationships in store, asking model to complete");
            return self
                .complete(format!(
                    "Complete the following relationships. Output one per line as: \
                     start node, RELATIONSHIP_TYPE, end node\n{}",
                    listing
                ))
                .await;
        }

        fetched
            .into_iter()
            .filter_map(RawRelationship::into_relationship)
            .collect()
    }

    async fn fetch(&self) -> Vec<RawRelationship> {
        match self.store.query(RELATIONSHIP_QUERY, Params::new()).await {
            Ok(records) => records.iter().map(raw_from_record).collect(),
            Err(e) => {
                warn!("relationship fetch failed, degrading to empty graph: {}", e);
                Vec::new()
            }
        }
    }

    async fn complete(&self, prompt: String) -> Vec<Relationship> {
        match self.llm.generate(&prompt).await {
            Ok(text) => parse_completion(&text),
            Err(e) => {
                warn!("relationship completion failed: {}", e);
                Vec::new()
            }
        }
    }
}

fn raw_from_record(record: &Record) -> RawRelationship {
    RawRelationship {
        start_node: record.get_string("start_node"),
        relationship_type: record.get_string("relationship"),
        end_node: record.get_string("end_node"),
    }
}

/// Parse model output into relationships: one per line, comma-separated,
/// exactly three non-empty trimmed fields. Anything else is dropped
/// silently — the model's formatting is never trusted.
pub fn parse_completion(text: &str) -> Vec<Relationship> {
    text.lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            match parts.as_slice() {
                [start, rel, end] => Relationship::new(*start, *rel, *end),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_three_field_lines() {
        let text = "Child Benefit, PAID_TO, Parents\nChild Benefit, REQUIRES, Claim Form";
        let edges = parse_completion(text);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].start_node, "Child Benefit");
        assert_eq!(edges[0].relationship_type, "PAID_TO");
        assert_eq!(edges[1].end_node, "Claim Form");
    }

    #[test]
    fn parse_drops_wrong_arity_lines() {
        let text = "\
Here are the relationships:
Child Benefit, PAID_TO
Child Benefit, PAID_TO, Parents, Weekly
Child Benefit, REQUIRES, Claim Form";
        let edges = parse_completion(text);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relationship_type, "REQUIRES");
    }

    #[test]
    fn parse_trims_whitespace() {
        let edges = parse_completion("  Child Benefit ,  PAID_TO ,  Parents  ");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].start_node, "Child Benefit");
        assert_eq!(edges[0].end_node, "Parents");
    }

    #[test]
    fn parse_rejects_empty_fields() {
        assert!(parse_completion("Child Benefit, , Parents").is_empty());
        assert!(parse_completion(", PAID_TO, Parents").is_empty());
        assert!(parse_completion("").is_empty());
    }
}
