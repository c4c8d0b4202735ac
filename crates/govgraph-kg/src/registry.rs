//! Query template registry — named cypher templates resolved from the store
//!
//! Templates are written to the graph by ingestion, never by this crate.
//! There is no cache: every call is a fresh round-trip, so the registry
//! reflects store mutations immediately. `list_names` and `get` are derived
//! views over the one source-of-truth fetch; calling both costs two
//! round-trips.

use govgraph_core::QueryTemplate;
use govgraph_store::{GraphStore, Params, StoreError};
use std::sync::Arc;
use tracing::debug;

const TEMPLATE_QUERY: &str = "\
MATCH (q:QueryTemplate)
RETURN q.name AS query_name, q.template AS query_template";

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The store was unreachable or the template fetch failed. Propagated
    /// to the caller; retrying is caller policy, not a registry guarantee.
    #[error("query registry unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

pub struct TemplateRegistry {
    store: Arc<dyn GraphStore>,
}

impl TemplateRegistry {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// The single source-of-truth fetch. Rows missing a name are skipped;
    /// a template body may legitimately be empty.
    pub async fn fetch_available(&self) -> Result<Vec<QueryTemplate>, RegistryError> {
        let records = self.store.query(TEMPLATE_QUERY, Params::new()).await?;
        let templates: Vec<QueryTemplate> = records
            .iter()
            .filter_map(|record| {
                let name = record.get_string("query_name")?;
                if name.is_empty() {
                    return None;
                }
                Some(QueryTemplate {
                    name,
                    template: record.get_string("query_template").unwrap_or_default(),
                })
            })
            .collect();
        debug!(count = templates.len(), "fetched query templates");
        Ok(templates)
    }

    /// All template names, in store-reported order. Callers may rely on
    /// membership only.
    pub async fn list_names(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self
            .fetch_available()
            .await?
            .into_iter()
            .map(|t| t.name)
            .collect())
    }

    /// Resolve a template by name. `None` means the name is absent from
    /// the current snapshot; `Some("")` is a stored empty template.
    pub async fn get(&self, name: &str) -> Result<Option<String>, RegistryError> {
        Ok(self
            .fetch_available()
            .await?
            .into_iter()
            .find(|t| t.name == name)
            .map(|t| t.template))
    }
}
