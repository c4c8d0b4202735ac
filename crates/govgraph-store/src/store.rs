//! GraphStore trait — the single seam between govgraph and the database

use crate::record::{Params, Record};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store failures surface as one kind with a message; callers decide
/// whether a failure is fatal (agent: convert to an error turn) or
/// ignorable (graph builder: degrade to an empty edge list).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connect(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("store call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("could not read record: {0}")]
    Deserialize(String),
}

/// Opaque graph store: execute a cypher text with parameters, get records.
#[async_trait::async_trait]
pub trait GraphStore: Send + Sync {
    async fn query(&self, cypher: &str, params: Params) -> StoreResult<Vec<Record>>;

    /// Execute a statement whose results are irrelevant (index bootstrap).
    async fn run(&self, cypher: &str) -> StoreResult<()> {
        self.query(cypher, Params::new()).await.map(|_| ())
    }
}
