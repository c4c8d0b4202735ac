//! govgraph-store — the opaque graph-store boundary
//!
//! Everything above this crate sees one interface: `query(cypher, params)`
//! returning records. The bolt driver, value conversion, and timeouts live
//! here and nowhere else.

pub mod neo4j;
pub mod record;
pub mod store;

pub use neo4j::Neo4jStore;
pub use record::{ParamValue, Params, Record};
pub use store::{GraphStore, StoreError, StoreResult};
