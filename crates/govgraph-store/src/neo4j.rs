//! Neo4j-backed GraphStore over the neo4rs bolt driver

use crate::record::{ParamValue, Params, Record};
use crate::store::{GraphStore, StoreError, StoreResult};
use neo4rs::Graph;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

pub struct Neo4jStore {
    graph: Graph,
    timeout: Duration,
}

impl Neo4jStore {
    /// Connect to a bolt endpoint. The connection is validated lazily by
    /// the driver; a wrong URI surfaces on the first query.
    pub async fn connect(
        uri: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> StoreResult<Self> {
        let graph = Graph::new(uri, username, password)
            .map_err(|e| StoreError::Connect(e.to_string()))?;
        Ok(Self { graph, timeout })
    }

    fn build_query(cypher: &str, params: Params) -> neo4rs::Query {
        let mut query = neo4rs::query(cypher);
        for (name, value) in params.iter() {
            query = match value {
                ParamValue::String(s) => query.param(name, s.clone()),
                ParamValue::Int(i) => query.param(name, *i),
                ParamValue::Float(f) => query.param(name, *f),
                ParamValue::Bool(b) => query.param(name, *b),
            };
        }
        query
    }

    async fn execute(&self, cypher: &str, params: Params) -> StoreResult<Vec<Record>> {
        let mut stream = self
            .graph
            .execute(Self::build_query(cypher, params))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut records = Vec::new();
        loop {
            match stream.next().await {
                Ok(Some(row)) => {
                    let fields: BTreeMap<String, Value> = row
                        .to()
                        .map_err(|e| StoreError::Deserialize(e.to_string()))?;
                    records.push(Record::from(fields));
                }
                Ok(None) => break,
                Err(e) => return Err(StoreError::Query(e.to_string())),
            }
        }
        debug!(rows = records.len(), "store query complete");
        Ok(records)
    }
}

#[async_trait::async_trait]
impl GraphStore for Neo4jStore {
    async fn query(&self, cypher: &str, params: Params) -> StoreResult<Vec<Record>> {
        match tokio::time::timeout(self.timeout, self.execute(cypher, params)).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }
}
