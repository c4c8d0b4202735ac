//! Tool invocation log — append-only, process-lifetime, injected
//!
//! An explicit handle constructed at bootstrap and passed into the agent,
//! not a module global. Audit and debug only; never consulted for
//! correctness decisions. Appends from concurrent cycles serialize on the
//! lock; the only guarantee is one append per completed cycle.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Debug, Serialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub query: String,
    pub response: String,
}

#[derive(Clone, Default)]
pub struct InvocationLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl InvocationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, query: impl Into<String>, response: impl Into<String>) {
        self.entries.lock().await.push(LogEntry {
            at: Utc::now(),
            query: query.into(),
            response: response.into(),
        });
    }

    pub async fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
