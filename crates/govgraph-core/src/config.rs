//! govgraph config — serde struct with env-var loading
//!
//! Pure types and loading only; no dotenv magic in the library crates.
//! The binary decides where config comes from.

use serde::Deserialize;
use std::path::Path;

const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";
const DEFAULT_NEO4J_USERNAME: &str = "neo4j";
const DEFAULT_MODEL: &str = "llama-3.2-3b-preview";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GovGraphConfig {
    pub neo4j_uri: String,
    pub neo4j_username: String,
    pub neo4j_password: String,
    pub groq_api_key: String,
    pub model: String,
    /// Bounded wait for store and model calls, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GovGraphConfig {
    fn default() -> Self {
        Self {
            neo4j_uri: DEFAULT_NEO4J_URI.into(),
            neo4j_username: DEFAULT_NEO4J_USERNAME.into(),
            neo4j_password: String::new(),
            groq_api_key: String::new(),
            model: DEFAULT_MODEL.into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GovGraphConfig {
    /// Load from a JSON file, falling back to defaults on any failure.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Build from environment variables, with defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(uri) = std::env::var("NEO4J_URI") {
            config.neo4j_uri = uri;
        }
        if let Ok(user) = std::env::var("NEO4J_USERNAME") {
            config.neo4j_username = user;
        }
        if let Ok(password) = std::env::var("NEO4J_PASSWORD") {
            config.neo4j_password = password;
        }
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            config.groq_api_key = key;
        }
        if let Ok(model) = std::env::var("GOVGRAPH_MODEL") {
            config.model = model;
        }
        if let Ok(secs) = std::env::var("GOVGRAPH_TIMEOUT_SECS") {
            if let Ok(parsed) = secs.parse() {
                config.request_timeout_secs = parsed;
            }
        }
        config
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}
