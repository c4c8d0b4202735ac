//! govgraph-llm — generative-model boundary with tool calling

pub mod groq;
pub mod provider;
pub mod types;

pub use groq::GroqProvider;
pub use provider::{LlmError, LlmProvider, LlmResult};
pub use types::*;
