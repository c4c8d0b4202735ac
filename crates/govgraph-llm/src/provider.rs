//! LLM Provider trait

use crate::types::{LlmMessage, LlmRequest, LlmResponse};

/// Result type for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;

/// LLM error types
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("model call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// LLM Provider trait
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// One full request/response round, tools included.
    async fn complete(&self, request: LlmRequest) -> LlmResult<LlmResponse>;

    /// Free-text generation from a single prompt. Used by the graph
    /// builder's relationship completion.
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        let request = LlmRequest {
            messages: vec![LlmMessage::user(prompt)],
            ..Default::default()
        };
        let response = self.complete(request).await?;
        Ok(response.text.unwrap_or_default())
    }
}
