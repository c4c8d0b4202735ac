//! Groq chat-completions provider (OpenAI-compatible wire format)

use crate::provider::{LlmError, LlmProvider, LlmResult};
use crate::types::{LlmRequest, LlmResponse, ToolCall, Usage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GroqProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GroqProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: GROQ_API_URL.to_string(),
            model: LlmRequest::default().model,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Model used for plain `generate` calls; `complete` requests carry
    /// their own model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_body(request: &LlmRequest) -> GroqRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(GroqMessage {
                role: "system".into(),
                content: system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|m| GroqMessage {
            role: m.role.clone(),
            content: m.content.clone(),
        }));

        GroqRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            tool_choice: request.tools.as_ref().map(|_| "auto".into()),
            tools: request.tools.as_ref().map(|tools| {
                tools
                    .iter()
                    .map(|t| GroqTool {
                        kind: "function".into(),
                        function: GroqFunctionDef {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: t.input_schema.clone(),
                        },
                    })
                    .collect()
            }),
        }
    }
}

fn parse_body(body: GroqResponse) -> LlmResult<LlmResponse> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("no choices in response".into()))?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCall {
            id: tc.id,
            name: tc.function.name,
            arguments: tc.function.arguments,
        })
        .collect();

    Ok(LlmResponse {
        text: choice.message.content.filter(|c| !c.is_empty()),
        tool_calls,
        usage: body.usage.map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        }),
    })
}

#[async_trait::async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        let request = LlmRequest {
            model: self.model.clone(),
            messages: vec![crate::types::LlmMessage::user(prompt)],
            ..Default::default()
        };
        let response = self.complete(request).await?;
        Ok(response.text.unwrap_or_default())
    }

    async fn complete(&self, request: LlmRequest) -> LlmResult<LlmResponse> {
        let body = Self::build_body(&request);
        debug!(model = %body.model, tools = body.tools.as_ref().map_or(0, |t| t.len()), "groq request");

        let send = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send();

        let response = match tokio::time::timeout(self.timeout, send).await {
            Ok(result) => result?,
            Err(_) => return Err(LlmError::Timeout(self.timeout)),
        };

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("groq error {}: {}", status, error_text);

            return Err(match status.as_u16() {
                401 => LlmError::AuthFailed(error_text),
                429 => LlmError::RateLimited {
                    retry_after_ms: 60000,
                },
                _ => LlmError::RequestFailed(format!("{}: {}", status, error_text)),
            });
        }

        let parsed: GroqResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        parse_body(parsed)
    }
}

#[derive(Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GroqTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

#[derive(Serialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct GroqTool {
    #[serde(rename = "type")]
    kind: String,
    function: GroqFunctionDef,
}

#[derive(Serialize)]
struct GroqFunctionDef {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
    usage: Option<GroqUsage>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GroqResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<GroqToolCall>>,
}

#[derive(Deserialize)]
struct GroqToolCall {
    id: String,
    function: GroqFunctionCall,
}

#[derive(Deserialize)]
struct GroqFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct GroqUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
