//! The query-answer cycle
//!
//! AwaitingTemplateSelection → Executing → Grounding → SafetyCheck →
//! Logged → Responded, with an Error terminal reachable from any state.
//! Every failure becomes a response-shaped error turn; the loop never
//! panics or propagates into the conversation.

use crate::grounding;
use crate::log::{InvocationLog, LogEntry};
use crate::safety::SafetyGuard;
use govgraph_core::{ConversationHistory, HistoryError};
use govgraph_kg::{RegistryError, TemplateRegistry};
use govgraph_llm::{LlmError, LlmMessage, LlmProvider, LlmRequest, LlmTool, ToolCall};
use govgraph_store::{GraphStore, Params, Record, StoreError};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const CLARIFICATION_MESSAGE: &str =
    "Please specify a benefit or type of information you're looking for.";
pub const UNKNOWN_QUERY_MESSAGE: &str =
    "The requested query is not available. Please specify a valid query.";
pub const NO_RESULTS_MESSAGE: &str =
    "No results found. Please refine your query or provide more details.";
pub const UNSAFE_CONTENT_MESSAGE: &str = "Response contains unsafe content.";

const SYSTEM_PROMPT: &str =
    "You are a knowledgeable assistant providing accurate information about UK government \
     benefits. Interpret user input and use the appropriate tools to generate responses. \
     Avoid guessing or hallucinating.";

#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.2-3b-preview".to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_tokens: 1024,
        }
    }
}

/// The conversation-boundary result: `{response, logs}` on success,
/// `{error, response: null}` on any failure path.
#[derive(Clone, Debug, Serialize)]
pub struct AgentReply {
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<LogEntry>,
}

impl AgentReply {
    fn answer(text: String, logs: Vec<LogEntry>) -> Self {
        Self {
            response: Some(text),
            error: None,
            logs,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            response: None,
            error: Some(message.into()),
            logs: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
enum CycleError {
    #[error("{0}")]
    History(#[from] HistoryError),

    #[error("An error occurred while processing the query: {0}")]
    Execution(String),

    #[error("Response failed grounding validation.")]
    Ungrounded,
}

impl From<RegistryError> for CycleError {
    fn from(e: RegistryError) -> Self {
        Self::Execution(e.to_string())
    }
}

impl From<StoreError> for CycleError {
    fn from(e: StoreError) -> Self {
        Self::Execution(e.to_string())
    }
}

impl From<LlmError> for CycleError {
    fn from(e: LlmError) -> Self {
        Self::Execution(e.to_string())
    }
}

struct ToolSelection {
    query_name: String,
    params: Params,
}

pub struct BenefitAgent {
    provider: Arc<dyn LlmProvider>,
    store: Arc<dyn GraphStore>,
    registry: TemplateRegistry,
    guard: Arc<dyn SafetyGuard>,
    log: InvocationLog,
    config: AgentConfig,
}

impl BenefitAgent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        store: Arc<dyn GraphStore>,
        guard: Arc<dyn SafetyGuard>,
        log: InvocationLog,
        config: AgentConfig,
    ) -> Self {
        let registry = TemplateRegistry::new(store.clone());
        Self {
            provider,
            store,
            registry,
            guard,
            log,
            config,
        }
    }

    pub fn log(&self) -> &InvocationLog {
        &self.log
    }

    /// Run one full cycle for an utterance. Always returns a reply; the
    /// conversation never terminates abnormally.
    pub async fn answer(&self, utterance: &str, history: &ConversationHistory) -> AgentReply {
        let cycle_id = Uuid::new_v4();
        info!(%cycle_id, "answer cycle start");

        let text = match self.run_cycle(utterance, history).await {
            Ok(text) => text,
            Err(e) => {
                error!(%cycle_id, "cycle failed: {}", e);
                return AgentReply::failure(e.to_string());
            }
        };

        if !self.guard.is_safe(&text).await {
            warn!(%cycle_id, "safety gate vetoed response");
            return AgentReply::failure(UNSAFE_CONTENT_MESSAGE);
        }

        self.log.append(utterance, &text).await;
        info!(%cycle_id, "answer cycle complete");
        AgentReply::answer(text, self.log.snapshot().await)
    }

    async fn run_cycle(
        &self,
        utterance: &str,
        history: &ConversationHistory,
    ) -> Result<String, CycleError> {
        // AwaitingTemplateSelection
        let Some(selection) = self.select_template(utterance, history).await? else {
            return Ok(CLARIFICATION_MESSAGE.to_string());
        };

        // Executing
        let names = self.registry.list_names().await?;
        if !names.iter().any(|n| n == &selection.query_name) {
            return Ok(UNKNOWN_QUERY_MESSAGE.to_string());
        }
        let Some(template) = self.registry.get(&selection.query_name).await? else {
            // The registry mutated between the two round-trips.
            return Ok(UNKNOWN_QUERY_MESSAGE.to_string());
        };

        let records = self.store.query(&template, selection.params).await?;
        if records.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        // Grounding
        let answer = answer_from_records(&records);
        if !grounding::validate(&records, &answer) {
            return Err(CycleError::Ungrounded);
        }

        Ok(answer)
    }

    /// One LLM round with the single bound tool. `None` means the model
    /// could not identify a template (or produced arguments that fail the
    /// schema) — the cycle ends with a clarification, not an error.
    async fn select_template(
        &self,
        utterance: &str,
        history: &ConversationHistory,
    ) -> Result<Option<ToolSelection>, CycleError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        for (user, assistant) in history.exchanges()? {
            messages.push(LlmMessage::user(user));
            messages.push(LlmMessage::assistant(assistant));
        }
        messages.push(LlmMessage::user(utterance));

        let request = LlmRequest {
            model: self.config.model.clone(),
            messages,
            tools: Some(vec![benefit_info_tool()]),
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(0.0),
            system: Some(self.config.system_prompt.clone()),
        };

        let response = self.provider.complete(request).await?;
        let Some(call) = response.tool_calls.into_iter().next() else {
            return Ok(None);
        };
        Ok(parse_selection(&call))
    }
}

fn benefit_info_tool() -> LlmTool {
    LlmTool {
        name: "get_benefit_info".to_string(),
        description: "Fetch benefit information from the knowledge graph using a named query \
                      and optional parameters."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query_name": {
                    "type": "string",
                    "description": "Name of the stored query to run"
                },
                "parameters": {
                    "type": "object",
                    "description": "Optional scalar parameters for query customization"
                }
            },
            "required": ["query_name"]
        }),
    }
}

/// Validate tool arguments against the expected shape. Anything off-schema
/// — missing name, non-object parameters, non-scalar parameter values —
/// yields `None`; arguments are data, never code.
fn parse_selection(call: &ToolCall) -> Option<ToolSelection> {
    let args = call.parse_arguments().ok()?;
    let object = args.as_object()?;

    let query_name = object.get("query_name")?.as_str()?.trim().to_string();
    if query_name.is_empty() {
        return None;
    }

    let params = match object.get("parameters") {
        None | Some(Value::Null) => Params::new(),
        Some(Value::Object(map)) => Params::from_json_object(map).ok()?,
        Some(_) => return None,
    };

    Some(ToolSelection { query_name, params })
}

/// The candidate answer shown to the user: every field value of every
/// record, stringified and joined, in record order. Exactly what grounding
/// can verify.
fn answer_from_records(records: &[Record]) -> String {
    records
        .iter()
        .flat_map(|r| r.stringified_values())
        .collect::<Vec<_>>()
        .join(" ")
}
