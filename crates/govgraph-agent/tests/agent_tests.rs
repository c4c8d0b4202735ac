//! End-to-end agent cycle tests with scripted store/provider/guard fakes

use govgraph_agent::agent::{
    CLARIFICATION_MESSAGE, NO_RESULTS_MESSAGE, UNKNOWN_QUERY_MESSAGE, UNSAFE_CONTENT_MESSAGE,
};
use govgraph_agent::{AgentConfig, BenefitAgent, InvocationLog, PassthroughGuard, SafetyGuard};
use govgraph_core::{ChatTurn, ConversationHistory};
use govgraph_llm::{LlmProvider, LlmRequest, LlmResponse, LlmResult, ToolCall};
use govgraph_store::{GraphStore, Params, Record, StoreError, StoreResult};
use serde_json::json;
use std::sync::{Arc, Mutex};

// ===========================================================================
// Fakes
// ===========================================================================

/// Store that serves the template-registry fetch from `templates` and every
/// other query from `results`, recording each call.
struct RoutedStore {
    templates: Vec<Record>,
    results: Result<Vec<Record>, String>,
    calls: Mutex<Vec<(String, Params)>>,
}

impl RoutedStore {
    fn new(templates: Vec<Record>, results: Result<Vec<Record>, String>) -> Self {
        Self {
            templates,
            results,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Params)> {
        self.calls.lock().unwrap().clone()
    }

    fn execution_calls(&self) -> Vec<(String, Params)> {
        self.calls()
            .into_iter()
            .filter(|(cypher, _)| !cypher.contains("QueryTemplate"))
            .collect()
    }
}

#[async_trait::async_trait]
impl GraphStore for RoutedStore {
    async fn query(&self, cypher: &str, params: Params) -> StoreResult<Vec<Record>> {
        self.calls
            .lock()
            .unwrap()
            .push((cypher.to_string(), params));
        if cypher.contains("QueryTemplate") {
            return Ok(self.templates.clone());
        }
        match &self.results {
            Ok(records) => Ok(records.clone()),
            Err(message) => Err(StoreError::Query(message.clone())),
        }
    }
}

/// Provider that replies with one scripted tool call (or plain text).
struct ToolCallProvider {
    call: Option<ToolCall>,
}

impl ToolCallProvider {
    fn selecting(query_name: &str, parameters: serde_json::Value) -> Self {
        let arguments = json!({"query_name": query_name, "parameters": parameters}).to_string();
        Self {
            call: Some(ToolCall {
                id: "call_1".into(),
                name: "get_benefit_info".into(),
                arguments,
            }),
        }
    }

    fn no_tool() -> Self {
        Self { call: None }
    }
}

#[async_trait::async_trait]
impl LlmProvider for ToolCallProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _request: LlmRequest) -> LlmResult<LlmResponse> {
        Ok(LlmResponse {
            text: self.call.is_none().then(|| "I'm not sure.".to_string()),
            tool_calls: self.call.clone().into_iter().collect(),
            usage: None,
        })
    }
}

struct VetoGuard;

#[async_trait::async_trait]
impl SafetyGuard for VetoGuard {
    async fn is_safe(&self, _response: &str) -> bool {
        false
    }
}

fn template_record(name: &str, template: &str) -> Record {
    [
        ("query_name".to_string(), json!(name)),
        ("query_template".to_string(), json!(template)),
    ]
    .into_iter()
    .collect()
}

fn description_record(text: &str) -> Record {
    [("description".to_string(), json!(text))]
        .into_iter()
        .collect()
}

const CHILD_BENEFIT_TEMPLATE: &str = "MATCH (c:ChildBenefit) RETURN c.description";

fn agent_with(
    provider: impl LlmProvider + 'static,
    store: Arc<RoutedStore>,
    guard: impl SafetyGuard + 'static,
) -> BenefitAgent {
    BenefitAgent::new(
        Arc::new(provider),
        store as Arc<dyn GraphStore>,
        Arc::new(guard),
        InvocationLog::new(),
        AgentConfig::default(),
    )
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[tokio::test]
async fn grounded_answer_is_returned_and_logged_once() {
    let description = "Child Benefit is a payment made to people responsible for a child";
    let store = Arc::new(RoutedStore::new(
        vec![template_record("child_benefit_info", CHILD_BENEFIT_TEMPLATE)],
        Ok(vec![description_record(description)]),
    ));
    let agent = agent_with(
        ToolCallProvider::selecting("child_benefit_info", json!({})),
        store.clone(),
        PassthroughGuard,
    );

    let reply = agent
        .answer("What is child benefit?", &ConversationHistory::new())
        .await;

    assert_eq!(reply.response.as_deref(), Some(description));
    assert!(reply.error.is_none());
    assert_eq!(reply.logs.len(), 1);
    assert_eq!(reply.logs[0].query, "What is child benefit?");
    assert_eq!(reply.logs[0].response, description);

    // One execution call, carrying the resolved template text
    let executions = store.execution_calls();
    assert_eq!(executions.len(), 1);
    assert_eq!(executions[0].0, CHILD_BENEFIT_TEMPLATE);
}

#[tokio::test]
async fn parameters_reach_the_store() {
    let store = Arc::new(RoutedStore::new(
        vec![template_record("rates_by_topic", "MATCH (r:Rate {topic: $topic}) RETURN r.value")],
        Ok(vec![description_record("25.60")]),
    ));
    let agent = agent_with(
        ToolCallProvider::selecting("rates_by_topic", json!({"topic": "first child"})),
        store.clone(),
        PassthroughGuard,
    );

    let reply = agent.answer("How much is it?", &ConversationHistory::new()).await;
    assert!(reply.error.is_none());

    let executions = store.execution_calls();
    assert_eq!(executions[0].1.len(), 1);
}

#[tokio::test]
async fn no_tool_call_yields_clarification_without_touching_the_store() {
    let store = Arc::new(RoutedStore::new(Vec::new(), Ok(Vec::new())));
    let agent = agent_with(ToolCallProvider::no_tool(), store.clone(), PassthroughGuard);

    let reply = agent.answer("hello there", &ConversationHistory::new()).await;

    assert_eq!(reply.response.as_deref(), Some(CLARIFICATION_MESSAGE));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn unknown_template_name_is_rejected_without_execution() {
    let store = Arc::new(RoutedStore::new(
        vec![template_record("child_benefit_info", CHILD_BENEFIT_TEMPLATE)],
        Ok(vec![description_record("unreachable")]),
    ));
    let agent = agent_with(
        ToolCallProvider::selecting("pension_info", json!({})),
        store.clone(),
        PassthroughGuard,
    );

    let reply = agent
        .answer("Tell me about pensions", &ConversationHistory::new())
        .await;

    assert_eq!(reply.response.as_deref(), Some(UNKNOWN_QUERY_MESSAGE));
    assert!(store.execution_calls().is_empty());
}

#[tokio::test]
async fn empty_result_set_prompts_refinement() {
    let store = Arc::new(RoutedStore::new(
        vec![template_record("child_benefit_info", CHILD_BENEFIT_TEMPLATE)],
        Ok(Vec::new()),
    ));
    let agent = agent_with(
        ToolCallProvider::selecting("child_benefit_info", json!({})),
        store,
        PassthroughGuard,
    );

    let reply = agent
        .answer("What is child benefit?", &ConversationHistory::new())
        .await;

    assert_eq!(reply.response.as_deref(), Some(NO_RESULTS_MESSAGE));
}

#[tokio::test]
async fn store_failure_degrades_to_error_turn() {
    let store = Arc::new(RoutedStore::new(
        vec![template_record("child_benefit_info", CHILD_BENEFIT_TEMPLATE)],
        Err("connection reset".into()),
    ));
    let agent = agent_with(
        ToolCallProvider::selecting("child_benefit_info", json!({})),
        store,
        PassthroughGuard,
    );

    let reply = agent
        .answer("What is child benefit?", &ConversationHistory::new())
        .await;

    assert!(reply.response.is_none());
    let error = reply.error.unwrap();
    assert!(error.starts_with("An error occurred while processing the query:"));
    assert!(error.contains("connection reset"));
}

#[tokio::test]
async fn safety_veto_replaces_the_response_and_skips_the_log() {
    let store = Arc::new(RoutedStore::new(
        vec![template_record("child_benefit_info", CHILD_BENEFIT_TEMPLATE)],
        Ok(vec![description_record("some description text")]),
    ));
    let agent = agent_with(
        ToolCallProvider::selecting("child_benefit_info", json!({})),
        store,
        VetoGuard,
    );

    let reply = agent
        .answer("What is child benefit?", &ConversationHistory::new())
        .await;

    assert_eq!(reply.error.as_deref(), Some(UNSAFE_CONTENT_MESSAGE));
    assert!(reply.response.is_none());
    assert!(agent.log().is_empty().await, "vetoed responses are not logged");
}

#[tokio::test]
async fn odd_history_is_an_error_turn_not_a_dropped_message() {
    let store = Arc::new(RoutedStore::new(Vec::new(), Ok(Vec::new())));
    let agent = agent_with(ToolCallProvider::no_tool(), store.clone(), PassthroughGuard);

    let history: ConversationHistory = vec![ChatTurn::user("dangling turn")].into();
    let reply = agent.answer("What is child benefit?", &history).await;

    assert!(reply.response.is_none());
    assert!(reply.error.unwrap().contains("even user/assistant structure"));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn log_accumulates_across_cycles() {
    let description = "Child Benefit is a weekly payment";
    let store = Arc::new(RoutedStore::new(
        vec![template_record("child_benefit_info", CHILD_BENEFIT_TEMPLATE)],
        Ok(vec![description_record(description)]),
    ));
    let agent = agent_with(
        ToolCallProvider::selecting("child_benefit_info", json!({})),
        store,
        PassthroughGuard,
    );

    let mut history = ConversationHistory::new();
    let first = agent.answer("What is child benefit?", &history).await;
    history.push_exchange("What is child benefit?", first.response.clone().unwrap());
    let second = agent.answer("Say that again?", &history).await;

    assert_eq!(first.logs.len(), 1);
    assert_eq!(second.logs.len(), 2);
    assert_eq!(agent.log().len().await, 2);
}
