//! govgraph-agent — the grounded query-answer loop
//!
//! One conversational cycle: select a template from free text, execute it
//! against the store, verify the answer is fully backed by the retrieved
//! records, gate it for safety, log it, respond. No failure below this
//! crate is allowed to crash the conversation — everything degrades to a
//! textual error turn.

pub mod agent;
pub mod grounding;
pub mod log;
pub mod safety;

pub use agent::{AgentConfig, AgentReply, BenefitAgent};
pub use grounding::validate;
pub use log::{InvocationLog, LogEntry};
pub use safety::{PassthroughGuard, SafetyGuard};
