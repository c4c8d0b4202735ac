//! govgraph-core — shared domain types and configuration

pub mod config;
pub mod types;

pub use config::GovGraphConfig;
pub use types::{
    ChatTurn, ConversationHistory, HistoryError, QueryTemplate, RawRelationship, Relationship,
    Role,
};
