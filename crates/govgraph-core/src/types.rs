//! Core domain types for govgraph

use serde::{Deserialize, Serialize};

/// A named, parameterized query definition stored in the graph.
///
/// Created and updated outside this system; read-only here. `name` is
/// non-empty and unique within a registry snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTemplate {
    pub name: String,
    pub template: String,
}

/// A directed, typed connection between two named entities.
///
/// All three fields are non-empty. Tuples that cannot satisfy this are
/// discarded whole, never partially accepted — construct through
/// [`Relationship::new`] or [`RawRelationship::into_relationship`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub start_node: String,
    pub relationship_type: String,
    pub end_node: String,
}

impl Relationship {
    /// Build a relationship, rejecting any empty field.
    pub fn new(
        start_node: impl Into<String>,
        relationship_type: impl Into<String>,
        end_node: impl Into<String>,
    ) -> Option<Self> {
        let rel = Self {
            start_node: start_node.into(),
            relationship_type: relationship_type.into(),
            end_node: end_node.into(),
        };
        if rel.start_node.is_empty() || rel.relationship_type.is_empty() || rel.end_node.is_empty()
        {
            None
        } else {
            Some(rel)
        }
    }
}

/// A relationship tuple as the store actually returned it — any field may
/// be missing or empty. The builder decides whether a batch containing
/// such tuples needs model completion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRelationship {
    pub start_node: Option<String>,
    pub relationship_type: Option<String>,
    pub end_node: Option<String>,
}

impl RawRelationship {
    /// True when all three fields are present and non-empty.
    pub fn is_complete(&self) -> bool {
        [&self.start_node, &self.relationship_type, &self.end_node]
            .iter()
            .all(|f| f.as_deref().is_some_and(|s| !s.is_empty()))
    }

    pub fn into_relationship(self) -> Option<Relationship> {
        Relationship::new(
            self.start_node?,
            self.relationship_type?,
            self.end_node?,
        )
    }
}

impl std::fmt::Display for RawRelationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.start_node.as_deref().unwrap_or(""),
            self.relationship_type.as_deref().unwrap_or(""),
            self.end_node.as_deref().unwrap_or("")
        )
    }
}

/// Conversation message role
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("history has {0} turns; pairing requires an even user/assistant structure")]
    OddLength(usize),

    #[error("turn {index} has role {found:?}, expected {expected:?}")]
    RoleOutOfOrder {
        index: usize,
        expected: Role,
        found: Role,
    },
}

/// Ordered conversation history, paired into (user, assistant) exchanges
/// for agent context.
///
/// Pairing never drops a message: a history that does not alternate
/// user/assistant over an even number of turns is an error the caller
/// must handle, not a silent truncation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: Vec<ChatTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// Record one full exchange.
    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(ChatTurn::user(user));
        self.turns.push(ChatTurn::assistant(assistant));
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Pair the history into (user, assistant) exchanges.
    pub fn exchanges(&self) -> Result<Vec<(&str, &str)>, HistoryError> {
        if self.turns.len() % 2 != 0 {
            return Err(HistoryError::OddLength(self.turns.len()));
        }
        let mut pairs = Vec::with_capacity(self.turns.len() / 2);
        for (i, pair) in self.turns.chunks_exact(2).enumerate() {
            if pair[0].role != Role::User {
                return Err(HistoryError::RoleOutOfOrder {
                    index: i * 2,
                    expected: Role::User,
                    found: pair[0].role,
                });
            }
            if pair[1].role != Role::Assistant {
                return Err(HistoryError::RoleOutOfOrder {
                    index: i * 2 + 1,
                    expected: Role::Assistant,
                    found: pair[1].role,
                });
            }
            pairs.push((pair[0].content.as_str(), pair[1].content.as_str()));
        }
        Ok(pairs)
    }
}

impl From<Vec<ChatTurn>> for ConversationHistory {
    fn from(turns: Vec<ChatTurn>) -> Self {
        Self { turns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_rejects_empty_fields() {
        assert!(Relationship::new("A", "LINKS", "B").is_some());
        assert!(Relationship::new("", "LINKS", "B").is_none());
        assert!(Relationship::new("A", "", "B").is_none());
        assert!(Relationship::new("A", "LINKS", "").is_none());
    }

    #[test]
    fn raw_relationship_completeness() {
        let complete = RawRelationship {
            start_node: Some("Child Benefit".into()),
            relationship_type: Some("REQUIRES".into()),
            end_node: Some("Birth Certificate".into()),
        };
        assert!(complete.is_complete());

        let missing = RawRelationship {
            start_node: Some("Child Benefit".into()),
            relationship_type: None,
            end_node: Some("Birth Certificate".into()),
        };
        assert!(!missing.is_complete());
        assert!(missing.into_relationship().is_none());

        let empty_field = RawRelationship {
            start_node: Some("Child Benefit".into()),
            relationship_type: Some("".into()),
            end_node: Some("Birth Certificate".into()),
        };
        assert!(!empty_field.is_complete());
    }

    #[test]
    fn history_pairs_even_structure() {
        let mut history = ConversationHistory::new();
        history.push_exchange("What is child benefit?", "A payment for parents.");
        history.push_exchange("Who qualifies?", "Parents of children under 16.");

        let pairs = history.exchanges().unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, "What is child benefit?");
        assert_eq!(pairs[1].1, "Parents of children under 16.");
    }

    #[test]
    fn history_rejects_odd_length() {
        let history: ConversationHistory =
            vec![ChatTurn::user("hello")].into();
        assert_eq!(history.exchanges(), Err(HistoryError::OddLength(1)));
    }

    #[test]
    fn history_rejects_out_of_order_roles() {
        let history: ConversationHistory = vec![
            ChatTurn::assistant("hi"),
            ChatTurn::user("hello"),
        ]
        .into();
        assert!(matches!(
            history.exchanges(),
            Err(HistoryError::RoleOutOfOrder { index: 0, .. })
        ));
    }
}
