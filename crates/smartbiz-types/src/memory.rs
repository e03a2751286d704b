//! Searchable memory snippets attached to an agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::agent::AgentId;

uuid_id!(
    /// Unique identifier for a memory snippet.
    SnippetId
);

/// Where a snippet came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnippetKind {
    /// The rendered business profile. At most one per agent.
    BusinessProfile,
    /// A free-form note added by the user.
    Note,
}

impl fmt::Display for SnippetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnippetKind::BusinessProfile => write!(f, "business_profile"),
            SnippetKind::Note => write!(f, "note"),
        }
    }
}

impl FromStr for SnippetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "business_profile" => Ok(SnippetKind::BusinessProfile),
            "note" => Ok(SnippetKind::Note),
            other => Err(format!("invalid snippet kind: '{other}'")),
        }
    }
}

/// A piece of text the context assembler may surface as relevant context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySnippet {
    pub id: SnippetId,
    pub agent_id: AgentId,
    pub kind: SnippetKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl MemorySnippet {
    pub fn new(agent_id: AgentId, kind: SnippetKind, content: impl Into<String>) -> Self {
        Self {
            id: SnippetId::new(),
            agent_id,
            kind,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_kind_roundtrip() {
        for kind in [SnippetKind::BusinessProfile, SnippetKind::Note] {
            let parsed: SnippetKind = kind.to_string().parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }
}
