use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::business::BusinessId;

uuid_id!(
    /// Unique identifier for an agent, wrapping a UUID v7 (time-sortable).
    AgentId
);

/// An AI agent acting on behalf of a business.
///
/// `memory` holds the current memory profile rendered from the owning
/// business. It is overwritten whenever the business profile changes; no
/// history is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub agent_name: String,
    pub business_id: Option<BusinessId>,
    pub memory: String,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    pub fn new(agent_name: impl Into<String>, business_id: Option<BusinessId>) -> Self {
        Self {
            id: AgentId::new(),
            agent_name: agent_name.into(),
            business_id,
            memory: String::new(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_display_parse() {
        let id = AgentId::new();
        let parsed: AgentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_agent_id_serializes_as_plain_uuid() {
        let id = AgentId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn test_new_agent_starts_with_empty_memory() {
        let agent = Agent::new("Nova", None);
        assert_eq!(agent.agent_name, "Nova");
        assert!(agent.memory.is_empty());
        assert!(agent.business_id.is_none());
    }
}
