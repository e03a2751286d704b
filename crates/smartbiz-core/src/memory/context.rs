//! Prompt context assembly for full-context chat.
//!
//! Combines the agent's memory profile, recalled memory snippets and the
//! recent conversation window into one system prompt.

use std::sync::Arc;

use smartbiz_types::agent::{Agent, AgentId};
use smartbiz_types::config::ContextConfig;
use smartbiz_types::conversation::ConversationMessage;
use smartbiz_types::error::AgentError;

use super::recall::recall;
use crate::repository::Repositories;
use crate::repository::agent::AgentRepository;
use crate::repository::business::BusinessRepository;
use crate::repository::conversation::ConversationRepository;

const DEFAULT_BRAND_TONE: &str = "professional";

/// Everything needed to prompt an LLM as a specific agent.
#[derive(Debug, Clone)]
pub struct AssembledContext {
    pub system_prompt: String,
    /// Oldest to newest.
    pub recent_messages: Vec<ConversationMessage>,
    pub agent: Agent,
}

/// Builds [`AssembledContext`] from the stores. No side effects.
pub struct ContextAssembler<R: Repositories> {
    repos: Arc<R>,
    config: ContextConfig,
}

impl<R: Repositories> ContextAssembler<R> {
    pub fn new(repos: Arc<R>, config: ContextConfig) -> Self {
        Self { repos, config }
    }

    #[tracing::instrument(name = "assemble_context", skip(self, user_message), fields(agent_id = %agent_id))]
    pub async fn assemble(
        &self,
        agent_id: &AgentId,
        user_message: &str,
    ) -> Result<AssembledContext, AgentError> {
        let agent = self
            .repos
            .agents()
            .get_agent(agent_id)
            .await?
            .ok_or(AgentError::AgentNotFound)?;

        let business = match agent.business_id {
            Some(ref id) => self.repos.businesses().get_business(id).await?,
            None => None,
        };

        let memories = recall(
            self.repos.memories(),
            agent_id,
            user_message,
            self.config.relevant_memories as usize,
        )
        .await;

        let mut recent_messages = self
            .repos
            .conversations()
            .list_recent_messages(agent_id, self.config.recent_messages)
            .await?;
        recent_messages.reverse();

        let business_name = business.as_ref().map(|b| b.name.as_str()).unwrap_or("");
        let brand_tone = business
            .as_ref()
            .and_then(|b| b.brand_tone.as_deref())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_BRAND_TONE);
        let snippets: Vec<&str> = memories.iter().map(|m| m.content.as_str()).collect();

        let system_prompt = render_system_prompt(
            &agent.agent_name,
            business_name,
            &agent.memory,
            &snippets,
            brand_tone,
        );

        Ok(AssembledContext {
            system_prompt,
            recent_messages,
            agent,
        })
    }
}

/// Render the agent system prompt.
pub fn render_system_prompt(
    agent_name: &str,
    business_name: &str,
    memory_profile: &str,
    relevant: &[&str],
    brand_tone: &str,
) -> String {
    format!(
        r#"You are {agent_name}, an AI assistant for {business_name}.

{memory_profile}

RELEVANT CONTEXT:
{relevant}

YOUR PERSONALITY:
- You are helpful, professional, and action-oriented
- You deliver results and confirm completion instead of announcing plans
- When asked to create or generate something, you produce it immediately
- You speak in a {brand_tone} tone
- You are conversational and natural, not robotic

RESPONSE GUIDELINES:
1. When asked to generate or create content, do it now and show the result
2. When asked for tasks, list them as bullet points or numbered items
3. Avoid "I'll create" or "I will design"; say "Here is..." or "I've created..."
4. Be direct and actionable: show outcomes, not intentions
5. Stay in character as this business's assistant
6. Use the business context naturally in your replies

Examples:
Bad: "I'll create a logo for you"
Good: "I've designed a logo concept based on your brand identity. Here are the details..."

Bad: "I'll generate some content ideas"
Good: "Here are 5 content ideas for your campaign: 1. ..., 2. ..."

Respond naturally while delivering actual value, not promises."#,
        relevant = relevant.join("\n\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use smartbiz_types::business::{Business, BusinessPatch};
    use smartbiz_types::conversation::SenderRole;
    use smartbiz_types::memory::{MemorySnippet, SnippetKind};

    use crate::repository::memory::MemoryRepository;
    use crate::testing::InMemoryRepositories;

    async fn seed_agent(repos: &InMemoryRepositories, tone: Option<&str>) -> Agent {
        let business = Business::from_patch(BusinessPatch {
            name: Some("Bean There".into()),
            brand_tone: tone.map(String::from),
            goals: Some(json!(["Grow"])),
            ..Default::default()
        });
        repos.businesses().create_business(&business).await.unwrap();

        let mut agent = Agent::new("Nova", Some(business.id));
        agent.memory = "BUSINESS IDENTITY:\n- Name: Bean There".into();
        repos.agents().create_agent(&agent).await.unwrap()
    }

    #[tokio::test]
    async fn test_unknown_agent_is_not_found() {
        let repos = Arc::new(InMemoryRepositories::new());
        let assembler = ContextAssembler::new(repos, ContextConfig::default());

        let err = assembler.assemble(&AgentId::new(), "hi").await.unwrap_err();
        assert!(matches!(err, AgentError::AgentNotFound));
    }

    #[tokio::test]
    async fn test_prompt_embeds_agent_business_and_memory() {
        let repos = Arc::new(InMemoryRepositories::new());
        let agent = seed_agent(&repos, Some("playful")).await;
        repos
            .memories()
            .save_snippet(&MemorySnippet::new(agent.id, SnippetKind::Note, "Loyalty card launches in May"))
            .await
            .unwrap();

        let assembler = ContextAssembler::new(repos.clone(), ContextConfig::default());
        let ctx = assembler.assemble(&agent.id, "tell me about the loyalty card").await.unwrap();

        assert!(ctx.system_prompt.starts_with("You are Nova, an AI assistant for Bean There."));
        assert!(ctx.system_prompt.contains("BUSINESS IDENTITY:\n- Name: Bean There"));
        assert!(ctx.system_prompt.contains("RELEVANT CONTEXT:\nLoyalty card launches in May"));
        assert!(ctx.system_prompt.contains("You speak in a playful tone"));
        assert!(ctx.system_prompt.contains("show outcomes, not intentions"));
        assert_eq!(ctx.agent.id, agent.id);
    }

    #[tokio::test]
    async fn test_brand_tone_defaults_to_professional() {
        let repos = Arc::new(InMemoryRepositories::new());
        let agent = seed_agent(&repos, None).await;

        let assembler = ContextAssembler::new(repos.clone(), ContextConfig::default());
        let ctx = assembler.assemble(&agent.id, "hello").await.unwrap();
        assert!(ctx.system_prompt.contains("You speak in a professional tone"));
    }

    #[tokio::test]
    async fn test_recent_messages_window_oldest_first() {
        let repos = Arc::new(InMemoryRepositories::new());
        let agent = seed_agent(&repos, None).await;
        for i in 0..12 {
            let mut msg = ConversationMessage::new(agent.id, SenderRole::User, format!("m{i}"));
            msg.created_at += chrono::Duration::milliseconds(i);
            repos.conversations().save_message(&msg).await.unwrap();
        }

        let assembler = ContextAssembler::new(repos.clone(), ContextConfig::default());
        let ctx = assembler.assemble(&agent.id, "hello").await.unwrap();

        assert_eq!(ctx.recent_messages.len(), 10);
        assert_eq!(ctx.recent_messages.first().unwrap().text, "m2");
        assert_eq!(ctx.recent_messages.last().unwrap().text, "m11");
    }

    #[tokio::test]
    async fn test_recall_failure_still_assembles() {
        let repos = Arc::new(InMemoryRepositories::new());
        let agent = seed_agent(&repos, None).await;
        repos.fail_memory_reads(true);

        let assembler = ContextAssembler::new(repos.clone(), ContextConfig::default());
        let ctx = assembler.assemble(&agent.id, "hello").await.unwrap();
        assert!(ctx.system_prompt.contains("RELEVANT CONTEXT:\n\n"));
    }
}
