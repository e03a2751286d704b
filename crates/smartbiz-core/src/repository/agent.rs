//! Agent repository trait definition.

use smartbiz_types::agent::{Agent, AgentId};
use smartbiz_types::business::BusinessId;
use smartbiz_types::error::RepositoryError;

/// Repository trait for agent persistence.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait AgentRepository: Send + Sync {
    fn create_agent(
        &self,
        agent: &Agent,
    ) -> impl std::future::Future<Output = Result<Agent, RepositoryError>> + Send;

    fn get_agent(
        &self,
        id: &AgentId,
    ) -> impl std::future::Future<Output = Result<Option<Agent>, RepositoryError>> + Send;

    /// Agents owned by a business, newest first.
    fn list_agents_for_business(
        &self,
        business_id: &BusinessId,
    ) -> impl std::future::Future<Output = Result<Vec<Agent>, RepositoryError>> + Send;

    /// Replace the agent's memory profile in a single write.
    ///
    /// Returns `RepositoryError::NotFound` if the agent does not exist.
    fn update_agent_memory(
        &self,
        id: &AgentId,
        memory: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete an agent and, by cascade, its messages, content, media and memory.
    fn delete_agent(
        &self,
        id: &AgentId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
