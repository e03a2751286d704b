//! Memory snippet repository trait definition.

use smartbiz_types::agent::AgentId;
use smartbiz_types::error::RepositoryError;
use smartbiz_types::memory::MemorySnippet;

pub trait MemoryRepository: Send + Sync {
    fn save_snippet(
        &self,
        snippet: &MemorySnippet,
    ) -> impl std::future::Future<Output = Result<MemorySnippet, RepositoryError>> + Send;

    /// All snippets for an agent, newest first.
    fn list_snippets(
        &self,
        agent_id: &AgentId,
    ) -> impl std::future::Future<Output = Result<Vec<MemorySnippet>, RepositoryError>> + Send;

    /// Atomically drop the agent's business-profile snippet(s) and store
    /// `snippet` in their place.
    fn replace_profile_snippet(
        &self,
        snippet: &MemorySnippet,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
