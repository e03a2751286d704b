//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (smartbiz-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod agent;
pub mod business;
pub mod conversation;
pub mod memory;

use self::agent::AgentRepository;
use self::business::BusinessRepository;
use self::conversation::ConversationRepository;
use self::memory::MemoryRepository;

/// The full set of repositories the engine works against.
///
/// Services are generic over a single `Repositories` implementation instead
/// of one type parameter per port.
pub trait Repositories: Send + Sync + 'static {
    type Agents: AgentRepository;
    type Businesses: BusinessRepository;
    type Conversations: ConversationRepository;
    type Memories: MemoryRepository;

    fn agents(&self) -> &Self::Agents;
    fn businesses(&self) -> &Self::Businesses;
    fn conversations(&self) -> &Self::Conversations;
    fn memories(&self) -> &Self::Memories;
}
