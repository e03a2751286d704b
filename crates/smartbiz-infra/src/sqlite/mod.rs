//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod agent;
pub mod business;
pub mod conversation;
pub mod memory;
pub mod pool;

use chrono::{DateTime, SecondsFormat, Utc};

use smartbiz_core::repository::Repositories;
use smartbiz_types::error::RepositoryError;

use self::agent::SqliteAgentRepository;
use self::business::SqliteBusinessRepository;
use self::conversation::SqliteConversationRepository;
use self::memory::SqliteMemoryRepository;
use self::pool::DatabasePool;

/// Every SQLite repository over one shared pool.
pub struct SqliteRepositories {
    agents: SqliteAgentRepository,
    businesses: SqliteBusinessRepository,
    conversations: SqliteConversationRepository,
    memories: SqliteMemoryRepository,
}

impl SqliteRepositories {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            agents: SqliteAgentRepository::new(pool.clone()),
            businesses: SqliteBusinessRepository::new(pool.clone()),
            conversations: SqliteConversationRepository::new(pool.clone()),
            memories: SqliteMemoryRepository::new(pool),
        }
    }
}

impl Repositories for SqliteRepositories {
    type Agents = SqliteAgentRepository;
    type Businesses = SqliteBusinessRepository;
    type Conversations = SqliteConversationRepository;
    type Memories = SqliteMemoryRepository;

    fn agents(&self) -> &SqliteAgentRepository {
        &self.agents
    }

    fn businesses(&self) -> &SqliteBusinessRepository {
        &self.businesses
    }

    fn conversations(&self) -> &SqliteConversationRepository {
        &self.conversations
    }

    fn memories(&self) -> &SqliteMemoryRepository {
        &self.memories
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}
