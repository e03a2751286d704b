//! SQLite memory snippet repository.

use smartbiz_core::repository::memory::MemoryRepository;
use smartbiz_types::agent::AgentId;
use smartbiz_types::error::RepositoryError;
use smartbiz_types::memory::{MemorySnippet, SnippetId, SnippetKind};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

pub struct SqliteMemoryRepository {
    pool: DatabasePool,
}

impl SqliteMemoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct SnippetRow {
    id: String,
    agent_id: String,
    kind: String,
    content: String,
    created_at: String,
}

impl SnippetRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            agent_id: row.try_get("agent_id")?,
            kind: row.try_get("kind")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_snippet(self) -> Result<MemorySnippet, RepositoryError> {
        Ok(MemorySnippet {
            id: self
                .id
                .parse::<SnippetId>()
                .map_err(|e| RepositoryError::Query(format!("invalid snippet id: {e}")))?,
            agent_id: self
                .agent_id
                .parse::<AgentId>()
                .map_err(|e| RepositoryError::Query(format!("invalid agent id: {e}")))?,
            kind: self.kind.parse::<SnippetKind>().map_err(RepositoryError::Query)?,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

const INSERT_SNIPPET: &str =
    "INSERT INTO memory_snippets (id, agent_id, kind, content, created_at) VALUES (?, ?, ?, ?, ?)";

impl MemoryRepository for SqliteMemoryRepository {
    async fn save_snippet(&self, snippet: &MemorySnippet) -> Result<MemorySnippet, RepositoryError> {
        sqlx::query(INSERT_SNIPPET)
            .bind(snippet.id.to_string())
            .bind(snippet.agent_id.to_string())
            .bind(snippet.kind.to_string())
            .bind(&snippet.content)
            .bind(format_datetime(&snippet.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(snippet.clone())
    }

    async fn list_snippets(&self, agent_id: &AgentId) -> Result<Vec<MemorySnippet>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM memory_snippets WHERE agent_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(agent_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| SnippetRow::from_row(row).map_err(query_error)?.into_snippet())
            .collect()
    }

    async fn replace_profile_snippet(&self, snippet: &MemorySnippet) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query("DELETE FROM memory_snippets WHERE agent_id = ? AND kind = ?")
            .bind(snippet.agent_id.to_string())
            .bind(SnippetKind::BusinessProfile.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        sqlx::query(INSERT_SNIPPET)
            .bind(snippet.id.to_string())
            .bind(snippet.agent_id.to_string())
            .bind(snippet.kind.to_string())
            .bind(&snippet.content)
            .bind(format_datetime(&snippet.created_at))
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        tx.commit().await.map_err(query_error)
    }
}
