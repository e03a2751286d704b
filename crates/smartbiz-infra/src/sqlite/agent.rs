//! SQLite agent repository implementation.

use smartbiz_core::repository::agent::AgentRepository;
use smartbiz_types::agent::{Agent, AgentId};
use smartbiz_types::business::BusinessId;
use smartbiz_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

pub struct SqliteAgentRepository {
    pool: DatabasePool,
}

impl SqliteAgentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct AgentRow {
    id: String,
    agent_name: String,
    business_id: Option<String>,
    memory: String,
    created_at: String,
}

impl AgentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            agent_name: row.try_get("agent_name")?,
            business_id: row.try_get("business_id")?,
            memory: row.try_get("memory")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_agent(self) -> Result<Agent, RepositoryError> {
        let id = self
            .id
            .parse::<AgentId>()
            .map_err(|e| RepositoryError::Query(format!("invalid agent id: {e}")))?;
        let business_id = self
            .business_id
            .as_deref()
            .map(|s| s.parse::<BusinessId>())
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid business id: {e}")))?;

        Ok(Agent {
            id,
            agent_name: self.agent_name,
            business_id,
            memory: self.memory,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl AgentRepository for SqliteAgentRepository {
    async fn create_agent(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        sqlx::query(
            "INSERT INTO agents (id, agent_name, business_id, memory, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(agent.id.to_string())
        .bind(&agent.agent_name)
        .bind(agent.business_id.map(|id| id.to_string()))
        .bind(&agent.memory)
        .bind(format_datetime(&agent.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                RepositoryError::Conflict("business does not exist".to_string())
            }
            other => query_error(other),
        })?;

        Ok(agent.clone())
    }

    async fn get_agent(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM agents WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let agent_row = AgentRow::from_row(&row).map_err(query_error)?;
                Ok(Some(agent_row.into_agent()?))
            }
            None => Ok(None),
        }
    }

    async fn list_agents_for_business(&self, business_id: &BusinessId) -> Result<Vec<Agent>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM agents WHERE business_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(business_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| AgentRow::from_row(row).map_err(query_error)?.into_agent())
            .collect()
    }

    async fn update_agent_memory(&self, id: &AgentId, memory: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE agents SET memory = ? WHERE id = ?")
            .bind(memory)
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_agent(&self, id: &AgentId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::business::SqliteBusinessRepository;
    use crate::sqlite::pool::test_pool;
    use smartbiz_core::repository::business::BusinessRepository;
    use smartbiz_types::business::{Business, BusinessPatch};

    async fn seed_business(pool: &DatabasePool) -> Business {
        let repo = SqliteBusinessRepository::new(pool.clone());
        let business = Business::from_patch(BusinessPatch {
            name: Some("Bean There".into()),
            ..Default::default()
        });
        repo.create_business(&business).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_agent() {
        let (pool, _dir) = test_pool().await;
        let business = seed_business(&pool).await;
        let repo = SqliteAgentRepository::new(pool);

        let mut agent = Agent::new("Nova", Some(business.id));
        agent.memory = "BUSINESS IDENTITY:".into();
        repo.create_agent(&agent).await.unwrap();

        let fetched = repo.get_agent(&agent.id).await.unwrap().unwrap();
        assert_eq!(fetched.agent_name, "Nova");
        assert_eq!(fetched.business_id, Some(business.id));
        assert_eq!(fetched.memory, "BUSINESS IDENTITY:");
        assert!(repo.get_agent(&AgentId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_business_is_conflict() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteAgentRepository::new(pool);

        let err = repo
            .create_agent(&Agent::new("Nova", Some(BusinessId::new())))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_for_business_newest_first() {
        let (pool, _dir) = test_pool().await;
        let business = seed_business(&pool).await;
        let repo = SqliteAgentRepository::new(pool);

        let mut older = Agent::new("Older", Some(business.id));
        older.created_at -= chrono::Duration::minutes(1);
        repo.create_agent(&older).await.unwrap();
        let newer = repo.create_agent(&Agent::new("Newer", Some(business.id))).await.unwrap();
        repo.create_agent(&Agent::new("Loner", None)).await.unwrap();

        let agents = repo.list_agents_for_business(&business.id).await.unwrap();
        let names: Vec<&str> = agents.iter().map(|a| a.agent_name.as_str()).collect();
        assert_eq!(names, vec!["Newer", "Older"]);
        assert_eq!(agents[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_update_memory_and_delete() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteAgentRepository::new(pool);
        let agent = repo.create_agent(&Agent::new("Nova", None)).await.unwrap();

        repo.update_agent_memory(&agent.id, "fresh profile").await.unwrap();
        assert_eq!(repo.get_agent(&agent.id).await.unwrap().unwrap().memory, "fresh profile");

        repo.delete_agent(&agent.id).await.unwrap();
        assert!(matches!(repo.delete_agent(&agent.id).await, Err(RepositoryError::NotFound)));
        assert!(matches!(
            repo.update_agent_memory(&agent.id, "x").await,
            Err(RepositoryError::NotFound)
        ));
    }
}
