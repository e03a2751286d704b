//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over the repository set; AppState pins them to SQLite.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use smartbiz_core::chat::orchestrator::ConversationOrchestrator;
use smartbiz_core::service::agent::AgentService;
use smartbiz_infra::config::{Credentials, load_global_config, resolve_data_dir};
use smartbiz_infra::providers::build_providers;
use smartbiz_infra::sqlite::SqliteRepositories;
use smartbiz_infra::sqlite::pool::{DatabasePool, database_url};

pub type ConcreteAgentService = AgentService<SqliteRepositories>;
pub type ConcreteOrchestrator = ConversationOrchestrator<SqliteRepositories>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub agent_service: Arc<ConcreteAgentService>,
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize from the environment: data directory, database, config
    /// file and provider credentials.
    pub async fn init() -> anyhow::Result<Self> {
        Self::init_in(&resolve_data_dir(), &Credentials::from_env()).await
    }

    /// Initialize against an explicit data directory and credential set.
    pub async fn init_in(data_dir: &Path, credentials: &Credentials) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let db_pool = DatabasePool::new(&database_url(data_dir)).await?;
        let repos = Arc::new(SqliteRepositories::new(db_pool));

        let config = load_global_config(data_dir).await;
        let providers = Arc::new(build_providers(&config, credentials)?);

        let agent_service = AgentService::new(repos.clone(), providers.clone(), config.clone());
        let orchestrator = ConversationOrchestrator::new(repos, providers, config);

        tracing::debug!(data_dir = %data_dir.display(), "Application state ready");

        Ok(Self {
            agent_service: Arc::new(agent_service),
            orchestrator: Arc::new(orchestrator),
            data_dir: data_dir.to_path_buf(),
        })
    }
}
