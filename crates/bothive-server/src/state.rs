//! Shared application state.

use std::sync::Arc;

use bothive_chat::{GeneratorConfig, HttpAnswerGenerator};
use bothive_core::{BothiveConfig, Result};
use bothive_dialog::{SessionStore, SharedSessions};
use bothive_runtime::Orchestrator;
use bothive_store::SqliteStore;

/// Everything a route handler can reach.
pub struct AppState {
    pub config: BothiveConfig,
    pub store: Arc<SqliteStore>,
    pub sessions: SharedSessions,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(config: BothiveConfig) -> Result<Self> {
        let store = Arc::new(SqliteStore::open(&config.data_dir)?);
        let sessions: SharedSessions = Arc::new(SessionStore::new(config.session_ttl()));
        let generator = Arc::new(HttpAnswerGenerator::new(GeneratorConfig::from_env())?);
        let orchestrator =
            Orchestrator::new(store.clone(), generator, sessions.clone(), &config);

        Ok(Self {
            config,
            store,
            sessions,
            orchestrator,
        })
    }
}
