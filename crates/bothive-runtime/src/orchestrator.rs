//! Orchestrator — wires dialogue, retrieval, and generation into one turn.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use bothive_chat::{build_prompt, AnswerGenerator};
use bothive_core::{BothiveConfig, Error, Language, Result};
use bothive_dialog::{messages, DialogEngine, SharedSessions};
use bothive_ingest::{IngestReport, Ingester, WindowChunker};
use bothive_retrieval::{RetrievedChunk, Retriever};
use bothive_store::{ConversationMessage, SqliteStore};

use crate::types::TurnOutcome;

/// Most-recent conversation messages returned by the history verb.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Top-level coordinator shared by every request handler.
///
/// A chat turn runs dialogue first: scripted flows must answer instantly and
/// never pay generator latency. Only open questions at an idle session reach
/// retrieval and the generator.
pub struct Orchestrator {
    store: Arc<SqliteStore>,
    engine: DialogEngine,
    generator: Arc<dyn AnswerGenerator>,
    chunker: WindowChunker,
    top_k: usize,
    answer_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        store: Arc<SqliteStore>,
        generator: Arc<dyn AnswerGenerator>,
        sessions: SharedSessions,
        config: &BothiveConfig,
    ) -> Self {
        Self {
            store,
            engine: DialogEngine::new(sessions),
            generator,
            chunker: WindowChunker::new(config.chunk_size, config.chunk_overlap),
            top_k: config.top_k,
            answer_timeout: config.answer_timeout(),
        }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn sessions(&self) -> &SharedSessions {
        self.engine.sessions()
    }

    fn require_tenant(&self, tenant_id: &str) -> Result<()> {
        if self.store.get_tenant(tenant_id)?.is_none() {
            return Err(Error::NotFound(format!("tenant {}", tenant_id)));
        }
        Ok(())
    }

    /// Index one document, replacing whatever the tenant had before.
    pub fn replace_documents(
        &self,
        tenant_id: &str,
        text: &str,
        source_file: &str,
    ) -> Result<IngestReport> {
        self.require_tenant(tenant_id)?;
        Ingester::with_chunker(&self.store, self.chunker.clone())
            .replace_documents(tenant_id, text, source_file)
    }

    /// Rank the tenant's chunks against a query.
    pub fn search(
        &self,
        tenant_id: &str,
        query: &str,
        k: Option<usize>,
    ) -> Result<Vec<RetrievedChunk>> {
        self.require_tenant(tenant_id)?;
        Retriever::search(&self.store, tenant_id, query, k.unwrap_or(self.top_k))
    }

    pub fn history(
        &self,
        tenant_id: &str,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ConversationMessage>> {
        self.require_tenant(tenant_id)?;
        self.store
            .get_history(tenant_id, session_id, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
    }

    pub fn clear_history(&self, tenant_id: &str, session_id: &str) -> Result<usize> {
        self.require_tenant(tenant_id)?;
        self.engine.sessions().reset(tenant_id, session_id);
        self.store.clear_history(tenant_id, session_id)
    }

    /// Run one chat turn end to end.
    pub async fn handle_turn(
        &self,
        tenant_id: &str,
        session_id: &str,
        message: &str,
        lang: Language,
    ) -> Result<TurnOutcome> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::Validation("message must not be empty".to_string()));
        }
        self.require_tenant(tenant_id)?;

        if let Some(reply) =
            self.engine
                .handle(&self.store, tenant_id, session_id, message, lang)?
        {
            self.record_exchange(tenant_id, session_id, message, &reply.reply)?;
            return Ok(TurnOutcome::from(reply));
        }

        let sources = Retriever::search(&self.store, tenant_id, message, self.top_k)?;
        if sources.is_empty() {
            // Nothing indexed yet: answer without ever touching the generator.
            let answer = messages::upload_prompt(lang);
            self.record_exchange(tenant_id, session_id, message, &answer)?;
            return Ok(TurnOutcome::plain(answer));
        }

        let contexts: Vec<String> = sources.iter().map(|c| c.text.clone()).collect();
        let prompt = build_prompt(&contexts, message, lang);

        let answer = match timeout(self.answer_timeout, self.generator.generate(&prompt)).await {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                // History stays untouched so the user can simply retry.
                warn!(tenant_id, session_id, error = %e, "answer generation failed");
                return Ok(TurnOutcome::plain(messages::apology(lang)));
            }
            Err(_) => {
                warn!(
                    tenant_id,
                    session_id,
                    timeout_secs = self.answer_timeout.as_secs(),
                    "answer generation timed out"
                );
                return Ok(TurnOutcome::plain(messages::apology(lang)));
            }
        };

        self.record_exchange(tenant_id, session_id, message, &answer)?;
        info!(
            tenant_id,
            session_id,
            sources = sources.len(),
            "answered from document context"
        );
        Ok(TurnOutcome::grounded(answer, sources))
    }

    fn record_exchange(
        &self,
        tenant_id: &str,
        session_id: &str,
        user: &str,
        assistant: &str,
    ) -> Result<()> {
        self.store.save_message(tenant_id, session_id, "user", user)?;
        self.store
            .save_message(tenant_id, session_id, "assistant", assistant)?;
        Ok(())
    }
}
