//! Lexical retrieval: exhaustive cosine scoring over a tenant's chunk set.
//!
//! No index structure beyond tenant partitioning. A tenant's corpus is a
//! single document (a few hundred chunks at most), so a full scan is cheaper
//! than maintaining an inverted index across replace-on-reupload.

use serde::Serialize;
use tracing::debug;

use bothive_core::Result;
use bothive_ingest::{cosine_similarity, vectorize};
use bothive_store::{SqliteStore, TermFreq};

/// Default number of context passages handed to the answer generator.
pub const DEFAULT_TOP_K: usize = 5;

/// One ranked context passage.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedChunk {
    pub text: String,
    #[serde(rename = "sourceFile")]
    pub source_file: String,
    pub score: f64,
}

pub struct Retriever;

impl Retriever {
    /// Rank a tenant's chunks against a raw query. Returns at most `k`
    /// results; an empty list means the tenant has no indexed document yet.
    pub fn search(
        store: &SqliteStore,
        tenant_id: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>> {
        Self::search_vector(store, tenant_id, &vectorize(query), k)
    }

    /// Same as [`Retriever::search`] but with a pre-built query vector.
    pub fn search_vector(
        store: &SqliteStore,
        tenant_id: &str,
        query_vector: &TermFreq,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>> {
        let chunks = store.get_chunks(tenant_id)?;
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<RetrievedChunk> = chunks
            .into_iter()
            .map(|chunk| RetrievedChunk {
                score: cosine_similarity(query_vector, &chunk.term_freq),
                text: chunk.text,
                source_file: chunk.source_file,
            })
            .collect();

        // Stable sort: equal scores keep chunk insertion order.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        debug!(
            tenant_id,
            results = scored.len(),
            top_score = scored.first().map(|c| c.score).unwrap_or(0.0),
            "lexical search complete"
        );
        Ok(scored)
    }
}
