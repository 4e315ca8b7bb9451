//! Document ingestion: chunk, vectorize, and atomically replace a tenant's
//! indexed corpus.

use serde::Serialize;
use tracing::info;

use crate::chunking::WindowChunker;
use crate::vector::vectorize;
use bothive_core::{Error, Result};
use bothive_store::{NewChunk, SqliteStore};

/// Minimum usable document length after trimming. Anything shorter is almost
/// certainly a failed upstream text extraction.
const MIN_TEXT_CHARS: usize = 50;

/// What an upload produced.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    #[serde(rename = "chunkCount")]
    pub chunk_count: usize,
    #[serde(rename = "charCount")]
    pub char_count: usize,
}

/// Indexing pipeline over the store.
pub struct Ingester<'a> {
    store: &'a SqliteStore,
    chunker: WindowChunker,
}

impl<'a> Ingester<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self {
            store,
            chunker: WindowChunker::default(),
        }
    }

    pub fn with_chunker(store: &'a SqliteStore, chunker: WindowChunker) -> Self {
        Self { store, chunker }
    }

    /// Replace the tenant's entire corpus with the chunks of `text`. The
    /// clear-then-insert runs inside one transaction, so a concurrent search
    /// sees either the old corpus or the new one, never a mix.
    pub fn replace_documents(
        &self,
        tenant_id: &str,
        text: &str,
        source_file: &str,
    ) -> Result<IngestReport> {
        let trimmed = text.trim();
        let char_count = trimmed.chars().count();
        if char_count < MIN_TEXT_CHARS {
            return Err(Error::Validation(
                "document text too short to index; extraction likely failed".to_string(),
            ));
        }

        let chunks: Vec<NewChunk> = self
            .chunker
            .chunk(trimmed)
            .into_iter()
            .map(|chunk_text| NewChunk {
                term_freq: vectorize(&chunk_text),
                text: chunk_text,
                source_file: source_file.to_string(),
            })
            .collect();

        let chunk_count = self.store.replace_chunks(tenant_id, &chunks)?;
        info!(tenant_id, source_file, chunk_count, char_count, "document indexed");

        Ok(IngestReport {
            chunk_count,
            char_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_replace_documents_reports_counts() {
        let (store, _dir) = test_store();
        let tenant = store.create_tenant("t", None).unwrap();

        let text = "clinic services ".repeat(120);
        let report = Ingester::new(&store)
            .replace_documents(&tenant, &text, "clinic.pdf")
            .unwrap();

        assert!(report.chunk_count >= 2);
        assert_eq!(report.chunk_count as i64, store.count_chunks(&tenant).unwrap());
        assert_eq!(report.char_count, text.trim().chars().count());
    }

    #[test]
    fn test_reupload_replaces_prior_corpus() {
        let (store, _dir) = test_store();
        let tenant = store.create_tenant("t", None).unwrap();
        let ingester = Ingester::new(&store);

        ingester
            .replace_documents(&tenant, &"document alpha content ".repeat(100), "a.pdf")
            .unwrap();
        let report_b = ingester
            .replace_documents(&tenant, &"document beta content ".repeat(40), "b.pdf")
            .unwrap();

        let chunks = store.get_chunks(&tenant).unwrap();
        assert_eq!(chunks.len(), report_b.chunk_count);
        assert!(chunks.iter().all(|c| c.source_file == "b.pdf"));
        assert!(chunks.iter().all(|c| !c.text.contains("alpha")));
    }

    #[test]
    fn test_too_short_text_is_rejected() {
        let (store, _dir) = test_store();
        let tenant = store.create_tenant("t", None).unwrap();

        let err = Ingester::new(&store)
            .replace_documents(&tenant, "   tiny   ", "t.pdf")
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.count_chunks(&tenant).unwrap(), 0);
    }
}
