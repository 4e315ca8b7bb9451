//! Bothive Retrieval — tenant-partitioned cosine similarity search.

pub mod retriever;

pub use retriever::{RetrievedChunk, Retriever, DEFAULT_TOP_K};
