//! Bothive Ingest — chunking, term-frequency vectorization, document indexing.

pub mod chunking;
pub mod ingest;
pub mod vector;

pub use chunking::{WindowChunker, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use ingest::{IngestReport, Ingester};
pub use vector::{cosine_similarity, tokenize, vectorize};
