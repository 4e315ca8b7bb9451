//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level Bothive configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BothiveConfig {
    /// HTTP server port.
    pub port: u16,
    /// Root data directory (holds the SQLite database).
    pub data_dir: PathBuf,
    /// Chunk window size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunk windows.
    pub chunk_overlap: usize,
    /// How many chunks to hand to the answer generator.
    pub top_k: usize,
    /// Idle time after which an in-memory session is evicted.
    pub session_ttl_secs: u64,
    /// How often the background sweeper runs.
    pub sweep_interval_secs: u64,
    /// Hard deadline for a single answer-generator call.
    pub answer_timeout_secs: u64,
}

impl BothiveConfig {
    /// Create configuration from environment and defaults. Creates the data
    /// directory if needed.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);

        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        Ok(Self {
            port,
            data_dir,
            chunk_size: 800,
            chunk_overlap: 100,
            top_k: 5,
            session_ttl_secs: 30 * 60,
            sweep_interval_secs: 5 * 60,
            answer_timeout_secs: 30,
        })
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn answer_timeout(&self) -> Duration {
        Duration::from_secs(self.answer_timeout_secs)
    }
}
