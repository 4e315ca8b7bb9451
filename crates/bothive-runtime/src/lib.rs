//! Bothive Runtime — the turn pipeline and ingest/search verbs.

pub mod orchestrator;
pub mod types;

pub use orchestrator::{Orchestrator, DEFAULT_HISTORY_LIMIT};
pub use types::TurnOutcome;
