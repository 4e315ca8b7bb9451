//! Bothive Core — configuration, language selection, shared error type.

pub mod config;
pub mod error;
pub mod language;

pub use config::BothiveConfig;
pub use error::{Error, Result};
pub use language::Language;
