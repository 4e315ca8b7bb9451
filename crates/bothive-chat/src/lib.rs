//! Bothive Chat — grounded answer generation behind a small async trait.

pub mod config;
pub mod generator;
pub mod prompt;

pub use config::GeneratorConfig;
pub use generator::{AnswerGenerator, HttpAnswerGenerator};
pub use prompt::build_prompt;
