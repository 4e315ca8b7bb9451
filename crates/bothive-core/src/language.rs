//! Reply language selection.
//!
//! Every user-facing string the dialogue layer emits is available in English
//! and Hindi. The language travels with each chat turn, not with the tenant,
//! so a single widget can switch mid-conversation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    /// Parse a language code, falling back to English for anything unknown.
    pub fn parse(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "hi" | "hin" | "hindi" => Language::Hi,
            _ => Language::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }
}
