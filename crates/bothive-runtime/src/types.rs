//! Runtime-level response types.

use serde::Serialize;

use bothive_dialog::{DialogAction, DialogReply};
use bothive_retrieval::RetrievedChunk;
use bothive_store::Booking;

/// What one chat turn produced, whichever path answered it.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub answer: String,
    pub sources: Vec<RetrievedChunk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<DialogAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<Booking>,
    #[serde(rename = "bookingId", skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

impl TurnOutcome {
    /// A plain answer with no sources, used for scripted short-circuits.
    pub fn plain(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
            action: None,
            booking: None,
            booking_id: None,
        }
    }

    pub fn grounded(answer: String, sources: Vec<RetrievedChunk>) -> Self {
        Self {
            answer,
            sources,
            action: None,
            booking: None,
            booking_id: None,
        }
    }
}

impl From<DialogReply> for TurnOutcome {
    fn from(reply: DialogReply) -> Self {
        Self {
            answer: reply.reply,
            sources: Vec::new(),
            action: Some(reply.action),
            booking: reply.booking,
            booking_id: reply.booking_id,
        }
    }
}
