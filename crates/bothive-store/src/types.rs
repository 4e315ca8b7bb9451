//! Data types for tenants, chunks, conversation history, and bookings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sparse term-frequency vector: normalized token -> occurrence count.
pub type TermFreq = HashMap<String, u32>;

/// A tenant ("bot") row, including its current chunk count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub created_at: i64,
    pub chunk_count: i64,
}

/// A stored document chunk with its deserialized term-frequency vector.
#[derive(Debug, Clone)]
pub struct StoredChunk {
    pub id: i64,
    pub tenant_id: String,
    pub text: String,
    pub term_freq: TermFreq,
    pub source_file: String,
}

/// A chunk ready for insertion.
#[derive(Debug, Clone)]
pub struct NewChunk {
    pub text: String,
    pub term_freq: TermFreq,
    pub source_file: String,
}

/// One turn of persisted conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: String,
    pub content: String,
    pub created_at: i64,
}

/// Booking lifecycle status. Cancel flips status; rows are never deleted by
/// the dialogue flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

/// A booking row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub tenant_id: String,
    pub full_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub preferred_date: String,
    pub preferred_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// Fields for creating a booking.
#[derive(Debug, Clone, Default)]
pub struct NewBooking {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub service: Option<String>,
    pub preferred_date: String,
    pub preferred_time: String,
    pub notes: Option<String>,
}

/// Partial update applied by the reschedule flow.
#[derive(Debug, Clone, Default)]
pub struct BookingUpdate {
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
}

impl BookingUpdate {
    pub fn is_empty(&self) -> bool {
        self.preferred_date.is_none() && self.preferred_time.is_none()
    }
}
