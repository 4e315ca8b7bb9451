//! Bothive Store — SQLite persistence for tenants, chunks, history, bookings.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::SqliteStore;
pub use types::{
    Booking, BookingStatus, BookingUpdate, ConversationMessage, NewBooking, NewChunk, StoredChunk,
    Tenant, TermFreq,
};
