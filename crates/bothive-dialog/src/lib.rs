//! Bothive Dialog — scripted appointment flows over a rule classifier.
//!
//! The engine owns everything conversational that is not an open question:
//! intent classification, entity extraction, the booking state machine, and
//! per-session memory. Open questions are declined (`Ok(None)`) so the
//! runtime can answer them from the tenant's document instead.

pub mod engine;
pub mod entities;
pub mod intent;
pub mod messages;
pub mod session;
pub mod types;

pub use engine::{DialogEngine, DEFAULT_EMAIL, DEFAULT_SERVICE};
pub use session::{BookingDraft, Session, SessionStore, SharedSessions};
pub use types::{
    Classification, DialogAction, DialogReply, DialogState, Entities, Intent,
};
