//! Dialogue state, intents, and reply types.

use serde::{Deserialize, Serialize};

use bothive_store::Booking;

/// Where a session currently sits in a multi-turn flow.
///
/// A tagged enum rather than prefix-matched strings: the transition function
/// is an exhaustive match, so adding a state without handling it is a
/// compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    #[default]
    Idle,
    BookingName,
    BookingPhone,
    BookingDate,
    BookingTime,
    BookingConfirm,
    CheckPhone,
    CancelPhone,
    UpdatePhone,
    UpdateDetails,
}

impl DialogState {
    /// True when a multi-turn flow is active and bare yes/no answers should
    /// be read as confirmations rather than fresh intents.
    pub fn in_flow(&self) -> bool {
        !matches!(self, DialogState::Idle)
    }
}

/// Discrete intent labels produced by the rule classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BookAppointment,
    CheckBooking,
    CancelBooking,
    UpdateBooking,
    ContactInfo,
    GeneralQuestion,
    Greeting,
    ConfirmYes,
    ConfirmNo,
    ProvideData,
}

/// Entities pulled out of one user message. Every field is best effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entities {
    pub phone: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Classifier output. Confidence is telemetry only; branching always follows
/// the matched intent.
#[derive(Debug, Clone)]
pub struct Classification {
    pub intent: Intent,
    pub confidence: f64,
    pub entities: Entities,
}

/// Machine-readable tag for what a dialogue turn did, mirrored into the chat
/// response for the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DialogAction {
    AskName,
    AskPhone,
    AskDate,
    AskTime,
    AskDetails,
    Retry,
    Confirm,
    Created,
    Cancelled,
    Found,
    NotFound,
    Updated,
    Contact,
    Greeting,
}

/// A reply produced by the dialogue engine. `None` from the engine means the
/// message was an open question and the retrieval fallback should run.
#[derive(Debug, Clone, Serialize)]
pub struct DialogReply {
    pub reply: String,
    pub action: DialogAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<Booking>,
    #[serde(rename = "bookingId", skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

impl DialogReply {
    pub fn new(reply: impl Into<String>, action: DialogAction) -> Self {
        Self {
            reply: reply.into(),
            action,
            booking: None,
            booking_id: None,
        }
    }

    pub fn with_booking(mut self, booking: Booking) -> Self {
        self.booking = Some(booking);
        self
    }

    pub fn with_booking_id(mut self, id: impl Into<String>) -> Self {
        self.booking_id = Some(id.into());
        self
    }
}
