//! Rule-based intent classification.
//!
//! A fixed cascade of regex rules, most specific first. "cancel my booking"
//! must hit the cancel rule before the generic booking rule ever sees the
//! word "booking". Inside a multi-turn flow the cascade is bypassed and the
//! message is read as an answer to the pending question.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::extract_all;
use crate::types::{Classification, DialogState, Entities, Intent};

static GREETING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(hi+|hello|hey|namaste|नमस्ते|hola)[\s!.,]*$").unwrap());

static BOOKING_NOUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(booking|appointment|slot|बुकिंग|अपॉइंटमेंट)\b").unwrap());

static CHECK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(check|status|find|view|show|see|get|where|मेरी|देखें|देखो)\b").unwrap()
});

static CANCEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(cancel|delete|remove|कैंसिल|रद्द|हटाओ)\b").unwrap());

static UPDATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(update|change|reschedule|modify|shift|move|postpone|prepone|बदलो|बदलें|अपडेट)\b")
        .unwrap()
});

static BOOK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(book|booking|appointment|schedule|reserve|meeting|बुक|अपॉइंटमेंट|मिलना)\b")
        .unwrap()
});

// Guards the generic booking rule: "check my booking" carries the noun too.
static OTHER_ACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(check|status|cancel|delete|update|change|reschedule|find|view|show)\b")
        .unwrap()
});

static CONTACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(contact|phone number|email|address|website|reach|संपर्क|पता)\b").unwrap()
});

static YES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(yes|yeah|yep|ok|okay|sure|confirm|done|हां|हाँ|जी|ठीक)\b").unwrap()
});

static NO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(no|nope|nah|stop|cancel|नहीं|रद्द|बंद)\b").unwrap());

/// Classify one message given the session's current flow state.
pub fn classify(message: &str, state: DialogState) -> Classification {
    let entities = extract_all(message);

    if state.in_flow() {
        return classify_in_flow(message, entities);
    }

    let (intent, confidence) = classify_idle(message, &entities);
    Classification {
        intent,
        confidence,
        entities,
    }
}

fn classify_in_flow(message: &str, entities: Entities) -> Classification {
    let (intent, confidence) = if YES_RE.is_match(message) {
        (Intent::ConfirmYes, 1.0)
    } else if NO_RE.is_match(message) {
        (Intent::ConfirmNo, 1.0)
    } else {
        (Intent::ProvideData, 0.9)
    };
    Classification {
        intent,
        confidence,
        entities,
    }
}

fn classify_idle(message: &str, entities: &Entities) -> (Intent, f64) {
    let trimmed = message.trim();

    if GREETING_RE.is_match(trimmed) {
        return (Intent::Greeting, 1.0);
    }
    // Only the status check needs the booking noun; cancel and update verbs
    // are unambiguous on their own ("please cancel", "reschedule to 5pm").
    if BOOKING_NOUN_RE.is_match(trimmed) && CHECK_RE.is_match(trimmed) {
        return (Intent::CheckBooking, 0.98);
    }
    if CANCEL_RE.is_match(trimmed) {
        return (Intent::CancelBooking, 0.98);
    }
    if UPDATE_RE.is_match(trimmed) {
        return (Intent::UpdateBooking, 0.98);
    }
    if BOOK_RE.is_match(trimmed) && !OTHER_ACTION_RE.is_match(trimmed) {
        return (Intent::BookAppointment, 0.95);
    }
    if CONTACT_RE.is_match(trimmed) {
        return (Intent::ContactInfo, 0.85);
    }
    // A bare phone number at rest reads as "look up my booking".
    if entities.phone.is_some() && trimmed.chars().count() < 30 {
        return (Intent::CheckBooking, 0.7);
    }
    (Intent::GeneralQuestion, 0.6)
}
