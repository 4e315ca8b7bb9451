//! The dialogue engine: one exhaustive transition function over
//! [`DialogState`].
//!
//! `handle` returns `Ok(None)` when the message is an open question the
//! engine has no business answering; the caller then falls back to document
//! retrieval. Everything else is a deterministic scripted turn.

use tracing::{debug, info};

use bothive_core::{Language, Result};
use bothive_store::{BookingUpdate, NewBooking, SqliteStore};

use crate::entities::normalize_phone;
use crate::intent::classify;
use crate::messages;
use crate::session::{BookingDraft, Session, SharedSessions};
use crate::types::{Classification, DialogAction, DialogReply, DialogState, Intent};

/// Service name recorded when the widget doesn't specify one.
pub const DEFAULT_SERVICE: &str = "Project Discussion";
/// Placeholder email for bookings made through chat.
pub const DEFAULT_EMAIL: &str = "via-chat@booking.com";

/// Booking IDs are UUIDs; replies show only a short prefix.
const SHORT_ID_LEN: usize = 8;

pub struct DialogEngine {
    sessions: SharedSessions,
}

impl DialogEngine {
    pub fn new(sessions: SharedSessions) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &SharedSessions {
        &self.sessions
    }

    /// Run one turn. `Ok(None)` means "not mine, go retrieve".
    pub fn handle(
        &self,
        store: &SqliteStore,
        tenant_id: &str,
        session_id: &str,
        message: &str,
        lang: Language,
    ) -> Result<Option<DialogReply>> {
        self.sessions.with_session(tenant_id, session_id, |session| {
            let classification = classify(message, session.state);
            debug!(
                tenant_id,
                session_id,
                state = ?session.state,
                intent = ?classification.intent,
                confidence = classification.confidence,
                "dialogue turn"
            );

            match session.state {
                DialogState::Idle => {
                    self.handle_idle(store, tenant_id, session, &classification, lang)
                }
                DialogState::BookingName => {
                    Ok(Some(handle_booking_name(session, message, &classification, lang)))
                }
                DialogState::BookingPhone => {
                    Ok(Some(handle_booking_phone(session, message, &classification, lang)))
                }
                DialogState::BookingDate => {
                    Ok(Some(handle_booking_date(session, &classification, lang)))
                }
                DialogState::BookingTime => {
                    Ok(Some(handle_booking_time(session, &classification, lang)))
                }
                DialogState::BookingConfirm => {
                    handle_booking_confirm(store, tenant_id, session, &classification, lang)
                        .map(Some)
                }
                DialogState::CheckPhone => {
                    slot_phone(session, message, &classification, lang, |phone, session| {
                        lookup_by_phone(store, tenant_id, session, &phone, lang)
                    })
                    .map(Some)
                }
                DialogState::CancelPhone => {
                    slot_phone(session, message, &classification, lang, |phone, session| {
                        cancel_by_phone(store, tenant_id, session, &phone, lang)
                    })
                    .map(Some)
                }
                DialogState::UpdatePhone => {
                    slot_phone(session, message, &classification, lang, |phone, session| {
                        begin_update(store, tenant_id, session, &phone, lang)
                    })
                    .map(Some)
                }
                DialogState::UpdateDetails => {
                    handle_update_details(store, tenant_id, session, &classification, lang)
                        .map(Some)
                }
            }
        })
    }

    fn handle_idle(
        &self,
        store: &SqliteStore,
        tenant_id: &str,
        session: &mut Session,
        classification: &Classification,
        lang: Language,
    ) -> Result<Option<DialogReply>> {
        let entities = &classification.entities;
        match classification.intent {
            Intent::Greeting => Ok(Some(DialogReply::new(
                messages::greeting(lang),
                DialogAction::Greeting,
            ))),
            Intent::ContactInfo => {
                let tenant = store.get_tenant(tenant_id)?;
                let (name, website) = tenant
                    .as_ref()
                    .map(|t| (t.name.as_str(), t.website.as_deref()))
                    .unwrap_or(("us", None));
                Ok(Some(DialogReply::new(
                    messages::contact_info(lang, name, website),
                    DialogAction::Contact,
                )))
            }
            Intent::BookAppointment => {
                session.draft = BookingDraft::default();
                session.state = DialogState::BookingName;
                Ok(Some(DialogReply::new(
                    messages::ask_name(lang),
                    DialogAction::AskName,
                )))
            }
            Intent::CheckBooking => match entities.phone.clone() {
                Some(phone) => lookup_by_phone(store, tenant_id, session, &phone, lang).map(Some),
                None => {
                    session.state = DialogState::CheckPhone;
                    Ok(Some(DialogReply::new(
                        messages::ask_phone_for_check(lang),
                        DialogAction::AskPhone,
                    )))
                }
            },
            Intent::CancelBooking => match entities.phone.clone() {
                Some(phone) => cancel_by_phone(store, tenant_id, session, &phone, lang).map(Some),
                None => {
                    session.state = DialogState::CancelPhone;
                    Ok(Some(DialogReply::new(
                        messages::ask_phone_for_cancel(lang),
                        DialogAction::AskPhone,
                    )))
                }
            },
            Intent::UpdateBooking => {
                let phone = entities.phone.clone().or_else(|| session.last_phone.clone());
                match phone {
                    Some(phone) => {
                        let update = BookingUpdate {
                            preferred_date: entities.date.clone(),
                            preferred_time: entities.time.clone(),
                        };
                        if update.is_empty() {
                            begin_update(store, tenant_id, session, &phone, lang).map(Some)
                        } else {
                            apply_update(store, tenant_id, session, &phone, update, lang).map(Some)
                        }
                    }
                    None => {
                        session.state = DialogState::UpdatePhone;
                        Ok(Some(DialogReply::new(
                            messages::ask_phone_for_update(lang),
                            DialogAction::AskPhone,
                        )))
                    }
                }
            }
            // Open questions fall through to retrieval.
            Intent::GeneralQuestion
            | Intent::ProvideData
            | Intent::ConfirmYes
            | Intent::ConfirmNo => Ok(None),
        }
    }
}

fn handle_booking_name(
    session: &mut Session,
    message: &str,
    classification: &Classification,
    lang: Language,
) -> DialogReply {
    let name = classification
        .entities
        .name
        .clone()
        .unwrap_or_else(|| message.trim().to_string());
    if name.is_empty() {
        return DialogReply::new(messages::ask_name(lang), DialogAction::Retry);
    }
    session.draft.full_name = Some(name.clone());
    session.state = DialogState::BookingPhone;
    DialogReply::new(messages::thanks_ask_phone(lang, &name), DialogAction::AskPhone)
}

fn handle_booking_phone(
    session: &mut Session,
    message: &str,
    classification: &Classification,
    lang: Language,
) -> DialogReply {
    let phone = classification
        .entities
        .phone
        .clone()
        .or_else(|| normalize_phone(message));
    match phone {
        Some(phone) => {
            session.draft.phone = Some(phone);
            session.state = DialogState::BookingDate;
            DialogReply::new(messages::ask_date(lang), DialogAction::AskDate)
        }
        None => DialogReply::new(messages::invalid_phone(lang), DialogAction::Retry),
    }
}

fn handle_booking_date(
    session: &mut Session,
    classification: &Classification,
    lang: Language,
) -> DialogReply {
    match classification.entities.date.clone() {
        Some(date) => {
            session.draft.preferred_date = Some(date);
            session.state = DialogState::BookingTime;
            DialogReply::new(messages::ask_time(lang), DialogAction::AskTime)
        }
        None => DialogReply::new(messages::invalid_date(lang), DialogAction::Retry),
    }
}

fn handle_booking_time(
    session: &mut Session,
    classification: &Classification,
    lang: Language,
) -> DialogReply {
    match classification.entities.time.clone() {
        Some(time) => {
            session.draft.preferred_time = Some(time);
            session.state = DialogState::BookingConfirm;
            DialogReply::new(messages::confirm_summary(lang, &session.draft), DialogAction::Confirm)
        }
        None => DialogReply::new(messages::invalid_time(lang), DialogAction::Retry),
    }
}

fn handle_booking_confirm(
    store: &SqliteStore,
    tenant_id: &str,
    session: &mut Session,
    classification: &Classification,
    lang: Language,
) -> Result<DialogReply> {
    match classification.intent {
        Intent::ConfirmYes => {
            let draft = &session.draft;
            let new_booking = NewBooking {
                full_name: draft.full_name.clone().unwrap_or_default(),
                phone: draft.phone.clone().unwrap_or_default(),
                email: Some(draft.email.clone().unwrap_or_else(|| DEFAULT_EMAIL.to_string())),
                service: Some(draft.service.clone().unwrap_or_else(|| DEFAULT_SERVICE.to_string())),
                preferred_date: draft.preferred_date.clone().unwrap_or_default(),
                preferred_time: draft.preferred_time.clone().unwrap_or_default(),
                notes: None,
            };
            let booking_id = store.create_booking(tenant_id, &new_booking)?;
            let booking = store.get_booking(&booking_id)?;
            let short_id: String = booking_id.chars().take(SHORT_ID_LEN).collect();

            info!(tenant_id, %booking_id, "booking created via chat");
            session.last_phone = session.draft.phone.clone();
            session.last_booking = booking.clone();
            session.end_flow();

            let mut reply = DialogReply::new(
                messages::booking_created(lang, &short_id),
                DialogAction::Created,
            )
            .with_booking_id(short_id);
            if let Some(booking) = booking {
                reply = reply.with_booking(booking);
            }
            Ok(reply)
        }
        // Anything short of an explicit yes declines the draft.
        _ => {
            session.end_flow();
            Ok(DialogReply::new(
                messages::booking_declined(lang),
                DialogAction::Cancelled,
            ))
        }
    }
}

/// Shared slot handler for the three "which phone?" states. Re-asks in place
/// on an unparseable number, otherwise hands the clean phone to `then`.
fn slot_phone(
    session: &mut Session,
    message: &str,
    classification: &Classification,
    lang: Language,
    then: impl FnOnce(String, &mut Session) -> Result<DialogReply>,
) -> Result<DialogReply> {
    let phone = classification
        .entities
        .phone
        .clone()
        .or_else(|| normalize_phone(message));
    match phone {
        Some(phone) => then(phone, session),
        None => Ok(DialogReply::new(messages::invalid_phone(lang), DialogAction::Retry)),
    }
}

fn lookup_by_phone(
    store: &SqliteStore,
    tenant_id: &str,
    session: &mut Session,
    phone: &str,
    lang: Language,
) -> Result<DialogReply> {
    let bookings = store.bookings_by_phone(tenant_id, phone)?;
    session.last_phone = Some(phone.to_string());
    session.end_flow();
    match bookings.into_iter().next() {
        Some(booking) => {
            session.last_booking = Some(booking.clone());
            Ok(DialogReply::new(messages::booking_found(lang, &booking), DialogAction::Found)
                .with_booking(booking))
        }
        None => Ok(DialogReply::new(
            messages::booking_not_found(lang),
            DialogAction::NotFound,
        )),
    }
}

fn cancel_by_phone(
    store: &SqliteStore,
    tenant_id: &str,
    session: &mut Session,
    phone: &str,
    lang: Language,
) -> Result<DialogReply> {
    let cancelled = store.cancel_bookings_by_phone(tenant_id, phone)?;
    session.last_phone = Some(phone.to_string());
    session.end_flow();
    if cancelled > 0 {
        info!(tenant_id, cancelled, "bookings cancelled via chat");
        Ok(DialogReply::new(
            messages::bookings_cancelled(lang, cancelled),
            DialogAction::Cancelled,
        ))
    } else {
        Ok(DialogReply::new(
            messages::booking_not_found(lang),
            DialogAction::NotFound,
        ))
    }
}

/// Phone captured for an update; ask what to change if the booking exists.
fn begin_update(
    store: &SqliteStore,
    tenant_id: &str,
    session: &mut Session,
    phone: &str,
    lang: Language,
) -> Result<DialogReply> {
    let bookings = store.bookings_by_phone(tenant_id, phone)?;
    session.last_phone = Some(phone.to_string());
    if bookings.is_empty() {
        session.end_flow();
        return Ok(DialogReply::new(
            messages::booking_not_found(lang),
            DialogAction::NotFound,
        ));
    }
    session.update_phone = Some(phone.to_string());
    session.state = DialogState::UpdateDetails;
    Ok(DialogReply::new(
        messages::ask_update_details(lang),
        DialogAction::AskDetails,
    ))
}

fn handle_update_details(
    store: &SqliteStore,
    tenant_id: &str,
    session: &mut Session,
    classification: &Classification,
    lang: Language,
) -> Result<DialogReply> {
    let update = BookingUpdate {
        preferred_date: classification.entities.date.clone(),
        preferred_time: classification.entities.time.clone(),
    };
    if update.is_empty() {
        return Ok(DialogReply::new(
            messages::ask_update_details(lang),
            DialogAction::Retry,
        ));
    }
    let Some(phone) = session.update_phone.clone() else {
        session.end_flow();
        return Ok(DialogReply::new(
            messages::booking_not_found(lang),
            DialogAction::NotFound,
        ));
    };
    apply_update(store, tenant_id, session, &phone, update, lang)
}

fn apply_update(
    store: &SqliteStore,
    tenant_id: &str,
    session: &mut Session,
    phone: &str,
    update: BookingUpdate,
    lang: Language,
) -> Result<DialogReply> {
    let bookings = store.bookings_by_phone(tenant_id, phone)?;
    session.last_phone = Some(phone.to_string());
    let Some(target) = bookings.into_iter().next() else {
        session.end_flow();
        return Ok(DialogReply::new(
            messages::booking_not_found(lang),
            DialogAction::NotFound,
        ));
    };
    store.update_booking(&target.id, &update)?;
    let refreshed = store.get_booking(&target.id)?.unwrap_or(target);
    info!(tenant_id, booking_id = %refreshed.id, "booking rescheduled via chat");
    session.last_booking = Some(refreshed.clone());
    session.end_flow();
    Ok(
        DialogReply::new(messages::booking_updated(lang, &refreshed), DialogAction::Updated)
            .with_booking(refreshed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::session::SessionStore;

    fn engine() -> DialogEngine {
        DialogEngine::new(Arc::new(SessionStore::new(Duration::from_secs(1800))))
    }

    fn store_with_tenant() -> (SqliteStore, String, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        let tenant = store.create_tenant("Acme Clinic", Some("acme.example")).unwrap();
        (store, tenant, dir)
    }

    fn turn(
        engine: &DialogEngine,
        store: &SqliteStore,
        tenant: &str,
        message: &str,
    ) -> Option<DialogReply> {
        engine
            .handle(store, tenant, "s1", message, Language::En)
            .unwrap()
    }

    #[test]
    fn test_full_booking_flow() {
        let (store, tenant, _dir) = store_with_tenant();
        let engine = engine();

        let r = turn(&engine, &store, &tenant, "I want to book an appointment").unwrap();
        assert_eq!(r.action, DialogAction::AskName);

        let r = turn(&engine, &store, &tenant, "Ravi Kumar").unwrap();
        assert_eq!(r.action, DialogAction::AskPhone);
        assert!(r.reply.contains("Ravi Kumar"));

        let r = turn(&engine, &store, &tenant, "9876543210").unwrap();
        assert_eq!(r.action, DialogAction::AskDate);

        let r = turn(&engine, &store, &tenant, "tomorrow").unwrap();
        assert_eq!(r.action, DialogAction::AskTime);

        let r = turn(&engine, &store, &tenant, "3pm").unwrap();
        assert_eq!(r.action, DialogAction::Confirm);
        assert!(r.reply.contains("9876543210"));
        assert!(r.reply.contains("3:00 PM"));

        let r = turn(&engine, &store, &tenant, "yes").unwrap();
        assert_eq!(r.action, DialogAction::Created);
        let booking = r.booking.expect("created booking attached");
        assert_eq!(booking.full_name, "Ravi Kumar");
        assert_eq!(booking.phone, "9876543210");
        assert_eq!(booking.service.as_deref(), Some(DEFAULT_SERVICE));
        assert_eq!(booking.email.as_deref(), Some(DEFAULT_EMAIL));
        assert_eq!(r.booking_id.as_deref().map(|s| s.len()), Some(8));

        // Flow is over; session is idle again.
        let state = engine
            .sessions()
            .with_session(&tenant, "s1", |s| s.state);
        assert_eq!(state, DialogState::Idle);

        let stored = store.bookings_by_phone(&tenant, "9876543210").unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_invalid_phone_retries_in_place() {
        let (store, tenant, _dir) = store_with_tenant();
        let engine = engine();

        turn(&engine, &store, &tenant, "book appointment");
        turn(&engine, &store, &tenant, "Ravi");

        let r = turn(&engine, &store, &tenant, "12345").unwrap();
        assert_eq!(r.action, DialogAction::Retry);

        // Still waiting on the phone; a valid one now advances.
        let r = turn(&engine, &store, &tenant, "98765 43210").unwrap();
        assert_eq!(r.action, DialogAction::AskDate);
    }

    #[test]
    fn test_declining_confirmation_discards_draft() {
        let (store, tenant, _dir) = store_with_tenant();
        let engine = engine();

        turn(&engine, &store, &tenant, "book appointment");
        turn(&engine, &store, &tenant, "Ravi Kumar");
        turn(&engine, &store, &tenant, "9876543210");
        turn(&engine, &store, &tenant, "tomorrow");
        turn(&engine, &store, &tenant, "10am");

        let r = turn(&engine, &store, &tenant, "no").unwrap();
        assert_eq!(r.action, DialogAction::Cancelled);
        assert!(store.bookings_by_phone(&tenant, "9876543210").unwrap().is_empty());
    }

    #[test]
    fn test_anything_but_yes_declines_at_confirm() {
        let (store, tenant, _dir) = store_with_tenant();
        let engine = engine();

        turn(&engine, &store, &tenant, "book appointment");
        turn(&engine, &store, &tenant, "Ravi Kumar");
        turn(&engine, &store, &tenant, "9876543210");
        turn(&engine, &store, &tenant, "tomorrow");
        turn(&engine, &store, &tenant, "3pm");

        let r = turn(&engine, &store, &tenant, "maybe later").unwrap();
        assert_eq!(r.action, DialogAction::Cancelled);

        let state = engine.sessions().with_session(&tenant, "s1", |s| s.state);
        assert_eq!(state, DialogState::Idle);
        assert!(store.bookings_by_phone(&tenant, "9876543210").unwrap().is_empty());
    }

    #[test]
    fn test_check_flow_finds_booking() {
        let (store, tenant, _dir) = store_with_tenant();
        let engine = engine();

        store
            .create_booking(
                &tenant,
                &NewBooking {
                    full_name: "Ravi Kumar".to_string(),
                    phone: "9876543210".to_string(),
                    email: None,
                    service: None,
                    preferred_date: "2026-09-01".to_string(),
                    preferred_time: "3:00 PM".to_string(),
                    notes: None,
                },
            )
            .unwrap();

        let r = turn(&engine, &store, &tenant, "check my booking").unwrap();
        assert_eq!(r.action, DialogAction::AskPhone);

        let r = turn(&engine, &store, &tenant, "+91 9876543210").unwrap();
        assert_eq!(r.action, DialogAction::Found);
        assert!(r.reply.contains("Ravi Kumar"));
    }

    #[test]
    fn test_check_with_unknown_phone() {
        let (store, tenant, _dir) = store_with_tenant();
        let engine = engine();

        let r = turn(&engine, &store, &tenant, "check my booking for 9000000001").unwrap();
        assert_eq!(r.action, DialogAction::NotFound);
    }

    #[test]
    fn test_cancel_direct_with_phone_in_message() {
        let (store, tenant, _dir) = store_with_tenant();
        let engine = engine();

        store
            .create_booking(
                &tenant,
                &NewBooking {
                    full_name: "Ravi".to_string(),
                    phone: "9876543210".to_string(),
                    email: None,
                    service: None,
                    preferred_date: "2026-09-01".to_string(),
                    preferred_time: "10:00 AM".to_string(),
                    notes: None,
                },
            )
            .unwrap();

        let r = turn(&engine, &store, &tenant, "cancel my booking 9876543210").unwrap();
        assert_eq!(r.action, DialogAction::Cancelled);

        let remaining = store.bookings_by_phone(&tenant, "9876543210").unwrap();
        assert_eq!(remaining[0].status.as_str(), "cancelled");
    }

    #[test]
    fn test_update_flow_reschedules() {
        let (store, tenant, _dir) = store_with_tenant();
        let engine = engine();

        store
            .create_booking(
                &tenant,
                &NewBooking {
                    full_name: "Ravi".to_string(),
                    phone: "9876543210".to_string(),
                    email: None,
                    service: None,
                    preferred_date: "2026-09-01".to_string(),
                    preferred_time: "10:00 AM".to_string(),
                    notes: None,
                },
            )
            .unwrap();

        let r = turn(&engine, &store, &tenant, "reschedule my booking").unwrap();
        assert_eq!(r.action, DialogAction::AskPhone);

        let r = turn(&engine, &store, &tenant, "9876543210").unwrap();
        assert_eq!(r.action, DialogAction::AskDetails);

        let r = turn(&engine, &store, &tenant, "make it 5pm").unwrap();
        assert_eq!(r.action, DialogAction::Updated);

        let bookings = store.bookings_by_phone(&tenant, "9876543210").unwrap();
        assert_eq!(bookings[0].preferred_time, "5:00 PM");
        assert_eq!(bookings[0].preferred_date, "2026-09-01");
    }

    #[test]
    fn test_remembered_phone_skips_reasking_on_update() {
        let (store, tenant, _dir) = store_with_tenant();
        let engine = engine();

        store
            .create_booking(
                &tenant,
                &NewBooking {
                    full_name: "Ravi".to_string(),
                    phone: "9876543210".to_string(),
                    email: None,
                    service: None,
                    preferred_date: "2026-09-01".to_string(),
                    preferred_time: "10:00 AM".to_string(),
                    notes: None,
                },
            )
            .unwrap();

        // Lookup remembers the phone for the session.
        turn(&engine, &store, &tenant, "check my booking 9876543210");

        let r = turn(&engine, &store, &tenant, "change my booking to 4pm").unwrap();
        assert_eq!(r.action, DialogAction::Updated);
        let bookings = store.bookings_by_phone(&tenant, "9876543210").unwrap();
        assert_eq!(bookings[0].preferred_time, "4:00 PM");
    }

    #[test]
    fn test_greeting_and_contact_answered_at_idle() {
        let (store, tenant, _dir) = store_with_tenant();
        let engine = engine();

        let r = turn(&engine, &store, &tenant, "hello").unwrap();
        assert_eq!(r.action, DialogAction::Greeting);

        let r = turn(&engine, &store, &tenant, "how can I contact you").unwrap();
        assert_eq!(r.action, DialogAction::Contact);
        assert!(r.reply.contains("Acme Clinic"));
    }

    #[test]
    fn test_open_question_defers_to_retrieval() {
        let (store, tenant, _dir) = store_with_tenant();
        let engine = engine();

        assert!(turn(&engine, &store, &tenant, "what are your opening hours").is_none());
    }

    #[test]
    fn test_hindi_flow_replies_in_hindi() {
        let (store, tenant, _dir) = store_with_tenant();
        let engine = engine();

        let r = engine
            .handle(&store, &tenant, "s2", "book appointment", Language::Hi)
            .unwrap()
            .unwrap();
        assert_eq!(r.action, DialogAction::AskName);
        assert!(r.reply.contains("नाम"));
    }
}
