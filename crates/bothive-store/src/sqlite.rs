//! SQLite-backed tenant store: chunks, conversation history, bookings.
//!
//! One connection behind a mutex; every query is tenant-scoped. Chunk
//! replacement runs in a transaction so a concurrent search never observes a
//! partially cleared or partially inserted chunk set.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::schema::SCHEMA_SQL;
use crate::types::*;
use bothive_core::{Error, Result};

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

/// Strip formatting from a phone query so lookups tolerate `+91`, spaces,
/// dashes, and a leading zero.
fn normalize_phone_query(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 12 && digits.starts_with("91") {
        digits[2..].to_string()
    } else if digits.len() == 11 && digits.starts_with('0') {
        digits[1..].to_string()
    } else {
        digits
    }
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the store. `db_dir` is the data directory; the file
    /// will be `db_dir/bothive.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("bothive.db");

        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        info!(
            "SqliteStore initialized: {} tenants, path={}",
            store.count_tenants()?,
            store.db_path.display()
        );
        Ok(store)
    }

    // ---------------------------------------------------------------
    // Tenants
    // ---------------------------------------------------------------

    /// Create a tenant. Returns the new tenant id.
    pub fn create_tenant(&self, name: &str, website: Option<&str>) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO tenants (id, name, website, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, name, website, now_millis()],
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id)
    }

    /// Get a tenant with its current chunk count.
    pub fn get_tenant(&self, tenant_id: &str) -> Result<Option<Tenant>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT t.id, t.name, t.website, t.created_at, COUNT(c.id) \
                 FROM tenants t LEFT JOIN chunks c ON c.tenant_id = t.id \
                 WHERE t.id = ?1 GROUP BY t.id",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        stmt.query_row(params![tenant_id], |row| {
            Ok(Tenant {
                id: row.get(0)?,
                name: row.get(1)?,
                website: row.get(2)?,
                created_at: row.get(3)?,
                chunk_count: row.get(4)?,
            })
        })
        .optional()
        .map_err(|e| Error::Database(e.to_string()))
    }

    pub fn count_tenants(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM tenants", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    // ---------------------------------------------------------------
    // Chunks
    // ---------------------------------------------------------------

    /// Atomically replace all chunks for a tenant with a freshly indexed
    /// document. Returns the number of chunks inserted.
    pub fn replace_chunks(&self, tenant_id: &str, chunks: &[NewChunk]) -> Result<usize> {
        let now = now_millis();
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::Database(e.to_string()))?;

        tx.execute("DELETE FROM chunks WHERE tenant_id = ?1", params![tenant_id])
            .map_err(|e| Error::Database(e.to_string()))?;

        for chunk in chunks {
            let tf_json = serde_json::to_string(&chunk.term_freq)?;
            tx.execute(
                "INSERT INTO chunks (tenant_id, text, term_freq, source_file, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![tenant_id, chunk.text, tf_json, chunk.source_file, now],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        }

        tx.commit().map_err(|e| Error::Database(e.to_string()))?;
        debug!(tenant_id, chunks = chunks.len(), "replaced chunk set");
        Ok(chunks.len())
    }

    /// All chunks for a tenant in insertion order, with deserialized
    /// term-frequency vectors.
    pub fn get_chunks(&self, tenant_id: &str) -> Result<Vec<StoredChunk>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, tenant_id, text, term_freq, source_file \
                 FROM chunks WHERE tenant_id = ?1 ORDER BY id",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![tenant_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut chunks = Vec::new();
        for row in rows {
            let (id, tenant_id, text, tf_json, source_file) =
                row.map_err(|e| Error::Database(e.to_string()))?;
            chunks.push(StoredChunk {
                id,
                tenant_id,
                text,
                // A corrupt vector must fail loudly, not silently rank last.
                term_freq: serde_json::from_str(&tf_json)?,
                source_file,
            });
        }
        Ok(chunks)
    }

    pub fn count_chunks(&self, tenant_id: &str) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE tenant_id = ?1",
            params![tenant_id],
            |row| row.get(0),
        )
        .map_err(|e| Error::Database(e.to_string()))
    }

    // ---------------------------------------------------------------
    // Conversation history
    // ---------------------------------------------------------------

    pub fn save_message(
        &self,
        tenant_id: &str,
        session_id: &str,
        role: &str,
        content: &str,
    ) -> Result<i64> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "INSERT INTO conversations (tenant_id, session_id, role, content, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        stmt.insert(params![tenant_id, session_id, role, content, now_millis()])
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Most recent `limit` messages for a (tenant, session) pair, oldest
    /// first.
    pub fn get_history(
        &self,
        tenant_id: &str,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationMessage>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT role, content, created_at FROM conversations \
                 WHERE tenant_id = ?1 AND session_id = ?2 \
                 ORDER BY created_at DESC, id DESC LIMIT ?3",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![tenant_id, session_id, limit as i64], |row| {
                Ok(ConversationMessage {
                    role: row.get(0)?,
                    content: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?;
        let mut messages: Vec<ConversationMessage> = rows.filter_map(|r| r.ok()).collect();
        messages.reverse();
        Ok(messages)
    }

    /// Delete all history for a (tenant, session) pair. Returns rows removed.
    pub fn clear_history(&self, tenant_id: &str, session_id: &str) -> Result<usize> {
        let conn = self.conn.lock();
        conn.execute(
            "DELETE FROM conversations WHERE tenant_id = ?1 AND session_id = ?2",
            params![tenant_id, session_id],
        )
        .map_err(|e| Error::Database(e.to_string()))
    }

    // ---------------------------------------------------------------
    // Bookings
    // ---------------------------------------------------------------

    pub fn create_booking(&self, tenant_id: &str, booking: &NewBooking) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO bookings (id, tenant_id, full_name, phone, email, service, \
             preferred_date, preferred_time, notes, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'pending', ?10)",
            params![
                id,
                tenant_id,
                booking.full_name,
                booking.phone,
                booking.email,
                booking.service,
                booking.preferred_date,
                booking.preferred_time,
                booking.notes,
                now_millis(),
            ],
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        debug!(tenant_id, booking_id = %id, "booking created");
        Ok(id)
    }

    pub fn get_booking(&self, booking_id: &str) -> Result<Option<Booking>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM bookings WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?;
        stmt.query_row(params![booking_id], Self::row_to_booking)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Bookings for a phone number, most recent first. The phone query is
    /// normalized so `+91 98765-43210` finds a booking stored as
    /// `9876543210`.
    pub fn bookings_by_phone(&self, tenant_id: &str, phone: &str) -> Result<Vec<Booking>> {
        let clean = normalize_phone_query(phone);
        if clean.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT * FROM bookings WHERE tenant_id = ?1 AND phone LIKE ?2 \
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![tenant_id, format!("%{}", clean)], Self::row_to_booking)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// All bookings for a tenant, optionally filtered by status, most recent
    /// first.
    pub fn list_bookings(
        &self,
        tenant_id: &str,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT * FROM bookings WHERE tenant_id = ?1 \
                 AND (?2 IS NULL OR status = ?2) \
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(
                params![tenant_id, status.map(|s| s.as_str())],
                Self::row_to_booking,
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Set the status on a booking. Returns false if the id is unknown.
    pub fn update_booking_status(&self, booking_id: &str, status: BookingStatus) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_str(), now_millis(), booking_id],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Cancel every active booking for a phone number. Returns how many were
    /// flipped to cancelled.
    pub fn cancel_bookings_by_phone(&self, tenant_id: &str, phone: &str) -> Result<usize> {
        let clean = normalize_phone_query(phone);
        if clean.is_empty() {
            return Ok(0);
        }
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE bookings SET status = 'cancelled', updated_at = ?1 \
             WHERE tenant_id = ?2 AND phone LIKE ?3 AND status != 'cancelled'",
            params![now_millis(), tenant_id, format!("%{}", clean)],
        )
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Apply a date/time update to a booking. Returns false if the id is
    /// unknown or the update is empty.
    pub fn update_booking(&self, booking_id: &str, update: &BookingUpdate) -> Result<bool> {
        if update.is_empty() {
            return Ok(false);
        }
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "UPDATE bookings SET \
                 preferred_date = COALESCE(?1, preferred_date), \
                 preferred_time = COALESCE(?2, preferred_time), \
                 updated_at = ?3 WHERE id = ?4",
                params![
                    update.preferred_date,
                    update.preferred_time,
                    now_millis(),
                    booking_id
                ],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    fn row_to_booking(row: &Row) -> rusqlite::Result<Booking> {
        let status: String = row.get("status")?;
        Ok(Booking {
            id: row.get("id")?,
            tenant_id: row.get("tenant_id")?,
            full_name: row.get("full_name")?,
            phone: row.get("phone")?,
            email: row.get("email")?,
            service: row.get("service")?,
            preferred_date: row.get("preferred_date")?,
            preferred_time: row.get("preferred_time")?,
            notes: row.get("notes")?,
            status: BookingStatus::parse(&status).unwrap_or(BookingStatus::Pending),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn test_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn chunk(text: &str) -> NewChunk {
        let mut tf = HashMap::new();
        for token in text.split_whitespace() {
            *tf.entry(token.to_lowercase()).or_insert(0) += 1;
        }
        NewChunk {
            text: text.to_string(),
            term_freq: tf,
            source_file: "test.pdf".to_string(),
        }
    }

    fn booking(name: &str, phone: &str) -> NewBooking {
        NewBooking {
            full_name: name.to_string(),
            phone: phone.to_string(),
            email: Some("via-chat@booking.com".to_string()),
            service: Some("Project Discussion".to_string()),
            preferred_date: "2025-09-01".to_string(),
            preferred_time: "3:00 PM".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_tenant_roundtrip() {
        let (store, _dir) = test_store();
        let id = store.create_tenant("Acme Clinic", Some("acme.example")).unwrap();

        let tenant = store.get_tenant(&id).unwrap().unwrap();
        assert_eq!(tenant.name, "Acme Clinic");
        assert_eq!(tenant.website.as_deref(), Some("acme.example"));
        assert_eq!(tenant.chunk_count, 0);

        assert!(store.get_tenant("nope").unwrap().is_none());
    }

    #[test]
    fn test_replace_chunks_is_full_replacement() {
        let (store, _dir) = test_store();
        let id = store.create_tenant("t", None).unwrap();

        store
            .replace_chunks(&id, &[chunk("first doc part one"), chunk("first doc part two")])
            .unwrap();
        assert_eq!(store.count_chunks(&id).unwrap(), 2);

        store.replace_chunks(&id, &[chunk("second doc only part")]).unwrap();
        let chunks = store.get_chunks(&id).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "second doc only part");
    }

    #[test]
    fn test_term_freq_roundtrip_is_exact() {
        let (store, _dir) = test_store();
        let id = store.create_tenant("t", None).unwrap();

        let original = chunk("alpha alpha beta");
        store.replace_chunks(&id, &[original.clone()]).unwrap();

        let loaded = &store.get_chunks(&id).unwrap()[0];
        assert_eq!(loaded.term_freq, original.term_freq);
        assert_eq!(loaded.term_freq["alpha"], 2);
    }

    #[test]
    fn test_corrupt_term_freq_surfaces_an_error() {
        let (store, dir) = test_store();
        let id = store.create_tenant("t", None).unwrap();
        store.replace_chunks(&id, &[chunk("some indexed text")]).unwrap();

        // Corrupt the stored vector through a second connection.
        let raw = Connection::open(dir.path().join("bothive.db")).unwrap();
        raw.execute("UPDATE chunks SET term_freq = 'not-json'", [])
            .unwrap();
        drop(raw);

        assert!(matches!(store.get_chunks(&id), Err(Error::Json(_))));
    }

    #[test]
    fn test_chunks_are_tenant_partitioned() {
        let (store, _dir) = test_store();
        let a = store.create_tenant("a", None).unwrap();
        let b = store.create_tenant("b", None).unwrap();

        store.replace_chunks(&a, &[chunk("tenant a text")]).unwrap();
        store.replace_chunks(&b, &[chunk("tenant b text")]).unwrap();

        assert_eq!(store.get_chunks(&a).unwrap().len(), 1);
        assert_eq!(store.get_chunks(&a).unwrap()[0].text, "tenant a text");
    }

    #[test]
    fn test_history_window_and_clear() {
        let (store, _dir) = test_store();
        let id = store.create_tenant("t", None).unwrap();

        for i in 0..5 {
            store.save_message(&id, "s1", "user", &format!("q{}", i)).unwrap();
            store.save_message(&id, "s1", "assistant", &format!("a{}", i)).unwrap();
        }
        store.save_message(&id, "s2", "user", "other session").unwrap();

        let window = store.get_history(&id, "s1", 4).unwrap();
        assert_eq!(window.len(), 4);
        // Oldest-first within the window, ending at the latest message.
        assert_eq!(window[3].content, "a4");
        assert_eq!(window[0].content, "a3");

        assert_eq!(store.clear_history(&id, "s1").unwrap(), 10);
        assert!(store.get_history(&id, "s1", 10).unwrap().is_empty());
        assert_eq!(store.get_history(&id, "s2", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_booking_lifecycle() {
        let (store, _dir) = test_store();
        let id = store.create_tenant("t", None).unwrap();

        let booking_id = store.create_booking(&id, &booking("Ravi Kumar", "9876543210")).unwrap();

        let loaded = store.get_booking(&booking_id).unwrap().unwrap();
        assert_eq!(loaded.full_name, "Ravi Kumar");
        assert_eq!(loaded.status, BookingStatus::Pending);

        assert!(store
            .update_booking_status(&booking_id, BookingStatus::Confirmed)
            .unwrap());
        let loaded = store.get_booking(&booking_id).unwrap().unwrap();
        assert_eq!(loaded.status, BookingStatus::Confirmed);
        assert!(loaded.updated_at.is_some());
    }

    #[test]
    fn test_bookings_by_phone_tolerates_formatting() {
        let (store, _dir) = test_store();
        let id = store.create_tenant("t", None).unwrap();
        store.create_booking(&id, &booking("Ravi", "9876543210")).unwrap();

        for query in ["9876543210", "+91 9876543210", "919876543210", "098-7654-3210"] {
            let found = store.bookings_by_phone(&id, query).unwrap();
            assert_eq!(found.len(), 1, "query {:?} should match", query);
        }
        assert!(store.bookings_by_phone(&id, "9999999999").unwrap().is_empty());
    }

    #[test]
    fn test_cancel_by_phone_flips_status_only() {
        let (store, _dir) = test_store();
        let id = store.create_tenant("t", None).unwrap();
        store.create_booking(&id, &booking("Ravi", "9876543210")).unwrap();

        assert_eq!(store.cancel_bookings_by_phone(&id, "9876543210").unwrap(), 1);
        // Already cancelled rows are not counted twice.
        assert_eq!(store.cancel_bookings_by_phone(&id, "9876543210").unwrap(), 0);

        let rows = store.bookings_by_phone(&id, "9876543210").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, BookingStatus::Cancelled);
    }

    #[test]
    fn test_update_booking_partial() {
        let (store, _dir) = test_store();
        let id = store.create_tenant("t", None).unwrap();
        let booking_id = store.create_booking(&id, &booking("Ravi", "9876543210")).unwrap();

        let update = BookingUpdate {
            preferred_time: Some("11:00 AM".to_string()),
            ..Default::default()
        };
        assert!(store.update_booking(&booking_id, &update).unwrap());

        let loaded = store.get_booking(&booking_id).unwrap().unwrap();
        assert_eq!(loaded.preferred_time, "11:00 AM");
        assert_eq!(loaded.preferred_date, "2025-09-01");

        assert!(!store.update_booking(&booking_id, &BookingUpdate::default()).unwrap());
    }

    #[test]
    fn test_list_bookings_status_filter() {
        let (store, _dir) = test_store();
        let id = store.create_tenant("t", None).unwrap();
        let b1 = store.create_booking(&id, &booking("A", "9876543210")).unwrap();
        store.create_booking(&id, &booking("B", "9123456789")).unwrap();
        store.update_booking_status(&b1, BookingStatus::Cancelled).unwrap();

        assert_eq!(store.list_bookings(&id, None).unwrap().len(), 2);
        let pending = store.list_bookings(&id, Some(BookingStatus::Pending)).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].full_name, "B");
    }
}
