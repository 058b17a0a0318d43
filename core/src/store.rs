//! SQLite analytics event log.
//!
//! RULE: Only store.rs talks to the database.
//! The log is write-mostly telemetry; spin state is never read back from it.

use std::any::Any;

use rusqlite::{params, Connection};

use crate::{
    error::WheelResult,
    event::{EventLogEntry, WheelEvent},
    sink::AnalyticsSink,
};

pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    /// Open (or create) the event database at `path`.
    pub fn open(path: &str) -> WheelResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> WheelResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> WheelResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_event_log.sql"))?;
        Ok(())
    }

    // ── Session ────────────────────────────────────────────────

    pub fn insert_session(&self, session_id: &str, seed: Option<u64>, version: &str) -> WheelResult<()> {
        self.conn.execute(
            "INSERT INTO session (session_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                session_id,
                seed.map(|s| s as i64),
                version,
                chrono::Utc::now().timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> WheelResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (session_id, spin, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.session_id,
                entry.spin as i64,
                entry.event_type,
                entry.payload,
                entry.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn events_for_session(&self, session_id: &str) -> WheelResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, spin, event_type, payload, created_at
             FROM event_log WHERE session_id = ?1
             ORDER BY id ASC"
        )?;
        let entries = stmt.query_map(params![session_id], |row| {
            Ok(EventLogEntry {
                id:         Some(row.get(0)?),
                session_id: row.get(1)?,
                spin:       row.get::<_, i64>(2)? as u64,
                event_type: row.get(3)?,
                payload:    row.get(4)?,
                created_at: row.get(5)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, session_id: &str, event_type: &str) -> WheelResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE session_id = ?1 AND event_type = ?2",
            params![session_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl AnalyticsSink for EventStore {
    fn name(&self) -> &'static str { "sqlite" }

    fn record(&mut self, session_id: &str, spin: u64, event: &WheelEvent) -> WheelResult<()> {
        let entry = EventLogEntry::new(session_id, spin, event)?;
        self.append_event(&entry)
    }

    fn as_any(&self) -> &dyn Any { self }
}
