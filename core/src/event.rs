//! Analytics events emitted by a session.
//!
//! RULE: The engine only emits events; it never waits on their delivery.
//! Variants are appended, never removed or reordered.

use serde::{Deserialize, Serialize};

use crate::{
    pity::Roll,
    types::{PrizeIndex, SessionId},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WheelEvent {
    // ── Session lifecycle ──────────────────────────
    SessionStarted {
        session_id: SessionId,
        coupons:    u32,
    },

    // ── Spin flow ──────────────────────────────────
    SpinStarted {
        spin_number:  u64,
        coupons_left: u32,
    },
    /// The outcome event handed to the renderer and analytics.
    SpinResolved {
        roll:              Roll,
        index:             PrizeIndex,
        prize_name:        String,
        is_pity_win:       bool,
        pity_count_after:  u32,
        total_spins_after: u64,
    },
    PityWin {
        spin_number:    u64,
        pity_threshold: u32,
    },
    SpinRejected {
        reason:  String,
        coupons: u32,
    },
    PrizeReceived {
        prize:    String,
        pity_win: bool,
    },

    // ── Currency and shop ──────────────────────────
    CouponsGranted {
        amount:  u32,
        balance: u32,
    },
    ShopRedirect,
}

impl WheelEvent {
    /// Stable name, used for the event_type column and log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. } => "session_started",
            Self::SpinStarted { .. }    => "spin_started",
            Self::SpinResolved { .. }   => "spin_resolved",
            Self::PityWin { .. }        => "pity_win",
            Self::SpinRejected { .. }   => "spin_rejected",
            Self::PrizeReceived { .. }  => "prize_received",
            Self::CouponsGranted { .. } => "coupons_granted",
            Self::ShopRedirect          => "shop_redirect",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub session_id: SessionId,
    /// Spins taken in the session when the event fired.
    pub spin:       u64,
    pub event_type: String,
    pub payload:    String, // JSON-serialized WheelEvent
    pub created_at: i64,    // unix millis, UTC
}

impl EventLogEntry {
    pub fn new(session_id: &str, spin: u64, event: &WheelEvent) -> serde_json::Result<Self> {
        Ok(Self {
            id:         None,
            session_id: session_id.to_string(),
            spin,
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(event)?,
            created_at: chrono::Utc::now().timestamp_millis(),
        })
    }

    pub fn event(&self) -> serde_json::Result<WheelEvent> {
        serde_json::from_str(&self.payload)
    }
}
