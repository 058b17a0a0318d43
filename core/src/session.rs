//! A player session: one SpinState plus the collaborators it needs.
//!
//! The session is the layer that owns state, picks the random source
//! and forwards events to analytics. Sessions never share anything but
//! the immutable engine.

use std::{any::Any, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::WheelConfig,
    engine::{SpinAttempt, SpinEngine},
    error::WheelResult,
    event::WheelEvent,
    motion::SpinParams,
    prize_table::Prize,
    rng::RandomSource,
    sink::AnalyticsSink,
    state::SpinState,
    types::{PrizeIndex, Radians, SessionId},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub started_at:  DateTime<Utc>,
    pub total_spins: u64,
    pub pity_wins:   u64,
    pub rejected:    u64,
}

impl SessionStats {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self { started_at, total_spins: 0, pity_wins: 0, rejected: 0 }
    }

    /// Average spin rate since the session opened. Zero until time passes.
    pub fn spins_per_minute(&self, now: DateTime<Utc>) -> f64 {
        let elapsed_ms = (now - self.started_at).num_milliseconds();
        if elapsed_ms <= 0 {
            return 0.0;
        }
        self.total_spins as f64 / (elapsed_ms as f64 / 60_000.0)
    }
}

/// What a host needs to redraw its counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id:       SessionId,
    pub coupons:          u32,
    pub pity_count:       u32,
    pub pity_threshold:   u32,
    pub pity_progress:    f64,
    pub pity_ready:       bool,
    pub current_angle:    Radians,
    pub total_spins:      u64,
    pub spinning:         bool,
    pub spins_per_minute: f64,
}

pub struct SpinSession {
    id:            SessionId,
    engine:        Arc<SpinEngine>,
    state:         SpinState,
    source:        Box<dyn RandomSource>,
    sink:          Box<dyn AnalyticsSink>,
    stats:         SessionStats,
    top_up_amount: u32,
}

impl SpinSession {
    pub fn generate_id() -> SessionId {
        Uuid::new_v4().to_string()
    }

    /// Open a session and announce it to analytics.
    pub fn open(
        id: SessionId,
        engine: Arc<SpinEngine>,
        initial_coupons: u32,
        source: Box<dyn RandomSource>,
        sink: Box<dyn AnalyticsSink>,
    ) -> Self {
        let mut session = Self {
            id,
            engine,
            state: SpinState::new(initial_coupons),
            source,
            sink,
            stats: SessionStats::new(Utc::now()),
            top_up_amount: crate::config::DEFAULT_TOP_UP_AMOUNT,
        };
        log::info!(
            "session {} opened: coupons={initial_coupons} sink={}",
            session.id,
            session.sink.name()
        );
        session.emit(WheelEvent::SessionStarted {
            session_id: session.id.clone(),
            coupons:    initial_coupons,
        });
        session
    }

    /// Build the engine from `config` and open a fresh session on it.
    pub fn from_config(
        config: &WheelConfig,
        source: Box<dyn RandomSource>,
        sink: Box<dyn AnalyticsSink>,
    ) -> WheelResult<Self> {
        let engine = Arc::new(SpinEngine::from_config(config)?);
        let session = Self::open(Self::generate_id(), engine, config.initial_coupons, source, sink)
            .with_top_up_amount(config.top_up_amount);
        Ok(session)
    }

    pub fn with_top_up_amount(mut self, amount: u32) -> Self {
        self.top_up_amount = amount;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn engine(&self) -> &SpinEngine {
        &self.engine
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn sink(&self) -> &dyn AnalyticsSink {
        self.sink.as_ref()
    }

    /// Downcast the sink. For tests and tooling only.
    pub fn sink_as<T: Any>(&self) -> Option<&T> {
        self.sink.as_any().downcast_ref::<T>()
    }

    // ── Spins ──────────────────────────────────────────────────

    pub fn spin(&mut self) -> SpinAttempt {
        let attempt = self.engine.spin(&mut self.state, self.source.as_mut());
        self.after_attempt(&attempt);
        attempt
    }

    pub fn spin_with(&mut self, params: SpinParams) -> SpinAttempt {
        let attempt = self.engine.spin_with(&mut self.state, self.source.as_mut(), params);
        self.after_attempt(&attempt);
        attempt
    }

    fn after_attempt(&mut self, attempt: &SpinAttempt) {
        match attempt {
            SpinAttempt::Rejected { reason } => {
                self.stats.rejected += 1;
                log::debug!("session {} spin rejected: {}", self.id, reason.as_str());
                self.emit(WheelEvent::SpinRejected {
                    reason:  reason.as_str().to_string(),
                    coupons: self.state.coupons(),
                });
            }
            SpinAttempt::Accepted(outcome) => {
                self.stats.total_spins = outcome.spin_number;
                self.emit(WheelEvent::SpinStarted {
                    spin_number:  outcome.spin_number,
                    coupons_left: outcome.coupons_left,
                });
                self.emit(outcome.resolved_event());
                if outcome.forced {
                    self.stats.pity_wins += 1;
                    self.emit(WheelEvent::PityWin {
                        spin_number:    outcome.spin_number,
                        pity_threshold: self.engine.pity().threshold(),
                    });
                }
            }
        }
    }

    /// Host callback once the animation reaches t >= 1.
    pub fn finish_spin(&mut self, win_index: PrizeIndex) -> WheelResult<Prize> {
        let pity_win = self.state.in_flight().map(|s| s.forced).unwrap_or(false);
        let prize = self.engine.complete_spin(&mut self.state, win_index)?.clone();
        self.emit(WheelEvent::PrizeReceived {
            prize: prize.name.clone(),
            pity_win,
        });
        Ok(prize)
    }

    /// Release an in-flight spin without revealing its prize.
    pub fn abandon(&mut self) {
        if let Some(spin) = self.engine.abandon_spin(&mut self.state) {
            log::info!("session {} abandoned spin {} mid-animation", self.id, spin.spin_number);
        }
    }

    // ── Currency ───────────────────────────────────────────────

    pub fn grant_coupons(&mut self, amount: u32) -> u32 {
        let balance = self.state.grant_coupons(amount);
        self.emit(WheelEvent::CouponsGranted { amount, balance });
        balance
    }

    /// Grant the configured top-up bundle.
    pub fn top_up(&mut self) -> u32 {
        self.grant_coupons(self.top_up_amount)
    }

    pub fn consume_coupon(&mut self) -> bool {
        self.state.consume_coupon()
    }

    pub fn shop_redirect(&mut self) {
        self.emit(WheelEvent::ShopRedirect);
    }

    // ── Reporting ──────────────────────────────────────────────

    pub fn pity_progress(&self) -> f64 {
        self.engine.pity().progress(self.state.pity_count())
    }

    pub fn view(&self, now: DateTime<Utc>) -> SessionView {
        let pity = self.engine.pity();
        SessionView {
            session_id:       self.id.clone(),
            coupons:          self.state.coupons(),
            pity_count:       self.state.pity_count(),
            pity_threshold:   pity.threshold(),
            pity_progress:    pity.progress(self.state.pity_count()),
            pity_ready:       pity.is_ready(self.state.pity_count()),
            current_angle:    self.state.current_angle(),
            total_spins:      self.state.total_spins(),
            spinning:         self.state.is_spinning(),
            spins_per_minute: self.stats.spins_per_minute(now),
        }
    }

    fn emit(&mut self, event: WheelEvent) {
        let spin = self.state.total_spins();
        if let Err(e) = self.sink.record(&self.id, spin, &event) {
            log::warn!(
                "session {} dropped {} event via {} sink: {e}",
                self.id,
                event.type_name(),
                self.sink.name()
            );
        }
    }
}
