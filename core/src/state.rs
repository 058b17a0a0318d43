//! Per-session mutable spin state.
//!
//! Owned by the session layer and passed by reference into the engine.
//! The engine mutates only the fields below; it owns nothing else.

use serde::{Deserialize, Serialize};

use crate::{
    motion::SpinAnimation,
    types::{PrizeIndex, Radians},
};

/// A spin that has been resolved but whose animation has not finished.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InFlightSpin {
    pub spin_number: u64,
    pub index:       PrizeIndex,
    pub forced:      bool,
    pub animation:   SpinAnimation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinState {
    coupons:       u32,
    pity_count:    u32,
    current_angle: Radians,
    total_spins:   u64,
    in_flight:     Option<InFlightSpin>,
}

impl SpinState {
    pub fn new(coupons: u32) -> Self {
        Self { coupons, ..Self::default() }
    }

    pub fn coupons(&self) -> u32 {
        self.coupons
    }

    pub fn pity_count(&self) -> u32 {
        self.pity_count
    }

    pub fn current_angle(&self) -> Radians {
        self.current_angle
    }

    pub fn total_spins(&self) -> u64 {
        self.total_spins
    }

    pub fn in_flight(&self) -> Option<&InFlightSpin> {
        self.in_flight.as_ref()
    }

    pub fn is_spinning(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Top up the balance. Returns the new balance.
    pub fn grant_coupons(&mut self, amount: u32) -> u32 {
        self.coupons = self.coupons.saturating_add(amount);
        self.coupons
    }

    /// Spend one coupon. Returns false, leaving the balance at zero,
    /// when there is nothing to spend.
    pub fn consume_coupon(&mut self) -> bool {
        if self.coupons == 0 {
            return false;
        }
        self.coupons -= 1;
        true
    }

    /// Start the pity counter somewhere other than zero, e.g. when a host
    /// restores a counter it tracked itself.
    pub fn with_pity_count(mut self, pity_count: u32) -> Self {
        self.pity_count = pity_count;
        self
    }

    pub fn with_angle(mut self, angle: Radians) -> Self {
        self.current_angle = angle;
        self
    }

    // ── Engine-only mutation ──────────────────────────────────

    pub(crate) fn begin_spin(&mut self, spin: InFlightSpin, pity_count: u32) {
        self.total_spins = spin.spin_number;
        self.pity_count = pity_count;
        self.in_flight = Some(spin);
    }

    pub(crate) fn finish_spin(&mut self) -> Option<InFlightSpin> {
        let spin = self.in_flight.take()?;
        self.current_angle = spin.animation.target;
        Some(spin)
    }

    /// Drop the in-flight marker without moving the wheel.
    pub(crate) fn release(&mut self) -> Option<InFlightSpin> {
        self.in_flight.take()
    }
}
