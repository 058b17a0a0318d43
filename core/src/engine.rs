//! The spin engine: the heart of the prize wheel.
//!
//! ONE SPIN, IN ORDER:
//!   1. Eligibility: no spin in flight, at least one coupon.
//!   2. Resolution: pity tracker forces legendary or defers to the drawer.
//!   3. Bookkeeping: coupon spent, total_spins and pity counter advanced.
//!   4. Geometry: target angle computed, animation handed to the host.
//!   5. Completion: host reports the animation finished; angle committed,
//!      single-flight marker cleared.
//!
//! RULES:
//!   - Rejected spins mutate nothing.
//!   - All randomness flows through the caller's RandomSource.
//!   - The engine is immutable; sessions share it through Arc.

use serde::{Deserialize, Serialize};

use crate::{
    config::{SpinTiming, WheelConfig},
    error::{WheelError, WheelResult},
    event::WheelEvent,
    motion::{self, SpinAnimation, SpinParams},
    pity::{PityTracker, Resolution, Roll},
    prize_table::{Prize, PrizeTable},
    rng::RandomSource,
    state::{InFlightSpin, SpinState},
    types::{PrizeIndex, Radians},
};

/// Why a spin request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ineligible {
    NoCoupons,
    SpinInFlight,
}

impl Ineligible {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCoupons    => "no_coupons",
            Self::SpinInFlight => "spin_in_flight",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub spin_number:    u64,
    pub index:          PrizeIndex,
    pub prize_name:     String,
    pub roll:           Roll,
    pub forced:         bool,
    pub new_pity_count: u32,
    pub coupons_left:   u32,
    pub start_angle:    Radians,
    pub target_angle:   Radians,
    pub duration_ms:    f64,
}

impl SpinOutcome {
    pub fn animation(&self) -> SpinAnimation {
        SpinAnimation {
            start:       self.start_angle,
            target:      self.target_angle,
            duration_ms: self.duration_ms,
        }
    }

    /// The outcome event for the renderer and analytics.
    pub fn resolved_event(&self) -> WheelEvent {
        WheelEvent::SpinResolved {
            roll:              self.roll,
            index:             self.index,
            prize_name:        self.prize_name.clone(),
            is_pity_win:       self.forced,
            pity_count_after:  self.new_pity_count,
            total_spins_after: self.spin_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SpinAttempt {
    Accepted(SpinOutcome),
    Rejected { reason: Ineligible },
}

impl SpinAttempt {
    pub fn outcome(&self) -> Option<&SpinOutcome> {
        match self {
            Self::Accepted(outcome) => Some(outcome),
            Self::Rejected { .. } => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

#[derive(Debug, Clone)]
pub struct SpinEngine {
    table:  PrizeTable,
    pity:   PityTracker,
    timing: SpinTiming,
}

impl SpinEngine {
    /// Fails when `timing` could move the wheel backwards or land on a divider.
    pub fn new(table: PrizeTable, pity_threshold: u32, timing: SpinTiming) -> WheelResult<Self> {
        timing.validate()?;
        let pity = PityTracker::for_table(&table, pity_threshold);
        Ok(Self { table, pity, timing })
    }

    pub fn from_config(config: &WheelConfig) -> WheelResult<Self> {
        let table = PrizeTable::from_config(config)?;
        Self::new(table, config.pity_threshold, config.timing)
    }

    pub fn table(&self) -> &PrizeTable {
        &self.table
    }

    pub fn pity(&self) -> &PityTracker {
        &self.pity
    }

    pub fn check_eligible(&self, state: &SpinState) -> Result<(), Ineligible> {
        if state.is_spinning() {
            return Err(Ineligible::SpinInFlight);
        }
        if state.coupons() == 0 {
            return Err(Ineligible::NoCoupons);
        }
        Ok(())
    }

    /// Resolve one spin and sample its animation from `source`.
    pub fn spin(&self, state: &mut SpinState, source: &mut dyn RandomSource) -> SpinAttempt {
        if let Err(reason) = self.check_eligible(state) {
            return SpinAttempt::Rejected { reason };
        }
        let resolution = self.pity.resolve(&self.table, state.pity_count(), source);
        let params = SpinParams::sample(&self.timing, self.table.len(), source);
        self.accept(state, resolution, params)
    }

    /// As `spin`, with the animation parameters supplied by the caller.
    /// The source is only consulted for the prize roll.
    pub fn spin_with(
        &self,
        state: &mut SpinState,
        source: &mut dyn RandomSource,
        params: SpinParams,
    ) -> SpinAttempt {
        if let Err(reason) = self.check_eligible(state) {
            return SpinAttempt::Rejected { reason };
        }
        let resolution = self.pity.resolve(&self.table, state.pity_count(), source);
        self.accept(state, resolution, params)
    }

    fn accept(&self, state: &mut SpinState, resolution: Resolution, params: SpinParams) -> SpinAttempt {
        let Resolution { index, roll, forced } = resolution;

        // Eligibility was checked by the caller, so a coupon is available.
        if !state.consume_coupon() {
            return SpinAttempt::Rejected { reason: Ineligible::NoCoupons };
        }
        let spin_number = state.total_spins() + 1;
        let new_pity_count = self.pity.advance(state.pity_count(), index);

        let start_angle = state.current_angle();
        let target_angle = motion::target_angle(
            start_angle,
            index,
            self.table.len(),
            params.jitter,
            params.full_turns,
        );
        let animation = SpinAnimation {
            start:       start_angle,
            target:      target_angle,
            duration_ms: params.duration_ms,
        };

        state.begin_spin(
            InFlightSpin { spin_number, index, forced, animation },
            new_pity_count,
        );

        let prize_name = self
            .table
            .get(index)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        let range = self.table.range_label(index).unwrap_or_default();
        log::debug!(
            "spin={spin_number} number={roll} range={range} result={prize_name}{} pity={new_pity_count}/{}",
            if forced { " (pity win)" } else { "" },
            self.pity.threshold(),
        );

        SpinAttempt::Accepted(SpinOutcome {
            spin_number,
            index,
            prize_name,
            roll,
            forced,
            new_pity_count,
            coupons_left: state.coupons(),
            start_angle,
            target_angle,
            duration_ms: params.duration_ms,
        })
    }

    /// Called by the host once the animation reaches t >= 1.
    pub fn complete_spin(&self, state: &mut SpinState, win_index: PrizeIndex) -> WheelResult<&Prize> {
        let spin = state.in_flight().copied().ok_or(WheelError::NoSpinInFlight)?;
        if spin.index != win_index {
            return Err(WheelError::SpinMismatch { expected: spin.index, actual: win_index });
        }
        state.finish_spin();
        self.table.get(win_index).ok_or_else(|| WheelError::Config {
            reason: format!("resolved index {win_index} is outside the prize table"),
        })
    }

    /// Release the single-flight marker of a session being torn down.
    /// The wheel angle is left where it was.
    pub fn abandon_spin(&self, state: &mut SpinState) -> Option<InFlightSpin> {
        state.release()
    }
}
