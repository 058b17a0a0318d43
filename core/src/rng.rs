//! Random sources for the wheel.
//!
//! RULE: Nothing in the engine may call a platform RNG directly.
//! Every draw and every animation sample flows through a RandomSource
//! handed in by the caller, so tests and replays can pin the outcome.
//!
//! SeededSource keeps two streams derived from one master seed:
//!   - the draw stream feeds prize rolls only,
//!   - the motion stream feeds jitter, turn count and duration.
//! Changing how an animation is sampled never shifts the prize sequence.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// The two samplers the engine needs.
pub trait RandomSource: Send {
    /// Uniform integer in [1, 100].
    fn roll_percent(&mut self) -> u32;

    /// Uniform float in [0.0, 1.0).
    fn next_unit(&mut self) -> f64;
}

/// Stable stream slots.
/// NEVER reorder: reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Draw = 0,
    Motion = 1,
}

fn stream(master_seed: u64, slot: StreamSlot) -> Pcg64Mcg {
    let derived_seed = master_seed ^ (slot as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    Pcg64Mcg::seed_from_u64(derived_seed)
}

/// Deterministic PCG-backed source.
pub struct SeededSource {
    seed: u64,
    draw: Pcg64Mcg,
    motion: Pcg64Mcg,
}

impl SeededSource {
    pub fn new(master_seed: u64) -> Self {
        Self {
            seed: master_seed,
            draw: stream(master_seed, StreamSlot::Draw),
            motion: stream(master_seed, StreamSlot::Motion),
        }
    }

    /// Seed from the OS entropy pool. For live sessions only.
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().next_u64())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededSource {
    fn roll_percent(&mut self) -> u32 {
        self.draw.gen_range(1..=100)
    }

    fn next_unit(&mut self) -> f64 {
        let bits = self.motion.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Replays fixed sequences of rolls and unit samples, cycling when a
/// sequence runs out. An empty roll sequence yields 1, an empty unit
/// sequence yields 0.5 (no jitter, mid-range turns and duration).
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    rolls: Vec<u32>,
    units: Vec<f64>,
    rolls_drawn: usize,
    units_drawn: usize,
}

impl ScriptedSource {
    pub fn new(rolls: Vec<u32>, units: Vec<f64>) -> Self {
        Self { rolls, units, rolls_drawn: 0, units_drawn: 0 }
    }

    pub fn with_rolls(rolls: Vec<u32>) -> Self {
        Self::new(rolls, Vec::new())
    }

    /// How many integer rolls have been consumed so far.
    pub fn rolls_drawn(&self) -> usize {
        self.rolls_drawn
    }

    pub fn units_drawn(&self) -> usize {
        self.units_drawn
    }
}

impl RandomSource for ScriptedSource {
    fn roll_percent(&mut self) -> u32 {
        let roll = if self.rolls.is_empty() {
            1
        } else {
            self.rolls[self.rolls_drawn % self.rolls.len()]
        };
        self.rolls_drawn += 1;
        roll
    }

    fn next_unit(&mut self) -> f64 {
        let unit = if self.units.is_empty() {
            0.5
        } else {
            self.units[self.units_drawn % self.units.len()]
        };
        self.units_drawn += 1;
        unit
    }
}
