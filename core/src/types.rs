//! Shared primitive types used across the wheel engine.

/// Position of a prize in the table, and of its segment on the wheel.
pub type PrizeIndex = usize;

/// Wheel rotation in radians. Grows without bound across spins.
pub type Radians = f64;

/// The canonical session identifier (UUID v4 string).
pub type SessionId = String;

/// One full turn of the wheel.
pub const TAU: Radians = std::f64::consts::TAU;
