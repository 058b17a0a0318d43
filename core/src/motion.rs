//! Wheel geometry and spin animation.
//!
//! Conventions:
//!   - The pointer is fixed at 12 o'clock.
//!   - Segment i spans [i*arc, (i+1)*arc) measured clockwise from the pointer,
//!     so its center sits at i*arc + arc/2.
//!   - After the wheel turns by θ, the pointer reads the segment that
//!     contains (-θ) mod 2π.
//!   - Rotation only ever grows: every spin ends at a larger angle than it began.

use serde::{Deserialize, Serialize};

use crate::{
    config::SpinTiming,
    rng::RandomSource,
    types::{PrizeIndex, Radians, TAU},
};

pub fn segment_arc(segments: usize) -> Radians {
    TAU / segments as f64
}

pub fn segment_center(index: PrizeIndex, segments: usize) -> Radians {
    let arc = segment_arc(segments);
    index as f64 * arc + arc / 2.0
}

/// Reduce an angle into [0, 2π).
pub fn normalize(angle: Radians) -> Radians {
    let r = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if r >= TAU { 0.0 } else { r }
}

/// Segment under the pointer once the wheel sits at `angle`.
pub fn segment_under_pointer(angle: Radians, segments: usize) -> PrizeIndex {
    let offset = normalize(-angle);
    let index = (offset / segment_arc(segments)).floor() as usize;
    index.min(segments.saturating_sub(1))
}

/// Final wheel angle that puts `win_index` (offset by `jitter`) under the
/// pointer after at least `full_turns` forward rotations from `current`.
pub fn target_angle(
    current: Radians,
    win_index: PrizeIndex,
    segments: usize,
    jitter: Radians,
    full_turns: f64,
) -> Radians {
    let desired = normalize(-(segment_center(win_index, segments) + jitter));
    let base = current + full_turns * TAU;
    let mut correction = desired - normalize(base);
    if correction < 0.0 {
        correction += TAU;
    }
    base + correction
}

/// Quintic ease-out: fast start, long smooth stop.
pub fn ease_out_quintic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(5)
}

/// The sampled, non-deterministic part of a spin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinParams {
    /// Offset from the segment center, strictly inside the segment.
    pub jitter:      Radians,
    pub full_turns:  f64,
    pub duration_ms: f64,
}

impl SpinParams {
    /// Land dead-center after exactly `full_turns` turns.
    pub fn centered(full_turns: f64, duration_ms: f64) -> Self {
        Self { jitter: 0.0, full_turns, duration_ms }
    }

    /// Draw jitter, turn count and duration, in that order, from the
    /// source's unit sampler.
    pub fn sample(timing: &SpinTiming, segments: usize, source: &mut dyn RandomSource) -> Self {
        let arc = segment_arc(segments);
        let jitter = (source.next_unit() - 0.5) * 2.0 * timing.jitter_fraction * arc;
        let full_turns = lerp(timing.min_full_turns, timing.max_full_turns, source.next_unit());
        let duration_ms = lerp(timing.min_duration_ms, timing.max_duration_ms, source.next_unit());
        Self { jitter, full_turns, duration_ms }
    }
}

fn lerp(min: f64, max: f64, u: f64) -> f64 {
    min + (max - min) * u
}

/// A spin's rotation as a pure function of time. The host samples it
/// once per frame; nothing here owns a timer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinAnimation {
    pub start:       Radians,
    pub target:      Radians,
    pub duration_ms: f64,
}

impl SpinAnimation {
    pub fn distance(&self) -> Radians {
        self.target - self.start
    }

    /// Angle at normalised time `t` in [0, 1].
    pub fn angle_at(&self, t: f64) -> Radians {
        self.start + self.distance() * ease_out_quintic(t)
    }

    /// Normalised time for `elapsed_ms`, clamped to [0, 1].
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn angle_at_elapsed(&self, elapsed_ms: f64) -> Radians {
        self.angle_at(self.progress(elapsed_ms))
    }

    pub fn is_complete(&self, elapsed_ms: f64) -> bool {
        self.progress(elapsed_ms) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_stays_in_half_open_range() {
        for angle in [-TAU, -1e-18, 0.0, TAU, 3.0 * TAU + 0.5, -7.25] {
            let n = normalize(angle);
            assert!((0.0..TAU).contains(&n), "normalize({angle}) = {n}");
        }
        assert!((normalize(-0.5) - (TAU - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn lerp_hits_both_ends() {
        assert_eq!(lerp(5.0, 8.0, 0.0), 5.0);
        assert_eq!(lerp(5.0, 8.0, 1.0), 8.0);
    }

    #[test]
    fn zero_duration_animation_is_complete_immediately() {
        let anim = SpinAnimation { start: 1.0, target: 4.0, duration_ms: 0.0 };
        assert!(anim.is_complete(0.0));
        assert_eq!(anim.angle_at_elapsed(0.0), 4.0);
    }
}
