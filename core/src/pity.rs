//! Pity timer: forces the legendary prize after too many misses.
//!
//! `resolve` is a pure decision. The counter update lives in `advance`
//! and is applied by the engine after resolution:
//!   1. pity_count += 1 (every resolved spin)
//!   2. pity_count = 0  (if the resolved index is legendary, forced or natural)

use serde::{Deserialize, Serialize};

use crate::{
    drawer,
    prize_table::PrizeTable,
    rng::RandomSource,
    types::PrizeIndex,
};

/// The roll behind a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roll {
    Drawn(u32),
    /// Pity fired; no random draw happened.
    Forced,
}

pub const FORCED_MARKER: &str = "—";

impl Roll {
    pub fn value(&self) -> Option<u32> {
        match self {
            Self::Drawn(r) => Some(*r),
            Self::Forced => None,
        }
    }
}

impl std::fmt::Display for Roll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Drawn(r) => write!(f, "{r}"),
            Self::Forced => f.write_str(FORCED_MARKER),
        }
    }
}

// Serialized as the number, or the forced marker string.
impl Serialize for Roll {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Drawn(r) => serializer.serialize_u32(*r),
            Self::Forced => serializer.serialize_str(FORCED_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for Roll {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Marker(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(r) => Ok(Self::Drawn(r)),
            Raw::Marker(m) if m == FORCED_MARKER => Ok(Self::Forced),
            Raw::Marker(m) => Err(serde::de::Error::custom(format!("unknown roll marker '{m}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub index:  PrizeIndex,
    pub roll:   Roll,
    pub forced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityTracker {
    threshold:       u32,
    legendary_index: PrizeIndex,
}

impl PityTracker {
    pub fn new(threshold: u32, legendary_index: PrizeIndex) -> Self {
        Self { threshold, legendary_index }
    }

    pub fn for_table(table: &PrizeTable, threshold: u32) -> Self {
        Self::new(threshold, table.legendary_index())
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn legendary_index(&self) -> PrizeIndex {
        self.legendary_index
    }

    /// Decide the winning index. The random source is untouched when
    /// the pity timer fires.
    pub fn resolve(
        &self,
        table: &PrizeTable,
        pity_count: u32,
        source: &mut dyn RandomSource,
    ) -> Resolution {
        if self.is_ready(pity_count) {
            return Resolution {
                index:  self.legendary_index,
                roll:   Roll::Forced,
                forced: true,
            };
        }
        let draw = drawer::draw(table, source);
        Resolution {
            index:  draw.index,
            roll:   Roll::Drawn(draw.roll),
            forced: false,
        }
    }

    /// Counter value after a spin resolved to `index`.
    pub fn advance(&self, pity_count: u32, index: PrizeIndex) -> u32 {
        let next = pity_count.saturating_add(1);
        if index == self.legendary_index { 0 } else { next }
    }

    pub fn is_ready(&self, pity_count: u32) -> bool {
        pity_count >= self.threshold
    }

    /// Fill fraction of the pity bar, clamped to [0, 1].
    pub fn progress(&self, pity_count: u32) -> f64 {
        if self.threshold == 0 {
            return 1.0;
        }
        (pity_count as f64 / self.threshold as f64).min(1.0)
    }
}
