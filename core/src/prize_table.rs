//! The prize table: ordered prizes with cumulative roll ranges.
//!
//! Built once at startup and never mutated. Ranges are 1-based,
//! inclusive, contiguous and in table order:
//!   prize i covers [range_min, range_max], range_max - range_min + 1 == weight.
//!
//! A weight sum other than 100 is a configuration warning, not an error.
//! The table is still built and rolls past the last range fall back
//! to index 0 in the drawer.

use serde::{Deserialize, Serialize};

use crate::{
    config::{DisplayMeta, PrizeConfig, WheelConfig},
    error::{WheelError, WheelResult},
    types::PrizeIndex,
};

/// The percentage space every table is expected to fill.
pub const FULL_WEIGHT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    pub name:      String,
    pub weight:    u32,
    pub range_min: u32,
    pub range_max: u32,
    pub display:   DisplayMeta,
}

impl Prize {
    pub fn contains(&self, roll: u32) -> bool {
        self.range_min <= roll && roll <= self.range_max
    }
}

/// Only constructible through `build`, so `legendary_index` is always in range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrizeTable {
    prizes:          Vec<Prize>,
    legendary_index: PrizeIndex,
    total_weight:    u32,
}

impl PrizeTable {
    pub fn build(descriptors: &[PrizeConfig], legendary_index: PrizeIndex) -> WheelResult<Self> {
        if descriptors.is_empty() {
            return Err(WheelError::Config { reason: "prize table is empty".into() });
        }
        if legendary_index >= descriptors.len() {
            return Err(WheelError::Config {
                reason: format!(
                    "legendary index {legendary_index} out of range for {} prizes",
                    descriptors.len()
                ),
            });
        }

        let mut cumulative = 0u32;
        let prizes: Vec<Prize> = descriptors
            .iter()
            .map(|d| {
                if d.weight == 0 {
                    log::warn!("prize '{}' has weight 0 and can never be drawn", d.name);
                }
                let range_min = cumulative + 1;
                cumulative = cumulative.saturating_add(d.weight);
                Prize {
                    name:      d.name.clone(),
                    weight:    d.weight,
                    range_min,
                    range_max: cumulative,
                    display:   d.display.clone(),
                }
            })
            .collect();

        if cumulative != FULL_WEIGHT {
            log::warn!("prize weights sum to {cumulative}, expected {FULL_WEIGHT}");
        }

        Ok(Self { prizes, legendary_index, total_weight: cumulative })
    }

    pub fn from_config(config: &WheelConfig) -> WheelResult<Self> {
        Self::build(&config.prizes, config.legendary_index)
    }

    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    pub fn get(&self, index: PrizeIndex) -> Option<&Prize> {
        self.prizes.get(index)
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn legendary_index(&self) -> PrizeIndex {
        self.legendary_index
    }

    pub fn legendary(&self) -> &Prize {
        &self.prizes[self.legendary_index]
    }

    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }

    pub fn is_fully_weighted(&self) -> bool {
        self.total_weight == FULL_WEIGHT
    }

    /// First prize whose range contains `roll`.
    pub fn index_for_roll(&self, roll: u32) -> Option<PrizeIndex> {
        self.prizes.iter().position(|p| p.contains(roll))
    }

    /// Range text for the debug readout, e.g. "26–30 (5%)".
    pub fn range_label(&self, index: PrizeIndex) -> Option<String> {
        self.prizes
            .get(index)
            .map(|p| format!("{}–{} ({}%)", p.range_min, p.range_max, p.weight))
    }
}
