//! Weighted draw over the prize table.

use serde::{Deserialize, Serialize};

use crate::{prize_table::PrizeTable, rng::RandomSource, types::PrizeIndex};

/// Index returned when a roll matches no range (malformed table).
pub const FALLBACK_INDEX: PrizeIndex = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub roll:  u32,
    pub index: PrizeIndex,
}

/// Roll 1–100 and map it to a prize. Never fails: an uncovered roll
/// lands on FALLBACK_INDEX.
pub fn draw(table: &PrizeTable, source: &mut dyn RandomSource) -> Draw {
    let roll = source.roll_percent();
    Draw { roll, index: index_for(table, roll) }
}

/// The deterministic half of `draw`.
pub fn index_for(table: &PrizeTable, roll: u32) -> PrizeIndex {
    match table.index_for_roll(roll) {
        Some(index) => index,
        None => {
            log::warn!(
                "roll {roll} matched no prize range (weights total {}); falling back to index {FALLBACK_INDEX}",
                table.total_weight()
            );
            FALLBACK_INDEX
        }
    }
}
