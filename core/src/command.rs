use serde::{Deserialize, Serialize};

use crate::types::PrizeIndex;

/// All host-issued session commands.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum SessionCommand {
    // ── Spin flow ─────────────────────────────────
    Spin,
    Complete { index: PrizeIndex },
    Abandon,

    // ── Currency and shop ─────────────────────────
    GrantCoupons { amount: u32 },
    TopUp,
    ShopRedirect,

    // ── Host plumbing ─────────────────────────────
    GetState,
    Quit,
}
