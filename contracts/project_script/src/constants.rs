//! Protocol constants shared with the companion validators.

/// Fixed-point denominator for share ratios (six decimal digits).
pub const RATIO_MULTIPLIER: i128 = 1_000_000;

/// Smallest ada amount worth a treasury UTxO of its own. Smaller staking
/// rewards are collected into an existing treasury UTxO instead.
pub const TREASURY_UTXO_MIN_ADA: i128 = 2_000_000;

/// Transaction-fee discount, in cents, granted to a third party closing the
/// project-script record on the owner's behalf.
pub const PROJECT_SCRIPT_CLOSE_DISCOUNT_CENTS: i128 = 50;
pub const PROJECT_SCRIPT_DELIST_DISCOUNT_CENTS: i128 = 50;

// ── Token names ───────────────────────────────────────────────────────

pub const PROJECT_AT_TOKEN_NAME: &[u8] = b"project";
pub const PROJECT_DETAIL_AT_TOKEN_NAME: &[u8] = b"project-detail";
pub const PROJECT_SCRIPT_AT_TOKEN_NAME: &[u8] = b"project-script";
pub const PROTOCOL_PARAMS_NFT_TOKEN_NAME: &[u8] = b"params";
