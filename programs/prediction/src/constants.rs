// Centralized protocol constants

// -----------------
// PDA seeds
// -----------------
pub const CONFIG_SEED: &[u8] = b"config_v1";
pub const VAULT_SEED: &[u8] = b"vault_v1";
pub const ROUND_SEED: &[u8] = b"round_v1";
pub const BET_SEED: &[u8] = b"bet_v1";
pub const USER_ROUNDS_SEED: &[u8] = b"user_rounds_v1";
pub const PRICE_FEED_SEED: &[u8] = b"price_feed_v1";

// -----------------
// Protocol limits
// -----------------

/// Basis point denominator: 10_000 bps = 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Hard cap on the treasury fee (basis points). 1000 = 10%.
pub const MAX_TREASURY_FEE_BPS: u16 = 1_000;

/// Maximum number of epochs a single claim call may settle.
/// Bounds compute units and remaining-account parsing per transaction.
pub const MAX_CLAIM_EPOCHS: usize = 16;

/// Capacity of the per-user round history account.
/// Fixed so the account size stays deterministic; readers page through it
/// with a cursor, never in one shot.
pub const MAX_USER_HISTORY: usize = 512;

/// Initial version for account structures.
pub const INITIAL_VERSION: u16 = 1;
