use anchor_lang::prelude::*;

use crate::state::Position;

#[event]
pub struct RoundStarted {
    pub epoch: u64,
}

#[event]
pub struct RoundLocked {
    pub epoch: u64,
    pub oracle_round_id: u64,
    pub price: i64,
}

#[event]
pub struct RoundEnded {
    pub epoch: u64,
    pub oracle_round_id: u64,
    pub price: i64,
}

#[event]
pub struct RewardsCalculated {
    pub epoch: u64,
    pub reward_base_cal_amount: u64,
    pub reward_amount: u64,
    pub treasury_cut: u64,
}

#[event]
pub struct BetPlaced {
    pub user: Pubkey,
    pub epoch: u64,
    pub position: Position,
    pub amount: u64,
}

#[event]
pub struct RewardClaimed {
    pub user: Pubkey,
    pub epoch: u64,
    pub amount: u64,
}

#[event]
pub struct TreasuryClaimed {
    pub amount: u64,
}

#[event]
pub struct Paused {
    pub epoch: u64,
}

#[event]
pub struct Unpaused {
    pub epoch: u64,
}

#[event]
pub struct MinBetAmountUpdated {
    pub epoch: u64,
    pub old_min_bet_amount: u64,
    pub new_min_bet_amount: u64,
}

#[event]
pub struct BufferAndIntervalUpdated {
    pub old_buffer_seconds: i64,
    pub new_buffer_seconds: i64,
    pub old_interval_seconds: i64,
    pub new_interval_seconds: i64,
}

#[event]
pub struct TreasuryFeeUpdated {
    pub epoch: u64,
    pub old_treasury_fee_bps: u16,
    pub new_treasury_fee_bps: u16,
}

#[event]
pub struct OracleUpdateAllowanceUpdated {
    pub old_oracle_update_allowance: i64,
    pub new_oracle_update_allowance: i64,
}

#[event]
pub struct OperatorUpdated {
    pub old_operator: Pubkey,
    pub new_operator: Pubkey,
}

#[event]
pub struct OracleUpdated {
    pub old_oracle: Pubkey,
    pub new_oracle: Pubkey,
}

#[event]
pub struct AdminUpdated {
    pub old_admin: Pubkey,
    pub new_admin: Pubkey,
}

#[event]
pub struct PricePublished {
    pub feed: Pubkey,
    pub round_id: u64,
    pub answer: i64,
    pub updated_at: i64,
}
