use anchor_lang::prelude::*;

pub mod constants;
pub mod contexts;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

pub use constants::*;
pub use contexts::*;
pub use errors::*;
pub use events::*;
pub use instructions::*;
pub use state::*;
pub use utils::*;

use solana_security_txt::security_txt;

security_txt! {
    // Required fields
    name: "Bull/Bear Prediction",
    project_url: "https://github.com/prediction-labs/prediction",
    contacts: "link:https://github.com/prediction-labs/prediction/issues",
    policy: "https://github.com/prediction-labs/prediction/blob/main/SECURITY.md",

    // Optional fields
    preferred_languages: "en",
    source_code: "https://github.com/prediction-labs/prediction"
}

declare_id!("H3qPqHvi36uVLUXCaL3WVvMVgw7uAfG8KwFj3Zc2NTis");

#[program]
pub mod prediction {
    use super::*;
    use crate::instructions::{admin, bet, lifecycle, oracle};

    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        ctx: Context<Initialize>,
        admin_key: Pubkey,
        operator_key: Pubkey,
        interval_seconds: i64,
        buffer_seconds: i64,
        min_bet_amount: u64,
        oracle_update_allowance: i64,
        treasury_fee_bps: u16,
    ) -> Result<()> {
        admin::initialize(
            ctx,
            admin_key,
            operator_key,
            interval_seconds,
            buffer_seconds,
            min_bet_amount,
            oracle_update_allowance,
            treasury_fee_bps,
        )
    }

    // ----------------------------
    // Oracle feed
    // ----------------------------
    pub fn init_price_feed(ctx: Context<InitPriceFeed>, decimals: u8) -> Result<()> {
        oracle::init_price_feed(ctx, decimals)
    }

    pub fn publish_price(ctx: Context<PublishPrice>, answer: i64) -> Result<()> {
        oracle::publish_price(ctx, answer)
    }

    // ----------------------------
    // Round lifecycle (operator)
    // ----------------------------
    pub fn genesis_start_round(ctx: Context<GenesisStartRound>) -> Result<()> {
        lifecycle::genesis_start_round(ctx)
    }

    pub fn genesis_lock_round(ctx: Context<GenesisLockRound>) -> Result<()> {
        lifecycle::genesis_lock_round(ctx)
    }

    pub fn execute_round(ctx: Context<ExecuteRound>) -> Result<()> {
        lifecycle::execute_round(ctx)
    }

    // ----------------------------
    // Betting
    // ----------------------------
    pub fn bet_bull(ctx: Context<PlaceBet>, epoch: u64, amount: u64) -> Result<()> {
        bet::bet_bull(ctx, epoch, amount)
    }

    pub fn bet_bear(ctx: Context<PlaceBet>, epoch: u64, amount: u64) -> Result<()> {
        bet::bet_bear(ctx, epoch, amount)
    }

    // ----------------------------
    // Claims & treasury
    // ----------------------------
    pub fn claim<'info>(
        ctx: Context<'_, '_, 'info, 'info, Claim<'info>>,
        epochs: Vec<u64>,
    ) -> Result<()> {
        crate::instructions::claim::claim(ctx, epochs)
    }

    pub fn claim_treasury(ctx: Context<ClaimTreasury>) -> Result<()> {
        admin::claim_treasury(ctx)
    }

    // ----------------------------
    // Pause & configuration
    // ----------------------------
    pub fn pause(ctx: Context<Pause>) -> Result<()> {
        admin::pause(ctx)
    }

    pub fn unpause(ctx: Context<Unpause>) -> Result<()> {
        admin::unpause(ctx)
    }

    pub fn set_min_bet_amount(ctx: Context<UpdateConfig>, min_bet_amount: u64) -> Result<()> {
        admin::set_min_bet_amount(ctx, min_bet_amount)
    }

    pub fn set_buffer_and_interval_seconds(
        ctx: Context<UpdateConfig>,
        buffer_seconds: i64,
        interval_seconds: i64,
    ) -> Result<()> {
        admin::set_buffer_and_interval_seconds(ctx, buffer_seconds, interval_seconds)
    }

    pub fn set_treasury_fee(ctx: Context<UpdateConfig>, treasury_fee_bps: u16) -> Result<()> {
        admin::set_treasury_fee(ctx, treasury_fee_bps)
    }

    pub fn set_oracle_update_allowance(
        ctx: Context<UpdateConfig>,
        oracle_update_allowance: i64,
    ) -> Result<()> {
        admin::set_oracle_update_allowance(ctx, oracle_update_allowance)
    }

    pub fn set_operator(ctx: Context<UpdateConfig>, operator: Pubkey) -> Result<()> {
        admin::set_operator(ctx, operator)
    }

    pub fn set_oracle(ctx: Context<SetOracle>) -> Result<()> {
        admin::set_oracle(ctx)
    }

    pub fn set_admin(ctx: Context<SetAdmin>, admin: Pubkey) -> Result<()> {
        admin::set_admin(ctx, admin)
    }
}
