use anchor_lang::prelude::*;

use crate::constants::*;
use crate::contexts::{
    ClaimTreasury, Initialize, Pause, SetAdmin, SetOracle, Unpause, UpdateConfig,
};
use crate::errors::PredictionError;
use crate::events::{
    AdminUpdated, BufferAndIntervalUpdated, MinBetAmountUpdated, OperatorUpdated,
    OracleUpdateAllowanceUpdated, OracleUpdated, Paused, TreasuryClaimed, TreasuryFeeUpdated,
    Unpaused,
};
use crate::state::Phase;
use crate::utils::vault_transfer;

#[allow(clippy::too_many_arguments)]
pub fn initialize(
    ctx: Context<Initialize>,
    admin: Pubkey,
    operator: Pubkey,
    interval_seconds: i64,
    buffer_seconds: i64,
    min_bet_amount: u64,
    oracle_update_allowance: i64,
    treasury_fee_bps: u16,
) -> Result<()> {
    crate::state::Config::validate_window(interval_seconds, buffer_seconds)?;
    require!(min_bet_amount > 0, PredictionError::InvalidMinBetAmount);
    require!(
        oracle_update_allowance > 0,
        PredictionError::InvalidUpdateAllowance
    );
    require!(
        treasury_fee_bps <= MAX_TREASURY_FEE_BPS,
        PredictionError::TreasuryFeeTooHigh
    );
    require!(
        admin != Pubkey::default() && operator != Pubkey::default(),
        PredictionError::ZeroAddress
    );
    ctx.accounts.price_feed.assert_published()?;

    let cfg = &mut ctx.accounts.config;
    cfg.owner = ctx.accounts.owner.key();
    cfg.admin = admin;
    cfg.operator = operator;
    cfg.oracle = ctx.accounts.price_feed.key();
    cfg.bump = ctx.bumps.config;
    cfg.vault_bump = ctx.bumps.vault;

    cfg.interval_seconds = interval_seconds;
    cfg.buffer_seconds = buffer_seconds;
    cfg.min_bet_amount = min_bet_amount;
    cfg.oracle_update_allowance = oracle_update_allowance;
    cfg.treasury_fee_bps = treasury_fee_bps;

    cfg.current_epoch = 0;
    cfg.oracle_latest_round_id = 0;
    cfg.treasury_amount = 0;
    cfg.phase = Phase::Uninitialized;
    cfg.paused = false;
    cfg.version = INITIAL_VERSION;

    Ok(())
}

/// Halts betting and round progression. Claims and refunds keep working so
/// users can always exit.
pub fn pause(ctx: Context<Pause>) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    cfg.assert_not_paused()?;
    let caller = ctx.accounts.caller.key();
    require!(
        caller == cfg.admin || caller == cfg.operator,
        PredictionError::NotAdminOrOperator
    );

    cfg.paused = true;
    emit!(Paused {
        epoch: cfg.current_epoch,
    });
    Ok(())
}

/// Resumes the protocol. Rounds restart through genesis, so any round left
/// in flight stays unserviced and falls through to the refund path.
pub fn unpause(ctx: Context<Unpause>) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require!(cfg.paused, PredictionError::NotPaused);
    cfg.assert_admin(&ctx.accounts.admin.key())?;

    cfg.paused = false;
    cfg.phase = Phase::Uninitialized;
    emit!(Unpaused {
        epoch: cfg.current_epoch,
    });
    Ok(())
}

/// Pays the accrued treasury out to the admin and resets the accumulator.
pub fn claim_treasury(ctx: Context<ClaimTreasury>) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    cfg.assert_admin(&ctx.accounts.admin.key())?;

    let amount = cfg.treasury_amount;
    cfg.treasury_amount = 0;

    if amount > 0 {
        vault_transfer(
            &ctx.accounts.vault.to_account_info(),
            &ctx.accounts.admin.to_account_info(),
            &ctx.accounts.system_program.to_account_info(),
            cfg.vault_bump,
            amount,
        )?;
    }

    emit!(TreasuryClaimed { amount });
    Ok(())
}

pub fn set_min_bet_amount(ctx: Context<UpdateConfig>, min_bet_amount: u64) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    cfg.assert_admin(&ctx.accounts.admin.key())?;
    require!(cfg.paused, PredictionError::NotPaused);
    require!(min_bet_amount > 0, PredictionError::InvalidMinBetAmount);

    let old = cfg.min_bet_amount;
    cfg.min_bet_amount = min_bet_amount;
    emit!(MinBetAmountUpdated {
        epoch: cfg.current_epoch,
        old_min_bet_amount: old,
        new_min_bet_amount: min_bet_amount,
    });
    Ok(())
}

pub fn set_buffer_and_interval_seconds(
    ctx: Context<UpdateConfig>,
    buffer_seconds: i64,
    interval_seconds: i64,
) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    cfg.assert_admin(&ctx.accounts.admin.key())?;
    require!(cfg.paused, PredictionError::NotPaused);
    crate::state::Config::validate_window(interval_seconds, buffer_seconds)?;

    let (old_buffer, old_interval) = (cfg.buffer_seconds, cfg.interval_seconds);
    cfg.buffer_seconds = buffer_seconds;
    cfg.interval_seconds = interval_seconds;
    emit!(BufferAndIntervalUpdated {
        old_buffer_seconds: old_buffer,
        new_buffer_seconds: buffer_seconds,
        old_interval_seconds: old_interval,
        new_interval_seconds: interval_seconds,
    });
    Ok(())
}

pub fn set_treasury_fee(ctx: Context<UpdateConfig>, treasury_fee_bps: u16) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    cfg.assert_admin(&ctx.accounts.admin.key())?;
    require!(cfg.paused, PredictionError::NotPaused);
    require!(
        treasury_fee_bps <= MAX_TREASURY_FEE_BPS,
        PredictionError::TreasuryFeeTooHigh
    );

    let old = cfg.treasury_fee_bps;
    cfg.treasury_fee_bps = treasury_fee_bps;
    emit!(TreasuryFeeUpdated {
        epoch: cfg.current_epoch,
        old_treasury_fee_bps: old,
        new_treasury_fee_bps: treasury_fee_bps,
    });
    Ok(())
}

pub fn set_oracle_update_allowance(
    ctx: Context<UpdateConfig>,
    oracle_update_allowance: i64,
) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    cfg.assert_admin(&ctx.accounts.admin.key())?;
    require!(cfg.paused, PredictionError::NotPaused);
    require!(
        oracle_update_allowance > 0,
        PredictionError::InvalidUpdateAllowance
    );

    let old = cfg.oracle_update_allowance;
    cfg.oracle_update_allowance = oracle_update_allowance;
    emit!(OracleUpdateAllowanceUpdated {
        old_oracle_update_allowance: old,
        new_oracle_update_allowance: oracle_update_allowance,
    });
    Ok(())
}

/// Operator handoff; allowed mid-round since it cannot corrupt a round.
pub fn set_operator(ctx: Context<UpdateConfig>, operator: Pubkey) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    cfg.assert_admin(&ctx.accounts.admin.key())?;
    require!(operator != Pubkey::default(), PredictionError::ZeroAddress);

    let old = cfg.operator;
    cfg.operator = operator;
    emit!(OperatorUpdated {
        old_operator: old,
        new_operator: operator,
    });
    Ok(())
}

/// Adopts a new feed after checking it has actually published something;
/// a feed with no rounds would brick the lock step.
pub fn set_oracle(ctx: Context<SetOracle>) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    cfg.assert_admin(&ctx.accounts.admin.key())?;

    let feed = &ctx.accounts.price_feed;
    feed.assert_published()?;

    let old = cfg.oracle;
    cfg.oracle = feed.key();
    // A fresh feed numbers its rounds from 1; restart the staleness guard.
    cfg.oracle_latest_round_id = 0;
    emit!(OracleUpdated {
        old_oracle: old,
        new_oracle: cfg.oracle,
    });
    Ok(())
}

pub fn set_admin(ctx: Context<SetAdmin>, admin: Pubkey) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.owner, ctx.accounts.owner.key(), PredictionError::NotOwner);
    require!(admin != Pubkey::default(), PredictionError::ZeroAddress);

    let old = cfg.admin;
    cfg.admin = admin;
    emit!(AdminUpdated {
        old_admin: old,
        new_admin: admin,
    });
    Ok(())
}
