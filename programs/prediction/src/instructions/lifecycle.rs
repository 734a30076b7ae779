use anchor_lang::prelude::*;

use crate::contexts::{ExecuteRound, GenesisLockRound, GenesisStartRound};
use crate::errors::PredictionError;
use crate::events::{RewardsCalculated, RoundEnded, RoundLocked, RoundStarted};
use crate::state::Phase;
use crate::utils::{compute_settlement, read_oracle};

/// One-shot genesis: creates the first bettable round. No prior round exists
/// to settle, so nothing else moves.
pub fn genesis_start_round(ctx: Context<GenesisStartRound>) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    cfg.assert_not_paused()?;
    cfg.assert_operator(&ctx.accounts.operator.key())?;
    require!(
        cfg.phase == Phase::Uninitialized,
        PredictionError::GenesisAlreadyStarted
    );

    let now = Clock::get()?.unix_timestamp;
    let epoch = cfg
        .current_epoch
        .checked_add(1)
        .ok_or(PredictionError::MathOverflow)?;

    ctx.accounts
        .round
        .start(epoch, ctx.bumps.round, now, cfg.interval_seconds);
    cfg.current_epoch = epoch;
    cfg.phase = Phase::GenesisStarted;

    emit!(RoundStarted { epoch });
    Ok(())
}

/// One-shot genesis lock: locks the genesis round against the oracle and
/// opens the next round. From here on `execute_round` drives the machine.
pub fn genesis_lock_round(ctx: Context<GenesisLockRound>) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    cfg.assert_not_paused()?;
    cfg.assert_operator(&ctx.accounts.operator.key())?;
    match cfg.phase {
        Phase::Uninitialized => return err!(PredictionError::GenesisNotStarted),
        Phase::SteadyState => return err!(PredictionError::GenesisAlreadyLocked),
        Phase::GenesisStarted => {}
    }

    let now = Clock::get()?.unix_timestamp;
    let (oracle_round_id, price) = read_oracle(
        &ctx.accounts.price_feed,
        cfg.oracle_latest_round_id,
        now,
        cfg.oracle_update_allowance,
    )?;
    cfg.oracle_latest_round_id = oracle_round_id;

    let current = &mut ctx.accounts.round_current;
    current.lock(price, oracle_round_id, now, cfg.buffer_seconds)?;
    emit!(RoundLocked {
        epoch: current.epoch,
        oracle_round_id,
        price,
    });

    let next_epoch = cfg
        .current_epoch
        .checked_add(1)
        .ok_or(PredictionError::MathOverflow)?;
    ctx.accounts
        .round_next
        .start(next_epoch, ctx.bumps.round_next, now, cfg.interval_seconds);
    cfg.current_epoch = next_epoch;
    cfg.phase = Phase::SteadyState;

    emit!(RoundStarted { epoch: next_epoch });
    Ok(())
}

/// Steady-state transition: one oracle read closes the previous round and
/// locks the current one, then the next round opens. The three events are
/// emitted atomically from this single call.
pub fn execute_round(ctx: Context<ExecuteRound>) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    cfg.assert_not_paused()?;
    cfg.assert_operator(&ctx.accounts.operator.key())?;
    match cfg.phase {
        Phase::Uninitialized => return err!(PredictionError::GenesisNotStarted),
        Phase::GenesisStarted => return err!(PredictionError::GenesisNotLocked),
        Phase::SteadyState => {}
    }

    let now = Clock::get()?.unix_timestamp;
    let current = &mut ctx.accounts.round_current;

    // The lock action itself must happen inside the buffer; a stale lock is
    // never applied retroactively.
    require!(
        now >= current.lock_timestamp,
        PredictionError::TooEarlyToLock
    );
    require!(
        now <= current.lock_timestamp.saturating_add(cfg.buffer_seconds),
        PredictionError::LockBufferExceeded
    );

    let (oracle_round_id, price) = read_oracle(
        &ctx.accounts.price_feed,
        cfg.oracle_latest_round_id,
        now,
        cfg.oracle_update_allowance,
    )?;
    cfg.oracle_latest_round_id = oracle_round_id;

    // Close the previous round with the same read so both rounds share one
    // price basis. Past its buffer the round stays void and the refund path
    // takes over.
    let prev = &mut ctx.accounts.round_prev;
    if prev.closable_within_buffer(now, cfg.buffer_seconds) {
        prev.end(price, oracle_round_id, now, cfg.buffer_seconds)?;
        emit!(RoundEnded {
            epoch: prev.epoch,
            oracle_round_id,
            price,
        });

        let settlement = compute_settlement(
            prev.lock_price,
            prev.close_price,
            prev.bull_amount,
            prev.bear_amount,
            prev.total_amount,
            cfg.treasury_fee_bps,
        )?;
        prev.record_settlement(settlement.reward_base_cal_amount, settlement.reward_amount)?;
        cfg.treasury_amount = cfg
            .treasury_amount
            .checked_add(settlement.treasury_cut)
            .ok_or(PredictionError::MathOverflow)?;

        emit!(RewardsCalculated {
            epoch: prev.epoch,
            reward_base_cal_amount: settlement.reward_base_cal_amount,
            reward_amount: settlement.reward_amount,
            treasury_cut: settlement.treasury_cut,
        });
    }

    current.lock(price, oracle_round_id, now, cfg.buffer_seconds)?;
    emit!(RoundLocked {
        epoch: current.epoch,
        oracle_round_id,
        price,
    });

    let next_epoch = cfg
        .current_epoch
        .checked_add(1)
        .ok_or(PredictionError::MathOverflow)?;
    ctx.accounts
        .round_next
        .start(next_epoch, ctx.bumps.round_next, now, cfg.interval_seconds);
    cfg.current_epoch = next_epoch;

    emit!(RoundStarted { epoch: next_epoch });
    Ok(())
}
