use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::contexts::PlaceBet;
use crate::errors::PredictionError;
use crate::events::BetPlaced;
use crate::state::Position;

pub fn bet_bull(ctx: Context<PlaceBet>, epoch: u64, amount: u64) -> Result<()> {
    place_bet(ctx, epoch, amount, Position::Bull)
}

pub fn bet_bear(ctx: Context<PlaceBet>, epoch: u64, amount: u64) -> Result<()> {
    place_bet(ctx, epoch, amount, Position::Bear)
}

fn place_bet(ctx: Context<PlaceBet>, epoch: u64, amount: u64, position: Position) -> Result<()> {
    let cfg = &ctx.accounts.config;
    cfg.assert_not_paused()?;
    require!(epoch == cfg.current_epoch, PredictionError::EpochNotCurrent);

    let now = Clock::get()?.unix_timestamp;
    require!(
        ctx.accounts.round.is_bettable(now),
        PredictionError::RoundNotBettable
    );
    require!(
        amount >= cfg.min_bet_amount,
        PredictionError::BetBelowMinimum
    );

    // Escrow the stake in the vault before touching the ledger.
    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.user.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            },
        ),
        amount,
    )?;

    let round = &mut ctx.accounts.round;
    round.record_bet(position, amount)?;

    let bet = &mut ctx.accounts.bet;
    bet.epoch = epoch;
    bet.user = ctx.accounts.user.key();
    bet.bump = ctx.bumps.bet;
    bet.position = position;
    bet.amount = amount;
    bet.claimed = false;

    // init_if_needed: rewriting user/bump on an existing account is a no-op.
    let history = &mut ctx.accounts.user_history;
    history.user = ctx.accounts.user.key();
    history.bump = ctx.bumps.user_history;
    history.record(epoch)?;

    emit!(BetPlaced {
        user: bet.user,
        epoch,
        position,
        amount,
    });
    Ok(())
}
