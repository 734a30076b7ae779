use anchor_lang::prelude::*;

use crate::constants::*;
use crate::contexts::Claim;
use crate::errors::PredictionError;
use crate::events::RewardClaimed;
use crate::state::{Bet, Round};
use crate::utils::{claim_payout, vault_transfer};

/// Settles a batch of epochs for the caller. Per epoch exactly one of:
/// winner-side claim (proportional share of the reward pool) or void-round
/// refund (the original stake). Any ineligible entry aborts the whole call.
/// Claims stay available while the protocol is paused.
pub fn claim<'info>(
    ctx: Context<'_, '_, 'info, 'info, Claim<'info>>,
    epochs: Vec<u64>,
) -> Result<()> {
    require!(
        !epochs.is_empty() && epochs.len() <= MAX_CLAIM_EPOCHS,
        PredictionError::InvalidClaimBatch
    );
    require!(
        ctx.remaining_accounts.len() == epochs.len() * 2,
        PredictionError::InvalidClaimBatch
    );

    let cfg = &ctx.accounts.config;
    let user = ctx.accounts.user.key();
    let now = Clock::get()?.unix_timestamp;

    let mut total_payout: u64 = 0;

    for (i, &epoch) in epochs.iter().enumerate() {
        let round_ai = &ctx.remaining_accounts[i * 2];
        let bet_ai = &ctx.remaining_accounts[i * 2 + 1];

        let (round_pda, _) = Pubkey::find_program_address(
            &[ROUND_SEED, epoch.to_le_bytes().as_ref()],
            ctx.program_id,
        );
        require_keys_eq!(round_ai.key(), round_pda, PredictionError::AccountMismatch);
        let (bet_pda, _) = Pubkey::find_program_address(
            &[BET_SEED, epoch.to_le_bytes().as_ref(), user.as_ref()],
            ctx.program_id,
        );
        require_keys_eq!(bet_ai.key(), bet_pda, PredictionError::AccountMismatch);
        require_keys_eq!(*round_ai.owner, *ctx.program_id, PredictionError::AccountMismatch);
        require_keys_eq!(*bet_ai.owner, *ctx.program_id, PredictionError::AccountMismatch);

        let round: Round = {
            let data = round_ai.try_borrow_data()?;
            Round::try_deserialize(&mut &data[..])?
        };
        let mut bet: Bet = {
            let data = bet_ai.try_borrow_data()?;
            Bet::try_deserialize(&mut &data[..])?
        };
        require_keys_eq!(bet.user, user, PredictionError::AccountMismatch);

        require!(round.start_timestamp != 0, PredictionError::RoundNotStarted);
        require!(now > round.close_timestamp, PredictionError::RoundNotOver);

        let payout = if round.has_ended() {
            require!(bet.claimable(&round), PredictionError::NotEligible);
            claim_payout(bet.amount, round.reward_amount, round.reward_base_cal_amount)?
        } else {
            require!(
                bet.refundable(&round, now, cfg.buffer_seconds),
                PredictionError::NotEligible
            );
            bet.amount
        };

        // Mark claimed before any lamports move. A duplicate epoch later in
        // this same batch re-reads the flag and fails the whole call.
        bet.claimed = true;
        {
            let mut data = bet_ai.try_borrow_mut_data()?;
            let mut cursor = std::io::Cursor::new(&mut data[..]);
            bet.try_serialize(&mut cursor)?;
        }

        total_payout = total_payout
            .checked_add(payout)
            .ok_or(PredictionError::MathOverflow)?;

        emit!(RewardClaimed {
            user,
            epoch,
            amount: payout,
        });
    }

    if total_payout > 0 {
        vault_transfer(
            &ctx.accounts.vault.to_account_info(),
            &ctx.accounts.user.to_account_info(),
            &ctx.accounts.system_program.to_account_info(),
            cfg.vault_bump,
            total_payout,
        )?;
    }

    Ok(())
}
