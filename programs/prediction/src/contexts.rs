use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::PredictionError;
use crate::state::{Bet, Config, PriceFeed, Round, UserHistory};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = owner,
        space = 8 + Config::INIT_SPACE,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, Config>,

    /// CHECK: system-owned vault PDA, holds the wagered lamports, no data.
    #[account(
        init,
        payer = owner,
        space = 0,
        owner = anchor_lang::solana_program::system_program::ID,
        seeds = [VAULT_SEED],
        bump
    )]
    pub vault: UncheckedAccount<'info>,

    /// Feed the engine will read at lock and close.
    pub price_feed: Account<'info, PriceFeed>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct InitPriceFeed<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + PriceFeed::INIT_SPACE,
        seeds = [PRICE_FEED_SEED, authority.key().as_ref()],
        bump
    )]
    pub price_feed: Account<'info, PriceFeed>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct PublishPrice<'info> {
    #[account(
        mut,
        seeds = [PRICE_FEED_SEED, authority.key().as_ref()],
        bump = price_feed.bump,
    )]
    pub price_feed: Account<'info, PriceFeed>,

    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct GenesisStartRound<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = operator,
        space = 8 + Round::INIT_SPACE,
        seeds = [ROUND_SEED, (config.current_epoch + 1).to_le_bytes().as_ref()],
        bump
    )]
    pub round: Account<'info, Round>,

    #[account(mut)]
    pub operator: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct GenesisLockRound<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(address = config.oracle @ PredictionError::AccountMismatch)]
    pub price_feed: Account<'info, PriceFeed>,

    #[account(
        mut,
        seeds = [ROUND_SEED, config.current_epoch.to_le_bytes().as_ref()],
        bump = round_current.bump,
    )]
    pub round_current: Account<'info, Round>,

    #[account(
        init,
        payer = operator,
        space = 8 + Round::INIT_SPACE,
        seeds = [ROUND_SEED, (config.current_epoch + 1).to_le_bytes().as_ref()],
        bump
    )]
    pub round_next: Account<'info, Round>,

    #[account(mut)]
    pub operator: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct ExecuteRound<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(address = config.oracle @ PredictionError::AccountMismatch)]
    pub price_feed: Account<'info, PriceFeed>,

    #[account(
        mut,
        seeds = [ROUND_SEED, config.current_epoch.saturating_sub(1).to_le_bytes().as_ref()],
        bump = round_prev.bump,
    )]
    pub round_prev: Account<'info, Round>,

    #[account(
        mut,
        seeds = [ROUND_SEED, config.current_epoch.to_le_bytes().as_ref()],
        bump = round_current.bump,
    )]
    pub round_current: Account<'info, Round>,

    #[account(
        init,
        payer = operator,
        space = 8 + Round::INIT_SPACE,
        seeds = [ROUND_SEED, (config.current_epoch + 1).to_le_bytes().as_ref()],
        bump
    )]
    pub round_next: Account<'info, Round>,

    #[account(mut)]
    pub operator: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(epoch: u64)]
pub struct PlaceBet<'info> {
    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [ROUND_SEED, epoch.to_le_bytes().as_ref()],
        bump = round.bump,
    )]
    pub round: Account<'info, Round>,

    // One bet per (epoch, user): a second bet fails to init this PDA.
    #[account(
        init,
        payer = user,
        space = 8 + Bet::INIT_SPACE,
        seeds = [BET_SEED, epoch.to_le_bytes().as_ref(), user.key().as_ref()],
        bump
    )]
    pub bet: Account<'info, Bet>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + UserHistory::INIT_SPACE,
        seeds = [USER_ROUNDS_SEED, user.key().as_ref()],
        bump
    )]
    pub user_history: Account<'info, UserHistory>,

    /// CHECK: system-owned vault PDA, receives the wagered lamports.
    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump = config.vault_bump,
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Remaining accounts carry one (Round, Bet) pair per claimed epoch, in the
/// same order as the epoch list.
#[derive(Accounts)]
pub struct Claim<'info> {
    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// CHECK: system-owned vault PDA, pays the winnings/refunds out.
    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump = config.vault_bump,
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct ClaimTreasury<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// CHECK: system-owned vault PDA, pays the treasury out.
    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump = config.vault_bump,
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Pause<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    pub caller: Signer<'info>,
}

#[derive(Accounts)]
pub struct Unpause<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    pub admin: Signer<'info>,
}

/// Shared by the admin-only configuration setters.
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct SetOracle<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Candidate feed, validated before being adopted.
    pub price_feed: Account<'info, PriceFeed>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct SetAdmin<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    pub owner: Signer<'info>,
}
