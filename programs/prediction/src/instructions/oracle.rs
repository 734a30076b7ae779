use anchor_lang::prelude::*;

use crate::contexts::{InitPriceFeed, PublishPrice};
use crate::errors::PredictionError;
use crate::events::PricePublished;

pub fn init_price_feed(ctx: Context<InitPriceFeed>, decimals: u8) -> Result<()> {
    let feed = &mut ctx.accounts.price_feed;
    feed.authority = ctx.accounts.authority.key();
    feed.bump = ctx.bumps.price_feed;
    feed.decimals = decimals;
    feed.latest_round_id = 0;
    feed.answer = 0;
    feed.updated_at = 0;
    Ok(())
}

/// Publishes a new answer on the feed. Each publish advances the feed's round
/// id, which is what the engine's staleness guard keys on.
pub fn publish_price(ctx: Context<PublishPrice>, answer: i64) -> Result<()> {
    require!(answer > 0, PredictionError::InvalidOraclePrice);

    let feed = &mut ctx.accounts.price_feed;
    let now = Clock::get()?.unix_timestamp;
    feed.latest_round_id = feed
        .latest_round_id
        .checked_add(1)
        .ok_or(PredictionError::MathOverflow)?;
    feed.answer = answer;
    feed.updated_at = now;

    emit!(PricePublished {
        feed: feed.key(),
        round_id: feed.latest_round_id,
        answer,
        updated_at: now,
    });
    Ok(())
}
