use anchor_lang::prelude::*;
use anchor_lang::solana_program::{program::invoke_signed, system_instruction};

use crate::constants::*;
use crate::errors::PredictionError;
use crate::state::{Position, PriceFeed};

/// Outcome of settling a closed round. Pure data; the caller applies it to the
/// round and to the treasury accumulator.
#[derive(Debug, PartialEq, Eq)]
pub struct Settlement {
    pub winner: Option<Position>,
    pub reward_base_cal_amount: u64,
    pub reward_amount: u64,
    pub treasury_cut: u64,
}

/// Computes winner, winner-side base, distributable pool and treasury cut for
/// a closed round. On a flat round (close == lock) the house wins and the
/// entire pool accrues to the treasury. Void rounds must never reach this
/// function.
pub fn compute_settlement(
    lock_price: i64,
    close_price: i64,
    bull_amount: u64,
    bear_amount: u64,
    total_amount: u64,
    treasury_fee_bps: u16,
) -> Result<Settlement> {
    if close_price == lock_price {
        return Ok(Settlement {
            winner: None,
            reward_base_cal_amount: 0,
            reward_amount: 0,
            treasury_cut: total_amount,
        });
    }

    let treasury_cut = bps_share(total_amount, treasury_fee_bps)?;
    let reward_amount = total_amount
        .checked_sub(treasury_cut)
        .ok_or(PredictionError::MathOverflow)?;

    let (winner, reward_base_cal_amount) = if close_price > lock_price {
        (Position::Bull, bull_amount)
    } else {
        (Position::Bear, bear_amount)
    };

    Ok(Settlement {
        winner: Some(winner),
        reward_base_cal_amount,
        reward_amount,
        treasury_cut,
    })
}

/// Proportional payout for a winning bet: amount * reward_amount / base,
/// integer division, widened through u128.
pub fn claim_payout(amount: u64, reward_amount: u64, reward_base_cal_amount: u64) -> Result<u64> {
    require!(reward_base_cal_amount > 0, PredictionError::NotEligible);
    let payout = (amount as u128)
        .checked_mul(reward_amount as u128)
        .ok_or(PredictionError::MathOverflow)?
        .checked_div(reward_base_cal_amount as u128)
        .ok_or(PredictionError::MathOverflow)?;
    u64::try_from(payout).map_err(|_| PredictionError::MathOverflow.into())
}

fn bps_share(amount: u64, bps: u16) -> Result<u64> {
    let share = (amount as u128)
        .checked_mul(bps as u128)
        .ok_or(PredictionError::MathOverflow)?
        .checked_div(BPS_DENOMINATOR as u128)
        .ok_or(PredictionError::MathOverflow)?;
    u64::try_from(share).map_err(|_| PredictionError::MathOverflow.into())
}

/// Reads the feed with the staleness guards: the published round id must be
/// strictly newer than the last one the engine accepted, and the publish
/// timestamp may not exceed now + allowance.
pub fn read_oracle(
    feed: &PriceFeed,
    last_accepted_round_id: u64,
    now: i64,
    update_allowance: i64,
) -> Result<(u64, i64)> {
    let (round_id, answer, updated_at) = feed.latest();
    require!(
        updated_at <= now.saturating_add(update_allowance),
        PredictionError::OracleTimestampOutOfRange
    );
    require!(
        round_id > last_accepted_round_id,
        PredictionError::OracleRoundNotNewer
    );
    require!(answer > 0, PredictionError::InvalidOraclePrice);
    Ok((round_id, answer))
}

/// Pays lamports out of the system-owned vault PDA.
pub fn vault_transfer<'info>(
    vault: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    vault_bump: u8,
    lamports: u64,
) -> Result<()> {
    let ix = system_instruction::transfer(vault.key, to.key, lamports);
    let signer_seeds: &[&[u8]] = &[VAULT_SEED, &[vault_bump]];

    invoke_signed(
        &ix,
        &[vault.clone(), to.clone(), system_program.clone()],
        &[signer_seeds],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Amounts in lamport-scale units, prices in 8-decimal fixed point.
    const BULL: u64 = 2_300_000_000;
    const BEAR: u64 = 1_400_000_000;
    const TOTAL: u64 = 3_700_000_000;
    const FEE_BPS: u16 = 1_000; // 10%

    #[test]
    fn bull_win_splits_pool_and_treasury() {
        let s = compute_settlement(100_0000_0000, 130_0000_0000, BULL, BEAR, TOTAL, FEE_BPS).unwrap();
        assert_eq!(s.winner, Some(Position::Bull));
        assert_eq!(s.reward_base_cal_amount, BULL);
        assert_eq!(s.treasury_cut, 370_000_000);
        assert_eq!(s.reward_amount, 3_330_000_000);
        // Nothing minted, nothing lost.
        assert_eq!(s.reward_amount + s.treasury_cut, TOTAL);
        assert!(s.reward_amount <= TOTAL);
    }

    #[test]
    fn bear_win_is_symmetric() {
        let s = compute_settlement(100_0000_0000, 70_0000_0000, BULL, BEAR, TOTAL, FEE_BPS).unwrap();
        assert_eq!(s.winner, Some(Position::Bear));
        assert_eq!(s.reward_base_cal_amount, BEAR);
        assert_eq!(s.reward_amount + s.treasury_cut, TOTAL);
    }

    #[test]
    fn flat_round_sends_the_entire_pool_to_the_treasury() {
        let s = compute_settlement(100_0000_0000, 100_0000_0000, BULL, BEAR, TOTAL, FEE_BPS).unwrap();
        assert_eq!(s.winner, None);
        assert_eq!(s.reward_base_cal_amount, 0);
        assert_eq!(s.reward_amount, 0);
        assert_eq!(s.treasury_cut, TOTAL);
    }

    #[test]
    fn winner_base_plus_losing_side_covers_the_pool() {
        let s = compute_settlement(100_0000_0000, 130_0000_0000, BULL, BEAR, TOTAL, FEE_BPS).unwrap();
        assert_eq!(s.reward_base_cal_amount + BEAR, TOTAL);
    }

    #[test]
    fn proportional_payout_matches_the_reference_numbers() {
        // A bull bettor who staked 1.1 of 2.3 claims 1.1 * 3.33 / 2.3.
        let payout = claim_payout(1_100_000_000, 3_330_000_000, BULL).unwrap();
        assert_eq!(payout, 1_592_608_695);
    }

    #[test]
    fn payout_rejects_a_zero_base() {
        assert!(claim_payout(1, 1, 0).is_err());
    }

    #[test]
    fn payout_survives_large_pools() {
        let payout = claim_payout(u64::MAX / 2, u64::MAX / 2, u64::MAX / 2).unwrap();
        assert_eq!(payout, u64::MAX / 2);
    }

    fn feed(round_id: u64, answer: i64, updated_at: i64) -> PriceFeed {
        PriceFeed {
            authority: Pubkey::new_unique(),
            bump: 255,
            decimals: 8,
            latest_round_id: round_id,
            answer,
            updated_at,
        }
    }

    #[test]
    fn oracle_read_requires_a_strictly_newer_round_id() {
        let f = feed(5, 100, 1_000);
        assert_eq!(
            read_oracle(&f, 5, 1_000, 300).unwrap_err(),
            PredictionError::OracleRoundNotNewer.into()
        );
        let (id, price) = read_oracle(&f, 4, 1_000, 300).unwrap();
        assert_eq!((id, price), (5, 100));
    }

    #[test]
    fn oracle_read_rejects_a_timestamp_past_the_allowance() {
        let f = feed(5, 100, 1_400);
        assert_eq!(
            read_oracle(&f, 4, 1_000, 300).unwrap_err(),
            PredictionError::OracleTimestampOutOfRange.into()
        );
    }

    #[test]
    fn oracle_read_rejects_a_non_positive_answer() {
        assert!(read_oracle(&feed(5, 0, 1_000), 4, 1_000, 300).is_err());
        assert!(read_oracle(&feed(5, -1, 1_000), 4, 1_000, 300).is_err());
    }

    mod round_flow {
        use super::*;
        use crate::state::{Bet, Round};

        const INTERVAL: i64 = 100;
        const BUFFER: i64 = 25;

        fn fresh_round(epoch: u64, now: i64) -> Round {
            let mut round = Round {
                epoch: 0,
                bump: 0,
                start_timestamp: 0,
                lock_timestamp: 0,
                close_timestamp: 0,
                lock_price: 0,
                close_price: 0,
                lock_oracle_id: 0,
                close_oracle_id: 0,
                total_amount: 0,
                bull_amount: 0,
                bear_amount: 0,
                reward_base_cal_amount: 0,
                reward_amount: 0,
                settled: false,
            };
            round.start(epoch, 255, now, INTERVAL);
            round
        }

        fn wager(position: Position, amount: u64) -> Bet {
            Bet {
                epoch: 1,
                user: Pubkey::new_unique(),
                bump: 255,
                position,
                amount,
                claimed: false,
            }
        }

        /// Genesis start at t=0, lock at t=100, close at t=200, bull wins.
        #[test]
        fn full_round_settles_and_pays_the_winner() {
            let mut round = fresh_round(1, 0);
            assert_eq!((round.lock_timestamp, round.close_timestamp), (100, 200));

            round.record_bet(Position::Bull, BULL).unwrap();
            round.record_bet(Position::Bear, BEAR).unwrap();

            round.lock(100_0000_0000, 1, 100, BUFFER).unwrap();
            round.end(130_0000_0000, 2, 200, BUFFER).unwrap();

            let s = compute_settlement(
                round.lock_price,
                round.close_price,
                round.bull_amount,
                round.bear_amount,
                round.total_amount,
                FEE_BPS,
            )
            .unwrap();
            round
                .record_settlement(s.reward_base_cal_amount, s.reward_amount)
                .unwrap();

            let winner = wager(Position::Bull, 1_100_000_000);
            let loser = wager(Position::Bear, BEAR);
            assert!(winner.claimable(&round));
            assert!(!loser.claimable(&round));

            let payout = claim_payout(
                winner.amount,
                round.reward_amount,
                round.reward_base_cal_amount,
            )
            .unwrap();
            assert_eq!(payout, 1_592_608_695);
            // Vault solvency: the whole winner side claims at most the pool.
            let all_winners = claim_payout(
                round.reward_base_cal_amount,
                round.reward_amount,
                round.reward_base_cal_amount,
            )
            .unwrap();
            assert!(all_winners + s.treasury_cut <= round.total_amount);
        }

        /// Operator misses the close buffer: every bettor gets exactly the
        /// stake back and the treasury sees nothing from the round.
        #[test]
        fn missed_buffer_round_refunds_stakes_only() {
            let mut round = fresh_round(1, 0);
            round.record_bet(Position::Bull, BULL).unwrap();
            round.record_bet(Position::Bear, BEAR).unwrap();
            round.lock(100_0000_0000, 1, 100, BUFFER).unwrap();

            // Past close + buffer with no close recorded.
            let now = 226;
            assert!(!round.closable_within_buffer(now, BUFFER));

            for wagered in [wager(Position::Bull, BULL), wager(Position::Bear, BEAR)] {
                assert!(wagered.refundable(&round, now, BUFFER));
                assert!(!wagered.claimable(&round));
            }
            // The refund is the stake itself; no settlement ever ran.
            assert_eq!(round.reward_amount, 0);
            assert_eq!(round.reward_base_cal_amount, 0);
        }

        /// Claim-once: after the claimed flag flips, neither predicate holds.
        #[test]
        fn claimed_flag_makes_a_bet_ineligible() {
            let mut round = fresh_round(1, 0);
            round.record_bet(Position::Bull, BULL).unwrap();
            round.lock(100_0000_0000, 1, 100, BUFFER).unwrap();
            round.end(130_0000_0000, 2, 200, BUFFER).unwrap();

            let mut winner = wager(Position::Bull, BULL);
            assert!(winner.claimable(&round));
            winner.claimed = true;
            assert!(!winner.claimable(&round));
            assert!(!winner.refundable(&round, 1_000, BUFFER));
        }
    }
}
