use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::PredictionError;

/// Global lifecycle of the engine. Replaces the pair of one-shot genesis
/// booleans so a "locked without started" combination is unrepresentable.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Uninitialized,
    GenesisStarted,
    SteadyState,
}

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Position {
    Bull,
    Bear,
}

#[account]
#[derive(InitSpace)]
pub struct Config {
    pub owner: Pubkey,
    pub admin: Pubkey,
    pub operator: Pubkey,
    /// Price feed account consulted at lock and close.
    pub oracle: Pubkey,
    pub bump: u8,
    pub vault_bump: u8,

    pub interval_seconds: i64,
    pub buffer_seconds: i64,
    pub min_bet_amount: u64,
    pub oracle_update_allowance: i64,
    pub treasury_fee_bps: u16,

    /// Most recently created epoch. 0 means no round exists yet.
    pub current_epoch: u64,
    /// Last oracle round id accepted at a lock or close step.
    pub oracle_latest_round_id: u64,
    /// Accrued treasury fees, withdrawable by the admin.
    pub treasury_amount: u64,

    pub phase: Phase,
    pub paused: bool,
    pub version: u16,
}

impl Config {
    pub fn assert_not_paused(&self) -> Result<()> {
        require!(!self.paused, PredictionError::Paused);
        Ok(())
    }

    pub fn assert_operator(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(self.operator, *caller, PredictionError::NotOperator);
        Ok(())
    }

    pub fn assert_admin(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(self.admin, *caller, PredictionError::NotAdmin);
        Ok(())
    }

    pub fn validate_window(interval_seconds: i64, buffer_seconds: i64) -> Result<()> {
        require!(
            interval_seconds > 0 && buffer_seconds > 0 && buffer_seconds < interval_seconds,
            PredictionError::InvalidBufferAndInterval
        );
        Ok(())
    }
}

#[account]
#[derive(InitSpace)]
pub struct Round {
    pub epoch: u64,
    pub bump: u8,

    pub start_timestamp: i64,
    pub lock_timestamp: i64,
    pub close_timestamp: i64,

    /// 0 until the round is locked; a zero lock price past the lock window
    /// means the round was never serviced and is refundable.
    pub lock_price: i64,
    /// 0 until the round is ended; a zero close price past the close window
    /// marks the round void.
    pub close_price: i64,
    pub lock_oracle_id: u64,
    pub close_oracle_id: u64,

    pub total_amount: u64,
    pub bull_amount: u64,
    pub bear_amount: u64,

    /// Amount staked on the winning side. Set once at settlement; stays 0 on a
    /// house win or a void round.
    pub reward_base_cal_amount: u64,
    /// Pool distributable to winners. Set once at settlement.
    pub reward_amount: u64,
    /// Flips once settlement has run. Both reward fields legitimately stay 0
    /// on a house win, so they cannot serve as the set-once marker themselves.
    pub settled: bool,
}

impl Round {
    pub fn start(&mut self, epoch: u64, bump: u8, now: i64, interval_seconds: i64) {
        self.epoch = epoch;
        self.bump = bump;
        self.start_timestamp = now;
        self.lock_timestamp = now.saturating_add(interval_seconds);
        self.close_timestamp = now.saturating_add(interval_seconds.saturating_mul(2));
    }

    /// Open betting window: strictly after start, strictly before lock.
    pub fn is_bettable(&self, now: i64) -> bool {
        self.lock_price == 0 && now > self.start_timestamp && now < self.lock_timestamp
    }

    pub fn record_bet(&mut self, position: Position, amount: u64) -> Result<()> {
        match position {
            Position::Bull => {
                self.bull_amount = self
                    .bull_amount
                    .checked_add(amount)
                    .ok_or(PredictionError::MathOverflow)?;
            }
            Position::Bear => {
                self.bear_amount = self
                    .bear_amount
                    .checked_add(amount)
                    .ok_or(PredictionError::MathOverflow)?;
            }
        }
        self.total_amount = self
            .total_amount
            .checked_add(amount)
            .ok_or(PredictionError::MathOverflow)?;
        Ok(())
    }

    /// Lock step: set-once, and only inside [lock_timestamp, lock_timestamp + buffer].
    pub fn lock(
        &mut self,
        price: i64,
        oracle_round_id: u64,
        now: i64,
        buffer_seconds: i64,
    ) -> Result<()> {
        require!(self.lock_price == 0, PredictionError::RoundAlreadyLocked);
        require!(now >= self.lock_timestamp, PredictionError::TooEarlyToLock);
        require!(
            now <= self.lock_timestamp.saturating_add(buffer_seconds),
            PredictionError::LockBufferExceeded
        );
        require!(price > 0, PredictionError::InvalidOraclePrice);

        self.lock_price = price;
        self.lock_oracle_id = oracle_round_id;
        Ok(())
    }

    /// Close step: set-once, only on a locked round, and only inside
    /// [close_timestamp, close_timestamp + buffer].
    pub fn end(
        &mut self,
        price: i64,
        oracle_round_id: u64,
        now: i64,
        buffer_seconds: i64,
    ) -> Result<()> {
        require!(self.lock_price != 0, PredictionError::RoundNotLocked);
        require!(self.close_price == 0, PredictionError::RoundAlreadyEnded);
        require!(now >= self.close_timestamp, PredictionError::TooEarlyToEnd);
        require!(
            now <= self.close_timestamp.saturating_add(buffer_seconds),
            PredictionError::EndBufferExceeded
        );
        require!(price > 0, PredictionError::InvalidOraclePrice);

        self.close_price = price;
        self.close_oracle_id = oracle_round_id;
        Ok(())
    }

    /// True once the round was closed against the oracle (non-void).
    pub fn has_ended(&self) -> bool {
        self.close_price != 0
    }

    /// Whether the previous round can still be closed by this oracle read.
    /// Past the buffer the round stays void and is handled by the refund path.
    pub fn closable_within_buffer(&self, now: i64, buffer_seconds: i64) -> bool {
        self.lock_price != 0
            && self.close_price == 0
            && now <= self.close_timestamp.saturating_add(buffer_seconds)
    }

    pub fn record_settlement(&mut self, reward_base_cal_amount: u64, reward_amount: u64) -> Result<()> {
        require!(!self.settled, PredictionError::RewardsAlreadyCalculated);
        self.reward_base_cal_amount = reward_base_cal_amount;
        self.reward_amount = reward_amount;
        self.settled = true;
        Ok(())
    }
}

#[account]
#[derive(InitSpace)]
pub struct Bet {
    pub epoch: u64,
    pub user: Pubkey,
    pub bump: u8,

    pub position: Position,
    pub amount: u64,
    pub claimed: bool,
}

impl Bet {
    /// Winner-side claim: round closed against the oracle, price moved, and
    /// the position agrees with the direction. House wins are never claimable.
    pub fn claimable(&self, round: &Round) -> bool {
        if round.lock_price == 0 || round.close_price == 0 {
            return false;
        }
        if round.close_price == round.lock_price {
            return false;
        }
        self.amount > 0
            && !self.claimed
            && ((round.close_price > round.lock_price && self.position == Position::Bull)
                || (round.close_price < round.lock_price && self.position == Position::Bear))
    }

    /// Void-round refund: the round was never closed and its buffer elapsed.
    pub fn refundable(&self, round: &Round, now: i64, buffer_seconds: i64) -> bool {
        self.amount > 0
            && !self.claimed
            && round.close_price == 0
            && now > round.close_timestamp.saturating_add(buffer_seconds)
    }
}

#[account]
#[derive(InitSpace)]
pub struct UserHistory {
    pub user: Pubkey,
    pub bump: u8,

    /// Append-only list of epochs the user has bet in, insertion order.
    /// NOTE: fixed max_len to keep account size deterministic.
    #[max_len(MAX_USER_HISTORY)]
    pub epochs: Vec<u64>,
}

impl UserHistory {
    /// Appends once per first bet in a new epoch. One bet per (epoch, user)
    /// already holds upstream, so checking the tail is enough.
    pub fn record(&mut self, epoch: u64) -> Result<()> {
        if self.epochs.last() == Some(&epoch) {
            return Ok(());
        }
        require!(self.epochs.len() < MAX_USER_HISTORY, PredictionError::HistoryFull);
        self.epochs.push(epoch);
        Ok(())
    }

    /// Cursor page over the history: up to `size` epochs from `cursor`, plus
    /// the next cursor. A cursor at or past the end yields an empty page and
    /// the same cursor back.
    pub fn page(&self, cursor: u64, size: u64) -> (&[u64], u64) {
        let len = self.epochs.len() as u64;
        if cursor >= len {
            return (&[], cursor);
        }
        let end = cursor.saturating_add(size).min(len);
        (&self.epochs[cursor as usize..end as usize], end)
    }
}

/// Oracle feed consumed at lock and close. Published by an external feed
/// authority; the engine only ever reads it.
#[account]
#[derive(InitSpace)]
pub struct PriceFeed {
    pub authority: Pubkey,
    pub bump: u8,

    pub decimals: u8,
    pub latest_round_id: u64,
    pub answer: i64,
    pub updated_at: i64,
}

impl PriceFeed {
    pub fn latest(&self) -> (u64, i64, i64) {
        (self.latest_round_id, self.answer, self.updated_at)
    }

    /// A feed is adoptable only once it has published a positive answer;
    /// an empty feed would brick the next lock step.
    pub fn assert_published(&self) -> Result<()> {
        require!(
            self.latest_round_id > 0 && self.answer > 0,
            PredictionError::MalformedOracleFeed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: i64 = 100;
    const BUFFER: i64 = 25;

    fn started_round(epoch: u64, now: i64) -> Round {
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

    #[test]
    fn start_computes_lock_and_close_timestamps() {
        let round = started_round(1, 0);
        assert_eq!(round.epoch, 1);
        assert_eq!(round.start_timestamp, 0);
        assert_eq!(round.lock_timestamp, 100);
        assert_eq!(round.close_timestamp, 200);
        assert_eq!(round.total_amount, 0);
    }

    #[test]
    fn betting_window_is_strictly_between_start_and_lock() {
        let round = started_round(1, 0);
        assert!(!round.is_bettable(0));
        assert!(round.is_bettable(1));
        assert!(round.is_bettable(99));
        assert!(!round.is_bettable(100));
        assert!(!round.is_bettable(150));
    }

    #[test]
    fn locked_round_is_not_bettable() {
        let mut round = started_round(1, 0);
        round.lock(100, 1, 100, BUFFER).unwrap();
        assert!(!round.is_bettable(50));
    }

    #[test]
    fn lock_honors_the_buffer_window() {
        let mut round = started_round(1, 0);
        assert_eq!(
            round.lock(100, 1, 99, BUFFER).unwrap_err(),
            PredictionError::TooEarlyToLock.into()
        );
        assert_eq!(
            round.lock(100, 1, 126, BUFFER).unwrap_err(),
            PredictionError::LockBufferExceeded.into()
        );
        round.lock(100, 1, 125, BUFFER).unwrap();
        assert_eq!(round.lock_price, 100);
        assert_eq!(round.lock_oracle_id, 1);
    }

    #[test]
    fn lock_is_set_once() {
        let mut round = started_round(1, 0);
        round.lock(100, 1, 100, BUFFER).unwrap();
        assert_eq!(
            round.lock(130, 2, 110, BUFFER).unwrap_err(),
            PredictionError::RoundAlreadyLocked.into()
        );
        assert_eq!(round.lock_price, 100);
    }

    #[test]
    fn end_requires_a_locked_round_and_is_set_once() {
        let mut round = started_round(1, 0);
        assert_eq!(
            round.end(130, 2, 200, BUFFER).unwrap_err(),
            PredictionError::RoundNotLocked.into()
        );
        round.lock(100, 1, 100, BUFFER).unwrap();
        assert_eq!(
            round.end(130, 2, 199, BUFFER).unwrap_err(),
            PredictionError::TooEarlyToEnd.into()
        );
        round.end(130, 2, 200, BUFFER).unwrap();
        assert!(round.has_ended());
        assert_eq!(
            round.end(150, 3, 210, BUFFER).unwrap_err(),
            PredictionError::RoundAlreadyEnded.into()
        );
        assert_eq!(round.close_price, 130);
    }

    #[test]
    fn close_buffer_elapsed_leaves_round_void() {
        let mut round = started_round(1, 0);
        round.lock(100, 1, 100, BUFFER).unwrap();
        assert!(round.closable_within_buffer(225, BUFFER));
        assert!(!round.closable_within_buffer(226, BUFFER));
        assert_eq!(
            round.end(130, 2, 226, BUFFER).unwrap_err(),
            PredictionError::EndBufferExceeded.into()
        );
        assert!(!round.has_ended());
    }

    #[test]
    fn record_bet_keeps_total_equal_to_both_sides() {
        let mut round = started_round(1, 0);
        round.record_bet(Position::Bull, 2_300_000_000).unwrap();
        round.record_bet(Position::Bear, 1_400_000_000).unwrap();
        round.record_bet(Position::Bull, 1_000).unwrap();
        assert_eq!(round.bull_amount, 2_300_001_000);
        assert_eq!(round.bear_amount, 1_400_000_000);
        assert_eq!(round.total_amount, round.bull_amount + round.bear_amount);
    }

    #[test]
    fn settlement_fields_are_set_once() {
        let mut round = started_round(1, 0);
        round.record_settlement(10, 9).unwrap();
        assert_eq!(
            round.record_settlement(20, 18).unwrap_err(),
            PredictionError::RewardsAlreadyCalculated.into()
        );
        assert_eq!(round.reward_base_cal_amount, 10);
        assert_eq!(round.reward_amount, 9);
    }

    #[test]
    fn house_win_settlement_is_also_set_once() {
        // Both reward fields stay 0 on a house win; the settled flag is what
        // keeps a second settlement out.
        let mut round = started_round(1, 0);
        round.record_settlement(0, 0).unwrap();
        assert_eq!(
            round.record_settlement(0, 0).unwrap_err(),
            PredictionError::RewardsAlreadyCalculated.into()
        );
    }

    fn bet(position: Position, amount: u64) -> Bet {
        Bet {
            epoch: 1,
            user: Pubkey::new_unique(),
            bump: 255,
            position,
            amount,
            claimed: false,
        }
    }

    #[test]
    fn claimable_only_for_the_winning_side() {
        let mut round = started_round(1, 0);
        round.lock(100, 1, 100, BUFFER).unwrap();
        round.end(130, 2, 200, BUFFER).unwrap();

        assert!(bet(Position::Bull, 10).claimable(&round));
        assert!(!bet(Position::Bear, 10).claimable(&round));

        let mut claimed = bet(Position::Bull, 10);
        claimed.claimed = true;
        assert!(!claimed.claimable(&round));
    }

    #[test]
    fn house_win_is_never_claimable() {
        let mut round = started_round(1, 0);
        round.lock(100, 1, 100, BUFFER).unwrap();
        round.end(100, 2, 200, BUFFER).unwrap();

        assert!(!bet(Position::Bull, 10).claimable(&round));
        assert!(!bet(Position::Bear, 10).claimable(&round));
    }

    #[test]
    fn void_round_becomes_refundable_after_the_close_buffer() {
        let mut round = started_round(1, 0);
        round.lock(100, 1, 100, BUFFER).unwrap();
        // Never closed; refundable only once past close + buffer.
        let wager = bet(Position::Bear, 10);
        assert!(!wager.refundable(&round, 225, BUFFER));
        assert!(wager.refundable(&round, 226, BUFFER));
        assert!(!wager.claimable(&round));

        let mut claimed = bet(Position::Bear, 10);
        claimed.claimed = true;
        assert!(!claimed.refundable(&round, 226, BUFFER));
    }

    #[test]
    fn closed_round_is_not_refundable() {
        let mut round = started_round(1, 0);
        round.lock(100, 1, 100, BUFFER).unwrap();
        round.end(130, 2, 200, BUFFER).unwrap();
        assert!(!bet(Position::Bull, 10).refundable(&round, 1_000, BUFFER));
    }

    fn history(epochs: &[u64]) -> UserHistory {
        UserHistory {
            user: Pubkey::new_unique(),
            bump: 255,
            epochs: epochs.to_vec(),
        }
    }

    #[test]
    fn record_appends_once_per_epoch() {
        let mut h = history(&[]);
        h.record(3).unwrap();
        h.record(3).unwrap();
        h.record(5).unwrap();
        assert_eq!(h.epochs, vec![3, 5]);
    }

    #[test]
    fn pages_concatenate_to_the_full_history() {
        let h = history(&[1, 2, 3, 4, 5, 6, 7]);

        let mut collected = Vec::new();
        let mut cursor = 0u64;
        loop {
            let (page, next) = h.page(cursor, 3);
            if page.is_empty() {
                assert_eq!(next, cursor);
                break;
            }
            collected.extend_from_slice(page);
            cursor = next;
        }
        assert_eq!(collected, h.epochs);
        assert_eq!(cursor, 7);
    }

    #[test]
    fn page_past_the_end_is_empty_with_the_same_cursor() {
        let h = history(&[1, 2]);
        let (page, next) = h.page(9, 4);
        assert!(page.is_empty());
        assert_eq!(next, 9);
    }

    fn config(paused: bool) -> Config {
        Config {
            owner: Pubkey::new_unique(),
            admin: Pubkey::new_unique(),
            operator: Pubkey::new_unique(),
            oracle: Pubkey::new_unique(),
            bump: 255,
            vault_bump: 255,
            interval_seconds: INTERVAL,
            buffer_seconds: BUFFER,
            min_bet_amount: 1_000,
            oracle_update_allowance: 300,
            treasury_fee_bps: 1_000,
            current_epoch: 1,
            oracle_latest_round_id: 1,
            treasury_amount: 0,
            phase: Phase::SteadyState,
            paused,
            version: 1,
        }
    }

    #[test]
    fn paused_config_blocks_mutations() {
        assert_eq!(
            config(true).assert_not_paused().unwrap_err(),
            PredictionError::Paused.into()
        );
        assert!(config(false).assert_not_paused().is_ok());
    }

    #[test]
    fn role_checks_reject_the_wrong_key() {
        let cfg = config(false);
        assert_eq!(
            cfg.assert_operator(&Pubkey::new_unique()).unwrap_err(),
            PredictionError::NotOperator.into()
        );
        assert_eq!(
            cfg.assert_admin(&Pubkey::new_unique()).unwrap_err(),
            PredictionError::NotAdmin.into()
        );
        assert!(cfg.assert_operator(&cfg.operator).is_ok());
        assert!(cfg.assert_admin(&cfg.admin).is_ok());
    }

    #[test]
    fn claim_eligibility_never_consults_the_pause_flag() {
        // claimable/refundable take only the round and the clock, so pausing
        // the protocol cannot strand a payout.
        let cfg = config(true);
        assert!(cfg.paused);

        let mut round = started_round(1, 0);
        round.lock(100, 1, 100, BUFFER).unwrap();
        round.end(130, 2, 200, BUFFER).unwrap();
        assert!(bet(Position::Bull, 10).claimable(&round));

        let mut void_round = started_round(2, 0);
        void_round.lock(100, 1, 100, BUFFER).unwrap();
        assert!(bet(Position::Bear, 10).refundable(&void_round, 226, BUFFER));
    }

    #[test]
    fn unpublished_feed_is_not_adoptable() {
        let mut feed = PriceFeed {
            authority: Pubkey::new_unique(),
            bump: 255,
            decimals: 8,
            latest_round_id: 0,
            answer: 0,
            updated_at: 0,
        };
        assert_eq!(
            feed.assert_published().unwrap_err(),
            PredictionError::MalformedOracleFeed.into()
        );

        feed.latest_round_id = 1;
        feed.answer = 100;
        assert!(feed.assert_published().is_ok());
    }

    #[test]
    fn window_validation_rejects_buffer_not_below_interval() {
        assert!(Config::validate_window(100, 25).is_ok());
        assert!(Config::validate_window(100, 100).is_err());
        assert!(Config::validate_window(0, 0).is_err());
        assert!(Config::validate_window(100, 0).is_err());
    }
}
