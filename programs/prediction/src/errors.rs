use anchor_lang::prelude::*;

#[error_code]
pub enum PredictionError {
    // -----------------
    // Authorization
    // -----------------
    #[msg("Caller is not the operator")]
    NotOperator,
    #[msg("Caller is not the admin")]
    NotAdmin,
    #[msg("Caller is not the owner")]
    NotOwner,
    #[msg("Caller is not the admin or the operator")]
    NotAdminOrOperator,
    #[msg("Protocol paused")]
    Paused,
    #[msg("Protocol not paused")]
    NotPaused,

    // -----------------
    // Lifecycle
    // -----------------
    #[msg("Genesis round already started")]
    GenesisAlreadyStarted,
    #[msg("Genesis round not started yet")]
    GenesisNotStarted,
    #[msg("Genesis round already locked")]
    GenesisAlreadyLocked,
    #[msg("Genesis round not locked yet")]
    GenesisNotLocked,
    #[msg("Round already locked")]
    RoundAlreadyLocked,
    #[msg("Round not locked")]
    RoundNotLocked,
    #[msg("Round already ended")]
    RoundAlreadyEnded,
    #[msg("Round rewards already calculated")]
    RewardsAlreadyCalculated,
    #[msg("Round has not started")]
    RoundNotStarted,
    #[msg("Round has not ended")]
    RoundNotOver,

    // -----------------
    // Timing
    // -----------------
    #[msg("Can only lock round after its lock timestamp")]
    TooEarlyToLock,
    #[msg("Can only lock round within buffer seconds")]
    LockBufferExceeded,
    #[msg("Can only end round after its close timestamp")]
    TooEarlyToEnd,
    #[msg("Can only end round within buffer seconds")]
    EndBufferExceeded,

    // -----------------
    // Oracle
    // -----------------
    #[msg("Oracle round id must be newer than the last recorded one")]
    OracleRoundNotNewer,
    #[msg("Oracle update exceeded max timestamp allowance")]
    OracleTimestampOutOfRange,
    #[msg("Oracle answer must be a positive price")]
    InvalidOraclePrice,
    #[msg("Oracle feed has never published a price")]
    MalformedOracleFeed,

    // -----------------
    // Ledger
    // -----------------
    #[msg("Bet must be placed on the current epoch")]
    EpochNotCurrent,
    #[msg("Round is not in its betting window")]
    RoundNotBettable,
    #[msg("Bet amount below the configured minimum")]
    BetBelowMinimum,
    #[msg("Not eligible for claim or refund")]
    NotEligible,
    #[msg("User round history is full")]
    HistoryFull,

    // -----------------
    // Claim batch shape
    // -----------------
    #[msg("Claim batch is empty or exceeds the per-call limit")]
    InvalidClaimBatch,
    #[msg("Account does not match the expected PDA for this epoch")]
    AccountMismatch,

    // -----------------
    // Configuration
    // -----------------
    #[msg("Buffer seconds must be inferior to interval seconds")]
    InvalidBufferAndInterval,
    #[msg("Treasury fee exceeds the maximum")]
    TreasuryFeeTooHigh,
    #[msg("Minimum bet amount must be superior to 0")]
    InvalidMinBetAmount,
    #[msg("Oracle update allowance must be superior to 0")]
    InvalidUpdateAllowance,
    #[msg("Cannot be the default address")]
    ZeroAddress,

    #[msg("Math overflow")]
    MathOverflow,
}
