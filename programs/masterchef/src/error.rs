use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Unknown pool or invalid staking token")]
    InvalidPool,

    #[msg("Withdraw: amount exceeds withdrawable")]
    WithdrawExceedsUnlocked,

    #[msg("Token allowance is lower than the requested amount")]
    InsufficientAllowance,

    #[msg("Token balance is lower than the requested amount")]
    InsufficientBalance,

    #[msg("Caller is not the chef admin")]
    Unauthorized,

    #[msg("Math operation overflowed or underflowed")]
    MathOverflow,

    #[msg("Lockup period does not fit a timestamp offset")]
    InvalidLockupPeriod,

    #[msg("Too many pending deposit batches for this position")]
    TooManyDepositBatches,

    #[msg("Invalid vault account")]
    InvalidVault,

    #[msg("Staking token charges a transfer fee")]
    UnsupportedMint,
}
