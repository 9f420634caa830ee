//! Scaled-integer helpers for reward-per-share bookkeeping.
//!
//! The accumulator stores reward per unit of stake multiplied by
//! [`ACC_REWARD_PRECISION`]. Every division truncates toward zero; the
//! remainders are dropped, never carried into the next accrual step.

use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

/// Scale factor applied to `acc_reward_per_share`.
pub const ACC_REWARD_PRECISION: u128 = 1_000_000_000_000;

/// Multiply then divide with a 256-bit intermediate.
pub trait CheckedMulDiv<RHS = Self> {
    type Output;

    /// `self * num / denom`, rounded down. `None` on a zero denominator or
    /// when the quotient does not fit the output type.
    fn checked_mul_div_floor(self, num: RHS, denom: RHS) -> Option<Self::Output>;
}

impl CheckedMulDiv for u128 {
    type Output = u128;

    fn checked_mul_div_floor(self, num: u128, denom: u128) -> Option<u128> {
        if denom == 0 {
            return None;
        }
        let product = U256::from(self).checked_mul(U256::from(num))?;
        let quotient = product / U256::from(denom);
        if quotient > U256::from(u128::MAX) {
            return None;
        }
        Some(quotient.as_u128())
    }
}

/// Emission owed to one pool over `elapsed_blocks`:
/// `elapsed_blocks * reward_per_block * alloc_point / total_alloc_point`.
///
/// A registry with zero total weight emits nothing.
pub fn pool_emission(
    elapsed_blocks: u64,
    reward_per_block: u64,
    alloc_point: u64,
    total_alloc_point: u64,
) -> Option<u128> {
    if total_alloc_point == 0 {
        return Some(0);
    }
    u128::from(elapsed_blocks)
        .checked_mul(u128::from(reward_per_block))?
        .checked_mul_div_floor(u128::from(alloc_point), u128::from(total_alloc_point))
}

/// Accumulator increment produced by spreading `reward` over `total_staked`.
pub fn reward_per_share(reward: u128, total_staked: u64) -> Option<u128> {
    reward.checked_mul_div_floor(ACC_REWARD_PRECISION, u128::from(total_staked))
}

/// Reward credited to `amount` of stake at accumulator value `acc_reward_per_share`.
pub fn accrued_reward(amount: u64, acc_reward_per_share: u128) -> Option<u128> {
    u128::from(amount).checked_mul_div_floor(acc_reward_per_share, ACC_REWARD_PRECISION)
}

/// `accrued_reward(amount, acc) - reward_debt`, narrowed to a token amount.
pub fn pending_reward(amount: u64, acc_reward_per_share: u128, reward_debt: u128) -> Option<u64> {
    let accrued = accrued_reward(amount, acc_reward_per_share)?;
    u64::try_from(accrued.checked_sub(reward_debt)?).ok()
}
