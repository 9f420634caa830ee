use crate::error::ErrorCode;
use crate::math::fixed_point;
use crate::states::EmissionSchedule;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Pool Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive pool accounts: `POOL_SEED + id (le bytes)`.
pub const POOL_SEED: &str = "pool";

/// PDA seed string used to derive the stake vault of a pool: `STAKE_VAULT_SEED + pool`.
pub const STAKE_VAULT_SEED: &str = "stake_vault";

/// One stakeable-token bucket with its own weight and lockup rule.
///
/// The accumulator `acc_reward_per_share` only ever grows. `total_staked`
/// always equals the sum of `total_amount` over every position of the pool.
#[account]
#[derive(Default, Debug)]
pub struct Pool {
    /// PDA bump for this account.
    pub bump: u8,

    /// Stable ordinal assigned at creation.
    pub id: u64,

    /// Token accepted by this pool.
    pub staking_mint: Pubkey,

    /// Program-owned token account custodying the pool's stake.
    pub stake_vault: Pubkey,

    /// Weight of this pool in the emission split.
    pub alloc_point: u64,

    /// Seconds a deposit stays locked. Fixed at creation.
    pub lockup_period: u64,

    /// Slot up to which `acc_reward_per_share` is current.
    pub last_accrual_block: u64,

    /// Cumulative reward per unit of stake, scaled by `ACC_REWARD_PRECISION`.
    pub acc_reward_per_share: u128,

    /// Sum of all non-withdrawn deposits.
    pub total_staked: u64,
}

impl Pool {
    /// Fixed serialized size of the account (for allocation at initialization).
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 8: id
    /// - 32 * 2: two Pubkeys
    /// - 8 * 4: alloc_point, lockup_period, last_accrual_block, total_staked
    /// - 16: one u128 accumulator
    pub const LEN: usize = 8 + 1 + 8 + 32 * 2 + 8 * 4 + 16;

    /// Accumulator value the pool would hold if settled at `current_block`.
    ///
    /// Pure: used by read-only queries so that nothing is persisted.
    pub fn projected_acc_reward_per_share(
        &self,
        current_block: u64,
        schedule: &EmissionSchedule,
    ) -> Result<u128> {
        if current_block <= self.last_accrual_block || self.total_staked == 0 {
            return Ok(self.acc_reward_per_share);
        }
        let elapsed_blocks = current_block - self.last_accrual_block;
        let emission = fixed_point::pool_emission(
            elapsed_blocks,
            schedule.reward_per_block,
            self.alloc_point,
            schedule.total_alloc_point,
        )
        .ok_or(ErrorCode::MathOverflow)?;
        let increment = fixed_point::reward_per_share(emission, self.total_staked)
            .ok_or(ErrorCode::MathOverflow)?;
        self.acc_reward_per_share
            .checked_add(increment)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    /// Brings the accumulator up to `current_block`.
    ///
    /// Emission over slots with nothing staked is not recorded anywhere.
    pub fn settle(&mut self, current_block: u64, schedule: &EmissionSchedule) -> Result<()> {
        if current_block <= self.last_accrual_block {
            return Ok(());
        }
        self.acc_reward_per_share = self.projected_acc_reward_per_share(current_block, schedule)?;
        self.last_accrual_block = current_block;
        #[cfg(feature = "enable-log")]
        msg!(
            "pool {} settled at block {}: acc_reward_per_share={}",
            self.id,
            current_block,
            self.acc_reward_per_share
        );
        Ok(())
    }

    /// Lockup expressed as a signed offset for unix timestamps.
    pub fn lockup_offset(&self) -> Result<i64> {
        i64::try_from(self.lockup_period).map_err(|_| error!(ErrorCode::InvalidLockupPeriod))
    }

    /// Unlock time of a batch deposited at `now`.
    pub fn unlock_time(&self, now: i64) -> Result<i64> {
        now.checked_add(self.lockup_offset()?)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    pub fn add_stake(&mut self, amount: u64) -> Result<()> {
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    pub fn remove_stake(&mut self, amount: u64) -> Result<()> {
        self.total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ACC_REWARD_PRECISION;

    fn schedule(total_alloc_point: u64) -> EmissionSchedule {
        EmissionSchedule {
            start_block: 100,
            reward_per_block: 10,
            total_alloc_point,
        }
    }

    fn pool(alloc_point: u64, last_accrual_block: u64, total_staked: u64) -> Pool {
        Pool {
            alloc_point,
            last_accrual_block,
            total_staked,
            ..Pool::default()
        }
    }

    #[test]
    fn settle_is_noop_at_or_before_last_accrual() {
        let mut p = pool(1000, 150, 100);
        p.settle(150, &schedule(1000)).unwrap();
        p.settle(120, &schedule(1000)).unwrap();
        assert_eq!(p.last_accrual_block, 150);
        assert_eq!(p.acc_reward_per_share, 0);
    }

    #[test]
    fn empty_pool_only_advances_block() {
        let mut p = pool(1000, 100, 0);
        p.settle(130, &schedule(1000)).unwrap();
        assert_eq!(p.last_accrual_block, 130);
        assert_eq!(p.acc_reward_per_share, 0);

        // emission of the empty stretch is not banked for later stakers
        p.total_staked = 100;
        p.settle(131, &schedule(1000)).unwrap();
        assert_eq!(p.acc_reward_per_share, 10 * ACC_REWARD_PRECISION / 100);
    }

    #[test]
    fn settle_accrues_weighted_emission() {
        let mut p = pool(500, 100, 1_000);
        p.settle(400, &schedule(1500)).unwrap();
        // 300 blocks * 10 * 500 / 1500 = 1000 reward over 1000 stake
        assert_eq!(p.acc_reward_per_share, ACC_REWARD_PRECISION);
        assert_eq!(p.last_accrual_block, 400);
    }

    #[test]
    fn projection_matches_settlement_without_mutating() {
        let mut p = pool(1000, 100, 3);
        let projected = p.projected_acc_reward_per_share(107, &schedule(1000)).unwrap();
        assert_eq!(p.acc_reward_per_share, 0);
        p.settle(107, &schedule(1000)).unwrap();
        assert_eq!(p.acc_reward_per_share, projected);
    }

    #[test]
    fn unlock_time_rejects_oversized_lockup() {
        let mut p = pool(1, 0, 0);
        p.lockup_period = 1_000;
        assert_eq!(p.unlock_time(5).unwrap(), 1_005);
        p.lockup_period = u64::MAX;
        assert_eq!(
            p.unlock_time(5).unwrap_err(),
            error!(ErrorCode::InvalidLockupPeriod)
        );
    }
}
