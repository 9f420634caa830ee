use crate::error::ErrorCode;
use crate::math::fixed_point;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// UserPosition Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive each user's position: `USER_POSITION_SEED + pool + owner`.
pub const USER_POSITION_SEED: &str = "user_position";

/// Maximum number of deposit batches a position can hold at once.
pub const MAX_DEPOSIT_BATCHES: usize = 32;

/// One deposit's worth of stake and the moment it becomes withdrawable.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositBatch {
    /// Remaining staked amount of this deposit.
    pub amount: u64,
    /// Unix timestamp from which the batch can be withdrawn.
    pub unlock_time: i64,
}

impl DepositBatch {
    pub const LEN: usize = 8 + 8;

    pub fn is_unlocked(&self, now: i64) -> bool {
        self.unlock_time <= now
    }
}

/// Stake and reward bookkeeping of a single owner in a single pool.
///
/// `batches` is a FIFO queue, oldest deposit first. Because a pool's lockup
/// never changes and timestamps never go backwards, the queue is also ordered
/// by unlock time. `total_amount` is always the sum of the batch amounts.
///
/// The account is created on first deposit and kept at zero stake.
#[account]
#[derive(Default, Debug)]
pub struct UserPosition {
    /// PDA bump for this account.
    pub bump: u8,

    /// Pool this position belongs to.
    pub pool: Pubkey,

    /// Owner of the stake.
    pub owner: Pubkey,

    /// Sum of all batch amounts.
    pub total_amount: u64,

    /// `total_amount * acc_reward_per_share / ACC_REWARD_PRECISION` at the last update.
    pub reward_debt: u128,

    /// Reward paid out to this position over its lifetime.
    pub total_harvested: u64,

    /// Pending deposits, oldest first.
    pub batches: Vec<DepositBatch>,
}

impl UserPosition {
    /// Fixed serialized size of the account (for allocation at initialization).
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 2: two Pubkeys
    /// - 8 * 2: total_amount, total_harvested
    /// - 16: reward_debt
    /// - 4 + MAX_DEPOSIT_BATCHES * DepositBatch::LEN: batch vector
    pub const LEN: usize =
        8 + 1 + 32 * 2 + 8 * 2 + 16 + 4 + MAX_DEPOSIT_BATCHES * DepositBatch::LEN;

    /// Working copy of an existing position, or an empty one for an owner
    /// who has never deposited.
    pub fn snapshot(existing: Option<&UserPosition>) -> UserPosition {
        existing.cloned().unwrap_or_default()
    }

    pub fn is_initialized(&self) -> bool {
        self.owner != Pubkey::default()
    }

    /// Reward earned since the last update, given an up-to-date accumulator.
    pub fn pending_reward(&self, acc_reward_per_share: u128) -> Result<u64> {
        fixed_point::pending_reward(self.total_amount, acc_reward_per_share, self.reward_debt)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    /// Marks everything up to `acc_reward_per_share` as paid for the current stake.
    pub fn sync_reward_debt(&mut self, acc_reward_per_share: u128) -> Result<()> {
        self.reward_debt = fixed_point::accrued_reward(self.total_amount, acc_reward_per_share)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    pub fn record_harvest(&mut self, reward: u64) -> Result<()> {
        self.total_harvested = self
            .total_harvested
            .checked_add(reward)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    /// Queues a new deposit made at `now`.
    ///
    /// A deposit unlocking at the same instant as the newest batch is folded
    /// into it. When the queue is full, the batches already unlocked at `now`
    /// are first collapsed into a single front batch.
    pub fn push_batch(&mut self, amount: u64, unlock_time: i64, now: i64) -> Result<()> {
        require_gt!(amount, 0, ErrorCode::InvalidAmount);
        let total_amount = self
            .total_amount
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;

        if self.batches.len() >= MAX_DEPOSIT_BATCHES
            && self.batches.last().map(|b| b.unlock_time) != Some(unlock_time)
        {
            self.compact_unlocked(now)?;
        }

        match self.batches.last_mut() {
            Some(newest) if newest.unlock_time == unlock_time => {
                newest.amount = newest
                    .amount
                    .checked_add(amount)
                    .ok_or(ErrorCode::MathOverflow)?;
            }
            _ => {
                require!(
                    self.batches.len() < MAX_DEPOSIT_BATCHES,
                    ErrorCode::TooManyDepositBatches
                );
                self.batches.push(DepositBatch {
                    amount,
                    unlock_time,
                });
            }
        }
        self.total_amount = total_amount;
        Ok(())
    }

    /// Folds the leading run of batches unlocked at `now` into its last batch.
    fn compact_unlocked(&mut self, now: i64) -> Result<()> {
        let run = self
            .batches
            .iter()
            .take_while(|batch| batch.is_unlocked(now))
            .count();
        if run < 2 {
            return Ok(());
        }
        let amount = self.batches[..run]
            .iter()
            .try_fold(0u64, |sum, batch| sum.checked_add(batch.amount))
            .ok_or(ErrorCode::MathOverflow)?;
        self.batches.drain(..run - 1);
        self.batches[0].amount = amount;
        Ok(())
    }

    /// Stake that can be withdrawn at `now`: the leading run of unlocked batches.
    pub fn withdrawable_amount(&self, now: i64) -> u64 {
        self.batches
            .iter()
            .take_while(|batch| batch.is_unlocked(now))
            .fold(0u64, |sum, batch| sum.saturating_add(batch.amount))
    }

    /// Removes `amount` of unlocked stake, oldest batch first.
    ///
    /// Fully consumed batches are dropped from the front; the last one touched
    /// keeps its remainder in place.
    pub fn consume_unlocked(&mut self, amount: u64, now: i64) -> Result<()> {
        require_gt!(amount, 0, ErrorCode::InvalidAmount);
        require_gte!(
            self.withdrawable_amount(now),
            amount,
            ErrorCode::WithdrawExceedsUnlocked
        );

        let mut remaining = amount;
        let mut emptied = 0;
        for batch in self.batches.iter_mut() {
            if remaining == 0 {
                break;
            }
            if batch.amount <= remaining {
                remaining -= batch.amount;
                emptied += 1;
            } else {
                batch.amount -= remaining;
                remaining = 0;
            }
        }
        self.batches.drain(..emptied);
        self.total_amount = self
            .total_amount
            .checked_sub(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(batches: &[(u64, i64)]) -> UserPosition {
        let mut position = UserPosition::default();
        for &(amount, unlock_time) in batches {
            position.push_batch(amount, unlock_time, 0).unwrap();
        }
        position
    }

    #[test]
    fn len_covers_full_queue() {
        let mut full = UserPosition {
            owner: Pubkey::new_unique(),
            pool: Pubkey::new_unique(),
            ..UserPosition::default()
        };
        for i in 0..MAX_DEPOSIT_BATCHES {
            full.push_batch(1, i as i64, -1).unwrap();
        }
        let mut data = Vec::new();
        full.try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), UserPosition::LEN);
    }

    #[test]
    fn same_unlock_time_is_merged() {
        let p = position(&[(50, 10), (30, 10), (20, 11)]);
        assert_eq!(
            p.batches,
            vec![
                DepositBatch {
                    amount: 80,
                    unlock_time: 10
                },
                DepositBatch {
                    amount: 20,
                    unlock_time: 11
                },
            ]
        );
        assert_eq!(p.total_amount, 100);
    }

    #[test]
    fn queue_is_bounded() {
        let mut p = UserPosition::default();
        for i in 0..MAX_DEPOSIT_BATCHES {
            p.push_batch(1, i as i64, -1).unwrap();
        }
        assert_eq!(
            p.push_batch(1, 1_000, -1).unwrap_err(),
            error!(ErrorCode::TooManyDepositBatches)
        );
        // merging into the newest batch still works when full
        p.push_batch(5, (MAX_DEPOSIT_BATCHES - 1) as i64, -1).unwrap();
        assert_eq!(p.total_amount, MAX_DEPOSIT_BATCHES as u64 + 5);
    }

    #[test]
    fn full_queue_collapses_unlocked_head() {
        let mut p = UserPosition::default();
        for i in 0..MAX_DEPOSIT_BATCHES {
            p.push_batch(1, i as i64 * 10, -1).unwrap();
        }
        // batches unlocking at 0, 10 and 20 are free at 25
        p.push_batch(7, 1_000, 25).unwrap();
        assert_eq!(p.batches.len(), MAX_DEPOSIT_BATCHES - 1);
        assert_eq!(
            p.batches[0],
            DepositBatch {
                amount: 3,
                unlock_time: 20
            }
        );
        assert_eq!(p.batches[1].unlock_time, 30);
        assert_eq!(p.batches.last().map(|b| b.amount), Some(7));
        assert_eq!(p.total_amount, MAX_DEPOSIT_BATCHES as u64 + 7);
        assert_eq!(p.withdrawable_amount(25), 3);
        assert_eq!(p.withdrawable_amount(30), 4);
    }

    #[test]
    fn withdrawable_follows_unlock_times() {
        let p = position(&[(50, 1_000), (50, 1_900)]);
        assert_eq!(p.withdrawable_amount(999), 0);
        assert_eq!(p.withdrawable_amount(1_000), 50);
        assert_eq!(p.withdrawable_amount(1_899), 50);
        assert_eq!(p.withdrawable_amount(1_900), 100);
    }

    #[test]
    fn consume_pops_front_and_trims_partial_batch() {
        let mut p = position(&[(50, 1), (30, 2), (20, 3)]);
        p.consume_unlocked(60, 10).unwrap();
        assert_eq!(
            p.batches,
            vec![
                DepositBatch {
                    amount: 20,
                    unlock_time: 2
                },
                DepositBatch {
                    amount: 20,
                    unlock_time: 3
                },
            ]
        );
        assert_eq!(p.total_amount, 40);

        p.consume_unlocked(40, 10).unwrap();
        assert!(p.batches.is_empty());
        assert_eq!(p.total_amount, 0);
    }

    #[test]
    fn consume_rejects_locked_stake() {
        let mut p = position(&[(50, 1), (50, 100)]);
        let before = p.clone();
        assert_eq!(
            p.consume_unlocked(51, 10).unwrap_err(),
            error!(ErrorCode::WithdrawExceedsUnlocked)
        );
        assert_eq!(
            p.consume_unlocked(0, 10).unwrap_err(),
            error!(ErrorCode::InvalidAmount)
        );
        assert_eq!(p.batches, before.batches);
        assert_eq!(p.total_amount, before.total_amount);
    }

    #[test]
    fn snapshot_of_missing_position_is_empty() {
        let empty = UserPosition::snapshot(None);
        assert!(!empty.is_initialized());
        assert_eq!(empty.total_amount, 0);
        assert_eq!(empty.withdrawable_amount(i64::MAX), 0);

        let existing = position(&[(5, 0)]);
        let copy = UserPosition::snapshot(Some(&existing));
        assert_eq!(copy.batches, existing.batches);
        assert_eq!(copy.total_amount, 5);
    }

    #[test]
    fn debt_tracks_total_amount() {
        let mut p = position(&[(100, 0)]);
        p.sync_reward_debt(3 * crate::math::ACC_REWARD_PRECISION).unwrap();
        assert_eq!(p.reward_debt, 300);
        assert_eq!(
            p.pending_reward(4 * crate::math::ACC_REWARD_PRECISION)
                .unwrap(),
            100
        );
    }
}
