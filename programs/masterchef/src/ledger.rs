//! Account-independent deposit, withdraw and harvest bookkeeping.
//!
//! Handlers load a pool and a position, clone them, run one of these
//! functions on the clones with the slot and timestamp of the current
//! `Clock`, move tokens, and only then write the clones back. Nothing in here
//! touches an `AccountInfo`, so the whole ledger can be driven from plain
//! tests with hand-picked clocks.

use crate::error::ErrorCode;
use crate::states::{EmissionSchedule, Pool, UserPosition};
use anchor_lang::prelude::*;

/// Block index and wall-clock of one call.
///
/// Accrual follows `block`; lockups follow `timestamp`. The two never stand
/// in for each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChefClock {
    pub block: u64,
    pub timestamp: i64,
}

impl ChefClock {
    pub fn new(block: u64, timestamp: i64) -> Self {
        Self { block, timestamp }
    }
}

impl From<&Clock> for ChefClock {
    fn from(clock: &Clock) -> Self {
        Self {
            block: clock.slot,
            timestamp: clock.unix_timestamp,
        }
    }
}

/// Result of a deposit: reward to pay out and the new batch's unlock time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositReceipt {
    pub reward: u64,
    pub unlock_time: i64,
}

/// Settles `pool`, pays out pending reward and queues `amount` as a new batch.
pub fn deposit(
    pool: &mut Pool,
    position: &mut UserPosition,
    amount: u64,
    clock: ChefClock,
    schedule: &EmissionSchedule,
) -> Result<DepositReceipt> {
    require_gt!(amount, 0, ErrorCode::InvalidAmount);

    pool.settle(clock.block, schedule)?;
    let reward = if position.total_amount > 0 {
        position.pending_reward(pool.acc_reward_per_share)?
    } else {
        0
    };

    let unlock_time = pool.unlock_time(clock.timestamp)?;
    position.push_batch(amount, unlock_time, clock.timestamp)?;
    pool.add_stake(amount)?;
    position.sync_reward_debt(pool.acc_reward_per_share)?;
    position.record_harvest(reward)?;

    Ok(DepositReceipt {
        reward,
        unlock_time,
    })
}

/// Settles `pool`, pays out pending reward and releases `amount` of unlocked
/// stake. Returns the reward.
///
/// Both guards run before the pool is touched, so a rejected withdrawal
/// leaves the pool and position exactly as they were.
pub fn withdraw(
    pool: &mut Pool,
    position: &mut UserPosition,
    amount: u64,
    clock: ChefClock,
    schedule: &EmissionSchedule,
) -> Result<u64> {
    require_gt!(amount, 0, ErrorCode::InvalidAmount);
    require_gte!(
        position.withdrawable_amount(clock.timestamp),
        amount,
        ErrorCode::WithdrawExceedsUnlocked
    );

    pool.settle(clock.block, schedule)?;
    let reward = position.pending_reward(pool.acc_reward_per_share)?;

    position.consume_unlocked(amount, clock.timestamp)?;
    pool.remove_stake(amount)?;
    position.sync_reward_debt(pool.acc_reward_per_share)?;
    position.record_harvest(reward)?;

    Ok(reward)
}

/// Settles `pool` and pays out pending reward. The batches are not touched.
pub fn harvest(
    pool: &mut Pool,
    position: &mut UserPosition,
    clock: ChefClock,
    schedule: &EmissionSchedule,
) -> Result<u64> {
    pool.settle(clock.block, schedule)?;
    let reward = position.pending_reward(pool.acc_reward_per_share)?;
    position.sync_reward_debt(pool.acc_reward_per_share)?;
    position.record_harvest(reward)?;
    Ok(reward)
}

/// Reward `position` could harvest at `current_block`, computed without
/// settling the pool.
pub fn pending_rewards(
    pool: &Pool,
    position: &UserPosition,
    current_block: u64,
    schedule: &EmissionSchedule,
) -> Result<u64> {
    if position.total_amount == 0 {
        return Ok(0);
    }
    let acc_reward_per_share = pool.projected_acc_reward_per_share(current_block, schedule)?;
    position.pending_reward(acc_reward_per_share)
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: u64 = 1_000;

    fn schedule() -> EmissionSchedule {
        EmissionSchedule {
            start_block: START,
            reward_per_block: 10,
            total_alloc_point: 1_000,
        }
    }

    fn pool(lockup_period: u64) -> Pool {
        Pool {
            alloc_point: 1_000,
            lockup_period,
            last_accrual_block: START,
            ..Pool::default()
        }
    }

    #[test]
    fn ten_blocks_of_single_staker_emission() {
        let mut p = pool(0);
        let mut user = UserPosition::default();
        let at = ChefClock::new(START + 5, 50);

        let receipt = deposit(&mut p, &mut user, 100, at, &schedule()).unwrap();
        assert_eq!(receipt.reward, 0);
        assert_eq!(receipt.unlock_time, 50);

        assert_eq!(
            pending_rewards(&p, &user, START + 15, &schedule()).unwrap(),
            100
        );
        // queries do not settle
        assert_eq!(p.last_accrual_block, START + 5);

        let later = ChefClock::new(START + 16, 62);
        let reward = withdraw(&mut p, &mut user, 100, later, &schedule()).unwrap();
        assert_eq!(reward, 110);
        assert_eq!(user.total_harvested, 110);
        assert_eq!(p.total_staked, 0);
        assert_eq!(user.reward_debt, 0);
        assert!(user.batches.is_empty());
    }

    #[test]
    fn second_deposit_pays_out_first() {
        let mut p = pool(0);
        let mut user = UserPosition::default();
        deposit(&mut p, &mut user, 100, ChefClock::new(START, 0), &schedule()).unwrap();
        let receipt =
            deposit(&mut p, &mut user, 50, ChefClock::new(START + 3, 3), &schedule()).unwrap();
        assert_eq!(receipt.reward, 30);
        assert_eq!(user.total_amount, 150);
        assert_eq!(p.total_staked, 150);
        assert_eq!(
            pending_rewards(&p, &user, START + 3, &schedule()).unwrap(),
            0
        );
    }

    #[test]
    fn harvest_twice_in_one_block_pays_once() {
        let mut p = pool(0);
        let mut user = UserPosition::default();
        deposit(&mut p, &mut user, 10, ChefClock::new(START, 0), &schedule()).unwrap();

        let at = ChefClock::new(START + 4, 8);
        assert_eq!(harvest(&mut p, &mut user, at, &schedule()).unwrap(), 40);
        assert_eq!(harvest(&mut p, &mut user, at, &schedule()).unwrap(), 0);
        assert_eq!(user.total_amount, 10);
        assert_eq!(user.batches.len(), 1);
    }

    #[test]
    fn locked_withdrawal_changes_nothing() {
        let mut p = pool(1_000);
        let mut user = UserPosition::default();
        deposit(&mut p, &mut user, 50, ChefClock::new(START, 0), &schedule()).unwrap();
        deposit(&mut p, &mut user, 50, ChefClock::new(START + 9, 900), &schedule()).unwrap();

        let pool_before = p.clone();
        let user_before = user.clone();
        let err = withdraw(
            &mut p,
            &mut user,
            51,
            ChefClock::new(START + 10, 1_000),
            &schedule(),
        )
        .unwrap_err();
        assert_eq!(err, error!(ErrorCode::WithdrawExceedsUnlocked));
        assert_eq!(p.last_accrual_block, pool_before.last_accrual_block);
        assert_eq!(p.acc_reward_per_share, pool_before.acc_reward_per_share);
        assert_eq!(p.total_staked, pool_before.total_staked);
        assert_eq!(user.batches, user_before.batches);
        assert_eq!(user.reward_debt, user_before.reward_debt);

        withdraw(
            &mut p,
            &mut user,
            50,
            ChefClock::new(START + 10, 1_000),
            &schedule(),
        )
        .unwrap();
        withdraw(
            &mut p,
            &mut user,
            50,
            ChefClock::new(START + 19, 1_900),
            &schedule(),
        )
        .unwrap();
        assert_eq!(user.total_amount, 0);
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let mut p = pool(0);
        let mut user = UserPosition::default();
        let at = ChefClock::new(START, 0);
        assert_eq!(
            deposit(&mut p, &mut user, 0, at, &schedule()).unwrap_err(),
            error!(ErrorCode::InvalidAmount)
        );
        assert_eq!(
            withdraw(&mut p, &mut user, 0, at, &schedule()).unwrap_err(),
            error!(ErrorCode::InvalidAmount)
        );
    }

    #[test]
    fn empty_position_has_nothing_pending() {
        let mut p = pool(0);
        let mut other = UserPosition::default();
        deposit(&mut p, &mut other, 10, ChefClock::new(START, 0), &schedule()).unwrap();
        let idle = UserPosition::default();
        assert_eq!(
            pending_rewards(&p, &idle, START + 100, &schedule()).unwrap(),
            0
        );
    }

    #[test]
    fn owner_without_position_harvests_zero_and_cannot_withdraw() {
        let mut p = pool(0);
        let mut other = UserPosition::default();
        deposit(&mut p, &mut other, 10, ChefClock::new(START, 0), &schedule()).unwrap();

        let at = ChefClock::new(START + 5, 5);
        let mut stranger = UserPosition::snapshot(None);
        assert_eq!(harvest(&mut p, &mut stranger, at, &schedule()).unwrap(), 0);
        assert_eq!(p.last_accrual_block, START + 5);

        let mut stranger = UserPosition::snapshot(None);
        assert_eq!(
            withdraw(&mut p, &mut stranger, 1, at, &schedule()).unwrap_err(),
            error!(ErrorCode::WithdrawExceedsUnlocked)
        );
    }

    #[test]
    fn unlocked_deposits_never_fill_the_queue() {
        let mut p = pool(0);
        let mut user = UserPosition::default();
        for i in 0..40u64 {
            let at = ChefClock::new(START + i, i as i64);
            deposit(&mut p, &mut user, 1, at, &schedule()).unwrap();
        }
        assert_eq!(user.total_amount, 40);
        assert_eq!(p.total_staked, 40);
        assert!(user.batches.len() <= crate::states::MAX_DEPOSIT_BATCHES);
        assert_eq!(user.withdrawable_amount(39), 40);

        withdraw(&mut p, &mut user, 40, ChefClock::new(START + 40, 40), &schedule()).unwrap();
        assert!(user.batches.is_empty());
    }

    #[test]
    fn clock_conversion_keeps_both_axes() {
        let clock = Clock {
            slot: 42,
            unix_timestamp: 1_700_000_000,
            ..Clock::default()
        };
        assert_eq!(ChefClock::from(&clock), ChefClock::new(42, 1_700_000_000));
    }
}
