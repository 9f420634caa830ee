use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track ledger changes
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when the chef registry is created.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct ChefInitialized {
    /// Administrator of the registry.
    pub admin: Pubkey,
    /// Mint paid out as reward.
    pub reward_mint: Pubkey,
    /// Token account paying out rewards.
    pub reward_vault: Pubkey,
    /// First slot of emission.
    pub start_block: u64,
    /// Reward emitted per slot across all pools.
    pub reward_per_block: u64,
}

/// Emitted when the admin appends a pool to the registry.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PoolAdded {
    pub pool_id: u64,
    pub pool: Pubkey,
    pub staking_mint: Pubkey,
    pub alloc_point: u64,
    pub lockup_period: u64,
    /// Registry weight after the addition.
    pub total_alloc_point: u64,
}

/// Emitted whenever a pool's accumulator is brought forward by an explicit update.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PoolUpdated {
    pub pool_id: u64,
    pub last_accrual_block: u64,
    pub acc_reward_per_share: u128,
    pub total_staked: u64,
}

/// Emitted after a deposit is queued.
///
/// `reward` is the pending reward paid out alongside the deposit.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Deposited {
    pub owner: Pubkey,
    pub pool_id: u64,
    pub amount: u64,
    /// Unix timestamp at which the new batch unlocks.
    pub unlock_time: i64,
    pub reward: u64,
}

/// Emitted after unlocked stake is returned to its owner.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Withdrawn {
    pub owner: Pubkey,
    pub pool_id: u64,
    pub amount: u64,
    pub reward: u64,
}

/// Emitted when pending reward is claimed without touching the stake.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Harvested {
    pub owner: Pubkey,
    pub pool_id: u64,
    pub reward: u64,
}

/// Emitted when reward tokens are moved into the reward vault.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardsFunded {
    pub funder: Pubkey,
    pub amount: u64,
    /// Reward vault balance after the transfer.
    pub vault_balance: u64,
}

/// Emitted when the administrative role changes hands.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct AdminUpdated {
    pub previous_admin: Pubkey,
    pub new_admin: Pubkey,
}
