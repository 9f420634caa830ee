use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Chef Configuration Account (pool registry)
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive the chef configuration account.
pub const CHEF_CONFIG_SEED: &str = "chef_config";

/// Registry of the whole staking program.
///
/// Created once by `initialise_chef`. Holds the emission schedule, the reward
/// vault address and the aggregate pool weights. Pools themselves live in
/// their own accounts, addressed by id in `0..pool_count`.
#[account]
#[derive(Default, Debug)]
pub struct ChefConfig {
    /// PDA bump for this account (for seed derivation).
    pub bump: u8,

    /// Administrator allowed to add pools and hand over the role.
    pub admin: Pubkey,

    /// Mint of the token paid out as reward.
    pub reward_mint: Pubkey,

    /// Program-owned token account paying out rewards.
    pub reward_vault: Pubkey,

    /// First slot at which emission starts. Immutable.
    pub start_block: u64,

    /// Reward tokens emitted per slot across all pools. Immutable.
    pub reward_per_block: u64,

    /// Sum of `alloc_point` across every pool.
    pub total_alloc_point: u64,

    /// Number of pools created so far; the next pool gets this id.
    pub pool_count: u64,
}

impl ChefConfig {
    /// Fixed serialized size of the account (for allocation at initialization).
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 3: three Pubkeys
    /// - 8 * 4: four u64 fields
    pub const LEN: usize = 8 + 1 + 32 * 3 + 8 * 4;

    pub fn schedule(&self) -> EmissionSchedule {
        EmissionSchedule {
            start_block: self.start_block,
            reward_per_block: self.reward_per_block,
            total_alloc_point: self.total_alloc_point,
        }
    }
}

/// Registry-wide inputs of the accrual formula.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmissionSchedule {
    pub start_block: u64,
    pub reward_per_block: u64,
    pub total_alloc_point: u64,
}

impl EmissionSchedule {
    /// Accrual block a pool created at `current_block` starts from.
    pub fn first_accrual_block(&self, current_block: u64) -> u64 {
        current_block.max(self.start_block)
    }
}
