use anchor_lang::prelude::*;

declare_id!("FmFHgdN7a2QxSmMGQp1Mk8esH4hLgNHcHZ3pPnzYiiMu");

/// Deployment key allowed to run `initialise_chef`.
pub mod admin {
    use anchor_lang::prelude::declare_id;
    #[cfg(feature = "devnet")]
    declare_id!("Ek51onW6cbs8q9sskXD2LooXBbaGUfn6uR7Y2XaUw5ZJ");
    #[cfg(not(feature = "devnet"))]
    declare_id!("3kVxBTGQKuuCDh7RUKyq8JDtpZR6o9b9BXjeBXFzZdQm");
}

pub const AUTH_SEED: &str = "chef_vault_auth";
pub const REWARD_VAULT_SEED: &str = "reward_vault";

pub mod error;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod states;
pub mod utils;

use instructions::*;

#[program]
pub mod masterchef {

    use super::*;

    pub fn initialise_chef(
        ctx: Context<InitialiseChef>,
        admin: Pubkey,
        start_block: u64,
        reward_per_block: u64,
    ) -> Result<()> {
        instructions::initialise_chef(ctx, admin, start_block, reward_per_block)
    }

    pub fn add_pool(
        ctx: Context<AddPool>,
        alloc_point: u64,
        lockup_period: u64,
        with_update: bool,
    ) -> Result<()> {
        instructions::add_pool(ctx, alloc_point, lockup_period, with_update)
    }

    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit(ctx, amount)
    }

    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw(ctx, amount)
    }

    pub fn harvest(ctx: Context<Harvest>) -> Result<()> {
        instructions::harvest(ctx)
    }

    pub fn update_pool(ctx: Context<UpdatePool>) -> Result<()> {
        instructions::update_pool(ctx)
    }

    pub fn mass_update_pools(ctx: Context<MassUpdatePools>) -> Result<()> {
        instructions::mass_update_pools(ctx)
    }

    pub fn fund_rewards(ctx: Context<FundRewards>, amount: u64) -> Result<()> {
        instructions::fund_rewards(ctx, amount)
    }

    pub fn update_admin(ctx: Context<UpdateAdmin>, new_admin: Pubkey) -> Result<()> {
        instructions::update_admin(ctx, new_admin)
    }

    pub fn pending_rewards(ctx: Context<UserQuery>) -> Result<u64> {
        instructions::pending_rewards(ctx)
    }

    pub fn withdrawable_balance(ctx: Context<UserQuery>) -> Result<u64> {
        instructions::withdrawable_balance(ctx)
    }

    pub fn get_user_total_deposit(ctx: Context<UserQuery>) -> Result<u64> {
        instructions::get_user_total_deposit(ctx)
    }

    pub fn get_pool_tvl(ctx: Context<PoolQuery>) -> Result<u64> {
        instructions::get_pool_tvl(ctx)
    }

    pub fn get_all_pools_tvl(ctx: Context<RegistryQuery>) -> Result<Vec<u64>> {
        instructions::get_all_pools_tvl(ctx)
    }
}
