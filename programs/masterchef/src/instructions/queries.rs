use crate::error::ErrorCode;
use crate::ledger;
use crate::states::*;
use crate::utils::read_all_pools;
use anchor_lang::prelude::*;

//
// Read-only views. Values travel back through return data; no account is
// written, and pools are never settled here.
//

/// A user's position in one pool. `user_position` is omitted for a user
/// who never deposited, and every view then reports zero.
#[derive(Accounts)]
pub struct UserQuery<'info> {
    /// Chef registry (emission constants).
    #[account(
        seeds = [CHEF_CONFIG_SEED.as_bytes()],
        bump = chef_config.bump,
    )]
    pub chef_config: Account<'info, ChefConfig>,

    /// Pool being queried.
    #[account(
        seeds = [POOL_SEED.as_bytes(), pool.id.to_le_bytes().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    /// User whose position is read.
    ///
    /// CHECK: only the key is compared against the position.
    pub user: UncheckedAccount<'info>,

    /// The user's position, if any.
    #[account(
        constraint = user_position.pool == pool.key() @ ErrorCode::InvalidPool,
        constraint = user_position.owner == user.key() @ ErrorCode::InvalidPool,
    )]
    pub user_position: Option<Account<'info, UserPosition>>,
}

/// Reward the user could harvest right now.
pub fn pending_rewards(ctx: Context<UserQuery>) -> Result<u64> {
    let Some(position) = ctx.accounts.user_position.as_ref() else {
        return Ok(0);
    };
    let clock = Clock::get()?;
    ledger::pending_rewards(
        &ctx.accounts.pool,
        position,
        clock.slot,
        &ctx.accounts.chef_config.schedule(),
    )
}

/// Stake the user could withdraw right now.
pub fn withdrawable_balance(ctx: Context<UserQuery>) -> Result<u64> {
    let Some(position) = ctx.accounts.user_position.as_ref() else {
        return Ok(0);
    };
    let clock = Clock::get()?;
    Ok(position.withdrawable_amount(clock.unix_timestamp))
}

/// Everything the user has staked in the pool, locked or not.
pub fn get_user_total_deposit(ctx: Context<UserQuery>) -> Result<u64> {
    Ok(ctx
        .accounts
        .user_position
        .as_ref()
        .map_or(0, |position| position.total_amount))
}

#[derive(Accounts)]
pub struct PoolQuery<'info> {
    /// Pool being queried.
    #[account(
        seeds = [POOL_SEED.as_bytes(), pool.id.to_le_bytes().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,
}

pub fn get_pool_tvl(ctx: Context<PoolQuery>) -> Result<u64> {
    Ok(ctx.accounts.pool.total_staked)
}

/// Every pool follows as a remaining account, in id order.
#[derive(Accounts)]
pub struct RegistryQuery<'info> {
    /// Chef registry.
    #[account(
        seeds = [CHEF_CONFIG_SEED.as_bytes()],
        bump = chef_config.bump,
    )]
    pub chef_config: Account<'info, ChefConfig>,
}

/// Staked amount of every pool, indexed by pool id.
pub fn get_all_pools_tvl(ctx: Context<RegistryQuery>) -> Result<Vec<u64>> {
    let pools = read_all_pools(ctx.remaining_accounts, ctx.accounts.chef_config.pool_count)?;
    Ok(pools.iter().map(|pool| pool.total_staked).collect())
}
