use crate::states::*;
use crate::utils::settle_all_pools;
use anchor_lang::prelude::*;

/// Permissionless settlement of a single pool.
#[derive(Accounts)]
pub struct UpdatePool<'info> {
    /// Chef registry.
    #[account(
        seeds = [CHEF_CONFIG_SEED.as_bytes()],
        bump = chef_config.bump,
    )]
    pub chef_config: Account<'info, ChefConfig>,

    /// Pool to settle.
    #[account(
        mut,
        seeds = [POOL_SEED.as_bytes(), pool.id.to_le_bytes().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,
}

pub fn update_pool(ctx: Context<UpdatePool>) -> Result<()> {
    let clock = Clock::get()?;
    let schedule = ctx.accounts.chef_config.schedule();

    let pool = &mut ctx.accounts.pool;
    pool.settle(clock.slot, &schedule)?;

    emit!(PoolUpdated {
        pool_id: pool.id,
        last_accrual_block: pool.last_accrual_block,
        acc_reward_per_share: pool.acc_reward_per_share,
        total_staked: pool.total_staked,
    });

    Ok(())
}

/// Settles every pool. All pools follow as writable remaining accounts, in
/// id order.
#[derive(Accounts)]
pub struct MassUpdatePools<'info> {
    /// Chef registry.
    #[account(
        seeds = [CHEF_CONFIG_SEED.as_bytes()],
        bump = chef_config.bump,
    )]
    pub chef_config: Account<'info, ChefConfig>,
}

pub fn mass_update_pools(ctx: Context<MassUpdatePools>) -> Result<()> {
    let clock = Clock::get()?;
    let chef_config = &ctx.accounts.chef_config;

    let pools = settle_all_pools(
        ctx.remaining_accounts,
        chef_config.pool_count,
        clock.slot,
        &chef_config.schedule(),
    )?;
    msg!("Settled {} pools at slot {}", pools.len(), clock.slot);

    for pool in pools {
        emit!(PoolUpdated {
            pool_id: pool.id,
            last_accrual_block: pool.last_accrual_block,
            acc_reward_per_share: pool.acc_reward_per_share,
            total_staked: pool.total_staked,
        });
    }

    Ok(())
}
