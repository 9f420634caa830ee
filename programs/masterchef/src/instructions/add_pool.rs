use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{ensure_fee_free_mint, settle_all_pools};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `add_pool`.
///
/// When `with_update` is set, every existing pool must follow as a writable
/// remaining account, in id order.
#[derive(Accounts)]
pub struct AddPool<'info> {
    /// Chef admin; pays for the pool and its vault.
    #[account(
        mut,
        constraint = owner.key() == chef_config.admin @ ErrorCode::Unauthorized
    )]
    pub owner: Signer<'info>,

    /// Program authority PDA, owner of the stake vault.
    ///
    /// CHECK: PDA derivation enforced via seeds. Used as Pubkey only.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    /// Chef registry (pool count and total weight are updated).
    #[account(
        mut,
        seeds = [CHEF_CONFIG_SEED.as_bytes()],
        bump = chef_config.bump,
    )]
    pub chef_config: Account<'info, ChefConfig>,

    /// Token the new pool accepts; must not charge transfer fees.
    #[account(mint::token_program = token_program)]
    pub staking_mint: Box<InterfaceAccount<'info, Mint>>,

    /// New pool, addressed by the next free id.
    #[account(
        init,
        seeds = [POOL_SEED.as_bytes(), chef_config.pool_count.to_le_bytes().as_ref()],
        bump,
        payer = owner,
        space = Pool::LEN
    )]
    pub pool: Account<'info, Pool>,

    /// Program-owned vault custodying this pool's stake.
    #[account(
        init,
        seeds = [STAKE_VAULT_SEED.as_bytes(), pool.key().as_ref()],
        bump,
        payer = owner,
        token::mint = staking_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program owning the staking mint.
    pub token_program: Interface<'info, TokenInterface>,

    /// Solana System Program.
    pub system_program: Program<'info, System>,
}

/// Appends a pool to the registry.
///
/// Steps:
/// 1) Reject a lockup that cannot be added to a unix timestamp, and a
///    staking mint with a transfer fee.
/// 2) Optionally settle every existing pool under the old weights.
/// 3) Write the pool with a zero accumulator starting at `max(slot, start_block)`.
/// 4) Bump `pool_count` and `total_alloc_point`.
pub fn add_pool(
    ctx: Context<AddPool>,
    alloc_point: u64,
    lockup_period: u64,
    with_update: bool,
) -> Result<()> {
    let clock = Clock::get()?;
    let schedule = ctx.accounts.chef_config.schedule();

    // --- 1) Lockup must fit a signed offset; stake must arrive in full ---
    require!(
        i64::try_from(lockup_period).is_ok(),
        ErrorCode::InvalidLockupPeriod
    );
    ensure_fee_free_mint(&ctx.accounts.staking_mint.to_account_info().try_borrow_data()?)?;

    // --- 2) Settle existing pools before the weights change ---
    if with_update {
        settle_all_pools(
            ctx.remaining_accounts,
            ctx.accounts.chef_config.pool_count,
            clock.slot,
            &schedule,
        )?;
    }

    // --- 3) Pool state ---
    let id = ctx.accounts.chef_config.pool_count;
    let pool_key = ctx.accounts.pool.key();
    ctx.accounts.pool.set_inner(Pool {
        bump: ctx.bumps.pool,
        id,
        staking_mint: ctx.accounts.staking_mint.key(),
        stake_vault: ctx.accounts.stake_vault.key(),
        alloc_point,
        lockup_period,
        last_accrual_block: schedule.first_accrual_block(clock.slot),
        acc_reward_per_share: 0,
        total_staked: 0,
    });

    // --- 4) Registry aggregates ---
    let chef_config = &mut ctx.accounts.chef_config;
    chef_config.total_alloc_point = chef_config
        .total_alloc_point
        .checked_add(alloc_point)
        .ok_or(ErrorCode::MathOverflow)?;
    chef_config.pool_count = id.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
    msg!(
        "Pool {} added: alloc_point={}, lockup_period={}, total_alloc_point={}",
        id,
        alloc_point,
        lockup_period,
        chef_config.total_alloc_point
    );

    emit!(PoolAdded {
        pool_id: id,
        pool: pool_key,
        staking_mint: ctx.accounts.staking_mint.key(),
        alloc_point,
        lockup_period,
        total_alloc_point: chef_config.total_alloc_point,
    });

    Ok(())
}
