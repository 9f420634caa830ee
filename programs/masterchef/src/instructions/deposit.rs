use crate::error::ErrorCode;
use crate::ledger::{self, ChefClock};
use crate::states::*;
use crate::utils::{
    ensure_account_pullable, ensure_vault_covers, transfer_from_pool_vault_to_user,
    transfer_from_user_to_pool_vault,
};
use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

/// Stakes tokens into a pool.
///
/// The source token account may belong to someone other than `owner`, in
/// which case `owner` must be its approved delegate. Pending reward on the
/// existing stake is paid out in the same call.
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// Staker (payer for the position and the reward ATA if needed).
    #[account(mut)]
    pub owner: Signer<'info>,

    /// Chef registry (emission schedule, reward vault address).
    #[account(
        seeds = [CHEF_CONFIG_SEED.as_bytes()],
        bump = chef_config.bump,
    )]
    pub chef_config: Account<'info, ChefConfig>,

    /// Pool receiving the stake.
    #[account(
        mut,
        seeds = [POOL_SEED.as_bytes(), pool.id.to_le_bytes().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    /// Staker's position in this pool; created on first deposit.
    #[account(
        init_if_needed,
        seeds = [
            USER_POSITION_SEED.as_bytes(),
            pool.key().as_ref(),
            owner.key().as_ref()
        ],
        bump,
        payer = owner,
        space = UserPosition::LEN
    )]
    pub user_position: Account<'info, UserPosition>,

    /// Program authority PDA (signs reward payouts).
    ///
    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    /// Token accepted by the pool.
    #[account(address = pool.staking_mint @ ErrorCode::InvalidPool)]
    pub staking_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Token account the stake is pulled from.
    #[account(
        mut,
        constraint = source_token.mint == pool.staking_mint @ ErrorCode::InvalidPool,
    )]
    pub source_token: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Pool's stake vault.
    #[account(mut, address = pool.stake_vault @ ErrorCode::InvalidVault)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Reward token mint.
    #[account(address = chef_config.reward_mint)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Reward vault paying out pending rewards.
    #[account(mut, address = chef_config.reward_vault @ ErrorCode::InvalidVault)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Staker's reward ATA; created on demand.
    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = reward_mint,
        associated_token::authority = owner,
        associated_token::token_program = reward_token_program,
    )]
    pub owner_reward_token: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program of the staking mint.
    pub token_program: Interface<'info, TokenInterface>,

    /// Token program of the reward mint.
    pub reward_token_program: Interface<'info, TokenInterface>,

    /// Associated Token Program (for ATA init).
    pub associated_token_program: Program<'info, AssociatedToken>,

    /// System Program (for rent/ATA).
    pub system_program: Program<'info, System>,
}

/// Deposits `amount` of the pool's staking token.
///
/// Steps:
/// 1) Check the source account allows pulling `amount`.
/// 2) Run the ledger on copies of the pool and position.
/// 3) Check the reward vault covers the payout.
/// 4) Pull the stake, push the reward.
/// 5) Commit the copies and emit `Deposited`.
pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let clock = ChefClock::from(&Clock::get()?);
    let schedule = ctx.accounts.chef_config.schedule();
    let owner = ctx.accounts.owner.key();

    // --- 1) Custody preconditions ---
    require_gt!(amount, 0, ErrorCode::InvalidAmount);
    ensure_account_pullable(&ctx.accounts.source_token, &owner, amount)?;

    // --- 2) Ledger on copies ---
    let mut pool = Pool::clone(&ctx.accounts.pool);
    let mut position = UserPosition::clone(&ctx.accounts.user_position);
    if !position.is_initialized() {
        position.bump = ctx.bumps.user_position;
        position.pool = ctx.accounts.pool.key();
        position.owner = owner;
    }
    let receipt = ledger::deposit(&mut pool, &mut position, amount, clock, &schedule)?;

    // --- 3) Payout must be covered ---
    ensure_vault_covers(ctx.accounts.reward_vault.amount, receipt.reward)?;

    // --- 4) Token movements ---
    transfer_from_user_to_pool_vault(
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.source_token.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.staking_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.staking_mint.decimals,
    )?;
    transfer_from_pool_vault_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.owner_reward_token.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.reward_token_program.to_account_info(),
        receipt.reward,
        ctx.accounts.reward_mint.decimals,
        &[&[crate::AUTH_SEED.as_bytes(), &[ctx.bumps.authority]]],
    )?;

    // --- 5) Commit ---
    let pool_id = pool.id;
    ctx.accounts.pool.set_inner(pool);
    ctx.accounts.user_position.set_inner(position);
    msg!(
        "Deposit: pool={}, amount={}, unlock_time={}, reward={}",
        pool_id,
        amount,
        receipt.unlock_time,
        receipt.reward
    );

    emit!(Deposited {
        owner,
        pool_id,
        amount,
        unlock_time: receipt.unlock_time,
        reward: receipt.reward,
    });

    Ok(())
}
