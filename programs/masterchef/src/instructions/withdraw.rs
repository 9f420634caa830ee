use crate::error::ErrorCode;
use crate::ledger::{self, ChefClock};
use crate::states::*;
use crate::utils::{ensure_vault_covers, transfer_from_pool_vault_to_user};
use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

/// Returns unlocked stake to its owner together with the pending reward.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// Position owner (payer for receiving ATAs if needed).
    #[account(mut)]
    pub owner: Signer<'info>,

    /// Chef registry.
    #[account(
        seeds = [CHEF_CONFIG_SEED.as_bytes()],
        bump = chef_config.bump,
    )]
    pub chef_config: Account<'info, ChefConfig>,

    /// Pool the stake is withdrawn from.
    #[account(
        mut,
        seeds = [POOL_SEED.as_bytes(), pool.id.to_le_bytes().as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    /// Owner's position in this pool; omitted when the owner never deposited.
    #[account(
        mut,
        seeds = [
            USER_POSITION_SEED.as_bytes(),
            pool.key().as_ref(),
            owner.key().as_ref()
        ],
        bump = user_position.bump,
    )]
    pub user_position: Option<Account<'info, UserPosition>>,

    /// Program authority PDA (signs vault transfers).
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

    /// Pool's stake vault.
    #[account(mut, address = pool.stake_vault @ ErrorCode::InvalidVault)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Owner's staking-token ATA; created on demand to receive the stake.
    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = staking_mint,
        associated_token::authority = owner,
        associated_token::token_program = token_program,
    )]
    pub owner_staking_token: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Reward token mint.
    #[account(address = chef_config.reward_mint)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Reward vault paying out pending rewards.
    #[account(mut, address = chef_config.reward_vault @ ErrorCode::InvalidVault)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Owner's reward ATA; created on demand.
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

/// Withdraws `amount` of unlocked stake, oldest deposits first.
///
/// Fails with `WithdrawExceedsUnlocked` when `amount` is more than the
/// leading run of unlocked batches, even if the total stake would cover it.
/// The pending reward is always paid, whatever `amount` is.
pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let clock = ChefClock::from(&Clock::get()?);
    let schedule = ctx.accounts.chef_config.schedule();

    // --- 1) Ledger on copies ---
    let mut pool = Pool::clone(&ctx.accounts.pool);
    let mut position = UserPosition::snapshot(ctx.accounts.user_position.as_deref());
    let reward = ledger::withdraw(&mut pool, &mut position, amount, clock, &schedule)?;

    // --- 2) Vaults must cover both legs ---
    ensure_vault_covers(ctx.accounts.stake_vault.amount, amount)?;
    ensure_vault_covers(ctx.accounts.reward_vault.amount, reward)?;

    // --- 3) Token movements ---
    let signer_seeds: &[&[&[u8]]] = &[&[crate::AUTH_SEED.as_bytes(), &[ctx.bumps.authority]]];
    transfer_from_pool_vault_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.owner_reward_token.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.reward_token_program.to_account_info(),
        reward,
        ctx.accounts.reward_mint.decimals,
        signer_seeds,
    )?;
    transfer_from_pool_vault_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.owner_staking_token.to_account_info(),
        ctx.accounts.staking_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.staking_mint.decimals,
        signer_seeds,
    )?;

    // --- 4) Commit ---
    let pool_id = pool.id;
    ctx.accounts.pool.set_inner(pool);
    if let Some(user_position) = ctx.accounts.user_position.as_mut() {
        user_position.set_inner(position);
    }
    msg!(
        "Withdraw: pool={}, amount={}, reward={}",
        pool_id,
        amount,
        reward
    );

    emit!(Withdrawn {
        owner: ctx.accounts.owner.key(),
        pool_id,
        amount,
        reward,
    });

    Ok(())
}
