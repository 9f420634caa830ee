use crate::error::ErrorCode;
use crate::ledger::{self, ChefClock};
use crate::states::*;
use crate::utils::{ensure_vault_covers, transfer_from_pool_vault_to_user};
use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

/// Claims pending reward without touching the stake.
#[derive(Accounts)]
pub struct Harvest<'info> {
    /// Position owner (payer for the reward ATA if needed).
    #[account(mut)]
    pub owner: Signer<'info>,

    /// Chef registry.
    #[account(
        seeds = [CHEF_CONFIG_SEED.as_bytes()],
        bump = chef_config.bump,
    )]
    pub chef_config: Account<'info, ChefConfig>,

    /// Pool the position belongs to.
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

    /// Program authority PDA (signs reward payouts).
    ///
    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

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

    /// Token program of the reward mint.
    pub reward_token_program: Interface<'info, TokenInterface>,

    /// Associated Token Program (for ATA init).
    pub associated_token_program: Program<'info, AssociatedToken>,

    /// System Program (for rent/ATA).
    pub system_program: Program<'info, System>,
}

/// Pays out everything accrued since the position's last update.
///
/// A second harvest in the same slot pays nothing and still succeeds, as
/// does a harvest by an owner without a position.
pub fn harvest(ctx: Context<Harvest>) -> Result<()> {
    let clock = ChefClock::from(&Clock::get()?);
    let schedule = ctx.accounts.chef_config.schedule();

    let mut pool = Pool::clone(&ctx.accounts.pool);
    let mut position = UserPosition::snapshot(ctx.accounts.user_position.as_deref());
    let reward = ledger::harvest(&mut pool, &mut position, clock, &schedule)?;

    ensure_vault_covers(ctx.accounts.reward_vault.amount, reward)?;
    transfer_from_pool_vault_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.owner_reward_token.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.reward_token_program.to_account_info(),
        reward,
        ctx.accounts.reward_mint.decimals,
        &[&[crate::AUTH_SEED.as_bytes(), &[ctx.bumps.authority]]],
    )?;

    let pool_id = pool.id;
    ctx.accounts.pool.set_inner(pool);
    if let Some(user_position) = ctx.accounts.user_position.as_mut() {
        user_position.set_inner(position);
    }
    msg!("Harvest: pool={}, reward={}", pool_id, reward);

    emit!(Harvested {
        owner: ctx.accounts.owner.key(),
        pool_id,
        reward,
    });

    Ok(())
}
