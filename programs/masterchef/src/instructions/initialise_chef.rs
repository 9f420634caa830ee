use crate::error::ErrorCode;
use crate::{states::*, REWARD_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use std::ops::DerefMut;

/// Accounts context for `initialise_chef`.
///
/// This handler:
/// - Creates the chef registry with its immutable emission schedule.
/// - Creates the program-owned reward vault the harvests are paid from.
#[derive(Accounts)]
pub struct InitialiseChef<'info> {
    /// Deployment key (must match the program-level admin id). Pays for the
    /// new accounts.
    #[account(
        mut,
        address = crate::admin::id() @ ErrorCode::Unauthorized
    )]
    pub owner: Signer<'info>,

    /// Program authority PDA, owner of every vault.
    ///
    /// CHECK: PDA derivation enforced via seeds. Not read as an account; used as Pubkey.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    /// Chef registry.
    #[account(
        init,
        seeds = [CHEF_CONFIG_SEED.as_bytes()],
        bump,
        payer = owner,
        space = ChefConfig::LEN
    )]
    pub chef_config: Account<'info, ChefConfig>,

    /// Mint of the reward token.
    #[account(mint::token_program = token_program)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Program-owned vault paying out rewards.
    #[account(
        init,
        seeds = [REWARD_VAULT_SEED.as_bytes()],
        bump,
        payer = owner,
        token::mint = reward_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program owning the reward mint.
    pub token_program: Interface<'info, TokenInterface>,

    /// Solana System Program.
    pub system_program: Program<'info, System>,
}

/// Initializes the chef registry.
///
/// `start_block` and `reward_per_block` cannot be changed afterwards. The
/// reward vault starts empty and is filled through `fund_rewards`.
pub fn initialise_chef(
    ctx: Context<InitialiseChef>,
    admin: Pubkey,
    start_block: u64,
    reward_per_block: u64,
) -> Result<()> {
    require_keys_neq!(admin, Pubkey::default(), ErrorCode::Unauthorized);

    let reward_vault = ctx.accounts.reward_vault.key();
    let reward_mint = ctx.accounts.reward_mint.key();

    let chef_config = ctx.accounts.chef_config.deref_mut();
    chef_config.bump = ctx.bumps.chef_config;
    chef_config.admin = admin;
    chef_config.reward_mint = reward_mint;
    chef_config.reward_vault = reward_vault;
    chef_config.start_block = start_block;
    chef_config.reward_per_block = reward_per_block;
    chef_config.total_alloc_point = 0;
    chef_config.pool_count = 0;
    msg!(
        "Chef initialized: start_block={}, reward_per_block={}",
        start_block,
        reward_per_block
    );

    emit!(ChefInitialized {
        admin,
        reward_mint,
        reward_vault,
        start_block,
        reward_per_block,
    });

    Ok(())
}
