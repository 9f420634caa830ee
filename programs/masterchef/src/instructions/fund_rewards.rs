use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{ensure_account_pullable, transfer_from_user_to_pool_vault};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Tops up the reward vault. Anyone may fund it.
#[derive(Accounts)]
pub struct FundRewards<'info> {
    /// Funder; owner or delegate of `funder_token`.
    pub funder: Signer<'info>,

    /// Chef registry.
    #[account(
        seeds = [CHEF_CONFIG_SEED.as_bytes()],
        bump = chef_config.bump,
    )]
    pub chef_config: Account<'info, ChefConfig>,

    /// Reward token mint.
    #[account(address = chef_config.reward_mint)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Token account the reward tokens come from.
    #[account(
        mut,
        constraint = funder_token.mint == chef_config.reward_mint @ ErrorCode::InvalidVault,
    )]
    pub funder_token: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Reward vault.
    #[account(mut, address = chef_config.reward_vault @ ErrorCode::InvalidVault)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program of the reward mint.
    pub token_program: Interface<'info, TokenInterface>,
}

pub fn fund_rewards(ctx: Context<FundRewards>, amount: u64) -> Result<()> {
    let funder = ctx.accounts.funder.key();
    require_gt!(amount, 0, ErrorCode::InvalidAmount);
    ensure_account_pullable(&ctx.accounts.funder_token, &funder, amount)?;

    transfer_from_user_to_pool_vault(
        ctx.accounts.funder.to_account_info(),
        ctx.accounts.funder_token.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.reward_mint.decimals,
    )?;

    ctx.accounts.reward_vault.reload()?;
    let vault_balance = ctx.accounts.reward_vault.amount;
    msg!("Reward vault funded: amount={}, balance={}", amount, vault_balance);

    emit!(RewardsFunded {
        funder,
        amount,
        vault_balance,
    });

    Ok(())
}
