use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;

/// Hands the administrative role over to another key.
#[derive(Accounts)]
pub struct UpdateAdmin<'info> {
    /// Current admin.
    #[account(
        constraint = owner.key() == chef_config.admin @ ErrorCode::Unauthorized
    )]
    pub owner: Signer<'info>,

    /// Chef registry.
    #[account(
        mut,
        seeds = [CHEF_CONFIG_SEED.as_bytes()],
        bump = chef_config.bump,
    )]
    pub chef_config: Account<'info, ChefConfig>,
}

pub fn update_admin(ctx: Context<UpdateAdmin>, new_admin: Pubkey) -> Result<()> {
    require_keys_neq!(new_admin, Pubkey::default(), ErrorCode::Unauthorized);

    let chef_config = &mut ctx.accounts.chef_config;
    let previous_admin = chef_config.admin;
    chef_config.admin = new_admin;
    msg!("Admin changed from {} to {}", previous_admin, new_admin);

    emit!(AdminUpdated {
        previous_admin,
        new_admin,
    });

    Ok(())
}
