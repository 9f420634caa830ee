use anchor_client::{Client, Cluster, Program};
use anchor_lang::prelude::AccountMeta;
use anyhow::Result;
use masterchef::accounts as chef_accounts;
use masterchef::instruction as chef_instructions;
use masterchef::states::{ChefConfig, Pool};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, system_program};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use std::rc::Rc;

use crate::instructions::utils::{
    get_authority_address, get_chef_config_address, get_pool_address, get_reward_vault_address,
    get_stake_vault_address, get_user_position_address,
};

use super::super::{read_keypair_file, ClientConfig};

fn chef_program(config: &ClientConfig, keypair_path: &str) -> Result<Program<Rc<Keypair>>> {
    let payer = read_keypair_file(keypair_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(payer));
    Ok(client.program(config.masterchef_program)?)
}

/// Token programs of the two mints a staking call touches.
#[derive(Clone, Copy, Debug)]
pub struct TokenPrograms {
    pub staking: Pubkey,
    pub reward: Pubkey,
}

pub fn initialise_chef_instr(
    config: &ClientConfig,
    reward_mint: Pubkey,
    token_program: Pubkey,
    admin: Pubkey,
    start_block: u64,
    reward_per_block: u64,
) -> Result<Vec<Instruction>> {
    let program = chef_program(config, &config.admin_path)?;

    let instructions = program
        .request()
        .accounts(chef_accounts::InitialiseChef {
            owner: program.payer(),
            authority: get_authority_address(&program.id()),
            chef_config: get_chef_config_address(&program.id()),
            reward_mint,
            reward_vault: get_reward_vault_address(&program.id()),
            token_program,
            system_program: system_program::id(),
        })
        .args(chef_instructions::InitialiseChef {
            admin,
            start_block,
            reward_per_block,
        })
        .instructions()?;
    Ok(instructions)
}

/// Builds `add_pool` for the next free id. With `with_update`, every
/// existing pool is appended as a writable remaining account.
pub fn add_pool_instr(
    config: &ClientConfig,
    chef: &ChefConfig,
    staking_mint: Pubkey,
    token_program: Pubkey,
    alloc_point: u64,
    lockup_period: u64,
    with_update: bool,
) -> Result<Vec<Instruction>> {
    let program = chef_program(config, &config.admin_path)?;
    let pool = get_pool_address(&program.id(), chef.pool_count);

    let mut ixs = program
        .request()
        .accounts(chef_accounts::AddPool {
            owner: program.payer(),
            authority: get_authority_address(&program.id()),
            chef_config: get_chef_config_address(&program.id()),
            staking_mint,
            pool,
            stake_vault: get_stake_vault_address(&program.id(), &pool),
            token_program,
            system_program: system_program::id(),
        })
        .args(chef_instructions::AddPool {
            alloc_point,
            lockup_period,
            with_update,
        })
        .instructions()?;

    if with_update {
        ixs[0].accounts.extend(pool_metas(&program.id(), chef.pool_count));
    }
    Ok(ixs)
}

pub fn deposit_instr(
    config: &ClientConfig,
    chef: &ChefConfig,
    pool: &Pool,
    source_token: Option<Pubkey>,
    token_programs: TokenPrograms,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = chef_program(config, &config.payer_path)?;
    let owner = program.payer();
    let pool_address = get_pool_address(&program.id(), pool.id);
    let source_token = source_token.unwrap_or_else(|| {
        get_associated_token_address_with_program_id(
            &owner,
            &pool.staking_mint,
            &token_programs.staking,
        )
    });

    let instructions = program
        .request()
        .accounts(chef_accounts::Deposit {
            owner,
            chef_config: get_chef_config_address(&program.id()),
            pool: pool_address,
            user_position: get_user_position_address(&program.id(), &pool_address, &owner),
            authority: get_authority_address(&program.id()),
            staking_mint: pool.staking_mint,
            source_token,
            stake_vault: pool.stake_vault,
            reward_mint: chef.reward_mint,
            reward_vault: chef.reward_vault,
            owner_reward_token: get_associated_token_address_with_program_id(
                &owner,
                &chef.reward_mint,
                &token_programs.reward,
            ),
            token_program: token_programs.staking,
            reward_token_program: token_programs.reward,
            associated_token_program: spl_associated_token_account::id(),
            system_program: system_program::id(),
        })
        .args(chef_instructions::Deposit { amount })
        .instructions()?;
    Ok(instructions)
}

pub fn withdraw_instr(
    config: &ClientConfig,
    chef: &ChefConfig,
    pool: &Pool,
    has_position: bool,
    token_programs: TokenPrograms,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = chef_program(config, &config.payer_path)?;
    let owner = program.payer();
    let pool_address = get_pool_address(&program.id(), pool.id);

    let instructions = program
        .request()
        .accounts(chef_accounts::Withdraw {
            owner,
            chef_config: get_chef_config_address(&program.id()),
            pool: pool_address,
            user_position: has_position
                .then(|| get_user_position_address(&program.id(), &pool_address, &owner)),
            authority: get_authority_address(&program.id()),
            staking_mint: pool.staking_mint,
            stake_vault: pool.stake_vault,
            owner_staking_token: get_associated_token_address_with_program_id(
                &owner,
                &pool.staking_mint,
                &token_programs.staking,
            ),
            reward_mint: chef.reward_mint,
            reward_vault: chef.reward_vault,
            owner_reward_token: get_associated_token_address_with_program_id(
                &owner,
                &chef.reward_mint,
                &token_programs.reward,
            ),
            token_program: token_programs.staking,
            reward_token_program: token_programs.reward,
            associated_token_program: spl_associated_token_account::id(),
            system_program: system_program::id(),
        })
        .args(chef_instructions::Withdraw { amount })
        .instructions()?;
    Ok(instructions)
}

/// `has_position` is false for an owner who never deposited; the position
/// account is then left out.
pub fn harvest_instr(
    config: &ClientConfig,
    chef: &ChefConfig,
    pool: &Pool,
    has_position: bool,
    reward_token_program: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = chef_program(config, &config.payer_path)?;
    let owner = program.payer();
    let pool_address = get_pool_address(&program.id(), pool.id);

    let instructions = program
        .request()
        .accounts(chef_accounts::Harvest {
            owner,
            chef_config: get_chef_config_address(&program.id()),
            pool: pool_address,
            user_position: has_position
                .then(|| get_user_position_address(&program.id(), &pool_address, &owner)),
            authority: get_authority_address(&program.id()),
            reward_mint: chef.reward_mint,
            reward_vault: chef.reward_vault,
            owner_reward_token: get_associated_token_address_with_program_id(
                &owner,
                &chef.reward_mint,
                &reward_token_program,
            ),
            reward_token_program,
            associated_token_program: spl_associated_token_account::id(),
            system_program: system_program::id(),
        })
        .args(chef_instructions::Harvest {})
        .instructions()?;
    Ok(instructions)
}

pub fn update_pool_instr(config: &ClientConfig, pool_id: u64) -> Result<Vec<Instruction>> {
    let program = chef_program(config, &config.payer_path)?;

    let instructions = program
        .request()
        .accounts(chef_accounts::UpdatePool {
            chef_config: get_chef_config_address(&program.id()),
            pool: get_pool_address(&program.id(), pool_id),
        })
        .args(chef_instructions::UpdatePool {})
        .instructions()?;
    Ok(instructions)
}

pub fn mass_update_pools_instr(config: &ClientConfig, pool_count: u64) -> Result<Vec<Instruction>> {
    let program = chef_program(config, &config.payer_path)?;

    let mut ixs = program
        .request()
        .accounts(chef_accounts::MassUpdatePools {
            chef_config: get_chef_config_address(&program.id()),
        })
        .args(chef_instructions::MassUpdatePools {})
        .instructions()?;
    ixs[0].accounts.extend(pool_metas(&program.id(), pool_count));
    Ok(ixs)
}

pub fn fund_rewards_instr(
    config: &ClientConfig,
    chef: &ChefConfig,
    funder_token: Option<Pubkey>,
    token_program: Pubkey,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = chef_program(config, &config.payer_path)?;
    let funder = program.payer();
    let funder_token = funder_token.unwrap_or_else(|| {
        get_associated_token_address_with_program_id(&funder, &chef.reward_mint, &token_program)
    });

    let instructions = program
        .request()
        .accounts(chef_accounts::FundRewards {
            funder,
            chef_config: get_chef_config_address(&program.id()),
            reward_mint: chef.reward_mint,
            funder_token,
            reward_vault: chef.reward_vault,
            token_program,
        })
        .args(chef_instructions::FundRewards { amount })
        .instructions()?;
    Ok(instructions)
}

pub fn update_admin_instr(config: &ClientConfig, new_admin: Pubkey) -> Result<Vec<Instruction>> {
    let program = chef_program(config, &config.admin_path)?;

    let instructions = program
        .request()
        .accounts(chef_accounts::UpdateAdmin {
            owner: program.payer(),
            chef_config: get_chef_config_address(&program.id()),
        })
        .args(chef_instructions::UpdateAdmin { new_admin })
        .instructions()?;
    Ok(instructions)
}

/// Writable metas of pools `0..pool_count`, in id order.
fn pool_metas(program_id: &Pubkey, pool_count: u64) -> Vec<AccountMeta> {
    (0..pool_count)
        .map(|id| AccountMeta::new(get_pool_address(program_id, id), false))
        .collect()
}
