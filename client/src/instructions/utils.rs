use anchor_lang::AccountDeserialize;
use anyhow::Result;
use masterchef::states::{
    CHEF_CONFIG_SEED, POOL_SEED, STAKE_VAULT_SEED, USER_POSITION_SEED,
};
use solana_sdk::{account::Account, pubkey::Pubkey};
use spl_token_2022::{extension::StateWithExtensions, state::Account as TokenAccount};

pub fn deserialize_anchor_account<T: AccountDeserialize>(account: &Account) -> Result<T> {
    let mut data: &[u8] = &account.data;
    T::try_deserialize(&mut data).map_err(Into::into)
}

/// Balance of an SPL Token or Token-2022 account.
pub fn token_account_amount(account: &Account) -> Result<u64> {
    let state = StateWithExtensions::<TokenAccount>::unpack(&account.data)?;
    Ok(state.base.amount)
}

pub fn get_chef_config_address(program_id: &Pubkey) -> Pubkey {
    let (chef_config, _bump) =
        Pubkey::find_program_address(&[CHEF_CONFIG_SEED.as_bytes()], program_id);
    chef_config
}

pub fn get_authority_address(program_id: &Pubkey) -> Pubkey {
    let (authority, _bump) =
        Pubkey::find_program_address(&[masterchef::AUTH_SEED.as_bytes()], program_id);
    authority
}

pub fn get_reward_vault_address(program_id: &Pubkey) -> Pubkey {
    let (reward_vault, _bump) =
        Pubkey::find_program_address(&[masterchef::REWARD_VAULT_SEED.as_bytes()], program_id);
    reward_vault
}

pub fn get_pool_address(program_id: &Pubkey, pool_id: u64) -> Pubkey {
    let (pool, _bump) = Pubkey::find_program_address(
        &[POOL_SEED.as_bytes(), &pool_id.to_le_bytes()],
        program_id,
    );
    pool
}

pub fn get_stake_vault_address(program_id: &Pubkey, pool: &Pubkey) -> Pubkey {
    let (stake_vault, _bump) = Pubkey::find_program_address(
        &[STAKE_VAULT_SEED.as_bytes(), pool.as_ref()],
        program_id,
    );
    stake_vault
}

pub fn get_user_position_address(program_id: &Pubkey, pool: &Pubkey, owner: &Pubkey) -> Pubkey {
    let (user_position, _bump) = Pubkey::find_program_address(
        &[USER_POSITION_SEED.as_bytes(), pool.as_ref(), owner.as_ref()],
        program_id,
    );
    user_position
}
