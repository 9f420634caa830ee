use anchor_lang::AccountDeserialize;
use anyhow::{format_err, Result};
use solana_client::{rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig};
use solana_sdk::{
    clock::Clock, commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature,
    sysvar, transaction::Transaction,
};

use super::utils::deserialize_anchor_account;

pub fn send_txn(client: &RpcClient, txn: &Transaction, wait_confirm: bool) -> Result<Signature> {
    Ok(client.send_and_confirm_transaction_with_spinner_and_config(
        txn,
        if wait_confirm {
            CommitmentConfig::confirmed()
        } else {
            CommitmentConfig::processed()
        },
        RpcSendTransactionConfig {
            skip_preflight: true,
            ..RpcSendTransactionConfig::default()
        },
    )?)
}

/// Cluster clock, decoded straight from the sysvar account.
pub fn get_clock(client: &RpcClient) -> Result<Clock> {
    let account = client.get_account(&sysvar::clock::id())?;
    Ok(bincode::deserialize(&account.data)?)
}

/// Fetches and decodes an anchor account; `None` when it does not exist.
pub fn get_anchor_account<T: AccountDeserialize>(
    client: &RpcClient,
    address: &Pubkey,
) -> Result<Option<T>> {
    let account = client
        .get_account_with_commitment(address, CommitmentConfig::confirmed())?
        .value;
    account.map(|a| deserialize_anchor_account(&a)).transpose()
}

/// Like [`get_anchor_account`] but the account must exist.
pub fn load_anchor_account<T: AccountDeserialize>(
    client: &RpcClient,
    address: &Pubkey,
) -> Result<T> {
    get_anchor_account(client, address)?
        .ok_or_else(|| format_err!("account {} not found", address))
}

/// Owner program of a mint, which must be SPL Token or Token-2022.
pub fn get_token_program(client: &RpcClient, mint: &Pubkey) -> Result<Pubkey> {
    let owner = client.get_account(mint)?.owner;
    if owner != spl_token::id() && owner != spl_token_2022::id() {
        return Err(format_err!("{} is not a token mint", mint));
    }
    Ok(owner)
}
