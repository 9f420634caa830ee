use crate::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_spl::token_2022;
use anchor_spl::token_2022::spl_token_2022::{
    extension::{transfer_fee::TransferFeeConfig, BaseStateWithExtensions, StateWithExtensions},
    state::Mint as MintState,
};
use anchor_spl::token_interface::TokenAccount;

/// Moves `amount` from a user-controlled token account into a program vault.
///
/// `authority` signs the transaction itself; it is either the account owner
/// or an approved delegate. A zero amount is skipped.
pub fn transfer_from_user_to_pool_vault<'a>(
    authority: AccountInfo<'a>,
    from: AccountInfo<'a>,
    to_vault: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    amount: u64,
    mint_decimals: u8,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token_2022::transfer_checked(
        CpiContext::new(
            token_program,
            token_2022::TransferChecked {
                from,
                to: to_vault,
                authority,
                mint,
            },
        ),
        amount,
        mint_decimals,
    )
}

/// Moves `amount` out of a program vault, signing with the vault authority PDA.
pub fn transfer_from_pool_vault_to_user<'a>(
    authority: AccountInfo<'a>,
    from_vault: AccountInfo<'a>,
    to: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    amount: u64,
    mint_decimals: u8,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token_2022::transfer_checked(
        CpiContext::new_with_signer(
            token_program,
            token_2022::TransferChecked {
                from: from_vault,
                to,
                authority,
                mint,
            },
            signer_seeds,
        ),
        amount,
        mint_decimals,
    )
}

/// Checks that `signer` may pull `amount` out of `source`.
///
/// A signer other than the owner must be the account's delegate with a
/// sufficient delegated amount. The allowance is checked before the balance.
pub fn ensure_pullable(
    owner: &Pubkey,
    delegate: Option<&Pubkey>,
    delegated_amount: u64,
    balance: u64,
    signer: &Pubkey,
    amount: u64,
) -> Result<()> {
    if owner != signer {
        require!(
            delegate == Some(signer) && delegated_amount >= amount,
            ErrorCode::InsufficientAllowance
        );
    }
    require_gte!(balance, amount, ErrorCode::InsufficientBalance);
    Ok(())
}

/// [`ensure_pullable`] on a deserialized token account.
pub fn ensure_account_pullable(source: &TokenAccount, signer: &Pubkey, amount: u64) -> Result<()> {
    let delegate: Option<Pubkey> = source.delegate.into();
    ensure_pullable(
        &source.owner,
        delegate.as_ref(),
        source.delegated_amount,
        source.amount,
        signer,
        amount,
    )
}

/// Checks that a program vault holds at least `amount`.
pub fn ensure_vault_covers(vault_balance: u64, amount: u64) -> Result<()> {
    require_gte!(vault_balance, amount, ErrorCode::InsufficientBalance);
    Ok(())
}

/// Rejects mints whose transfers can arrive short of the sent amount.
///
/// Works on SPL Token and Token-2022 mint data alike; a plain mint has no
/// extensions at all.
pub fn ensure_fee_free_mint(mint_data: &[u8]) -> Result<()> {
    let mint = StateWithExtensions::<MintState>::unpack(mint_data)?;
    require!(
        mint.get_extension::<TransferFeeConfig>().is_err(),
        ErrorCode::UnsupportedMint
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_spl::token_2022::spl_token_2022::extension::{BaseStateWithExtensionsMut, ExtensionType, StateWithExtensionsMut};

    fn mint_data(extensions: &[ExtensionType]) -> Vec<u8> {
        let space = ExtensionType::try_calculate_account_len::<MintState>(extensions).unwrap();
        let mut data = vec![0u8; space];
        let mut state = StateWithExtensionsMut::<MintState>::unpack_uninitialized(&mut data).unwrap();
        if extensions.contains(&ExtensionType::TransferFeeConfig) {
            state.init_extension::<TransferFeeConfig>(true).unwrap();
        }
        state.base = MintState {
            decimals: 6,
            is_initialized: true,
            ..MintState::default()
        };
        state.pack_base();
        if !extensions.is_empty() {
            state.init_account_type().unwrap();
        }
        data
    }

    #[test]
    fn transfer_fee_mints_are_refused() {
        assert!(ensure_fee_free_mint(&mint_data(&[])).is_ok());
        assert_eq!(
            ensure_fee_free_mint(&mint_data(&[ExtensionType::TransferFeeConfig])).unwrap_err(),
            error!(ErrorCode::UnsupportedMint)
        );
    }

    #[test]
    fn owner_needs_only_balance() {
        let owner = Pubkey::new_unique();
        assert!(ensure_pullable(&owner, None, 0, 100, &owner, 100).is_ok());
        assert_eq!(
            ensure_pullable(&owner, None, 0, 99, &owner, 100).unwrap_err(),
            error!(ErrorCode::InsufficientBalance)
        );
    }

    #[test]
    fn delegate_needs_allowance_first() {
        let owner = Pubkey::new_unique();
        let spender = Pubkey::new_unique();
        assert_eq!(
            ensure_pullable(&owner, None, 0, 0, &spender, 10).unwrap_err(),
            error!(ErrorCode::InsufficientAllowance)
        );
        assert_eq!(
            ensure_pullable(&owner, Some(&spender), 9, 100, &spender, 10).unwrap_err(),
            error!(ErrorCode::InsufficientAllowance)
        );
        assert_eq!(
            ensure_pullable(&owner, Some(&spender), 10, 5, &spender, 10).unwrap_err(),
            error!(ErrorCode::InsufficientBalance)
        );
        assert!(ensure_pullable(&owner, Some(&spender), 10, 10, &spender, 10).is_ok());
    }

    #[test]
    fn vault_shortfall_is_a_balance_error() {
        assert!(ensure_vault_covers(10, 10).is_ok());
        assert_eq!(
            ensure_vault_covers(9, 10).unwrap_err(),
            error!(ErrorCode::InsufficientBalance)
        );
    }
}
