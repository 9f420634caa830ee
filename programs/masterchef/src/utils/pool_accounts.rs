use crate::error::ErrorCode;
use crate::states::{EmissionSchedule, Pool, POOL_SEED};
use anchor_lang::prelude::*;

/// Address of pool `id` given its stored bump.
pub fn pool_address(id: u64, bump: u8) -> Result<Pubkey> {
    Pubkey::create_program_address(
        &[POOL_SEED.as_bytes(), &id.to_le_bytes(), &[bump]],
        &crate::ID,
    )
    .map_err(|_| error!(ErrorCode::InvalidPool))
}

/// Deserializes a pool passed outside the typed accounts struct.
pub fn read_pool(info: &AccountInfo) -> Result<Pool> {
    require_keys_eq!(*info.owner, crate::ID, ErrorCode::InvalidPool);
    let pool = {
        let data = info.try_borrow_data()?;
        Pool::try_deserialize(&mut &data[..])?
    };
    require_keys_eq!(
        info.key(),
        pool_address(pool.id, pool.bump)?,
        ErrorCode::InvalidPool
    );
    Ok(pool)
}

/// Writes `pool` back into its account.
pub fn write_pool(info: &AccountInfo, pool: &Pool) -> Result<()> {
    require!(info.is_writable, ErrorCode::InvalidPool);
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    pool.try_serialize(&mut writer)
}

/// Reads every registered pool, which must be passed exactly in id order
/// `0..pool_count`.
pub fn read_all_pools(infos: &[AccountInfo], pool_count: u64) -> Result<Vec<Pool>> {
    require!(
        infos.len() as u64 == pool_count,
        ErrorCode::InvalidPool
    );
    infos
        .iter()
        .enumerate()
        .map(|(index, info)| {
            let pool = read_pool(info)?;
            require_eq!(pool.id, index as u64, ErrorCode::InvalidPool);
            Ok(pool)
        })
        .collect()
}

/// Settles every registered pool at `current_block` and persists the result.
///
/// Nothing is written until every account has been read and validated.
pub fn settle_all_pools(
    infos: &[AccountInfo],
    pool_count: u64,
    current_block: u64,
    schedule: &EmissionSchedule,
) -> Result<Vec<Pool>> {
    let mut pools = read_all_pools(infos, pool_count)?;
    require!(
        infos.iter().all(|info| info.is_writable),
        ErrorCode::InvalidPool
    );
    for pool in pools.iter_mut() {
        pool.settle(current_block, schedule)?;
    }
    for (info, pool) in infos.iter().zip(pools.iter()) {
        write_pool(info, pool)?;
    }
    Ok(pools)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        key: Pubkey,
        lamports: u64,
        data: Vec<u8>,
    }

    fn fixture(id: u64, total_staked: u64) -> Fixture {
        let (key, bump) = Pubkey::find_program_address(
            &[POOL_SEED.as_bytes(), &id.to_le_bytes()],
            &crate::ID,
        );
        let pool = Pool {
            bump,
            id,
            alloc_point: 100,
            total_staked,
            ..Pool::default()
        };
        let mut data = Vec::with_capacity(Pool::LEN);
        pool.try_serialize(&mut data).unwrap();
        Fixture {
            key,
            lamports: 1,
            data,
        }
    }

    fn infos<'a>(fixtures: &'a mut [Fixture], owner: &'a Pubkey) -> Vec<AccountInfo<'a>> {
        fixtures
            .iter_mut()
            .map(|f| {
                AccountInfo::new(
                    &f.key,
                    false,
                    true,
                    &mut f.lamports,
                    &mut f.data,
                    owner,
                    false,
                    0,
                )
            })
            .collect()
    }

    #[test]
    fn pools_must_come_in_id_order() {
        let owner = crate::ID;
        let mut fixtures = vec![fixture(0, 5), fixture(1, 7)];
        let accounts = infos(&mut fixtures, &owner);

        let pools = read_all_pools(&accounts, 2).unwrap();
        assert_eq!(
            pools.iter().map(|p| p.total_staked).collect::<Vec<_>>(),
            vec![5, 7]
        );

        assert_eq!(
            read_all_pools(&accounts, 3).unwrap_err(),
            error!(ErrorCode::InvalidPool)
        );
        let swapped = vec![accounts[1].clone(), accounts[0].clone()];
        assert_eq!(
            read_all_pools(&swapped, 2).unwrap_err(),
            error!(ErrorCode::InvalidPool)
        );
    }

    #[test]
    fn foreign_owner_is_rejected() {
        let owner = Pubkey::new_unique();
        let mut fixtures = vec![fixture(0, 5)];
        let accounts = infos(&mut fixtures, &owner);
        assert!(read_pool(&accounts[0]).is_err());
    }

    #[test]
    fn settle_all_persists_accumulators() {
        let owner = crate::ID;
        let mut fixtures = vec![fixture(0, 10), fixture(1, 0)];
        {
            let accounts = infos(&mut fixtures, &owner);
            let schedule = EmissionSchedule {
                start_block: 0,
                reward_per_block: 10,
                total_alloc_point: 200,
            };
            settle_all_pools(&accounts, 2, 4, &schedule).unwrap();
        }
        let first = Pool::try_deserialize(&mut &fixtures[0].data[..]).unwrap();
        let second = Pool::try_deserialize(&mut &fixtures[1].data[..]).unwrap();
        // 4 blocks * 10 * 100 / 200 = 20 reward over 10 stake
        assert_eq!(
            first.acc_reward_per_share,
            2 * crate::math::ACC_REWARD_PRECISION
        );
        assert_eq!(first.last_accrual_block, 4);
        assert_eq!(second.acc_reward_per_share, 0);
        assert_eq!(second.last_accrual_block, 4);
    }
}
