use anyhow::{format_err, Result};
use clap::Parser;
use colorful::{Color, Colorful};
use configparser::ini::Ini;
use masterchef::ledger;
use masterchef::states::{ChefConfig, Pool, UserPosition};
use serde::Serialize;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use std::str::FromStr;

mod instructions;
use instructions::chef_instructions::*;
use instructions::rpc::*;
use instructions::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    http_url: String,
    ws_url: String,
    payer_path: String,
    admin_path: String,
    masterchef_program: Pubkey,
}

fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config
        .load(client_config)
        .map_err(|e| format_err!("failed to load {}: {}", client_config, e))?;
    let get = |key: &str| -> Result<String> {
        match config.get("Global", key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(format_err!("{} must not be empty", key)),
        }
    };

    let masterchef_program = Pubkey::from_str(&get("masterchef_program")?)?;
    Ok(ClientConfig {
        http_url: get("http_url")?,
        ws_url: get("ws_url")?,
        payer_path: get("payer_path")?,
        admin_path: get("admin_path")?,
        masterchef_program,
    })
}

fn read_keypair_file(s: &str) -> Result<Keypair> {
    solana_sdk::signature::read_keypair_file(s)
        .map_err(|_| format_err!("failed to read keypair from {}", s))
}

#[derive(Debug, Parser)]
pub struct Opts {
    /// Print query results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
    #[clap(subcommand)]
    pub command: ChefCommands,
}

#[derive(Debug, Parser)]
pub enum ChefCommands {
    InitialiseChef {
        #[arg(long)]
        reward_mint: Pubkey,
        /// Defaults to the admin keypair.
        #[arg(long)]
        admin: Option<Pubkey>,
        #[arg(long)]
        start_block: u64,
        #[arg(long)]
        reward_per_block: u64,
    },
    AddPool {
        #[arg(long)]
        staking_mint: Pubkey,
        #[arg(long)]
        alloc_point: u64,
        /// Seconds each deposit stays locked.
        #[arg(long, default_value_t = 0)]
        lockup_period: u64,
        #[arg(long)]
        with_update: bool,
    },
    Deposit {
        #[arg(long)]
        pool_id: u64,
        #[arg(long)]
        amount: u64,
        /// Token account to pull from; defaults to the payer's ATA.
        #[arg(long)]
        source_token: Option<Pubkey>,
    },
    Withdraw {
        #[arg(long)]
        pool_id: u64,
        #[arg(long)]
        amount: u64,
    },
    Harvest {
        #[arg(long)]
        pool_id: u64,
    },
    UpdatePool {
        #[arg(long)]
        pool_id: u64,
    },
    MassUpdatePools {},
    FundRewards {
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        funder_token: Option<Pubkey>,
    },
    UpdateAdmin {
        #[arg(long)]
        new_admin: Pubkey,
    },
    PendingRewards {
        #[arg(long)]
        pool_id: u64,
        /// Defaults to the payer.
        #[arg(long)]
        user: Option<Pubkey>,
    },
    WithdrawableBalance {
        #[arg(long)]
        pool_id: u64,
        #[arg(long)]
        user: Option<Pubkey>,
    },
    UserDeposit {
        #[arg(long)]
        pool_id: u64,
        #[arg(long)]
        user: Option<Pubkey>,
    },
    PoolTvl {
        #[arg(long)]
        pool_id: u64,
    },
    AllPoolsTvl {},
    ShowConfig {},
}

#[derive(Debug, Serialize)]
struct PoolView {
    id: u64,
    address: String,
    staking_mint: String,
    alloc_point: u64,
    lockup_period: u64,
    last_accrual_block: u64,
    acc_reward_per_share: String,
    total_staked: u64,
}

#[derive(Debug, Serialize)]
struct ChefView {
    address: String,
    admin: String,
    reward_mint: String,
    reward_vault: String,
    reward_vault_balance: u64,
    start_block: u64,
    reward_per_block: u64,
    total_alloc_point: u64,
    pool_count: u64,
    pools: Vec<PoolView>,
}

fn send_instructions(
    rpc_client: &RpcClient,
    instructions: &[Instruction],
    signer_path: &str,
) -> Result<()> {
    let signer = read_keypair_file(signer_path)?;
    let recent_hash = rpc_client.get_latest_blockhash()?;
    let txn = Transaction::new_signed_with_payer(
        instructions,
        Some(&signer.pubkey()),
        &[&signer],
        recent_hash,
    );
    let signature = send_txn(rpc_client, &txn, true)?;
    println!("{} {}", "confirmed".color(Color::Green), signature);
    Ok(())
}

fn print_view(json: bool, view: serde_json::Value) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }
    match view {
        serde_json::Value::Object(fields) => {
            for (key, value) in fields {
                println!("{}: {}", key.color(Color::Cyan), value);
            }
        }
        other => println!("{}", other),
    }
    Ok(())
}

fn load_chef(rpc_client: &RpcClient, program_id: &Pubkey) -> Result<ChefConfig> {
    load_anchor_account(rpc_client, &get_chef_config_address(program_id))
}

fn load_pool(rpc_client: &RpcClient, program_id: &Pubkey, pool_id: u64) -> Result<Pool> {
    load_anchor_account(rpc_client, &get_pool_address(program_id, pool_id))
        .map_err(|_| format_err!("pool {} does not exist", pool_id))
}

fn load_position(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    pool_id: u64,
    user: &Pubkey,
) -> Result<Option<UserPosition>> {
    let pool = get_pool_address(program_id, pool_id);
    get_anchor_account(rpc_client, &get_user_position_address(program_id, &pool, user))
}

fn load_all_pools(rpc_client: &RpcClient, program_id: &Pubkey, pool_count: u64) -> Result<Vec<Pool>> {
    (0..pool_count)
        .map(|id| load_pool(rpc_client, program_id, id))
        .collect()
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let config = load_cfg("client_config.ini")?;
    let rpc_client = RpcClient::new(config.http_url.to_string());
    let program_id = config.masterchef_program;
    let payer = read_keypair_file(&config.payer_path)?.pubkey();

    match opts.command {
        ChefCommands::InitialiseChef {
            reward_mint,
            admin,
            start_block,
            reward_per_block,
        } => {
            let admin = match admin {
                Some(admin) => admin,
                None => read_keypair_file(&config.admin_path)?.pubkey(),
            };
            let token_program = get_token_program(&rpc_client, &reward_mint)?;
            let instructions = initialise_chef_instr(
                &config,
                reward_mint,
                token_program,
                admin,
                start_block,
                reward_per_block,
            )?;
            send_instructions(&rpc_client, &instructions, &config.admin_path)?;
        }
        ChefCommands::AddPool {
            staking_mint,
            alloc_point,
            lockup_period,
            with_update,
        } => {
            let chef = load_chef(&rpc_client, &program_id)?;
            let token_program = get_token_program(&rpc_client, &staking_mint)?;
            let instructions = add_pool_instr(
                &config,
                &chef,
                staking_mint,
                token_program,
                alloc_point,
                lockup_period,
                with_update,
            )?;
            send_instructions(&rpc_client, &instructions, &config.admin_path)?;
            println!("pool id: {}", chef.pool_count);
        }
        ChefCommands::Deposit {
            pool_id,
            amount,
            source_token,
        } => {
            let chef = load_chef(&rpc_client, &program_id)?;
            let pool = load_pool(&rpc_client, &program_id, pool_id)?;
            let token_programs = TokenPrograms {
                staking: get_token_program(&rpc_client, &pool.staking_mint)?,
                reward: get_token_program(&rpc_client, &chef.reward_mint)?,
            };
            let instructions =
                deposit_instr(&config, &chef, &pool, source_token, token_programs, amount)?;
            send_instructions(&rpc_client, &instructions, &config.payer_path)?;
        }
        ChefCommands::Withdraw { pool_id, amount } => {
            let chef = load_chef(&rpc_client, &program_id)?;
            let pool = load_pool(&rpc_client, &program_id, pool_id)?;
            let clock = get_clock(&rpc_client)?;
            let position = load_position(&rpc_client, &program_id, pool_id, &payer)?;
            if let Some(position) = position.as_ref() {
                let unlocked = position.withdrawable_amount(clock.unix_timestamp);
                if amount > unlocked {
                    println!(
                        "{} only {} of {} is unlocked",
                        "warning:".color(Color::Yellow),
                        unlocked,
                        position.total_amount
                    );
                }
            }
            let token_programs = TokenPrograms {
                staking: get_token_program(&rpc_client, &pool.staking_mint)?,
                reward: get_token_program(&rpc_client, &chef.reward_mint)?,
            };
            let instructions = withdraw_instr(
                &config,
                &chef,
                &pool,
                position.is_some(),
                token_programs,
                amount,
            )?;
            send_instructions(&rpc_client, &instructions, &config.payer_path)?;
        }
        ChefCommands::Harvest { pool_id } => {
            let chef = load_chef(&rpc_client, &program_id)?;
            let pool = load_pool(&rpc_client, &program_id, pool_id)?;
            let reward_token_program = get_token_program(&rpc_client, &chef.reward_mint)?;
            let has_position = load_position(&rpc_client, &program_id, pool_id, &payer)?.is_some();
            let instructions =
                harvest_instr(&config, &chef, &pool, has_position, reward_token_program)?;
            send_instructions(&rpc_client, &instructions, &config.payer_path)?;
        }
        ChefCommands::UpdatePool { pool_id } => {
            let instructions = update_pool_instr(&config, pool_id)?;
            send_instructions(&rpc_client, &instructions, &config.payer_path)?;
        }
        ChefCommands::MassUpdatePools {} => {
            let chef = load_chef(&rpc_client, &program_id)?;
            let instructions = mass_update_pools_instr(&config, chef.pool_count)?;
            send_instructions(&rpc_client, &instructions, &config.payer_path)?;
        }
        ChefCommands::FundRewards {
            amount,
            funder_token,
        } => {
            let chef = load_chef(&rpc_client, &program_id)?;
            let token_program = get_token_program(&rpc_client, &chef.reward_mint)?;
            let instructions =
                fund_rewards_instr(&config, &chef, funder_token, token_program, amount)?;
            send_instructions(&rpc_client, &instructions, &config.payer_path)?;
        }
        ChefCommands::UpdateAdmin { new_admin } => {
            let instructions = update_admin_instr(&config, new_admin)?;
            send_instructions(&rpc_client, &instructions, &config.admin_path)?;
        }
        ChefCommands::PendingRewards { pool_id, user } => {
            let user = user.unwrap_or(payer);
            let chef = load_chef(&rpc_client, &program_id)?;
            let pool = load_pool(&rpc_client, &program_id, pool_id)?;
            let clock = get_clock(&rpc_client)?;
            let pending = match load_position(&rpc_client, &program_id, pool_id, &user)? {
                Some(position) => {
                    ledger::pending_rewards(&pool, &position, clock.slot, &chef.schedule())
                        .map_err(|e| format_err!("{}", e))?
                }
                None => 0,
            };
            print_view(
                opts.json,
                serde_json::json!({
                    "pool_id": pool_id,
                    "user": user.to_string(),
                    "slot": clock.slot,
                    "pending_rewards": pending,
                }),
            )?;
        }
        ChefCommands::WithdrawableBalance { pool_id, user } => {
            let user = user.unwrap_or(payer);
            let clock = get_clock(&rpc_client)?;
            let withdrawable = load_position(&rpc_client, &program_id, pool_id, &user)?
                .map_or(0, |position| position.withdrawable_amount(clock.unix_timestamp));
            print_view(
                opts.json,
                serde_json::json!({
                    "pool_id": pool_id,
                    "user": user.to_string(),
                    "unix_timestamp": clock.unix_timestamp,
                    "withdrawable": withdrawable,
                }),
            )?;
        }
        ChefCommands::UserDeposit { pool_id, user } => {
            let user = user.unwrap_or(payer);
            let position = load_position(&rpc_client, &program_id, pool_id, &user)?;
            let (total_amount, batches) = position
                .map(|p| (p.total_amount, p.batches.len()))
                .unwrap_or((0, 0));
            print_view(
                opts.json,
                serde_json::json!({
                    "pool_id": pool_id,
                    "user": user.to_string(),
                    "total_deposit": total_amount,
                    "batches": batches,
                }),
            )?;
        }
        ChefCommands::PoolTvl { pool_id } => {
            let pool = load_pool(&rpc_client, &program_id, pool_id)?;
            print_view(
                opts.json,
                serde_json::json!({ "pool_id": pool_id, "tvl": pool.total_staked }),
            )?;
        }
        ChefCommands::AllPoolsTvl {} => {
            let chef = load_chef(&rpc_client, &program_id)?;
            let pools = load_all_pools(&rpc_client, &program_id, chef.pool_count)?;
            let tvl: Vec<u64> = pools.iter().map(|pool| pool.total_staked).collect();
            print_view(opts.json, serde_json::json!({ "tvl": tvl }))?;
        }
        ChefCommands::ShowConfig {} => {
            let chef = load_chef(&rpc_client, &program_id)?;
            let reward_vault_balance =
                token_account_amount(&rpc_client.get_account(&chef.reward_vault)?)?;
            let pools = load_all_pools(&rpc_client, &program_id, chef.pool_count)?;
            let view = ChefView {
                address: get_chef_config_address(&program_id).to_string(),
                admin: chef.admin.to_string(),
                reward_mint: chef.reward_mint.to_string(),
                reward_vault: chef.reward_vault.to_string(),
                reward_vault_balance,
                start_block: chef.start_block,
                reward_per_block: chef.reward_per_block,
                total_alloc_point: chef.total_alloc_point,
                pool_count: chef.pool_count,
                pools: pools
                    .iter()
                    .map(|pool| PoolView {
                        id: pool.id,
                        address: get_pool_address(&program_id, pool.id).to_string(),
                        staking_mint: pool.staking_mint.to_string(),
                        alloc_point: pool.alloc_point,
                        lockup_period: pool.lockup_period,
                        last_accrual_block: pool.last_accrual_block,
                        acc_reward_per_share: pool.acc_reward_per_share.to_string(),
                        total_staked: pool.total_staked,
                    })
                    .collect(),
            };
            print_view(opts.json, serde_json::to_value(&view)?)?;
        }
    }
    Ok(())
}
