use anyhow::Result;
use solana_sdk::{
    native_token::{lamports_to_sol, sol_to_lamports},
    pubkey::Pubkey,
    stake::state::StakeStateV2,
};
use stake_pool_sdk::addresses::MINIMUM_INCREASE_LAMPORTS;
use tracing::{info, warn};

use crate::{
    config::Config,
    executor::execute_actions,
    planner::{plan_rebalance, RebalanceConfig},
    snapshot::read_snapshot,
    update::update_pool_balances,
};

/// One full planning pass: snapshot, plan, dispatch.
pub async fn process_rebalance(
    config: &Config,
    stake_pool_address: &Pubkey,
    retained_reserve_sol: f64,
) -> Result<()> {
    let snapshot = read_snapshot(&config.rpc_client, stake_pool_address).await?;
    if snapshot.stake_pool.last_update_epoch < snapshot.epoch {
        warn!(
            "pool balances were last updated at epoch {}, current epoch is {}; run `update` first for accurate targets",
            snapshot.stake_pool.last_update_epoch, snapshot.epoch,
        );
    }

    let stake_rent_exemption = config
        .rpc_client
        .get_minimum_balance_for_rent_exemption(StakeStateV2::size_of())
        .await?;
    let rebalance_config = RebalanceConfig {
        retained_reserve_lamports: sol_to_lamports(retained_reserve_sol),
        stake_rent_exemption,
        minimum_increase_lamports: MINIMUM_INCREASE_LAMPORTS,
    };

    let actions = plan_rebalance(&snapshot, &rebalance_config);
    if actions.is_empty() {
        info!("validator stakes already at target, nothing to do");
        return Ok(());
    }
    info!("planned {} stake movements", actions.len());

    if config.dry_run {
        for action in &actions {
            println!("{action}");
        }
        return Ok(());
    }

    let outcomes = execute_actions(
        &config.rpc_client,
        &config.program_id,
        stake_pool_address,
        &snapshot,
        &config.staker,
        actions,
    )
    .await?;

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        warn!(
            "{} of {} stake movements failed; the next pass re-derives them from a fresh snapshot",
            failed,
            outcomes.len(),
        );
    }
    Ok(())
}

/// Refreshes validator and pool balances for the current epoch.
pub async fn process_update(config: &Config, stake_pool_address: &Pubkey) -> Result<()> {
    let snapshot = read_snapshot(&config.rpc_client, stake_pool_address).await?;
    if snapshot.stake_pool.last_update_epoch >= snapshot.epoch {
        info!(
            "pool balances are already current for epoch {}",
            snapshot.epoch
        );
        return Ok(());
    }
    update_pool_balances(
        &config.rpc_client,
        &config.program_id,
        stake_pool_address,
        &snapshot,
        &config.staker,
    )
    .await?;
    Ok(())
}

/// Decodes and prints the pool account and its validator list.
pub async fn process_show(config: &Config, stake_pool_address: &Pubkey) -> Result<()> {
    let snapshot = read_snapshot(&config.rpc_client, stake_pool_address).await?;
    let pool = &snapshot.stake_pool;

    println!("Stake pool:       {stake_pool_address}");
    println!("Manager:          {}", pool.manager);
    println!("Staker:           {}", pool.staker);
    println!("Validator list:   {}", pool.validator_list);
    println!(
        "Reserve:          {} ({} SOL)",
        pool.reserve_stake,
        lamports_to_sol(snapshot.reserve_lamports)
    );
    println!(
        "Total lamports:   {} ({} SOL)",
        pool.total_lamports,
        lamports_to_sol(pool.total_lamports)
    );
    println!("Pool token supply: {}", pool.pool_token_supply);
    println!(
        "Last update:      epoch {} (current epoch {})",
        pool.last_update_epoch, snapshot.epoch
    );
    println!(
        "Epoch fee:        {}/{}",
        pool.epoch_fee.numerator, pool.epoch_fee.denominator
    );
    if let Some(fee) = pool.next_epoch_fee {
        println!("Next epoch fee:   {}/{}", fee.numerator, fee.denominator);
    }
    if let Some(preferred) = pool.preferred_deposit_validator {
        println!("Preferred deposit validator:  {preferred}");
    }
    if let Some(preferred) = pool.preferred_withdraw_validator {
        println!("Preferred withdraw validator: {preferred}");
    }

    println!("Validators ({}):", snapshot.validators.len());
    for validator in &snapshot.validators {
        println!(
            "  {}: active {} transient {} (updated epoch {})",
            validator.vote_account_address,
            validator.active_stake_lamports,
            validator.transient_stake_lamports,
            validator.last_update_epoch,
        );
    }
    Ok(())
}
