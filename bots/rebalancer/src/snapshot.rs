//! One consistent-enough view of a stake pool.

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use stake_pool_sdk::state::{StakePool, ValidatorList, ValidatorStakeInfo};
use tracing::info;

use crate::error::RebalancerError;

/// Immutable view of a pool as of one planning pass.
///
/// The pool account and the validator list are read in separate rounds of
/// I/O, so the validator balances may reflect a total slightly different
/// from `total_lamports`; the planner tolerates that skew.
#[derive(Clone, Debug)]
pub struct PoolSnapshot {
    pub stake_pool: StakePool,
    /// Validator entries in on-chain list order.
    pub validators: Vec<ValidatorStakeInfo>,
    /// Balance of the pool's undelegated reserve account.
    pub reserve_lamports: u64,
    /// Epoch the snapshot was taken in.
    pub epoch: u64,
}

impl PoolSnapshot {
    /// Total value held across the reserve and all validators.
    pub fn total_lamports(&self) -> u64 {
        self.stake_pool.total_lamports
    }
}

/// Reads the pool account, its validator list and the reserve balance. Any
/// failure aborts the planning pass; retries are left to the next scheduled
/// pass.
pub async fn read_snapshot(
    rpc_client: &RpcClient,
    stake_pool_address: &Pubkey,
) -> Result<PoolSnapshot, RebalancerError> {
    let pool_account = rpc_client.get_account(stake_pool_address).await?;
    let stake_pool = StakePool::decode(&pool_account.data)
        .map_err(|_| RebalancerError::FailedToParseAccountData(*stake_pool_address))?;

    let list_account = rpc_client.get_account(&stake_pool.validator_list).await?;
    let validator_list = ValidatorList::decode(&list_account.data)
        .map_err(|_| RebalancerError::FailedToParseAccountData(stake_pool.validator_list))?;

    let reserve_lamports = rpc_client.get_balance(&stake_pool.reserve_stake).await?;
    let epoch_info = rpc_client.get_epoch_info().await?;

    info!(
        "pool {} holds {} lamports across {} validators, {} in reserve",
        stake_pool_address,
        stake_pool.total_lamports,
        validator_list.validators.len(),
        reserve_lamports,
    );

    Ok(PoolSnapshot {
        stake_pool,
        validators: validator_list.validators,
        reserve_lamports,
        epoch: epoch_info.epoch,
    })
}
