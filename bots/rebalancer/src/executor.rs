//! Dispatches one pass worth of rebalance actions.
//!
//! Every action touches a disjoint validator/transient account pair, so all
//! of them go out concurrently and one rejection never blocks or rolls back
//! its siblings. A validator that is temporarily ineligible on-chain simply
//! fails its own transaction and gets re-derived on the next pass.

use futures::future::join_all;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use stake_pool_sdk::instruction::{
    decrease_validator_stake_with_vote, increase_validator_stake_with_vote,
};
use tracing::{info, warn};

use crate::{
    error::RebalancerError,
    planner::RebalanceAction,
    snapshot::PoolSnapshot,
};

/// What happened to one action of the pass.
pub struct ActionOutcome {
    pub action: RebalanceAction,
    pub result: Result<Signature, RebalancerError>,
}

/// Submits every action as its own transaction, signed by the staker, and
/// waits for all of them to confirm or fail individually.
pub async fn execute_actions(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    stake_pool_address: &Pubkey,
    snapshot: &PoolSnapshot,
    staker: &Keypair,
    actions: Vec<RebalanceAction>,
) -> Result<Vec<ActionOutcome>, RebalancerError> {
    let recent_blockhash = rpc_client.get_latest_blockhash().await?;

    let outcomes = join_all(actions.into_iter().map(|action| async move {
        let result = submit_action(
            rpc_client,
            program_id,
            stake_pool_address,
            snapshot,
            staker,
            &action,
            recent_blockhash,
        )
        .await;
        match &result {
            Ok(signature) => info!("{action} confirmed: {signature}"),
            Err(err) => warn!("{action} failed: {err}"),
        }
        ActionOutcome { action, result }
    }))
    .await;

    Ok(outcomes)
}

async fn submit_action(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    stake_pool_address: &Pubkey,
    snapshot: &PoolSnapshot,
    staker: &Keypair,
    action: &RebalanceAction,
    recent_blockhash: Hash,
) -> Result<Signature, RebalancerError> {
    let vote_account = action.vote_account();
    let validator = snapshot
        .validators
        .iter()
        .find(|validator| validator.vote_account_address == *vote_account)
        .ok_or(RebalancerError::UnknownValidator(*vote_account))?;

    let instruction = match action {
        RebalanceAction::Increase { lamports, .. } => increase_validator_stake_with_vote(
            program_id,
            &snapshot.stake_pool,
            stake_pool_address,
            &staker.pubkey(),
            validator,
            *lamports,
        ),
        RebalanceAction::Decrease { lamports, .. } => decrease_validator_stake_with_vote(
            program_id,
            &snapshot.stake_pool,
            stake_pool_address,
            &staker.pubkey(),
            validator,
            *lamports,
        ),
    };

    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&staker.pubkey()),
        &[staker],
        recent_blockhash,
    );
    let signature = rpc_client.send_and_confirm_transaction(&transaction).await?;
    Ok(signature)
}
