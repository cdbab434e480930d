//! Refreshes the pool's recorded balances after an epoch boundary.
//!
//! The validator list is refreshed in slices of `MAX_VALIDATORS_TO_UPDATE`
//! entries; the slices are independent and run concurrently. Once they have
//! all landed, a final transaction recomputes the pool total and drops
//! entries that were marked for removal.

use std::num::NonZeroU32;

use futures::future::join_all;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use stake_pool_sdk::{
    addresses::{
        find_stake_program_address, find_transient_stake_program_address,
        find_withdraw_authority_program_address, MAX_VALIDATORS_TO_UPDATE,
    },
    instruction::{
        cleanup_removed_validator_entries, update_stake_pool_balance,
        update_validator_list_balance,
    },
};
use tracing::info;

use crate::{error::RebalancerError, snapshot::PoolSnapshot};

pub async fn update_pool_balances(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    stake_pool_address: &Pubkey,
    snapshot: &PoolSnapshot,
    payer: &Keypair,
) -> Result<(), RebalancerError> {
    let (withdraw_authority, _) =
        find_withdraw_authority_program_address(program_id, stake_pool_address);
    let pool = &snapshot.stake_pool;

    let list_instructions: Vec<_> = snapshot
        .validators
        .chunks(MAX_VALIDATORS_TO_UPDATE)
        .enumerate()
        .map(|(chunk_index, chunk)| {
            let pairs: Vec<Pubkey> = chunk
                .iter()
                .flat_map(|validator| {
                    let (validator_stake, _) = find_stake_program_address(
                        program_id,
                        &validator.vote_account_address,
                        stake_pool_address,
                        NonZeroU32::new(validator.validator_seed_suffix),
                    );
                    let (transient_stake, _) = find_transient_stake_program_address(
                        program_id,
                        &validator.vote_account_address,
                        stake_pool_address,
                        validator.transient_seed_suffix,
                    );
                    [validator_stake, transient_stake]
                })
                .collect();
            update_validator_list_balance(
                program_id,
                stake_pool_address,
                &withdraw_authority,
                &pool.validator_list,
                &pool.reserve_stake,
                &pairs,
                (chunk_index * MAX_VALIDATORS_TO_UPDATE) as u32,
                false,
            )
        })
        .collect();

    let recent_blockhash = rpc_client.get_latest_blockhash().await?;
    let chunk_count = list_instructions.len();

    let results = join_all(list_instructions.into_iter().map(|instruction| async move {
        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&payer.pubkey()),
            &[payer],
            recent_blockhash,
        );
        rpc_client.send_and_confirm_transaction(&transaction).await
    }))
    .await;
    results
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    info!("refreshed balances for {} validator list slices", chunk_count);

    let transaction = Transaction::new_signed_with_payer(
        &[
            update_stake_pool_balance(
                program_id,
                stake_pool_address,
                &withdraw_authority,
                &pool.validator_list,
                &pool.reserve_stake,
                &pool.manager_fee_account,
                &pool.pool_mint,
                &pool.token_program_id,
            ),
            cleanup_removed_validator_entries(
                program_id,
                stake_pool_address,
                &pool.validator_list,
            ),
        ],
        Some(&payer.pubkey()),
        &[payer],
        recent_blockhash,
    );
    let signature = rpc_client.send_and_confirm_transaction(&transaction).await?;
    info!("pool balance update confirmed: {signature}");

    Ok(())
}
