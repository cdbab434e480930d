//! Instruction types and builders.

#![allow(clippy::too_many_arguments)]

use std::num::NonZeroU32;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    stake, system_program, sysvar,
};

use crate::{
    addresses::{
        find_ephemeral_stake_program_address, find_stake_program_address,
        find_transient_stake_program_address, find_withdraw_authority_program_address,
        stake_config,
    },
    state::{Fee, StakePool, ValidatorStakeInfo},
};

/// Selects which preferred validator to set.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreferredValidatorType {
    Deposit,
    Withdraw,
}

/// Selects which funding authority to update.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FundingType {
    StakeDeposit,
    SolDeposit,
    SolWithdraw,
}

/// Instructions supported by the stake pool program. Declaration order pins
/// the one-byte discriminants, so unused variants must stay in place.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum StakePoolInstruction {
    ///   Initializes a new stake pool.
    Initialize {
        epoch_fee: Fee,
        withdrawal_fee: Fee,
        deposit_fee: Fee,
        referral_fee: u8,
        max_validators: u32,
    },

    ///   (Staker only) Adds a stake account delegated to `validator_vote` to
    ///   the pool's managed list.
    ///
    ///   0. `[w]` Stake pool
    ///   1. `[s]` Staker
    ///   2. `[w]` Reserve stake account
    ///   3. `[]` Withdraw authority
    ///   4. `[w]` Validator list
    ///   5. `[w]` Validator stake account to add
    ///   6. `[]` Validator vote account
    ///   7. `[]` Rent sysvar
    ///   8. `[]` Clock sysvar
    ///   9. `[]` Stake history sysvar
    ///  10. `[]` Stake config sysvar
    ///  11. `[]` System program
    ///  12. `[]` Stake program
    AddValidatorToPool { seed: u32 },

    ///   (Staker only) Removes a validator from the pool. Fails while a
    ///   transient activation for the validator is still in flight.
    ///
    ///   0. `[w]` Stake pool
    ///   1. `[s]` Staker
    ///   2. `[]` Withdraw authority
    ///   3. `[w]` Validator list
    ///   4. `[w]` Validator stake account to remove
    ///   5. `[]` Transient stake account
    ///   6. `[]` Clock sysvar
    ///   7. `[]` Stake program
    RemoveValidatorFromPool,

    /// Superseded by `DecreaseValidatorStakeWithReserve`.
    DecreaseValidatorStake {
        lamports: u64,
        transient_stake_seed: u64,
    },

    ///   (Staker only) Moves lamports from the reserve onto a validator via
    ///   a new transient stake account.
    ///
    ///   0. `[]` Stake pool
    ///   1. `[s]` Staker
    ///   2. `[]` Withdraw authority
    ///   3. `[w]` Validator list
    ///   4. `[w]` Reserve stake account
    ///   5. `[w]` Transient stake account to create
    ///   6. `[]` Canonical validator stake account
    ///   7. `[]` Validator vote account
    ///   8. `[]` Clock sysvar
    ///   9. `[]` Rent sysvar
    ///  10. `[]` Stake history sysvar
    ///  11. `[]` Stake config sysvar
    ///  12. `[]` System program
    ///  13. `[]` Stake program
    IncreaseValidatorStake {
        lamports: u64,
        transient_stake_seed: u64,
    },

    SetPreferredValidator {
        validator_type: PreferredValidatorType,
        validator_vote_address: Option<Pubkey>,
    },

    ///   Refreshes the recorded balances of a slice of the validator list,
    ///   merging settled transient accounts unless `no_merge` is set.
    ///
    ///   0. `[]` Stake pool
    ///   1. `[]` Withdraw authority
    ///   2. `[w]` Validator list
    ///   3. `[w]` Reserve stake account
    ///   4. `[]` Clock sysvar
    ///   5. `[]` Stake history sysvar
    ///   6. `[]` Stake program
    ///   7. ..7+2N `[w]` N validator/transient stake account pairs
    UpdateValidatorListBalance { start_index: u32, no_merge: bool },

    ///   Recomputes the pool's total lamports from the refreshed validator
    ///   list and mints the epoch fee.
    UpdateStakePoolBalance,

    ///   Drops validator entries marked `ReadyForRemoval`.
    CleanupRemovedValidatorEntries,

    DepositStake,

    WithdrawStake { pool_tokens: u64 },

    SetManager,

    SetFee,

    SetStaker,

    ///   Deposits SOL into the pool's reserve for pool tokens.
    DepositSol { lamports: u64 },

    SetFundingAuthority { auth: FundingType },

    ///   Burns pool tokens and withdraws SOL from the reserve.
    WithdrawSol { pool_tokens: u64 },

    CreateTokenMetadata {
        name: String,
        symbol: String,
        uri: String,
    },

    UpdateTokenMetadata {
        name: String,
        symbol: String,
        uri: String,
    },

    ///   (Staker only) Tops up an in-flight activation through an ephemeral
    ///   stake account that is merged into the existing transient account.
    IncreaseAdditionalValidatorStake {
        lamports: u64,
        transient_stake_seed: u64,
        ephemeral_stake_seed: u64,
    },

    ///   (Staker only) Splits more stake off a validator into an in-flight
    ///   deactivation through an ephemeral stake account.
    DecreaseAdditionalValidatorStake {
        lamports: u64,
        transient_stake_seed: u64,
        ephemeral_stake_seed: u64,
    },

    ///   (Staker only) Moves lamports off a validator toward the reserve via
    ///   a new transient stake account, reclaiming the transient rent from
    ///   the reserve on settlement.
    ///
    ///   0. `[]` Stake pool
    ///   1. `[s]` Staker
    ///   2. `[]` Withdraw authority
    ///   3. `[w]` Validator list
    ///   4. `[w]` Reserve stake account
    ///   5. `[w]` Canonical validator stake account
    ///   6. `[w]` Transient stake account to create
    ///   7. `[]` Clock sysvar
    ///   8. `[]` Stake history sysvar
    ///   9. `[]` System program
    ///  10. `[]` Stake program
    DecreaseValidatorStakeWithReserve {
        lamports: u64,
        transient_stake_seed: u64,
    },

    Redelegate,
}

impl StakePoolInstruction {
    fn encode(&self) -> Vec<u8> {
        // Serializing a fixed-shape enum into a Vec cannot fail.
        self.try_to_vec().unwrap()
    }
}

pub fn add_validator_to_pool(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    staker: &Pubkey,
    reserve_stake: &Pubkey,
    withdraw_authority: &Pubkey,
    validator_list: &Pubkey,
    validator_stake: &Pubkey,
    validator_vote: &Pubkey,
    seed: Option<NonZeroU32>,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new(*stake_pool, false),
        AccountMeta::new_readonly(*staker, true),
        AccountMeta::new(*reserve_stake, false),
        AccountMeta::new_readonly(*withdraw_authority, false),
        AccountMeta::new(*validator_list, false),
        AccountMeta::new(*validator_stake, false),
        AccountMeta::new_readonly(*validator_vote, false),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(sysvar::stake_history::id(), false),
        AccountMeta::new_readonly(stake_config::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(stake::program::id(), false),
    ];
    Instruction {
        program_id: *program_id,
        accounts,
        data: StakePoolInstruction::AddValidatorToPool {
            seed: seed.map_or(0, NonZeroU32::get),
        }
        .encode(),
    }
}

pub fn remove_validator_from_pool(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    staker: &Pubkey,
    withdraw_authority: &Pubkey,
    validator_list: &Pubkey,
    validator_stake: &Pubkey,
    transient_stake: &Pubkey,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new(*stake_pool, false),
        AccountMeta::new_readonly(*staker, true),
        AccountMeta::new_readonly(*withdraw_authority, false),
        AccountMeta::new(*validator_list, false),
        AccountMeta::new(*validator_stake, false),
        AccountMeta::new(*transient_stake, false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(stake::program::id(), false),
    ];
    Instruction {
        program_id: *program_id,
        accounts,
        data: StakePoolInstruction::RemoveValidatorFromPool.encode(),
    }
}

pub fn increase_validator_stake(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    staker: &Pubkey,
    withdraw_authority: &Pubkey,
    validator_list: &Pubkey,
    reserve_stake: &Pubkey,
    transient_stake: &Pubkey,
    validator_stake: &Pubkey,
    validator_vote: &Pubkey,
    lamports: u64,
    transient_stake_seed: u64,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new_readonly(*stake_pool, false),
        AccountMeta::new_readonly(*staker, true),
        AccountMeta::new_readonly(*withdraw_authority, false),
        AccountMeta::new(*validator_list, false),
        AccountMeta::new(*reserve_stake, false),
        AccountMeta::new(*transient_stake, false),
        AccountMeta::new_readonly(*validator_stake, false),
        AccountMeta::new_readonly(*validator_vote, false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
        AccountMeta::new_readonly(sysvar::stake_history::id(), false),
        AccountMeta::new_readonly(stake_config::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(stake::program::id(), false),
    ];
    Instruction {
        program_id: *program_id,
        accounts,
        data: StakePoolInstruction::IncreaseValidatorStake {
            lamports,
            transient_stake_seed,
        }
        .encode(),
    }
}

pub fn increase_additional_validator_stake(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    staker: &Pubkey,
    withdraw_authority: &Pubkey,
    validator_list: &Pubkey,
    reserve_stake: &Pubkey,
    ephemeral_stake: &Pubkey,
    transient_stake: &Pubkey,
    validator_stake: &Pubkey,
    validator_vote: &Pubkey,
    lamports: u64,
    transient_stake_seed: u64,
    ephemeral_stake_seed: u64,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new_readonly(*stake_pool, false),
        AccountMeta::new_readonly(*staker, true),
        AccountMeta::new_readonly(*withdraw_authority, false),
        AccountMeta::new(*validator_list, false),
        AccountMeta::new(*reserve_stake, false),
        AccountMeta::new(*ephemeral_stake, false),
        AccountMeta::new(*transient_stake, false),
        AccountMeta::new_readonly(*validator_stake, false),
        AccountMeta::new_readonly(*validator_vote, false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(sysvar::stake_history::id(), false),
        AccountMeta::new_readonly(stake_config::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(stake::program::id(), false),
    ];
    Instruction {
        program_id: *program_id,
        accounts,
        data: StakePoolInstruction::IncreaseAdditionalValidatorStake {
            lamports,
            transient_stake_seed,
            ephemeral_stake_seed,
        }
        .encode(),
    }
}

pub fn decrease_validator_stake_with_reserve(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    staker: &Pubkey,
    withdraw_authority: &Pubkey,
    validator_list: &Pubkey,
    reserve_stake: &Pubkey,
    validator_stake: &Pubkey,
    transient_stake: &Pubkey,
    lamports: u64,
    transient_stake_seed: u64,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new_readonly(*stake_pool, false),
        AccountMeta::new_readonly(*staker, true),
        AccountMeta::new_readonly(*withdraw_authority, false),
        AccountMeta::new(*validator_list, false),
        AccountMeta::new(*reserve_stake, false),
        AccountMeta::new(*validator_stake, false),
        AccountMeta::new(*transient_stake, false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(sysvar::stake_history::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(stake::program::id(), false),
    ];
    Instruction {
        program_id: *program_id,
        accounts,
        data: StakePoolInstruction::DecreaseValidatorStakeWithReserve {
            lamports,
            transient_stake_seed,
        }
        .encode(),
    }
}

pub fn decrease_additional_validator_stake(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    staker: &Pubkey,
    withdraw_authority: &Pubkey,
    validator_list: &Pubkey,
    reserve_stake: &Pubkey,
    validator_stake: &Pubkey,
    ephemeral_stake: &Pubkey,
    transient_stake: &Pubkey,
    lamports: u64,
    transient_stake_seed: u64,
    ephemeral_stake_seed: u64,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new_readonly(*stake_pool, false),
        AccountMeta::new_readonly(*staker, true),
        AccountMeta::new_readonly(*withdraw_authority, false),
        AccountMeta::new(*validator_list, false),
        AccountMeta::new(*reserve_stake, false),
        AccountMeta::new(*validator_stake, false),
        AccountMeta::new(*ephemeral_stake, false),
        AccountMeta::new(*transient_stake, false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(sysvar::stake_history::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(stake::program::id(), false),
    ];
    Instruction {
        program_id: *program_id,
        accounts,
        data: StakePoolInstruction::DecreaseAdditionalValidatorStake {
            lamports,
            transient_stake_seed,
            ephemeral_stake_seed,
        }
        .encode(),
    }
}

pub fn update_validator_list_balance(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    withdraw_authority: &Pubkey,
    validator_list: &Pubkey,
    reserve_stake: &Pubkey,
    validator_and_transient_stake_pairs: &[Pubkey],
    start_index: u32,
    no_merge: bool,
) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new_readonly(*stake_pool, false),
        AccountMeta::new_readonly(*withdraw_authority, false),
        AccountMeta::new(*validator_list, false),
        AccountMeta::new(*reserve_stake, false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(sysvar::stake_history::id(), false),
        AccountMeta::new_readonly(stake::program::id(), false),
    ];
    accounts.extend(
        validator_and_transient_stake_pairs
            .iter()
            .map(|pubkey| AccountMeta::new(*pubkey, false)),
    );
    Instruction {
        program_id: *program_id,
        accounts,
        data: StakePoolInstruction::UpdateValidatorListBalance {
            start_index,
            no_merge,
        }
        .encode(),
    }
}

pub fn update_stake_pool_balance(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    withdraw_authority: &Pubkey,
    validator_list: &Pubkey,
    reserve_stake: &Pubkey,
    manager_fee_account: &Pubkey,
    pool_mint: &Pubkey,
    token_program_id: &Pubkey,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new(*stake_pool, false),
        AccountMeta::new_readonly(*withdraw_authority, false),
        AccountMeta::new(*validator_list, false),
        AccountMeta::new_readonly(*reserve_stake, false),
        AccountMeta::new(*manager_fee_account, false),
        AccountMeta::new(*pool_mint, false),
        AccountMeta::new_readonly(*token_program_id, false),
    ];
    Instruction {
        program_id: *program_id,
        accounts,
        data: StakePoolInstruction::UpdateStakePoolBalance.encode(),
    }
}

pub fn cleanup_removed_validator_entries(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    validator_list: &Pubkey,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new_readonly(*stake_pool, false),
        AccountMeta::new(*validator_list, false),
    ];
    Instruction {
        program_id: *program_id,
        accounts,
        data: StakePoolInstruction::CleanupRemovedValidatorEntries.encode(),
    }
}

pub fn deposit_sol(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    withdraw_authority: &Pubkey,
    reserve_stake: &Pubkey,
    funding_account: &Pubkey,
    destination_pool_account: &Pubkey,
    manager_fee_account: &Pubkey,
    referral_pool_account: &Pubkey,
    pool_mint: &Pubkey,
    token_program_id: &Pubkey,
    sol_deposit_authority: Option<&Pubkey>,
    lamports: u64,
) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new(*stake_pool, false),
        AccountMeta::new_readonly(*withdraw_authority, false),
        AccountMeta::new(*reserve_stake, false),
        AccountMeta::new(*funding_account, true),
        AccountMeta::new(*destination_pool_account, false),
        AccountMeta::new(*manager_fee_account, false),
        AccountMeta::new(*referral_pool_account, false),
        AccountMeta::new(*pool_mint, false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(*token_program_id, false),
    ];
    if let Some(authority) = sol_deposit_authority {
        accounts.push(AccountMeta::new_readonly(*authority, true));
    }
    Instruction {
        program_id: *program_id,
        accounts,
        data: StakePoolInstruction::DepositSol { lamports }.encode(),
    }
}

pub fn withdraw_sol(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    withdraw_authority: &Pubkey,
    source_transfer_authority: &Pubkey,
    source_pool_account: &Pubkey,
    reserve_stake: &Pubkey,
    destination_system_account: &Pubkey,
    manager_fee_account: &Pubkey,
    pool_mint: &Pubkey,
    token_program_id: &Pubkey,
    sol_withdraw_authority: Option<&Pubkey>,
    pool_tokens: u64,
) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new(*stake_pool, false),
        AccountMeta::new_readonly(*withdraw_authority, false),
        AccountMeta::new_readonly(*source_transfer_authority, true),
        AccountMeta::new(*source_pool_account, false),
        AccountMeta::new(*reserve_stake, false),
        AccountMeta::new(*destination_system_account, false),
        AccountMeta::new(*manager_fee_account, false),
        AccountMeta::new(*pool_mint, false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(sysvar::stake_history::id(), false),
        AccountMeta::new_readonly(stake::program::id(), false),
        AccountMeta::new_readonly(*token_program_id, false),
    ];
    if let Some(authority) = sol_withdraw_authority {
        accounts.push(AccountMeta::new_readonly(*authority, true));
    }
    Instruction {
        program_id: *program_id,
        accounts,
        data: StakePoolInstruction::WithdrawSol { pool_tokens }.encode(),
    }
}

/// Builds an increase for a validator straight from its list entry, deriving
/// the PDA set. A fresh operation bumps the transient seed suffix by one so
/// a previously settled account is never reused.
pub fn increase_validator_stake_with_vote(
    program_id: &Pubkey,
    stake_pool: &StakePool,
    stake_pool_address: &Pubkey,
    staker: &Pubkey,
    validator: &ValidatorStakeInfo,
    lamports: u64,
) -> Instruction {
    let (withdraw_authority, _) =
        find_withdraw_authority_program_address(program_id, stake_pool_address);
    let transient_stake_seed = validator.transient_seed_suffix.wrapping_add(1);
    let (transient_stake, _) = find_transient_stake_program_address(
        program_id,
        &validator.vote_account_address,
        stake_pool_address,
        transient_stake_seed,
    );
    let (validator_stake, _) = find_stake_program_address(
        program_id,
        &validator.vote_account_address,
        stake_pool_address,
        NonZeroU32::new(validator.validator_seed_suffix),
    );
    increase_validator_stake(
        program_id,
        stake_pool_address,
        staker,
        &withdraw_authority,
        &stake_pool.validator_list,
        &stake_pool.reserve_stake,
        &transient_stake,
        &validator_stake,
        &validator.vote_account_address,
        lamports,
        transient_stake_seed,
    )
}

/// Builds a decrease for a validator straight from its list entry, deriving
/// the PDA set; see [`increase_validator_stake_with_vote`] for the seed
/// convention.
pub fn decrease_validator_stake_with_vote(
    program_id: &Pubkey,
    stake_pool: &StakePool,
    stake_pool_address: &Pubkey,
    staker: &Pubkey,
    validator: &ValidatorStakeInfo,
    lamports: u64,
) -> Instruction {
    let (withdraw_authority, _) =
        find_withdraw_authority_program_address(program_id, stake_pool_address);
    let transient_stake_seed = validator.transient_seed_suffix.wrapping_add(1);
    let (transient_stake, _) = find_transient_stake_program_address(
        program_id,
        &validator.vote_account_address,
        stake_pool_address,
        transient_stake_seed,
    );
    let (validator_stake, _) = find_stake_program_address(
        program_id,
        &validator.vote_account_address,
        stake_pool_address,
        NonZeroU32::new(validator.validator_seed_suffix),
    );
    decrease_validator_stake_with_reserve(
        program_id,
        stake_pool_address,
        staker,
        &withdraw_authority,
        &stake_pool.validator_list,
        &stake_pool.reserve_stake,
        &validator_stake,
        &transient_stake,
        lamports,
        transient_stake_seed,
    )
}

/// Tops up an in-flight activation. The transient seed of the existing
/// account is reused, the ephemeral account bridges the split.
pub fn increase_additional_validator_stake_with_vote(
    program_id: &Pubkey,
    stake_pool: &StakePool,
    stake_pool_address: &Pubkey,
    staker: &Pubkey,
    validator: &ValidatorStakeInfo,
    lamports: u64,
    ephemeral_stake_seed: u64,
) -> Instruction {
    let (withdraw_authority, _) =
        find_withdraw_authority_program_address(program_id, stake_pool_address);
    let (ephemeral_stake, _) = find_ephemeral_stake_program_address(
        program_id,
        stake_pool_address,
        ephemeral_stake_seed,
    );
    let (transient_stake, _) = find_transient_stake_program_address(
        program_id,
        &validator.vote_account_address,
        stake_pool_address,
        validator.transient_seed_suffix,
    );
    let (validator_stake, _) = find_stake_program_address(
        program_id,
        &validator.vote_account_address,
        stake_pool_address,
        NonZeroU32::new(validator.validator_seed_suffix),
    );
    increase_additional_validator_stake(
        program_id,
        stake_pool_address,
        staker,
        &withdraw_authority,
        &stake_pool.validator_list,
        &stake_pool.reserve_stake,
        &ephemeral_stake,
        &transient_stake,
        &validator_stake,
        &validator.vote_account_address,
        lamports,
        validator.transient_seed_suffix,
        ephemeral_stake_seed,
    )
}

/// Splits more stake off a validator into an in-flight deactivation; the
/// transient seed of the existing account is reused.
pub fn decrease_additional_validator_stake_with_vote(
    program_id: &Pubkey,
    stake_pool: &StakePool,
    stake_pool_address: &Pubkey,
    staker: &Pubkey,
    validator: &ValidatorStakeInfo,
    lamports: u64,
    ephemeral_stake_seed: u64,
) -> Instruction {
    let (withdraw_authority, _) =
        find_withdraw_authority_program_address(program_id, stake_pool_address);
    let (ephemeral_stake, _) = find_ephemeral_stake_program_address(
        program_id,
        stake_pool_address,
        ephemeral_stake_seed,
    );
    let (transient_stake, _) = find_transient_stake_program_address(
        program_id,
        &validator.vote_account_address,
        stake_pool_address,
        validator.transient_seed_suffix,
    );
    let (validator_stake, _) = find_stake_program_address(
        program_id,
        &validator.vote_account_address,
        stake_pool_address,
        NonZeroU32::new(validator.validator_seed_suffix),
    );
    decrease_additional_validator_stake(
        program_id,
        stake_pool_address,
        staker,
        &withdraw_authority,
        &stake_pool.validator_list,
        &stake_pool.reserve_stake,
        &validator_stake,
        &ephemeral_stake,
        &transient_stake,
        lamports,
        validator.transient_seed_suffix,
        ephemeral_stake_seed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StakePool;

    fn pool_fixture() -> (StakePool, Pubkey, Pubkey) {
        let pool = StakePool {
            validator_list: Pubkey::new_unique(),
            reserve_stake: Pubkey::new_unique(),
            ..StakePool::default()
        };
        (pool, Pubkey::new_unique(), Pubkey::new_unique())
    }

    #[test]
    fn increase_data_layout() {
        let ix = increase_validator_stake(
            &crate::id(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            97_717_120,
            3,
        );
        assert_eq!(ix.data[0], 4);
        assert_eq!(ix.data[1..9], 97_717_120u64.to_le_bytes());
        assert_eq!(ix.data[9..17], 3u64.to_le_bytes());
        assert_eq!(ix.data.len(), 17);
        assert_eq!(ix.accounts.len(), 14);
    }

    #[test]
    fn decrease_with_reserve_data_layout() {
        let ix = decrease_validator_stake_with_reserve(
            &crate::id(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            1_000_000,
            9,
        );
        assert_eq!(ix.data[0], 21);
        assert_eq!(ix.data[1..9], 1_000_000u64.to_le_bytes());
        assert_eq!(ix.data[9..17], 9u64.to_le_bytes());
    }

    #[test]
    fn additional_increase_carries_ephemeral_seed() {
        let (pool, pool_address, staker) = pool_fixture();
        let validator = ValidatorStakeInfo {
            transient_stake_lamports: 500,
            transient_seed_suffix: 11,
            vote_account_address: Pubkey::new_unique(),
            ..ValidatorStakeInfo::default()
        };

        let ix = increase_additional_validator_stake_with_vote(
            &crate::id(),
            &pool,
            &pool_address,
            &staker,
            &validator,
            2_000_000,
            42,
        );
        assert_eq!(ix.data[0], 19);
        assert_eq!(ix.data[9..17], 11u64.to_le_bytes());
        assert_eq!(ix.data[17..25], 42u64.to_le_bytes());

        // The in-flight transient account is addressed with its current
        // seed, not a bumped one.
        let (transient_stake, _) = find_transient_stake_program_address(
            &crate::id(),
            &validator.vote_account_address,
            &pool_address,
            11,
        );
        assert_eq!(ix.accounts[6].pubkey, transient_stake);
    }

    #[test]
    fn fresh_increase_bumps_transient_seed() {
        let (pool, pool_address, staker) = pool_fixture();
        let validator = ValidatorStakeInfo {
            transient_seed_suffix: 7,
            vote_account_address: Pubkey::new_unique(),
            ..ValidatorStakeInfo::default()
        };

        let ix = increase_validator_stake_with_vote(
            &crate::id(),
            &pool,
            &pool_address,
            &staker,
            &validator,
            50_000_000,
        );

        let (transient_stake, _) = find_transient_stake_program_address(
            &crate::id(),
            &validator.vote_account_address,
            &pool_address,
            8,
        );
        assert_eq!(ix.accounts[5].pubkey, transient_stake);
        assert_eq!(ix.accounts[4].pubkey, pool.reserve_stake);
    }

    #[test]
    fn update_list_balance_data_layout() {
        let pairs = [Pubkey::new_unique(), Pubkey::new_unique()];
        let ix = update_validator_list_balance(
            &crate::id(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &pairs,
            5,
            false,
        );
        assert_eq!(ix.data, vec![6, 5, 0, 0, 0, 0]);
        assert_eq!(ix.accounts.len(), 7 + pairs.len());
    }

    #[test]
    fn deposit_sol_appends_optional_authority() {
        let keys: Vec<Pubkey> = (0..9).map(|_| Pubkey::new_unique()).collect();
        let authority = Pubkey::new_unique();
        let without = deposit_sol(
            &crate::id(),
            &keys[0],
            &keys[1],
            &keys[2],
            &keys[3],
            &keys[4],
            &keys[5],
            &keys[6],
            &keys[7],
            &keys[8],
            None,
            1,
        );
        let with = deposit_sol(
            &crate::id(),
            &keys[0],
            &keys[1],
            &keys[2],
            &keys[3],
            &keys[4],
            &keys[5],
            &keys[6],
            &keys[7],
            &keys[8],
            Some(&authority),
            1,
        );
        assert_eq!(with.accounts.len(), without.accounts.len() + 1);
        assert!(with.accounts.last().unwrap().is_signer);
        assert_eq!(with.data[0], 14);
    }
}
