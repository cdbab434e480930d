//! Account state for the stake pool program.
//!
//! All accounts serialize with borsh: little-endian fixed-width integers,
//! one-byte enum discriminants and one-byte `Option` tags.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::StakePoolError;

/// Discriminates the program's account kinds.
#[derive(
    BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
pub enum AccountType {
    #[default]
    Uninitialized,
    StakePool,
    ValidatorList,
}

/// Fee assessed by the pool, expressed as numerator / denominator.
#[derive(
    BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
pub struct Fee {
    pub denominator: u64,
    pub numerator: u64,
}

/// Withdrawal restrictions carried over from the underlying stake accounts.
#[derive(
    BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
pub struct Lockup {
    pub unix_timestamp: i64,
    pub epoch: u64,
    pub custodian: Pubkey,
}

/// The stake pool account.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq)]
pub struct StakePool {
    pub account_type: AccountType,
    pub manager: Pubkey,
    pub staker: Pubkey,
    pub stake_deposit_authority: Pubkey,
    pub stake_withdraw_bump_seed: u8,
    pub validator_list: Pubkey,
    pub reserve_stake: Pubkey,
    pub pool_mint: Pubkey,
    pub manager_fee_account: Pubkey,
    pub token_program_id: Pubkey,
    /// Total value managed by the pool: reserve plus every validator's
    /// active and transient stake.
    pub total_lamports: u64,
    pub pool_token_supply: u64,
    /// Epoch at which `total_lamports` was last recomputed on-chain.
    pub last_update_epoch: u64,
    pub lockup: Lockup,
    pub epoch_fee: Fee,
    pub next_epoch_fee: Option<Fee>,
    pub preferred_deposit_validator: Option<Pubkey>,
    pub preferred_withdraw_validator: Option<Pubkey>,
    pub stake_deposit_fee: Fee,
    pub stake_withdrawal_fee: Fee,
    pub next_stake_withdrawal_fee: Option<Fee>,
    pub stake_referral_fee: u8,
    pub sol_deposit_authority: Option<Pubkey>,
    pub sol_deposit_fee: Fee,
    pub sol_referral_fee: u8,
    pub sol_withdraw_authority: Option<Pubkey>,
    pub sol_withdrawal_fee: Fee,
    pub next_sol_withdrawal_fee: Option<Fee>,
    pub last_epoch_pool_token_supply: u64,
    pub last_epoch_total_lamports: u64,
}

impl StakePool {
    pub fn decode(data: &[u8]) -> Result<Self, StakePoolError> {
        let pool = Self::deserialize(&mut &data[..])?;
        if pool.account_type != AccountType::StakePool {
            return Err(StakePoolError::UnexpectedAccountType {
                expected: AccountType::StakePool,
                found: pool.account_type,
            });
        }
        Ok(pool)
    }
}

/// Status of a validator's stake account within the pool.
#[derive(
    BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
pub enum StakeStatus {
    #[default]
    Active,
    DeactivatingTransient,
    ReadyForRemoval,
    DeactivatingValidator,
    DeactivatingAll,
}

/// One entry of the pool's validator list.
#[derive(
    BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
pub struct ValidatorStakeInfo {
    /// Stake delegated to this validator and currently earning rewards.
    pub active_stake_lamports: u64,
    /// Stake still activating or deactivating; nonzero means an operation is
    /// in flight for this validator.
    pub transient_stake_lamports: u64,
    /// Epoch at which both balance fields were last refreshed on-chain.
    pub last_update_epoch: u64,
    /// Seed suffix of the current transient stake account.
    pub transient_seed_suffix: u64,
    pub unused: u32,
    /// Seed suffix of the canonical stake account, 0 for the unseeded
    /// derivation.
    pub validator_seed_suffix: u32,
    pub status: StakeStatus,
    pub vote_account_address: Pubkey,
}

impl ValidatorStakeInfo {
    /// Total lamports attributed to this validator.
    pub fn stake_lamports(&self) -> u64 {
        self.active_stake_lamports
            .saturating_add(self.transient_stake_lamports)
    }

    /// True while an increase or decrease is still settling for this
    /// validator; a second operation would collide with the transient
    /// account.
    pub fn has_transient_stake(&self) -> bool {
        self.transient_stake_lamports != 0
    }
}

/// List of validators managed by a pool. The on-chain account is
/// preallocated for `max_validators`, so raw account data carries trailing
/// padding past the serialized entries.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq)]
pub struct ValidatorList {
    pub account_type: AccountType,
    pub max_validators: u32,
    pub validators: Vec<ValidatorStakeInfo>,
}

impl ValidatorList {
    pub fn decode(data: &[u8]) -> Result<Self, StakePoolError> {
        // deserialize (not try_from_slice): the account is preallocated and
        // keeps zeroed space after the last live entry.
        let list = Self::deserialize(&mut &data[..])?;
        if list.account_type != AccountType::ValidatorList {
            return Err(StakePoolError::UnexpectedAccountType {
                expected: AccountType::ValidatorList,
                found: list.account_type,
            });
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validator_list_decodes_with_trailing_padding() {
        let list = ValidatorList {
            account_type: AccountType::ValidatorList,
            max_validators: 100,
            validators: vec![
                ValidatorStakeInfo {
                    active_stake_lamports: 5_000_000_000,
                    vote_account_address: Pubkey::new_unique(),
                    ..ValidatorStakeInfo::default()
                },
                ValidatorStakeInfo {
                    active_stake_lamports: 1_000_000_000,
                    transient_stake_lamports: 2_000_000_000,
                    transient_seed_suffix: 7,
                    status: StakeStatus::DeactivatingTransient,
                    vote_account_address: Pubkey::new_unique(),
                    ..ValidatorStakeInfo::default()
                },
            ],
        };

        let mut data = list.try_to_vec().unwrap();
        // Simulate the preallocated on-chain account.
        data.resize(data.len() + 1024, 0);

        let decoded = ValidatorList::decode(&data).unwrap();
        assert_eq!(decoded, list);
        assert!(!decoded.validators[0].has_transient_stake());
        assert!(decoded.validators[1].has_transient_stake());
        assert_eq!(decoded.validators[1].stake_lamports(), 3_000_000_000);
    }

    #[test]
    fn stake_pool_decode_checks_account_type() {
        let pool = StakePool {
            account_type: AccountType::StakePool,
            total_lamports: 42,
            next_epoch_fee: Some(Fee {
                denominator: 100,
                numerator: 3,
            }),
            preferred_withdraw_validator: Some(Pubkey::new_unique()),
            ..StakePool::default()
        };

        let data = pool.try_to_vec().unwrap();
        let decoded = StakePool::decode(&data).unwrap();
        assert_eq!(decoded, pool);

        let uninitialized = StakePool::default().try_to_vec().unwrap();
        assert!(matches!(
            StakePool::decode(&uninitialized),
            Err(StakePoolError::UnexpectedAccountType { .. })
        ));
    }

    #[test]
    fn validator_list_rejects_stake_pool_bytes() {
        let list = ValidatorList {
            account_type: AccountType::StakePool,
            max_validators: 1,
            validators: vec![],
        };
        let data = list.try_to_vec().unwrap();
        assert!(ValidatorList::decode(&data).is_err());
    }
}
