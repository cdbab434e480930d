//! Program-derived addresses and protocol constants.

use std::num::NonZeroU32;

use solana_program::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey};

/// Seed tagging the pool's withdraw authority.
const AUTHORITY_WITHDRAW: &[u8] = b"withdraw";

/// Seed tagging the pool's stake deposit authority.
const AUTHORITY_DEPOSIT: &[u8] = b"deposit";

/// Seed prefix for transient stake accounts.
const TRANSIENT_STAKE_SEED_PREFIX: &[u8] = b"transient";

/// Seed prefix for ephemeral stake accounts.
const EPHEMERAL_STAKE_SEED_PREFIX: &[u8] = b"ephemeral";

/// Maximum number of validator entries one `UpdateValidatorListBalance`
/// instruction can refresh.
pub const MAX_VALIDATORS_TO_UPDATE: usize = 5;

/// Increases below this amount are not worth the transaction and transient
/// account overhead.
pub const MINIMUM_INCREASE_LAMPORTS: u64 = LAMPORTS_PER_SOL / 100;

/// The stake config sysvar, not exposed by `solana_program` sysvar ids.
pub mod stake_config {
    solana_program::declare_id!("StakeConfig11111111111111111111111111111111");
}

pub fn find_withdraw_authority_program_address(
    program_id: &Pubkey,
    stake_pool_address: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[stake_pool_address.as_ref(), AUTHORITY_WITHDRAW],
        program_id,
    )
}

pub fn find_deposit_authority_program_address(
    program_id: &Pubkey,
    stake_pool_address: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[stake_pool_address.as_ref(), AUTHORITY_DEPOSIT],
        program_id,
    )
}

/// Derives a validator's canonical stake account. A non-zero `seed` selects
/// one of the alternate stake accounts for the same vote account.
pub fn find_stake_program_address(
    program_id: &Pubkey,
    vote_account_address: &Pubkey,
    stake_pool_address: &Pubkey,
    seed: Option<NonZeroU32>,
) -> (Pubkey, u8) {
    let seed_bytes = seed.map(|seed| seed.get().to_le_bytes());
    Pubkey::find_program_address(
        &[
            vote_account_address.as_ref(),
            stake_pool_address.as_ref(),
            seed_bytes.as_ref().map_or(&[], |bytes| bytes.as_slice()),
        ],
        program_id,
    )
}

/// Derives the transient stake account holding a validator's activating or
/// deactivating lamports for the given seed suffix.
pub fn find_transient_stake_program_address(
    program_id: &Pubkey,
    vote_account_address: &Pubkey,
    stake_pool_address: &Pubkey,
    seed: u64,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            TRANSIENT_STAKE_SEED_PREFIX,
            vote_account_address.as_ref(),
            stake_pool_address.as_ref(),
            &seed.to_le_bytes(),
        ],
        program_id,
    )
}

/// Derives the ephemeral stake account used when topping up an in-flight
/// transient stake account.
pub fn find_ephemeral_stake_program_address(
    program_id: &Pubkey,
    stake_pool_address: &Pubkey,
    seed: u64,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            EPHEMERAL_STAKE_SEED_PREFIX,
            stake_pool_address.as_ref(),
            &seed.to_le_bytes(),
        ],
        program_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_addresses_differ_per_seed() {
        let program_id = crate::id();
        let vote = Pubkey::new_unique();
        let pool = Pubkey::new_unique();

        let (first, _) = find_transient_stake_program_address(&program_id, &vote, &pool, 0);
        let (second, _) = find_transient_stake_program_address(&program_id, &vote, &pool, 1);
        assert_ne!(first, second);

        // Derivation is deterministic for the same inputs.
        let (again, _) = find_transient_stake_program_address(&program_id, &vote, &pool, 1);
        assert_eq!(second, again);
    }

    #[test]
    fn seeded_stake_account_differs_from_canonical() {
        let program_id = crate::id();
        let vote = Pubkey::new_unique();
        let pool = Pubkey::new_unique();

        let (canonical, _) = find_stake_program_address(&program_id, &vote, &pool, None);
        let (seeded, _) =
            find_stake_program_address(&program_id, &vote, &pool, NonZeroU32::new(1));
        assert_ne!(canonical, seeded);
    }

    #[test]
    fn authorities_are_distinct() {
        let program_id = crate::id();
        let pool = Pubkey::new_unique();

        let (withdraw, _) = find_withdraw_authority_program_address(&program_id, &pool);
        let (deposit, _) = find_deposit_authority_program_address(&program_id, &pool);
        assert_ne!(withdraw, deposit);
    }
}
