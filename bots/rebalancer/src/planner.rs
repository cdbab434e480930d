//! Turns a pool snapshot into the increase/decrease operations that move
//! every validator toward an even share of the delegated total.
//!
//! Pure given its inputs: no I/O, no ambient state, deterministic. This is
//! what keeps it unit-testable without a cluster.

use std::fmt;

use solana_sdk::pubkey::Pubkey;
use tracing::{info, warn};

use crate::snapshot::PoolSnapshot;

#[derive(Clone, Copy, Debug)]
pub struct RebalanceConfig {
    /// Lamports to keep idle in the reserve, never delegated.
    pub retained_reserve_lamports: u64,
    /// Minimum balance a stake account must hold to persist; every increase
    /// funds one transient account's worth from the reserve.
    pub stake_rent_exemption: u64,
    /// Increases below this are skipped as dust.
    pub minimum_increase_lamports: u64,
}

/// One planned stake movement. Actions of a pass touch distinct validators,
/// so they carry no ordering dependency on each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebalanceAction {
    /// Move lamports from the reserve onto a validator.
    Increase {
        vote_account: Pubkey,
        lamports: u64,
    },
    /// Move lamports off a validator back toward the reserve.
    Decrease {
        vote_account: Pubkey,
        lamports: u64,
    },
}

impl RebalanceAction {
    pub fn vote_account(&self) -> &Pubkey {
        match self {
            Self::Increase { vote_account, .. } | Self::Decrease { vote_account, .. } => {
                vote_account
            }
        }
    }

    pub fn lamports(&self) -> u64 {
        match self {
            Self::Increase { lamports, .. } | Self::Decrease { lamports, .. } => *lamports,
        }
    }
}

impl fmt::Display for RebalanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increase {
                vote_account,
                lamports,
            } => write!(f, "increase {lamports} lamports on {vote_account}"),
            Self::Decrease {
                vote_account,
                lamports,
            } => write!(f, "decrease {lamports} lamports on {vote_account}"),
        }
    }
}

/// Computes the actions for one pass.
///
/// The target is computed twice: a provisional even split first, then a
/// corrected one after deducting the rent-exempt floor every prospective
/// increase pulls out of the reserve. Without the correction the plan would
/// ask for more lamports than the reserve can fund and fail on-chain.
pub fn plan_rebalance(
    snapshot: &PoolSnapshot,
    config: &RebalanceConfig,
) -> Vec<RebalanceAction> {
    let validator_count = snapshot.validators.len() as u64;
    if validator_count == 0 {
        info!("validator list is empty, nothing to rebalance");
        return vec![];
    }

    let total_lamports = snapshot.total_lamports();
    let Some(mut usable_total) = total_lamports.checked_sub(config.retained_reserve_lamports)
    else {
        warn!(
            "retained reserve of {} lamports exceeds the pool total of {}, nothing to delegate",
            config.retained_reserve_lamports, total_lamports,
        );
        return vec![];
    };

    let mut movable = Vec::with_capacity(snapshot.validators.len());
    for validator in &snapshot.validators {
        if validator.has_transient_stake() {
            info!(
                "validator {} has {} lamports still in transition, skipping until the next epoch",
                validator.vote_account_address, validator.transient_stake_lamports,
            );
        } else {
            movable.push(validator);
        }
    }

    let target_per_validator = usable_total / validator_count;
    let num_increases = movable
        .iter()
        .filter(|validator| validator.active_stake_lamports < target_per_validator)
        .count() as u64;

    // Each increase funds a transient account's rent floor out of the
    // reserve, and that rent does not come back until the epoch rolls the
    // transient balance into "active".
    usable_total =
        usable_total.saturating_sub(num_increases.saturating_mul(config.stake_rent_exemption));
    let target_per_validator = usable_total / validator_count;

    let mut actions = Vec::new();
    for validator in movable {
        let active = validator.active_stake_lamports;
        if active > target_per_validator {
            let lamports = active - target_per_validator;
            if lamports <= config.stake_rent_exemption {
                info!(
                    "validator {} is {} lamports over target, not worth a transient account",
                    validator.vote_account_address, lamports,
                );
                continue;
            }
            actions.push(RebalanceAction::Decrease {
                vote_account: validator.vote_account_address,
                lamports,
            });
        } else if active < target_per_validator {
            let lamports = target_per_validator - active;
            if lamports < config.minimum_increase_lamports {
                info!(
                    "validator {} is only {} lamports under target, skipping dust increase",
                    validator.vote_account_address, lamports,
                );
                continue;
            }
            actions.push(RebalanceAction::Increase {
                vote_account: validator.vote_account_address,
                lamports,
            });
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use stake_pool_sdk::state::{StakePool, ValidatorStakeInfo};

    const STAKE_RENT_EXEMPTION: u64 = 2_282_880;
    const MINIMUM_INCREASE: u64 = 10_000_000;

    fn config(retained: u64) -> RebalanceConfig {
        RebalanceConfig {
            retained_reserve_lamports: retained,
            stake_rent_exemption: STAKE_RENT_EXEMPTION,
            minimum_increase_lamports: MINIMUM_INCREASE,
        }
    }

    fn validator(active: u64, transient: u64) -> ValidatorStakeInfo {
        ValidatorStakeInfo {
            active_stake_lamports: active,
            transient_stake_lamports: transient,
            vote_account_address: Pubkey::new_unique(),
            ..ValidatorStakeInfo::default()
        }
    }

    fn snapshot(total: u64, validators: Vec<ValidatorStakeInfo>) -> PoolSnapshot {
        let delegated: u64 = validators
            .iter()
            .map(|v| v.active_stake_lamports + v.transient_stake_lamports)
            .sum();
        PoolSnapshot {
            stake_pool: StakePool {
                total_lamports: total,
                ..StakePool::default()
            },
            reserve_lamports: total.saturating_sub(delegated),
            validators,
            epoch: 400,
        }
    }

    /// A pool with an empty reserve and three fresh validators gets three
    /// increases sized to the rent-corrected even split.
    #[test]
    fn empty_validators_split_the_reserve() {
        let snap = snapshot(
            300_000_000,
            vec![validator(0, 0), validator(0, 0), validator(0, 0)],
        );
        let actions = plan_rebalance(&snap, &config(0));

        // (300_000_000 - 3 * 2_282_880) / 3
        let expected = 97_717_120;
        assert_eq!(actions.len(), 3);
        for (action, v) in actions.iter().zip(&snap.validators) {
            assert_eq!(
                *action,
                RebalanceAction::Increase {
                    vote_account: v.vote_account_address,
                    lamports: expected,
                }
            );
        }
    }

    /// After the increases from `empty_validators_split_the_reserve` settle
    /// and the epoch rolls over, re-planning on the new snapshot is a no-op.
    #[test]
    fn settled_pool_plans_nothing() {
        let snap = snapshot(
            300_000_000,
            vec![
                validator(97_717_120, 0),
                validator(97_717_120, 0),
                validator(97_717_120, 0),
            ],
        );
        assert!(plan_rebalance(&snap, &config(0)).is_empty());
    }

    /// Convergence no-op: every validator exactly at the even split.
    #[test]
    fn even_distribution_is_a_noop() {
        let snap = snapshot(
            300_000_000,
            vec![
                validator(100_000_000, 0),
                validator(100_000_000, 0),
                validator(100_000_000, 0),
            ],
        );
        assert!(plan_rebalance(&snap, &config(0)).is_empty());
    }

    /// A validator with stake in transition never appears in the plan, no
    /// matter how far off target it is.
    #[test]
    fn in_flight_validators_are_skipped() {
        let busy = validator(900_000_000, 50_000_000);
        let busy_vote = busy.vote_account_address;
        let snap = snapshot(
            1_000_000_000,
            vec![busy, validator(20_000_000, 0), validator(20_000_000, 0)],
        );

        let actions = plan_rebalance(&snap, &config(0));
        assert!(!actions.is_empty());
        assert!(actions.iter().all(|a| *a.vote_account() != busy_vote));
    }

    /// A decrease no larger than the rent-exempt floor and an increase below
    /// the dust threshold are both suppressed.
    #[test]
    fn dust_candidates_are_suppressed() {
        // Two validators sit below the provisional target of 100_000_000
        // (including the first), so the corrected target works out to
        // (300_000_000 - 2 * rent) / 3 = 98_478_080.
        let over_by_dust = validator(99_239_540, 0);
        let snap = snapshot(
            300_000_000,
            vec![
                over_by_dust,
                validator(149_239_040, 0),
                validator(49_239_040, 0),
            ],
        );
        let target = 98_478_080;

        let actions = plan_rebalance(&snap, &config(0));
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[0],
            RebalanceAction::Decrease {
                vote_account: snap.validators[1].vote_account_address,
                lamports: 149_239_040 - target,
            }
        );
        assert_eq!(
            actions[1],
            RebalanceAction::Increase {
                vote_account: snap.validators[2].vote_account_address,
                lamports: target - 49_239_040,
            }
        );
        // The first validator sits within rent-exemption of the target; no
        // decrease is emitted for it.
        assert!(actions
            .iter()
            .all(|a| *a.vote_account() != snap.validators[0].vote_account_address));
    }

    #[test]
    fn small_increases_are_dust() {
        // Every validator is under target by less than the minimum increase.
        let snap = snapshot(
            300_000_000,
            vec![
                validator(97_000_000, 0),
                validator(97_000_000, 0),
                validator(97_000_000, 0),
            ],
        );
        assert!(plan_rebalance(&snap, &config(0)).is_empty());
    }

    /// No validators means no plan and, importantly, no division fault.
    #[test]
    fn empty_pool_is_safe() {
        let snap = snapshot(300_000_000, vec![]);
        assert!(plan_rebalance(&snap, &config(0)).is_empty());
    }

    /// A retained reserve larger than the pool is a configuration problem,
    /// answered with an empty plan rather than an error.
    #[test]
    fn oversized_retained_reserve_plans_nothing() {
        let snap = snapshot(300_000_000, vec![validator(0, 0), validator(0, 0)]);
        assert!(plan_rebalance(&snap, &config(400_000_000)).is_empty());
    }

    /// The retained amount stays out of the targets.
    #[test]
    fn retained_reserve_reduces_targets() {
        let snap = snapshot(300_000_000, vec![validator(0, 0), validator(0, 0)]);
        let actions = plan_rebalance(&snap, &config(100_000_000));

        // (200_000_000 - 2 * 2_282_880) / 2
        let expected = 97_717_120;
        assert_eq!(actions.len(), 2);
        assert!(actions
            .iter()
            .all(|a| a.lamports() == expected && matches!(a, RebalanceAction::Increase { .. })));
    }

    /// The reserve is never overcommitted: total increases plus the rent
    /// they consume, net of decreases, fit inside the usable total.
    #[test]
    fn plans_never_overcommit_the_reserve() {
        let snapshots = [
            snapshot(
                300_000_000,
                vec![validator(0, 0), validator(0, 0), validator(0, 0)],
            ),
            snapshot(
                1_000_000_000,
                vec![
                    validator(700_000_000, 0),
                    validator(100_000_000, 0),
                    validator(0, 0),
                    validator(0, 25_000_000),
                ],
            ),
            snapshot(
                5_000_000_003,
                vec![
                    validator(2_500_000_000, 0),
                    validator(1_000_000_001, 0),
                    validator(999_999_999, 0),
                    validator(0, 0),
                    validator(500_000_000, 0),
                ],
            ),
        ];

        for snap in &snapshots {
            let cfg = config(0);
            let actions = plan_rebalance(snap, &cfg);
            let increases: u64 = actions
                .iter()
                .filter(|a| matches!(a, RebalanceAction::Increase { .. }))
                .map(RebalanceAction::lamports)
                .sum();
            let decreases: u64 = actions
                .iter()
                .filter(|a| matches!(a, RebalanceAction::Decrease { .. }))
                .map(RebalanceAction::lamports)
                .sum();
            let num_increases = actions
                .iter()
                .filter(|a| matches!(a, RebalanceAction::Increase { .. }))
                .count() as u64;

            let committed =
                increases + num_increases * cfg.stake_rent_exemption;
            assert!(
                committed <= snap.total_lamports() + decreases,
                "committed {} exceeds usable {} + decreases {}",
                committed,
                snap.total_lamports(),
                decreases,
            );
        }
    }
}
