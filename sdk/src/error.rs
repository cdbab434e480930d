use thiserror::Error;

use crate::state::AccountType;

#[derive(Error, Debug)]
pub enum StakePoolError {
    #[error("failed to deserialize account data: {0}")]
    Deserialize(#[from] std::io::Error),

    #[error("unexpected account type, expected {expected:?} but found {found:?}")]
    UnexpectedAccountType {
        expected: AccountType,
        found: AccountType,
    },
}
