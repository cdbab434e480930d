use solana_client::client_error::ClientError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RebalancerError {
    #[error("rpc request failed: {0}")]
    Rpc(#[from] ClientError),

    #[error("failed to parse account data for: {0}")]
    FailedToParseAccountData(Pubkey),

    #[error("validator {0} is not in the pool's validator list")]
    UnknownValidator(Pubkey),
}
