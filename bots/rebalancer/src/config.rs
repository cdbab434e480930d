use anyhow::{anyhow, Result};
use clap::Parser;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
};

const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// RPC endpoint.
    #[clap(global = true, short = 'u', long = "url", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Stake pool program id.
    #[clap(global = true, short = 'p', long = "program", default_value_t = stake_pool_sdk::id())]
    pub program_id: Pubkey,

    /// Staker keypair that signs increase/decrease operations (and pays
    /// fees).
    #[clap(global = true, short = 'k', long = "keypair", default_value_t = default_wallet_path())]
    pub wallet_path: String,

    /// Print planned actions without submitting anything.
    #[clap(global = true, long = "dry-run", action, default_value_t = false)]
    pub dry_run: bool,
}

fn default_wallet_path() -> String {
    match dirs::home_dir() {
        Some(mut path) => {
            path.push(".config/solana/id.json");
            path.display().to_string()
        }
        None => ".config/solana/id.json".to_string(),
    }
}

pub struct Config {
    pub rpc_client: RpcClient,
    pub program_id: Pubkey,
    pub staker: Keypair,
    pub dry_run: bool,
}

impl Config {
    pub fn load(options: &GlobalOptions) -> Result<Self> {
        let wallet_path = shellexpand::tilde(&options.wallet_path).to_string();
        let staker = read_keypair_file(&wallet_path)
            .map_err(|err| anyhow!("failed to read keypair {}: {}", wallet_path, err))?;
        let rpc_client = RpcClient::new_with_commitment(
            options.rpc_url.clone(),
            CommitmentConfig::confirmed(),
        );

        Ok(Self {
            rpc_client,
            program_id: options.program_id,
            staker,
            dry_run: options.dry_run,
        })
    }
}
