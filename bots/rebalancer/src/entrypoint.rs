use anyhow::Result;
use clap::Parser;
use solana_sdk::pubkey::Pubkey;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::{
    config::{Config, GlobalOptions},
    processor,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[clap(version = VERSION)]
pub struct Opts {
    #[clap(flatten)]
    pub global: GlobalOptions,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Parser)]
pub enum Command {
    /// Run one rebalancing pass over the pool's validator set.
    Rebalance {
        stake_pool_address: Pubkey,
        /// SOL to keep undelegated in the reserve.
        #[clap(long = "retained-reserve", default_value_t = 0.0)]
        retained_reserve: f64,
    },
    /// Refresh validator and pool balances after an epoch boundary.
    Update { stake_pool_address: Pubkey },
    /// Decode and print the pool account and its validator list.
    Show { stake_pool_address: Pubkey },
}

pub fn entry(opts: Opts) -> Result<()> {
    let filter = EnvFilter::from_default_env();
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact());
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(&opts.global)?;
    let rt = tokio::runtime::Runtime::new()?;

    match opts.command {
        Command::Rebalance {
            stake_pool_address,
            retained_reserve,
        } => rt.block_on(processor::process_rebalance(
            &config,
            &stake_pool_address,
            retained_reserve,
        )),
        Command::Update { stake_pool_address } => {
            rt.block_on(processor::process_update(&config, &stake_pool_address))
        }
        Command::Show { stake_pool_address } => {
            rt.block_on(processor::process_show(&config, &stake_pool_address))
        }
    }
}
