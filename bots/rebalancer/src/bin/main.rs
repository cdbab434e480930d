use anyhow::Result;
use clap::Parser;
use stake_pool_rebalancer::Opts;

fn main() -> Result<()> {
    stake_pool_rebalancer::entry(Opts::parse())
}
