pub mod config;
pub mod entrypoint;
pub mod error;
pub mod executor;
pub mod planner;
pub mod processor;
pub mod snapshot;
pub mod update;

pub use entrypoint::{entry, Opts};
