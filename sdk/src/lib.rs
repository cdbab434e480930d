//! Client-side types and instruction builders for the stake pool program.
//!
//! The on-chain program itself lives elsewhere; this crate only knows how to
//! decode its accounts, derive its program addresses and build its
//! instructions.

pub mod addresses;
pub mod error;
pub mod instruction;
pub mod state;

solana_program::declare_id!("SPoo1Ku8WFXoNDMHPsrGSTSG1Y47rzgn41SLUNakuHy");
