//! Helpers for exercising CCIP on local forks.
//!
//! A forked network has the real CCIP contracts but no DON relaying
//! messages between chains. This crate fills that gap: it funds accounts
//! with LINK from a known faucet, pulls sent messages out of on-ramp
//! receipts, and executes them on the destination off-ramp.

pub mod bindings;
pub mod cli;
pub mod config;
pub mod faucet;
pub mod message;
pub mod router;

#[cfg(test)]
mod mock;

pub use ccip_evm::{AnvilFork, Evm, EvmError, Fork};
pub use config::setup_tracing;
pub use faucet::{LINK_FAUCET, request_funds_from, request_link_from_faucet};
pub use message::{
    Evm2AnyRampMessage, Evm2EvmMessage, SentRampMessage, get_evm2any_ramp_message,
    get_evm2evm_message,
};
pub use router::{RouteError, find_off_ramp, route_message};
