//! Manual message delivery on the destination fork.
//!
//! A forked network has no DON relaying messages, so we look up the
//! off-ramp the Router registered for the message's source chain and
//! call `executeSingleMessage` on it while impersonating the off-ramp
//! itself (the call is `onlySelf` guarded).

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::sol_types::SolCall;
use thiserror::Error;
use tracing::{debug, info};

use ccip_evm::error_decoding::decode_custom_error;
use ccip_evm::{EvmError, Fork};

use crate::bindings::{EVM2EVMOffRamp, Internal, Router};
use crate::message::Evm2EvmMessage;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Calling router.getOffRamps threw the following error: {0}")]
    GetOffRamps(#[source] EvmError),
    #[error(
        "No offRamp contract found for source chain selector {source_chain_selector}, \
         message has not been routed. Check your input parameters please"
    )]
    NoMatchingOffRamp { source_chain_selector: u64 },
    #[error("failed to fund offRamp {off_ramp} for gas: {source}")]
    FundOffRamp {
        off_ramp: Address,
        #[source]
        source: EvmError,
    },
    #[error("offRamp {off_ramp} failed to execute message: {source}")]
    Execute {
        off_ramp: Address,
        #[source]
        source: EvmError,
    },
}

/// Native balance given to the off-ramp so it can pay for its own
/// execution (100^18 wei).
fn off_ramp_gas_balance() -> U256 {
    U256::from(100).pow(U256::from(18))
}

/// Looks up the off-ramp registered on `router` for the message's source
/// chain.
pub async fn find_off_ramp<F: Fork>(
    fork: &F,
    router: Address,
    source_chain_selector: u64,
) -> Result<Address, RouteError> {
    let off_ramps = fork
        .call_sol(router, Router::getOffRampsCall {})
        .await
        .map_err(|err| {
            RouteError::GetOffRamps(decode_custom_error::<Router::RouterErrors>(err))
        })?;

    debug!(%router, count = off_ramps.len(), "Fetched registered offRamps");

    off_ramps
        .into_iter()
        .find(|off_ramp| off_ramp.sourceChainSelector == source_chain_selector)
        .map(|off_ramp| off_ramp.offRamp)
        .ok_or(RouteError::NoMatchingOffRamp {
            source_chain_selector,
        })
}

/// Routes `message` through the off-ramp registered on the destination
/// `router` and returns the execution transaction hash.
pub async fn route_message<F: Fork>(
    fork: &F,
    router: Address,
    message: &Evm2EvmMessage,
) -> Result<TxHash, RouteError> {
    let off_ramp = find_off_ramp(fork, router, message.source_chain_selector).await?;

    info!(
        %off_ramp,
        message_id = %message.message_id,
        source_chain_selector = message.source_chain_selector,
        "Routing message through offRamp"
    );

    fork.set_balance(off_ramp, off_ramp_gas_balance())
        .await
        .map_err(|source| RouteError::FundOffRamp { off_ramp, source })?;

    let offchain_token_data = vec![Bytes::new(); message.token_amounts.len()];
    let calldata = EVM2EVMOffRamp::executeSingleMessageCall {
        message: Internal::EVM2EVMMessage::from(message),
        offchainTokenData: offchain_token_data,
    };

    let receipt = fork
        .send_as(
            off_ramp,
            off_ramp,
            Bytes::from(calldata.abi_encode()),
            "executeSingleMessage",
        )
        .await
        .map_err(|err| RouteError::Execute {
            off_ramp,
            source: decode_custom_error::<EVM2EVMOffRamp::EVM2EVMOffRampErrors>(err),
        })?;

    Ok(receipt.transaction_hash)
}
