//! Token funding on a fork by impersonating a faucet account.

use alloy::primitives::{Address, Bytes, TxHash, U256, address};
use alloy::sol_types::SolCall;
use tracing::info;

use ccip_evm::{EvmError, Fork};

use crate::bindings::LinkToken;

/// Account holding LINK on the networks chainlink-local supports.
pub const LINK_FAUCET: Address = address!("0x4281eCF07378Ee595C564a59048801330f3084eE");

/// Sends `amount` LINK from [`LINK_FAUCET`] to `to` and returns the
/// transaction hash.
pub async fn request_link_from_faucet<F: Fork>(
    fork: &F,
    link_token: Address,
    to: Address,
    amount: U256,
) -> Result<TxHash, EvmError> {
    request_funds_from(fork, LINK_FAUCET, link_token, to, amount).await
}

/// Transfers `amount` of an ERC20 `token` from `faucet` to `to`.
///
/// The faucet must already hold the tokens and enough native balance for
/// gas. Fails if the transfer reverts.
pub async fn request_funds_from<F: Fork>(
    fork: &F,
    faucet: Address,
    token: Address,
    to: Address,
    amount: U256,
) -> Result<TxHash, EvmError> {
    info!(%faucet, %token, %to, %amount, "Requesting funds from faucet");

    let calldata = LinkToken::transferCall { to, amount };
    let receipt = fork
        .send_as(
            faucet,
            token,
            Bytes::from(calldata.abi_encode()),
            "faucet transfer",
        )
        .await?;

    Ok(receipt.transaction_hash)
}
