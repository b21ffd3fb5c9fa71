//! Contract error decoding utilities.
//!
//! Turns RPC errors that carry Solidity revert data into
//! [`EvmError::DecodedRevert`] with a human-readable reason. Custom errors
//! are named against the reverting contract's error set by
//! [`decode_custom_error`].

use std::fmt;

use alloy::primitives::Bytes;
use alloy::sol_types::{Panic, Revert, SolError, SolInterface};
use alloy::transports::{RpcError, TransportErrorKind};
use tracing::debug;

use crate::EvmError;

/// Handles an RPC error by attempting to decode its revert data.
///
/// `Error(string)` and `Panic(uint256)` payloads become
/// [`EvmError::DecodedRevert`]; custom errors become
/// [`EvmError::UnknownRevert`]. Errors without revert data are wrapped as
/// [`EvmError::Contract`].
pub fn decode_rpc_error(err: RpcError<TransportErrorKind>) -> EvmError {
    // Wrap in alloy::contract::Error to reuse its revert data extraction
    let contract_err = alloy::contract::Error::TransportError(err);
    handle_contract_error(contract_err)
}

/// Same as [`decode_rpc_error`] for errors already surfaced by a contract
/// call.
pub fn handle_contract_error(err: alloy::contract::Error) -> EvmError {
    let Some(revert_data) = err.as_revert_data() else {
        return EvmError::Contract(err);
    };

    decode_revert_data(&revert_data).unwrap_or_else(|| {
        debug!("Failed to decode revert data");
        EvmError::Contract(err)
    })
}

/// Decodes raw revert data.
///
/// Custom errors come back as [`EvmError::UnknownRevert`] carrying the
/// full payload so callers that know the reverting contract can name them
/// with [`decode_custom_error`]. Returns `None` when the data is too short
/// to hold a selector.
pub fn decode_revert_data(revert_data: &[u8]) -> Option<EvmError> {
    if let Ok(revert) = Revert::abi_decode(revert_data) {
        return Some(EvmError::DecodedRevert {
            reason: revert.reason,
        });
    }

    if let Ok(panic) = Panic::abi_decode(revert_data) {
        return Some(EvmError::DecodedRevert {
            reason: format!("panic code {}", panic.code),
        });
    }

    (revert_data.len() >= 4).then(|| EvmError::UnknownRevert {
        data: Bytes::copy_from_slice(revert_data),
    })
}

/// Names a custom error using the error set `E` of the reverting contract.
///
/// Errors other than [`EvmError::UnknownRevert`], and payloads `E` does
/// not recognize, are returned unchanged.
pub fn decode_custom_error<E: SolInterface + fmt::Debug>(err: EvmError) -> EvmError {
    let EvmError::UnknownRevert { data } = &err else {
        return err;
    };

    match E::abi_decode(data) {
        Ok(decoded) => EvmError::DecodedRevert {
            reason: format!("{decoded:?}"),
        },
        Err(_) => err,
    }
}

pub(crate) fn selector_hex(data: &[u8]) -> String {
    alloy::hex::encode_prefixed(&data[..data.len().min(4)])
}
