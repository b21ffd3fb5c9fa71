//! EVM chain access for local fork simulations.
//!
//! This crate provides two traits for interacting with a forked EVM chain:
//!
//! - [`Evm`]: read-only chain access with error-decoded view calls.
//!   Provides the underlying provider and a `call` method that
//!   decodes Solidity revert reasons.
//!
//! - [`Fork`]: extends `Evm` with the cheats a local fork offers:
//!   overriding native balances and sending transactions as an
//!   arbitrary (impersonated) account. [`AnvilFork`](anvil::AnvilFork)
//!   implements it on top of Anvil's RPC extensions.
//!
//! Error decoding is built into both `Evm::call` (view calls) and
//! `Fork::send_as` (write transactions), so consumers get
//! human-readable revert reasons without manual wiring.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionReceipt;
use alloy::sol_types::SolCall;
use async_trait::async_trait;

pub mod anvil;
pub mod error_decoding;

pub use anvil::AnvilFork;

/// Errors that can occur during EVM operations.
#[derive(Debug, thiserror::Error)]
pub enum EvmError {
    #[error("transaction error: {0}")]
    Transaction(#[from] alloy::providers::PendingTransactionError),
    #[error("transport error: {0}")]
    Transport(#[from] alloy::transports::RpcError<alloy::transports::TransportErrorKind>),
    #[error("contract error: {0}")]
    Contract(#[from] alloy::contract::Error),
    #[error("execution reverted: {reason}")]
    DecodedRevert { reason: String },
    #[error("execution reverted with unknown error {}", error_decoding::selector_hex(.data))]
    UnknownRevert { data: alloy::primitives::Bytes },
    #[error("transaction reverted: {tx_hash}")]
    Reverted { tx_hash: alloy::primitives::TxHash },
    #[error("failed to decode return data: {0}")]
    AbiDecode(#[from] alloy::sol_types::Error),
}

/// Read-only EVM chain access with error-decoded view calls.
///
/// Implementations only need to supply the provider; `call` has a
/// default implementation that handles error decoding.
#[async_trait]
pub trait Evm: Send + Sync + 'static {
    /// The provider type used for chain access.
    type Provider: Provider + Clone + Send + Sync;

    /// Returns the underlying provider for direct chain queries.
    fn provider(&self) -> &Self::Provider;

    /// Execute a view call with revert decoding.
    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, EvmError> {
        let tx = alloy::rpc::types::TransactionRequest::default()
            .to(contract)
            .input(calldata.into());

        self.provider()
            .call(tx)
            .await
            .map_err(error_decoding::decode_rpc_error)
    }

    /// Typed variant of [`call`](Evm::call): encodes `call`, runs it
    /// against `contract` and decodes the return value.
    async fn call_sol<C>(&self, contract: Address, call: C) -> Result<C::Return, EvmError>
    where
        C: SolCall + Send,
    {
        let output = self.call(contract, Bytes::from(call.abi_encode())).await?;
        Ok(C::abi_decode_returns(&output)?)
    }
}

/// Cheat-enabled access to a locally forked chain.
///
/// Extends [`Evm`] with balance overrides and transactions submitted on
/// behalf of accounts whose keys we do not hold. The `send_as` method
/// waits for a receipt and treats a failed status as an error.
#[async_trait]
pub trait Fork: Evm {
    /// Native balance of `account` in wei.
    async fn balance(&self, account: Address) -> Result<U256, EvmError> {
        Ok(self.provider().get_balance(account).await?)
    }

    /// Overwrites the native balance of `account`.
    async fn set_balance(&self, account: Address, balance: U256) -> Result<(), EvmError>;

    /// Submit a contract call as `from` without its private key.
    ///
    /// - `from`: account to impersonate for this transaction
    /// - `contract`: target contract address
    /// - `calldata`: ABI-encoded function call
    /// - `note`: human-readable operation description used in logs
    async fn send_as(
        &self,
        from: Address,
        contract: Address,
        calldata: Bytes,
        note: &str,
    ) -> Result<TransactionReceipt, EvmError>;
}

#[async_trait]
impl<T: Evm> Evm for Arc<T> {
    type Provider = T::Provider;

    fn provider(&self) -> &Self::Provider {
        (**self).provider()
    }

    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, EvmError> {
        (**self).call(contract, calldata).await
    }
}

#[async_trait]
impl<T: Fork> Fork for Arc<T> {
    async fn balance(&self, account: Address) -> Result<U256, EvmError> {
        (**self).balance(account).await
    }

    async fn set_balance(&self, account: Address, balance: U256) -> Result<(), EvmError> {
        (**self).set_balance(account, balance).await
    }

    async fn send_as(
        &self,
        from: Address,
        contract: Address,
        calldata: Bytes,
        note: &str,
    ) -> Result<TransactionReceipt, EvmError> {
        (**self).send_as(from, contract, calldata, note).await
    }
}
