//! Anvil-backed fork access.
//!
//! `AnvilFork` wraps an alloy provider connected to an Anvil node and
//! uses Anvil's RPC extensions (`anvil_setBalance`,
//! `anvil_impersonateAccount`) to act as accounts whose keys we don't
//! hold. Only meaningful against a local development node.

use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::Provider;
use alloy::providers::ext::AnvilApi as _;
use alloy::rpc::types::TransactionReceipt;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error_decoding::decode_rpc_error;
use crate::{Evm, EvmError, Fork};

/// Fork access over an Anvil provider.
///
/// The provider does not need a wallet filler: every write goes through
/// [`Fork::send_as`], which impersonates the sender for the duration of
/// the transaction.
#[derive(Debug, Clone)]
pub struct AnvilFork<P> {
    provider: P,
}

impl<P> AnvilFork<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> Evm for AnvilFork<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    type Provider = P;

    fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P> Fork for AnvilFork<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    async fn set_balance(&self, account: Address, balance: U256) -> Result<(), EvmError> {
        debug!(%account, %balance, "Setting native balance");
        self.provider.anvil_set_balance(account, balance).await?;
        Ok(())
    }

    async fn send_as(
        &self,
        from: Address,
        contract: Address,
        calldata: Bytes,
        note: &str,
    ) -> Result<TransactionReceipt, EvmError> {
        info!(%from, %contract, note, "Submitting impersonated contract call");

        self.provider.anvil_impersonate_account(from).await?;
        let outcome = self.submit(from, contract, calldata, note).await;

        if let Err(err) = self.provider.anvil_stop_impersonating_account(from).await {
            warn!(%from, %err, "Failed to stop impersonating account");
        }

        let receipt = outcome?;

        if !receipt.status() {
            return Err(EvmError::Reverted {
                tx_hash: receipt.transaction_hash,
            });
        }

        info!(tx_hash = %receipt.transaction_hash, note, "Transaction confirmed");

        Ok(receipt)
    }
}

impl<P> AnvilFork<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    async fn submit(
        &self,
        from: Address,
        contract: Address,
        calldata: Bytes,
        note: &str,
    ) -> Result<TransactionReceipt, EvmError> {
        let tx = alloy::rpc::types::TransactionRequest::default()
            .from(from)
            .to(contract)
            .input(calldata.into());

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(decode_rpc_error)?;

        info!(tx_hash = %pending.tx_hash(), note, "Transaction submitted");

        Ok(pending.get_receipt().await?)
    }
}
