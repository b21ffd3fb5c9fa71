//! In-memory fork for unit tests.
//!
//! `MockFork` answers Router `getOffRamps` view calls from configured
//! registrations, keeps a tiny ERC20 ledger so faucet transfers can be
//! checked, and records every impersonated transaction.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::mock::Asserter;
use alloy::providers::{ProviderBuilder, RootProvider};
use alloy::rpc::types::TransactionReceipt;
use alloy::sol_types::{SolCall, SolValue};
use alloy::transports::TransportErrorKind;
use async_trait::async_trait;

use ccip_evm::error_decoding::decode_revert_data;
use ccip_evm::{Evm, EvmError, Fork};

use crate::bindings::{LinkToken, Router};

/// Transaction captured by [`MockFork::send_as`].
#[derive(Debug, Clone)]
pub(crate) struct SentTransaction {
    pub(crate) from: Address,
    pub(crate) to: Address,
    pub(crate) calldata: Bytes,
    pub(crate) tx_hash: TxHash,
    /// Native balance of `from` when the transaction was sent.
    pub(crate) sender_balance: U256,
}

#[derive(Default)]
struct MockState {
    off_ramps: HashMap<Address, Vec<Router::OffRamp>>,
    reverting: HashSet<Address>,
    revert_data: HashMap<Address, Bytes>,
    native_balances: HashMap<Address, U256>,
    token_balances: HashMap<(Address, Address), U256>,
    sent: Vec<SentTransaction>,
}

pub(crate) struct MockFork {
    asserter: Asserter,
    provider: RootProvider,
    state: Mutex<MockState>,
}

impl MockFork {
    pub(crate) fn new() -> Self {
        let asserter = Asserter::new();

        Self {
            provider: ProviderBuilder::new()
                .disable_recommended_fillers()
                .connect_mocked_client(asserter.clone()),
            asserter,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Queue of RPC responses served by [`Evm::provider`].
    pub(crate) fn asserter(&self) -> &Asserter {
        &self.asserter
    }

    pub(crate) fn with_off_ramps(self, router: Address, off_ramps: Vec<Router::OffRamp>) -> Self {
        self.lock().off_ramps.insert(router, off_ramps);
        self
    }

    pub(crate) fn with_reverting_contract(self, contract: Address) -> Self {
        self.lock().reverting.insert(contract);
        self
    }

    /// Makes transactions to `contract` revert with raw `data`.
    pub(crate) fn with_revert_data(self, contract: Address, data: Bytes) -> Self {
        self.lock().revert_data.insert(contract, data);
        self
    }

    pub(crate) fn mint(&self, token: Address, account: Address, amount: U256) {
        *self
            .lock()
            .token_balances
            .entry((token, account))
            .or_default() += amount;
    }

    pub(crate) fn token_balance(&self, token: Address, account: Address) -> U256 {
        self.lock()
            .token_balances
            .get(&(token, account))
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn sent_transactions(&self) -> Vec<SentTransaction> {
        self.lock().sent.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn revert(reason: &str) -> EvmError {
    EvmError::DecodedRevert {
        reason: reason.to_string(),
    }
}

fn mocked_receipt(tx_hash: TxHash, from: Address, to: Address) -> TransactionReceipt {
    serde_json::from_value(serde_json::json!({
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": "0x1234567890123456789012345678901234567890123456789012345678901234",
        "blockNumber": "0x1",
        "from": from,
        "to": to,
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x77359400",
        "cumulativeGasUsed": "0x5208",
        "status": "0x1",
        "type": "0x2",
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "logs": []
    }))
    .unwrap()
}

#[async_trait]
impl Evm for MockFork {
    type Provider = RootProvider;

    fn provider(&self) -> &RootProvider {
        &self.provider
    }

    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, EvmError> {
        if !calldata.starts_with(&Router::getOffRampsCall::SELECTOR) {
            return Err(revert("unsupported view call"));
        }

        let state = self.lock();
        let off_ramps = state.off_ramps.get(&contract).ok_or_else(|| {
            EvmError::Transport(TransportErrorKind::custom_str("no contract at address"))
        })?;

        Ok(Bytes::from((off_ramps.clone(),).abi_encode_params()))
    }
}

#[async_trait]
impl Fork for MockFork {
    async fn balance(&self, account: Address) -> Result<U256, EvmError> {
        Ok(self
            .lock()
            .native_balances
            .get(&account)
            .copied()
            .unwrap_or_default())
    }

    async fn set_balance(&self, account: Address, balance: U256) -> Result<(), EvmError> {
        self.lock().native_balances.insert(account, balance);
        Ok(())
    }

    async fn send_as(
        &self,
        from: Address,
        contract: Address,
        calldata: Bytes,
        _note: &str,
    ) -> Result<TransactionReceipt, EvmError> {
        let mut state = self.lock();

        if state.reverting.contains(&contract) {
            return Err(revert("mock revert"));
        }

        if let Some(data) = state.revert_data.get(&contract) {
            return Err(decode_revert_data(data).unwrap_or_else(|| revert("mock revert")));
        }

        if let Ok(transfer) = LinkToken::transferCall::abi_decode(&calldata) {
            let sender_balance = state
                .token_balances
                .get(&(contract, from))
                .copied()
                .unwrap_or_default();

            if sender_balance < transfer.amount {
                return Err(revert("ERC20: transfer amount exceeds balance"));
            }

            state
                .token_balances
                .insert((contract, from), sender_balance - transfer.amount);
            *state
                .token_balances
                .entry((contract, transfer.to))
                .or_default() += transfer.amount;
        }

        let tx_hash = TxHash::random();
        let sender_balance = state
            .native_balances
            .get(&from)
            .copied()
            .unwrap_or_default();

        state.sent.push(SentTransaction {
            from,
            to: contract,
            calldata,
            tx_hash,
            sender_balance,
        });

        Ok(mocked_receipt(tx_hash, from, contract))
    }
}
