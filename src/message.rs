//! Cross-chain messages decoded from on-ramp transaction receipts.
//!
//! The on-ramp emits the full message in its send event. On a fork
//! nobody relays it, so we pull it out of the receipt ourselves and hand
//! it to the destination off-ramp (see [`crate::router`]).

use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::rpc::types::{Log, TransactionReceipt};
use alloy::sol_types::SolEvent;
use serde::Serialize;
use tracing::{debug, trace};

use crate::bindings::{Client, EVM2EVMOnRamp, Internal, OnRamp};

/// Token and amount carried by an EVM2EVM message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    pub token: Address,
    pub amount: U256,
}

/// Message emitted by the EVM2EVM on-ramp in `CCIPSendRequested`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evm2EvmMessage {
    pub source_chain_selector: u64,
    pub sender: Address,
    pub receiver: Address,
    pub sequence_number: u64,
    pub gas_limit: U256,
    pub strict: bool,
    pub nonce: u64,
    pub fee_token: Address,
    pub fee_token_amount: U256,
    pub data: Bytes,
    pub token_amounts: Vec<TokenAmount>,
    pub source_token_data: Vec<Bytes>,
    pub message_id: B256,
}

impl From<Internal::EVM2EVMMessage> for Evm2EvmMessage {
    fn from(message: Internal::EVM2EVMMessage) -> Self {
        Self {
            source_chain_selector: message.sourceChainSelector,
            sender: message.sender,
            receiver: message.receiver,
            sequence_number: message.sequenceNumber,
            gas_limit: message.gasLimit,
            strict: message.strict,
            nonce: message.nonce,
            fee_token: message.feeToken,
            fee_token_amount: message.feeTokenAmount,
            data: message.data,
            token_amounts: message
                .tokenAmounts
                .into_iter()
                .map(|token_amount| TokenAmount {
                    token: token_amount.token,
                    amount: token_amount.amount,
                })
                .collect(),
            source_token_data: message.sourceTokenData,
            message_id: message.messageId,
        }
    }
}

impl From<&Evm2EvmMessage> for Internal::EVM2EVMMessage {
    fn from(message: &Evm2EvmMessage) -> Self {
        Self {
            sourceChainSelector: message.source_chain_selector,
            sender: message.sender,
            receiver: message.receiver,
            sequenceNumber: message.sequence_number,
            gasLimit: message.gas_limit,
            strict: message.strict,
            nonce: message.nonce,
            feeToken: message.fee_token,
            feeTokenAmount: message.fee_token_amount,
            data: message.data.clone(),
            tokenAmounts: message
                .token_amounts
                .iter()
                .map(|token_amount| Client::EVMTokenAmount {
                    token: token_amount.token,
                    amount: token_amount.amount,
                })
                .collect(),
            sourceTokenData: message.source_token_data.clone(),
            messageId: message.message_id,
        }
    }
}

/// Header shared by v1.6 ramp messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RampMessageHeader {
    pub message_id: B256,
    pub source_chain_selector: u64,
    pub dest_chain_selector: u64,
    pub sequence_number: u64,
    pub nonce: u64,
}

/// Token transfer inside a v1.6 ramp message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub source_pool_address: Address,
    pub dest_token_address: Bytes,
    pub extra_data: Bytes,
    pub amount: U256,
    pub dest_exec_data: Bytes,
}

/// Message emitted by the v1.6 `OnRamp` in `CCIPMessageSent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evm2AnyRampMessage {
    pub header: RampMessageHeader,
    pub sender: Address,
    pub data: Bytes,
    pub receiver: Bytes,
    pub extra_args: Bytes,
    pub fee_token: Address,
    pub fee_token_amount: U256,
    pub fee_value_juels: U256,
    pub token_amounts: Vec<TokenTransfer>,
}

impl From<Internal::EVM2AnyRampMessage> for Evm2AnyRampMessage {
    fn from(message: Internal::EVM2AnyRampMessage) -> Self {
        let header = message.header;

        Self {
            header: RampMessageHeader {
                message_id: header.messageId,
                source_chain_selector: header.sourceChainSelector,
                dest_chain_selector: header.destChainSelector,
                sequence_number: header.sequenceNumber,
                nonce: header.nonce,
            },
            sender: message.sender,
            data: message.data,
            receiver: message.receiver,
            extra_args: message.extraArgs,
            fee_token: message.feeToken,
            fee_token_amount: message.feeTokenAmount,
            fee_value_juels: message.feeValueJuels,
            token_amounts: message
                .tokenAmounts
                .into_iter()
                .map(|transfer| TokenTransfer {
                    source_pool_address: transfer.sourcePoolAddress,
                    dest_token_address: transfer.destTokenAddress,
                    extra_data: transfer.extraData,
                    amount: transfer.amount,
                    dest_exec_data: transfer.destExecData,
                })
                .collect(),
        }
    }
}

/// `CCIPMessageSent` payload together with its indexed topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentRampMessage {
    pub dest_chain_selector: u64,
    pub sequence_number: u64,
    pub message: Evm2AnyRampMessage,
}

/// Extracts the message sent by an EVM2EVM on-ramp.
///
/// Returns the first `CCIPSendRequested` log in the receipt, or `None`
/// if the transaction did not go through an EVM2EVM on-ramp.
pub fn get_evm2evm_message(receipt: &TransactionReceipt) -> Option<Evm2EvmMessage> {
    find_evm2evm_message(receipt.inner.logs())
}

/// Extracts the message sent by a v1.6 `OnRamp`.
pub fn get_evm2any_ramp_message(receipt: &TransactionReceipt) -> Option<SentRampMessage> {
    find_evm2any_ramp_message(receipt.inner.logs())
}

pub(crate) fn find_evm2evm_message<'a>(
    logs: impl IntoIterator<Item = &'a Log>,
) -> Option<Evm2EvmMessage> {
    let message = logs.into_iter().find_map(|log| {
        EVM2EVMOnRamp::CCIPSendRequested::decode_log(log.as_ref())
            .inspect_err(|err| trace!(address = %log.address(), %err, "Skipping log"))
            .ok()
    })?;

    let message = Evm2EvmMessage::from(message.data.message);
    debug!(
        message_id = %message.message_id,
        source_chain_selector = message.source_chain_selector,
        sequence_number = message.sequence_number,
        "Decoded CCIPSendRequested"
    );

    Some(message)
}

pub(crate) fn find_evm2any_ramp_message<'a>(
    logs: impl IntoIterator<Item = &'a Log>,
) -> Option<SentRampMessage> {
    let event = logs.into_iter().find_map(|log| {
        OnRamp::CCIPMessageSent::decode_log(log.as_ref())
            .inspect_err(|err| trace!(address = %log.address(), %err, "Skipping log"))
            .ok()
    })?;

    let sent = SentRampMessage {
        dest_chain_selector: event.data.destChainSelector,
        sequence_number: event.data.sequenceNumber,
        message: event.data.message.into(),
    };

    debug!(
        message_id = %sent.message.header.message_id,
        dest_chain_selector = sent.dest_chain_selector,
        sequence_number = sent.sequence_number,
        "Decoded CCIPMessageSent"
    );

    Some(sent)
}
