use alloy::primitives::{Address, B256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use clap::{Parser, Subcommand};
use std::io::Write;
use thiserror::Error;
use tracing::info;
use url::Url;

use ccip_evm::{AnvilFork, Fork};

use crate::config::{CcipCtx, Ctx, Env};
use crate::faucet::request_funds_from;
use crate::message::{get_evm2any_ramp_message, get_evm2evm_message};
use crate::router::route_message;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Transaction {tx_hash} not found on the source chain")]
    ReceiptNotFound { tx_hash: B256 },
    #[error("Transaction {tx_hash} did not emit a CCIP message")]
    MessageNotFound { tx_hash: B256 },
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send LINK from the faucet to an account on the fork
    Fund {
        /// Recipient of the LINK
        #[arg(long)]
        to: Address,
        /// Amount in the token's smallest unit (juels)
        #[arg(long)]
        amount: U256,
    },
    /// Print the CCIP message sent in a transaction as JSON
    Decode {
        /// Hash of the transaction that called `ccipSend`
        #[arg(long = "tx-hash")]
        tx_hash: B256,
        /// RPC endpoint of the source chain (defaults to the fork)
        #[arg(long)]
        source_rpc_url: Option<Url>,
    },
    /// Deliver a message sent on the source chain to the fork
    Route {
        /// Hash of the transaction that called `ccipSend`
        #[arg(long = "tx-hash")]
        tx_hash: B256,
        /// RPC endpoint of the source chain
        #[arg(long)]
        source_rpc_url: Url,
    },
}

#[derive(Debug, Parser)]
#[command(name = "ccip-fork")]
#[command(about = "Fund accounts and route CCIP messages on local forks")]
#[command(version)]
pub struct CliEnv {
    #[clap(flatten)]
    env: Env,
    #[command(subcommand)]
    pub command: Commands,
}

impl CliEnv {
    /// Parse CLI arguments and load the config file they point to
    pub fn parse_and_convert() -> anyhow::Result<(Ctx, Commands)> {
        let cli_env = Self::parse();
        let ctx = cli_env.env.into_ctx()?;
        Ok((ctx, cli_env.command))
    }
}

pub async fn run_command(ctx: Ctx, command: Commands) -> anyhow::Result<()> {
    let provider = ProviderBuilder::new().connect_http(ctx.rpc_url.clone());
    let fork = AnvilFork::new(provider);

    run_command_with_writer(&ctx, &fork, command, &mut std::io::stdout()).await
}

async fn run_command_with_writer<F: Fork, W: Write>(
    ctx: &Ctx,
    fork: &F,
    command: Commands,
    stdout: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Fund { to, amount } => fund_command(stdout, fork, &ctx.ccip, to, amount).await,
        Commands::Decode {
            tx_hash,
            source_rpc_url: Some(source_rpc_url),
        } => {
            let source = ProviderBuilder::new().connect_http(source_rpc_url);
            decode_command(stdout, &source, tx_hash).await
        }
        Commands::Decode {
            tx_hash,
            source_rpc_url: None,
        } => decode_command(stdout, fork.provider(), tx_hash).await,
        Commands::Route {
            tx_hash,
            source_rpc_url,
        } => {
            let source = ProviderBuilder::new().connect_http(source_rpc_url);
            route_command(stdout, fork, &source, &ctx.ccip, tx_hash).await
        }
    }
}

async fn fund_command<F: Fork, W: Write>(
    stdout: &mut W,
    fork: &F,
    ccip: &CcipCtx,
    to: Address,
    amount: U256,
) -> anyhow::Result<()> {
    let tx_hash = request_funds_from(fork, ccip.faucet, ccip.link_token, to, amount).await?;

    writeln!(stdout, "Sent {amount} LINK juels to {to}")?;
    writeln!(stdout, "   Transaction: {tx_hash}")?;
    Ok(())
}

async fn fetch_receipt<P: Provider>(
    provider: &P,
    tx_hash: B256,
) -> anyhow::Result<TransactionReceipt> {
    let receipt = provider
        .get_transaction_receipt(tx_hash)
        .await?
        .ok_or(CliError::ReceiptNotFound { tx_hash })?;

    Ok(receipt)
}

async fn decode_command<P: Provider, W: Write>(
    stdout: &mut W,
    source: &P,
    tx_hash: B256,
) -> anyhow::Result<()> {
    let receipt = fetch_receipt(source, tx_hash).await?;

    let json = if let Some(message) = get_evm2evm_message(&receipt) {
        serde_json::to_string_pretty(&message)?
    } else if let Some(message) = get_evm2any_ramp_message(&receipt) {
        serde_json::to_string_pretty(&message)?
    } else {
        return Err(CliError::MessageNotFound { tx_hash }.into());
    };

    writeln!(stdout, "{json}")?;
    Ok(())
}

async fn route_command<F: Fork, P: Provider, W: Write>(
    stdout: &mut W,
    fork: &F,
    source: &P,
    ccip: &CcipCtx,
    tx_hash: B256,
) -> anyhow::Result<()> {
    let receipt = fetch_receipt(source, tx_hash).await?;
    let message = get_evm2evm_message(&receipt).ok_or(CliError::MessageNotFound { tx_hash })?;

    info!(message_id = %message.message_id, %tx_hash, "Routing message to fork");
    let execution_tx = route_message(fork, ccip.router, &message).await?;

    writeln!(stdout, "Routed message {}", message.message_id)?;
    writeln!(stdout, "   Execution transaction: {execution_tx}")?;
    Ok(())
}
