use alloy::primitives::Address;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::Level;
use url::Url;

use crate::faucet::LINK_FAUCET;

#[derive(Parser, Debug)]
pub struct Env {
    /// Path to plaintext TOML configuration file
    #[clap(long, env = "CCIP_FORK_CONFIG")]
    pub config: PathBuf,
}

/// Settings deserialized from the TOML config file.
#[derive(Deserialize)]
struct Config {
    rpc_url: Url,
    log_level: Option<LogLevel>,
    ccip: CcipConfig,
}

/// CCIP deployment on the forked (destination) network.
#[derive(Debug, Clone, Deserialize)]
struct CcipConfig {
    router: Address,
    link_token: Address,
    faucet: Option<Address>,
}

/// Runtime context assembled from the config file.
#[derive(Debug, Clone)]
pub struct Ctx {
    /// RPC endpoint of the local fork (usually Anvil).
    pub rpc_url: Url,
    pub log_level: LogLevel,
    pub ccip: CcipCtx,
}

#[derive(Debug, Clone)]
pub struct CcipCtx {
    pub router: Address,
    pub link_token: Address,
    pub faucet: Address,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        (&log_level).into()
    }
}

impl From<&LogLevel> for Level {
    fn from(log_level: &LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML")]
    Toml(#[from] toml::de::Error),
    #[error("ccip.{field} must not be the zero address")]
    ZeroAddress { field: &'static str },
}

impl Ctx {
    pub fn load_file(config: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(config)?;
        Self::from_toml(&config_str)
    }

    pub fn from_toml(config_toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(config_toml)?;

        if config.ccip.router.is_zero() {
            return Err(ConfigError::ZeroAddress { field: "router" });
        }

        if config.ccip.link_token.is_zero() {
            return Err(ConfigError::ZeroAddress {
                field: "link_token",
            });
        }

        Ok(Self {
            rpc_url: config.rpc_url,
            log_level: config.log_level.unwrap_or(LogLevel::Debug),
            ccip: CcipCtx {
                router: config.ccip.router,
                link_token: config.ccip.link_token,
                faucet: config.ccip.faucet.unwrap_or(LINK_FAUCET),
            },
        })
    }
}

impl Env {
    pub fn into_ctx(self) -> Result<Ctx, ConfigError> {
        Ctx::load_file(&self.config)
    }
}

pub fn setup_tracing(log_level: &LogLevel) {
    let level: Level = log_level.into();
    let default_filter = format!("ccip_local_fork={level},ccip_evm={level}");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}
