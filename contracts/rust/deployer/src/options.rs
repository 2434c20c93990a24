//! Command line and environment configuration of a deployment run.

use std::{ffi::OsString, path::PathBuf, time::Duration};

use alloy::{primitives::Address, transports::http::reqwest::Url};
use anyhow::{Context, Result};
use clap::Parser;

use crate::{build_provider, DeployedContracts, HttpProviderWithWallet};

/// Deploy the integration contracts.
///
/// Every option can also be given through its environment variable, or a `.env` file in the
/// working directory. Contracts whose address is configured are not redeployed.
#[derive(Clone, Debug, Parser)]
pub struct DeployerOptions {
    /// JSON-RPC endpoint of the chain to deploy to.
    #[clap(long, env = "INTEGRATIONS_RPC_URL", default_value = "http://localhost:8545")]
    pub rpc_url: Url,

    /// Mnemonic of the deployer wallet.
    #[clap(
        long,
        env = "INTEGRATIONS_MNEMONIC",
        default_value = "test test test test test test test test test test test junk"
    )]
    pub mnemonic: String,

    /// Index of the deployer account in the wallet generated from the mnemonic.
    #[clap(long, env = "INTEGRATIONS_ACCOUNT_INDEX", default_value = "0")]
    pub account_index: u32,

    /// Interval for polling the chain for receipts and logs, in milliseconds.
    #[clap(long, env = "INTEGRATIONS_POLL_INTERVAL", value_parser = parse_millis)]
    pub poll_interval: Option<Duration>,

    /// Transfer ownership of the Ownable contracts to this address after deployment.
    #[clap(long, env = "INTEGRATIONS_OWNER")]
    pub owner: Option<Address>,

    /// Write the addresses of all contracts to this file in .env format instead of stdout.
    #[clap(long, short)]
    pub out: Option<PathBuf>,

    #[clap(flatten)]
    pub contracts: DeployedContracts,
}

fn parse_millis(s: &str) -> Result<Duration> {
    let millis = s
        .parse()
        .with_context(|| format!("invalid poll interval {s:?}, expected milliseconds"))?;
    Ok(Duration::from_millis(millis))
}

impl DeployerOptions {
    /// Parse options from the process arguments and environment, loading `.env` first.
    pub fn from_env() -> Result<Self> {
        Self::from_env_and_args(std::env::args_os())
    }

    pub fn from_env_and_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        // A missing .env is fine, everything may come from flags or the environment.
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!("no .env loaded: {err}");
        }
        Ok(Self::try_parse_from(args)?)
    }

    pub fn provider(&self) -> Result<HttpProviderWithWallet> {
        build_provider(
            self.mnemonic.clone(),
            self.account_index,
            self.rpc_url.clone(),
            self.poll_interval,
        )
    }
}
