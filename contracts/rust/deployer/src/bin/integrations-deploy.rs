//! Deploy the integration contracts and print their addresses in .env format.

use std::{fs::File, io::stdout};

use anyhow::{Context, Result};
use integrations_contract_deployer::{
    builder::DeployerArgsBuilder, options::DeployerOptions, Contracts,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let opts = DeployerOptions::from_env()?;
    let provider = opts.provider()?;
    let mut contracts = Contracts::from(opts.contracts.clone());

    let mut args = DeployerArgsBuilder::default();
    args.deployer(provider);
    if let Some(owner) = opts.owner {
        args.owner(owner);
    }
    let args = args.build()?;
    args.deploy_all(&mut contracts).await?;

    match &opts.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            contracts.write(file)?;
            tracing::info!("wrote contract addresses to {}", path.display());
        },
        None => contracts.write(stdout())?,
    }
    Ok(())
}
