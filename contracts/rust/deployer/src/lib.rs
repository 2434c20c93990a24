use std::{collections::HashMap, future::Future, io::Write, time::Duration};

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{utils::parse_ether, Address, I256, U256},
    providers::{
        fillers::{FillProvider, JoinFill, WalletFiller},
        utils::JoinedRecommendedFillers,
        PendingTransactionBuilder, Provider, ProviderBuilder, RootProvider, WalletProvider,
    },
    rpc::{client::RpcClient, types::TransactionReceipt},
    signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner},
    transports::http::reqwest::Url,
};
use anyhow::{anyhow, ensure, Context, Result};
use clap::{builder::OsStr, Parser};
use derive_more::{derive::Deref, Display};
use integrations_contract_adapter::{
    bind::{BindResult, TransactOpts},
    bindings::{AccessControlledAggregator, Staking, VrfConsumer},
    sol_types::PoolConstructorParamsSol,
};

pub mod builder;
pub mod options;

/// Type alias that connects to providers with recommended fillers and wallet
/// use `<HttpProviderWithWallet as WalletProvider>::wallet()` to access internal wallet
/// use `<HttpProviderWithWallet as WalletProvider>::default_signer_address(&provider)` to get wallet address
pub type HttpProviderWithWallet = FillProvider<
    JoinFill<JoinedRecommendedFillers, WalletFiller<EthereumWallet>>,
    RootProvider,
    Ethereum,
>;

/// a handy thin wrapper around wallet builder and provider builder that directly
/// returns an instantiated `Provider` with default fillers with wallet, ready to send tx
pub fn build_provider(
    mnemonic: String,
    account_index: u32,
    url: Url,
    poll_interval: Option<Duration>,
) -> Result<HttpProviderWithWallet> {
    let signer = build_signer(mnemonic, account_index)?;
    let wallet = EthereumWallet::from(signer);

    // alloy guesses the polling interval from whether the RPC looks local, which is wrong for a
    // node inside docker. Allow overriding it.
    if let Some(interval) = poll_interval {
        tracing::info!("Using custom L1 poll interval: {interval:?}");
        let client = RpcClient::new_http(url).with_poll_interval(interval);
        Ok(ProviderBuilder::new().wallet(wallet).on_client(client))
    } else {
        tracing::info!("Using default L1 poll interval");
        Ok(ProviderBuilder::new().wallet(wallet).on_http(url))
    }
}

pub fn build_signer(mnemonic: String, account_index: u32) -> Result<PrivateKeySigner> {
    MnemonicBuilder::<English>::default()
        .phrase(mnemonic)
        .index(account_index)
        .context("wrong mnemonic or index")?
        .build()
        .context("fail to build signer")
}

/// similar to [`build_provider()`] but using a random wallet
pub fn build_random_provider(url: Url) -> Result<HttpProviderWithWallet> {
    let signer = MnemonicBuilder::<English>::default()
        .build_random()
        .context("fail to build signer")?;
    let wallet = EthereumWallet::from(signer);
    Ok(ProviderBuilder::new().wallet(wallet).on_http(url))
}

/// Set of predeployed contracts.
#[derive(Clone, Debug, Default, Parser)]
pub struct DeployedContracts {
    /// LinkToken.sol, paid out by the aggregator and staked in the staking pool.
    #[clap(long, env = Contract::LinkToken)]
    link_token: Option<Address>,

    /// VRFCoordinator.sol serving randomness requests of the VRF consumer.
    #[clap(long, env = Contract::VrfCoordinator)]
    vrf_coordinator: Option<Address>,

    /// Price feed monitored by the staking pool for alerts.
    #[clap(long, env = Contract::MonitoredFeed)]
    monitored_feed: Option<Address>,

    /// Use an already-deployed AccessControlledAggregator.sol instead of deploying a new one.
    #[clap(long, env = Contract::AccessControlledAggregator)]
    access_controlled_aggregator: Option<Address>,

    /// Use an already-deployed VRFConsumer.sol instead of deploying a new one.
    #[clap(long, env = Contract::VrfConsumer)]
    vrf_consumer: Option<Address>,

    /// Use an already-deployed Staking.sol instead of deploying a new one.
    #[clap(long, env = Contract::Staking)]
    staking: Option<Address>,
}

/// An identifier for a particular contract.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Contract {
    #[display("INTEGRATIONS_LINK_TOKEN_ADDRESS")]
    LinkToken,
    #[display("INTEGRATIONS_VRF_COORDINATOR_ADDRESS")]
    VrfCoordinator,
    #[display("INTEGRATIONS_MONITORED_FEED_ADDRESS")]
    MonitoredFeed,
    #[display("INTEGRATIONS_ACCESS_CONTROLLED_AGGREGATOR_ADDRESS")]
    AccessControlledAggregator,
    #[display("INTEGRATIONS_VRF_CONSUMER_ADDRESS")]
    VrfConsumer,
    #[display("INTEGRATIONS_STAKING_ADDRESS")]
    Staking,
}

impl From<Contract> for OsStr {
    fn from(c: Contract) -> OsStr {
        c.to_string().into()
    }
}

/// Cache of contracts predeployed or deployed during this current run.
#[derive(Deref, Debug, Clone, Default)]
pub struct Contracts(HashMap<Contract, Address>);

impl From<DeployedContracts> for Contracts {
    fn from(deployed: DeployedContracts) -> Self {
        let mut m = HashMap::new();
        if let Some(addr) = deployed.link_token {
            m.insert(Contract::LinkToken, addr);
        }
        if let Some(addr) = deployed.vrf_coordinator {
            m.insert(Contract::VrfCoordinator, addr);
        }
        if let Some(addr) = deployed.monitored_feed {
            m.insert(Contract::MonitoredFeed, addr);
        }
        if let Some(addr) = deployed.access_controlled_aggregator {
            m.insert(Contract::AccessControlledAggregator, addr);
        }
        if let Some(addr) = deployed.vrf_consumer {
            m.insert(Contract::VrfConsumer, addr);
        }
        if let Some(addr) = deployed.staking {
            m.insert(Contract::Staking, addr);
        }
        Self(m)
    }
}

impl Contracts {
    pub fn new() -> Self {
        Contracts(HashMap::new())
    }

    pub fn address(&self, contract: Contract) -> Option<Address> {
        self.0.get(&contract).copied()
    }

    /// Record an externally deployed contract, e.g. the LINK token of the target chain.
    pub fn insert(&mut self, contract: Contract, address: Address) -> Option<Address> {
        self.0.insert(contract, address)
    }

    /// Deploy a contract (with logging and cached deployments)
    ///
    /// The `deployment` future, typically a binding's `deploy`, is only awaited if contract
    /// `name` is not already deployed; otherwise this function just returns the predeployed
    /// address.
    pub async fn deploy<T, F>(&mut self, name: Contract, deployment: F) -> Result<Address>
    where
        F: Future<Output = BindResult<(Address, PendingTransactionBuilder<Ethereum>, T)>>,
    {
        if let Some(addr) = self.0.get(&name) {
            tracing::info!("skipping deployment of {name}, already deployed at {addr:#x}");
            return Ok(*addr);
        }
        tracing::info!("deploying {name}");
        let (expected, pending_tx, _) = deployment
            .await
            .with_context(|| format!("failed to send deployment of {name}"))?;
        let tx_hash = *pending_tx.tx_hash();
        tracing::info!(%tx_hash, "waiting for tx to be mined");
        let receipt = pending_tx.get_receipt().await?;
        tracing::info!(%receipt.gas_used, %tx_hash, "tx mined");
        ensure!(receipt.status(), "deployment of {name} reverted in {tx_hash}");
        let addr = receipt
            .contract_address
            .ok_or_else(|| anyhow!("no contract address in receipt of {name} deployment"))?;
        ensure!(
            addr == expected,
            "{name} deployed at {addr:#x}, expected {expected:#x}"
        );

        tracing::info!("deployed {name} at {addr:#x}");

        self.0.insert(name, addr);
        Ok(addr)
    }

    /// Write a .env file.
    pub fn write(&self, mut w: impl Write) -> Result<()> {
        for (contract, address) in &self.0 {
            writeln!(w, "{contract}={address:#x}")?;
        }
        Ok(())
    }
}

/// Constructor arguments of `AccessControlledAggregator.sol` other than the LINK token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatorOptions {
    /// LINK paid to each oracle per submission.
    pub payment_amount: u128,
    /// Seconds after which a round may be superseded.
    pub timeout: u32,
    pub validator: Address,
    pub min_submission_value: I256,
    pub max_submission_value: I256,
    pub decimals: u8,
    pub description: String,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            payment_amount: 1,
            timeout: 30,
            validator: Address::ZERO,
            min_submission_value: I256::ZERO,
            max_submission_value: I256::from_raw(U256::from(1_000_000_000_000u64)),
            decimals: 0,
            description: "Test Flux Aggregator".to_string(),
        }
    }
}

/// Deploy `AccessControlledAggregator.sol` paying oracles in `link`.
pub async fn deploy_access_controlled_aggregator<P>(
    provider: &P,
    contracts: &mut Contracts,
    link: Address,
    options: &AggregatorOptions,
) -> Result<Address>
where
    P: Provider + WalletProvider,
{
    let opts = TransactOpts::sender(provider.default_signer_address());
    let addr = contracts
        .deploy(
            Contract::AccessControlledAggregator,
            AccessControlledAggregator::deploy(
                &opts,
                provider,
                link,
                options.payment_amount,
                options.timeout,
                options.validator,
                options.min_submission_value,
                options.max_submission_value,
                options.decimals,
                options.description.clone(),
            ),
        )
        .await?;

    let aggregator = AccessControlledAggregator::new(addr, provider)?;
    let caller = aggregator.caller();
    ensure!(
        caller.description().await? == options.description,
        "aggregator description mismatch"
    );
    ensure!(
        caller.decimals().await? == options.decimals,
        "aggregator decimals mismatch"
    );
    ensure!(
        caller.timeout().await? == options.timeout,
        "aggregator timeout mismatch"
    );
    ensure!(
        caller.payment_amount().await? == options.payment_amount,
        "aggregator payment amount mismatch"
    );
    Ok(addr)
}

/// Deploy `VRFConsumer.sol` requesting randomness from `coordinator`.
pub async fn deploy_vrf_consumer<P>(
    provider: &P,
    contracts: &mut Contracts,
    link: Address,
    coordinator: Address,
) -> Result<Address>
where
    P: Provider + WalletProvider,
{
    let opts = TransactOpts::sender(provider.default_signer_address());
    let addr = contracts
        .deploy(
            Contract::VrfConsumer,
            VrfConsumer::deploy(&opts, provider, coordinator, link),
        )
        .await?;

    let consumer = VrfConsumer::new(addr, provider)?;
    let round = consumer.caller().current_round_id().await?;
    ensure!(
        round.is_zero(),
        "VRF consumer at {addr:#x} already served {round} rounds"
    );
    Ok(addr)
}

/// Pool parameters for a test deployment of `Staking.sol` staking `link` and monitoring `feed`.
pub fn default_pool_params(link: Address, feed: Address) -> PoolConstructorParamsSol {
    let link_amount = |amount: &str| parse_ether(amount).unwrap_or_default();
    PoolConstructorParamsSol {
        LINKAddress: link,
        monitoredFeed: feed,
        initialMaxPoolSize: link_amount("50000"),
        initialMaxCommunityStakeAmount: link_amount("7000"),
        initialMaxOperatorStakeAmount: link_amount("50000"),
        minCommunityStakeAmount: link_amount("1"),
        minOperatorStakeAmount: link_amount("1000"),
        priorityPeriodThreshold: U256::from(3 * 60 * 60),
        regularPeriodThreshold: U256::from(3 * 60 * 60 + 20 * 60),
        maxAlertingRewardAmount: link_amount("7000"),
        minInitialOperatorCount: U256::from(1),
        minRewardDuration: U256::from(30 * 24 * 60 * 60),
        slashableDuration: U256::from(90 * 24 * 60 * 60),
        delegationRateDenominator: U256::from(25),
    }
}

/// Deploy `Staking.sol` with the given pool parameters.
pub async fn deploy_staking<P>(
    provider: &P,
    contracts: &mut Contracts,
    params: &PoolConstructorParamsSol,
) -> Result<Address>
where
    P: Provider + WalletProvider,
{
    let opts = TransactOpts::sender(provider.default_signer_address());
    let addr = contracts
        .deploy(
            Contract::Staking,
            Staking::deploy(&opts, provider, params.clone()),
        )
        .await?;

    let staking = Staking::new(addr, provider)?;
    let caller = staking.caller();
    let version = caller.type_and_version().await?;
    ensure!(
        version.starts_with("Staking "),
        "unexpected staking contract {version}"
    );
    ensure!(
        caller.get_chainlink_token().await? == params.LINKAddress,
        "staking LINK token mismatch"
    );
    ensure!(
        caller.get_community_staker_limits().await?
            == (
                params.minCommunityStakeAmount,
                params.initialMaxCommunityStakeAmount
            ),
        "community staker limits mismatch"
    );
    ensure!(
        caller.get_operator_limits().await?
            == (
                params.minOperatorStakeAmount,
                params.initialMaxOperatorStakeAmount
            ),
        "operator limits mismatch"
    );
    ensure!(
        caller.get_max_pool_size().await? == params.initialMaxPoolSize,
        "max pool size mismatch"
    );
    Ok(addr)
}

/// Common logic for any Ownable contract to transfer ownership
///
/// Ownership only moves once the new owner calls `acceptOwnership()`.
pub async fn transfer_ownership<P: Provider>(
    provider: &P,
    target: Contract,
    addr: Address,
    new_owner: Address,
) -> Result<TransactionReceipt> {
    let pending = match target {
        Contract::AccessControlledAggregator => {
            tracing::info!(%addr, %new_owner, "Transfer AccessControlledAggregator ownership");
            let aggregator = AccessControlledAggregator::new(addr, provider)?;
            aggregator.transactor().transfer_ownership(new_owner).await?
        },
        Contract::Staking => {
            tracing::info!(%addr, %new_owner, "Transfer Staking ownership");
            let staking = Staking::new(addr, provider)?;
            staking.transactor().transfer_ownership(new_owner).await?
        },
        _ => return Err(anyhow!("{target} is not Ownable, can't transfer ownership!")),
    };
    let receipt = pending.get_receipt().await?;
    let tx_hash = receipt.transaction_hash;
    ensure!(receipt.status(), "ownership transfer reverted in {tx_hash}");
    tracing::info!(%receipt.gas_used, %tx_hash, "ownership transfer requested");
    Ok(receipt)
}

pub async fn is_contract(provider: impl Provider, address: Address) -> Result<bool> {
    if address == Address::ZERO {
        return Ok(false);
    }

    let code = provider.get_code_at(address).await?;
    if code.is_empty() {
        return Ok(false);
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::future;

    use alloy::{primitives::address, providers::ProviderBuilder};
    use integrations_contract_adapter::testing::setup_test;
    use pretty_assertions::assert_eq;

    use super::*;

    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

    #[test]
    fn test_contract_env_names() {
        assert_eq!(
            Contract::AccessControlledAggregator.to_string(),
            "INTEGRATIONS_ACCESS_CONTROLLED_AGGREGATOR_ADDRESS"
        );
        assert_eq!(Contract::Staking.to_string(), "INTEGRATIONS_STAKING_ADDRESS");
        assert_eq!(
            OsStr::from(Contract::LinkToken),
            OsStr::from("INTEGRATIONS_LINK_TOKEN_ADDRESS")
        );
    }

    #[test]
    fn test_deployed_contracts_from_args() -> Result<()> {
        let staking = Address::repeat_byte(1);
        let link = Address::repeat_byte(2);
        let deployed = DeployedContracts::try_parse_from([
            "deploy",
            "--staking",
            staking.to_string().as_str(),
            "--link-token",
            link.to_string().as_str(),
        ])?;
        let contracts = Contracts::from(deployed);
        assert_eq!(contracts.address(Contract::Staking), Some(staking));
        assert_eq!(contracts.address(Contract::LinkToken), Some(link));
        assert_eq!(contracts.address(Contract::VrfConsumer), None);
        assert_eq!(contracts.len(), 2);
        Ok(())
    }

    #[test]
    fn test_write_env_file() -> Result<()> {
        let mut contracts = Contracts::new();
        contracts.insert(Contract::VrfConsumer, Address::repeat_byte(0xab));

        let mut out = vec![];
        contracts.write(&mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            format!(
                "INTEGRATIONS_VRF_CONSUMER_ADDRESS=0x{}\n",
                "ab".repeat(20)
            )
        );
        Ok(())
    }

    #[test]
    fn test_env_file_round_trip() -> Result<()> {
        let mut contracts = Contracts::new();
        contracts.insert(Contract::AccessControlledAggregator, Address::repeat_byte(1));
        contracts.insert(Contract::Staking, Address::repeat_byte(2));

        let file = tempfile::NamedTempFile::new()?;
        contracts.write(file.as_file())?;

        let mut vars = dotenvy::from_path_iter(file.path())?.collect::<Result<Vec<_>, _>>()?;
        vars.sort();
        assert_eq!(
            vars,
            vec![
                (
                    Contract::AccessControlledAggregator.to_string(),
                    format!("{:#x}", Address::repeat_byte(1))
                ),
                (
                    Contract::Staking.to_string(),
                    format!("{:#x}", Address::repeat_byte(2))
                ),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_deploy_skips_cached_contract() -> Result<()> {
        let mut contracts = Contracts::new();
        let addr = Address::repeat_byte(3);
        contracts.insert(Contract::Staking, addr);

        // Never resolves, so this only returns if the deployment is skipped.
        let deployment =
            future::pending::<BindResult<(Address, PendingTransactionBuilder<Ethereum>, ())>>();
        assert_eq!(contracts.deploy(Contract::Staking, deployment).await?, addr);
        Ok(())
    }

    #[test]
    fn test_option_defaults() {
        let opts = AggregatorOptions::default();
        assert_eq!(opts.payment_amount, 1);
        assert_eq!(opts.timeout, 30);
        assert_eq!(opts.min_submission_value, I256::ZERO);
        assert_eq!(
            opts.max_submission_value,
            I256::try_from(1_000_000_000_000i64).unwrap()
        );
        assert_eq!(opts.description, "Test Flux Aggregator");

        let params = default_pool_params(Address::repeat_byte(1), Address::repeat_byte(2));
        assert!(params.minCommunityStakeAmount <= params.initialMaxCommunityStakeAmount);
        assert!(params.minOperatorStakeAmount <= params.initialMaxOperatorStakeAmount);
        assert!(params.initialMaxCommunityStakeAmount <= params.initialMaxPoolSize);
        assert!(params.priorityPeriodThreshold < params.regularPeriodThreshold);
        assert!(params.maxAlertingRewardAmount <= params.initialMaxOperatorStakeAmount);
        assert!(!params.delegationRateDenominator.is_zero());
    }

    #[test]
    fn test_build_signer() -> Result<()> {
        let signer = build_signer(TEST_MNEMONIC.to_string(), 0)?;
        assert_eq!(
            signer.address(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
        assert!(build_signer("not a mnemonic".to_string(), 0).is_err());
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires anvil"]
    async fn test_is_contract() -> Result<()> {
        setup_test();
        let provider = ProviderBuilder::new().on_anvil_with_wallet();

        // test with zero address returns false
        assert!(!is_contract(&provider, Address::ZERO).await?);

        // Test with a non-contract address (e.g., a random address)
        assert!(!is_contract(&provider, Address::random()).await?);

        let mut contracts = Contracts::new();
        let addr =
            deploy_vrf_consumer(&provider, &mut contracts, Address::random(), Address::random())
                .await?;
        assert!(is_contract(&provider, addr).await?);
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires anvil"]
    async fn test_deploy_access_controlled_aggregator() -> Result<()> {
        setup_test();
        let provider = ProviderBuilder::new().on_anvil_with_wallet();
        let mut contracts = Contracts::new();
        let link = Address::random();
        let options = AggregatorOptions {
            description: "ETH / USD".to_string(),
            decimals: 8,
            ..Default::default()
        };

        let addr =
            deploy_access_controlled_aggregator(&provider, &mut contracts, link, &options).await?;
        assert_eq!(contracts.address(Contract::AccessControlledAggregator), Some(addr));

        let aggregator = AccessControlledAggregator::new(addr, &provider)?;
        assert_eq!(aggregator.caller().link_token().await?, link);
        assert!(aggregator.caller().check_enabled().await?);

        // a second deployment is served from the cache
        let again =
            deploy_access_controlled_aggregator(&provider, &mut contracts, link, &options).await?;
        assert_eq!(again, addr);
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires anvil"]
    async fn test_deploy_staking_and_transfer_ownership() -> Result<()> {
        setup_test();
        let provider = ProviderBuilder::new().on_anvil_with_wallet();
        let mut contracts = Contracts::new();
        let params = default_pool_params(Address::random(), Address::random());

        let addr = deploy_staking(&provider, &mut contracts, &params).await?;
        let staking = Staking::new(addr, &provider)?;
        assert!(!staking.caller().is_active().await?);
        assert_eq!(
            staking.caller().owner().await?,
            provider.default_signer_address()
        );

        let new_owner = Address::random();
        transfer_ownership(&provider, Contract::Staking, addr, new_owner).await?;
        // two-step ownership: the current owner stays until the new one accepts
        assert_eq!(
            staking.caller().owner().await?,
            provider.default_signer_address()
        );

        let err = transfer_ownership(&provider, Contract::VrfConsumer, addr, new_owner)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not Ownable"));
        Ok(())
    }
}
