//! builder pattern for deploying the integration contracts

use alloy::{
    primitives::Address,
    providers::{Provider, WalletProvider},
};
use anyhow::{bail, Context, Result};
use derive_builder::Builder;
use integrations_contract_adapter::sol_types::PoolConstructorParamsSol;

use crate::{AggregatorOptions, Contract, Contracts};

/// Convenient handler that builds all the input arguments ready to be deployed.
/// - `deployer`: deployer's wallet provider
/// - `link_token`: LINK token, falls back to the cached [`Contract::LinkToken`]
/// - `vrf_coordinator`: coordinator for the VRF consumer, falls back to the cached
///   [`Contract::VrfCoordinator`]
/// - `monitored_feed`: feed watched by the staking pool, falls back to the cached
///   [`Contract::MonitoredFeed`] and then to the deployed aggregator
/// - `aggregator_options`: aggregator constructor arguments
/// - `pool_params`: staking pool parameters, [`crate::default_pool_params`] if None
/// - `owner`: new owner of the Ownable contracts, the deployer keeps them if None
#[derive(Builder, Clone)]
#[builder(setter(strip_option))]
pub struct DeployerArgs<P: Provider + WalletProvider> {
    deployer: P,
    #[builder(default)]
    link_token: Option<Address>,
    #[builder(default)]
    vrf_coordinator: Option<Address>,
    #[builder(default)]
    monitored_feed: Option<Address>,
    #[builder(default)]
    aggregator_options: AggregatorOptions,
    #[builder(default)]
    pool_params: Option<PoolConstructorParamsSol>,
    #[builder(default)]
    owner: Option<Address>,
}

impl<P: Provider + WalletProvider> DeployerArgs<P> {
    fn link_token(&self, contracts: &Contracts) -> Result<Address> {
        self.link_token
            .or_else(|| contracts.address(Contract::LinkToken))
            .context("LINK token must be set or predeployed")
    }

    /// deploy target contracts
    pub async fn deploy(&self, contracts: &mut Contracts, target: Contract) -> Result<()> {
        let provider = &self.deployer;
        match target {
            Contract::AccessControlledAggregator => {
                let link = self.link_token(contracts)?;
                let addr = crate::deploy_access_controlled_aggregator(
                    provider,
                    contracts,
                    link,
                    &self.aggregator_options,
                )
                .await?;

                if let Some(owner) = self.owner {
                    crate::transfer_ownership(provider, target, addr, owner).await?;
                }
            },
            Contract::VrfConsumer => {
                let link = self.link_token(contracts)?;
                let coordinator = self
                    .vrf_coordinator
                    .or_else(|| contracts.address(Contract::VrfCoordinator))
                    .context("VRF coordinator must be set or predeployed")?;
                crate::deploy_vrf_consumer(provider, contracts, link, coordinator).await?;
            },
            Contract::Staking => {
                let params = match &self.pool_params {
                    Some(params) => params.clone(),
                    None => {
                        let link = self.link_token(contracts)?;
                        let feed = self
                            .monitored_feed
                            .or_else(|| contracts.address(Contract::MonitoredFeed))
                            .or_else(|| contracts.address(Contract::AccessControlledAggregator))
                            .context(
                                "monitored feed must be set, predeployed or deployed as the \
                                 aggregator",
                            )?;
                        crate::default_pool_params(link, feed)
                    },
                };
                let addr = crate::deploy_staking(provider, contracts, &params).await?;

                if let Some(owner) = self.owner {
                    crate::transfer_ownership(provider, target, addr, owner).await?;
                }
            },
            Contract::LinkToken | Contract::VrfCoordinator | Contract::MonitoredFeed => {
                bail!("{target} is not deployed by this tool, it must be predeployed");
            },
        }
        Ok(())
    }

    /// Deploy all contracts. The VRF consumer is skipped if no coordinator is known.
    pub async fn deploy_all(&self, contracts: &mut Contracts) -> Result<()> {
        self.deploy(contracts, Contract::AccessControlledAggregator)
            .await?;
        self.deploy(contracts, Contract::Staking).await?;
        if self.vrf_coordinator.is_some() || contracts.address(Contract::VrfCoordinator).is_some()
        {
            self.deploy(contracts, Contract::VrfConsumer).await?;
        } else {
            tracing::info!("no VRF coordinator, skipping deployment of VRFConsumer");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy::providers::ProviderBuilder;
    use integrations_contract_adapter::{
        bindings::{AccessControlledAggregator, Staking},
        testing::setup_test,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_builder_requires_deployer() {
        let err = DeployerArgsBuilder::<crate::HttpProviderWithWallet>::default()
            .link_token(Address::repeat_byte(1))
            .build()
            .err()
            .map(|err| err.to_string())
            .unwrap_or_default();
        assert!(err.contains("deployer"), "{err}");
    }

    #[tokio::test]
    #[ignore = "requires anvil"]
    async fn test_deploy_all() -> Result<()> {
        setup_test();
        let provider = ProviderBuilder::new().on_anvil_with_wallet();
        let deployer = provider.default_signer_address();
        let link = Address::random();
        let owner = Address::random();
        let args = DeployerArgsBuilder::default()
            .deployer(provider.clone())
            .link_token(link)
            .vrf_coordinator(Address::random())
            .owner(owner)
            .build()?;

        let mut contracts = Contracts::new();
        args.deploy_all(&mut contracts).await?;
        assert_eq!(contracts.len(), 3);

        let aggregator = contracts
            .address(Contract::AccessControlledAggregator)
            .context("aggregator not deployed")?;
        let staking = Staking::new(
            contracts.address(Contract::Staking).context("staking not deployed")?,
            &provider,
        )?;
        // the aggregator doubles as the monitored feed
        assert_eq!(staking.caller().get_monitored_feed().await?, aggregator);
        assert_eq!(staking.caller().get_chainlink_token().await?, link);
        // ownership is only requested until the new owner accepts
        assert_eq!(staking.caller().owner().await?, deployer);

        let aggregator = AccessControlledAggregator::new(aggregator, &provider)?;
        assert_eq!(aggregator.caller().owner().await?, deployer);

        // everything is cached, nothing is redeployed
        let before = contracts.clone();
        args.deploy_all(&mut contracts).await?;
        assert_eq!(*before, *contracts);
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires anvil"]
    async fn test_external_contracts_not_deployed() -> Result<()> {
        setup_test();
        let provider = ProviderBuilder::new().on_anvil_with_wallet();
        let args = DeployerArgsBuilder::default().deployer(provider).build()?;
        let mut contracts = Contracts::new();

        let err = args
            .deploy(&mut contracts, Contract::LinkToken)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must be predeployed"));

        let err = args
            .deploy(&mut contracts, Contract::AccessControlledAggregator)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("LINK token"));
        assert!(contracts.is_empty());
        Ok(())
    }
}
