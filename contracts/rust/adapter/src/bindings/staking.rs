//! Binding for the LINK `Staking` pool.

use std::sync::Arc;

use alloy::{
    primitives::{Address, Bytes, B256, U256},
    sol_types::SolValue,
};

use crate::{
    bind::{
        contract_binding, event_methods, BindResult, BoundContract, ContractBackend,
        ContractCaller, ContractTransactor, TransactOpts,
    },
    sol_types::Staking::*,
};

pub const STAKING_ABI: &str = include_str!("../../artifacts/Staking.abi.json");
pub const STAKING_BIN: &str = include_str!("../../artifacts/Staking.bin");

contract_binding! {
    /// Staking pool for community stakers and node operators monitoring a price feed.
    ///
    /// Reverts carry the custom errors of [`StakingErrors`], decode them with
    /// [`crate::evm::DecodeRevert`].
    Staking {
        abi: STAKING_ABI,
        caller: StakingCaller,
        transactor: StakingTransactor,
        filterer: StakingFilterer,
    }
}

impl<B: ContractBackend> Staking<B> {
    /// Deploy a new staking pool and bind it.
    pub async fn deploy(
        opts: &TransactOpts,
        backend: B,
        params: PoolConstructorParams,
    ) -> BindResult<(Address, B::Pending, Self)> {
        let args = (params,).abi_encode_params();
        let (address, pending, contract) =
            BoundContract::deploy(opts, STAKING_ABI, STAKING_BIN, &args, backend).await?;
        Ok((address, pending, Self::from_bound(Arc::new(contract))))
    }
}

impl<B: ContractCaller> StakingCaller<B> {
    pub async fn can_alert(&self, alerter: Address) -> BindResult<bool> {
        let ret = self
            .contract
            .call(&self.opts, &canAlertCall { alerter })
            .await?;
        Ok(ret._0)
    }

    pub async fn get_available_reward(&self) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &getAvailableRewardCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn get_base_reward(&self, staker: Address) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &getBaseRewardCall { staker })
            .await?;
        Ok(ret._0)
    }

    pub async fn get_chainlink_token(&self) -> BindResult<Address> {
        let ret = self
            .contract
            .call(&self.opts, &getChainlinkTokenCall {})
            .await?;
        Ok(ret._0)
    }

    /// Minimum and maximum stake of a community staker.
    pub async fn get_community_staker_limits(&self) -> BindResult<(U256, U256)> {
        let ret = self
            .contract
            .call(&self.opts, &getCommunityStakerLimitsCall {})
            .await?;
        Ok((ret._0, ret._1))
    }

    pub async fn get_delegates_count(&self) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &getDelegatesCountCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn get_delegation_rate_denominator(&self) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &getDelegationRateDenominatorCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn get_delegation_reward(&self, staker: Address) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &getDelegationRewardCall { staker })
            .await?;
        Ok(ret._0)
    }

    pub async fn get_earned_base_rewards(&self) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &getEarnedBaseRewardsCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn get_earned_delegation_rewards(&self) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &getEarnedDelegationRewardsCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn get_feed_operators(&self) -> BindResult<Vec<Address>> {
        let ret = self
            .contract
            .call(&self.opts, &getFeedOperatorsCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn get_max_pool_size(&self) -> BindResult<U256> {
        let ret = self.contract.call(&self.opts, &getMaxPoolSizeCall {}).await?;
        Ok(ret._0)
    }

    pub async fn get_merkle_root(&self) -> BindResult<B256> {
        let ret = self.contract.call(&self.opts, &getMerkleRootCall {}).await?;
        Ok(ret._0)
    }

    pub async fn get_migration_target(&self) -> BindResult<Address> {
        let ret = self
            .contract
            .call(&self.opts, &getMigrationTargetCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn get_monitored_feed(&self) -> BindResult<Address> {
        let ret = self
            .contract
            .call(&self.opts, &getMonitoredFeedCall {})
            .await?;
        Ok(ret._0)
    }

    /// Minimum and maximum stake of a node operator.
    pub async fn get_operator_limits(&self) -> BindResult<(U256, U256)> {
        let ret = self
            .contract
            .call(&self.opts, &getOperatorLimitsCall {})
            .await?;
        Ok((ret._0, ret._1))
    }

    pub async fn get_reward_rate(&self) -> BindResult<U256> {
        let ret = self.contract.call(&self.opts, &getRewardRateCall {}).await?;
        Ok(ret._0)
    }

    /// Start and end timestamps of the reward period.
    pub async fn get_reward_timestamps(&self) -> BindResult<(U256, U256)> {
        let ret = self
            .contract
            .call(&self.opts, &getRewardTimestampsCall {})
            .await?;
        Ok((ret._0, ret._1))
    }

    pub async fn get_stake(&self, staker: Address) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &getStakeCall { staker })
            .await?;
        Ok(ret._0)
    }

    pub async fn get_total_delegated_amount(&self) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &getTotalDelegatedAmountCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn get_total_removed_amount(&self) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &getTotalRemovedAmountCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn get_total_staked_amount(&self) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &getTotalStakedAmountCall {})
            .await?;
        Ok(ret._0)
    }

    /// Whether `staker` is on the merkle allowlist during the early access period.
    pub async fn has_access(&self, staker: Address, proof: Vec<B256>) -> BindResult<bool> {
        let ret = self
            .contract
            .call(&self.opts, &hasAccessCall { staker, proof })
            .await?;
        Ok(ret._0)
    }

    pub async fn is_active(&self) -> BindResult<bool> {
        let ret = self.contract.call(&self.opts, &isActiveCall {}).await?;
        Ok(ret._0)
    }

    pub async fn is_operator(&self, staker: Address) -> BindResult<bool> {
        let ret = self
            .contract
            .call(&self.opts, &isOperatorCall { staker })
            .await?;
        Ok(ret._0)
    }

    pub async fn is_paused(&self) -> BindResult<bool> {
        let ret = self.contract.call(&self.opts, &isPausedCall {}).await?;
        Ok(ret._0)
    }

    pub async fn owner(&self) -> BindResult<Address> {
        let ret = self.contract.call(&self.opts, &ownerCall {}).await?;
        Ok(ret._0)
    }

    pub async fn paused(&self) -> BindResult<bool> {
        let ret = self.contract.call(&self.opts, &pausedCall {}).await?;
        Ok(ret._0)
    }

    pub async fn type_and_version(&self) -> BindResult<String> {
        let ret = self
            .contract
            .call(&self.opts, &typeAndVersionCall {})
            .await?;
        Ok(ret._0)
    }
}

impl<B: ContractTransactor> StakingTransactor<B> {
    pub async fn accept_migration_target(&self) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &acceptMigrationTargetCall {})
            .await
    }

    pub async fn accept_ownership(&self) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &acceptOwnershipCall {})
            .await
    }

    pub async fn add_operators(&self, operators: Vec<Address>) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &addOperatorsCall { operators })
            .await
    }

    pub async fn add_reward(&self, amount: U256) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &addRewardCall { amount })
            .await
    }

    pub async fn change_reward_rate(&self, new_rate: U256) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &changeRewardRateCall { newRate: new_rate })
            .await
    }

    pub async fn conclude(&self) -> BindResult<B::Pending> {
        self.contract.transact(&self.opts, &concludeCall {}).await
    }

    pub async fn emergency_pause(&self) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &emergencyPauseCall {})
            .await
    }

    pub async fn emergency_unpause(&self) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &emergencyUnpauseCall {})
            .await
    }

    pub async fn migrate(&self, data: Bytes) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &migrateCall { data })
            .await
    }

    /// ERC677 callback through which LINK is staked. Only the LINK token may call it.
    pub async fn on_token_transfer(
        &self,
        sender: Address,
        amount: U256,
        data: Bytes,
    ) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &onTokenTransferCall {
                    sender,
                    amount,
                    data,
                },
            )
            .await
    }

    pub async fn propose_migration_target(
        &self,
        migration_target: Address,
    ) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &proposeMigrationTargetCall {
                    migrationTarget: migration_target,
                },
            )
            .await
    }

    pub async fn raise_alert(&self) -> BindResult<B::Pending> {
        self.contract.transact(&self.opts, &raiseAlertCall {}).await
    }

    pub async fn remove_operators(&self, operators: Vec<Address>) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &removeOperatorsCall { operators })
            .await
    }

    pub async fn set_feed_operators(&self, operators: Vec<Address>) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &setFeedOperatorsCall { operators })
            .await
    }

    pub async fn set_merkle_root(&self, new_merkle_root: B256) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &setMerkleRootCall {
                    newMerkleRoot: new_merkle_root,
                },
            )
            .await
    }

    pub async fn set_pool_config(
        &self,
        max_pool_size: U256,
        max_community_stake_amount: U256,
        max_operator_stake_amount: U256,
    ) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &setPoolConfigCall {
                    maxPoolSize: max_pool_size,
                    maxCommunityStakeAmount: max_community_stake_amount,
                    maxOperatorStakeAmount: max_operator_stake_amount,
                },
            )
            .await
    }

    /// Open the pool, funding `amount` of rewards at `initial_reward_rate`.
    pub async fn start(&self, amount: U256, initial_reward_rate: U256) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &startCall {
                    amount,
                    initialRewardRate: initial_reward_rate,
                },
            )
            .await
    }

    pub async fn transfer_ownership(&self, to: Address) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &transferOwnershipCall { to })
            .await
    }

    pub async fn unstake(&self) -> BindResult<B::Pending> {
        self.contract.transact(&self.opts, &unstakeCall {}).await
    }

    pub async fn withdraw_removed_stake(&self) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &withdrawRemovedStakeCall {})
            .await
    }

    pub async fn withdraw_unused_reward(&self) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &withdrawUnusedRewardCall {})
            .await
    }
}

event_methods! {
    StakingFilterer;
    AlertRaised => filter_alert_raised, watch_alert_raised, parse_alert_raised();
    MerkleRootChanged => filter_merkle_root_changed, watch_merkle_root_changed,
        parse_merkle_root_changed();
    Migrated => filter_migrated, watch_migrated, parse_migrated();
    MigrationTargetAccepted => filter_migration_target_accepted,
        watch_migration_target_accepted, parse_migration_target_accepted();
    MigrationTargetProposed => filter_migration_target_proposed,
        watch_migration_target_proposed, parse_migration_target_proposed();
    OwnershipTransferRequested => filter_ownership_transfer_requested,
        watch_ownership_transfer_requested, parse_ownership_transfer_requested(
            from: Address,
            to: Address,
        );
    OwnershipTransferred => filter_ownership_transferred, watch_ownership_transferred,
        parse_ownership_transferred(from: Address, to: Address);
    Paused => filter_paused, watch_paused, parse_paused();
    Staked => filter_staked, watch_staked, parse_staked();
    Unpaused => filter_unpaused, watch_unpaused, parse_unpaused();
    Unstaked => filter_unstaked, watch_unstaked, parse_unstaked();
}

#[cfg(test)]
mod tests {
    use alloy::{
        dyn_abi::{DynSolValue, JsonAbiExt},
        hex,
        json_abi::JsonAbi,
        primitives::b256,
        sol_types::{SolCall, SolEvent, SolInterface},
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{
        bind::FilterOpts,
        evm::DecodeRevert,
        sol_types::StakingErrors,
        testing::{event_log, setup_test, MockBackend},
    };

    fn bind(backend: &MockBackend) -> Staking<MockBackend> {
        Staking::new(Address::repeat_byte(0x5a), backend.clone()).unwrap()
    }

    fn params() -> PoolConstructorParams {
        PoolConstructorParams {
            LINKAddress: Address::repeat_byte(1),
            monitoredFeed: Address::repeat_byte(2),
            initialMaxPoolSize: U256::from(1_000),
            initialMaxCommunityStakeAmount: U256::from(10),
            initialMaxOperatorStakeAmount: U256::from(20),
            minCommunityStakeAmount: U256::from(1),
            minOperatorStakeAmount: U256::from(2),
            priorityPeriodThreshold: U256::from(3),
            regularPeriodThreshold: U256::from(4),
            maxAlertingRewardAmount: U256::from(5),
            minInitialOperatorCount: U256::from(6),
            minRewardDuration: U256::from(7),
            slashableDuration: U256::from(8),
            delegationRateDenominator: U256::from(9),
        }
    }

    #[test]
    fn test_abi_surface() {
        let abi: JsonAbi = serde_json::from_str(STAKING_ABI).unwrap();
        assert_eq!(abi.functions().count(), 50);
        assert_eq!(abi.events().count(), 11);
        assert_eq!(abi.errors().count(), 24);
        let constructor = abi.constructor().unwrap();
        assert_eq!(constructor.inputs.len(), 1);
        assert_eq!(constructor.inputs[0].components.len(), 14);
    }

    #[rstest]
    #[case("getCommunityStakerLimits", getCommunityStakerLimitsCall::SELECTOR, "0641bdd8")]
    #[case("getMaxPoolSize", getMaxPoolSizeCall::SELECTOR, "0fbc8f5b")]
    #[case("typeAndVersion", typeAndVersionCall::SELECTOR, "181f5a77")]
    #[case("hasAccess", hasAccessCall::SELECTOR, "9d0a3864")]
    #[case("onTokenTransfer", onTokenTransferCall::SELECTOR, "a4c0ed36")]
    #[case("setPoolConfig", setPoolConfigCall::SELECTOR, "8a44f337")]
    #[case("start", startCall::SELECTOR, "8fb4b573")]
    #[case("unstake", unstakeCall::SELECTOR, "2def6620")]
    fn test_selectors_match_abi(
        #[case] name: &str,
        #[case] selector: [u8; 4],
        #[case] expected: &str,
    ) {
        let abi: JsonAbi = serde_json::from_str(STAKING_ABI).unwrap();
        assert_eq!(hex::encode(selector), expected);
        assert_eq!(abi.function(name).unwrap()[0].selector().0, selector);
    }

    #[test]
    fn test_event_and_error_signatures() {
        assert_eq!(
            Staked::SIGNATURE_HASH,
            b256!("1449c6dd7851abc30abf37f57715f492010519147cc2652fbc38202c18a6ee90")
        );
        assert_eq!(
            Paused::SIGNATURE_HASH,
            b256!("62e78cea01bee320cd4e420270b5ea74000d11b0c9f74754ebdbfc544b05a258")
        );
        let abi: JsonAbi = serde_json::from_str(STAKING_ABI).unwrap();
        for error in abi.errors() {
            let mut data = error.selector().to_vec();
            data.resize(4 + 32 * error.inputs.len(), 0);
            let decoded = StakingErrors::abi_decode(&data, true);
            assert!(decoded.is_ok(), "{} does not decode", error.name);
        }
    }

    #[tokio::test]
    async fn test_typed_calls_decode() -> anyhow::Result<()> {
        setup_test();
        let backend = MockBackend::default();
        let staking = bind(&backend);
        backend.respond_values(
            getCommunityStakerLimitsCall::SELECTOR,
            &[
                DynSolValue::Uint(U256::from(1), 256),
                DynSolValue::Uint(U256::from(7_000), 256),
            ],
        );
        backend.respond_values(
            typeAndVersionCall::SELECTOR,
            &[DynSolValue::String("Staking 0.1.0".into())],
        );
        let root = B256::repeat_byte(0x42);
        backend.respond_values(
            getMerkleRootCall::SELECTOR,
            &[DynSolValue::FixedBytes(root, 32)],
        );

        let caller = staking.caller();
        assert_eq!(
            caller.get_community_staker_limits().await?,
            (U256::from(1), U256::from(7_000))
        );
        assert_eq!(caller.type_and_version().await?, "Staking 0.1.0");
        assert_eq!(caller.get_merkle_root().await?, root);
        Ok(())
    }

    #[tokio::test]
    async fn test_has_access_encodes_proof() -> anyhow::Result<()> {
        let backend = MockBackend::default();
        let staking = bind(&backend);
        backend.respond_values(hasAccessCall::SELECTOR, &[DynSolValue::Bool(true)]);

        let proof = vec![B256::repeat_byte(1), B256::repeat_byte(2)];
        let staker = Address::repeat_byte(3);
        assert!(staking.caller().has_access(staker, proof.clone()).await?);

        let (request, _) = backend.calls().remove(0);
        let call = hasAccessCall::abi_decode(request.input.input().unwrap(), true)?;
        assert_eq!(call.staker, staker);
        assert_eq!(call.proof, proof);
        Ok(())
    }

    #[tokio::test]
    async fn test_revert_decodes_custom_error() {
        let backend = MockBackend::default();
        let staking = bind(&backend);
        let staker = Address::repeat_byte(8);
        backend.revert(
            getStakeCall::SELECTOR,
            StakingErrors::StakeNotFound(StakeNotFound { staker }).abi_encode(),
        );

        let err = staking
            .caller()
            .get_stake(staker)
            .await
            .maybe_decode_revert::<StakingErrors>()
            .unwrap_err();
        assert!(err.to_string().contains("StakeNotFound"), "{err}");
    }

    #[tokio::test]
    async fn test_transactions_encode_args() -> anyhow::Result<()> {
        let backend = MockBackend::default();
        let staking = bind(&backend);
        let transactor = staking.transactor();

        transactor
            .set_pool_config(U256::from(100), U256::from(10), U256::from(50))
            .await?;
        transactor
            .add_operators(vec![Address::repeat_byte(1), Address::repeat_byte(2)])
            .await?;
        transactor.emergency_pause().await?;

        let sent = backend.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent
            .iter()
            .all(|tx| tx.to == Some(staking.address().into())));

        let config = setPoolConfigCall::abi_decode(sent[0].input.input().unwrap(), true)?;
        assert_eq!(config.maxPoolSize, U256::from(100));
        assert_eq!(config.maxOperatorStakeAmount, U256::from(50));
        let operators = addOperatorsCall::abi_decode(sent[1].input.input().unwrap(), true)?;
        assert_eq!(operators.operators.len(), 2);
        assert_eq!(
            &sent[2].input.input().unwrap()[..],
            &emergencyPauseCall::SELECTOR[..]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_filter_and_parse_staked() -> anyhow::Result<()> {
        let backend = MockBackend::default();
        let staking = bind(&backend);
        let staked = Staked {
            staker: Address::repeat_byte(4),
            newStake: U256::from(10),
            totalStake: U256::from(110),
        };
        let log = event_log(staking.address(), &staked, 3);
        backend.push_log(log.clone());
        backend.push_log(event_log(
            staking.address(),
            &Paused {
                account: Address::repeat_byte(4),
            },
            4,
        ));

        let events = staking
            .filterer()
            .filter_staked(&FilterOpts::default())
            .await?
            .collect()
            .await?;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, staked);
        assert_eq!(staking.filterer().parse_staked(log)?.totalStake, U256::from(110));
        Ok(())
    }

    #[tokio::test]
    async fn test_deploy_encodes_pool_params() -> anyhow::Result<()> {
        let backend = MockBackend::default();
        let deployer = Address::repeat_byte(0xde);
        backend.set_nonce(deployer, 2);

        let (address, _tx, staking) =
            Staking::deploy(&TransactOpts::sender(deployer), backend.clone(), params()).await?;
        assert_eq!(address, deployer.create(2));
        assert_eq!(staking.address(), address);

        let code = hex::decode(STAKING_BIN.trim())?;
        let sent = backend.sent();
        let input = sent[0].input.input().unwrap();
        assert_eq!(&input[..code.len()], &code[..]);

        let abi: JsonAbi = serde_json::from_str(STAKING_ABI)?;
        let args = abi
            .constructor()
            .unwrap()
            .abi_decode_input(&input[code.len()..], true)?;
        let DynSolValue::Tuple(fields) = &args[0] else {
            panic!("constructor takes a struct");
        };
        assert_eq!(fields.len(), 14);
        assert_eq!(fields[0], DynSolValue::Address(Address::repeat_byte(1)));
        assert_eq!(fields[13], DynSolValue::Uint(U256::from(9), 256));
        Ok(())
    }
}
