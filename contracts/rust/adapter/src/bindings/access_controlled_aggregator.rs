//! Binding for `AccessControlledAggregator`, the access controlled flux aggregator price feed.

use std::sync::Arc;

use alloy::{
    primitives::{aliases::U80, Address, Bytes, I256, U256},
    sol_types::SolConstructor,
};

use crate::{
    bind::{
        contract_binding, event_methods, BindResult, BoundContract, ContractBackend,
        ContractCaller, ContractTransactor, TransactOpts,
    },
    sol_types::AccessControlledAggregator::*,
};

pub const ACCESS_CONTROLLED_AGGREGATOR_ABI: &str =
    include_str!("../../artifacts/AccessControlledAggregator.abi.json");
pub const ACCESS_CONTROLLED_AGGREGATOR_BIN: &str =
    include_str!("../../artifacts/AccessControlledAggregator.bin");

contract_binding! {
    /// Flux aggregator with a read access list, collecting oracle submissions into rounds.
    AccessControlledAggregator {
        abi: ACCESS_CONTROLLED_AGGREGATOR_ABI,
        caller: AccessControlledAggregatorCaller,
        transactor: AccessControlledAggregatorTransactor,
        filterer: AccessControlledAggregatorFilterer,
    }
}

impl<B: ContractBackend> AccessControlledAggregator<B> {
    /// Deploy a new aggregator and bind it.
    #[allow(clippy::too_many_arguments)]
    pub async fn deploy(
        opts: &TransactOpts,
        backend: B,
        link: Address,
        payment_amount: u128,
        timeout: u32,
        validator: Address,
        min_submission_value: I256,
        max_submission_value: I256,
        decimals: u8,
        description: String,
    ) -> BindResult<(Address, B::Pending, Self)> {
        let args = constructorCall {
            _link: link,
            _paymentAmount: payment_amount,
            _timeout: timeout,
            _validator: validator,
            _minSubmissionValue: min_submission_value,
            _maxSubmissionValue: max_submission_value,
            _decimals: decimals,
            _description: description,
        }
        .abi_encode();
        let (address, pending, contract) = BoundContract::deploy(
            opts,
            ACCESS_CONTROLLED_AGGREGATOR_ABI,
            ACCESS_CONTROLLED_AGGREGATOR_BIN,
            &args,
            backend,
        )
        .await?;
        Ok((address, pending, Self::from_bound(Arc::new(contract))))
    }
}

impl<B: ContractCaller> AccessControlledAggregatorCaller<B> {
    /// LINK reserved for oracle payments.
    pub async fn allocated_funds(&self) -> BindResult<u128> {
        let ret = self.contract.call(&self.opts, &allocatedFundsCall {}).await?;
        Ok(ret._0)
    }

    /// LINK available for future oracle payments.
    pub async fn available_funds(&self) -> BindResult<u128> {
        let ret = self.contract.call(&self.opts, &availableFundsCall {}).await?;
        Ok(ret._0)
    }

    pub async fn check_enabled(&self) -> BindResult<bool> {
        let ret = self.contract.call(&self.opts, &checkEnabledCall {}).await?;
        Ok(ret._0)
    }

    pub async fn decimals(&self) -> BindResult<u8> {
        let ret = self.contract.call(&self.opts, &decimalsCall {}).await?;
        Ok(ret._0)
    }

    pub async fn description(&self) -> BindResult<String> {
        let ret = self.contract.call(&self.opts, &descriptionCall {}).await?;
        Ok(ret._0)
    }

    pub async fn get_admin(&self, oracle: Address) -> BindResult<Address> {
        let ret = self
            .contract
            .call(&self.opts, &getAdminCall { _oracle: oracle })
            .await?;
        Ok(ret._0)
    }

    pub async fn get_answer(&self, round_id: U256) -> BindResult<I256> {
        let ret = self
            .contract
            .call(&self.opts, &getAnswerCall { _roundId: round_id })
            .await?;
        Ok(ret._0)
    }

    pub async fn get_oracles(&self) -> BindResult<Vec<Address>> {
        let ret = self.contract.call(&self.opts, &getOraclesCall {}).await?;
        Ok(ret._0)
    }

    /// Answer and timing of a past round.
    pub async fn get_round_data(&self, round_id: U80) -> BindResult<getRoundDataReturn> {
        self.contract
            .call(&self.opts, &getRoundDataCall { _roundId: round_id })
            .await
    }

    pub async fn get_timestamp(&self, round_id: U256) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &getTimestampCall { _roundId: round_id })
            .await?;
        Ok(ret._0)
    }

    pub async fn has_access(&self, user: Address, calldata: Bytes) -> BindResult<bool> {
        let ret = self
            .contract
            .call(
                &self.opts,
                &hasAccessCall {
                    _user: user,
                    _calldata: calldata,
                },
            )
            .await?;
        Ok(ret._0)
    }

    pub async fn latest_answer(&self) -> BindResult<I256> {
        let ret = self.contract.call(&self.opts, &latestAnswerCall {}).await?;
        Ok(ret._0)
    }

    pub async fn latest_round(&self) -> BindResult<U256> {
        let ret = self.contract.call(&self.opts, &latestRoundCall {}).await?;
        Ok(ret._0)
    }

    pub async fn latest_round_data(&self) -> BindResult<latestRoundDataReturn> {
        self.contract.call(&self.opts, &latestRoundDataCall {}).await
    }

    pub async fn latest_timestamp(&self) -> BindResult<U256> {
        let ret = self.contract.call(&self.opts, &latestTimestampCall {}).await?;
        Ok(ret._0)
    }

    pub async fn link_token(&self) -> BindResult<Address> {
        let ret = self.contract.call(&self.opts, &linkTokenCall {}).await?;
        Ok(ret._0)
    }

    pub async fn max_submission_count(&self) -> BindResult<u32> {
        let ret = self
            .contract
            .call(&self.opts, &maxSubmissionCountCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn max_submission_value(&self) -> BindResult<I256> {
        let ret = self
            .contract
            .call(&self.opts, &maxSubmissionValueCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn min_submission_count(&self) -> BindResult<u32> {
        let ret = self
            .contract
            .call(&self.opts, &minSubmissionCountCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn min_submission_value(&self) -> BindResult<I256> {
        let ret = self
            .contract
            .call(&self.opts, &minSubmissionValueCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn oracle_count(&self) -> BindResult<u8> {
        let ret = self.contract.call(&self.opts, &oracleCountCall {}).await?;
        Ok(ret._0)
    }

    /// Round state as seen by `oracle`, for a specific round or the next eligible one when
    /// `queried_round_id` is zero.
    pub async fn oracle_round_state(
        &self,
        oracle: Address,
        queried_round_id: u32,
    ) -> BindResult<oracleRoundStateReturn> {
        self.contract
            .call(
                &self.opts,
                &oracleRoundStateCall {
                    _oracle: oracle,
                    _queriedRoundId: queried_round_id,
                },
            )
            .await
    }

    pub async fn owner(&self) -> BindResult<Address> {
        let ret = self.contract.call(&self.opts, &ownerCall {}).await?;
        Ok(ret._0)
    }

    pub async fn payment_amount(&self) -> BindResult<u128> {
        let ret = self.contract.call(&self.opts, &paymentAmountCall {}).await?;
        Ok(ret._0)
    }

    pub async fn restart_delay(&self) -> BindResult<u32> {
        let ret = self.contract.call(&self.opts, &restartDelayCall {}).await?;
        Ok(ret._0)
    }

    pub async fn timeout(&self) -> BindResult<u32> {
        let ret = self.contract.call(&self.opts, &timeoutCall {}).await?;
        Ok(ret._0)
    }

    pub async fn validator(&self) -> BindResult<Address> {
        let ret = self.contract.call(&self.opts, &validatorCall {}).await?;
        Ok(ret._0)
    }

    pub async fn version(&self) -> BindResult<U256> {
        let ret = self.contract.call(&self.opts, &versionCall {}).await?;
        Ok(ret._0)
    }

    pub async fn withdrawable_payment(&self, oracle: Address) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &withdrawablePaymentCall { _oracle: oracle })
            .await?;
        Ok(ret._0)
    }
}

impl<B: ContractTransactor> AccessControlledAggregatorTransactor<B> {
    pub async fn accept_admin(&self, oracle: Address) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &acceptAdminCall { _oracle: oracle })
            .await
    }

    pub async fn accept_ownership(&self) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &acceptOwnershipCall {})
            .await
    }

    pub async fn add_access(&self, user: Address) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &addAccessCall { _user: user })
            .await
    }

    /// Remove and add oracles and update the submission bounds in one go.
    pub async fn change_oracles(
        &self,
        removed: Vec<Address>,
        added: Vec<Address>,
        added_admins: Vec<Address>,
        min_submissions: u32,
        max_submissions: u32,
        restart_delay: u32,
    ) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &changeOraclesCall {
                    _removed: removed,
                    _added: added,
                    _addedAdmins: added_admins,
                    _minSubmissions: min_submissions,
                    _maxSubmissions: max_submissions,
                    _restartDelay: restart_delay,
                },
            )
            .await
    }

    pub async fn disable_access_check(&self) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &disableAccessCheckCall {})
            .await
    }

    pub async fn enable_access_check(&self) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &enableAccessCheckCall {})
            .await
    }

    /// ERC677 callback. Only the LINK token may call it; it refreshes the available funds.
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
                    _0: sender,
                    _1: amount,
                    _data: data,
                },
            )
            .await
    }

    pub async fn remove_access(&self, user: Address) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &removeAccessCall { _user: user })
            .await
    }

    pub async fn request_new_round(&self) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &requestNewRoundCall {})
            .await
    }

    pub async fn set_requester_permissions(
        &self,
        requester: Address,
        authorized: bool,
        delay: u32,
    ) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &setRequesterPermissionsCall {
                    _requester: requester,
                    _authorized: authorized,
                    _delay: delay,
                },
            )
            .await
    }

    pub async fn set_validator(&self, new_validator: Address) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &setValidatorCall {
                    _newValidator: new_validator,
                },
            )
            .await
    }

    /// Submit an oracle answer for `round_id`.
    pub async fn submit(&self, round_id: U256, submission: I256) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &submitCall {
                    _roundId: round_id,
                    _submission: submission,
                },
            )
            .await
    }

    pub async fn transfer_admin(
        &self,
        oracle: Address,
        new_admin: Address,
    ) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &transferAdminCall {
                    _oracle: oracle,
                    _newAdmin: new_admin,
                },
            )
            .await
    }

    pub async fn transfer_ownership(&self, to: Address) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &transferOwnershipCall { _to: to })
            .await
    }

    pub async fn update_available_funds(&self) -> BindResult<B::Pending> {
        self.contract
            .transact(&self.opts, &updateAvailableFundsCall {})
            .await
    }

    pub async fn update_future_rounds(
        &self,
        payment_amount: u128,
        min_submissions: u32,
        max_submissions: u32,
        restart_delay: u32,
        timeout: u32,
    ) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &updateFutureRoundsCall {
                    _paymentAmount: payment_amount,
                    _minSubmissions: min_submissions,
                    _maxSubmissions: max_submissions,
                    _restartDelay: restart_delay,
                    _timeout: timeout,
                },
            )
            .await
    }

    pub async fn withdraw_funds(
        &self,
        recipient: Address,
        amount: U256,
    ) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &withdrawFundsCall {
                    _recipient: recipient,
                    _amount: amount,
                },
            )
            .await
    }

    pub async fn withdraw_payment(
        &self,
        oracle: Address,
        recipient: Address,
        amount: U256,
    ) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &withdrawPaymentCall {
                    _oracle: oracle,
                    _recipient: recipient,
                    _amount: amount,
                },
            )
            .await
    }
}

event_methods! {
    AccessControlledAggregatorFilterer;
    AddedAccess => filter_added_access, watch_added_access, parse_added_access();
    /// `AnswerUpdated(int256 indexed current, uint256 indexed roundId, uint256 updatedAt)`
    AnswerUpdated => filter_answer_updated, watch_answer_updated, parse_answer_updated(
        current: I256,
        round_id: U256,
    );
    AvailableFundsUpdated => filter_available_funds_updated, watch_available_funds_updated,
        parse_available_funds_updated(amount: U256);
    CheckAccessDisabled => filter_check_access_disabled, watch_check_access_disabled,
        parse_check_access_disabled();
    CheckAccessEnabled => filter_check_access_enabled, watch_check_access_enabled,
        parse_check_access_enabled();
    /// `NewRound(uint256 indexed roundId, address indexed startedBy, uint256 startedAt)`
    NewRound => filter_new_round, watch_new_round, parse_new_round(
        round_id: U256,
        started_by: Address,
    );
    OracleAdminUpdateRequested => filter_oracle_admin_update_requested,
        watch_oracle_admin_update_requested, parse_oracle_admin_update_requested(oracle: Address);
    OracleAdminUpdated => filter_oracle_admin_updated, watch_oracle_admin_updated,
        parse_oracle_admin_updated(oracle: Address, new_admin: Address);
    OraclePermissionsUpdated => filter_oracle_permissions_updated,
        watch_oracle_permissions_updated, parse_oracle_permissions_updated(
            oracle: Address,
            whitelisted: bool,
        );
    OwnershipTransferRequested => filter_ownership_transfer_requested,
        watch_ownership_transfer_requested, parse_ownership_transfer_requested(
            from: Address,
            to: Address,
        );
    OwnershipTransferred => filter_ownership_transferred, watch_ownership_transferred,
        parse_ownership_transferred(from: Address, to: Address);
    RemovedAccess => filter_removed_access, watch_removed_access, parse_removed_access();
    RequesterPermissionsSet => filter_requester_permissions_set, watch_requester_permissions_set,
        parse_requester_permissions_set(requester: Address);
    RoundDetailsUpdated => filter_round_details_updated, watch_round_details_updated,
        parse_round_details_updated(
            payment_amount: u128,
            min_submission_count: u32,
            max_submission_count: u32,
        );
    /// `SubmissionReceived(int256 indexed submission, uint32 indexed round, address indexed oracle)`
    SubmissionReceived => filter_submission_received, watch_submission_received,
        parse_submission_received(submission: I256, round: u32, oracle: Address);
    ValidatorUpdated => filter_validator_updated, watch_validator_updated,
        parse_validator_updated(previous: Address, current: Address);
}
