//! Binding for `VRFConsumer`, a test consumer of the VRF coordinator.

use std::sync::Arc;

use alloy::{
    primitives::{Address, B256, U256},
    sol_types::SolValue,
};

use crate::{
    bind::{
        contract_binding, BindResult, BoundContract, ContractBackend, ContractCaller,
        ContractTransactor, TransactOpts,
    },
    sol_types::VRFConsumer::*,
};

pub const VRF_CONSUMER_ABI: &str = include_str!("../../artifacts/VRFConsumer.abi.json");
pub const VRF_CONSUMER_BIN: &str = include_str!("../../artifacts/VRFConsumer.bin");

contract_binding! {
    /// Records the randomness delivered by the VRF coordinator for each request.
    VrfConsumer {
        abi: VRF_CONSUMER_ABI,
        caller: VrfConsumerCaller,
        transactor: VrfConsumerTransactor,
        filterer: VrfConsumerFilterer,
    }
}

impl<B: ContractBackend> VrfConsumer<B> {
    /// Deploy a consumer of `vrf_coordinator` paying in `link`, and bind it.
    pub async fn deploy(
        opts: &TransactOpts,
        backend: B,
        vrf_coordinator: Address,
        link: Address,
    ) -> BindResult<(Address, B::Pending, Self)> {
        let args = (vrf_coordinator, link).abi_encode_params();
        let (address, pending, contract) =
            BoundContract::deploy(opts, VRF_CONSUMER_ABI, VRF_CONSUMER_BIN, &args, backend)
                .await?;
        Ok((address, pending, Self::from_bound(Arc::new(contract))))
    }
}

impl<B: ContractCaller> VrfConsumerCaller<B> {
    /// Number of fulfilled requests.
    pub async fn current_round_id(&self) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &currentRoundIDCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn prev_randomness_output(&self) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &prevRandomnessOutputCall {})
            .await?;
        Ok(ret._0)
    }

    pub async fn randomness_output(&self) -> BindResult<U256> {
        let ret = self
            .contract
            .call(&self.opts, &randomnessOutputCall {})
            .await?;
        Ok(ret._0)
    }

    /// Id of the last randomness request.
    pub async fn request_id(&self) -> BindResult<B256> {
        let ret = self.contract.call(&self.opts, &requestIdCall {}).await?;
        Ok(ret._0)
    }

    /// Simulate [`VrfConsumerTransactor::test_request_randomness`] and return the request id it
    /// would produce.
    pub async fn test_request_randomness(&self, key_hash: B256, fee: U256) -> BindResult<B256> {
        let ret = self
            .contract
            .call(
                &self.opts,
                &testRequestRandomnessCall {
                    _keyHash: key_hash,
                    _fee: fee,
                },
            )
            .await?;
        Ok(ret.requestId)
    }
}

impl<B: ContractTransactor> VrfConsumerTransactor<B> {
    /// Fulfillment entry point. Reverts unless sent by the coordinator.
    pub async fn raw_fulfill_randomness(
        &self,
        request_id: B256,
        randomness: U256,
    ) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &rawFulfillRandomnessCall {
                    requestId: request_id,
                    randomness,
                },
            )
            .await
    }

    /// Request randomness for `key_hash`, paying `fee` LINK from the consumer's balance.
    pub async fn test_request_randomness(
        &self,
        key_hash: B256,
        fee: U256,
    ) -> BindResult<B::Pending> {
        self.contract
            .transact(
                &self.opts,
                &testRequestRandomnessCall {
                    _keyHash: key_hash,
                    _fee: fee,
                },
            )
            .await
    }
}
