//! Binding for `BlockHashStoreInterface`, the lookup side of a block hash store.

use alloy::primitives::{B256, U256};

use crate::{
    bind::{contract_binding, BindResult, ContractCaller},
    sol_types::BlockHashStoreInterface::*,
};

pub const BLOCK_HASH_STORE_INTERFACE_ABI: &str =
    include_str!("../../artifacts/BlockHashStoreInterface.abi.json");

contract_binding! {
    BlockHashStoreInterface {
        abi: BLOCK_HASH_STORE_INTERFACE_ABI,
        caller: BlockHashStoreInterfaceCaller,
        transactor: BlockHashStoreInterfaceTransactor,
        filterer: BlockHashStoreInterfaceFilterer,
    }
}

impl<B: ContractCaller> BlockHashStoreInterfaceCaller<B> {
    /// Stored hash of block `number`. Reverts if the store has no hash for it.
    pub async fn get_blockhash(&self, number: U256) -> BindResult<B256> {
        let ret = self
            .contract
            .call(&self.opts, &getBlockhashCall { number })
            .await?;
        Ok(ret._0)
    }
}
