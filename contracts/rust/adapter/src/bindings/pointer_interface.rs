//! Binding for `PointerInterface`, a contract that points at another contract's address.

use alloy::primitives::Address;

use crate::{
    bind::{contract_binding, BindResult, ContractCaller},
    sol_types::PointerInterface::*,
};

pub const POINTER_INTERFACE_ABI: &str = include_str!("../../artifacts/PointerInterface.abi.json");

contract_binding! {
    PointerInterface {
        abi: POINTER_INTERFACE_ABI,
        caller: PointerInterfaceCaller,
        transactor: PointerInterfaceTransactor,
        filterer: PointerInterfaceFilterer,
    }
}

impl<B: ContractCaller> PointerInterfaceCaller<B> {
    pub async fn get_address(&self) -> BindResult<Address> {
        let ret = self.contract.call(&self.opts, &getAddressCall {}).await?;
        Ok(ret._0)
    }
}

#[cfg(test)]
mod tests {
    use alloy::{
        dyn_abi::DynSolValue, eips::BlockId, hex, json_abi::JsonAbi, sol_types::SolCall,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{bind::CallOpts, testing::MockBackend};

    #[test]
    fn test_abi_surface() {
        let abi: JsonAbi = serde_json::from_str(POINTER_INTERFACE_ABI).unwrap();
        let names: Vec<_> = abi.functions().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["getAddress"]);
        assert_eq!(abi.events().count(), 0);
        assert_eq!(abi.functions().next().unwrap().selector().0, getAddressCall::SELECTOR);
    }

    #[tokio::test]
    async fn test_get_address() -> anyhow::Result<()> {
        assert_eq!(hex::encode(getAddressCall::SELECTOR), "38cc4831");

        let backend = MockBackend::default();
        let pointer = PointerInterface::new(Address::repeat_byte(0x90), backend.clone())?;
        let target = Address::repeat_byte(0x17);
        backend.respond_values(getAddressCall::SELECTOR, &[DynSolValue::Address(target)]);

        assert_eq!(pointer.caller().get_address().await?, target);
        let at_block = pointer.caller().with_opts(CallOpts::at(12u64));
        assert_eq!(at_block.get_address().await?, target);

        let calls = backend.calls();
        assert_eq!(calls[0].1, BlockId::latest());
        assert_eq!(calls[1].1, BlockId::number(12));
        assert_eq!(calls[1].0.to, Some(pointer.address().into()));
        Ok(())
    }
}
