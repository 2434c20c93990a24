//! Solidity types for contract interaction
//!
//! Generated by `sol!` from the JSON ABIs under `artifacts/`. Each contract gets a module holding
//! one `<function>Call`/`<function>Return` pair per function, one struct per event and error, and
//! the `<Contract>Calls`/`<Contract>Events`/`<Contract>Errors` enums.

use alloy::sol;

sol!(
    #[derive(Debug, PartialEq, Eq)]
    #[sol(all_derives)]
    AccessControlledAggregator,
    concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/artifacts/AccessControlledAggregator.abi.json"
    )
);

sol!(
    #[derive(Debug, PartialEq, Eq)]
    #[sol(all_derives)]
    BlockHashStoreInterface,
    concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/artifacts/BlockHashStoreInterface.abi.json"
    )
);

sol!(
    #[derive(Debug, PartialEq, Eq)]
    #[sol(all_derives)]
    PointerInterface,
    concat!(env!("CARGO_MANIFEST_DIR"), "/artifacts/PointerInterface.abi.json")
);

sol!(
    #[derive(Debug, PartialEq, Eq)]
    #[sol(all_derives)]
    Staking,
    concat!(env!("CARGO_MANIFEST_DIR"), "/artifacts/Staking.abi.json")
);

sol!(
    #[derive(Debug, PartialEq, Eq)]
    #[sol(all_derives)]
    VRFConsumer,
    concat!(env!("CARGO_MANIFEST_DIR"), "/artifacts/VRFConsumer.abi.json")
);

pub use AccessControlledAggregator::{
    getRoundDataReturn as RoundDataSol, oracleRoundStateReturn as OracleRoundStateSol,
};
pub use Staking::{PoolConstructorParams as PoolConstructorParamsSol, StakingErrors};
