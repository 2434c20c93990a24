pub mod access_controlled_aggregator;
pub mod block_hash_store_interface;
pub mod pointer_interface;
pub mod staking;
pub mod vrf_consumer;

pub use access_controlled_aggregator::{
    AccessControlledAggregator, AccessControlledAggregatorCaller,
    AccessControlledAggregatorFilterer, AccessControlledAggregatorTransactor,
};
pub use block_hash_store_interface::{
    BlockHashStoreInterface, BlockHashStoreInterfaceCaller, BlockHashStoreInterfaceFilterer,
    BlockHashStoreInterfaceTransactor,
};
pub use pointer_interface::{
    PointerInterface, PointerInterfaceCaller, PointerInterfaceFilterer, PointerInterfaceTransactor,
};
pub use staking::{Staking, StakingCaller, StakingFilterer, StakingTransactor};
pub use vrf_consumer::{VrfConsumer, VrfConsumerCaller, VrfConsumerFilterer, VrfConsumerTransactor};
