//! Generic contract binding machinery.
//!
//! [`BoundContract`] does the untyped work: ABI encoding, backend requests, log decoding. The
//! typed bindings in [`crate::bindings`] are thin wrappers that split a contract into a caller
//! (read-only methods), a transactor (state-changing methods) and a filterer (events), each
//! bounded by the backend capability it needs.

mod backend;
mod base;
mod error;
mod event;
mod opts;
mod subscription;

pub use backend::{
    ContractBackend, ContractCaller, ContractFilterer, ContractTransactor, LogStream,
};
pub use base::{topic_filter, topic_set, BoundContract, TopicFilter};
pub use error::{BindError, BindResult};
pub use event::{DecodedLog, EventIterator};
pub use opts::{CallOpts, FilterOpts, TransactOpts, WatchOpts};
pub use subscription::Subscription;

/// Define the composite binding and its caller, transactor and filterer for one contract.
///
/// All four share a single [`BoundContract`]; role wrappers carry their preset options so a
/// "session" is just a copy with different options.
macro_rules! contract_binding {
    (
        $(#[$meta:meta])*
        $name:ident {
            abi: $abi:expr,
            caller: $caller:ident,
            transactor: $transactor:ident,
            filterer: $filterer:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(derivative::Derivative)]
        #[derivative(Clone(bound = ""), Debug(bound = ""))]
        pub struct $name<B> {
            caller: $caller<B>,
            transactor: $transactor<B>,
            filterer: $filterer<B>,
        }

        #[doc = concat!("Read-only methods of `", stringify!($name), "`.")]
        #[derive(derivative::Derivative)]
        #[derivative(Clone(bound = ""), Debug(bound = ""))]
        pub struct $caller<B> {
            contract: std::sync::Arc<$crate::bind::BoundContract<B>>,
            opts: $crate::bind::CallOpts,
        }

        #[doc = concat!("State-changing methods of `", stringify!($name), "`.")]
        #[derive(derivative::Derivative)]
        #[derivative(Clone(bound = ""), Debug(bound = ""))]
        pub struct $transactor<B> {
            contract: std::sync::Arc<$crate::bind::BoundContract<B>>,
            opts: $crate::bind::TransactOpts,
        }

        #[doc = concat!("Event queries, subscriptions and log parsing for `", stringify!($name), "`.")]
        #[derive(derivative::Derivative)]
        #[derivative(Clone(bound = ""), Debug(bound = ""))]
        pub struct $filterer<B> {
            contract: std::sync::Arc<$crate::bind::BoundContract<B>>,
        }

        impl<B: $crate::bind::ContractBackend> $name<B> {
            /// Bind the deployed contract at `address`.
            pub fn new(
                address: alloy::primitives::Address,
                backend: B,
            ) -> $crate::bind::BindResult<Self> {
                let contract = $crate::bind::BoundContract::new(address, $abi, backend)?;
                Ok(Self::from_bound(std::sync::Arc::new(contract)))
            }
        }

        impl<B> $name<B> {
            pub fn from_bound(contract: std::sync::Arc<$crate::bind::BoundContract<B>>) -> Self {
                Self {
                    caller: $caller {
                        contract: contract.clone(),
                        opts: Default::default(),
                    },
                    transactor: $transactor {
                        contract: contract.clone(),
                        opts: Default::default(),
                    },
                    filterer: $filterer { contract },
                }
            }

            pub fn address(&self) -> alloy::primitives::Address {
                self.caller.contract.address()
            }

            pub fn caller(&self) -> &$caller<B> {
                &self.caller
            }

            pub fn transactor(&self) -> &$transactor<B> {
                &self.transactor
            }

            pub fn filterer(&self) -> &$filterer<B> {
                &self.filterer
            }

            /// A copy whose calls and transactions use the given options.
            pub fn session(
                &self,
                call_opts: $crate::bind::CallOpts,
                transact_opts: $crate::bind::TransactOpts,
            ) -> Self {
                Self {
                    caller: self.caller.with_opts(call_opts),
                    transactor: self.transactor.with_opts(transact_opts),
                    filterer: self.filterer.clone(),
                }
            }

            /// Untyped access to the contract.
            pub fn raw(&self) -> &$crate::bind::BoundContract<B> {
                &self.caller.contract
            }
        }

        impl<B: $crate::bind::ContractCaller> $caller<B> {
            pub fn new(
                address: alloy::primitives::Address,
                caller: B,
            ) -> $crate::bind::BindResult<Self> {
                Ok(Self {
                    contract: std::sync::Arc::new($crate::bind::BoundContract::new(
                        address, $abi, caller,
                    )?),
                    opts: Default::default(),
                })
            }
        }

        impl<B> $caller<B> {
            pub fn address(&self) -> alloy::primitives::Address {
                self.contract.address()
            }

            pub fn opts(&self) -> &$crate::bind::CallOpts {
                &self.opts
            }

            pub fn with_opts(&self, opts: $crate::bind::CallOpts) -> Self {
                Self {
                    contract: self.contract.clone(),
                    opts,
                }
            }

            pub fn raw(&self) -> &$crate::bind::BoundContract<B> {
                &self.contract
            }
        }

        impl<B: $crate::bind::ContractTransactor> $transactor<B> {
            pub fn new(
                address: alloy::primitives::Address,
                transactor: B,
            ) -> $crate::bind::BindResult<Self> {
                Ok(Self {
                    contract: std::sync::Arc::new($crate::bind::BoundContract::new(
                        address, $abi, transactor,
                    )?),
                    opts: Default::default(),
                })
            }

            /// Plain value transfer to the contract.
            pub async fn transfer(&self) -> $crate::bind::BindResult<B::Pending> {
                self.contract.transfer(&self.opts).await
            }
        }

        impl<B> $transactor<B> {
            pub fn address(&self) -> alloy::primitives::Address {
                self.contract.address()
            }

            pub fn opts(&self) -> &$crate::bind::TransactOpts {
                &self.opts
            }

            pub fn with_opts(&self, opts: $crate::bind::TransactOpts) -> Self {
                Self {
                    contract: self.contract.clone(),
                    opts,
                }
            }

            pub fn raw(&self) -> &$crate::bind::BoundContract<B> {
                &self.contract
            }
        }

        impl<B: $crate::bind::ContractFilterer> $filterer<B> {
            pub fn new(
                address: alloy::primitives::Address,
                filterer: B,
            ) -> $crate::bind::BindResult<Self> {
                Ok(Self {
                    contract: std::sync::Arc::new($crate::bind::BoundContract::new(
                        address, $abi, filterer,
                    )?),
                })
            }
        }

        impl<B> $filterer<B> {
            pub fn address(&self) -> alloy::primitives::Address {
                self.contract.address()
            }

            pub fn raw(&self) -> &$crate::bind::BoundContract<B> {
                &self.contract
            }
        }
    };
}

/// Define `filter_*`, `watch_*` and `parse_*` for each event of a contract on its filterer.
///
/// Indexed arguments are listed in declaration order and become slice filters; an empty slice
/// matches any value.
macro_rules! event_methods {
    (
        $filterer:ident;
        $(
            $(#[$doc:meta])*
            $event:ty => $filter:ident, $watch:ident, $parse:ident ($($arg:ident: $ty:ty),* $(,)?);
        )*
    ) => {
        impl<B: $crate::bind::ContractFilterer> $filterer<B> {
            $(
                $(#[$doc])*
                pub async fn $filter(
                    &self,
                    opts: &$crate::bind::FilterOpts,
                    $($arg: &[$ty],)*
                ) -> $crate::bind::BindResult<$crate::bind::EventIterator<$event>> {
                    let topics = $crate::bind::topic_filter(vec![$($crate::bind::topic_set($arg)),*]);
                    self.contract.filter::<$event>(opts, topics).await
                }

                $(#[$doc])*
                pub async fn $watch(
                    &self,
                    opts: &$crate::bind::WatchOpts,
                    sink: tokio::sync::mpsc::Sender<$crate::bind::DecodedLog<$event>>,
                    $($arg: &[$ty],)*
                ) -> $crate::bind::BindResult<$crate::bind::Subscription> {
                    let topics = $crate::bind::topic_filter(vec![$($crate::bind::topic_set($arg)),*]);
                    self.contract.watch::<$event>(opts, topics, sink).await
                }
            )*
        }

        impl<B> $filterer<B> {
            $(
                $(#[$doc])*
                pub fn $parse(
                    &self,
                    log: alloy::rpc::types::Log,
                ) -> $crate::bind::BindResult<$crate::bind::DecodedLog<$event>> {
                    self.contract.parse::<$event>(log)
                }
            )*
        }
    };
}

pub(crate) use contract_binding;
pub(crate) use event_methods;
