//! Typed Rust bindings for the integration contracts.
//!
//! [`bind`] holds the contract-agnostic machinery, [`bindings`] one module per contract and
//! [`sol_types`] the ABI types generated from the contract artifacts.

pub mod bind;
pub mod bindings;
pub mod evm;
pub mod sol_types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
