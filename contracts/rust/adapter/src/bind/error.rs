use alloy::{
    primitives::{Address, Bytes, B256},
    transports::TransportError,
};

/// Errors surfaced by bound contracts.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("malformed contract ABI: {0}")]
    Abi(#[from] serde_json::Error),
    #[error("method {0:?} not found in contract ABI")]
    UnknownMethod(String),
    #[error("event {0:?} not found in contract ABI")]
    UnknownEvent(String),
    #[error("log is not a {event} event (topic0 {topic0:?})")]
    EventSignatureMismatch {
        event: &'static str,
        topic0: Option<B256>,
    },
    #[error("ABI encoding or decoding failed: {0}")]
    SolTypes(#[from] alloy::sol_types::Error),
    #[error("dynamic ABI encoding or decoding failed: {0}")]
    DynAbi(#[from] alloy::dyn_abi::Error),
    #[error("malformed contract bytecode: {0}")]
    Bytecode(#[from] alloy::hex::FromHexError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("no contract code at {0:#x}")]
    NoCode(Address),
    #[error("deployment requires a sender address")]
    MissingSender,
    #[error("log subscription ended: {0}")]
    Subscription(String),
}

impl BindError {
    /// Revert data carried by a JSON-RPC execution error, if any.
    pub fn as_revert_data(&self) -> Option<Bytes> {
        match self {
            BindError::Transport(err) => err.as_error_resp()?.as_revert_data(),
            _ => None,
        }
    }
}

pub type BindResult<T> = Result<T, BindError>;
