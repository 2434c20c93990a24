//! In-memory backend and helpers for exercising bindings without a node.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use alloy::{
    dyn_abi::DynSolValue,
    eips::BlockId,
    primitives::{keccak256, Address, Bytes, TxHash},
    rpc::types::{Filter, Log, TransactionRequest},
    sol_types::SolEvent,
    transports::{TransportError, TransportErrorKind, TransportResult},
};
use async_trait::async_trait;
use futures::{channel::mpsc, StreamExt};
use tracing_subscriber::EnvFilter;

use crate::bind::{ContractCaller, ContractFilterer, ContractTransactor, LogStream};

/// Install a test log subscriber honouring `RUST_LOG`. Safe to call from every test.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build the log `event` would produce when emitted by `address` in block `block`.
pub fn event_log<E: SolEvent>(address: Address, event: &E, block: u64) -> Log {
    Log {
        inner: alloy::primitives::Log {
            address,
            data: event.encode_log_data(),
        },
        block_number: Some(block),
        ..Default::default()
    }
}

enum Response {
    Output(Bytes),
    Fail(String),
    Revert(Bytes),
}

#[derive(Default)]
struct MockState {
    responses: HashMap<[u8; 4], Response>,
    code: HashMap<Address, Bytes>,
    nonces: HashMap<Address, u64>,
    calls: Vec<(TransactionRequest, BlockId)>,
    sent: Vec<TransactionRequest>,
    logs: Vec<Log>,
    filters: Vec<Filter>,
    watchers: Vec<(Filter, mpsc::UnboundedSender<TransportResult<Log>>)>,
}

/// Scripted chain backend.
///
/// Calls are answered by 4-byte selector, unknown selectors return empty output (like a call to
/// an account without code). Transactions are recorded and answered with their hash. Logs added
/// with [`MockBackend::push_log`] are served by filter queries, logs passed to
/// [`MockBackend::emit`] go to matching live subscriptions.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend").finish_non_exhaustive()
    }
}

fn matches(filter: &Filter, log: &Log) -> bool {
    if !filter.address.matches(&log.address()) {
        return false;
    }
    let topics = log.topics();
    for (i, set) in filter.topics.iter().enumerate() {
        if set.is_empty() {
            continue;
        }
        match topics.get(i) {
            Some(topic) if set.matches(topic) => {},
            _ => return false,
        }
    }
    let block = log.block_number.unwrap_or_default();
    if filter.get_from_block().is_some_and(|from| block < from) {
        return false;
    }
    if filter.get_to_block().is_some_and(|to| block > to) {
        return false;
    }
    true
}

impl MockBackend {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Answer calls to `selector` with raw return data.
    pub fn respond(&self, selector: [u8; 4], output: impl Into<Bytes>) {
        self.state()
            .responses
            .insert(selector, Response::Output(output.into()));
    }

    /// Answer calls to `selector` with the ABI encoding of `values`.
    pub fn respond_values(&self, selector: [u8; 4], values: &[DynSolValue]) {
        let output = DynSolValue::Tuple(values.to_vec()).abi_encode_params();
        self.respond(selector, output);
    }

    /// Fail calls to `selector` with a transport error.
    pub fn fail(&self, selector: [u8; 4], message: &str) {
        self.state()
            .responses
            .insert(selector, Response::Fail(message.to_string()));
    }

    /// Revert calls to `selector` with `data`, as a node reports a failed `eth_call`.
    pub fn revert(&self, selector: [u8; 4], data: impl Into<Bytes>) {
        self.state()
            .responses
            .insert(selector, Response::Revert(data.into()));
    }

    pub fn set_code(&self, address: Address, code: Bytes) {
        self.state().code.insert(address, code);
    }

    pub fn set_nonce(&self, address: Address, nonce: u64) {
        self.state().nonces.insert(address, nonce);
    }

    /// Make `log` visible to filter queries.
    pub fn push_log(&self, log: Log) {
        self.state().logs.push(log);
    }

    /// Deliver `log` to every live subscription whose filter matches it.
    pub fn emit(&self, log: Log) {
        let mut state = self.state();
        state.watchers.retain(|(filter, sink)| {
            if !matches(filter, &log) {
                return !sink.is_closed();
            }
            sink.unbounded_send(Ok(log.clone())).is_ok()
        });
    }

    /// Fail every live subscription and end it.
    pub fn fail_watchers(&self, message: &str) {
        for (_, sink) in self.state().watchers.drain(..) {
            let _ = sink.unbounded_send(Err(TransportErrorKind::custom_str(message)));
        }
    }

    /// Recorded `eth_call` requests with the block they targeted.
    pub fn calls(&self) -> Vec<(TransactionRequest, BlockId)> {
        self.state().calls.clone()
    }

    /// Recorded transactions.
    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.state().sent.clone()
    }

    /// Recorded log filters, both queries and subscriptions.
    pub fn filters(&self) -> Vec<Filter> {
        self.state().filters.clone()
    }
}

#[async_trait]
impl ContractCaller for MockBackend {
    async fn call_contract(
        &self,
        request: TransactionRequest,
        block: BlockId,
    ) -> TransportResult<Bytes> {
        let mut state = self.state();
        let selector = request
            .input
            .input()
            .and_then(|input| input.get(..4))
            .and_then(|selector| <[u8; 4]>::try_from(selector).ok());
        state.calls.push((request, block));
        match selector.and_then(|selector| state.responses.get(&selector)) {
            Some(Response::Output(output)) => Ok(output.clone()),
            Some(Response::Fail(message)) => Err(TransportErrorKind::custom_str(message)),
            Some(Response::Revert(data)) => Err(revert_error(data)),
            None => Ok(Bytes::new()),
        }
    }

    async fn code_at(&self, address: Address, _block: BlockId) -> TransportResult<Bytes> {
        Ok(self.state().code.get(&address).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ContractTransactor for MockBackend {
    type Pending = TxHash;

    async fn pending_nonce_at(&self, address: Address) -> TransportResult<u64> {
        Ok(self.state().nonces.get(&address).copied().unwrap_or_default())
    }

    async fn send_transaction(&self, request: TransactionRequest) -> TransportResult<TxHash> {
        let mut state = self.state();
        state.sent.push(request);
        Ok(keccak256(state.sent.len().to_be_bytes()))
    }
}

#[async_trait]
impl ContractFilterer for MockBackend {
    async fn filter_logs(&self, filter: Filter) -> TransportResult<Vec<Log>> {
        let mut state = self.state();
        let logs = state
            .logs
            .iter()
            .filter(|log| matches(&filter, log))
            .cloned()
            .collect();
        state.filters.push(filter);
        Ok(logs)
    }

    async fn subscribe_filter_logs(&self, filter: Filter) -> TransportResult<LogStream> {
        let (sink, stream) = mpsc::unbounded();
        let mut state = self.state();
        state.filters.push(filter.clone());
        state.watchers.push((filter, sink));
        Ok(stream.boxed())
    }
}

/// A transport error as a node reports a reverted `eth_call` or `eth_estimateGas`.
pub fn revert_error(data: &[u8]) -> TransportError {
    let payload = alloy::rpc::json_rpc::ErrorPayload {
        code: 3,
        message: "execution reverted".into(),
        data: serde_json::value::to_raw_value(&alloy::hex::encode_prefixed(data)).ok(),
    };
    TransportError::ErrorResp(payload)
}
