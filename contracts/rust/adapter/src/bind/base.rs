use std::sync::Arc;

use alloy::{
    dyn_abi::{DynSolValue, EventExt, FunctionExt, JsonAbiExt},
    hex,
    json_abi::{Function, JsonAbi},
    network::TransactionBuilder,
    primitives::{Address, Bytes, B256},
    rpc::types::{Filter, Log, TransactionRequest},
    sol_types::{EventTopic, SolCall, SolEvent, SolType, SolValue},
};
use futures::StreamExt;
use tokio::sync::mpsc;

use super::{
    backend::{ContractCaller, ContractFilterer, ContractTransactor},
    event::{decode_log, DecodedLog, EventIterator},
    opts::{CallOpts, FilterOpts, TransactOpts, WatchOpts},
    subscription::Subscription,
    BindError, BindResult,
};

/// Topic filters for up to three indexed event arguments, in declaration order. An empty set
/// matches any value at that position.
pub type TopicFilter = [Vec<B256>; 3];

/// Encode indexed argument values into a topic set.
pub fn topic_set<T>(values: &[T]) -> Vec<B256>
where
    T: SolValue,
    T::SolType: EventTopic + SolType<RustType = T>,
{
    values
        .iter()
        .map(|value| <T::SolType as EventTopic>::encode_topic(value).0)
        .collect()
}

/// Place topic sets for the indexed arguments of an event, in order, leaving the rest as
/// wildcards.
pub fn topic_filter(sets: Vec<Vec<B256>>) -> TopicFilter {
    let mut topics = TopicFilter::default();
    for (slot, set) in topics.iter_mut().zip(sets) {
        *slot = set;
    }
    topics
}

/// A contract at a fixed address, described by its JSON ABI and reached through backend `B`.
///
/// This is the untyped core shared by every generated binding: it owns ABI encoding and decoding
/// and turns calls, transactions and log queries into backend requests.
pub struct BoundContract<B> {
    address: Address,
    abi: Arc<JsonAbi>,
    backend: B,
}

impl<B> std::fmt::Debug for BoundContract<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundContract")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl<B> BoundContract<B> {
    /// Bind the contract at `address`, parsing its JSON ABI.
    pub fn new(address: Address, abi_json: &str, backend: B) -> BindResult<Self> {
        let abi = Arc::new(serde_json::from_str::<JsonAbi>(abi_json)?);
        Ok(Self::with_abi(address, abi, backend))
    }

    /// Bind with an already parsed ABI.
    pub fn with_abi(address: Address, abi: Arc<JsonAbi>, backend: B) -> Self {
        Self {
            address,
            abi,
            backend,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn function(&self, method: &str) -> BindResult<&Function> {
        self.abi
            .function(method)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| BindError::UnknownMethod(method.to_string()))
    }

    /// Build the `eth_getLogs` filter for event `E`.
    pub(crate) fn event_filter<E: SolEvent>(&self, topics: TopicFilter) -> Filter {
        let [topic1, topic2, topic3] = topics;
        Filter::new()
            .address(self.address)
            .event_signature(E::SIGNATURE_HASH)
            .topic1(topic1)
            .topic2(topic2)
            .topic3(topic3)
    }

    /// Decode a log emitted by this contract as event `E`.
    pub fn parse<E: SolEvent>(&self, log: Log) -> BindResult<DecodedLog<E>> {
        decode_log(log)
    }

    /// Decode a log as the named ABI event, returning the indexed values followed by the
    /// non-indexed ones.
    pub fn parse_raw(&self, event: &str, log: &Log) -> BindResult<Vec<DynSolValue>> {
        let event = self
            .abi
            .event(event)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| BindError::UnknownEvent(event.to_string()))?;
        let decoded = event.decode_log(log.data(), true)?;
        Ok(decoded.indexed.into_iter().chain(decoded.body).collect())
    }
}

impl<B: ContractCaller> BoundContract<B> {
    async fn call_bytes(&self, opts: &CallOpts, input: Vec<u8>) -> BindResult<Bytes> {
        let mut request = TransactionRequest::default()
            .with_to(self.address)
            .with_input(input);
        if let Some(from) = opts.from {
            request = request.with_from(from);
        }
        let block = opts.block_id();
        let output = self.backend.call_contract(request, block).await?;
        if output.is_empty() {
            // An empty result is also what a call to an account without code returns.
            let code = self.backend.code_at(self.address, block).await?;
            if code.is_empty() {
                return Err(BindError::NoCode(self.address));
            }
        }
        Ok(output)
    }

    /// Invoke a read-only method and decode its return values.
    pub async fn call<C: SolCall>(&self, opts: &CallOpts, call: &C) -> BindResult<C::Return> {
        tracing::debug!(address = %self.address, method = C::SIGNATURE, "call");
        let output = self.call_bytes(opts, call.abi_encode()).await?;
        Ok(C::abi_decode_returns(&output, true)?)
    }

    /// Invoke the named ABI method with dynamically typed arguments.
    pub async fn call_raw(
        &self,
        opts: &CallOpts,
        method: &str,
        args: &[DynSolValue],
    ) -> BindResult<Vec<DynSolValue>> {
        let function = self.function(method)?;
        tracing::debug!(address = %self.address, method, "raw call");
        let input = function.abi_encode_input(args)?;
        let output = self.call_bytes(opts, input).await?;
        Ok(function.abi_decode_output(&output, true)?)
    }
}

impl<B: ContractTransactor> BoundContract<B> {
    async fn send(&self, opts: &TransactOpts, input: Vec<u8>) -> BindResult<B::Pending> {
        let request = opts.apply(
            TransactionRequest::default()
                .with_to(self.address)
                .with_input(input),
        );
        Ok(self.backend.send_transaction(request).await?)
    }

    /// Submit a state-changing method invocation.
    pub async fn transact<C: SolCall>(
        &self,
        opts: &TransactOpts,
        call: &C,
    ) -> BindResult<B::Pending> {
        tracing::debug!(address = %self.address, method = C::SIGNATURE, "transact");
        self.send(opts, call.abi_encode()).await
    }

    /// Submit the named ABI method with dynamically typed arguments.
    pub async fn transact_raw(
        &self,
        opts: &TransactOpts,
        method: &str,
        args: &[DynSolValue],
    ) -> BindResult<B::Pending> {
        let input = self.function(method)?.abi_encode_input(args)?;
        tracing::debug!(address = %self.address, method, "raw transact");
        self.send(opts, input).await
    }

    /// Send a plain value transfer, invoking the fallback or receive function if there is one.
    pub async fn transfer(&self, opts: &TransactOpts) -> BindResult<B::Pending> {
        tracing::debug!(address = %self.address, value = %opts.value, "transfer");
        self.send(opts, vec![]).await
    }

    /// Deploy a contract from its ABI and hex encoded creation bytecode.
    ///
    /// `constructor_args` is the ABI encoded constructor argument list. The returned address is
    /// derived from the sender and nonce, so `opts.from` is required. The creation transaction is
    /// only submitted; wait on the pending handle before using the contract.
    pub async fn deploy(
        opts: &TransactOpts,
        abi: &str,
        bytecode: &str,
        constructor_args: &[u8],
        backend: B,
    ) -> BindResult<(Address, B::Pending, Self)> {
        let abi = Arc::new(serde_json::from_str::<JsonAbi>(abi)?);
        let mut code = hex::decode(bytecode.trim())?;
        code.extend_from_slice(constructor_args);

        let from = opts.from.ok_or(BindError::MissingSender)?;
        let nonce = match opts.nonce {
            Some(nonce) => nonce,
            None => backend.pending_nonce_at(from).await?,
        };
        let address = from.create(nonce);
        tracing::debug!(%from, nonce, %address, "deploy");

        let request = opts
            .apply(TransactionRequest::default())
            .with_nonce(nonce)
            .with_deploy_code(code);
        let pending = backend.send_transaction(request).await?;
        Ok((address, pending, Self::with_abi(address, abi, backend)))
    }
}

impl<B: ContractFilterer> BoundContract<B> {
    /// Query past `E` events in the block range of `opts`.
    pub async fn filter<E: SolEvent>(
        &self,
        opts: &FilterOpts,
        topics: TopicFilter,
    ) -> BindResult<EventIterator<E>> {
        let mut filter = self.event_filter::<E>(topics).from_block(opts.start);
        if let Some(end) = opts.end {
            filter = filter.to_block(end);
        }
        tracing::debug!(address = %self.address, event = E::SIGNATURE, ?opts, "filter logs");
        let logs = self.backend.filter_logs(filter).await?;
        Ok(EventIterator::new(
            futures::stream::iter(logs.into_iter().map(Ok)).boxed(),
        ))
    }

    /// Forward future `E` events into `sink` until the returned subscription ends.
    pub async fn watch<E>(
        &self,
        opts: &WatchOpts,
        topics: TopicFilter,
        sink: mpsc::Sender<DecodedLog<E>>,
    ) -> BindResult<Subscription>
    where
        E: SolEvent + Send + 'static,
    {
        let mut filter = self.event_filter::<E>(topics);
        if let Some(start) = opts.start {
            filter = filter.from_block(start);
        }
        tracing::debug!(address = %self.address, event = E::SIGNATURE, ?opts, "watch logs");
        let logs = self.backend.subscribe_filter_logs(filter).await?;
        Ok(Subscription::spawn(logs, sink))
    }
}
