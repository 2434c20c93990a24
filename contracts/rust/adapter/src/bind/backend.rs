//! Capabilities a bound contract needs from the chain.
//!
//! A binding role only asks for what it uses: callers need [`ContractCaller`], transactors need
//! [`ContractTransactor`] and filterers need [`ContractFilterer`]. Every alloy [`Provider`]
//! provides all three.

use alloy::{
    eips::BlockId,
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, Bytes},
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::{Filter, Log, TransactionRequest},
    transports::{TransportError, TransportResult},
};
use async_trait::async_trait;
use futures::{stream::BoxStream, StreamExt};

/// Stream of logs matching a filter, delivered as the node reports them.
pub type LogStream = BoxStream<'static, Result<Log, TransportError>>;

/// Read-only access: `eth_call` and `eth_getCode`.
#[async_trait]
pub trait ContractCaller: Send + Sync {
    /// Execute a message call against the state at `block` without creating a transaction.
    async fn call_contract(&self, request: TransactionRequest, block: BlockId)
        -> TransportResult<Bytes>;

    /// Runtime bytecode deployed at `address`, empty for externally owned accounts.
    async fn code_at(&self, address: Address, block: BlockId) -> TransportResult<Bytes>;
}

/// Write access: nonce lookup and transaction submission.
#[async_trait]
pub trait ContractTransactor: Send + Sync {
    /// Handle returned for a submitted transaction.
    type Pending: Send;

    async fn pending_nonce_at(&self, address: Address) -> TransportResult<u64>;

    /// Submit a transaction. Missing fields (gas, fees, nonce, signature) are left to the
    /// backend.
    async fn send_transaction(&self, request: TransactionRequest)
        -> TransportResult<Self::Pending>;
}

/// Log access: historical queries and live subscriptions.
#[async_trait]
pub trait ContractFilterer: Send + Sync {
    async fn filter_logs(&self, filter: Filter) -> TransportResult<Vec<Log>>;

    /// Subscribe to logs matching `filter` that appear from now on. Dropping the stream ends the
    /// subscription.
    async fn subscribe_filter_logs(&self, filter: Filter) -> TransportResult<LogStream>;
}

/// Everything a fully featured binding needs.
pub trait ContractBackend: ContractCaller + ContractTransactor + ContractFilterer {}

impl<T> ContractBackend for T where T: ContractCaller + ContractTransactor + ContractFilterer {}

#[async_trait]
impl<P> ContractCaller for P
where
    P: Provider<Ethereum>,
{
    async fn call_contract(
        &self,
        request: TransactionRequest,
        block: BlockId,
    ) -> TransportResult<Bytes> {
        self.call(request).block(block).await
    }

    async fn code_at(&self, address: Address, block: BlockId) -> TransportResult<Bytes> {
        self.get_code_at(address).block_id(block).await
    }
}

#[async_trait]
impl<P> ContractTransactor for P
where
    P: Provider<Ethereum>,
{
    type Pending = PendingTransactionBuilder<Ethereum>;

    async fn pending_nonce_at(&self, address: Address) -> TransportResult<u64> {
        self.get_transaction_count(address).pending().await
    }

    async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> TransportResult<Self::Pending> {
        tracing::trace!(to = ?TransactionBuilder::to(&request), "sending transaction");
        Provider::send_transaction(self, request).await
    }
}

#[async_trait]
impl<P> ContractFilterer for P
where
    P: Provider<Ethereum>,
{
    async fn filter_logs(&self, filter: Filter) -> TransportResult<Vec<Log>> {
        self.get_logs(&filter).await
    }

    // Polls `eth_getFilterChanges` at the client's poll interval, which also works over plain HTTP.
    async fn subscribe_filter_logs(&self, filter: Filter) -> TransportResult<LogStream> {
        let poller = self.watch_logs(&filter).await?;
        Ok(poller
            .into_stream()
            .flat_map(|logs| futures::stream::iter(logs.into_iter().map(Ok)))
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use alloy::providers::ProviderBuilder;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::setup_test;

    #[tokio::test]
    async fn test_provider_backend_reports_transport_errors() -> anyhow::Result<()> {
        setup_test();
        // nothing listens on port 1
        let provider = ProviderBuilder::new().on_http("http://127.0.0.1:1".parse()?);
        let to = Address::repeat_byte(7);
        let request = TransactionRequest::default().with_to(to);
        assert_eq!(TransactionBuilder::to(&request), Some(to));

        assert!(ContractTransactor::send_transaction(&provider, request.clone())
            .await
            .is_err());
        assert!(ContractCaller::call_contract(&provider, request, BlockId::latest())
            .await
            .is_err());
        assert!(ContractFilterer::filter_logs(&provider, Filter::new())
            .await
            .is_err());
        Ok(())
    }
}
