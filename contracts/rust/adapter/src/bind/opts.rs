use alloy::{
    eips::BlockId,
    network::TransactionBuilder,
    primitives::{Address, U256},
    rpc::types::TransactionRequest,
};

/// Options for read-only calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallOpts {
    /// Sender of the message call. Matters for contracts that gate reads on `msg.sender`.
    pub from: Option<Address>,
    /// Block to read state at; latest when unset.
    pub block: Option<BlockId>,
}

impl CallOpts {
    /// Read against the pending state.
    pub fn pending() -> Self {
        Self {
            from: None,
            block: Some(BlockId::pending()),
        }
    }

    pub fn at(block: impl Into<BlockId>) -> Self {
        Self {
            from: None,
            block: Some(block.into()),
        }
    }

    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub(crate) fn block_id(&self) -> BlockId {
        self.block.unwrap_or_else(BlockId::latest)
    }
}

/// Options for state-changing transactions. Unset fields are filled in by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactOpts {
    pub from: Option<Address>,
    /// Wei attached to the transaction.
    pub value: U256,
    pub gas_limit: Option<u64>,
    /// Legacy gas price. Mutually exclusive with the EIP-1559 fee fields.
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub nonce: Option<u64>,
}

impl TransactOpts {
    /// Transact as `from` with everything else left to the backend.
    pub fn sender(from: Address) -> Self {
        Self {
            from: Some(from),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Apply these options to a transaction request.
    pub(crate) fn apply(&self, mut tx: TransactionRequest) -> TransactionRequest {
        if let Some(from) = self.from {
            tx = tx.with_from(from);
        }
        if !self.value.is_zero() {
            tx = tx.with_value(self.value);
        }
        if let Some(gas_limit) = self.gas_limit {
            tx = tx.with_gas_limit(gas_limit);
        }
        if let Some(gas_price) = self.gas_price {
            tx = tx.with_gas_price(gas_price);
        }
        if let Some(max_fee) = self.max_fee_per_gas {
            tx = tx.with_max_fee_per_gas(max_fee);
        }
        if let Some(priority_fee) = self.max_priority_fee_per_gas {
            tx = tx.with_max_priority_fee_per_gas(priority_fee);
        }
        if let Some(nonce) = self.nonce {
            tx = tx.with_nonce(nonce);
        }
        tx
    }
}

/// Block range for historical log queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterOpts {
    pub start: u64,
    /// Last block to include; latest when unset.
    pub end: Option<u64>,
}

impl FilterOpts {
    pub fn range(start: u64, end: u64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

/// Options for live log subscriptions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WatchOpts {
    /// Lowest block of forwarded logs; the node's current head when unset. Logs already mined
    /// are not replayed, query them with a filter instead.
    pub start: Option<u64>,
}

#[cfg(test)]
mod tests {
    use alloy::eips::BlockNumberOrTag;

    use super::*;

    #[test]
    fn test_transact_opts_apply() {
        let from = Address::repeat_byte(1);
        let opts = TransactOpts::sender(from)
            .with_value(U256::from(7))
            .with_gas_limit(100_000)
            .with_nonce(3);
        let tx = opts.apply(TransactionRequest::default());
        assert_eq!(tx.from, Some(from));
        assert_eq!(tx.value, Some(U256::from(7)));
        assert_eq!(tx.gas, Some(100_000));
        assert_eq!(tx.nonce, Some(3));
        assert_eq!(tx.gas_price, None);
    }

    #[test]
    fn test_default_opts_leave_request_untouched() {
        let tx = TransactOpts::default().apply(TransactionRequest::default());
        assert_eq!(tx, TransactionRequest::default());
    }

    #[test]
    fn test_call_opts_block() {
        assert_eq!(CallOpts::default().block_id(), BlockId::latest());
        assert_eq!(CallOpts::pending().block_id(), BlockId::pending());
        assert_eq!(
            CallOpts::at(BlockNumberOrTag::Number(5)).block_id(),
            BlockId::number(5)
        );
    }
}
