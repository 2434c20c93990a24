use std::{marker::PhantomData, ops::Deref};

use alloy::{rpc::types::Log, sol_types::SolEvent};
use futures::StreamExt;

use super::{backend::LogStream, BindError, BindResult};

/// A decoded event together with the raw log it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedLog<E> {
    pub event: E,
    pub raw: Log,
}

impl<E> Deref for DecodedLog<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.event
    }
}

/// Decode a raw log as event `E`, rejecting logs whose first topic is not `E`'s signature hash.
pub(crate) fn decode_log<E: SolEvent>(raw: Log) -> BindResult<DecodedLog<E>> {
    let topic0 = raw.topic0().copied();
    if !E::ANONYMOUS && topic0 != Some(E::SIGNATURE_HASH) {
        return Err(BindError::EventSignatureMismatch {
            event: E::SIGNATURE,
            topic0,
        });
    }
    let event = E::decode_log_data(raw.data(), true)?;
    Ok(DecodedLog { event, raw })
}

/// Iterator over the logs of a single event type returned by a filter query.
///
/// The first decode or transport error stops the iteration for good. It is then available
/// through [`EventIterator::error`].
pub struct EventIterator<E> {
    logs: Option<LogStream>,
    fail: Option<BindError>,
    _event: PhantomData<fn() -> E>,
}

impl<E: SolEvent> EventIterator<E> {
    pub(crate) fn new(logs: LogStream) -> Self {
        Self {
            logs: Some(logs),
            fail: None,
            _event: PhantomData,
        }
    }

    /// Advance to the next event. `None` means the logs are exhausted, the iterator was closed
    /// or it failed.
    pub async fn next(&mut self) -> Option<DecodedLog<E>> {
        if self.fail.is_some() {
            return None;
        }
        let logs = self.logs.as_mut()?;
        let result = match logs.next().await {
            Some(Ok(log)) => decode_log(log),
            Some(Err(err)) => Err(err.into()),
            None => {
                self.logs = None;
                return None;
            },
        };
        match result {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::debug!(event = E::SIGNATURE, %err, "event iteration failed");
                self.fail = Some(err);
                self.logs = None;
                None
            },
        }
    }

    /// The error that stopped the iteration, if any.
    pub fn error(&self) -> Option<&BindError> {
        self.fail.as_ref()
    }

    /// Whether no more events will be produced.
    pub fn is_exhausted(&self) -> bool {
        self.logs.is_none()
    }

    /// Stop iterating and release the underlying log stream.
    pub fn close(&mut self) {
        self.logs = None;
    }

    /// Drain the remaining events, returning the error that stopped the iteration if there was
    /// one.
    pub async fn collect(mut self) -> BindResult<Vec<DecodedLog<E>>> {
        let mut events = vec![];
        while let Some(event) = self.next().await {
            events.push(event);
        }
        match self.fail {
            Some(err) => Err(err),
            None => Ok(events),
        }
    }
}

impl<E> std::fmt::Debug for EventIterator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventIterator")
            .field("open", &self.logs.is_some())
            .field("fail", &self.fail)
            .finish()
    }
}
