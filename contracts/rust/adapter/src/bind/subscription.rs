use alloy::sol_types::SolEvent;
use futures::StreamExt;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use super::{
    backend::LogStream,
    event::{decode_log, DecodedLog},
    BindError, BindResult,
};

/// Live event subscription forwarding decoded events into a channel.
///
/// The forwarding task ends when the subscription is unsubscribed or dropped, when the log stream
/// ends, when the receiving side of the channel is dropped, or on the first transport or decode
/// error. The last case is reported by [`Subscription::err`].
#[derive(Debug)]
pub struct Subscription {
    quit: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<BindResult<()>>>,
}

impl Subscription {
    pub(crate) fn spawn<E>(mut logs: LogStream, sink: mpsc::Sender<DecodedLog<E>>) -> Self
    where
        E: SolEvent + Send + 'static,
    {
        let (quit, mut quit_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            loop {
                let log = tokio::select! {
                    _ = &mut quit_rx => return Ok(()),
                    next = logs.next() => match next {
                        Some(Ok(log)) => log,
                        Some(Err(err)) => {
                            tracing::warn!(event = E::SIGNATURE, %err, "log subscription failed");
                            return Err(err.into());
                        },
                        None => return Ok(()),
                    },
                };
                let event = decode_log::<E>(log)?;
                tokio::select! {
                    _ = &mut quit_rx => return Ok(()),
                    sent = sink.send(event) => {
                        if sent.is_err() {
                            tracing::debug!(event = E::SIGNATURE, "event receiver dropped");
                            return Ok(());
                        }
                    },
                }
            }
        });
        Self {
            quit: Some(quit),
            task: Some(task),
        }
    }

    /// Stop forwarding events. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(quit) = self.quit.take() {
            // The task may already be gone.
            let _ = quit.send(());
        }
    }

    /// Wait for the forwarding task to end and return the error that ended it, if any.
    ///
    /// Only the first call observes the outcome; later calls return `None` immediately.
    pub async fn err(&mut self) -> Option<BindError> {
        let task = self.task.take()?;
        match task.await {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err),
            Err(err) => Some(BindError::Subscription(err.to_string())),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
