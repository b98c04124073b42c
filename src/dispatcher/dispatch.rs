//! Awaitable view of a running dispatch chain.

use std::time::Duration;

use {async_channel::Receiver, tokio::time::timeout};

use crate::{
    dispatcher::DispatchOutcome,
    error::domain::{DispatchError, Result},
};

/// Handle to a chain started by [`Dispatcher::dispatch`].
///
/// [`Dispatcher::dispatch`]: crate::dispatcher::Dispatcher::dispatch
#[derive(Debug)]
#[must_use = "a dispatch does nothing unless awaited or inspected"]
pub struct Dispatch {
    outcome: DispatchOutcome,
    receiver: Receiver<()>,
}

impl Dispatch {
    pub(crate) fn new(outcome: DispatchOutcome, receiver: Receiver<()>) -> Self {
        Self { outcome, receiver }
    }

    /// How the error was resolved.
    pub fn outcome(&self) -> DispatchOutcome {
        self.outcome
    }

    /// Returns `true` if the terminal completion has already fired, or if
    /// there was no chain to run.
    pub fn is_finished(&self) -> bool {
        !self.outcome.is_handled() || !self.receiver.is_empty()
    }

    /// Waits until the chain's terminal completion fires.
    ///
    /// An unhandled error has no chain and resolves immediately.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::ChainAbandoned` if the chain was dropped
    /// before completing.
    pub async fn finished(self) -> Result<DispatchOutcome> {
        if !self.outcome.is_handled() {
            return Ok(self.outcome);
        }

        self.receiver
            .recv()
            .await
            .map(|()| self.outcome)
            .map_err(|_| DispatchError::ChainAbandoned)
    }

    /// Waits for the chain like [`Dispatch::finished`], giving up after
    /// `limit`.
    ///
    /// The chain itself keeps running after the deadline.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::TimedOut` if the deadline passes first, and
    /// `DispatchError::ChainAbandoned` if the chain was dropped.
    pub async fn finished_within(self, limit: Duration) -> Result<DispatchOutcome> {
        let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
        timeout(limit, self.finished())
            .await
            .map_err(|_| DispatchError::TimedOut { timeout_ms })?
    }
}
