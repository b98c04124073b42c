//! Single-shot continuations that advance a dispatch chain.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use tracing::warn;

type Continuation = Box<dyn FnOnce() + Send>;

/// Continuation handed to every action.
///
/// Calling [`Completion::complete`] consumes the value, so a completion
/// fires at most once. Dropping an armed completion without calling it
/// stalls the chain it belongs to.
#[must_use = "dropping a completion without calling `complete` stalls the dispatch chain"]
pub struct Completion {
    continuation: Option<Continuation>,
    warn_on_drop: bool,
}

impl Completion {
    /// Wraps `continuation` into a completion.
    pub fn new<F>(continuation: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            continuation: Some(Box::new(continuation)),
            warn_on_drop: false,
        }
    }

    /// A completion that does nothing.
    pub fn noop() -> Self {
        Self {
            continuation: None,
            warn_on_drop: false,
        }
    }

    /// Logs a warning if this completion is dropped without being called.
    pub(crate) fn warn_on_drop(mut self, warn_on_drop: bool) -> Self {
        self.warn_on_drop = warn_on_drop;
        self
    }

    /// Returns `true` if calling this completion has no effect.
    pub fn is_noop(&self) -> bool {
        self.continuation.is_none()
    }

    /// Runs the continuation.
    pub fn complete(mut self) {
        if let Some(continuation) = self.continuation.take() {
            continuation();
        }
    }

    /// Drops the continuation without running it or warning.
    pub(crate) fn abandon(mut self) {
        self.warn_on_drop = false;
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::noop()
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.warn_on_drop && self.continuation.is_some() {
            warn!("Completion dropped without being called, dispatch chain stalled");
        }
    }
}

impl Debug for Completion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Completion")
            .field("armed", &self.continuation.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering::SeqCst},
    };

    use crate::{action::completion::Completion, test_support::capture_logs};

    #[test]
    fn test_completion_runs_continuation() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        let completion = Completion::new(move || {
            counter_clone.fetch_add(1, SeqCst);
        });

        assert!(!completion.is_noop());
        completion.complete();
        assert_eq!(counter.load(SeqCst), 1);
    }

    #[test]
    fn test_noop_completion() {
        let completion = Completion::noop();
        assert!(completion.is_noop());
        completion.complete();
        assert!(Completion::default().is_noop());
    }

    #[test]
    fn test_dropped_completion_never_runs() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        let completion = Completion::new(move || {
            counter_clone.fetch_add(1, SeqCst);
        })
        .warn_on_drop(true);

        drop(completion);
        assert_eq!(counter.load(SeqCst), 0);
    }

    #[test]
    fn test_abandoned_completion_never_runs_or_warns() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        let completion = Completion::new(move || {
            counter_clone.fetch_add(1, SeqCst);
        })
        .warn_on_drop(true);

        let logs = capture_logs(|| completion.abandon());
        assert_eq!(counter.load(SeqCst), 0);
        assert!(!logs.contains("Completion dropped"));
    }

    #[test]
    fn test_dropped_completion_warns() {
        let completion = Completion::new(|| {}).warn_on_drop(true);
        let logs = capture_logs(|| drop(completion));
        assert_eq!(logs.matches("Completion dropped").count(), 1);
    }

    #[test]
    fn test_completion_is_send() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        let completion = Completion::new(move || {
            counter_clone.fetch_add(1, SeqCst);
        });

        std::thread::spawn(move || completion.complete())
            .join()
            .unwrap();
        assert_eq!(counter.load(SeqCst), 1);
    }
}
