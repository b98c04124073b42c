//! Centralized error reporting and upstream result integration.
//!
//! This module provides leveled reporting of dispatched errors through
//! `tracing`, and an extension trait that routes the failure side of a
//! `Result` into a [`Dispatcher`].

use std::error::Error as StdError;

use tracing::{debug, error, info, warn};

use crate::{
    config::settings::ReportLevel,
    dispatchable::{Dispatchable, SharedError},
    dispatcher::Dispatcher,
};

/// Extension trait that hands failed results to a dispatcher.
///
/// The success value is returned as `Some`, the error is dispatched and
/// `None` is returned in its place.
pub trait ResultExt<T> {
    /// Dispatches the error, if any, without a completion callback.
    fn or_dispatch(self, dispatcher: &Dispatcher) -> Option<T>;

    /// Dispatches the error, if any, and runs `on_complete` once the
    /// resolved action chain has finished.
    ///
    /// `on_complete` is never called for a successful result, nor for an
    /// error the dispatcher could not handle.
    fn or_dispatch_then<F>(self, dispatcher: &Dispatcher, on_complete: F) -> Option<T>
    where
        F: FnOnce() + Send + 'static;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<SharedError>,
{
    fn or_dispatch(self, dispatcher: &Dispatcher) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                dispatcher.handle_error(err);
                None
            }
        }
    }

    fn or_dispatch_then<F>(self, dispatcher: &Dispatcher, on_complete: F) -> Option<T>
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                dispatcher.handle(err, on_complete);
                None
            }
        }
    }
}

/// Centralized error reporting and logging.
///
/// The `ErrorReporter` provides a consistent interface for logging
/// dispatched errors at different severity levels, including every
/// matchable facet of the error.
pub struct ErrorReporter;

impl ErrorReporter {
    /// Reports a debug-level error.
    pub fn debug(error: &dyn Dispatchable, context: &str) {
        debug!(
            context = context,
            identity = %error.identity(),
            code = error.code(),
            category = error.category(),
            error = %error,
            "Debug error"
        );
    }

    /// Reports an info-level error.
    pub fn info(error: &dyn Dispatchable, context: &str) {
        info!(
            context = context,
            identity = %error.identity(),
            code = error.code(),
            category = error.category(),
            error = %error,
            "Info error"
        );
    }

    /// Reports a warning-level error (recoverable issues).
    pub fn warn(error: &dyn Dispatchable, context: &str) {
        warn!(
            context = context,
            identity = %error.identity(),
            code = error.code(),
            category = error.category(),
            error = %error,
            "Warning error"
        );
    }

    /// Reports an error-level error (non-recoverable issues).
    pub fn error(error: &dyn Dispatchable, context: &str) {
        error!(
            context = context,
            identity = %error.identity(),
            code = error.code(),
            category = error.category(),
            error = %error,
            "Error error"
        );
    }

    /// Reports an error at the given level.
    ///
    /// # Arguments
    ///
    /// * `level` - Severity to report at.
    /// * `error` - The error being reported.
    /// * `context` - Short description of where the error surfaced.
    pub fn report(level: ReportLevel, error: &dyn Dispatchable, context: &str) {
        match level {
            ReportLevel::Debug => Self::debug(error, context),
            ReportLevel::Info => Self::info(error, context),
            ReportLevel::Warn => Self::warn(error, context),
            ReportLevel::Error => Self::error(error, context),
        }
    }

    /// Reports a failure raised by the dispatcher's own machinery, such as
    /// an alert that could not be built for an error.
    pub fn failure(failure: &dyn StdError, context: &str) {
        error!(context = context, error = %failure, "Dispatch failure");
    }

    /// Converts an error to a user-friendly message.
    ///
    /// The top-level message is followed by the immediate source, if the
    /// error has one.
    pub fn to_user_message(error: &dyn Dispatchable) -> String {
        match error.source() {
            Some(source) => format!("{error}: {source}"),
            None => error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering::SeqCst},
    };

    use thiserror::Error;

    use crate::{
        action::ActionHandler,
        dispatchable,
        dispatcher::Dispatcher,
        error::operational::{ErrorReporter, ResultExt},
        matcher::ErrorMatcher,
        surface::LogSurface,
    };

    #[derive(Error, Debug)]
    enum FetchError {
        #[error("Request timed out")]
        Timeout,
        #[error("Request failed")]
        Failed(#[source] std::io::Error),
    }

    dispatchable! {
        FetchError: "fetch" {
            Timeout => 408,
            Failed(..) => 500,
        }
    }

    fn counting_dispatcher(counter: &Arc<AtomicUsize>) -> Dispatcher {
        let counter = counter.clone();
        let mut dispatcher = Dispatcher::new(LogSurface::new());
        dispatcher.register(
            ErrorMatcher::by_identity(&FetchError::Timeout),
            ActionHandler::custom(move |_, done| {
                counter.fetch_add(1, SeqCst);
                done.complete();
            }),
        );
        dispatcher
    }

    #[test]
    fn test_or_dispatch_passes_success_through() {
        let counter = Arc::new(AtomicUsize::new(0));
        let dispatcher = counting_dispatcher(&counter);

        let result: Result<&str, FetchError> = Ok("win");
        assert_eq!(result.or_dispatch(&dispatcher), Some("win"));
        assert_eq!(counter.load(SeqCst), 0);
    }

    #[test]
    fn test_or_dispatch_handles_failure() {
        let counter = Arc::new(AtomicUsize::new(0));
        let dispatcher = counting_dispatcher(&counter);

        let result: Result<bool, FetchError> = Err(FetchError::Timeout);
        assert_eq!(result.or_dispatch(&dispatcher), None);
        assert_eq!(counter.load(SeqCst), 1);
    }

    #[test]
    fn test_or_dispatch_then_completes_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));
        let dispatcher = counting_dispatcher(&counter);

        let result: Result<bool, FetchError> = Err(FetchError::Timeout);
        let completed_clone = completed.clone();
        assert!(
            result
                .or_dispatch_then(&dispatcher, move || {
                    completed_clone.fetch_add(1, SeqCst);
                })
                .is_none()
        );
        assert_eq!(counter.load(SeqCst), 1);
        assert_eq!(completed.load(SeqCst), 1);
    }

    #[test]
    fn test_or_dispatch_then_skips_completion_when_unhandled() {
        let counter = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));
        let dispatcher = counting_dispatcher(&counter);

        let failure = std::io::Error::other("connection reset");
        let result: Result<bool, FetchError> = Err(FetchError::Failed(failure));
        let completed_clone = completed.clone();
        assert!(
            result
                .or_dispatch_then(&dispatcher, move || {
                    completed_clone.fetch_add(1, SeqCst);
                })
                .is_none()
        );
        assert_eq!(counter.load(SeqCst), 0);
        assert_eq!(completed.load(SeqCst), 0);
    }

    #[test]
    fn test_user_message_includes_source() {
        let failure = FetchError::Failed(std::io::Error::other("connection reset"));
        assert_eq!(
            ErrorReporter::to_user_message(&failure),
            "Request failed: connection reset"
        );
        assert_eq!(
            ErrorReporter::to_user_message(&FetchError::Timeout),
            "Request timed out"
        );
    }
}
