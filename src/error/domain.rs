//! Domain-specific error types using `thiserror`.
//!
//! This module defines the error enums raised by the dispatcher itself:
//! alert construction and presentation failures, and failures observed
//! while waiting on a dispatch chain.

use std::result::Result as StdResult;

use thiserror::Error;

use crate::config::settings::SettingsError;

/// Alert construction and presentation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertError {
    /// An alert was built without any button.
    #[error("Alert \"{title}\" has no buttons")]
    NoButtons { title: String },
    /// An alert was built with more than one cancel button.
    #[error("Alert \"{title}\" has more than one cancel button")]
    MultipleCancelButtons { title: String },
    /// A surface pressed a button that does not exist.
    #[error("Button index {index} is out of range for an alert with {count} buttons")]
    ButtonOutOfRange { index: usize, count: usize },
}

/// Errors observed by callers of the dispatcher.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The chain was dropped before its terminal completion fired.
    #[error("Dispatch chain was abandoned before completing")]
    ChainAbandoned,
    /// The chain did not complete within the caller's deadline.
    #[error("Dispatch chain did not complete within {timeout_ms} ms")]
    TimedOut { timeout_ms: u64 },
    /// Alert error.
    #[error("Alert error: {0}")]
    Alert(#[from] AlertError),
    /// Settings error.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Result alias for dispatcher operations.
pub type Result<T> = StdResult<T, DispatchError>;
