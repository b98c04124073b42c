//! Error handling for the dispatcher itself, using `thiserror`.
//!
//! This module provides the domain error types raised by alert construction
//! and dispatch waiting, plus centralized reporting of dispatched errors.

pub mod domain;
pub mod operational;

pub use {
    domain::{AlertError, DispatchError, Result},
    operational::{ErrorReporter, ResultExt},
};
