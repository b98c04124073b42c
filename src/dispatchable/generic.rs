//! Runtime-built errors identified by category and code.

use std::{error::Error as StdError, sync::Arc};

use thiserror::Error;

use crate::dispatchable::{Dispatchable, ErrorIdentity};

/// An error assembled at runtime from a category, a code and a message.
///
/// Useful for errors that cross a boundary as plain data, such as status
/// codes from a remote service. All `GenericError`s share one identity, so
/// they are told apart with code and category matchers.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct GenericError {
    category: String,
    code: i64,
    message: String,
    #[source]
    source: Option<Arc<dyn StdError + Send + Sync>>,
}

impl GenericError {
    /// Creates a new error in `category` with the given `code`.
    ///
    /// The message defaults to `"<category> error <code>"`.
    pub fn new(category: impl Into<String>, code: i64) -> Self {
        let category = category.into();
        let message = format!("{category} error {code}");
        Self {
            category,
            code,
            message,
            source: None,
        }
    }

    /// Replaces the human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches an underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Dispatchable for GenericError {
    fn identity(&self) -> ErrorIdentity {
        ErrorIdentity::new::<Self>("GenericError")
    }

    fn code(&self) -> i64 {
        self.code
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }
}
