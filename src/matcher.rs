//! Predicates selecting which errors a rule applies to.

use std::{
    error::Error as StdError,
    fmt::{Debug, Formatter, Result as FmtResult},
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

use tracing::warn;

use crate::dispatchable::{Dispatchable, ErrorIdentity};

/// Custom matching function.
pub type MatchFn = Arc<dyn Fn(&dyn Dispatchable) -> bool + Send + Sync>;

/// A stateless predicate over dispatched errors.
///
/// Matchers are cheap to clone and can be shared between rules and
/// dispatchers.
#[derive(Clone)]
pub enum ErrorMatcher {
    /// Same family and variant as a template error.
    Identity(ErrorIdentity),
    /// Numeric code equality.
    Code(i64),
    /// Category equality.
    Category(String),
    /// Arbitrary predicate.
    Predicate(MatchFn),
}

impl ErrorMatcher {
    /// Matches errors with the same structural identity as `template`.
    ///
    /// Associated values are not compared, so `template` only needs to be
    /// the right variant.
    pub fn by_identity(template: &dyn Dispatchable) -> Self {
        Self::Identity(template.identity())
    }

    /// Matches errors whose code equals `code`.
    pub fn by_code(code: i64) -> Self {
        Self::Code(code)
    }

    /// Matches errors whose category equals `category`.
    pub fn by_category(category: impl Into<String>) -> Self {
        Self::Category(category.into())
    }

    /// Matches errors for which `predicate` returns `true`.
    pub fn by_predicate<F>(predicate: F) -> Self
    where
        F: Fn(&dyn Dispatchable) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Matches any variant of the error family `T`.
    pub fn by_family<T: Dispatchable>() -> Self {
        Self::by_predicate(|error| error.identity().is_family::<T>())
    }

    /// Matches errors of concrete type `T` for which `predicate` holds.
    ///
    /// Errors of any other type never match.
    pub fn by_downcast<T, F>(predicate: F) -> Self
    where
        T: StdError + 'static,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::by_predicate(move |error| error.downcast_ref::<T>().is_some_and(&predicate))
    }

    /// Evaluates the matcher against `error`.
    ///
    /// A predicate that panics is reported and treated as not matching.
    ///
    /// # Arguments
    ///
    /// * `error` - The error being dispatched.
    ///
    /// # Returns
    ///
    /// `true` if this matcher catches the error.
    pub fn catches(&self, error: &dyn Dispatchable) -> bool {
        match self {
            Self::Identity(identity) => error.identity() == *identity,
            Self::Code(code) => error.code() == *code,
            Self::Category(category) => error.category() == Some(category.as_str()),
            Self::Predicate(predicate) => {
                match catch_unwind(AssertUnwindSafe(|| predicate(error))) {
                    Ok(caught) => caught,
                    Err(_) => {
                        warn!(
                            identity = %error.identity(),
                            "Matcher predicate panicked, treating as no match"
                        );
                        false
                    }
                }
            }
        }
    }
}

impl Debug for ErrorMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Identity(identity) => f.debug_tuple("Identity").field(identity).finish(),
            Self::Code(code) => f.debug_tuple("Code").field(code).finish(),
            Self::Category(category) => f.debug_tuple("Category").field(category).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
