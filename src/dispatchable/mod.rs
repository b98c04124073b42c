//! Matchable facets of dispatched errors.
//!
//! Any error type can be dispatched once it implements [`Dispatchable`],
//! which exposes the three facets matchers look at: a structural identity,
//! a numeric code and an optional category. The [`dispatchable!`] macro
//! implements the trait for enums, one identity per variant.
//!
//! [`dispatchable!`]: crate::dispatchable!

use std::{
    any::{TypeId, type_name},
    error::Error as StdError,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    ops::Deref,
    sync::Arc,
};

mod generic;

pub use generic::GenericError;

/// Structural identity of an error: its family and its variant tag.
///
/// Two identities are equal when both the family type and the variant tag
/// are equal. Associated values never take part in the comparison.
#[derive(Clone, Copy)]
pub struct ErrorIdentity {
    family: TypeId,
    family_name: &'static str,
    variant: &'static str,
}

impl ErrorIdentity {
    /// Creates the identity of variant `variant` of the error family `T`.
    #[must_use]
    pub fn new<T: ?Sized + 'static>(variant: &'static str) -> Self {
        Self {
            family: TypeId::of::<T>(),
            family_name: type_name::<T>(),
            variant,
        }
    }

    /// Returns the `TypeId` of the error family.
    #[must_use]
    pub fn family(&self) -> TypeId {
        self.family
    }

    /// Returns whether this identity belongs to the error family `T`.
    #[must_use]
    pub fn is_family<T: ?Sized + 'static>(&self) -> bool {
        self.family == TypeId::of::<T>()
    }

    /// Returns the variant tag.
    #[must_use]
    pub fn variant(&self) -> &'static str {
        self.variant
    }
}

impl PartialEq for ErrorIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && self.variant == other.variant
    }
}

impl Eq for ErrorIdentity {}

impl Hash for ErrorIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.variant.hash(state);
    }
}

impl Debug for ErrorIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ErrorIdentity")
            .field("family", &self.family_name)
            .field("variant", &self.variant)
            .finish()
    }
}

impl Display for ErrorIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}::{}", self.family_name, self.variant)
    }
}

/// Access to a value as a plain `std::error::Error` trait object.
///
/// Implemented for every sized error, so trait objects of [`Dispatchable`]
/// can still be downcast to their concrete type.
pub trait AsStdError {
    /// Returns `self` as a `dyn Error`.
    fn as_std_error(&self) -> &(dyn StdError + 'static);
}

impl<T: StdError + 'static> AsStdError for T {
    fn as_std_error(&self) -> &(dyn StdError + 'static) {
        self
    }
}

/// An error the dispatcher can match on.
pub trait Dispatchable: StdError + AsStdError + Send + Sync + 'static {
    /// Structural identity of this error value.
    fn identity(&self) -> ErrorIdentity;

    /// Numeric code, `0` when the error has none.
    fn code(&self) -> i64 {
        0
    }

    /// Category string, if the error belongs to one.
    fn category(&self) -> Option<&str> {
        None
    }
}

impl dyn Dispatchable {
    /// Downcasts to a concrete error type.
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.as_std_error().downcast_ref::<T>()
    }
}

/// A reference-counted, dispatchable error.
///
/// This is the form in which the dispatcher hands an error to actions and
/// alert buttons, which may run after `handle` has returned.
#[derive(Clone)]
pub struct SharedError(Arc<dyn Dispatchable>);

impl SharedError {
    /// Wraps an already shared error.
    #[must_use]
    pub fn from_arc(error: Arc<dyn Dispatchable>) -> Self {
        Self(error)
    }

    /// Returns the inner shared error.
    #[must_use]
    pub fn into_arc(self) -> Arc<dyn Dispatchable> {
        self.0
    }
}

impl<E: Dispatchable> From<E> for SharedError {
    fn from(error: E) -> Self {
        Self(Arc::new(error))
    }
}

impl Deref for SharedError {
    type Target = dyn Dispatchable;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl Debug for SharedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&*self.0, f)
    }
}

impl Display for SharedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&*self.0, f)
    }
}

/// Implements [`Dispatchable`] for an enum, one identity per variant.
///
/// An optional category literal follows the type. Every variant must be
/// listed, and each may carry a numeric code; variants without one report
/// `0`. Tuple and struct variants are written with `(..)` or `{ .. }` so
/// their payloads are ignored.
///
/// ```
/// use errdispatch::{Dispatchable, dispatchable};
///
/// #[derive(Debug, thiserror::Error)]
/// enum SyncError {
///     #[error("offline")]
///     Offline,
///     #[error("rejected with status {0}")]
///     Rejected(u16),
/// }
///
/// dispatchable! {
///     SyncError: "sync" {
///         Offline,
///         Rejected(..) => 409,
///     }
/// }
///
/// assert_eq!(SyncError::Rejected(500).code(), 409);
/// assert_eq!(SyncError::Offline.category(), Some("sync"));
/// assert_eq!(SyncError::Rejected(1).identity(), SyncError::Rejected(2).identity());
/// ```
#[macro_export]
macro_rules! dispatchable {
    (@code) => {
        0
    };
    (@code $code:expr) => {
        $code
    };
    (@category) => {
        None
    };
    (@category $category:literal) => {
        Some($category)
    };
    (
        $ty:ty $(: $category:literal)? {
            $(
                $variant:ident
                $( ( $($tuple:tt)* ) )?
                $( { $($fields:tt)* } )?
                $( => $code:expr )?
            ),+ $(,)?
        }
    ) => {
        impl $crate::Dispatchable for $ty {
            fn identity(&self) -> $crate::ErrorIdentity {
                match self {
                    $(
                        Self::$variant $( ( $($tuple)* ) )? $( { $($fields)* } )? => {
                            $crate::ErrorIdentity::new::<Self>(stringify!($variant))
                        }
                    )+
                }
            }

            fn code(&self) -> i64 {
                match self {
                    $(
                        Self::$variant $( ( $($tuple)* ) )? $( { $($fields)* } )? => {
                            $crate::dispatchable!(@code $($code)?)
                        }
                    )+
                }
            }

            fn category(&self) -> Option<&str> {
                $crate::dispatchable!(@category $($category)?)
            }
        }
    };
}
