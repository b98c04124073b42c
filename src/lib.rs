//! Errdispatch - Declarative Error Dispatching
//!
//! A dispatcher that turns errors into ordered chains of actions. Rules pair
//! a matcher with an action; handling an error runs every matching rule's
//! action in registration order, falls back to default actions when nothing
//! matches, and always finishes with the actions registered to run for
//! every error. Actions hand control to the next step through a single-shot
//! completion, so alerts and other asynchronous work can sit in the middle
//! of a chain.
//!
//! ```
//! use errdispatch::{ActionHandler, Dispatcher, ErrorMatcher, LogSurface, dispatchable};
//!
//! #[derive(Debug, thiserror::Error)]
//! enum LoginError {
//!     #[error("wrong password")]
//!     WrongPassword,
//!     #[error("account locked")]
//!     Locked,
//! }
//!
//! dispatchable! {
//!     LoginError: "login" {
//!         WrongPassword => 401,
//!         Locked => 423,
//!     }
//! }
//!
//! let mut dispatcher = Dispatcher::new(LogSurface::new());
//! dispatcher
//!     .register(
//!         ErrorMatcher::by_identity(&LoginError::Locked),
//!         ActionHandler::custom(|_, done| done.complete()),
//!     )
//!     .register_fallback(ActionHandler::none());
//!
//! assert!(dispatcher.handle_error(LoginError::WrongPassword));
//! ```

pub mod action;
pub mod alert;
pub mod config;
pub mod dispatchable;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod surface;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types for convenience
pub use {
    action::{ActionHandler, AlertSource, Completion},
    alert::{
        AlertButton, AlertDescriptor, AlertDescriptorBuilder, AlertStyle, ButtonStyle,
        PresentedAlert, PresentedButton,
    },
    config::{DismissBehavior, DispatcherSettings, MatchMode, ReportLevel, SettingsManager},
    dispatchable::{Dispatchable, ErrorIdentity, GenericError, SharedError},
    dispatcher::{Dispatch, DispatchOutcome, Dispatcher, Resolution, Rule},
    error::{AlertError, DispatchError, ErrorReporter, ResultExt},
    matcher::ErrorMatcher,
    surface::{ChannelSurface, LogSurface, PresentationSurface},
};
