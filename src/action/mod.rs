//! Actions run for a dispatched error.
//!
//! Every action receives the error and a [`Completion`]. An action that is
//! done calls the completion, which runs the next step of the chain.

use std::{
    borrow::Cow,
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use tracing::debug;

use crate::{
    alert::{descriptor::AlertDescriptor, presented::PresentedAlert},
    config::settings::DismissBehavior,
    dispatchable::{Dispatchable, SharedError},
    error::{domain::AlertError, operational::ErrorReporter},
    surface::PresentationSurface,
};

pub mod completion;

pub use completion::Completion;

/// Callback of a custom action.
pub type CustomAction = Arc<dyn Fn(SharedError, Completion) + Send + Sync>;

/// Builds an alert for a specific error.
pub type AlertBuilderFn =
    Arc<dyn Fn(&dyn Dispatchable) -> Result<AlertDescriptor, AlertError> + Send + Sync>;

/// Where an alert action gets its descriptor from.
#[derive(Clone)]
pub enum AlertSource {
    /// The same alert for every error.
    Fixed(AlertDescriptor),
    /// An alert built from the error being dispatched.
    FromError(AlertBuilderFn),
}

impl AlertSource {
    fn descriptor(
        &self,
        error: &dyn Dispatchable,
    ) -> Result<Cow<'_, AlertDescriptor>, AlertError> {
        match self {
            Self::Fixed(descriptor) => Ok(Cow::Borrowed(descriptor)),
            Self::FromError(build) => build(error).map(Cow::Owned),
        }
    }
}

/// Dispatcher state an action runs against.
pub(crate) struct ActionContext<'a> {
    /// Surface alerts are presented on.
    pub surface: &'a dyn PresentationSurface,
    /// Behavior of alerts dismissed without a press.
    pub dismiss_behavior: DismissBehavior,
}

/// The work done in response to a matched error.
#[derive(Clone)]
pub enum ActionHandler {
    /// Does nothing and completes immediately.
    None,
    /// Presents an alert and completes once the user responds.
    Alert(AlertSource),
    /// Runs a callback that owns the completion.
    Custom(CustomAction),
}

impl ActionHandler {
    /// An action that does nothing.
    pub fn none() -> Self {
        Self::None
    }

    /// An action presenting `descriptor`.
    pub fn alert(descriptor: AlertDescriptor) -> Self {
        Self::Alert(AlertSource::Fixed(descriptor))
    }

    /// An action presenting an alert built from the dispatched error.
    ///
    /// If `build` fails, the failure is reported and the chain continues
    /// without presenting anything.
    pub fn alert_with<F>(build: F) -> Self
    where
        F: Fn(&dyn Dispatchable) -> Result<AlertDescriptor, AlertError> + Send + Sync + 'static,
    {
        Self::Alert(AlertSource::FromError(Arc::new(build)))
    }

    /// An action presenting a single-button alert whose message is the
    /// error's user message.
    pub fn error_alert(title: impl Into<String>, confirm_title: impl Into<String>) -> Self {
        let title = title.into();
        let confirm_title = confirm_title.into();
        Self::alert_with(move |error| {
            Ok(AlertDescriptor::confirmable(
                title.clone(),
                Some(ErrorReporter::to_user_message(error)),
                confirm_title.clone(),
                None,
            ))
        })
    }

    /// An action running `action` with the error and the completion.
    ///
    /// The callback must eventually call the completion, otherwise the
    /// chain stalls.
    pub fn custom<F>(action: F) -> Self
    where
        F: Fn(SharedError, Completion) + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(action))
    }

    /// Runs the action.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Dispatcher state to run against.
    /// * `error` - The error being dispatched.
    /// * `completion` - Continuation of the chain.
    pub(crate) fn perform(
        &self,
        ctx: &ActionContext<'_>,
        error: SharedError,
        completion: Completion,
    ) {
        match self {
            Self::None => completion.complete(),
            Self::Alert(source) => {
                let descriptor = match source.descriptor(&*error) {
                    Ok(descriptor) => descriptor,
                    Err(failure) => {
                        ErrorReporter::failure(&failure, "Building alert for dispatched error");
                        completion.complete();
                        return;
                    }
                };
                debug!(
                    title = descriptor.title(),
                    identity = %error.identity(),
                    "Presenting alert"
                );
                let alert = PresentedAlert::new(
                    &descriptor,
                    error.clone(),
                    completion,
                    ctx.dismiss_behavior,
                );
                ctx.surface.present(alert);
            }
            Self::Custom(action) => action(error, completion),
        }
    }
}

impl Debug for ActionHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::None => f.write_str("None"),
            Self::Alert(AlertSource::Fixed(descriptor)) => {
                f.debug_tuple("Alert").field(&descriptor.title()).finish()
            }
            Self::Alert(AlertSource::FromError(_)) => f.write_str("Alert(..)"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
