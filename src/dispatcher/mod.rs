//! The dispatch engine.
//!
//! A [`Dispatcher`] owns an ordered rule table plus a fallback list and an
//! always list. Handling an error resolves it into an ordered sequence of
//! actions and runs them as a chain: every action receives a [`Completion`]
//! that lets the next one start, and the caller's callback runs after the
//! last one.
//!
//! Resolution order:
//!
//! 1. Every rule whose matcher catches the error, in registration order,
//!    or only the first one under [`MatchMode::FirstMatch`].
//! 2. If no rule matched, the fallback actions instead.
//! 3. The always actions, in either case.
//!
//! Registration needs `&mut self` and handling only `&self`, so a fully
//! registered dispatcher can be wrapped in an `Arc` and shared.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::PathBuf,
    sync::Arc,
};

use {async_channel::bounded, tracing::debug};

use crate::{
    action::{ActionHandler, Completion},
    alert::descriptor::AlertDescriptorBuilder,
    config::settings::{DispatcherSettings, MatchMode, SettingsManager},
    dispatchable::{Dispatchable, SharedError},
    dispatcher::chain::Chain,
    error::{domain::Result, operational::ErrorReporter},
    matcher::ErrorMatcher,
    surface::PresentationSurface,
};

mod chain;
pub mod dispatch;

pub use dispatch::Dispatch;

/// A matcher bound to the action it triggers.
#[derive(Debug, Clone)]
pub struct Rule {
    matcher: ErrorMatcher,
    action: ActionHandler,
}

impl Rule {
    /// The rule's matcher.
    pub fn matcher(&self) -> &ErrorMatcher {
        &self.matcher
    }

    /// The rule's action.
    pub fn action(&self) -> &ActionHandler {
        &self.action
    }
}

/// How an error was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// At least one rule matched.
    Matched {
        /// Number of matching rules.
        rules: usize,
    },
    /// No rule matched and the fallback list, the always list or both
    /// were run.
    Fallback {
        /// Number of fallback actions.
        actions: usize,
    },
    /// Nothing was run.
    Unhandled,
}

impl DispatchOutcome {
    /// Returns `true` unless the error was unhandled.
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Unhandled)
    }
}

/// Actions an error resolves to, in execution order.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// How the error was resolved.
    pub outcome: DispatchOutcome,
    /// Actions to run, always actions last.
    pub actions: Vec<ActionHandler>,
}

/// Declarative error dispatcher.
pub struct Dispatcher {
    surface: Arc<dyn PresentationSurface>,
    rules: Vec<Rule>,
    fallback: Vec<ActionHandler>,
    always: Vec<ActionHandler>,
    settings: DispatcherSettings,
}

impl Dispatcher {
    /// Creates a dispatcher presenting alerts on `surface`, with default
    /// settings.
    pub fn new(surface: impl PresentationSurface + 'static) -> Self {
        Self::with_settings(surface, DispatcherSettings::default())
    }

    /// Creates a dispatcher with explicit settings.
    pub fn with_settings(
        surface: impl PresentationSurface + 'static,
        settings: DispatcherSettings,
    ) -> Self {
        Self {
            surface: Arc::new(surface),
            rules: Vec::new(),
            fallback: Vec::new(),
            always: Vec::new(),
            settings,
        }
    }

    /// Creates a dispatcher with settings loaded from `config_path`.
    ///
    /// A missing file yields default settings.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Settings` if the file cannot be read or parsed.
    pub fn with_config_file(
        surface: impl PresentationSurface + 'static,
        config_path: PathBuf,
    ) -> Result<Self> {
        let manager = SettingsManager::with_config_path(config_path)?;
        let settings = manager.get_settings().clone();
        Ok(Self::with_settings(surface, settings))
    }

    /// Appends a rule running `action` for errors caught by `matcher`.
    pub fn register(&mut self, matcher: ErrorMatcher, action: ActionHandler) -> &mut Self {
        self.rules.push(Rule { matcher, action });
        self
    }

    /// Appends one rule per matcher, all running `action`.
    pub fn register_each(
        &mut self,
        matchers: impl IntoIterator<Item = ErrorMatcher>,
        action: ActionHandler,
    ) -> &mut Self {
        for matcher in matchers {
            self.register(matcher, action.clone());
        }
        self
    }

    /// Builds `alert` and appends a rule presenting it.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Alert` if the alert is invalid. No rule is
    /// added in that case.
    pub fn register_alert(
        &mut self,
        matcher: ErrorMatcher,
        alert: AlertDescriptorBuilder,
    ) -> Result<&mut Self> {
        let descriptor = alert.build()?;
        Ok(self.register(matcher, ActionHandler::alert(descriptor)))
    }

    /// Appends an action run when no rule matches.
    pub fn register_fallback(&mut self, action: ActionHandler) -> &mut Self {
        self.fallback.push(action);
        self
    }

    /// Appends an action run for every error, after all other actions.
    pub fn register_always(&mut self, action: ActionHandler) -> &mut Self {
        self.always.push(action);
        self
    }

    /// Number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Registered rules in order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Settings this dispatcher runs with.
    pub fn settings(&self) -> &DispatcherSettings {
        &self.settings
    }

    /// Resolves `error` into the actions that would run for it.
    ///
    /// Nothing is run and nothing is reported.
    pub fn resolve(&self, error: &dyn Dispatchable) -> Resolution {
        let mut matching = self.rules.iter().filter(|rule| rule.matcher.catches(error));
        let matched: Vec<ActionHandler> = match self.settings.match_mode {
            MatchMode::CollectAll => matching.map(|rule| rule.action.clone()).collect(),
            MatchMode::FirstMatch => matching
                .next()
                .map(|rule| rule.action.clone())
                .into_iter()
                .collect(),
        };

        let (outcome, mut actions) = if matched.is_empty() {
            let outcome = DispatchOutcome::Fallback {
                actions: self.fallback.len(),
            };
            (outcome, self.fallback.clone())
        } else {
            (DispatchOutcome::Matched { rules: matched.len() }, matched)
        };
        actions.extend(self.always.iter().cloned());

        let outcome = if actions.is_empty() {
            DispatchOutcome::Unhandled
        } else {
            outcome
        };
        debug!(
            identity = %error.identity(),
            ?outcome,
            actions = actions.len(),
            "Resolved error"
        );

        Resolution { outcome, actions }
    }

    /// Handles `error` and runs `on_complete` after the last action.
    ///
    /// # Arguments
    ///
    /// * `error` - The error to dispatch.
    /// * `on_complete` - Callback run once every action has completed.
    ///
    /// # Returns
    ///
    /// `true` if at least one action was started. For an unhandled error
    /// `on_complete` is never called.
    pub fn handle<E, F>(&self, error: E, on_complete: F) -> bool
    where
        E: Into<SharedError>,
        F: FnOnce() + Send + 'static,
    {
        self.run(error.into(), Completion::new(on_complete)).is_handled()
    }

    /// Handles `error` without a completion callback.
    pub fn handle_error<E>(&self, error: E) -> bool
    where
        E: Into<SharedError>,
    {
        self.handle(error, || {})
    }

    /// Handles `error` and returns a handle to await the chain with.
    pub fn dispatch<E>(&self, error: E) -> Dispatch
    where
        E: Into<SharedError>,
    {
        let (sender, receiver) = bounded(1);
        let outcome = self.run(
            error.into(),
            Completion::new(move || {
                let _ = sender.try_send(());
            }),
        );
        Dispatch::new(outcome, receiver)
    }

    /// Returns a function handling every error passed to it.
    ///
    /// Useful for binding the failure side of producers that report errors
    /// through a callback.
    pub fn sink<E>(self: &Arc<Self>) -> impl Fn(E) + Send + Sync + use<E>
    where
        E: Into<SharedError>,
    {
        let dispatcher = Arc::clone(self);
        move |error| {
            dispatcher.handle_error(error);
        }
    }

    fn run(&self, error: SharedError, on_complete: Completion) -> DispatchOutcome {
        let Resolution { outcome, actions } = self.resolve(&*error);

        if actions.is_empty() {
            if self.settings.report_unhandled {
                ErrorReporter::report(self.settings.unhandled_level, &*error, "Unhandled error");
            }
            return outcome;
        }

        Chain::new(
            actions,
            error,
            Arc::clone(&self.surface),
            self.settings.dismiss_behavior,
            self.settings.warn_on_dropped_completion,
            on_complete,
        )
        .start();
        outcome
    }
}

impl Debug for Dispatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Dispatcher")
            .field("rules", &self.rules)
            .field("fallback", &self.fallback)
            .field("always", &self.always)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
