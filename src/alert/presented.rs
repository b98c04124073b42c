//! Alerts bound to a dispatched error and to the rest of their chain.
//!
//! A `PresentedAlert` is what a presentation surface receives. It carries
//! everything needed to render the alert, and resolves the chain when the
//! surface reports the user's response.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use tracing::{debug, warn};

use crate::{
    action::completion::Completion,
    alert::descriptor::{AlertDescriptor, AlertStyle, ButtonCallback, ButtonStyle},
    config::settings::DismissBehavior,
    dispatchable::{Dispatchable, SharedError},
    error::domain::AlertError,
};

/// Render data of one alert button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedButton {
    title: String,
    style: ButtonStyle,
}

impl PresentedButton {
    /// Button title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Button style.
    pub fn style(&self) -> ButtonStyle {
        self.style
    }
}

/// An alert waiting for the user's response.
///
/// The alert is resolved exactly once: by [`PresentedAlert::press`], by
/// [`PresentedAlert::dismiss`], or by being dropped unanswered, which
/// counts as a dismissal.
pub struct PresentedAlert {
    title: String,
    message: Option<String>,
    style: AlertStyle,
    buttons: Vec<PresentedButton>,
    callbacks: Vec<Option<ButtonCallback>>,
    error: SharedError,
    completion: Option<Completion>,
    dismiss_behavior: DismissBehavior,
}

impl PresentedAlert {
    /// Binds `descriptor` to `error` and to the chain's `completion`.
    pub(crate) fn new(
        descriptor: &AlertDescriptor,
        error: SharedError,
        completion: Completion,
        dismiss_behavior: DismissBehavior,
    ) -> Self {
        let buttons = descriptor
            .buttons()
            .iter()
            .map(|button| PresentedButton {
                title: button.title().to_string(),
                style: button.style(),
            })
            .collect();
        let callbacks = descriptor
            .buttons()
            .iter()
            .map(|button| button.callback())
            .collect();

        Self {
            title: descriptor.title().to_string(),
            message: descriptor.message().map(str::to_string),
            style: descriptor.style(),
            buttons,
            callbacks,
            error,
            completion: Some(completion),
            dismiss_behavior,
        }
    }

    /// Alert title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Alert message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Alert style.
    pub fn style(&self) -> AlertStyle {
        self.style
    }

    /// Buttons in display order.
    pub fn buttons(&self) -> &[PresentedButton] {
        &self.buttons
    }

    /// Index of the cancel-styled button, if any.
    pub fn cancel_index(&self) -> Option<usize> {
        self.buttons
            .iter()
            .position(|button| button.style == ButtonStyle::Cancel)
    }

    /// The error this alert was raised for.
    pub fn error(&self) -> &dyn Dispatchable {
        &*self.error
    }

    /// Presses the button at `index`.
    ///
    /// The button's callback runs with the dispatched error, then the chain
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::ButtonOutOfRange` if there is no such button.
    /// The alert is then dismissed.
    pub fn press(mut self, index: usize) -> Result<(), AlertError> {
        if index >= self.buttons.len() {
            return Err(AlertError::ButtonOutOfRange {
                index,
                count: self.buttons.len(),
            });
        }

        debug!(
            title = %self.title,
            button = %self.buttons[index].title,
            "Alert button pressed"
        );
        let callback = self.callbacks[index].take();
        let completion = self.completion.take();

        if let Some(callback) = callback {
            callback(&*self.error);
        }
        if let Some(completion) = completion {
            completion.complete();
        }
        Ok(())
    }

    /// Dismisses the alert without a button press.
    pub fn dismiss(mut self) {
        self.resolve_dismissal();
    }

    fn resolve_dismissal(&mut self) {
        let Some(completion) = self.completion.take() else {
            return;
        };

        match self.dismiss_behavior {
            DismissBehavior::InvokeCancel => {
                let callback = self
                    .cancel_index()
                    .and_then(|index| self.callbacks[index].take());
                if let Some(callback) = callback {
                    callback(&*self.error);
                }
                completion.complete();
            }
            DismissBehavior::Continue => completion.complete(),
            DismissBehavior::Stall => {
                debug!(title = %self.title, "Alert dismissed, abandoning chain");
                completion.abandon();
            }
        }
    }
}

impl Drop for PresentedAlert {
    fn drop(&mut self) {
        if self.completion.is_some() {
            warn!(title = %self.title, "Alert dropped without a response, treating as dismissal");
            self.resolve_dismissal();
        }
    }
}

impl Debug for PresentedAlert {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PresentedAlert")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("style", &self.style)
            .field("buttons", &self.buttons)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering::SeqCst},
    };

    use {parking_lot::Mutex, thiserror::Error};

    use crate::{
        action::completion::Completion,
        alert::{descriptor::AlertDescriptor, presented::PresentedAlert},
        config::settings::DismissBehavior,
        dispatchable,
        dispatchable::SharedError,
        error::domain::AlertError,
    };

    #[derive(Error, Debug)]
    enum SimpleError {
        #[error("error1")]
        Error1,
    }

    dispatchable! {
        SimpleError {
            Error1,
        }
    }

    struct Fixture {
        pressed: Arc<Mutex<Vec<String>>>,
        completed: Arc<AtomicUsize>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                pressed: Arc::new(Mutex::new(Vec::new())),
                completed: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn alert(&self, behavior: DismissBehavior) -> PresentedAlert {
            let confirm = self.pressed.clone();
            let reject = self.pressed.clone();
            let descriptor = AlertDescriptor::builder("Offline")
                .message("Retry?")
                .action("Retry", move |error| {
                    confirm.lock().push(format!("retry:{error}"));
                })
                .button(
                    crate::alert::AlertButton::new("Close", crate::alert::ButtonStyle::Cancel)
                        .on_press(move |error| reject.lock().push(format!("close:{error}"))),
                )
                .build()
                .unwrap();

            let completed = self.completed.clone();
            let completion = Completion::new(move || {
                completed.fetch_add(1, SeqCst);
            });
            PresentedAlert::new(
                &descriptor,
                SharedError::from(SimpleError::Error1),
                completion,
                behavior,
            )
        }
    }

    #[test]
    fn test_presented_alert_exposes_render_data() {
        let fixture = Fixture::new();
        let alert = fixture.alert(DismissBehavior::InvokeCancel);

        assert_eq!(alert.title(), "Offline");
        assert_eq!(alert.message(), Some("Retry?"));
        assert_eq!(alert.buttons().len(), 2);
        assert_eq!(alert.buttons()[0].title(), "Retry");
        assert_eq!(alert.cancel_index(), Some(1));
        assert_eq!(alert.error().to_string(), "error1");
        alert.press(0).unwrap();
    }

    #[test]
    fn test_press_runs_callback_then_completes() {
        let fixture = Fixture::new();
        fixture.alert(DismissBehavior::InvokeCancel).press(0).unwrap();

        assert_eq!(*fixture.pressed.lock(), vec!["retry:error1".to_string()]);
        assert_eq!(fixture.completed.load(SeqCst), 1);
    }

    #[test]
    fn test_press_out_of_range_dismisses() {
        let fixture = Fixture::new();
        let result = fixture.alert(DismissBehavior::InvokeCancel).press(5);

        assert_eq!(result, Err(AlertError::ButtonOutOfRange { index: 5, count: 2 }));
        assert_eq!(*fixture.pressed.lock(), vec!["close:error1".to_string()]);
        assert_eq!(fixture.completed.load(SeqCst), 1);
    }

    #[test]
    fn test_dismiss_invokes_cancel() {
        let fixture = Fixture::new();
        fixture.alert(DismissBehavior::InvokeCancel).dismiss();

        assert_eq!(*fixture.pressed.lock(), vec!["close:error1".to_string()]);
        assert_eq!(fixture.completed.load(SeqCst), 1);
    }

    #[test]
    fn test_dismiss_continue_skips_callbacks() {
        let fixture = Fixture::new();
        fixture.alert(DismissBehavior::Continue).dismiss();

        assert!(fixture.pressed.lock().is_empty());
        assert_eq!(fixture.completed.load(SeqCst), 1);
    }

    #[test]
    fn test_dismiss_stall_abandons_chain() {
        let fixture = Fixture::new();
        fixture.alert(DismissBehavior::Stall).dismiss();

        assert!(fixture.pressed.lock().is_empty());
        assert_eq!(fixture.completed.load(SeqCst), 0);
    }

    #[test]
    fn test_drop_counts_as_dismissal() {
        let fixture = Fixture::new();
        drop(fixture.alert(DismissBehavior::Continue));

        assert_eq!(fixture.completed.load(SeqCst), 1);
    }
}
