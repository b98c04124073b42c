//! Rendering-agnostic description of a modal choice.
//!
//! An `AlertDescriptor` is what an alert action shows: a title, an optional
//! message and an ordered, non-empty list of buttons. Descriptors are only
//! produced by [`AlertDescriptorBuilder::build`] and the presets, which
//! enforce the non-empty invariant.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use crate::{dispatchable::Dispatchable, error::domain::AlertError};

/// Callback run when a button is pressed, with the dispatched error.
pub type ButtonCallback = Arc<dyn Fn(&dyn Dispatchable) + Send + Sync>;

/// Presentation style of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertStyle {
    /// Centered modal alert (default).
    #[default]
    Alert,
    /// Sheet of actions anchored to the bottom of the parent.
    ActionSheet,
}

/// Style of an alert button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonStyle {
    /// Regular button (default).
    #[default]
    Default,
    /// Button that backs out of the choice. At most one per alert.
    Cancel,
}

/// A single button of an alert.
#[derive(Clone)]
pub struct AlertButton {
    title: String,
    style: ButtonStyle,
    on_press: Option<ButtonCallback>,
}

impl AlertButton {
    /// Creates a button without a callback.
    pub fn new(title: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            title: title.into(),
            style,
            on_press: None,
        }
    }

    /// Sets the callback run when this button is pressed.
    #[must_use]
    pub fn on_press<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn Dispatchable) + Send + Sync + 'static,
    {
        self.on_press = Some(Arc::new(callback));
        self
    }

    /// Button title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Button style.
    pub fn style(&self) -> ButtonStyle {
        self.style
    }

    pub(crate) fn callback(&self) -> Option<ButtonCallback> {
        self.on_press.clone()
    }
}

impl Debug for AlertButton {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AlertButton")
            .field("title", &self.title)
            .field("style", &self.style)
            .field("on_press", &self.on_press.is_some())
            .finish()
    }
}

/// Immutable description of an alert.
#[derive(Debug, Clone)]
pub struct AlertDescriptor {
    title: String,
    message: Option<String>,
    style: AlertStyle,
    buttons: Vec<AlertButton>,
}

impl AlertDescriptor {
    /// Starts building an alert with the given title.
    pub fn builder(title: impl Into<String>) -> AlertDescriptorBuilder {
        AlertDescriptorBuilder {
            title: title.into(),
            message: None,
            style: AlertStyle::default(),
            buttons: Vec::new(),
        }
    }

    /// Alert with a single confirm button.
    ///
    /// # Arguments
    ///
    /// * `title` - Alert title.
    /// * `message` - Optional alert message.
    /// * `confirm_title` - Title of the confirm button.
    /// * `confirm_action` - Optional callback run on confirm.
    pub fn confirmable(
        title: impl Into<String>,
        message: Option<String>,
        confirm_title: impl Into<String>,
        confirm_action: Option<ButtonCallback>,
    ) -> Self {
        Self {
            title: title.into(),
            message,
            style: AlertStyle::Alert,
            buttons: vec![AlertButton {
                title: confirm_title.into(),
                style: ButtonStyle::Default,
                on_press: confirm_action,
            }],
        }
    }

    /// Alert with a confirm button followed by a cancel-styled reject button.
    ///
    /// # Arguments
    ///
    /// * `title` - Alert title.
    /// * `message` - Optional alert message.
    /// * `confirm_title` - Title of the confirm button.
    /// * `reject_title` - Title of the reject button.
    /// * `confirm_action` - Optional callback run on confirm.
    /// * `reject_action` - Optional callback run on reject.
    pub fn rejectable(
        title: impl Into<String>,
        message: Option<String>,
        confirm_title: impl Into<String>,
        reject_title: impl Into<String>,
        confirm_action: Option<ButtonCallback>,
        reject_action: Option<ButtonCallback>,
    ) -> Self {
        Self {
            title: title.into(),
            message,
            style: AlertStyle::Alert,
            buttons: vec![
                AlertButton {
                    title: confirm_title.into(),
                    style: ButtonStyle::Default,
                    on_press: confirm_action,
                },
                AlertButton {
                    title: reject_title.into(),
                    style: ButtonStyle::Cancel,
                    on_press: reject_action,
                },
            ],
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

    /// Buttons in display order. Never empty.
    pub fn buttons(&self) -> &[AlertButton] {
        &self.buttons
    }
}

/// Builder pattern for configuring alert descriptors.
#[derive(Debug)]
pub struct AlertDescriptorBuilder {
    title: String,
    message: Option<String>,
    style: AlertStyle,
    buttons: Vec<AlertButton>,
}

impl AlertDescriptorBuilder {
    /// Sets the alert message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the alert style.
    pub fn style(mut self, style: AlertStyle) -> Self {
        self.style = style;
        self
    }

    /// Appends a button.
    pub fn button(mut self, button: AlertButton) -> Self {
        self.buttons.push(button);
        self
    }

    /// Appends a default-styled button with a callback.
    pub fn action<F>(self, title: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&dyn Dispatchable) + Send + Sync + 'static,
    {
        self.button(AlertButton::new(title, ButtonStyle::Default).on_press(callback))
    }

    /// Appends a cancel-styled button without a callback.
    pub fn cancel(self, title: impl Into<String>) -> Self {
        self.button(AlertButton::new(title, ButtonStyle::Cancel))
    }

    /// Builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::NoButtons` if no button was added and
    /// `AlertError::MultipleCancelButtons` if more than one button is
    /// cancel-styled.
    pub fn build(self) -> Result<AlertDescriptor, AlertError> {
        if self.buttons.is_empty() {
            return Err(AlertError::NoButtons { title: self.title });
        }

        let cancel_count = self
            .buttons
            .iter()
            .filter(|button| button.style == ButtonStyle::Cancel)
            .count();
        if cancel_count > 1 {
            return Err(AlertError::MultipleCancelButtons { title: self.title });
        }

        Ok(AlertDescriptor {
            title: self.title,
            message: self.message,
            style: self.style,
            buttons: self.buttons,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        alert::descriptor::{AlertButton, AlertDescriptor, AlertStyle, ButtonStyle},
        error::domain::AlertError,
    };

    #[test]
    fn test_builder_produces_descriptor() {
        let descriptor = AlertDescriptor::builder("Connection lost")
            .message("Check your network")
            .style(AlertStyle::ActionSheet)
            .action("Retry", |_| {})
            .cancel("Close")
            .build()
            .unwrap();

        assert_eq!(descriptor.title(), "Connection lost");
        assert_eq!(descriptor.message(), Some("Check your network"));
        assert_eq!(descriptor.style(), AlertStyle::ActionSheet);
        assert_eq!(descriptor.buttons().len(), 2);
        assert_eq!(descriptor.buttons()[0].title(), "Retry");
        assert_eq!(descriptor.buttons()[0].style(), ButtonStyle::Default);
        assert!(descriptor.buttons()[0].callback().is_some());
        assert_eq!(descriptor.buttons()[1].style(), ButtonStyle::Cancel);
        assert!(descriptor.buttons()[1].callback().is_none());
    }

    #[test]
    fn test_builder_rejects_empty_buttons() {
        let result = AlertDescriptor::builder("Empty").message("nothing").build();
        assert_eq!(
            result.unwrap_err(),
            AlertError::NoButtons {
                title: "Empty".to_string()
            }
        );
    }

    #[test]
    fn test_builder_rejects_multiple_cancel_buttons() {
        let result = AlertDescriptor::builder("Twice")
            .cancel("No")
            .button(AlertButton::new("Never", ButtonStyle::Cancel))
            .build();
        assert!(matches!(
            result,
            Err(AlertError::MultipleCancelButtons { .. })
        ));
    }

    #[test]
    fn test_confirmable_preset() {
        let descriptor =
            AlertDescriptor::confirmable("title", Some("message".to_string()), "confirm", None);
        assert_eq!(descriptor.title(), "title");
        assert_eq!(descriptor.message(), Some("message"));
        assert_eq!(descriptor.buttons().len(), 1);
        assert_eq!(descriptor.buttons()[0].title(), "confirm");
        assert_eq!(descriptor.buttons()[0].style(), ButtonStyle::Default);
    }

    #[test]
    fn test_rejectable_preset() {
        let descriptor = AlertDescriptor::rejectable(
            "title",
            Some("message".to_string()),
            "YES",
            "NO",
            None,
            None,
        );
        assert_eq!(descriptor.buttons().len(), 2);
        assert_eq!(descriptor.buttons()[0].title(), "YES");
        assert_eq!(descriptor.buttons()[0].style(), ButtonStyle::Default);
        assert_eq!(descriptor.buttons()[1].title(), "NO");
        assert_eq!(descriptor.buttons()[1].style(), ButtonStyle::Cancel);
    }
}
