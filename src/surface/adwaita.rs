//! Libadwaita presenter for channel-delivered alerts.
//!
//! This module shows every alert received from a [`ChannelSurface`] as an
//! `AlertDialog` on the GLib main context.
//!
//! [`ChannelSurface`]: crate::surface::ChannelSurface

use std::{cell::RefCell, rc::Rc};

use {
    async_channel::Receiver,
    libadwaita::{
        AlertDialog, ResponseAppearance,
        glib::MainContext,
        gtk::Widget,
        prelude::{AdwDialogExt, AlertDialogExt},
    },
    tracing::{debug, warn},
};

use crate::alert::{descriptor::ButtonStyle, presented::PresentedAlert};

/// Prefix of the response ids given to alert buttons.
const RESPONSE_PREFIX: &str = "button-";

/// Spawns a task on the default main context presenting received alerts.
///
/// The task ends when every sender of `receiver` has been dropped.
///
/// # Arguments
///
/// * `receiver` - Receiving end of a `ChannelSurface`.
/// * `parent` - Optional widget the dialogs are attached to.
pub fn spawn_alert_presenter(receiver: Receiver<PresentedAlert>, parent: Option<Widget>) {
    MainContext::default().spawn_local(async move {
        while let Ok(alert) = receiver.recv().await {
            present_dialog(alert, parent.as_ref());
        }
        debug!("AlertPresenter: Channel closed, stopping");
    });
}

/// Builds and presents the dialog for one alert.
fn present_dialog(alert: PresentedAlert, parent: Option<&Widget>) {
    let dialog = AlertDialog::new(Some(alert.title()), alert.message());

    let mut suggested = false;
    for (index, button) in alert.buttons().iter().enumerate() {
        let id = format!("{RESPONSE_PREFIX}{index}");
        dialog.add_response(&id, button.title());

        match button.style() {
            ButtonStyle::Cancel => dialog.set_close_response(&id),
            ButtonStyle::Default if !suggested => {
                dialog.set_response_appearance(&id, ResponseAppearance::Suggested);
                dialog.set_default_response(Some(id.as_str()));
                suggested = true;
            }
            ButtonStyle::Default => {}
        }
    }

    debug!(title = alert.title(), "AlertPresenter: Presenting dialog");

    // The dialog may emit more than one response; only the first resolves the alert.
    let pending = Rc::new(RefCell::new(Some(alert)));
    dialog.connect_response(None, move |_, response| {
        let Some(alert) = pending.borrow_mut().take() else {
            return;
        };
        let index = response
            .strip_prefix(RESPONSE_PREFIX)
            .and_then(|index| index.parse::<usize>().ok());

        match index {
            Some(index) => {
                if let Err(e) = alert.press(index) {
                    warn!("AlertPresenter: {e}");
                }
            }
            None => alert.dismiss(),
        }
    });

    dialog.present(parent);
}
