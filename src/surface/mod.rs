//! Presentation surfaces.
//!
//! A surface is the external presenter of alerts. The dispatcher hands it
//! a [`PresentedAlert`] and moves on; the surface resolves the alert later,
//! from whatever thread or event loop it runs on.

use async_channel::{Receiver, Sender, unbounded};
use tracing::{info, warn};

use crate::alert::presented::PresentedAlert;

#[cfg(feature = "adwaita")]
pub mod adwaita;

/// Capability to present alerts to the user.
pub trait PresentationSurface: Send + Sync {
    /// Presents `alert`.
    ///
    /// The surface takes ownership of the alert and must eventually press
    /// one of its buttons, dismiss it or drop it.
    fn present(&self, alert: PresentedAlert);
}

impl<F> PresentationSurface for F
where
    F: Fn(PresentedAlert) + Send + Sync,
{
    fn present(&self, alert: PresentedAlert) {
        self(alert);
    }
}

/// Surface forwarding alerts over a channel to a UI loop.
#[derive(Debug, Clone)]
pub struct ChannelSurface {
    sender: Sender<PresentedAlert>,
}

impl ChannelSurface {
    /// Creates a surface and the receiver its alerts are delivered to.
    ///
    /// # Returns
    ///
    /// A tuple of the surface and the receiving end of its channel.
    pub fn new() -> (Self, Receiver<PresentedAlert>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }
}

impl PresentationSurface for ChannelSurface {
    fn present(&self, alert: PresentedAlert) {
        // A closed channel drops the alert, which dismisses it.
        if let Err(e) = self.sender.try_send(alert) {
            warn!("ChannelSurface: Failed to forward alert: {e}");
        }
    }
}

/// Headless surface that logs every alert and dismisses it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSurface;

impl LogSurface {
    /// Creates a new logging surface.
    pub fn new() -> Self {
        Self
    }
}

impl PresentationSurface for LogSurface {
    fn present(&self, alert: PresentedAlert) {
        let buttons: Vec<&str> = alert.buttons().iter().map(|button| button.title()).collect();
        info!(
            title = alert.title(),
            message = alert.message(),
            buttons = ?buttons,
            identity = %alert.error().identity(),
            "Alert"
        );
        alert.dismiss();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering::SeqCst},
    };

    use thiserror::Error;

    use crate::{
        action::Completion,
        alert::{descriptor::AlertDescriptor, presented::PresentedAlert},
        config::settings::DismissBehavior,
        dispatchable,
        surface::{ChannelSurface, LogSurface, PresentationSurface},
    };

    #[derive(Error, Debug)]
    enum SurfaceError {
        #[error("surface error")]
        Failed,
    }

    dispatchable! {
        SurfaceError {
            Failed,
        }
    }

    fn alert(counter: &Arc<AtomicUsize>) -> PresentedAlert {
        let counter = counter.clone();
        let descriptor = AlertDescriptor::confirmable("Failed", None, "OK", None);
        PresentedAlert::new(
            &descriptor,
            SurfaceError::Failed.into(),
            Completion::new(move || {
                counter.fetch_add(1, SeqCst);
            }),
            DismissBehavior::Continue,
        )
    }

    #[tokio::test]
    async fn test_channel_surface_forwards_alerts() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (surface, receiver) = ChannelSurface::new();

        surface.present(alert(&counter));
        let received = receiver.recv().await.unwrap();
        assert_eq!(received.title(), "Failed");
        assert_eq!(counter.load(SeqCst), 0);

        received.press(0).unwrap();
        assert_eq!(counter.load(SeqCst), 1);
    }

    #[test]
    fn test_channel_surface_closed_dismisses() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (surface, receiver) = ChannelSurface::new();
        drop(receiver);

        surface.present(alert(&counter));
        assert_eq!(counter.load(SeqCst), 1);
    }

    #[test]
    fn test_log_surface_dismisses() {
        let counter = Arc::new(AtomicUsize::new(0));
        LogSurface::new().present(alert(&counter));
        assert_eq!(counter.load(SeqCst), 1);
    }

    #[test]
    fn test_closure_surface() {
        let counter = Arc::new(AtomicUsize::new(0));
        let surface = |alert: PresentedAlert| alert.press(0).unwrap();
        surface.present(alert(&counter));
        assert_eq!(counter.load(SeqCst), 1);
    }
}
