//! Runs a resolved action list one step at a time.
//!
//! Each step gets a [`Completion`] that marks the chain ready to advance.
//! When a completion fires while the chain is already being driven, on any
//! thread, it only sets that mark and the driving loop starts the next step.
//! Actions that complete inline therefore never nest stack frames.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    action::{ActionContext, ActionHandler, Completion},
    config::settings::DismissBehavior,
    dispatchable::SharedError,
    surface::PresentationSurface,
};

#[derive(Debug, Default)]
struct Cursor {
    /// Index of the next step to start.
    next: usize,
    /// The previous step has completed.
    ready: bool,
    /// A loop is currently driving the chain.
    driving: bool,
}

/// An ordered list of actions and the callback run after the last one.
pub(crate) struct Chain {
    steps: Vec<ActionHandler>,
    error: SharedError,
    surface: Arc<dyn PresentationSurface>,
    dismiss_behavior: DismissBehavior,
    warn_on_drop: bool,
    terminal: Mutex<Option<Completion>>,
    cursor: Mutex<Cursor>,
}

impl Chain {
    pub(crate) fn new(
        steps: Vec<ActionHandler>,
        error: SharedError,
        surface: Arc<dyn PresentationSurface>,
        dismiss_behavior: DismissBehavior,
        warn_on_drop: bool,
        terminal: Completion,
    ) -> Self {
        Self {
            steps,
            error,
            surface,
            dismiss_behavior,
            warn_on_drop,
            terminal: Mutex::new(Some(terminal)),
            cursor: Mutex::new(Cursor::default()),
        }
    }

    /// Starts the first step.
    pub(crate) fn start(self) {
        Arc::new(self).advance();
    }

    fn advance(self: &Arc<Self>) {
        {
            let mut cursor = self.cursor.lock();
            cursor.ready = true;
            if cursor.driving {
                return;
            }
            cursor.driving = true;
        }
        self.drive();
    }

    fn drive(self: &Arc<Self>) {
        loop {
            let index = {
                let mut cursor = self.cursor.lock();
                if !cursor.ready {
                    cursor.driving = false;
                    return;
                }
                cursor.ready = false;
                cursor.next += 1;
                cursor.next - 1
            };

            match self.steps.get(index) {
                Some(action) => {
                    let chain = Arc::clone(self);
                    let completion =
                        Completion::new(move || chain.advance()).warn_on_drop(self.warn_on_drop);
                    let ctx = ActionContext {
                        surface: &*self.surface,
                        dismiss_behavior: self.dismiss_behavior,
                    };
                    action.perform(&ctx, self.error.clone(), completion);
                }
                None => {
                    let terminal = self.terminal.lock().take();
                    if let Some(terminal) = terminal {
                        terminal.complete();
                    }
                }
            }
        }
    }
}
