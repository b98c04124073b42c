//! Shared fixtures for unit tests.

use std::{
    collections::VecDeque,
    io::{Result as IoResult, Write},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering::SeqCst},
    },
};

use {
    parking_lot::Mutex,
    thiserror::Error,
    tracing::{Level, subscriber::with_default},
    tracing_subscriber::fmt,
};

use crate::{
    action::ActionHandler, alert::presented::PresentedAlert, dispatchable,
    surface::PresentationSurface,
};

#[derive(Error, Debug, Clone)]
pub(crate) enum HandlerError1 {
    #[error("error1")]
    Error1,
    #[error("error2")]
    Error2,
    #[error("error3 {0}")]
    Error3(u32),
}

dispatchable! {
    HandlerError1: "handler" {
        Error1 => 1,
        Error2 => 2,
        Error3(..) => 3,
    }
}

#[derive(Error, Debug, Clone)]
pub(crate) enum HandlerError2 {
    #[error("error4")]
    Error4,
}

dispatchable! {
    HandlerError2 {
        Error4 => 4,
    }
}

/// Surface that queues alerts until a test resolves them.
#[derive(Clone, Default)]
pub(crate) struct MockedSurface {
    presented: Arc<Mutex<VecDeque<PresentedAlert>>>,
    total: Arc<AtomicUsize>,
}

impl MockedSurface {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Alerts presented so far, resolved or not.
    pub(crate) fn presented_count(&self) -> usize {
        self.total.load(SeqCst)
    }

    /// Alerts still waiting for a response.
    pub(crate) fn pending_count(&self) -> usize {
        self.presented.lock().len()
    }

    /// Removes the oldest pending alert.
    pub(crate) fn take_next(&self) -> Option<PresentedAlert> {
        self.presented.lock().pop_front()
    }
}

impl PresentationSurface for MockedSurface {
    fn present(&self, alert: PresentedAlert) {
        self.total.fetch_add(1, SeqCst);
        self.presented.lock().push_back(alert);
    }
}

/// Records the order in which actions and the final callback ran.
#[derive(Clone, Default)]
pub(crate) struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub(crate) fn count(&self, entry: &str) -> usize {
        self.entries.lock().iter().filter(|e| e.as_str() == entry).count()
    }

    /// Custom action recording `name` and completing immediately.
    pub(crate) fn action(&self, name: &str) -> ActionHandler {
        let journal = self.clone();
        let name = name.to_string();
        ActionHandler::custom(move |_, done| {
            journal.record(name.clone());
            done.complete();
        })
    }

    /// Completion callback recording `"done"`.
    pub(crate) fn on_complete(&self) -> impl FnOnce() + Send + use<> {
        let journal = self.clone();
        move || journal.record("done")
    }
}

/// Log sink shared between a test and its subscriber.
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

/// Runs `f` and returns everything it logged on this thread.
pub(crate) fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = buffer.clone();
    let subscriber = fmt()
        .with_ansi(false)
        .with_max_level(Level::DEBUG)
        .with_writer(move || LogBuffer(writer.clone()))
        .finish();

    with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.lock()).into_owned();
    logs
}
