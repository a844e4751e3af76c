// src/logging.rs

//! Diagnostic logging destination for command invocations, built on
//! `tracing` + `tracing-subscriber`.
//!
//! A [`Logger`] is an explicit value rather than process-wide state: it holds
//! a debug switch and a nullable destination, and produces a dispatcher that
//! the driver installs for the duration of one invocation.
//!
//! - INFO and above are written whenever a destination is set.
//! - DEBUG and TRACE are written only while the debug switch is on.
//! - With no destination, every line is discarded.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{Dispatch, Level};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

use crate::context::OutputStream;

#[derive(Debug, Default)]
struct LoggerState {
    debug: AtomicBool,
    target: Mutex<Option<OutputStream>>,
}

/// Shared logging configuration. Clones refer to the same configuration.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    state: Arc<LoggerState>,
}

impl Logger {
    /// A logger with debug off and no destination.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_debug(&self, on: bool) {
        self.state.debug.store(on, Ordering::Relaxed);
    }

    pub fn debug_enabled(&self) -> bool {
        self.state.debug.load(Ordering::Relaxed)
    }

    /// Replace the destination, returning the previous one.
    ///
    /// Passing `None` disables logging. A replaced file destination is closed
    /// once the last handle to it is dropped.
    pub fn set_target(&self, target: Option<OutputStream>) -> Option<OutputStream> {
        let mut guard = self
            .state
            .target
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, target)
    }

    /// The current destination, if any.
    pub fn target(&self) -> Option<OutputStream> {
        self.state
            .target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true if a destination is set.
    pub fn is_enabled(&self) -> bool {
        self.target().is_some()
    }

    /// Build a dispatcher that formats timestamped lines into this logger.
    ///
    /// The debug switch is read per event, so toggling it while the
    /// dispatcher is installed takes effect immediately.
    pub fn dispatch(&self) -> Dispatch {
        let state = Arc::clone(&self.state);
        let layer = fmt::layer()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_target(false)
            .with_filter(filter_fn(move |meta| {
                *meta.level() <= Level::INFO || state.debug.load(Ordering::Relaxed)
            }));
        Dispatch::new(Registry::default().with(layer))
    }
}

/// Writer handed to the `fmt` layer for each event.
pub struct LogWriter {
    state: Arc<LoggerState>,
}

impl LogWriter {
    fn target(&self) -> Option<OutputStream> {
        self.state
            .target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.target() {
            Some(mut target) => target.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self.target() {
            Some(mut target) => target.write_all(buf),
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.target() {
            Some(mut target) => target.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for Logger {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            state: Arc::clone(&self.state),
        }
    }
}
