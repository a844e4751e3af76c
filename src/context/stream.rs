// src/context/stream.rs

//! Output stream handles used by [`Context`](super::Context).
//!
//! A context, its logger and the driver all write to the same underlying
//! stream, so streams are cheap clonable handles over a shared writer.

use std::fmt::{self, Debug};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// Clonable, thread-safe handle to a writer.
#[derive(Clone)]
pub struct OutputStream {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
    label: &'static str,
}

impl OutputStream {
    /// Wrap an arbitrary writer.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self::labelled(writer, "writer")
    }

    fn labelled<W: Write + Send + 'static>(writer: W, label: &'static str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
            label,
        }
    }

    /// The real process's standard output.
    pub fn stdout() -> Self {
        Self::labelled(io::stdout(), "stdout")
    }

    /// The real process's standard error.
    pub fn stderr() -> Self {
        Self::labelled(io::stderr(), "stderr")
    }

    /// A stream that discards everything written to it.
    pub fn sink() -> Self {
        Self::labelled(io::sink(), "sink")
    }

    /// A stream backed by an in-memory buffer. The returned buffer sees every
    /// byte written through the stream (and through any of its clones).
    pub fn buffer() -> (Self, MemoryBuffer) {
        let buf = MemoryBuffer::default();
        (Self::labelled(buf.clone(), "memory"), buf)
    }

    /// Returns true if both handles point at the same underlying writer.
    pub fn same_stream(&self, other: &OutputStream) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Box<dyn Write + Send>>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other(format!("{} stream lock poisoned", self.label)))
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.lock()?.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.flush()
    }
}

impl Debug for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputStream")
            .field("label", &self.label)
            .finish()
    }
}

/// Shared in-memory byte buffer, used to capture hosted command output.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoryBuffer {
    /// Everything written so far.
    pub fn bytes(&self) -> Vec<u8> {
        match self.bytes.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Everything written so far, decoded as (lossy) UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

impl Write for MemoryBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .bytes
            .lock()
            .map_err(|_| io::Error::other("memory buffer lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
