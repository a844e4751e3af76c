// src/context/mod.rs

//! Execution context: the directory and streams a command acts through.
//!
//! Commands never touch the real process environment directly. They resolve
//! paths with [`Context::abs_path`] and write to [`Context::stdout`] /
//! [`Context::stderr`], which lets a supervising process run them "hosted"
//! against a synthetic directory and in-memory streams.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{CmdError, Result};
use crate::logging::Logger;

pub mod stream;

pub use stream::{MemoryBuffer, OutputStream};

/// Where, and to what streams, a command should act.
#[derive(Debug, Clone)]
pub struct Context {
    dir: PathBuf,
    stdout: OutputStream,
    stderr: OutputStream,
    logger: Logger,
}

impl Context {
    /// Create a context for the given absolute directory and streams.
    pub fn new(
        dir: impl Into<PathBuf>,
        stdout: OutputStream,
        stderr: OutputStream,
    ) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_absolute() {
            return Err(CmdError::RelativeDir(dir));
        }
        Ok(Self {
            dir,
            stdout,
            stderr,
            logger: Logger::new(),
        })
    }

    /// Context for non-hosted use: the real working directory and the real
    /// stdout/stderr.
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(CmdError::CurrentDir)?;
        let dir = std::path::absolute(&cwd).map_err(CmdError::CurrentDir)?;
        Self::new(dir, OutputStream::stdout(), OutputStream::stderr())
    }

    /// Use `logger` instead of this context's own one.
    ///
    /// Contexts sharing a logger also share its destination, last writer wins.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stream for normal command output.
    pub fn stdout(&self) -> OutputStream {
        self.stdout.clone()
    }

    /// Stream for diagnostics and errors.
    pub fn stderr(&self) -> OutputStream {
        self.stderr.clone()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Absolute form of `path`, interpreting relative paths against the
    /// context directory.
    pub fn abs_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.dir.join(path)
    }

    /// Point diagnostic logging at a file, at the context's stderr, or
    /// nowhere.
    ///
    /// The debug switch is always updated. If `log_file` is given it is opened
    /// for append (and created if missing); on failure the error is returned
    /// and the previous destination is kept.
    pub fn init_log(&self, verbose: bool, debug: bool, log_file: Option<&Path>) -> Result<()> {
        self.logger.set_debug(debug);

        let target = match log_file {
            Some(file) => {
                let path = self.abs_path(file);
                let file = open_append(&path).map_err(|source| CmdError::LogFile {
                    path: path.clone(),
                    source,
                })?;
                debug!(path = %path.display(), "logging to file");
                Some(OutputStream::new(file))
            }
            None if verbose || debug => Some(self.stderr()),
            None => None,
        };

        self.logger.set_target(target);
        Ok(())
    }
}

impl Default for Context {
    /// Same as [`Context::from_env`].
    ///
    /// # Panics
    ///
    /// If the current working directory cannot be determined; there is no
    /// context to report the failure through.
    fn default() -> Self {
        match Self::from_env() {
            Ok(ctx) => ctx,
            Err(err) => panic!("cannot create default context: {err}"),
        }
    }
}

fn open_append(path: &Path) -> std::io::Result<std::fs::File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(path)
}
