// src/lib.rs

//! Run command-line operations through an execution context instead of the
//! real process environment.
//!
//! - [`Context`]: working directory, stdout/stderr and a logger
//! - [`Command`]: init-from-arguments, then run
//! - [`main`]: drives one invocation and returns an [`ExitStatus`]
//! - [`hosted`]: run a command for a supervising process and capture its
//!   output and exit code

pub mod cmd;
pub mod context;
pub mod errors;
pub mod hosted;
pub mod logging;

pub use cmd::{Command, ExitStatus, FlagSet, Info, LogOptions, main, print_usage};
pub use context::{Context, MemoryBuffer, OutputStream};
pub use errors::{CmdError, Result};
pub use hosted::{HostedRequest, HostedResponse, run_hosted, run_hosted_blocking};
pub use logging::Logger;
