// src/cmd/driver.rs

//! Drives a single command invocation.
//!
//! Outcomes:
//! - init failed → error + usage on ctx stderr, [`ExitStatus::InitFailed`]
//! - run failed  → debug log + error on ctx stderr, [`ExitStatus::RunFailed`]
//! - otherwise   → [`ExitStatus::Success`], nothing written
//!
//! The driver never exits the process; the caller turns the status into the
//! real exit code.

use std::io::Write;

use tracing::debug;

use super::{Command, FlagSet, Info};
use crate::context::{Context, OutputStream};
use crate::errors::Result;

/// Process-style result of driving a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitStatus {
    Success = 0,
    RunFailed = 1,
    InitFailed = 2,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitStatus::Success
    }
}

impl From<ExitStatus> for i32 {
    fn from(status: ExitStatus) -> Self {
        status.code()
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status as u8)
    }
}

/// Initialise `command` from `args` and run it against `ctx`.
///
/// `args` holds flags and arguments only, not the command name. The context's
/// logger is the default `tracing` dispatcher on this thread for the whole
/// invocation.
pub fn main<C: Command + ?Sized>(command: &mut C, ctx: &Context, args: &[String]) -> ExitStatus {
    let dispatch = ctx.logger().dispatch();
    tracing::dispatcher::with_default(&dispatch, || drive(command, ctx, args))
}

fn drive<C: Command + ?Sized>(command: &mut C, ctx: &Context, args: &[String]) -> ExitStatus {
    let info = command.info();
    let stderr = ctx.stderr();

    let mut flags = FlagSet::new(info.name.clone());
    if let Err(err) = command.init(&mut flags, args) {
        report(&stderr, &err);
        if let Err(e) = print_usage(&info, &mut flags, &stderr) {
            debug!(error = %e, "failed to print usage");
        }
        return ExitStatus::InitFailed;
    }

    if let Err(err) = command.run(ctx) {
        debug!("{} command failed: {:#}", info.name, err);
        report(&stderr, &err);
        return ExitStatus::RunFailed;
    }

    ExitStatus::Success
}

fn report(stderr: &OutputStream, err: &anyhow::Error) {
    let mut out = stderr.clone();
    if let Err(e) = writeln!(out, "{err:#}") {
        debug!(error = %e, "failed to report command error");
    }
}

/// Print usage information for a command to `out`.
///
/// `flags` is the handle the command registered its options on; its output
/// target is pointed at `out` only while the option defaults are printed.
pub fn print_usage(info: &Info, flags: &mut FlagSet, out: &OutputStream) -> Result<()> {
    let mut w = out.clone();

    writeln!(w, "usage: {}", info.usage())?;
    if !info.purpose.is_empty() {
        writeln!(w, "purpose: {}", info.purpose)?;
    }

    if flags.has_options() {
        write!(w, "\noptions:\n")?;
        flags.with_output(Box::new(out.clone()), FlagSet::print_defaults)?;
    }

    let doc = info.doc.trim();
    if !doc.is_empty() {
        write!(w, "\n{doc}\n")?;
    }
    w.flush()?;
    Ok(())
}
