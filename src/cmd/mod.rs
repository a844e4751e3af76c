// src/cmd/mod.rs

//! The command lifecycle: a [`Command`] is initialised from raw arguments and
//! then run against a [`Context`](crate::Context). [`main`] drives one
//! invocation and maps the outcome to an [`ExitStatus`].

use anyhow::Result;

use crate::context::Context;

pub mod driver;
pub mod flags;
pub mod log_options;

pub use driver::{ExitStatus, main, print_usage};
pub use flags::FlagSet;
pub use log_options::LogOptions;

/// Descriptive metadata for a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    pub name: String,
    /// Positional argument summary, e.g. `<path> [<path> ...]`.
    pub args: String,
    /// One-line description.
    pub purpose: String,
    /// Long-form documentation.
    pub doc: String,
}

impl Info {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = args.into();
        self
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// `<name> [options] <args>`, or `<name> [options]` without args.
    pub fn usage(&self) -> String {
        let args = self.args.trim();
        if args.is_empty() {
            format!("{} [options]", self.name)
        } else {
            format!("{} [options] {}", self.name, args)
        }
    }
}

/// A command that can be driven by [`main`].
///
/// A fresh value is expected per invocation: `init` stores whatever it parsed
/// in `self`, and `run` acts on it.
pub trait Command {
    fn info(&self) -> Info;

    /// Register flags on `flags`, parse `args` and validate the result.
    fn init(&mut self, flags: &mut FlagSet, args: &[String]) -> Result<()>;

    /// Perform the command, acting only through `ctx`.
    fn run(&mut self, ctx: &Context) -> Result<()>;
}

impl<C: Command + ?Sized> Command for Box<C> {
    fn info(&self) -> Info {
        (**self).info()
    }

    fn init(&mut self, flags: &mut FlagSet, args: &[String]) -> Result<()> {
        (**self).init(flags, args)
    }

    fn run(&mut self, ctx: &Context) -> Result<()> {
        (**self).run(ctx)
    }
}
