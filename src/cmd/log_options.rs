// src/cmd/log_options.rs

//! Standard logging flags a command can register on its [`FlagSet`].
//!
//! ```ignore
//! fn init(&mut self, flags: &mut FlagSet, args: &[String]) -> anyhow::Result<()> {
//!     flags.register::<LogOptions>();
//!     self.log = flags.parse_into(args)?;
//!     Ok(())
//! }
//!
//! fn run(&mut self, ctx: &Context) -> anyhow::Result<()> {
//!     self.log.apply(ctx)?;
//!     // ...
//! }
//! ```
//!
//! [`FlagSet`]: super::FlagSet

use std::path::PathBuf;

use clap::Args;

use crate::context::Context;
use crate::errors::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct LogOptions {
    /// if set, log additional messages
    #[arg(short, long)]
    pub verbose: bool,

    /// if set, log debugging messages
    #[arg(long)]
    pub debug: bool,

    /// path to write log to
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl LogOptions {
    /// Configure `ctx`'s logger from these options.
    pub fn apply(&self, ctx: &Context) -> Result<()> {
        ctx.init_log(self.verbose, self.debug, self.log_file.as_deref())
    }
}
