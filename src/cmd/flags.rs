// src/cmd/flags.rs

//! Per-invocation argument parser handle, backed by `clap`'s builder API.
//!
//! The handle never prints anything on its own: parse failures come back as
//! [`CmdError::Flag`], and [`FlagSet::print_defaults`] writes to an explicit
//! output target that is a discard sink unless temporarily redirected.

use std::fmt::{self, Debug};
use std::io::{self, Write};

use clap::{Arg, ArgAction, ArgMatches, Args, ColorChoice, FromArgMatches};

use crate::errors::{CmdError, Result};

pub struct FlagSet {
    command: clap::Command,
    matches: Option<ArgMatches>,
    output: Box<dyn Write + Send>,
}

impl FlagSet {
    /// Empty flag set named after a command.
    pub fn new(name: impl Into<String>) -> Self {
        let command = clap::Command::new(name.into())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .disable_help_subcommand(true)
            .color(ColorChoice::Never);

        Self {
            command,
            matches: None,
            output: Box::new(io::sink()),
        }
    }

    pub fn name(&self) -> &str {
        self.command.get_name()
    }

    /// Register a single argument.
    pub fn arg(&mut self, arg: impl Into<Arg>) -> &mut Self {
        let arg = arg.into();
        self.update(|cmd| cmd.arg(arg))
    }

    /// Register every argument of a derived `clap::Args` type.
    pub fn register<A: Args>(&mut self) -> &mut Self {
        self.update(A::augment_args)
    }

    fn update(&mut self, f: impl FnOnce(clap::Command) -> clap::Command) -> &mut Self {
        let command = std::mem::take(&mut self.command);
        self.command = f(command);
        self
    }

    /// Parse raw arguments against the registered arguments.
    pub fn parse(&mut self, args: &[String]) -> Result<&ArgMatches> {
        let matches = self
            .command
            .try_get_matches_from_mut(args.iter())
            .map_err(flag_error)?;
        Ok(&*self.matches.insert(matches))
    }

    /// Parse raw arguments and extract a derived type from the matches.
    pub fn parse_into<A: FromArgMatches>(&mut self, args: &[String]) -> Result<A> {
        let matches = self.parse(args)?;
        A::from_arg_matches(matches).map_err(flag_error)
    }

    /// Matches from the last successful parse.
    pub fn matches(&self) -> Option<&ArgMatches> {
        self.matches.as_ref()
    }

    /// Registered options: every visible non-positional argument.
    pub fn options(&self) -> impl Iterator<Item = &Arg> {
        self.command.get_arguments().filter(|arg| is_option(arg))
    }

    pub fn has_options(&self) -> bool {
        self.options().next().is_some()
    }

    /// Replace the output target, returning the previous one.
    pub fn set_output(&mut self, output: Box<dyn Write + Send>) -> Box<dyn Write + Send> {
        std::mem::replace(&mut self.output, output)
    }

    /// Run `f` with the output target redirected to `output`, then restore
    /// the previous target.
    pub fn with_output<R>(
        &mut self,
        output: Box<dyn Write + Send>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let previous = self.set_output(output);
        let result = f(self);
        self.set_output(previous);
        result
    }

    /// Write every option with its default value to the output target.
    ///
    /// The command is built first so implicit defaults (`SetTrue`, `Count`)
    /// are listed whether or not a parse has happened yet.
    pub fn print_defaults(&mut self) -> io::Result<()> {
        self.command.build();
        let Self {
            command, output, ..
        } = self;

        for arg in command.get_arguments().filter(|arg| is_option(arg)) {
            writeln!(output, "{}", option_line(arg))?;
            if let Some(help) = arg.get_help() {
                writeln!(output, "    {help}")?;
            }
        }
        output.flush()
    }
}

impl Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name())
            .field("parsed", &self.matches.is_some())
            .finish()
    }
}

fn is_option(arg: &Arg) -> bool {
    !arg.is_positional() && !arg.is_hide_set()
}

/// `-v, --verbose (= false)` / `--log-file <PATH>`
fn option_line(arg: &Arg) -> String {
    let mut switches = Vec::new();
    if let Some(short) = arg.get_short() {
        switches.push(format!("-{short}"));
    }
    if let Some(long) = arg.get_long() {
        switches.push(format!("--{long}"));
    }
    let mut line = switches.join(", ");

    let action = arg.get_action();
    if action.takes_values() {
        let value_name = match arg.get_value_names() {
            Some(names) if !names.is_empty() => names
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            _ => arg.get_id().as_str().to_uppercase(),
        };
        line.push_str(&format!(" <{value_name}>"));
    }

    let defaults: Vec<String> = arg
        .get_default_values()
        .iter()
        .map(|value| value.to_string_lossy().into_owned())
        .collect();
    let default = if !defaults.is_empty() {
        Some(defaults.join(", "))
    } else {
        match action {
            ArgAction::SetTrue => Some("false".to_string()),
            ArgAction::SetFalse => Some("true".to_string()),
            _ => None,
        }
    };
    if let Some(default) = default {
        line.push_str(&format!(" (= {default})"));
    }

    line
}

/// Reduce a rendered clap error to its one-line message.
fn flag_error(err: clap::Error) -> CmdError {
    let rendered = err.to_string();
    let line = rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("invalid arguments");
    CmdError::Flag(line.strip_prefix("error: ").unwrap_or(line).to_string())
}
