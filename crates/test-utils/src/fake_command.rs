use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use clap::Arg;
use cmdhost::{Command, Context, FlagSet, Info};

/// Lifecycle call observed by a [`FakeCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Init(Vec<String>),
    Run,
}

/// A scripted command that:
/// - records each `init` / `run` call
/// - registers the given flags and parses the raw arguments with them
/// - optionally writes to stdout and logs while running
/// - fails `init` or `run` with a fixed message when told to
#[derive(Debug, Clone)]
pub struct FakeCommand {
    info: Info,
    flags: Vec<Arg>,
    init_error: Option<String>,
    run_error: Option<String>,
    output: Option<String>,
    log_line: Option<String>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeCommand {
    pub fn new(name: &str) -> Self {
        Self {
            info: Info::new(name),
            flags: Vec::new(),
            init_error: None,
            run_error: None,
            output: None,
            log_line: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn args(mut self, args: &str) -> Self {
        self.info.args = args.to_string();
        self
    }

    pub fn purpose(mut self, purpose: &str) -> Self {
        self.info.purpose = purpose.to_string();
        self
    }

    pub fn doc(mut self, doc: &str) -> Self {
        self.info.doc = doc.to_string();
        self
    }

    pub fn flag(mut self, arg: Arg) -> Self {
        self.flags.push(arg);
        self
    }

    pub fn fail_init(mut self, message: &str) -> Self {
        self.init_error = Some(message.to_string());
        self
    }

    pub fn fail_run(mut self, message: &str) -> Self {
        self.run_error = Some(message.to_string());
        self
    }

    /// Text written to the context's stdout when run.
    pub fn prints(mut self, text: &str) -> Self {
        self.output = Some(text.to_string());
        self
    }

    /// Message logged at INFO level when run.
    pub fn logs(mut self, line: &str) -> Self {
        self.log_line = Some(line.to_string());
        self
    }

    /// Shared handle to the recorded calls.
    pub fn calls(&self) -> Arc<Mutex<Vec<Call>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Command for FakeCommand {
    fn info(&self) -> Info {
        self.info.clone()
    }

    fn init(&mut self, flags: &mut FlagSet, args: &[String]) -> Result<()> {
        self.record(Call::Init(args.to_vec()));
        for arg in &self.flags {
            flags.arg(arg.clone());
        }
        flags.parse(args)?;
        if let Some(message) = &self.init_error {
            bail!("{message}");
        }
        Ok(())
    }

    fn run(&mut self, ctx: &Context) -> Result<()> {
        self.record(Call::Run);
        if let Some(line) = &self.log_line {
            tracing::info!("{line}");
        }
        if let Some(text) = &self.output {
            let mut out = ctx.stdout();
            std::io::Write::write_all(&mut out, text.as_bytes())?;
        }
        if let Some(message) = &self.run_error {
            bail!("{message}");
        }
        Ok(())
    }
}
