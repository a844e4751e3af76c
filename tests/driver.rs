// tests/driver.rs

mod common;
use crate::common::{CapturedContext, Call, FakeCommand, args, init_tracing};

use std::io::{self, Write};
use std::process::ExitCode;
use std::thread;

use clap::{Arg, ArgAction};
use cmdhost::{Command, Context, ExitStatus, OutputStream, main};

#[test]
fn init_failure_prints_error_and_usage() {
    init_tracing();
    let cap = CapturedContext::new();
    let mut cmd = FakeCommand::new("frob").fail_init("bad flag");
    let calls = cmd.calls();

    let status = main(&mut cmd, &cap.ctx, &[]);

    assert_eq!(status, ExitStatus::InitFailed);
    assert_eq!(status.code(), 2);
    let stderr = cap.stderr();
    assert!(stderr.contains("bad flag"));
    assert!(stderr.lines().any(|line| line.starts_with("usage: ")));
    assert!(cap.stdout().is_empty());

    // run is never reached
    assert_eq!(*calls.lock().unwrap(), vec![Call::Init(vec![])]);
}

#[test]
fn run_failure_prints_error_without_usage() {
    init_tracing();
    let cap = CapturedContext::new();
    let mut cmd = FakeCommand::new("frob").fail_run("disk full");
    let calls = cmd.calls();

    let status = main(&mut cmd, &cap.ctx, &args(&[]));

    assert_eq!(status, ExitStatus::RunFailed);
    assert_eq!(status.code(), 1);
    assert_eq!(cap.stderr(), "disk full\n");
    assert!(!cap.stderr().contains("usage:"));
    assert_eq!(*calls.lock().unwrap(), vec![Call::Init(vec![]), Call::Run]);
}

#[test]
fn success_writes_nothing() {
    init_tracing();
    let cap = CapturedContext::new();
    let mut cmd = FakeCommand::new("frob").purpose("frobnicate widgets");

    let status = main(&mut cmd, &cap.ctx, &[]);

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(status.code(), 0);
    assert!(status.is_success());
    assert!(cap.stdout().is_empty());
    assert!(cap.stderr().is_empty());
}

#[test]
fn command_output_goes_to_context_stdout() {
    let cap = CapturedContext::new();
    let mut cmd = FakeCommand::new("frob").prints("widgets frobnicated\n");

    let status = main(&mut cmd, &cap.ctx, &[]);

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(cap.stdout(), "widgets frobnicated\n");
    assert!(cap.stderr().is_empty());
}

#[test]
fn usage_includes_purpose_and_trimmed_doc() {
    let cap = CapturedContext::new();
    let mut cmd = FakeCommand::new("frob")
        .purpose("frobnicate widgets")
        .doc("  see also: bar  ")
        .fail_init("bad flag");

    let status = main(&mut cmd, &cap.ctx, &[]);

    assert_eq!(status, ExitStatus::InitFailed);
    assert_eq!(
        cap.stderr(),
        "bad flag\n\
         usage: frob [options]\n\
         purpose: frobnicate widgets\n\
         \n\
         see also: bar\n"
    );
}

#[test]
fn usage_line_includes_args_summary() {
    let cap = CapturedContext::new();
    let mut cmd = FakeCommand::new("frob")
        .args("<widget> ...")
        .fail_init("no widgets");

    main(&mut cmd, &cap.ctx, &[]);

    assert_eq!(cap.stderr(), "no widgets\nusage: frob [options] <widget> ...\n");
}

#[test]
fn unknown_flag_fails_init_and_lists_options() {
    let cap = CapturedContext::new();
    let mut cmd = FakeCommand::new("frob")
        .flag(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("be chatty"),
        )
        .flag(
            Arg::new("out")
                .long("out")
                .value_name("FILE")
                .default_value("-")
                .help("output file"),
        );
    let calls = cmd.calls();

    let status = main(&mut cmd, &cap.ctx, &args(&["--bogus"]));

    assert_eq!(status, ExitStatus::InitFailed);
    let stderr = cap.stderr();
    let first = stderr.lines().next().unwrap();
    assert!(first.contains("--bogus"), "unexpected first line: {first}");
    assert!(!first.starts_with("error:"));
    assert!(stderr.contains(
        "usage: frob [options]\n\
         \n\
         options:\n\
         -v, --verbose (= false)\n    be chatty\n\
         --out <FILE> (= -)\n    output file\n"
    ));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn positional_arguments_are_not_listed_as_options() {
    let cap = CapturedContext::new();
    let mut cmd = FakeCommand::new("frob")
        .args("<widget>")
        .flag(Arg::new("widget"))
        .fail_init("bad widget");

    let status = main(&mut cmd, &cap.ctx, &args(&["sprocket"]));

    assert_eq!(status, ExitStatus::InitFailed);
    assert!(!cap.stderr().contains("options:"));
}

#[test]
fn accepted_flags_reach_run() {
    let cap = CapturedContext::new();
    let mut cmd = FakeCommand::new("frob")
        .flag(Arg::new("count").long("count"))
        .prints("done\n");
    let calls = cmd.calls();

    let status = main(&mut cmd, &cap.ctx, &args(&["--count", "3"]));

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![Call::Init(args(&["--count", "3"])), Call::Run]
    );
}

#[test]
fn run_failure_is_logged_at_debug_level() {
    let cap = CapturedContext::new();
    cap.ctx.init_log(false, true, None).unwrap();
    let mut cmd = FakeCommand::new("frob").fail_run("disk full");

    let status = main(&mut cmd, &cap.ctx, &[]);

    assert_eq!(status, ExitStatus::RunFailed);
    let stderr = cap.stderr();
    let logged = stderr
        .lines()
        .find(|line| line.contains("frob command failed: disk full"))
        .expect("debug line missing");
    assert!(logged.contains("DEBUG"));
    assert!(stderr.lines().any(|line| line == "disk full"));
}

#[test]
fn run_failure_log_needs_debug() {
    let cap = CapturedContext::new();
    cap.ctx.init_log(true, false, None).unwrap();
    let mut cmd = FakeCommand::new("frob").fail_run("disk full");

    main(&mut cmd, &cap.ctx, &[]);

    assert_eq!(cap.stderr(), "disk full\n");
}

#[test]
fn command_logs_follow_context_logger() {
    let quiet = CapturedContext::new();
    let mut cmd = FakeCommand::new("frob").logs("hello from run");
    main(&mut cmd, &quiet.ctx, &[]);
    assert!(quiet.stderr().is_empty());

    let verbose = CapturedContext::new();
    verbose.ctx.init_log(true, false, None).unwrap();
    let mut cmd = FakeCommand::new("frob").logs("hello from run");
    main(&mut cmd, &verbose.ctx, &[]);
    assert!(verbose.stderr().contains("INFO hello from run"));
}

#[test]
fn boxed_commands_can_be_driven() {
    let cap = CapturedContext::new();
    let mut cmd: Box<dyn Command> = Box::new(FakeCommand::new("frob").fail_run("disk full"));

    assert_eq!(main(&mut cmd, &cap.ctx, &[]), ExitStatus::RunFailed);
}

#[test]
fn concurrent_invocations_keep_their_own_logs() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let cap = CapturedContext::new();
                cap.ctx.init_log(true, false, None).unwrap();
                let line = format!("worker {i}");
                let mut cmd = FakeCommand::new("frob").logs(&line);
                let status = main(&mut cmd, &cap.ctx, &[]);
                (i, status, cap.stderr())
            })
        })
        .collect();

    for handle in handles {
        let (i, status, stderr) = handle.join().unwrap();
        assert_eq!(status, ExitStatus::Success);
        assert_eq!(stderr.lines().count(), 1);
        assert!(stderr.contains(&format!("worker {i}")));
    }
}

#[test]
fn exit_status_converts_to_process_codes() {
    assert_eq!(i32::from(ExitStatus::Success), 0);
    assert_eq!(i32::from(ExitStatus::RunFailed), 1);
    assert_eq!(i32::from(ExitStatus::InitFailed), 2);

    let code = ExitCode::from(ExitStatus::InitFailed);
    assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::from(2)));
    let code = ExitCode::from(ExitStatus::Success);
    assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));
}

/// Writer whose every write fails.
struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stderr closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stderr closed"))
    }
}

fn broken_stderr_context() -> Context {
    Context::new(
        std::env::temp_dir(),
        OutputStream::sink(),
        OutputStream::new(BrokenPipe),
    )
    .unwrap()
}

#[test]
fn unwritable_stderr_keeps_exit_status() {
    let ctx = broken_stderr_context();
    let mut cmd = FakeCommand::new("frob")
        .purpose("frobnicate widgets")
        .fail_init("bad flag");
    assert_eq!(main(&mut cmd, &ctx, &[]), ExitStatus::InitFailed);

    let ctx = broken_stderr_context();
    let mut cmd = FakeCommand::new("frob").fail_run("disk full");
    assert_eq!(main(&mut cmd, &ctx, &[]), ExitStatus::RunFailed);
}
