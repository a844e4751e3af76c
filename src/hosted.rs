// src/hosted.rs

//! Hosted execution: run a command on behalf of another process.
//!
//! The supervising process owns the real environment. It sends a
//! [`HostedRequest`] (directory + arguments), the command runs against a
//! context whose streams are in-memory buffers, and the captured output and
//! exit code come back as a [`HostedResponse`]. Both types are `serde`
//! serialisable so they can travel over whatever transport the host uses.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cmd::{self, Command};
use crate::context::{Context, OutputStream};
use crate::errors::{CmdError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedRequest {
    /// Absolute directory the command should act in.
    pub dir: PathBuf,
    /// Flags and arguments, without the command name.
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedResponse {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl HostedRequest {
    pub fn new(dir: impl Into<PathBuf>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            dir: dir.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Run `command` for `request` on the current thread.
///
/// Fails only if the request's directory is not absolute; command failures
/// are reported through the response's exit code and stderr.
pub fn run_hosted_blocking<C: Command + ?Sized>(
    command: &mut C,
    request: &HostedRequest,
) -> Result<HostedResponse> {
    let (stdout, stdout_buf) = OutputStream::buffer();
    let (stderr, stderr_buf) = OutputStream::buffer();
    let ctx = Context::new(request.dir.clone(), stdout, stderr)?;

    let name = command.info().name;
    debug!(command = %name, dir = %request.dir.display(), "running hosted command");
    let status = cmd::main(command, &ctx, &request.args);
    debug!(command = %name, code = status.code(), "hosted command finished");

    Ok(HostedResponse {
        code: status.code(),
        stdout: stdout_buf.contents(),
        stderr: stderr_buf.contents(),
    })
}

/// Run `command` for `request` on tokio's blocking pool.
///
/// Dropping the returned future does not interrupt the command; its result is
/// simply discarded.
pub async fn run_hosted<C>(mut command: C, request: HostedRequest) -> Result<HostedResponse>
where
    C: Command + Send + 'static,
{
    tokio::task::spawn_blocking(move || run_hosted_blocking(&mut command, &request))
        .await
        .map_err(|e| CmdError::Hosted(e.to_string()))?
}
