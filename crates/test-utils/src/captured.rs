use std::path::PathBuf;

use cmdhost::{Context, MemoryBuffer, OutputStream};

/// A context whose stdout and stderr are in-memory buffers.
pub struct CapturedContext {
    pub ctx: Context,
    pub stdout: MemoryBuffer,
    pub stderr: MemoryBuffer,
}

impl CapturedContext {
    /// Captured context rooted at the system temp directory.
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    /// Captured context rooted at `dir`, which must be absolute.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let (stdout_stream, stdout) = OutputStream::buffer();
        let (stderr_stream, stderr) = OutputStream::buffer();
        let ctx = Context::new(dir, stdout_stream, stderr_stream)
            .expect("captured context needs an absolute directory");
        Self { ctx, stdout, stderr }
    }

    pub fn stdout(&self) -> String {
        self.stdout.contents()
    }

    pub fn stderr(&self) -> String {
        self.stderr.contents()
    }
}

impl Default for CapturedContext {
    fn default() -> Self {
        Self::new()
    }
}
