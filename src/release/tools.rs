//! External tool invocation.
//!
//! Packaging shells out to `upx`, `patchelf` and `tar`. The [`ToolRunner`]
//! trait is the seam: [`SystemTools`] runs real processes, tests use a
//! recording mock.

use std::path::Path;
use std::process::Command;

/// Runs an external program and reports its exit code.
pub trait ToolRunner {
    /// Run `program` with `args` in `cwd`, waiting for it to finish.
    ///
    /// Returns the exit code; a process killed by a signal reports `-1`.
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> std::io::Result<i32>;
}

/// Runs tools found on `PATH`, inheriting stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTools;

impl ToolRunner for SystemTools {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> std::io::Result<i32> {
        let status = Command::new(program).args(args).current_dir(cwd).status()?;
        Ok(status.code().unwrap_or(-1))
    }
}
