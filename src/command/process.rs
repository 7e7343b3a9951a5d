use std::path::Path;
use std::process::{Command, Stdio};

use super::CommandRunner;
use crate::error::{Error, Result};
use crate::ui;

/// Runs commands as real child processes.
///
/// A trace line is written before each invocation. Stdout is discarded and
/// stderr is captured; on a non-zero exit the captured stderr, if any, is
/// emitted for diagnostics and carried in the returned error.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
        ui::trace_command(program, args);

        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| Error::CommandLaunch {
                program: program.to_string(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !stderr.trim().is_empty() {
            ui::emit_stderr(&stderr);
        }

        Err(Error::CommandFailed {
            program: program.to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr,
        })
    }
}
