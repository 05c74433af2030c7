use std::{
    path::Path,
    process::{Command, ExitStatus, Stdio},
};

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Last non-empty line of stderr, falling back to the exit status.
    #[must_use]
    pub fn failure_reason(&self) -> String {
        self.stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map_or_else(|| format!("exited with status {}", self.code), ToString::to_string)
    }
}

/// Execute a program and capture stdout/stderr.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned or waited on.
pub fn run_command(program: &Path, args: &[String], cwd: &Path) -> Result<RunOutput> {
    let output = configured_command(program, args, cwd)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("failed to start {}", program.display()))?;
    Ok(RunOutput {
        code: exit_code(output.status),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Execute a program with inherited stdio and return its exit code.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned.
pub fn run_command_passthrough(program: &Path, args: &[String], cwd: &Path) -> Result<i32> {
    let status = configured_command(program, args, cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to start {}", program.display()))?;
    Ok(exit_code(status))
}

fn configured_command(program: &Path, args: &[String], cwd: &Path) -> Command {
    let mut command = Command::new(program);
    command.args(args);
    command.current_dir(cwd);
    command
}

/// Shell-style exit code: the process status, or `128 + signal` when a
/// signal terminated it.
pub(crate) fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}
