//! Running shell text on the agent's host.

use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::ExecutionError;

/// Captured outcome of one shell invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// Exit status, `-1` if the process ended without one (e.g. killed by a signal).
    pub exit_code: i32,
}

impl ExecutionResult {
    /// Reduce the result to the single response string sent back to the controller.
    pub fn into_response(self) -> String {
        let has_out = !self.stdout.is_empty();
        let has_err = !self.stderr.is_empty();

        match (has_out, has_err) {
            (false, true) if self.exit_code != 0 => {
                format!("error (exit code {}):\n{}", self.exit_code, self.stderr)
            }
            (false, true) => format!("stderr:\n{}", self.stderr),
            (true, true) => format!("stdout:\n{}\nstderr:\n{}", self.stdout, self.stderr),
            (true, false) => self.stdout,
            (false, false) => "[no output]".to_string(),
        }
    }
}

/// Response text reported when the executor itself failed.
pub fn error_response(err: &ExecutionError) -> String {
    format!("failed to execute command: {err}")
}

/// Runs shell text and captures its output.
pub trait CommandExecutor {
    fn run(&mut self, shell_text: &str) -> Result<ExecutionResult, ExecutionError>;
}

/// Executes commands through the system shell, e.g. `/bin/sh -c <text>`.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: String,
    flag: String,
}

impl ShellExecutor {
    pub fn new(shell: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            flag: flag.into(),
        }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        #[cfg(target_os = "windows")]
        let executor = Self::new("cmd", "/C");
        #[cfg(not(target_os = "windows"))]
        let executor = Self::new("/bin/sh", "-c");
        executor
    }
}

impl CommandExecutor for ShellExecutor {
    fn run(&mut self, shell_text: &str) -> Result<ExecutionResult, ExecutionError> {
        info!(command = shell_text, "executing command");

        let child = Command::new(&self.shell)
            .arg(&self.flag)
            .arg(shell_text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                shell: self.shell.clone(),
                source,
            })?;

        let output = child.wait_with_output().map_err(ExecutionError::Wait)?;
        let result = ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        };

        debug!(
            exit_code = result.exit_code,
            stdout_len = result.stdout.len(),
            stderr_len = result.stderr.len(),
            "command finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(stdout: &str, stderr: &str, exit_code: i32) -> ExecutionResult {
        ExecutionResult {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
        }
    }

    #[test]
    fn test_failed_command_with_only_stderr_reports_exit_code() {
        let response = result("", "no such file", 1).into_response();
        assert_eq!(response, "error (exit code 1):\nno such file");
    }

    #[test]
    fn test_successful_command_with_only_stderr() {
        let response = result("", "warning: deprecated", 0).into_response();
        assert_eq!(response, "stderr:\nwarning: deprecated");
    }

    #[test]
    fn test_both_streams_are_labeled() {
        let response = result("out\n", "err\n", 2).into_response();
        assert_eq!(response, "stdout:\nout\n\nstderr:\nerr\n");
    }

    #[test]
    fn test_stdout_only_is_passed_through() {
        assert_eq!(result("hi\n", "", 0).into_response(), "hi\n");
        assert_eq!(result("partial", "", 3).into_response(), "partial");
    }

    #[test]
    fn test_no_output_marker() {
        assert_eq!(result("", "", 0).into_response(), "[no output]");
        assert_eq!(result("", "", 1).into_response(), "[no output]");
    }

    #[test]
    fn test_spawn_failure_is_execution_error() {
        let mut executor = ShellExecutor::new("/nonexistent/shell-binary", "-c");
        let err = executor.run("true").unwrap_err();
        assert!(matches!(err, ExecutionError::Spawn { .. }));
        assert!(error_response(&err).starts_with("failed to execute command: could not start"));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_captures_stdout_stderr_and_status() {
        let mut executor = ShellExecutor::default();
        let result = executor.run("echo hi; echo oops >&2; exit 3").unwrap();
        assert_eq!(result.stdout, "hi\n");
        assert_eq!(result.stderr, "oops\n");
        assert_eq!(result.exit_code, 3);
    }
}
