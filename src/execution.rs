use anyhow::{Context, Result};
use std::process::Command;

use crate::shell::{self, ShellInfo};

/// Outcome of running a generated command: whether the shell exited
/// cleanly plus everything it printed on stdout and stderr.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub output: String,
}

/// Run a generated command under the detected shell and capture combined
/// output. PowerShell takes the command body via `-Command`, every other
/// shell via `-c`. Synchronous wait, no timeout.
///
/// Returns `Err` only if the interpreter could not be launched at all; a
/// command that runs and exits non-zero is reported through the outcome.
pub fn execute(command_text: &str) -> Result<ExecutionOutcome> {
    execute_with_shell(command_text, &shell::detect())
}

/// Core of [`execute`] with the shell passed in, so tests can pin a
/// specific interpreter.
pub fn execute_with_shell(command_text: &str, shell_info: &ShellInfo) -> Result<ExecutionOutcome> {
    let mut command = Command::new(shell_info.executable);
    if shell_info.is_powershell() {
        command.arg("-Command").arg(command_text);
    } else {
        command.arg("-c").arg(command_text);
    }

    let output = command
        .output()
        .with_context(|| format!("Failed to launch {}", shell_info.executable))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(ExecutionOutcome {
        success: output.status.success(),
        exit_code: output.status.code(),
        output: combined,
    })
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    fn sh() -> ShellInfo {
        shell::detect_from("linux", None)
    }

    #[test]
    fn test_successful_command_captures_stdout() {
        let outcome = execute_with_shell("echo hello", &sh()).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.output, "hello\n");
    }

    #[test]
    fn test_silent_success_has_empty_output() {
        let outcome = execute_with_shell("true", &sh()).unwrap();

        assert!(outcome.success);
        assert!(outcome.output.is_empty());
    }

    #[test]
    fn test_failing_command_is_reported_not_raised() {
        // A non-zero exit comes back as an outcome, never as Err.
        let outcome = execute_with_shell("exit 1", &sh()).unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(1));
    }

    #[test]
    fn test_stderr_is_captured_alongside_stdout() {
        let outcome = execute_with_shell("echo out; echo err >&2", &sh()).unwrap();

        assert!(outcome.output.contains("out"));
        assert!(outcome.output.contains("err"));
    }

    #[test]
    fn test_missing_interpreter_is_a_launch_error() {
        let bogus = ShellInfo {
            executable: "genshell-no-such-interpreter",
            friendly_name: "Bogus",
        };

        let result = execute_with_shell("true", &bogus);
        assert!(result.is_err());
    }

    #[test]
    fn test_multiline_command_body() {
        let outcome = execute_with_shell("echo one\necho two", &sh()).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.output, "one\ntwo\n");
    }
}
