//! Whitelisted command execution for host probing
//!
//! Only the version tools the probe needs may run, with a cleared
//! environment and the compile-time `COMMAND_TIMEOUT_MS` limit.

use rsml_toolchain::config::compile_time::host::COMMAND_TIMEOUT_MS;
use rsml_toolchain::logging::{codes, Code};
use std::collections::HashSet;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Programs the default runner may start
pub const PROBE_COMMANDS: [&str; 2] = ["uname", "sw_vers"];

const RESTRICTED_PATH: &str = "/usr/bin:/bin:/usr/sbin:/sbin";

#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Duration,
    allowed: HashSet<String>,
}

impl Default for CommandRunner {
    /// Runner allowing [`PROBE_COMMANDS`] with the configured timeout
    fn default() -> Self {
        let mut runner = Self::with_timeout(Duration::from_millis(COMMAND_TIMEOUT_MS));
        runner.allow_commands(&PROBE_COMMANDS);
        runner
    }
}

impl CommandRunner {
    /// Runner with an empty whitelist
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            allowed: HashSet::new(),
        }
    }

    pub fn allow_command(&mut self, program: impl Into<String>) {
        self.allowed.insert(program.into());
    }

    pub fn allow_commands(&mut self, programs: &[&str]) {
        for program in programs {
            self.allowed.insert(program.to_string());
        }
    }

    pub fn is_allowed(&self, program: &str) -> bool {
        self.allowed.contains(program)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `program` and capture its output
    pub fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        if !self.is_allowed(program) {
            return Err(CommandError::NotAllowed {
                program: program.to_string(),
            });
        }

        let start = Instant::now();
        let mut child = Command::new(program)
            .args(args)
            .env_clear()
            .env("PATH", RESTRICTED_PATH)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CommandError::ProgramNotFound {
                    program: program.to_string(),
                },
                std::io::ErrorKind::PermissionDenied => CommandError::PermissionDenied {
                    program: program.to_string(),
                },
                _ => CommandError::ExecutionFailed {
                    program: program.to_string(),
                    reason: e.to_string(),
                },
            })?;

        let failed = |e: std::io::Error| CommandError::ExecutionFailed {
            program: program.to_string(),
            reason: e.to_string(),
        };

        match wait_timeout::ChildExt::wait_timeout(&mut child, self.timeout).map_err(failed)? {
            Some(status) => {
                let output = child.wait_with_output().map_err(failed)?;
                Ok(CommandOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    exit_code: status.code().unwrap_or(-1),
                    duration: start.elapsed(),
                })
            }
            None => {
                let _ = child.kill();
                let _ = child.wait();
                Err(CommandError::Timeout {
                    program: program.to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
        }
    }

    /// Run `program` and return its trimmed stdout, failing on a non-zero exit
    pub fn run_for_stdout(&self, program: &str, args: &[&str]) -> Result<String, CommandError> {
        let output = self.run(program, args)?;
        if output.exit_code != 0 {
            return Err(CommandError::NonZeroExit {
                program: program.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout.trim().to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Program not found: {program}")]
    ProgramNotFound { program: String },

    #[error("Execution failed for '{program}': {reason}")]
    ExecutionFailed { program: String, reason: String },

    #[error("'{program}' exited with {exit_code}: {stderr}")]
    NonZeroExit {
        program: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("'{program}' timed out after {timeout_ms}ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("Permission denied: {program}")]
    PermissionDenied { program: String },

    #[error("Command '{program}' is not in the probe whitelist")]
    NotAllowed { program: String },
}

impl CommandError {
    pub fn error_code(&self) -> Code {
        match self {
            CommandError::Timeout { .. } => codes::host::COMMAND_TIMEOUT,
            CommandError::NotAllowed { .. } => codes::host::COMMAND_NOT_ALLOWED,
            _ => codes::host::COMMAND_FAILED,
        }
    }
}
