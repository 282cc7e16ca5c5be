// src/system/executor.rs

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command arguments cannot be empty strings: '{0}'")]
    EmptyArgument(String),
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// How a backend command is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// Streams stdin, stdout and stderr to the terminal; blocks until the child exits.
    Attached,
    /// Blocks until the child exits, capturing stdout as text. Stderr still reaches the terminal.
    Capture,
}

/// An ordered list of backend arguments plus the mode to run them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCommand {
    args: Vec<String>,
    mode: ExecMode,
}

impl BackendCommand {
    /// Builds a command, rejecting an empty argument list and empty leading arguments.
    pub fn new<I, S>(args: I, mode: ExecMode) -> Result<Self, ExecutionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        match args.first() {
            None => Err(ExecutionError::EmptyCommand),
            Some(first) if first.trim().is_empty() => {
                Err(ExecutionError::EmptyArgument(render_args(&args)))
            }
            Some(_) => Ok(Self { args, mode }),
        }
    }

    pub fn attached<I, S>(args: I) -> Result<Self, ExecutionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(args, ExecMode::Attached)
    }

    pub fn capture<I, S>(args: I) -> Result<Self, ExecutionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(args, ExecMode::Capture)
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn mode(&self) -> ExecMode {
        self.mode
    }
}

impl fmt::Display for BackendCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_args(&self.args))
    }
}

/// The result of a backend invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status_code: i32,
    /// Captured stdout; always empty in attached mode.
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == 0
    }
}

/// Something that runs backend commands and reports POSIX-style exit statuses.
pub trait Backend {
    /// Runs `command` with `env` added to the child's environment.
    fn execute(
        &self,
        command: &BackendCommand,
        env: &BTreeMap<String, String>,
    ) -> Result<CommandOutput, ExecutionError>;

    /// Runs `args` attached to the terminal and returns the exit status.
    fn run_attached(
        &self,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> Result<i32, ExecutionError> {
        let command = BackendCommand::attached(args.iter().cloned())?;
        Ok(self.execute(&command, env)?.status_code)
    }

    /// Runs `args` capturing stdout and returns the exit status with the output.
    fn run_capture(
        &self,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> Result<(i32, String), ExecutionError> {
        let command = BackendCommand::capture(args.iter().cloned())?;
        let output = self.execute(&command, env)?;
        Ok((output.status_code, output.stdout))
    }
}

/// A backend that spawns a program with a fixed argument prefix,
/// e.g. `docker-compose -f <stack file>` or `git`.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    program: String,
    prefix: Vec<String>,
    cwd: PathBuf,
}

impl ProcessBackend {
    pub fn new(program: impl Into<String>, prefix: Vec<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            prefix,
            cwd: cwd.to_path_buf(),
        }
    }

    /// `docker-compose -f <stack_file>`, run from `cwd`.
    pub fn compose(program: impl Into<String>, stack_file: &Path, cwd: &Path) -> Self {
        Self::new(
            program,
            vec!["-f".to_string(), stack_file.to_string_lossy().to_string()],
            cwd,
        )
    }

    fn command_line(&self, command: &BackendCommand) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.prefix.iter().cloned());
        parts.extend(command.args().iter().cloned());
        render_args(&parts)
    }
}

impl Backend for ProcessBackend {
    fn execute(
        &self,
        command: &BackendCommand,
        env: &BTreeMap<String, String>,
    ) -> Result<CommandOutput, ExecutionError> {
        let command_line = self.command_line(command);
        log::debug!("Executing ({:?}): {}", command.mode(), command_line);

        let mut process = StdCommand::new(&self.program);
        process
            .args(&self.prefix)
            .args(command.args())
            .current_dir(dunce::simplified(&self.cwd))
            .envs(env);

        match command.mode() {
            ExecMode::Attached => {
                let status = process
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;
                let status_code = status_code(status);
                log::debug!("'{}' exited with status {}", command_line, status_code);
                Ok(CommandOutput {
                    status_code,
                    stdout: String::new(),
                })
            }
            ExecMode::Capture => {
                let output = process
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::inherit())
                    .output()
                    .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;
                let status_code = status_code(output.status);
                let stdout = String::from_utf8(output.stdout).map_err(|e| {
                    ExecutionError::InvalidUtf8Output {
                        command: command_line.clone(),
                        source: e,
                    }
                })?;
                log::debug!("'{}' exited with status {}", command_line, status_code);
                Ok(CommandOutput {
                    status_code,
                    stdout,
                })
            }
        }
    }
}

/// A child killed by a signal has no exit code; report it as a plain failure.
fn status_code(status: ExitStatus) -> i32 {
    status
        .code()
        .unwrap_or(if status.success() { 0 } else { 1 })
}

/// Renders arguments as a shell-quoted command line, for logs and messages.
pub fn render_args(args: &[String]) -> String {
    shlex::try_join(args.iter().map(String::as_str)).unwrap_or_else(|_| args.join(" "))
}

/// Looks up the current user and group ids with `id`, for container user mapping.
/// Returns `None` where `id` is unavailable.
pub fn current_user_ids() -> Option<(u32, u32)> {
    if !cfg!(unix) {
        return None;
    }
    let lookup = |flag: &str| -> Option<u32> {
        let output = StdCommand::new("id").arg(flag).stdin(Stdio::null()).output().ok()?;
        if !output.status.success() {
            return None;
        }
        String::from_utf8_lossy(&output.stdout).trim().parse::<u32>().ok()
    };
    Some((lookup("-u")?, lookup("-g")?))
}
