use std::{
    io,
    path::{Path, PathBuf},
    process::Stdio,
    sync::Arc,
};

use async_trait::async_trait;

pub const DEFAULT_PROGRAM: &str = "az";

/// What a finished process left behind.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,

    pub stdout: String,

    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self { exit_code: Some(0), stdout: stdout.into(), stderr: String::new() }
    }

    #[must_use]
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self { exit_code: Some(exit_code), stdout: String::new(), stderr: stderr.into() }
    }
}

/// Runs the management tool with the given arguments and collects its output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// The executable being run, for diagnostics.
    fn program(&self) -> &Path;

    /// # Errors
    /// Returns an error if the process could not be started or waited on.
    async fn run(&self, args: &[String]) -> io::Result<CommandOutput>;
}

#[async_trait]
impl<R> CommandRunner for Arc<R>
where
    R: CommandRunner + ?Sized,
{
    fn program(&self) -> &Path { (**self).program() }

    async fn run(&self, args: &[String]) -> io::Result<CommandOutput> { (**self).run(args).await }
}

/// Spawns the tool as a child process with stdin closed and both output
/// streams captured in memory.
#[derive(Clone, Debug)]
pub struct ProcessRunner {
    program: PathBuf,
}

impl ProcessRunner {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self { Self { program: program.into() } }
}

impl Default for ProcessRunner {
    fn default() -> Self { Self::new(DEFAULT_PROGRAM) }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    fn program(&self) -> &Path { &self.program }

    async fn run(&self, args: &[String]) -> io::Result<CommandOutput> {
        let output = tokio::process::Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
