use std::time::Duration;

use serde_json::Value;
use snafu::ResultExt;

use crate::{
    error::{self, Result},
    runner::CommandRunner,
};

/// Appended to every command: machine-readable output, and nothing on stderr
/// except real errors.
const OUTPUT_ARGS: [&str; 3] = ["--output", "json", "--only-show-errors"];

const REDACTED: &str = "*****";

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Exit code the az CLI uses for a 404 from the management API.
pub const DEFAULT_NOT_FOUND_EXIT_CODE: i32 = 3;

pub const DEFAULT_MANAGEMENT_HOST: &str = "management.azure.com";

/// Fixed-delay retry applied to service-unavailable failures only.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,

    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self { Self { max_attempts: DEFAULT_MAX_ATTEMPTS, delay: DEFAULT_RETRY_DELAY } }
}

/// Executes az CLI commands, turning exit codes into typed errors.
#[derive(Clone, Debug)]
pub struct AzureCli<R> {
    runner: R,
    retry_policy: RetryPolicy,
    not_found_exit_code: i32,
    service_unavailable_signature: String,
}

impl<R> AzureCli<R>
where
    R: CommandRunner,
{
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            retry_policy: RetryPolicy::default(),
            not_found_exit_code: DEFAULT_NOT_FOUND_EXIT_CODE,
            service_unavailable_signature: service_unavailable_signature(DEFAULT_MANAGEMENT_HOST),
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    #[must_use]
    pub fn with_not_found_exit_code(mut self, exit_code: i32) -> Self {
        self.not_found_exit_code = exit_code;
        self
    }

    /// Host whose connection failures count as a transient outage.
    #[must_use]
    pub fn with_management_host(mut self, host: &str) -> Self {
        self.service_unavailable_signature = service_unavailable_signature(host);
        self
    }

    /// Runs `az <args> --output json --only-show-errors` and decodes its
    /// output.
    ///
    /// Every occurrence of a value in `redact_values` is masked in what gets
    /// logged or reported in errors. Service-unavailable failures are retried
    /// according to the retry policy; all other failures return at once.
    ///
    /// Returns `Ok(None)` when the command succeeds without printing anything.
    ///
    /// # Errors
    /// Returns an error classified by [`Error::kind`](crate::Error::kind).
    pub async fn invoke<S>(&self, args: &[S], redact_values: &[&str]) -> Result<Option<Value>>
    where
        S: AsRef<str> + Sync,
    {
        let args: Vec<String> = args
            .iter()
            .map(|arg| arg.as_ref().to_string())
            .chain(OUTPUT_ARGS.iter().map(ToString::to_string))
            .collect();
        let redactor = Redactor::new(redact_values);
        let command = redactor.apply(&args.join(" "));

        let max_attempts = self.retry_policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            tracing::info!("az - Executing az {command}");

            match self.invoke_once(&args, &command, &redactor).await {
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    tracing::warn!(
                        "az - Service unavailable on attempt {attempt}/{max_attempts}, retrying \
                         in {:?}",
                        self.retry_policy.delay
                    );
                    tokio::time::sleep(self.retry_policy.delay).await;
                    attempt += 1;
                }
                Err(err) if err.is_transient() => {
                    tracing::error!("az - Service unavailable, giving up after {attempt} attempt(s)");
                    return Err(err);
                }
                result => return result,
            }
        }
    }

    async fn invoke_once(
        &self,
        args: &[String],
        command: &str,
        redactor: &Redactor<'_>,
    ) -> Result<Option<Value>> {
        let output = self
            .runner
            .run(args)
            .await
            .context(error::SpawnProcessSnafu { program: self.runner.program(), command })?;

        match output.exit_code {
            Some(0) => {}
            Some(exit_code) if exit_code == self.not_found_exit_code => {
                return error::ResourceNotFoundSnafu { command, exit_code }.fail();
            }
            Some(1) if output.stderr.contains(&self.service_unavailable_signature) => {
                return error::ServiceUnavailableSnafu {
                    command,
                    message: redactor.apply(output.stderr.trim()),
                }
                .fail();
            }
            Some(exit_code) => {
                let message = redactor.apply(output.stderr.trim());
                tracing::error!("az - Command failed with exit code: {exit_code}");
                return error::CommandFailedSnafu { command, exit_code, message }.fail();
            }
            None => {
                tracing::error!("az - Command was terminated by a signal");
                return error::TerminatedSnafu { command }.fail();
            }
        }

        let stdout = output.stdout.trim();
        if !stdout.is_empty() {
            return serde_json::from_str(stdout).map(Some).with_context(|_| {
                tracing::error!("az - Failed to decode output: {}", redactor.apply(stdout));
                error::DecodeOutputSnafu { command }
            });
        }

        let stderr = output.stderr.trim();
        if !stderr.is_empty() {
            let message = redactor.apply(stderr);
            tracing::error!("az - Command failed with error: {message}");
            return error::CommandFailedSnafu { command, exit_code: 0, message }.fail();
        }

        Ok(None)
    }
}

fn service_unavailable_signature(host: &str) -> String {
    format!("HTTPSConnectionPool(host='{host}', port=443): Max retries exceeded with url")
}

/// Masks sensitive substrings before text leaves the process.
struct Redactor<'a> {
    values: Vec<&'a str>,
}

impl<'a> Redactor<'a> {
    fn new(values: &[&'a str]) -> Self {
        Self { values: values.iter().copied().filter(|value| !value.is_empty()).collect() }
    }

    fn apply(&self, text: &str) -> String {
        self.values.iter().fold(text.to_string(), |text, value| text.replace(value, REDACTED))
    }
}
