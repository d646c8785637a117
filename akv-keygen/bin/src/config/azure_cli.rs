use std::{path::PathBuf, time::Duration};

use akv_keygen_client::{AzureCli, KeyVaultClient, ProcessRunner, RetryPolicy};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};

/// How the az CLI is run and how its failures are read.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AzureCliConfig {
    #[serde(default = "AzureCliConfig::default_program")]
    pub program: PathBuf,

    #[serde(default = "AzureCliConfig::default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "AzureCliConfig::default_retry_delay")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub retry_delay: Duration,

    // Connection failures to this host are retried
    #[serde(default = "AzureCliConfig::default_management_host")]
    pub management_host: String,

    #[serde(default = "AzureCliConfig::default_not_found_exit_code")]
    pub not_found_exit_code: i32,
}

impl AzureCliConfig {
    #[inline]
    pub fn default_program() -> PathBuf { PathBuf::from(akv_keygen_client::DEFAULT_PROGRAM) }

    #[inline]
    pub const fn default_max_attempts() -> u32 { akv_keygen_client::DEFAULT_MAX_ATTEMPTS }

    #[inline]
    pub const fn default_retry_delay() -> Duration { akv_keygen_client::DEFAULT_RETRY_DELAY }

    #[inline]
    pub fn default_management_host() -> String {
        akv_keygen_client::DEFAULT_MANAGEMENT_HOST.to_string()
    }

    #[inline]
    pub const fn default_not_found_exit_code() -> i32 {
        akv_keygen_client::DEFAULT_NOT_FOUND_EXIT_CODE
    }

    pub fn key_vault_client(&self) -> KeyVaultClient<ProcessRunner> {
        let Self { program, max_attempts, retry_delay, management_host, not_found_exit_code } =
            self;

        let az = AzureCli::new(ProcessRunner::new(program.clone()))
            .with_retry_policy(RetryPolicy { max_attempts: *max_attempts, delay: *retry_delay })
            .with_management_host(management_host)
            .with_not_found_exit_code(*not_found_exit_code);

        KeyVaultClient::new(az)
    }
}

impl Default for AzureCliConfig {
    fn default() -> Self {
        Self {
            program: Self::default_program(),
            max_attempts: Self::default_max_attempts(),
            retry_delay: Self::default_retry_delay(),
            management_host: Self::default_management_host(),
            not_found_exit_code: Self::default_not_found_exit_code(),
        }
    }
}
