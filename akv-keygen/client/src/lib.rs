//! Azure Key Vault access through the az command-line tool.
//!
//! [`AzureCli`] runs a single az command, classifies its failures and retries
//! transient outages of the management endpoint. [`KeyVaultClient`] builds the
//! handful of commands the key generator needs on top of it.

mod azure_cli;
mod error;
mod key_vault;
mod runner;

pub use self::{
    azure_cli::{
        AzureCli, RetryPolicy, DEFAULT_MANAGEMENT_HOST, DEFAULT_MAX_ATTEMPTS,
        DEFAULT_NOT_FOUND_EXIT_CODE, DEFAULT_RETRY_DELAY,
    },
    error::{Error, ErrorKind, Result},
    key_vault::{KeyVaultClient, SecretStore},
    runner::{CommandOutput, CommandRunner, ProcessRunner, DEFAULT_PROGRAM},
};
