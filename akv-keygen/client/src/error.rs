use std::{borrow::Cow, path::PathBuf};

use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

/// How a failure should be treated by callers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// Not logged in, or the account cannot see the subscription.
    AccessDenied,
    /// The queried resource does not exist.
    ResourceNotFound,
    /// The management endpoint could not be reached; worth retrying.
    ServiceUnavailable,
    /// Anything else.
    ExecutionFailure,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display(
        "Not logged into az cli or can't access subscription: {subscription_id}, location: \
         {location}"
    ))]
    AccessDenied {
        #[snafu(implicit)]
        location: Location,
        subscription_id: String,
    },

    #[snafu(display("Resource not found, command: `az {command}`, exit code: {exit_code}"))]
    ResourceNotFound {
        #[snafu(implicit)]
        location: Location,
        command: String,
        exit_code: i32,
    },

    #[snafu(display("Azure management service unavailable, command: `az {command}`, error: {message}"))]
    ServiceUnavailable {
        #[snafu(implicit)]
        location: Location,
        command: String,
        message: String,
    },

    #[snafu(display(
        "Command `az {command}` failed, exit code: {exit_code}, error: {message}, location: \
         {location}"
    ))]
    CommandFailed {
        #[snafu(implicit)]
        location: Location,
        command: String,
        exit_code: i32,
        message: String,
    },

    #[snafu(display("Command `az {command}` was terminated by a signal, location: {location}"))]
    Terminated {
        #[snafu(implicit)]
        location: Location,
        command: String,
    },

    #[snafu(display(
        "Could not execute {}, command: `az {command}`, error: {source}",
        program.display()
    ))]
    SpawnProcess {
        #[snafu(implicit)]
        location: Location,
        program: PathBuf,
        command: String,
        source: std::io::Error,
    },

    #[snafu(display(
        "Failed to decode output of `az {command}` as JSON, error: {source}, location: {location}"
    ))]
    DecodeOutput {
        #[snafu(implicit)]
        location: Location,
        command: String,
        source: serde_json::Error,
    },

    #[snafu(display("Unexpected JSON response: {}, operation: {operation}", serde_json::to_string_pretty(response).unwrap_or_default()))]
    UnexpectedJsonResponse {
        #[snafu(implicit)]
        location: Location,
        operation: Cow<'static, str>,
        response: serde_json::Value,
    },

    #[snafu(display("Could not stage value of secret '{name}', error: {source}"))]
    StageSecretValue {
        #[snafu(implicit)]
        location: Location,
        name: String,
        source: std::io::Error,
    },

    #[snafu(display("{source}, location: {location}"))]
    InvalidSecretId {
        #[snafu(implicit)]
        location: Location,
        source: akv_keygen_core::Error,
    },
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccessDenied { .. } => ErrorKind::AccessDenied,
            Self::ResourceNotFound { .. } => ErrorKind::ResourceNotFound,
            Self::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            Self::CommandFailed { .. }
            | Self::Terminated { .. }
            | Self::SpawnProcess { .. }
            | Self::DecodeOutput { .. }
            | Self::UnexpectedJsonResponse { .. }
            | Self::StageSecretValue { .. }
            | Self::InvalidSecretId { .. } => ErrorKind::ExecutionFailure,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.kind(), ErrorKind::ServiceUnavailable)
    }
}
