use snafu::Snafu;

use crate::config;

/// Result type alias for the CLI.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Exit status for every validation or execution failure.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Error type for the CLI.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Workflow { source: akv_keygen_workflow::Error },

    #[snafu(display("Could not initialize tokio runtime, error: {source}"))]
    InitializeTokioRuntime { source: std::io::Error },

    #[snafu(display("{source}"))]
    Config { source: config::Error },
}

impl From<config::Error> for Error {
    fn from(source: config::Error) -> Self { Self::Config { source } }
}

impl From<akv_keygen_workflow::Error> for Error {
    fn from(source: akv_keygen_workflow::Error) -> Self { Self::Workflow { source } }
}

pub trait CommandError {
    fn exit_code(&self) -> i32;
}

impl CommandError for Error {
    fn exit_code(&self) -> i32 {
        match self {
            Self::Workflow { .. } | Self::InitializeTokioRuntime { .. } | Self::Config { .. } => {
                FAILURE_EXIT_CODE
            }
        }
    }
}
