use std::process;

use akv_keygen_core::{model::Expiration, PROGRAM_NAME};
use akv_keygen_workflow::{KeyGenerationOptions, KeyGenerationOutcome, KeyGenerationWorkflow};
use snafu::ResultExt;
use tokio::runtime::Builder;

use crate::{
    config::Config,
    error,
    error::Result,
    shadow::{BRANCH, PKG_VERSION, SHORT_COMMIT},
};

/// Validate the options, then generate and store the key.
#[allow(clippy::result_large_err)]
pub fn run_generate(config: Config, options: KeyGenerationOptions) -> Result<KeyGenerationOutcome> {
    let Config { ref log, ref azure_cli, ref key } = config;

    log.registry();

    tracing::info!(
        "{PROGRAM_NAME} {PKG_VERSION} ({BRANCH}@{SHORT_COMMIT}) is initializing, pid: {}",
        process::id()
    );

    let exit_status = options
        .validate(&key.defaults(login_user()), Expiration::today())
        .context(error::WorkflowSnafu)
        .and_then(|request| {
            tracing::debug!("Initializing Tokio runtime");
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .context(error::InitializeTokioRuntimeSnafu)?;

            let workflow = KeyGenerationWorkflow::new(azure_cli.key_vault_client());
            runtime.block_on(workflow.run(&request)).context(error::WorkflowSnafu)
        });

    if let Err(ref error) = exit_status {
        tracing::error!(%error);
    }

    exit_status
}

/// Login name of the user running the tool, if the environment knows it.
fn login_user() -> Option<String> {
    ["USER", "USERNAME", "LOGNAME"]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|user| !user.trim().is_empty())
}
