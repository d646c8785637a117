use akv_keygen_client::SecretStore;
use akv_keygen_core::model::SecretId;
use snafu::{ensure, ResultExt};

use crate::{
    error::{self, Result},
    key_material::generate_key,
    request::KeyGenerationRequest,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeyGenerationOutcome {
    /// Nothing was written.
    DryRun,

    Stored { key: SecretId, key_version: SecretId },
}

/// Generates an encryption key and stores it, together with a pointer to its
/// version, in a secret store.
pub struct KeyGenerationWorkflow<S> {
    store: S,
}

impl<S> KeyGenerationWorkflow<S>
where
    S: SecretStore,
{
    pub fn new(store: S) -> Self { Self { store } }

    /// # Errors
    /// Returns an error if the subscription cannot be selected, the resource
    /// group or vault is missing, or either secret cannot be written.
    pub async fn run(&self, request: &KeyGenerationRequest) -> Result<KeyGenerationOutcome> {
        let KeyGenerationRequest {
            subscription_id,
            resource_group,
            vault_name,
            key_name,
            key_version_name,
            key_length,
            expiration,
            dry_run,
            ..
        } = request;

        request.log_settings();

        if *dry_run {
            tracing::info!("Dry run mode, no changes will be made.");
            tracing::info!(
                "Encryption key '{key_name}' would be created from {key_length} random bytes in \
                 key vault '{vault_name}', expiring on {expiration}."
            );
            tracing::info!(
                "Encryption key version '{key_version_name}' would point to the new version of \
                 '{key_name}'."
            );
            return Ok(KeyGenerationOutcome::DryRun);
        }

        self.store
            .select_account(subscription_id)
            .await
            .context(error::SelectAccountSnafu { subscription_id })?;

        let group_exists = self
            .store
            .resource_group_exists(resource_group)
            .await
            .context(error::CheckResourceGroupSnafu { resource_group })?;
        ensure!(group_exists, error::ResourceGroupNotFoundSnafu { resource_group });

        let vault_exists = self
            .store
            .vault_exists(resource_group, vault_name)
            .await
            .context(error::CheckVaultSnafu { vault_name })?;
        ensure!(vault_exists, error::VaultNotFoundSnafu { vault_name });

        tracing::info!("Generating encryption key and encryption key version...");
        let key = self
            .store
            .set_secret(vault_name, &request.encryption_key(generate_key(*key_length)))
            .await
            .context(error::StoreKeySnafu { name: key_name })?;
        tracing::debug!("Stored encryption key '{key_name}' as version {}", key.version());

        let key_version = self
            .store
            .set_secret(vault_name, &request.encryption_key_version(key.version()))
            .await
            .context(error::StoreKeyVersionSnafu { name: key_version_name })?;

        tracing::info!(
            "Encryption key '{key_name}' and encryption key version '{key_version_name}' \
             generated successfully."
        );

        Ok(KeyGenerationOutcome::Stored { key, key_version })
    }
}
