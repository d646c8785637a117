use std::{io::Write, sync::Arc};

use akv_keygen_core::model::{SecretAttributes, SecretId};
use async_trait::async_trait;
use serde_json::Value;
use snafu::ResultExt;
use tempfile::NamedTempFile;

use crate::{
    azure_cli::AzureCli,
    error::{self, ErrorKind, Result},
    runner::CommandRunner,
};

/// Operations the key generation workflow needs from the secret store.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Make `subscription_id` the active account context.
    async fn select_account(&self, subscription_id: &str) -> Result<()>;

    async fn resource_group_exists(&self, resource_group: &str) -> Result<bool>;

    async fn vault_exists(&self, resource_group: &str, vault_name: &str) -> Result<bool>;

    /// Write a new version of a secret and return its identifier.
    async fn set_secret(&self, vault_name: &str, secret: &SecretAttributes) -> Result<SecretId>;
}

#[async_trait]
impl<S> SecretStore for Arc<S>
where
    S: SecretStore + ?Sized,
{
    async fn select_account(&self, subscription_id: &str) -> Result<()> {
        (**self).select_account(subscription_id).await
    }

    async fn resource_group_exists(&self, resource_group: &str) -> Result<bool> {
        (**self).resource_group_exists(resource_group).await
    }

    async fn vault_exists(&self, resource_group: &str, vault_name: &str) -> Result<bool> {
        (**self).vault_exists(resource_group, vault_name).await
    }

    async fn set_secret(&self, vault_name: &str, secret: &SecretAttributes) -> Result<SecretId> {
        (**self).set_secret(vault_name, secret).await
    }
}

/// Azure Key Vault reached through the az CLI.
#[derive(Clone, Debug)]
pub struct KeyVaultClient<R> {
    az: AzureCli<R>,
}

impl<R> KeyVaultClient<R>
where
    R: CommandRunner,
{
    pub fn new(az: AzureCli<R>) -> Self { Self { az } }

    /// `Ok(false)` when the `show` query reports the resource as not found.
    async fn exists(&self, args: &[&str]) -> Result<bool> {
        match self.az.invoke(args, &[]).await {
            Ok(response) => Ok(response.is_some()),
            Err(err) if err.kind() == ErrorKind::ResourceNotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl<R> SecretStore for KeyVaultClient<R>
where
    R: CommandRunner,
{
    async fn select_account(&self, subscription_id: &str) -> Result<()> {
        let response = self.az.invoke(&["account", "list", "--query", "[?isDefault]"], &[]).await?;

        let Some(account) = response.as_ref().and_then(Value::as_array).and_then(|a| a.first())
        else {
            return error::AccessDeniedSnafu { subscription_id }.fail();
        };

        let Some(default_id) = account.get("id").and_then(Value::as_str) else {
            return error::UnexpectedJsonResponseSnafu {
                operation: "cannot parse default account id",
                response: account.clone(),
            }
            .fail();
        };

        if !default_id.eq_ignore_ascii_case(subscription_id) {
            tracing::debug!("Switching active subscription from '{default_id}'");
            let _ =
                self.az.invoke(&["account", "set", "--subscription", subscription_id], &[]).await?;
        }

        tracing::info!("Selected subscription: '{subscription_id}'");
        Ok(())
    }

    async fn resource_group_exists(&self, resource_group: &str) -> Result<bool> {
        self.exists(&["group", "show", "--name", resource_group]).await
    }

    async fn vault_exists(&self, resource_group: &str, vault_name: &str) -> Result<bool> {
        self.exists(&["keyvault", "show", "--name", vault_name, "--resource-group", resource_group])
            .await
    }

    async fn set_secret(&self, vault_name: &str, secret: &SecretAttributes) -> Result<SecretId> {
        let SecretAttributes { name, value, content_type, expiration, tags } = secret;

        // The value reaches az through a 0600 temp file, never through argv.
        let value_file = stage_value(value.expose())
            .context(error::StageSecretValueSnafu { name: name.as_str() })?;
        let value_path = value_file.path().to_string_lossy().into_owned();

        let mut args: Vec<String> = [
            "keyvault",
            "secret",
            "set",
            "--query",
            "[id]",
            "--vault-name",
            vault_name,
            "--name",
            name.as_str(),
            "--file",
            value_path.as_str(),
            "--encoding",
            "utf-8",
            "--content-type",
            content_type.as_str(),
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        if let Some(expiration) = expiration {
            args.extend(["--expires".to_string(), expiration.to_string()]);
        }

        for (tag_key, tag_value) in tags.iter() {
            args.extend(["--tags".to_string(), format!("{tag_key}={tag_value}")]);
        }

        let response = self.az.invoke(&args, &[value.expose()]).await?.unwrap_or(Value::Null);
        drop(value_file);

        let id = response
            .as_array()
            .and_then(|ids| ids.first())
            .and_then(Value::as_str)
            .map(str::to_string);
        let Some(id) = id else {
            return error::UnexpectedJsonResponseSnafu {
                operation: format!("cannot parse identifier of secret '{name}'"),
                response,
            }
            .fail();
        };

        id.parse().context(error::InvalidSecretIdSnafu)
    }
}

fn stage_value(value: &str) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().prefix("akv-keygen-").tempfile()?;
    file.write_all(value.as_bytes())?;
    file.flush()?;
    Ok(file)
}
