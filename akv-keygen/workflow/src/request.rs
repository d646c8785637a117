use akv_keygen_core::{
    model::{Expiration, SecretAttributes, SecretValue, Tags},
    DEFAULT_ENCRYPTION_KEY_LENGTH, DEFAULT_ENCRYPTION_KEY_NAME,
    DEFAULT_ENCRYPTION_KEY_VALIDITY_DAYS, DEFAULT_ENCRYPTION_KEY_VERSION_NAME,
    DEFAULT_SECRET_CONTENT_TYPE,
};
use chrono::NaiveDate;
use snafu::ensure;

use crate::error::{self, Result};

/// Values used for whatever the caller leaves out.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyDefaults {
    pub key_name: String,

    pub key_version_name: String,

    pub key_length: usize,

    pub validity_days: u32,

    pub content_type: String,

    /// Recorded as the `user` tag when no tags are given.
    pub user: Option<String>,
}

impl Default for KeyDefaults {
    fn default() -> Self {
        Self {
            key_name: DEFAULT_ENCRYPTION_KEY_NAME.to_string(),
            key_version_name: DEFAULT_ENCRYPTION_KEY_VERSION_NAME.to_string(),
            key_length: DEFAULT_ENCRYPTION_KEY_LENGTH,
            validity_days: DEFAULT_ENCRYPTION_KEY_VALIDITY_DAYS,
            content_type: DEFAULT_SECRET_CONTENT_TYPE.to_string(),
            user: None,
        }
    }
}

/// Unvalidated input, as it arrives from the command line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeyGenerationOptions {
    pub subscription_id: String,

    pub resource_group: String,

    pub location: String,

    pub vault_name: String,

    pub key_name: Option<String>,

    pub key_version_name: Option<String>,

    /// `YYYY-MM-DD`
    pub expiration: Option<String>,

    /// `key=value` pairs separated by `,`
    pub tags: Option<String>,

    pub dry_run: bool,
}

/// Validated input of the key generation workflow.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyGenerationRequest {
    pub subscription_id: String,

    pub resource_group: String,

    pub location: String,

    pub vault_name: String,

    pub key_name: String,

    pub key_version_name: String,

    pub key_length: usize,

    pub content_type: String,

    pub expiration: Expiration,

    pub tags: Tags,

    pub dry_run: bool,
}

impl KeyGenerationOptions {
    /// Checks every option and fills in defaults.
    ///
    /// Nothing here touches the network, so a bad date or tag list is caught
    /// before any command runs.
    ///
    /// # Errors
    /// Returns an error if a required value is empty, the expiration is not a
    /// future `YYYY-MM-DD` date, or the tags are not `key=value` pairs.
    pub fn validate(self, defaults: &KeyDefaults, today: NaiveDate) -> Result<KeyGenerationRequest> {
        let Self {
            subscription_id,
            resource_group,
            location,
            vault_name,
            key_name,
            key_version_name,
            expiration,
            tags,
            dry_run,
        } = self;

        for (field, value) in [
            ("subscription id", &subscription_id),
            ("resource group", &resource_group),
            ("location", &location),
            ("vault name", &vault_name),
        ] {
            ensure!(!value.trim().is_empty(), error::MissingValueSnafu { field });
        }
        ensure!(defaults.key_length > 0, error::InvalidKeyLengthSnafu);

        let expiration = match non_empty(expiration) {
            Some(date) => Expiration::parse(&date, today)?,
            None => Expiration::days_after(today, defaults.validity_days)?,
        };

        let tags = match non_empty(tags) {
            Some(tags) => tags.parse::<Tags>()?,
            None => defaults.user.clone().map(Tags::with_user).unwrap_or_default(),
        };

        Ok(KeyGenerationRequest {
            subscription_id,
            resource_group,
            location,
            vault_name,
            key_name: non_empty(key_name).unwrap_or_else(|| defaults.key_name.clone()),
            key_version_name: non_empty(key_version_name)
                .unwrap_or_else(|| defaults.key_version_name.clone()),
            key_length: defaults.key_length,
            content_type: defaults.content_type.clone(),
            expiration,
            tags,
            dry_run,
        })
    }
}

impl KeyGenerationRequest {
    /// The encryption key secret holding `value`.
    #[must_use]
    pub fn encryption_key(&self, value: SecretValue) -> SecretAttributes {
        self.secret(&self.key_name, value)
    }

    /// The pointer secret holding the version of the encryption key.
    #[must_use]
    pub fn encryption_key_version(&self, key_version: &str) -> SecretAttributes {
        self.secret(&self.key_version_name, SecretValue::new(key_version))
    }

    fn secret(&self, name: &str, value: SecretValue) -> SecretAttributes {
        SecretAttributes::new(name, value)
            .with_content_type(self.content_type.as_str())
            .with_expiration(Some(self.expiration))
            .with_tags(self.tags.clone())
    }

    pub(crate) fn log_settings(&self) {
        tracing::info!("Running {} with following settings:", akv_keygen_core::PROGRAM_NAME);
        tracing::info!("  Subscription id: '{}'", self.subscription_id);
        tracing::info!("  Resource group: '{}'", self.resource_group);
        tracing::info!("  Location: '{}'", self.location);
        tracing::info!("  Vault name: '{}'", self.vault_name);
        tracing::info!("  Key name: '{}'", self.key_name);
        tracing::info!("  Key version name: '{}'", self.key_version_name);
        tracing::info!("  Expiration: '{}'", self.expiration);
        tracing::info!("  Tags: '{}'", self.tags);
        tracing::info!("  Dry run: '{}'", self.dry_run);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
