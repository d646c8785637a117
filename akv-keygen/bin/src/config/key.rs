use akv_keygen_workflow::KeyDefaults;
use serde::{Deserialize, Serialize};

/// Defaults for options left out on the command line.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeyConfig {
    #[serde(default = "KeyConfig::default_key_name")]
    pub key_name: String,

    #[serde(default = "KeyConfig::default_key_version_name")]
    pub key_version_name: String,

    // Random bytes, before hex encoding
    #[serde(default = "KeyConfig::default_key_length")]
    pub key_length: usize,

    #[serde(default = "KeyConfig::default_validity_days")]
    pub validity_days: u32,

    #[serde(default = "KeyConfig::default_content_type")]
    pub content_type: String,
}

impl KeyConfig {
    #[inline]
    pub fn default_key_name() -> String { akv_keygen_core::DEFAULT_ENCRYPTION_KEY_NAME.to_string() }

    #[inline]
    pub fn default_key_version_name() -> String {
        akv_keygen_core::DEFAULT_ENCRYPTION_KEY_VERSION_NAME.to_string()
    }

    #[inline]
    pub const fn default_key_length() -> usize { akv_keygen_core::DEFAULT_ENCRYPTION_KEY_LENGTH }

    #[inline]
    pub const fn default_validity_days() -> u32 {
        akv_keygen_core::DEFAULT_ENCRYPTION_KEY_VALIDITY_DAYS
    }

    #[inline]
    pub fn default_content_type() -> String {
        akv_keygen_core::DEFAULT_SECRET_CONTENT_TYPE.to_string()
    }

    /// Workflow defaults, tagging secrets with `user` when it is known.
    pub fn defaults(&self, user: Option<String>) -> KeyDefaults {
        KeyDefaults {
            key_name: self.key_name.clone(),
            key_version_name: self.key_version_name.clone(),
            key_length: self.key_length,
            validity_days: self.validity_days,
            content_type: self.content_type.clone(),
            user,
        }
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            key_name: Self::default_key_name(),
            key_version_name: Self::default_key_version_name(),
            key_length: Self::default_key_length(),
            validity_days: Self::default_validity_days(),
            content_type: Self::default_content_type(),
        }
    }
}
