use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    model::{Expiration, Tags},
    DEFAULT_SECRET_CONTENT_TYPE,
};

const REDACTED: &str = "*****";

/// Secret material. Formatting never reveals the value.
#[derive(Clone, Eq, PartialEq)]
pub struct SecretValue(String);

impl SecretValue {
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }

    /// The raw value, for handing to the secret store.
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &str { &self.0 }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl Debug for SecretValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretValue").field(&REDACTED).finish()
    }
}

impl Display for SecretValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(REDACTED) }
}

/// Fully qualified identifier of one version of a secret, e.g.
/// `https://my-vault.vault.azure.net/secrets/my-secret/0123abcd`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretId(String);

impl SecretId {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }

    /// The trailing path segment.
    #[must_use]
    pub fn version(&self) -> &str { self.segments().next().unwrap_or_default() }

    /// The path segment in front of the version.
    #[must_use]
    pub fn name(&self) -> &str { self.segments().nth(1).unwrap_or_default() }

    fn segments(&self) -> impl Iterator<Item = &str> { self.0.trim_end_matches('/').rsplit('/') }
}

impl FromStr for SecretId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.trim_end_matches('/').rsplit('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(version), Some(name), Some("secrets"))
                if !version.is_empty() && !name.is_empty() =>
            {
                Ok(Self(s.to_string()))
            }
            _ => error::InvalidSecretIdSnafu { id: s }.fail(),
        }
    }
}

impl TryFrom<String> for SecretId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<SecretId> for String {
    fn from(id: SecretId) -> Self { id.0 }
}

impl Display for SecretId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Everything written to the secret store for one secret version.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SecretAttributes {
    pub name: String,

    pub value: SecretValue,

    pub content_type: String,

    pub expiration: Option<Expiration>,

    pub tags: Tags,
}

impl SecretAttributes {
    #[must_use]
    pub fn new(name: impl Into<String>, value: SecretValue) -> Self {
        Self {
            name: name.into(),
            value,
            content_type: DEFAULT_SECRET_CONTENT_TYPE.to_string(),
            expiration: None,
            tags: Tags::default(),
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    #[must_use]
    pub fn with_expiration(mut self, expiration: Option<Expiration>) -> Self {
        self.expiration = expiration;
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }
}
