use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{self, Error};

/// Ordered `key=value` tags attached to a secret.
///
/// Parsed from the `k1=v1,k2=v2` form accepted on the command line and
/// rendered back to the same form. A repeated key keeps its first position and
/// takes the last value.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tags(IndexMap<String, String>);

impl Tags {
    #[inline]
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Tag the secret with the user who created it.
    #[must_use]
    pub fn with_user(user: impl Into<String>) -> Self {
        let mut tags = Self::new();
        tags.insert("user", user);
        tags
    }

    /// Returns the previous value when `key` was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> { self.0.get(key).map(String::as_str) }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl FromStr for Tags {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tags = Self::new();
        for tag in s.split(',') {
            let mut parts = tag.split('=');
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                return error::InvalidTagSnafu { tag }.fail();
            };
            if key.is_empty() {
                return error::EmptyTagKeySnafu { tag }.fail();
            }
            let _ = tags.insert(key, value);
        }
        Ok(tags)
    }
}

impl Display for Tags {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}
