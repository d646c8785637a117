mod azure_cli;
mod error;
mod key;

use std::path::{Path, PathBuf};

use akv_cli_common::config::LogConfig;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::{azure_cli::AzureCliConfig, error::Error, key::KeyConfig};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub azure_cli: AzureCliConfig,

    #[serde(default)]
    pub key: KeyConfig,
}

impl Config {
    #[inline]
    pub fn default_path() -> PathBuf {
        [
            akv_keygen_core::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(akv_keygen_core::CONFIG_NAME),
        ]
        .into_iter()
        .collect()
    }

    /// Loads `path` if given, otherwise the default path if that file exists,
    /// otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let path = Self::default_path();
                if path.is_file() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut config: Self = {
            let data = std::fs::read_to_string(&path)
                .context(error::OpenConfigSnafu { filename: path.as_ref().to_path_buf() })?;

            serde_yaml::from_str(&data)
                .context(error::ParseConfigSnafu { filename: path.as_ref().to_path_buf() })?
        };

        config.log.file_path = match config.log.file_path.map(|path| {
            path.try_resolve()
                .map(|path| path.to_path_buf())
                .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
        }) {
            Some(Ok(path)) => Some(path),
            Some(Err(err)) => return Err(err),
            None => None,
        };

        Ok(config)
    }
}
