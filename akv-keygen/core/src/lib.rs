pub mod error;
pub mod model;

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use directories::ProjectDirs;

pub use self::error::{Error, Result};

pub const PROJECT_NAME: &str = "akv-keygen";

pub const PROGRAM_NAME: &str = "akv-keygen";
pub const CONFIG_NAME: &str = "akv-keygen.yaml";

pub const DEFAULT_ENCRYPTION_KEY_NAME: &str = "secret--encryption--symmetricKey";
pub const DEFAULT_ENCRYPTION_KEY_VERSION_NAME: &str = "secret--encryption--symmetricKeyVersion";

/// Number of random bytes in a generated key, before hex encoding.
pub const DEFAULT_ENCRYPTION_KEY_LENGTH: usize = 32;

/// Days from today until a generated key expires, unless told otherwise.
pub const DEFAULT_ENCRYPTION_KEY_VALIDITY_DAYS: u32 = 90;

pub const DEFAULT_SECRET_CONTENT_TYPE: &str = "application/octet-stream";

pub static PROJECT_CONFIG_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    ProjectDirs::from("", PROJECT_NAME, PROJECT_NAME).map_or_else(
        || {
            fallback_project_config_directories()
                .into_iter()
                .next()
                .unwrap_or_else(|| PathBuf::from("."))
        },
        |dirs| dirs.config_dir().to_path_buf(),
    )
});

fn fallback_project_config_directories() -> Vec<PathBuf> {
    let Some(user_dirs) = directories::UserDirs::new() else {
        return Vec::new();
    };
    vec![
        [user_dirs.home_dir(), (Path::new(".config")), (Path::new(PROJECT_NAME))].iter().collect(),
        [user_dirs.home_dir(), (Path::new(&format!(".{PROJECT_NAME}")))].iter().collect(),
        [&Path::new("/"), &Path::new("etc"), &Path::new(PROJECT_NAME)].iter().collect(),
    ]
}
