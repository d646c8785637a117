use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Validation { source: akv_keygen_core::Error },

    #[snafu(display("Missing value for {field}"))]
    MissingValue { field: &'static str },

    #[snafu(display("Encryption key length must be at least one byte"))]
    InvalidKeyLength,

    #[snafu(display("Failed to select subscription '{subscription_id}', error: {source}"))]
    SelectAccount { subscription_id: String, source: akv_keygen_client::Error },

    #[snafu(display("Failed to look up resource group '{resource_group}', error: {source}"))]
    CheckResourceGroup { resource_group: String, source: akv_keygen_client::Error },

    #[snafu(display("Resource group '{resource_group}' does not exist"))]
    ResourceGroupNotFound { resource_group: String },

    #[snafu(display("Failed to look up key vault '{vault_name}', error: {source}"))]
    CheckVault { vault_name: String, source: akv_keygen_client::Error },

    #[snafu(display("Key vault '{vault_name}' does not exist"))]
    VaultNotFound { vault_name: String },

    #[snafu(display("Failed to store encryption key '{name}', error: {source}"))]
    StoreKey { name: String, source: akv_keygen_client::Error },

    #[snafu(display("Failed to store encryption key version '{name}', error: {source}"))]
    StoreKeyVersion { name: String, source: akv_keygen_client::Error },
}

impl From<akv_keygen_core::Error> for Error {
    fn from(source: akv_keygen_core::Error) -> Self { Self::Validation { source } }
}
