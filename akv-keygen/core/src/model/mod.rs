// Values that travel between the command line, the workflow and the secret
// store.

mod expiration;
mod secret;
mod tags;

pub use self::{
    expiration::Expiration,
    secret::{SecretAttributes, SecretId, SecretValue},
    tags::Tags,
};
