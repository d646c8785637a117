mod error;
mod key_material;
mod request;
mod workflow;

pub use self::{
    error::{Error, Result},
    key_material::generate_key,
    request::{KeyDefaults, KeyGenerationOptions, KeyGenerationRequest},
    workflow::{KeyGenerationOutcome, KeyGenerationWorkflow},
};
