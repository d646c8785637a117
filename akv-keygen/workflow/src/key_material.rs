use akv_keygen_core::model::SecretValue;
use rand::{rngs::OsRng, RngCore};

/// `length` bytes from the operating system's RNG, hex encoded.
#[must_use]
pub fn generate_key(length: usize) -> SecretValue {
    let mut bytes = vec![0_u8; length];
    OsRng.fill_bytes(&mut bytes);
    SecretValue::new(hex::encode(bytes))
}
