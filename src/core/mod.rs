//! Shared constants, error taxonomy, and small helpers used across the crate.

mod constants;
mod error;

pub use constants::*;
pub use error::*;

/// Fill `buf` with cryptographically secure random bytes (OS RNG).
pub fn random_bytes(buf: &mut [u8]) {
    use rand::{rngs::OsRng, RngCore};
    OsRng.fill_bytes(buf);
}
