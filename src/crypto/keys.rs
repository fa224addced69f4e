//! X25519 long-term identity keys.

use crate::core::{PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
use blake2::{Blake2s256, Digest};
use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

/// A static X25519 keypair used as a peer's long-term identity.
///
/// The private key is zeroized on drop.
#[derive(Clone)]
pub struct StaticKeypair {
    private: [u8; PRIVATE_KEY_SIZE],
    public: [u8; PUBLIC_KEY_SIZE],
}

impl StaticKeypair {
    /// Generate a new random keypair from the OS RNG.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        Self::from_secret(secret)
    }

    /// Generate a keypair deterministically from a 32-byte seed.
    ///
    /// This is the crate's `keyPair(seed)` static helper: the same seed
    /// always yields the same keypair, which is useful for tests and for
    /// callers that manage their own key storage. The seed is hashed before
    /// use so that a short or low-entropy seed never becomes the raw scalar.
    pub fn generate_from_seed(seed: &[u8; 32]) -> Self {
        let mut hasher = Blake2s256::new();
        hasher.update(b"noisestream/keypair-seed");
        hasher.update(seed);
        let scalar: [u8; 32] = hasher.finalize().into();
        Self::from_secret(StaticSecret::from(scalar))
    }

    fn from_secret(secret: StaticSecret) -> Self {
        let public = PublicKey::from(&secret);
        Self {
            private: secret.to_bytes(),
            public: public.to_bytes(),
        }
    }

    /// Construct a keypair from raw key material.
    ///
    /// The caller must ensure `private` is a valid X25519 scalar; it is used
    /// as-is (clamping happens inside `x25519-dalek`).
    pub fn from_bytes(private: [u8; PRIVATE_KEY_SIZE], public: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self { private, public }
    }

    /// This side's public key.
    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.public
    }

    /// This side's private key.
    pub fn private_key(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.private
    }
}

impl Drop for StaticKeypair {
    fn drop(&mut self) {
        self.private.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_yields_distinct_keys() {
        let a = StaticKeypair::generate();
        let b = StaticKeypair::generate();
        assert_ne!(a.public_key(), b.public_key());
        assert_ne!(a.private_key(), b.private_key());
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let seed = [7u8; 32];
        let a = StaticKeypair::generate_from_seed(&seed);
        let b = StaticKeypair::generate_from_seed(&seed);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.private_key(), b.private_key());
    }
}
