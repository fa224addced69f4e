//! Session construction options.

use crate::core::{DEFAULT_NOISE_PATTERN, HASH_SIZE, PUBLIC_KEY_SIZE};
use crate::crypto::StaticKeypair;

/// A pre-computed handshake result, injected to skip the handshake driver
/// (C2) entirely and jump straight to the header-exchange boundary.
///
/// Used for "handshake outside" setups: the handshake ran on a separate
/// channel, or this session is one end of a pair whose keys were derived
/// elsewhere. Deliberately a distinct type rather than an `Option` field
/// threaded through the Noise path, so a pre-keyed session can never
/// accidentally re-enter the handshake driver.
#[derive(Clone)]
pub struct PreKeyed {
    /// This side's static public key.
    pub public_key: [u8; PUBLIC_KEY_SIZE],
    /// The peer's static public key.
    pub remote_public_key: [u8; PUBLIC_KEY_SIZE],
    /// Transcript hash bound into stream-identity derivation.
    pub hash: [u8; HASH_SIZE],
    /// Outbound secret-stream key.
    pub tx: [u8; 32],
    /// Inbound secret-stream key.
    pub rx: [u8; 32],
}

/// Options recognized by [`crate::session::DuplexSession`] construction.
pub struct SessionOptions {
    /// Identity hint: this side's long-term public key, if already known
    /// (e.g. recovered from storage). Ignored when `key_pair` is set.
    pub public_key: Option<[u8; PUBLIC_KEY_SIZE]>,
    /// Identity hint: the peer's long-term public key, if pre-known. When
    /// set, the handshake is authenticated against it and fails if the
    /// peer presents a different key.
    pub remote_public_key: Option<[u8; PUBLIC_KEY_SIZE]>,
    /// Override the generated long-term key pair.
    pub key_pair: Option<StaticKeypair>,
    /// Noise pattern string, e.g. `"XX"`, `"IK"`. Defaults to `XX`.
    pub pattern: String,
    /// Pre-computed handshake result, bypassing the handshake driver.
    pub handshake: Option<PreKeyed>,
    /// Bytes to feed immediately into the inbound parser once the session
    /// starts — used when the caller buffered transport bytes before the
    /// session was ready.
    pub data: Option<Vec<u8>>,
    /// Signal immediate EOF on the inbound side once `data` has been fed.
    pub ended: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            public_key: None,
            remote_public_key: None,
            key_pair: None,
            pattern: DEFAULT_NOISE_PATTERN.to_string(),
            handshake: None,
            data: None,
            ended: false,
        }
    }
}

impl SessionOptions {
    /// Start from defaults (`XX` pattern, `autoStart` semantics via the
    /// entry point used, no identity hints).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected remote public key.
    pub fn remote_public_key(mut self, key: [u8; PUBLIC_KEY_SIZE]) -> Self {
        self.remote_public_key = Some(key);
        self
    }

    /// Override the long-term key pair.
    pub fn key_pair(mut self, key_pair: StaticKeypair) -> Self {
        self.key_pair = Some(key_pair);
        self
    }

    /// Select a Noise pattern other than the default `XX`.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Inject a pre-computed handshake, bypassing the handshake driver.
    pub fn handshake(mut self, handshake: PreKeyed) -> Self {
        self.handshake = Some(handshake);
        self
    }

    /// Feed buffered inbound bytes as soon as the session starts.
    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }

    /// Signal immediate EOF on the inbound side once `data` has been fed.
    pub fn ended(mut self, ended: bool) -> Self {
        self.ended = ended;
        self
    }
}
