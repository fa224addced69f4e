//! Cryptographic layer: long-term keys, the Noise handshake driver (C2),
//! and stream-identity derivation (C4).
//!
//! The secret-stream AEAD pair (C3) lives in [`crate::stream`] since it is
//! conceptually closer to framing than to key management.

mod identity;
mod keys;
mod noise;

pub use identity::{stream_id, STREAM_NAMESPACE_INITIATOR, STREAM_NAMESPACE_RESPONDER};
pub use keys::StaticKeypair;
pub use noise::{HandshakeDriver, HandshakeOutcome, HandshakeStep, Role};
