//! Stream-identity binding (C4).
//!
//! Derives the 32-byte per-direction tag exchanged alongside the secret-stream
//! header, and exposes the same derivation as a public static helper so
//! callers can pre-bind a stream identity for higher-layer routing.

use std::sync::LazyLock;

use blake2::digest::{Digest, Mac};
use blake2::{Blake2s256, Blake2sMac256};

use crate::core::{HASH_SIZE, NS_DIR_INITIATOR, NS_DIR_RESPONDER, STREAM_ID_NAMESPACE_SEED};

fn keyed_hash(key: &[u8], data: &[u8]) -> [u8; HASH_SIZE] {
    let mut mac = <Blake2sMac256 as Mac>::new_from_slice(key).expect("key within Blake2s256 bound");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

fn unkeyed_hash(data: &[u8]) -> [u8; HASH_SIZE] {
    let mut hasher = Blake2s256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// `NS = H("hyperswarm/secret-stream")`, fixed for wire compatibility.
static NS: LazyLock<[u8; HASH_SIZE]> = LazyLock::new(|| unkeyed_hash(STREAM_ID_NAMESPACE_SEED));

/// `NS_initiator = H(0x00 ∥ NS)`.
pub static STREAM_NAMESPACE_INITIATOR: LazyLock<[u8; HASH_SIZE]> =
    LazyLock::new(|| unkeyed_hash(&prefixed(NS_DIR_INITIATOR, &NS)));

/// `NS_responder = H(0x01 ∥ NS)`.
pub static STREAM_NAMESPACE_RESPONDER: LazyLock<[u8; HASH_SIZE]> =
    LazyLock::new(|| unkeyed_hash(&prefixed(NS_DIR_RESPONDER, &NS)));

fn prefixed(dir: u8, ns: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE + 1] {
    let mut out = [0u8; HASH_SIZE + 1];
    out[0] = dir;
    out[1..].copy_from_slice(ns);
    out
}

/// Derive this side's stream id: `H(handshake_hash, NS_role)`, a 32-byte
/// keyed hash with `handshake_hash` as the key.
///
/// `is_initiator` selects which namespace constant is hashed as the message.
pub fn stream_id(handshake_hash: &[u8; HASH_SIZE], is_initiator: bool) -> [u8; HASH_SIZE] {
    let ns = if is_initiator {
        &*STREAM_NAMESPACE_INITIATOR
    } else {
        &*STREAM_NAMESPACE_RESPONDER
    };
    keyed_hash(handshake_hash, ns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initiator_and_responder_ids_differ() {
        let hash = [0x42u8; HASH_SIZE];
        let a = stream_id(&hash, true);
        let b = stream_id(&hash, false);
        assert_ne!(a, b);
    }

    #[test]
    fn derivation_is_deterministic() {
        let hash = [0x11u8; HASH_SIZE];
        assert_eq!(stream_id(&hash, true), stream_id(&hash, true));
    }

    #[test]
    fn depends_on_handshake_hash() {
        let a = stream_id(&[0x01; HASH_SIZE], true);
        let b = stream_id(&[0x02; HASH_SIZE], true);
        assert_ne!(a, b);
    }
}
