//! Wire-format constants fixed by the protocol.
//!
//! These values MUST NOT change: they are load-bearing for interop between
//! independently-built peers.

// =============================================================================
// CRYPTOGRAPHIC SIZES
// =============================================================================

/// Cryptographic hash output size (BLAKE2s, also the Noise handshake hash size).
pub const HASH_SIZE: usize = 32;

/// X25519 public key size.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// X25519 private key size.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Poly1305 authentication tag size.
pub const MAC_SIZE: usize = 16;

/// Per-data-frame AEAD overhead: one clear tag byte plus the Poly1305 MAC.
pub const AEAD_OVERHEAD: usize = 1 + MAC_SIZE;

// =============================================================================
// SECRET-STREAM / STREAM-IDENTITY (C3, C4)
// =============================================================================

/// Size of the secret-stream header emitted by the encryptor at construction.
pub const STREAM_HEADER_SIZE: usize = 24;

/// Size of the stream-identity tag that precedes the header on the wire.
pub const STREAM_ID_SIZE: usize = 32;

/// Combined size of the one-time header frame payload: `stream_id ∥ header`.
pub const HEADER_FRAME_PAYLOAD_SIZE: usize = STREAM_ID_SIZE + STREAM_HEADER_SIZE;

/// Direction byte used when deriving the initiator's stream-id namespace.
pub const NS_DIR_INITIATOR: u8 = 0x00;

/// Direction byte used when deriving the responder's stream-id namespace.
pub const NS_DIR_RESPONDER: u8 = 0x01;

/// Namespace seed string for stream-identity derivation, fixed for wire compatibility.
pub const STREAM_ID_NAMESPACE_SEED: &[u8] = b"hyperswarm/secret-stream";

// =============================================================================
// FRAMING (C1)
// =============================================================================

/// Length prefix width in bytes (3-byte little-endian, so frame bodies are `< 2^24`).
pub const LENGTH_PREFIX_SIZE: usize = 3;

/// Exclusive upper bound on a single frame's payload length (`2^24`).
pub const MAX_FRAME_LEN: u32 = 1 << 24;

// =============================================================================
// HANDSHAKE (C2)
// =============================================================================

/// Default Noise pattern used when a session does not request another one.
pub const DEFAULT_NOISE_PATTERN: &str = "XX";

/// Size of a scratch buffer used for unframed Noise handshake messages.
pub const NOISE_MSG_MAX: usize = 65535;

// =============================================================================
// BRIDGE TRANSPORT (C6)
// =============================================================================

/// Default capacity of the in-memory bridge transport's internal pipe.
pub const DEFAULT_BRIDGE_CAPACITY: usize = 64 * 1024;
