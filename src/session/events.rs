//! Observable session events.
//!
//! The reference design's event emitter (`open`, `handshake`, `data`, `end`,
//! `error`, `close`) maps to a single tagged-variant channel: callers
//! `recv()` a `SessionEvent` at a time off the receiver returned alongside a
//! session's handle, with delivery in the same relative order the emitter
//! would have fired them.

use bytes::Bytes;

use crate::core::{SessionError, HASH_SIZE, PUBLIC_KEY_SIZE};

/// One observable occurrence on a [`crate::session::DuplexHandle`].
#[derive(Debug)]
pub enum SessionEvent {
    /// Keys derived, about to emit the header frame. Fires at most once,
    /// no later than `Open`.
    Handshake {
        /// This side's public key (resolved or generated at construction).
        public_key: [u8; PUBLIC_KEY_SIZE],
        /// The peer's public key, learned or confirmed by the handshake.
        remote_public_key: [u8; PUBLIC_KEY_SIZE],
        /// The Noise transcript hash.
        handshake_hash: [u8; HASH_SIZE],
    },
    /// Ready to emit/receive plaintext. Fires exactly once, strictly after
    /// `Handshake` and strictly before the first `Data`.
    Open,
    /// One inbound application-level write, verbatim.
    Data(Bytes),
    /// Inbound end-of-stream: no more `Data` will follow.
    End,
    /// Terminal: no further events follow.
    Close,
    /// A fatal error. Always followed by `Close`.
    Error(SessionError),
}
