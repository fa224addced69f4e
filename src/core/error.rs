//! Error taxonomy.
//!
//! Every fatal condition in the handshake, header exchange, or data phase
//! reduces to one [`SessionError`] variant. The wording of the `BadHeader*`
//! messages is fixed: it is part of the wire-level contract peers rely on
//! when diagnosing interop failures.

use thiserror::Error;

/// Errors that can terminate a [`crate::session::DuplexSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The Noise handshake driver failed: bad MAC, wrong pattern bytes, an
    /// unsupported pattern string, or a malformed DH element.
    #[error("Noise handshake failed: {0}")]
    BadHandshake(String),

    /// The first post-handshake frame did not have length 56.
    #[error("Invalid header message received")]
    BadHeaderLength,

    /// The first post-handshake frame's 32-byte id prefix did not match the
    /// derived expected stream id.
    #[error("Invalid header received")]
    BadHeaderId,

    /// A data-phase frame was shorter than [`crate::core::AEAD_OVERHEAD`]
    /// bytes, or AEAD verification failed.
    #[error("bad data frame: {0}")]
    BadDataFrame(#[source] chacha20poly1305::aead::Error),

    /// User- or transport-initiated teardown.
    #[error("Stream destroyed")]
    Destroyed,

    /// The underlying transport returned an I/O error.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
}
