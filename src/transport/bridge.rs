//! In-memory bridge transport (C6).
//!
//! When a session is constructed without an external transport it creates a
//! pair of mirrored pipe endpoints instead: a [`tokio::io::DuplexStream`]
//! pair gives us exactly the "two ends, back-to-back queues, no locks"
//! structure the reference design calls for, plus `AsyncRead`/`AsyncWrite`
//! backpressure for free. One end is driven internally by the session; the
//! other — `rawStream` in the reference design — is returned to the caller
//! so they can pipe bytes into the loopback from outside.
use tokio::io::DuplexStream;

use crate::core::DEFAULT_BRIDGE_CAPACITY;

/// A loopback transport pair: `(outer, inner)`.
///
/// `inner` is attached to the session; `outer` is handed to the caller.
/// Writes to one side appear as reads on the other; dropping either half
/// propagates EOF/closure to the other, matching the reference design's
/// `destroy`/`end` broadcast semantics.
pub struct Bridge;

impl Bridge {
    /// Create a bridge with the default pipe capacity.
    pub fn new() -> (DuplexStream, DuplexStream) {
        Self::with_capacity(DEFAULT_BRIDGE_CAPACITY)
    }

    /// Create a bridge whose internal pipe buffers up to `capacity` bytes
    /// before a writer observes backpressure.
    pub fn with_capacity(capacity: usize) -> (DuplexStream, DuplexStream) {
        tokio::io::duplex(capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn writes_on_one_side_read_on_the_other() {
        let (mut outer, mut inner) = Bridge::new();
        outer.write_all(b"ping").await.unwrap();
        let mut buf = [0u8; 4];
        inner.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"ping");
    }

    #[tokio::test]
    async fn dropping_one_side_surfaces_eof_on_the_other() {
        let (outer, mut inner) = Bridge::new();
        drop(outer);
        let mut buf = Vec::new();
        let n = inner.read_to_end(&mut buf).await.unwrap();
        assert_eq!(n, 0);
    }
}
