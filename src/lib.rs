//! # noisestream
//!
//! An end-to-end encrypted duplex byte stream over an arbitrary transport.
//!
//! A session runs a Noise `XX` handshake (mutual authentication, forward
//! secrecy), then switches to a symmetric secret-stream AEAD for the rest of
//! its life: every application write becomes one authenticated, framed
//! ciphertext record. Two peers that agree on a transport — a TCP socket, a
//! Unix pipe, or the in-memory [`transport::Bridge`] this crate provides for
//! testing — and exchange public keys out of band end up with a channel
//! that is confidential, tamper-evident, and ordered.
//!
//! ## Modules
//!
//! - [`core`]: wire-format constants and the [`core::SessionError`] taxonomy
//! - [`crypto`]: long-term keys, the handshake driver (Noise), and
//!   stream-identity derivation
//! - [`stream`]: the keyed secret-stream AEAD pair used once the handshake
//!   completes
//! - [`transport`]: the length-prefixed framing codec and the in-memory
//!   bridge transport
//! - [`session`]: the actor that ties the above together into a
//!   [`session::DuplexSession`]
//!
//! ## Example
//!
//! ```no_run
//! use noisestream::prelude::*;
//!
//! # async fn example() -> Result<(), SessionError> {
//! let (a_handle, _a_events, mut a_raw) =
//!     DuplexSession::connect_bridge(Role::Initiator, SessionOptions::new())?;
//! let (_b_handle, mut b_events, mut b_raw) =
//!     DuplexSession::connect_bridge(Role::Responder, SessionOptions::new())?;
//!
//! // Splice the two bridges together so each session's raw half feeds the other.
//! tokio::spawn(async move {
//!     let _ = tokio::io::copy_bidirectional(&mut a_raw, &mut b_raw).await;
//! });
//!
//! a_handle.write(b"hello".to_vec()).await?;
//! while let Some(event) = b_events.recv().await {
//!     if let SessionEvent::Data(payload) = event {
//!         assert_eq!(&payload[..], b"hello");
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod core;
pub mod crypto;
pub mod session;
pub mod stream;
pub mod transport;

/// Convenience re-export of the crate's public surface.
pub mod prelude {
    pub use crate::core::SessionError;
    pub use crate::crypto::{HandshakeOutcome, Role, StaticKeypair};
    pub use crate::session::{DuplexHandle, DuplexSession, PendingSession, PreKeyed, SessionEvent, SessionOptions};
    pub use crate::transport::Bridge;
}
