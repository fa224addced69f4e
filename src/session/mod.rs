//! The duplex session (C5): wires the handshake driver, the secret-stream
//! pair, and the framing codec together behind a single actor task, and
//! exposes the three construction paths the reference design's
//! `autoStart`/`handshake`/bare-constructor options collapse into one of.

mod actor;
mod events;
mod options;

pub use actor::DuplexHandle;
pub use events::SessionEvent;
pub use options::{PreKeyed, SessionOptions};

use tokio::io::{AsyncRead, AsyncWrite, DuplexStream};
use tokio::sync::mpsc;

use crate::core::SessionError;
use crate::crypto::Role;
use crate::transport::Bridge;

/// A session whose actor has not been started yet.
///
/// Mirrors the reference design's `autoStart: false`, but as a distinct type
/// rather than a flag: there is no way to call [`DuplexHandle::write`] before
/// a transport exists, because there is no handle until [`Self::start`] is
/// called.
pub struct PendingSession {
    role: Role,
    options: SessionOptions,
}

impl PendingSession {
    /// Fix the role and options now; defer attaching a transport.
    pub fn new(role: Role, options: SessionOptions) -> Self {
        Self { role, options }
    }

    /// Attach `transport` and start the actor.
    pub fn start<T>(self, transport: T) -> Result<(DuplexHandle, mpsc::Receiver<SessionEvent>), SessionError>
    where
        T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        actor::spawn(self.role, transport, self.options)
    }
}

/// Entry points for an end-to-end encrypted duplex byte stream.
pub struct DuplexSession;

impl DuplexSession {
    /// Start a session immediately over a caller-supplied transport.
    pub fn connect<T>(
        role: Role,
        transport: T,
        options: SessionOptions,
    ) -> Result<(DuplexHandle, mpsc::Receiver<SessionEvent>), SessionError>
    where
        T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        actor::spawn(role, transport, options)
    }

    /// Start a session over a fresh in-memory loopback transport (C6),
    /// returning the raw far end alongside the handle so the caller can
    /// pipe bytes into it from outside.
    pub fn connect_bridge(
        role: Role,
        options: SessionOptions,
    ) -> Result<(DuplexHandle, mpsc::Receiver<SessionEvent>, DuplexStream), SessionError> {
        let (outer, inner) = Bridge::new();
        let (handle, events) = actor::spawn(role, inner, options)?;
        Ok((handle, events, outer))
    }

    /// Fix the role and options without starting the actor or attaching a
    /// transport (the reference design's `autoStart: false`).
    pub fn pending(role: Role, options: SessionOptions) -> PendingSession {
        PendingSession::new(role, options)
    }
}
