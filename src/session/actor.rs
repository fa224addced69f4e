//! The session actor: the single task that owns a transport and all mutable
//! session state (C5).
//!
//! Everything that touches the handshake driver, the secret-stream pair, or
//! the transport happens inside [`Actor::run`]. The public [`DuplexHandle`]
//! only ever talks to it through a command channel, so there is no mutex to
//! get wrong: mutual exclusion falls out of the actor owning its state and
//! processing one command or one inbound read at a time.

use std::collections::VecDeque;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};

use crate::core::{
    SessionError, HASH_SIZE, HEADER_FRAME_PAYLOAD_SIZE, PUBLIC_KEY_SIZE, STREAM_HEADER_SIZE,
    STREAM_ID_SIZE,
};
use crate::crypto::{stream_id, HandshakeDriver, HandshakeOutcome, Role, StaticKeypair};
use crate::stream::{Pull, Push};
use crate::transport::{encode_frame, FrameParser};

use super::events::SessionEvent;
use super::options::SessionOptions;

const COMMAND_CHANNEL_CAPACITY: usize = 64;
const EVENT_CHANNEL_CAPACITY: usize = 64;
const READ_BUF_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Handshaking,
    AwaitingHeader,
    Established,
    Closed,
}

enum Command {
    Write(Vec<u8>, oneshot::Sender<Result<(), SessionError>>),
    End,
    Destroy(Option<SessionError>),
}

/// Handle to a running [`crate::session::DuplexSession`].
///
/// Cloning is intentionally not supported: a session has exactly one owner
/// the way the actor task has exactly one command channel sender per logical
/// caller. Share it behind an `Arc` if more than one task needs it.
pub struct DuplexHandle {
    cmd_tx: mpsc::Sender<Command>,
    public_key: [u8; PUBLIC_KEY_SIZE],
}

impl DuplexHandle {
    /// This side's long-term public key (resolved or generated at construction).
    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.public_key
    }

    /// Allocate a plaintext buffer of `len` bytes for an upcoming [`Self::write`].
    ///
    /// The reference design's `alloc`/`write` pairing exists to let a caller
    /// fill a buffer in place and then hand it off without a copy, keyed off
    /// pointer identity. Rust's ownership model gets the same property for
    /// free: `write` takes the `Vec<u8>` by value, so nothing is copied
    /// between `alloc` and `write` either way. Kept for API parity with
    /// callers used to pre-sizing their buffers.
    pub fn alloc(&self, len: usize) -> Vec<u8> {
        vec![0u8; len]
    }

    /// Encrypt and send one application-level write.
    ///
    /// Resolves once the frame has been handed to the transport. If the
    /// handshake and header exchange are still in progress, the write is
    /// queued and flushed in order once both complete.
    pub async fn write(&self, plaintext: Vec<u8>) -> Result<(), SessionError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Write(plaintext, ack_tx))
            .await
            .map_err(|_| SessionError::Destroyed)?;
        ack_rx.await.map_err(|_| SessionError::Destroyed)?
    }

    /// Signal end-of-stream on the outbound transport half. This is a
    /// transport-level half-close, not a cryptographic operation.
    pub async fn end(&self) {
        let _ = self.cmd_tx.send(Command::End).await;
    }

    /// Tear the session down. Idempotent; safe to call more than once or
    /// after the session has already closed on its own.
    pub async fn destroy(&self, err: Option<SessionError>) {
        let _ = self.cmd_tx.send(Command::Destroy(err)).await;
    }
}

/// Construct and spawn the actor task, returning the handle and event
/// receiver pair callers interact with.
pub(crate) fn spawn<T>(
    role: Role,
    transport: T,
    mut options: SessionOptions,
) -> Result<(DuplexHandle, mpsc::Receiver<SessionEvent>), SessionError>
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let initial_data = options.data.take();
    let ended = options.ended;
    let local_keypair = options.key_pair.take().unwrap_or_else(StaticKeypair::generate);
    let local_public_key = *local_keypair.public_key();
    if let Some(hint) = options.public_key {
        debug_assert_eq!(hint, local_public_key, "public_key hint must match the resolved key pair");
    }

    let (handshake, prekeyed) = match options.handshake {
        Some(pre) => (
            None,
            Some(HandshakeOutcome {
                tx: pre.tx,
                rx: pre.rx,
                hash: pre.hash,
                remote_public_key: pre.remote_public_key,
            }),
        ),
        None => {
            // `remote_public` is left unset here even when the caller supplied
            // a hint: for the default `XX` pattern the peer's static key isn't
            // known until the handshake itself reveals it, and a pre-declared
            // remote static would conflict with that message pattern. The
            // hint is instead checked against the handshake's outcome below.
            let driver = HandshakeDriver::new(role, &options.pattern, &local_keypair, None)?;
            (Some(driver), None)
        }
    };

    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let actor = Actor {
        role,
        transport,
        phase: Phase::Handshaking,
        frame_parser: FrameParser::new(),
        handshake,
        prekeyed,
        push: None,
        pull: None,
        pending_rx_key: None,
        local_public_key,
        expected_remote_public_key: options.remote_public_key,
        handshake_hash: None,
        pending_writes: VecDeque::new(),
        events: events_tx,
        cmd_rx,
    };

    tokio::spawn(actor.run(initial_data, ended));

    Ok((DuplexHandle { cmd_tx, public_key: local_public_key }, events_rx))
}

struct Actor<T> {
    role: Role,
    transport: T,
    phase: Phase,
    frame_parser: FrameParser,
    handshake: Option<HandshakeDriver>,
    prekeyed: Option<HandshakeOutcome>,
    push: Option<Push>,
    pull: Option<Pull>,
    pending_rx_key: Option<[u8; 32]>,
    local_public_key: [u8; PUBLIC_KEY_SIZE],
    expected_remote_public_key: Option<[u8; PUBLIC_KEY_SIZE]>,
    handshake_hash: Option<[u8; HASH_SIZE]>,
    pending_writes: VecDeque<(Vec<u8>, oneshot::Sender<Result<(), SessionError>>)>,
    events: mpsc::Sender<SessionEvent>,
    cmd_rx: mpsc::Receiver<Command>,
}

impl<T> Actor<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn run(mut self, initial_data: Option<Vec<u8>>, ended: bool) {
        if let Err(e) = self.on_start().await {
            self.fatal(e).await;
            return;
        }

        if let Some(data) = initial_data {
            if !data.is_empty() {
                if let Err(e) = self.on_inbound(data).await {
                    self.fatal(e).await;
                    return;
                }
            }
        }
        if ended {
            self.on_transport_eof().await;
        }
        if self.phase == Phase::Closed {
            return;
        }

        let mut read_buf = vec![0u8; READ_BUF_SIZE];
        loop {
            tokio::select! {
                biased;

                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(Command::Write(data, ack)) => self.handle_write(data, ack).await,
                        Some(Command::End) => {
                            let _ = self.transport.shutdown().await;
                        }
                        Some(Command::Destroy(err)) => match err {
                            Some(e) => self.fatal(e).await,
                            None => self.close_quietly().await,
                        },
                        None => self.close_quietly().await,
                    }
                }

                res = self.transport.read(&mut read_buf) => {
                    match res {
                        Ok(0) => self.on_transport_eof().await,
                        Ok(n) => {
                            if let Err(e) = self.on_inbound(read_buf[..n].to_vec()).await {
                                self.fatal(e).await;
                            }
                        }
                        Err(e) => self.fatal(SessionError::Io(e)).await,
                    }
                }
            }

            if self.phase == Phase::Closed {
                break;
            }
        }
    }

    async fn on_start(&mut self) -> Result<(), SessionError> {
        if let Some(outcome) = self.prekeyed.take() {
            return self.on_keyed(outcome).await;
        }
        let Some(driver) = self.handshake.take() else {
            return Ok(());
        };
        if driver.role() != Role::Initiator {
            self.handshake = Some(driver);
            return Ok(());
        }
        let (driver, step) = driver.send()?;
        if let Some(data) = step.data {
            self.write_raw(encode_frame(&data)).await?;
        }
        match step.outcome {
            Some(outcome) => self.on_keyed(outcome).await,
            None => {
                self.handshake = Some(driver);
                Ok(())
            }
        }
    }

    async fn handle_write(&mut self, data: Vec<u8>, ack: oneshot::Sender<Result<(), SessionError>>) {
        if self.push.is_some() {
            let result = self.emit_data_frame(data).await;
            match result {
                Ok(()) => {
                    let _ = ack.send(Ok(()));
                }
                Err(e) => {
                    let _ = ack.send(Err(SessionError::Destroyed));
                    self.fatal(e).await;
                }
            }
        } else if self.phase == Phase::Closed {
            let _ = ack.send(Err(SessionError::Destroyed));
        } else {
            self.pending_writes.push_back((data, ack));
        }
    }

    async fn on_inbound(&mut self, chunk: Vec<u8>) -> Result<(), SessionError> {
        let frames = self.frame_parser.feed(&chunk, |_| {});
        for frame in frames {
            self.on_frame(frame.as_slice()).await?;
            if self.phase == Phase::Closed {
                break;
            }
        }
        Ok(())
    }

    async fn on_frame(&mut self, payload: &[u8]) -> Result<(), SessionError> {
        match self.phase {
            Phase::Handshaking => self.on_handshake_frame(payload).await,
            Phase::AwaitingHeader => self.on_header_frame(payload),
            Phase::Established => self.on_data_frame(payload).await,
            Phase::Closed => Ok(()),
        }
    }

    async fn on_handshake_frame(&mut self, payload: &[u8]) -> Result<(), SessionError> {
        let driver = self
            .handshake
            .take()
            .expect("handshake driver present while Phase::Handshaking");
        let (driver, step) = driver.recv(payload)?;
        if let Some(data) = step.data {
            self.write_raw(encode_frame(&data)).await?;
        }
        match step.outcome {
            Some(outcome) => self.on_keyed(outcome).await,
            None => {
                self.handshake = Some(driver);
                Ok(())
            }
        }
    }

    async fn on_keyed(&mut self, outcome: HandshakeOutcome) -> Result<(), SessionError> {
        if let Some(expected) = self.expected_remote_public_key {
            if expected != outcome.remote_public_key {
                return Err(SessionError::BadHandshake(
                    "remote static key did not match the expected public key".into(),
                ));
            }
        }

        self.handshake_hash = Some(outcome.hash);
        let is_initiator = self.role == Role::Initiator;

        let (push, header) = Push::new(&outcome.tx);
        self.push = Some(push);
        self.pending_rx_key = Some(outcome.rx);

        let _ = self
            .events
            .send(SessionEvent::Handshake {
                public_key: self.local_public_key,
                remote_public_key: outcome.remote_public_key,
                handshake_hash: outcome.hash,
            })
            .await;

        let my_id = stream_id(&outcome.hash, is_initiator);
        let mut header_payload = Vec::with_capacity(HEADER_FRAME_PAYLOAD_SIZE);
        header_payload.extend_from_slice(&my_id);
        header_payload.extend_from_slice(&header);
        self.write_raw(encode_frame(&header_payload)).await?;

        self.phase = Phase::AwaitingHeader;
        let _ = self.events.send(SessionEvent::Open).await;
        self.flush_pending_writes().await
    }

    fn on_header_frame(&mut self, payload: &[u8]) -> Result<(), SessionError> {
        if payload.len() != HEADER_FRAME_PAYLOAD_SIZE {
            return Err(SessionError::BadHeaderLength);
        }
        let (id, header) = payload.split_at(STREAM_ID_SIZE);
        let hash = self.handshake_hash.expect("hash set before Phase::AwaitingHeader");
        let is_initiator = self.role == Role::Initiator;
        let expected = stream_id(&hash, !is_initiator);
        if id != expected {
            return Err(SessionError::BadHeaderId);
        }

        let rx_key = self
            .pending_rx_key
            .take()
            .expect("rx key set when the header frame was emitted");
        let header: [u8; STREAM_HEADER_SIZE] = header.try_into().expect("length checked above");
        self.pull = Some(Pull::init(&rx_key, &header));
        self.phase = Phase::Established;
        Ok(())
    }

    async fn on_data_frame(&mut self, payload: &[u8]) -> Result<(), SessionError> {
        // `Pull::open` rejects anything shorter than the AEAD overhead on
        // its own; no separate length check is needed here.
        let pull = self.pull.as_mut().expect("pull ready while Phase::Established");
        let (_tag, plaintext) = pull.open(payload)?;
        let _ = self.events.send(SessionEvent::Data(Bytes::from(plaintext))).await;
        Ok(())
    }

    async fn emit_data_frame(&mut self, plaintext: Vec<u8>) -> Result<(), SessionError> {
        let body = {
            let push = self.push.as_mut().expect("push ready");
            push.seal(0, &plaintext)?
        };
        self.write_raw(encode_frame(&body)).await
    }

    async fn flush_pending_writes(&mut self) -> Result<(), SessionError> {
        while let Some((data, ack)) = self.pending_writes.pop_front() {
            match self.emit_data_frame(data).await {
                Ok(()) => {
                    let _ = ack.send(Ok(()));
                }
                Err(e) => {
                    let _ = ack.send(Err(SessionError::Destroyed));
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    async fn write_raw(&mut self, wire: Vec<u8>) -> Result<(), SessionError> {
        self.transport.write_all(&wire).await.map_err(SessionError::Io)
    }

    async fn on_transport_eof(&mut self) {
        if self.phase == Phase::Closed {
            return;
        }
        // A clean transport close is not itself an error: it surfaces as a
        // quiet end/close, matching an explicit destroy(None).
        self.phase = Phase::Closed;
        self.fail_pending_writes();
        let _ = self.events.send(SessionEvent::End).await;
        let _ = self.events.send(SessionEvent::Close).await;
    }

    async fn fatal(&mut self, err: SessionError) {
        if self.phase == Phase::Closed {
            return;
        }
        self.phase = Phase::Closed;
        self.fail_pending_writes();
        let _ = self.events.send(SessionEvent::Error(err)).await;
        let _ = self.events.send(SessionEvent::Close).await;
    }

    async fn close_quietly(&mut self) {
        if self.phase == Phase::Closed {
            return;
        }
        self.phase = Phase::Closed;
        self.fail_pending_writes();
        let _ = self.events.send(SessionEvent::Close).await;
    }

    fn fail_pending_writes(&mut self) {
        while let Some((_, ack)) = self.pending_writes.pop_front() {
            let _ = ack.send(Err(SessionError::Destroyed));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};

    use tokio::io::{DuplexStream, ReadBuf};

    use super::*;
    use crate::session::{DuplexSession, PreKeyed};
    use crate::transport::Bridge;

    /// Wraps one half of a duplex pipe, mirroring every byte written through
    /// it into a shared buffer so a test can inspect what actually crossed
    /// the wire.
    struct Tap<T> {
        inner: T,
        sink: Arc<Mutex<Vec<u8>>>,
    }

    impl<T: AsyncRead + Unpin> AsyncRead for Tap<T> {
        fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<std::io::Result<()>> {
            Pin::new(&mut self.get_mut().inner).poll_read(cx, buf)
        }
    }

    impl<T: AsyncWrite + Unpin> AsyncWrite for Tap<T> {
        fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
            let this = self.get_mut();
            let poll = Pin::new(&mut this.inner).poll_write(cx, buf);
            if let Poll::Ready(Ok(n)) = &poll {
                this.sink.lock().unwrap().extend_from_slice(&buf[..*n]);
            }
            poll
        }

        fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Pin::new(&mut self.get_mut().inner).poll_flush(cx)
        }

        fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
        }
    }

    /// Connect two sessions directly over one bridge: `a` is the initiator on
    /// one end, `b` the responder on the other.
    fn wire() -> (
        (DuplexHandle, mpsc::Receiver<SessionEvent>),
        (DuplexHandle, mpsc::Receiver<SessionEvent>),
    ) {
        let (a_transport, b_transport) = Bridge::new();
        let a = DuplexSession::connect(Role::Initiator, a_transport, SessionOptions::new()).unwrap();
        let b = DuplexSession::connect(Role::Responder, b_transport, SessionOptions::new()).unwrap();
        (a, b)
    }

    async fn expect_handshake(
        events: &mut mpsc::Receiver<SessionEvent>,
    ) -> ([u8; PUBLIC_KEY_SIZE], [u8; PUBLIC_KEY_SIZE]) {
        loop {
            match events.recv().await.expect("events channel closed before handshake") {
                SessionEvent::Handshake { public_key, remote_public_key, .. } => {
                    return (public_key, remote_public_key);
                }
                SessionEvent::Open => continue,
                other => panic!("unexpected event before handshake: {other:?}"),
            }
        }
    }

    async fn expect_data(events: &mut mpsc::Receiver<SessionEvent>) -> Vec<u8> {
        loop {
            match events.recv().await.expect("events channel closed before data") {
                SessionEvent::Data(bytes) => return bytes.to_vec(),
                SessionEvent::Open => continue,
                other => panic!("unexpected event waiting for data: {other:?}"),
            }
        }
    }

    async fn expect_error(events: &mut mpsc::Receiver<SessionEvent>) -> SessionError {
        loop {
            match events.recv().await.expect("events channel closed before error") {
                SessionEvent::Error(e) => return e,
                SessionEvent::Close => panic!("Close arrived without a preceding Error"),
                _ => continue,
            }
        }
    }

    fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
        needle.len() <= haystack.len() && haystack.windows(needle.len()).any(|w| w == needle)
    }

    async fn relay_one_byte_at_a_time(a: DuplexStream, b: DuplexStream) {
        let (mut a_read, mut a_write) = tokio::io::split(a);
        let (mut b_read, mut b_write) = tokio::io::split(b);
        let a_to_b = async move {
            let mut byte = [0u8; 1];
            while let Ok(n) = a_read.read(&mut byte).await {
                if n == 0 || b_write.write_all(&byte).await.is_err() {
                    break;
                }
            }
        };
        let b_to_a = async move {
            let mut byte = [0u8; 1];
            while let Ok(n) = b_read.read(&mut byte).await {
                if n == 0 || a_write.write_all(&byte).await.is_err() {
                    break;
                }
            }
        };
        tokio::join!(a_to_b, b_to_a);
    }

    #[tokio::test]
    async fn s1_mutual_authentication() {
        let ((a, mut a_events), (b, mut b_events)) = wire();
        let (a_pub, a_remote) = expect_handshake(&mut a_events).await;
        let (b_pub, b_remote) = expect_handshake(&mut b_events).await;
        assert_eq!(&a_pub, a.public_key());
        assert_eq!(&b_pub, b.public_key());
        assert_eq!(a_remote, b_pub);
        assert_eq!(b_remote, a_pub);
    }

    #[tokio::test]
    async fn s2_ciphertext_carries_no_plaintext_substring() {
        let sink = Arc::new(Mutex::new(Vec::new()));
        let (a_transport, b_transport) = Bridge::new();
        let tapped = Tap { inner: a_transport, sink: sink.clone() };
        let (a, mut a_events) = DuplexSession::connect(Role::Initiator, tapped, SessionOptions::new()).unwrap();
        let (_b, mut b_events) = DuplexSession::connect(Role::Responder, b_transport, SessionOptions::new()).unwrap();
        expect_handshake(&mut a_events).await;
        expect_handshake(&mut b_events).await;

        let plaintext = b"super secret plaintext payload".to_vec();
        a.write(plaintext.clone()).await.unwrap();
        assert_eq!(expect_data(&mut b_events).await, plaintext);

        let wire_bytes = sink.lock().unwrap().clone();
        assert!(!contains_subslice(&wire_bytes, &plaintext));
    }

    #[tokio::test]
    async fn s3_one_byte_chunking_preserves_frame_boundaries() {
        let (a_outer, a_inner) = Bridge::new();
        let (b_outer, b_inner) = Bridge::new();
        let (a, mut a_events) = DuplexSession::connect(Role::Initiator, a_inner, SessionOptions::new()).unwrap();
        let (_b, mut b_events) = DuplexSession::connect(Role::Responder, b_inner, SessionOptions::new()).unwrap();
        tokio::spawn(relay_one_byte_at_a_time(a_outer, b_outer));

        expect_handshake(&mut a_events).await;
        expect_handshake(&mut b_events).await;

        a.write(b"hello world".to_vec()).await.unwrap();
        assert_eq!(expect_data(&mut b_events).await, b"hello world");

        let large: Vec<u8> = (0..40_000u32).map(|i| (i % 251) as u8).collect();
        a.write(large.clone()).await.unwrap();
        assert_eq!(expect_data(&mut b_events).await, large);
    }

    #[tokio::test]
    async fn s4_deferred_start_replays_buffered_head() {
        let (a_transport, mut b_transport) = Bridge::new();
        let (a, mut a_events) = DuplexSession::connect(Role::Initiator, a_transport, SessionOptions::new()).unwrap();

        // The initiator's first handshake message is already sitting in the
        // pipe. Read it out before `b`'s session (and actor task) exist, to
        // stand in for bytes that arrived on a transport before a caller was
        // ready to start a session for them.
        let mut head = vec![0u8; 4096];
        let n = b_transport.read(&mut head).await.unwrap();
        head.truncate(n);
        assert!(n > 0, "initiator's first handshake message should already be buffered");

        let pending = DuplexSession::pending(Role::Responder, SessionOptions::new().data(head));
        let (b, mut b_events) = pending.start(b_transport).unwrap();

        expect_handshake(&mut a_events).await;
        expect_handshake(&mut b_events).await;

        a.write(b"after deferred start".to_vec()).await.unwrap();
        assert_eq!(expect_data(&mut b_events).await, b"after deferred start");

        b.write(b"reply".to_vec()).await.unwrap();
        assert_eq!(expect_data(&mut a_events).await, b"reply");
    }

    #[tokio::test]
    async fn s5_garbage_bytes_during_handshake_are_fatal() {
        let (a_transport, mut b_transport) = Bridge::new();
        let (_a, mut a_events) = DuplexSession::connect(Role::Initiator, a_transport, SessionOptions::new()).unwrap();

        b_transport.write_all(&[0u8; 65_536]).await.unwrap();
        assert!(matches!(expect_error(&mut a_events).await, SessionError::BadHandshake(_) | SessionError::Io(_)));
    }

    #[tokio::test]
    async fn s5_malformed_framed_handshake_message_is_fatal() {
        let (a_transport, mut b_transport) = Bridge::new();
        let (_a, mut a_events) = DuplexSession::connect(Role::Initiator, a_transport, SessionOptions::new()).unwrap();

        b_transport.write_all(&encode_frame(b"GARBAGEGARBAGEGA")).await.unwrap();
        assert!(matches!(expect_error(&mut a_events).await, SessionError::BadHandshake(_)));
    }

    fn prekeyed_options() -> SessionOptions {
        SessionOptions::new().handshake(PreKeyed {
            public_key: [1u8; PUBLIC_KEY_SIZE],
            remote_public_key: [2u8; PUBLIC_KEY_SIZE],
            hash: [0x7Au8; HASH_SIZE],
            tx: [3u8; 32],
            rx: [4u8; 32],
        })
    }

    #[tokio::test]
    async fn s6_wrong_length_header_frame_is_fatal() {
        let (a_transport, mut b_transport) = Bridge::new();
        let (_a, mut a_events) = DuplexSession::connect(Role::Initiator, a_transport, prekeyed_options()).unwrap();
        expect_handshake(&mut a_events).await;

        b_transport.write_all(&encode_frame(&[0u8; 255])).await.unwrap();
        assert!(matches!(expect_error(&mut a_events).await, SessionError::BadHeaderLength));
    }

    #[tokio::test]
    async fn s6_wrong_stream_id_header_frame_is_fatal() {
        let (a_transport, mut b_transport) = Bridge::new();
        let (_a, mut a_events) = DuplexSession::connect(Role::Initiator, a_transport, prekeyed_options()).unwrap();
        expect_handshake(&mut a_events).await;

        let mut bogus = vec![0xFFu8; STREAM_ID_SIZE];
        bogus.extend_from_slice(&[0u8; STREAM_HEADER_SIZE]);
        b_transport.write_all(&encode_frame(&bogus)).await.unwrap();
        assert!(matches!(expect_error(&mut a_events).await, SessionError::BadHeaderId));
    }

    #[tokio::test]
    async fn s7_bulk_chunked_throughput() {
        let (a_transport, b_transport) = Bridge::with_capacity(1 << 20);
        let (a, mut a_events) = DuplexSession::connect(Role::Initiator, a_transport, SessionOptions::new()).unwrap();
        let (_b, mut b_events) = DuplexSession::connect(Role::Responder, b_transport, SessionOptions::new()).unwrap();
        expect_handshake(&mut a_events).await;
        expect_handshake(&mut b_events).await;

        // Stands in for the spec's 1 GiB bulk-throughput scenario at a size a
        // unit test can carry: 128 chunks of 64 KiB each.
        const CHUNK: usize = 64 * 1024;
        const CHUNKS: usize = 128;

        let mut total = 0usize;
        for i in 0..CHUNKS {
            let chunk: Vec<u8> = (0..CHUNK).map(|b| ((b + i) % 256) as u8).collect();
            a.write(chunk.clone()).await.unwrap();
            assert_eq!(expect_data(&mut b_events).await, chunk);
            total += chunk.len();
        }
        assert_eq!(total, CHUNK * CHUNKS);
    }
}
