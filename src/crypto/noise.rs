//! Handshake driver (C2).
//!
//! Wraps a `snow::HandshakeState` configured for the session's chosen Noise
//! pattern (`XX` by default) and drives it one message at a time, returning
//! frame-ready bytes and, once both sides are keyed, the derived transport
//! keys and handshake hash.

use snow::{Builder, HandshakeState};

use crate::core::{SessionError, HASH_SIZE, NOISE_MSG_MAX, PUBLIC_KEY_SIZE};
use crate::crypto::StaticKeypair;

/// Role fixed at session construction; the initiator sends the first
/// handshake message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Sends the first handshake message.
    Initiator,
    /// Responds to the initiator's first message.
    Responder,
}

/// Directional transport keys and transcript data captured when the
/// handshake completes.
#[derive(Clone)]
pub struct HandshakeOutcome {
    /// Key used for initiator → responder traffic.
    pub tx: [u8; 32],
    /// Key used for responder → initiator traffic.
    pub rx: [u8; 32],
    /// Noise transcript hash, bound into the session's stream identity.
    pub hash: [u8; HASH_SIZE],
    /// The peer's static public key, learned or confirmed during the handshake.
    pub remote_public_key: [u8; PUBLIC_KEY_SIZE],
}

/// The result of feeding one message through the driver.
pub struct HandshakeStep {
    /// Bytes to write to the wire, if this step produced an outbound message.
    pub data: Option<Vec<u8>>,
    /// Set once the handshake pattern has completed on this side.
    pub outcome: Option<HandshakeOutcome>,
}

/// Drives a Noise handshake for one session.
///
/// `send`/`recv` consume `self` by value on the step that would move the
/// underlying `snow::HandshakeState` into transport mode, mirroring the
/// two-phase lifetime split `snow` itself enforces; callers hold an
/// `Option<HandshakeDriver>` and `.take()` it on each step.
pub struct HandshakeDriver {
    state: HandshakeState,
    role: Role,
}

impl HandshakeDriver {
    /// Build a driver for `role`, using `pattern` (e.g. `"XX"`) and `local_keypair`.
    ///
    /// `remote_public` pre-authenticates the peer when the pattern and role
    /// call for a known responder static key (e.g. `IK`, `NK`); it is unused
    /// by the default `XX` pattern, where both static keys are exchanged
    /// in-band.
    pub fn new(
        role: Role,
        pattern: &str,
        local_keypair: &StaticKeypair,
        remote_public: Option<&[u8; PUBLIC_KEY_SIZE]>,
    ) -> Result<Self, SessionError> {
        let noise_params = format!("Noise_{pattern}_25519_ChaChaPoly_BLAKE2s")
            .parse()
            .map_err(|e: snow::Error| SessionError::BadHandshake(e.to_string()))?;
        let mut builder = Builder::new(noise_params).local_private_key(local_keypair.private_key());
        if let Some(rs) = remote_public {
            builder = builder.remote_public_key(rs);
        }
        let state = match role {
            Role::Initiator => builder.build_initiator(),
            Role::Responder => builder.build_responder(),
        }
        .map_err(|e| SessionError::BadHandshake(e.to_string()))?;

        Ok(Self { state, role })
    }

    /// This side's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Run one Noise "write" step, producing an outbound handshake message.
    ///
    /// Returns the frame payload and, if this write completed the pattern,
    /// the derived session outcome.
    pub fn send(mut self) -> Result<(Self, HandshakeStep), SessionError> {
        let mut buf = vec![0u8; NOISE_MSG_MAX];
        let len = self
            .state
            .write_message(&[], &mut buf)
            .map_err(|e| SessionError::BadHandshake(e.to_string()))?;
        buf.truncate(len);

        if self.state.is_handshake_finished() {
            let outcome = self.finish()?;
            Ok((self, HandshakeStep { data: Some(buf), outcome: Some(outcome) }))
        } else {
            Ok((self, HandshakeStep { data: Some(buf), outcome: None }))
        }
    }

    /// Run one Noise "read" step on an unframed inbound payload.
    ///
    /// If the pattern calls for a subsequent write step, it is performed
    /// internally and its output is returned alongside the read.
    pub fn recv(mut self, message: &[u8]) -> Result<(Self, HandshakeStep), SessionError> {
        let mut payload = vec![0u8; NOISE_MSG_MAX];
        self.state
            .read_message(message, &mut payload)
            .map_err(|e| SessionError::BadHandshake(e.to_string()))?;

        if self.state.is_handshake_finished() {
            let outcome = self.finish()?;
            return Ok((self, HandshakeStep { data: None, outcome: Some(outcome) }));
        }

        if self.state.is_my_turn() {
            self.send()
        } else {
            Ok((self, HandshakeStep { data: None, outcome: None }))
        }
    }

    fn finish(&mut self) -> Result<HandshakeOutcome, SessionError> {
        let mut hash = [0u8; HASH_SIZE];
        hash.copy_from_slice(self.state.get_handshake_hash());

        let mut remote_public_key = [0u8; PUBLIC_KEY_SIZE];
        remote_public_key.copy_from_slice(
            self.state
                .get_remote_static()
                .expect("remote static key known once handshake completes"),
        );

        let mut tx = [0u8; 32];
        let mut rx = [0u8; 32];
        let (initiator_key, responder_key) = self.state.dangerously_get_raw_split();
        match self.role {
            Role::Initiator => {
                tx.copy_from_slice(&initiator_key[..32]);
                rx.copy_from_slice(&responder_key[..32]);
            }
            Role::Responder => {
                tx.copy_from_slice(&responder_key[..32]);
                rx.copy_from_slice(&initiator_key[..32]);
            }
        }

        Ok(HandshakeOutcome { tx, rx, hash, remote_public_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(pattern: &str) -> (HandshakeOutcome, HandshakeOutcome) {
        let initiator_keys = StaticKeypair::generate();
        let responder_keys = StaticKeypair::generate();

        let initiator = HandshakeDriver::new(Role::Initiator, pattern, &initiator_keys, None).unwrap();
        let responder = HandshakeDriver::new(Role::Responder, pattern, &responder_keys, None).unwrap();

        // -> e (, s if IK/XX in later messages)
        let (initiator, step1) = initiator.send().unwrap();
        let (responder, step2) = responder.recv(step1.data.as_ref().unwrap()).unwrap();
        assert!(step2.outcome.is_none());

        // <- e, ee, s, es
        let (initiator, step3) = initiator.recv(step2.data.as_ref().unwrap()).unwrap();

        // -> s, se
        let (_, final_step) = responder.recv(step3.data.as_ref().unwrap()).unwrap();

        let initiator_outcome = step3.outcome.unwrap_or_else(|| final_step.outcome.clone().unwrap());
        let responder_outcome = final_step.outcome.unwrap();
        (initiator_outcome, responder_outcome)
    }

    #[test]
    fn xx_pattern_completes_and_matches_hash() {
        let (i, r) = roundtrip("XX");
        assert_eq!(i.hash, r.hash);
        assert_eq!(i.tx, r.rx);
        assert_eq!(i.rx, r.tx);
    }
}
