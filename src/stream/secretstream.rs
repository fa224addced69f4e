//! Keyed Push/Pull halves of the secret-stream AEAD.
//!
//! Built on `chacha20poly1305`'s counter-based streaming AEAD
//! (`EncryptorBE32`/`DecryptorBE32`) over XChaCha20-Poly1305. The 24-byte
//! "header" exchanged once after the handshake is a random 19-byte nonce
//! prefix padded with 5 reserved zero bytes; the streaming construction
//! appends its own 32-bit big-endian block counter to make up the cipher's
//! full 24-byte nonce.

use chacha20poly1305::aead::stream::{DecryptorBE32, EncryptorBE32};
use chacha20poly1305::aead::{KeyInit, Payload};
use chacha20poly1305::XChaCha20Poly1305;

use crate::core::{random_bytes, SessionError, STREAM_HEADER_SIZE};

const NONCE_PREFIX_SIZE: usize = 19;

/// Encrypting half of the secret-stream pair (the "Push" side).
pub struct Push {
    inner: EncryptorBE32<XChaCha20Poly1305>,
}

impl Push {
    /// Key the encryptor and emit the 24-byte header the peer needs to
    /// construct a matching [`Pull`].
    pub fn new(key: &[u8; 32]) -> (Self, [u8; STREAM_HEADER_SIZE]) {
        let mut header = [0u8; STREAM_HEADER_SIZE];
        random_bytes(&mut header[..NONCE_PREFIX_SIZE]);
        // Trailing 5 bytes are reserved (always zero); the streaming
        // construction supplies its own counter, not these bytes.

        let cipher = XChaCha20Poly1305::new(key.into());
        let nonce_prefix = &header[..NONCE_PREFIX_SIZE];
        let inner = EncryptorBE32::from_aead(cipher, nonce_prefix.into());
        (Self { inner }, header)
    }

    /// Seal one application write as a data-frame body: `tag_byte ∥ ciphertext ∥ mac`.
    pub fn seal(&mut self, tag: u8, plaintext: &[u8]) -> Result<Vec<u8>, SessionError> {
        let sealed = self
            .inner
            .encrypt_next(Payload { msg: plaintext, aad: &[tag] })
            .map_err(SessionError::BadDataFrame)?;
        let mut frame = Vec::with_capacity(1 + sealed.len());
        frame.push(tag);
        frame.extend_from_slice(&sealed);
        Ok(frame)
    }
}

/// Decrypting half of the secret-stream pair (the "Pull" side).
pub struct Pull {
    inner: DecryptorBE32<XChaCha20Poly1305>,
}

impl Pull {
    /// Key the decryptor from the peer's header.
    pub fn init(key: &[u8; 32], header: &[u8; STREAM_HEADER_SIZE]) -> Self {
        let cipher = XChaCha20Poly1305::new(key.into());
        let nonce_prefix = &header[..NONCE_PREFIX_SIZE];
        let inner = DecryptorBE32::from_aead(cipher, nonce_prefix.into());
        Self { inner }
    }

    /// Open a data-frame body (`tag_byte ∥ ciphertext ∥ mac`), returning the
    /// tag byte and the plaintext.
    pub fn open(&mut self, frame: &[u8]) -> Result<(u8, Vec<u8>), SessionError> {
        let (tag, sealed) = frame.split_first().ok_or(SessionError::BadHeaderLength)?;
        let plaintext = self
            .inner
            .decrypt_next(Payload { msg: sealed, aad: &[*tag] })
            .map_err(SessionError::BadDataFrame)?;
        Ok((*tag, plaintext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let key = [9u8; 32];
        let (mut push, header) = Push::new(&key);
        let mut pull = Pull::init(&key, &header);

        let frame = push.seal(0, b"hello world").unwrap();
        let (tag, plaintext) = pull.open(&frame).unwrap();
        assert_eq!(tag, 0);
        assert_eq!(plaintext, b"hello world");
    }

    #[test]
    fn sequential_frames_use_distinct_counters() {
        let key = [1u8; 32];
        let (mut push, header) = Push::new(&key);
        let mut pull = Pull::init(&key, &header);

        let f1 = push.seal(0, b"one").unwrap();
        let f2 = push.seal(0, b"two").unwrap();
        assert_ne!(f1, f2);

        let (_, p1) = pull.open(&f1).unwrap();
        let (_, p2) = pull.open(&f2).unwrap();
        assert_eq!(p1, b"one");
        assert_eq!(p2, b"two");
    }

    #[test]
    fn tampered_frame_fails_to_open() {
        let key = [3u8; 32];
        let (mut push, header) = Push::new(&key);
        let mut pull = Pull::init(&key, &header);

        let mut frame = push.seal(0, b"payload").unwrap();
        let last = frame.len() - 1;
        frame[last] ^= 0xFF;
        assert!(pull.open(&frame).is_err());
    }

    #[test]
    fn wrong_key_fails_to_open() {
        let (mut push, header) = Push::new(&[4u8; 32]);
        let mut pull = Pull::init(&[5u8; 32], &header);

        let frame = push.seal(0, b"payload").unwrap();
        assert!(pull.open(&frame).is_err());
    }
}
