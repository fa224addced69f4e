//! Framing codec (C1).
//!
//! Wire format: a 3-byte little-endian length `L` followed by exactly `L`
//! bytes of payload, frames concatenated with no delimiters. The parser
//! tolerates arbitrary chunking, including 1-byte deliveries, and performs a
//! zero-copy slice whenever a frame's whole body lands in a single chunk.

use crate::core::LENGTH_PREFIX_SIZE;

/// One reassembled frame payload.
///
/// `Borrowed` is used when the body was fully contained in the chunk handed
/// to [`FrameParser::feed`]; `Owned` is used when the body had to be
/// accumulated across multiple deliveries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedFrame<'a> {
    /// Zero-copy slice into the chunk passed to `feed`.
    Borrowed(&'a [u8]),
    /// Body accumulated across more than one delivery.
    Owned(Vec<u8>),
}

impl<'a> ParsedFrame<'a> {
    /// View the payload regardless of storage.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            ParsedFrame::Borrowed(s) => s,
            ParsedFrame::Owned(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadingLen,
    ReadingBody,
}

/// Incremental length-prefixed frame reassembler.
///
/// Tracks `(state, len, len_bytes_read, acc)`: `len_bytes_read` counts how
/// many of the 3 length-prefix bytes have arrived so far (an explicit
/// counter in place of the reference implementation's `acc_mul` sentinel —
/// equivalent semantics, exactly 3 bytes little-endian, no short-circuit).
pub struct FrameParser {
    state: State,
    len: u32,
    len_bytes_read: u8,
    acc: Vec<u8>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a parser ready to read a fresh length prefix.
    pub fn new() -> Self {
        Self { state: State::ReadingLen, len: 0, len_bytes_read: 0, acc: Vec::new() }
    }

    fn reset(&mut self) {
        self.state = State::ReadingLen;
        self.len = 0;
        self.len_bytes_read = 0;
        self.acc.clear();
    }

    /// Feed a chunk of transport bytes, yielding every frame completed by it,
    /// in order.
    ///
    /// `hint` is called with the number of body bytes still needed once the
    /// length prefix of a frame has been read; it is a best-effort
    /// informational hook for transports that can size their own reads.
    pub fn feed<'a>(&mut self, mut chunk: &'a [u8], mut hint: impl FnMut(usize)) -> Vec<ParsedFrame<'a>> {
        let mut out = Vec::new();

        loop {
            match self.state {
                State::ReadingLen => {
                    while (self.len_bytes_read as usize) < LENGTH_PREFIX_SIZE {
                        let Some((&byte, rest)) = chunk.split_first() else {
                            return out;
                        };
                        chunk = rest;
                        self.len |= (byte as u32) << (8 * self.len_bytes_read);
                        self.len_bytes_read += 1;
                    }
                    self.state = State::ReadingBody;
                    hint(self.len as usize);

                    if self.len == 0 {
                        out.push(ParsedFrame::Borrowed(&[]));
                        self.reset();
                        // Zero-length frame needs no body bytes; loop again
                        // in case more frames (or none) remain in `chunk`.
                        continue;
                    }
                }
                State::ReadingBody => {
                    let need = self.len as usize;

                    if self.acc.is_empty() {
                        if chunk.len() >= need {
                            let (body, rest) = chunk.split_at(need);
                            out.push(ParsedFrame::Borrowed(body));
                            chunk = rest;
                            self.reset();
                            continue;
                        }
                        self.acc.reserve_exact(need);
                        self.acc.extend_from_slice(chunk);
                        return out;
                    }

                    let remaining = need - self.acc.len();
                    if chunk.len() >= remaining {
                        self.acc.extend_from_slice(&chunk[..remaining]);
                        chunk = &chunk[remaining..];
                        let body = std::mem::take(&mut self.acc);
                        out.push(ParsedFrame::Owned(body));
                        self.reset();
                        continue;
                    }
                    self.acc.extend_from_slice(chunk);
                    return out;
                }
            }

            if chunk.is_empty() {
                return out;
            }
        }
    }
}

/// Encode `body` as a frame: 3-byte little-endian length prefix followed by
/// the body. `body.len()` must be `< 2^24`.
pub fn encode_frame(body: &[u8]) -> Vec<u8> {
    let len = body.len() as u32;
    debug_assert!(len < crate::core::MAX_FRAME_LEN, "frame body exceeds 2^24");
    let mut out = Vec::with_capacity(LENGTH_PREFIX_SIZE + body.len());
    out.extend_from_slice(&len.to_le_bytes()[..LENGTH_PREFIX_SIZE]);
    out.extend_from_slice(body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames_as_vecs(frames: &[ParsedFrame<'_>]) -> Vec<Vec<u8>> {
        frames.iter().map(|f| f.as_slice().to_vec()).collect()
    }

    #[test]
    fn single_chunk_is_zero_copy() {
        let mut parser = FrameParser::new();
        let encoded = encode_frame(b"hello");
        let frames = parser.feed(&encoded, |_| {});
        assert_eq!(frames.len(), 1);
        assert!(matches!(frames[0], ParsedFrame::Borrowed(_)));
        assert_eq!(frames[0].as_slice(), b"hello");
    }

    #[test]
    fn one_byte_chunking() {
        let mut parser = FrameParser::new();
        let encoded = encode_frame(b"hello world");
        let mut collected = Vec::new();
        for byte in encoded.iter() {
            let frames = parser.feed(std::slice::from_ref(byte), |_| {});
            collected.extend(frames_as_vecs(&frames));
        }
        assert_eq!(collected, vec![b"hello world".to_vec()]);
    }

    #[test]
    fn multiple_frames_in_one_chunk() {
        let mut parser = FrameParser::new();
        let mut wire = encode_frame(b"one");
        wire.extend(encode_frame(b"two"));
        wire.extend(encode_frame(b""));
        let frames = parser.feed(&wire, |_| {});
        assert_eq!(frames_as_vecs(&frames), vec![b"one".to_vec(), b"two".to_vec(), b"".to_vec()]);
    }

    #[test]
    fn frame_split_across_chunks_is_owned() {
        let mut parser = FrameParser::new();
        let encoded = encode_frame(b"split-me-please");
        let (a, b) = encoded.split_at(4);
        let first = parser.feed(a, |_| {});
        assert!(first.is_empty());
        let second = parser.feed(b, |_| {});
        assert_eq!(second.len(), 1);
        assert!(matches!(second[0], ParsedFrame::Owned(_)));
        assert_eq!(second[0].as_slice(), b"split-me-please");
    }

    #[test]
    fn resets_and_awaits_body_for_next_frames_length() {
        let mut parser = FrameParser::new();
        let mut wire = encode_frame(b"ok");
        wire.extend_from_slice(&[0xFF, 0x00, 0x00]); // next frame's length prefix: 255
        let frames = parser.feed(&wire, |_| {});
        assert_eq!(frames_as_vecs(&frames), vec![b"ok".to_vec()]);
        // Length prefix fully read (255), but its body hasn't arrived yet.
        let frames = parser.feed(&[], |_| {});
        assert!(frames.is_empty());
    }
}
