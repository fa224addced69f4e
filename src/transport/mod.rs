//! Transport-facing pieces: the length-prefixed framing codec (C1) and the
//! in-memory bridge transport used when a session is not given one (C6).

mod bridge;
mod frame;

pub use bridge::Bridge;
pub use frame::{encode_frame, FrameParser, ParsedFrame};
