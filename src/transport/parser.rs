//! Byte-fed frame parser.
//!
//! Implements a state machine for deframing a noisy byte stream:
//! - `OutsideFrame`: no opening delimiter seen yet; bytes accumulate as
//!   extraneous data
//! - `InsideFrame`: collecting de-escaped body bytes
//! - `InsideFrameEscaped`: previous byte was the escape character
//!
//! Bytes that do not form a valid frame are never dropped silently: they
//! come back out as [`Event::Extraneous`], so callers can surface text or
//! diagnostics a device interleaves with real frames.
//!
//! # Example
//!
//! ```
//! use devlink::transport::{BufferedEmitter, Event, Parser};
//!
//! let mut parser: Parser = Parser::new();
//! let mut received = None;
//! for byte in BufferedEmitter::new(90, &[1, 2, 3]) {
//!     if let Some(Event::Frame(frame)) = parser.feed(byte) {
//!         received = Some((frame.type_code, frame.payload.to_vec()));
//!     }
//! }
//! assert_eq!(received, Some((90, vec![1, 2, 3])));
//! ```

use crate::crc32c::Crc32c;

use super::{ESCAPE_CHARACTER, FRAME_DELIMITER, FRAME_OVERHEAD, PARSER_BUFFER_ALIGNMENT};

/// Backing storage, over-aligned so callers may reinterpret the first
/// payload bytes as wider scalars.
#[repr(C, align(16))]
struct AlignedBuffer<const N: usize>([u8; N]);

/// State machine for frame parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No frame in progress; bytes accumulate as extraneous data.
    OutsideFrame,
    /// Collecting body bytes between delimiters.
    InsideFrame,
    /// The escape character was just seen; the next byte is data XOR 0xFF.
    InsideFrameEscaped,
}

/// A successfully deframed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// 8-bit identifier of the frame's logical kind.
    pub type_code: u8,
    /// CRC-verified payload, aligned to at least 16 bytes.
    ///
    /// Borrowed from the parser; valid until the next `feed` call.
    pub payload: &'a [u8],
}

/// One output of [`Parser::feed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// A frame whose CRC verified.
    Frame(Frame<'a>),
    /// Bytes that did not form a valid frame, in arrival order.
    Extraneous(&'a [u8]),
}

/// Streaming frame parser with a fixed `N`-byte body buffer.
///
/// `N` is the raw buffer capacity; the largest payload the parser can
/// deliver is `N - FRAME_OVERHEAD` bytes, since the type code and CRC
/// share the buffer with the payload. The default buffers 1029 bytes,
/// i.e. a 1024-byte payload plus the five framing bytes.
///
/// The parser owns all of its storage and allocates nothing. It is not
/// safe for concurrent use; callers that share one across threads must
/// wrap it in external exclusion.
pub struct Parser<const N: usize = 1029> {
    buffer: AlignedBuffer<N>,
    len: usize,
    state: State,
    crc: Crc32c,
    /// Byte carried over an overflow flush; folded in on the next feed.
    pending: Option<u8>,
}

impl<const N: usize> Parser<N> {
    /// Largest payload this parser can deliver.
    pub const MAX_PAYLOAD: usize = N - FRAME_OVERHEAD;

    /// Create a parser in the outside-frame state.
    pub fn new() -> Self {
        Self {
            buffer: AlignedBuffer([0u8; N]),
            len: 0,
            state: State::OutsideFrame,
            crc: Crc32c::new(),
            pending: None,
        }
    }

    /// Discard all in-progress state.
    pub fn reset(&mut self) {
        self.len = 0;
        self.state = State::OutsideFrame;
        self.crc.reset();
        self.pending = None;
    }

    /// Process one byte from the link.
    ///
    /// Returns at most one event. The returned payload or extraneous view
    /// borrows the parser's buffer and is invalidated by the next call.
    pub fn feed(&mut self, byte: u8) -> Option<Event<'_>> {
        // A byte deferred by an overflow flush joins the new accumulation
        // round before anything else.
        if let Some(deferred) = self.pending.take() {
            debug_assert_eq!(self.len, 0);
            self.buffer.0[0] = deferred;
            self.len = 1;
        }

        match self.state {
            State::OutsideFrame => {
                if byte == FRAME_DELIMITER {
                    self.open_frame()
                } else {
                    self.accumulate(byte)
                }
            }
            State::InsideFrame => {
                if byte == FRAME_DELIMITER {
                    self.finalize()
                } else if byte == ESCAPE_CHARACTER {
                    self.state = State::InsideFrameEscaped;
                    None
                } else {
                    self.crc.add(byte);
                    self.accumulate(byte)
                }
            }
            State::InsideFrameEscaped => {
                // Any byte after the escape is data, delimiter included.
                self.state = State::InsideFrame;
                let unescaped = byte ^ 0xFF;
                self.crc.add(unescaped);
                self.accumulate(unescaped)
            }
        }
    }

    /// Append a body or extraneous byte, flushing if the buffer is full.
    fn accumulate(&mut self, byte: u8) -> Option<Event<'_>> {
        if self.len == N {
            // An in-frame overflow demotes the rest of the body to
            // extraneous data until the next delimiter resynchronizes.
            if self.state != State::OutsideFrame {
                tracing::trace!(capacity = N, "frame body overflow");
                self.state = State::OutsideFrame;
            }
            self.len = 0;
            self.pending = Some(byte);
            return Some(Event::Extraneous(&self.buffer.0[..N]));
        }
        self.buffer.0[self.len] = byte;
        self.len += 1;
        None
    }

    /// An opening delimiter: flush accumulated extraneous data, if any.
    fn open_frame(&mut self) -> Option<Event<'_>> {
        self.state = State::InsideFrame;
        self.crc.reset();
        if self.len > 0 {
            let count = self.len;
            self.len = 0;
            Some(Event::Extraneous(&self.buffer.0[..count]))
        } else {
            None
        }
    }

    /// A closing delimiter: check the body and emit the result.
    ///
    /// The same delimiter also opens the next frame, so consecutive
    /// delimiters produce no output at all.
    fn finalize(&mut self) -> Option<Event<'_>> {
        let count = self.len;
        self.len = 0;
        let residue_ok = self.crc.is_residue_correct();
        self.crc.reset();

        if count == 0 {
            return None;
        }
        if count >= FRAME_OVERHEAD && residue_ok {
            let payload_len = count - FRAME_OVERHEAD;
            let type_code = self.buffer.0[payload_len];
            tracing::trace!(type_code, payload_len, "frame received");
            Some(Event::Frame(Frame {
                type_code,
                payload: &self.buffer.0[..payload_len],
            }))
        } else {
            tracing::trace!(len = count, "unparseable frame body");
            Some(Event::Extraneous(&self.buffer.0[..count]))
        }
    }

    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match self.state {
            State::OutsideFrame => "OutsideFrame",
            State::InsideFrame => "InsideFrame",
            State::InsideFrameEscaped => "InsideFrameEscaped",
        }
    }
}

impl<const N: usize> Default for Parser<N> {
    fn default() -> Self {
        Self::new()
    }
}

// The alignment is part of the parser's contract, not an optimization.
const _: () = assert!(core::mem::align_of::<AlignedBuffer<1>>() >= PARSER_BUFFER_ALIGNMENT);
