//! Frame emitters: buffered (pull) and streaming (push).
//!
//! [`BufferedEmitter`] is an iterator over the exact wire bytes of one
//! frame built from a borrowed payload. [`StreamEmitter`] is the push
//! counterpart for payloads produced incrementally: it wraps a byte sink,
//! escapes and CRC-accumulates every payload byte on the way through, and
//! appends the type code, CRC and closing delimiter when released.
//!
//! # Example
//!
//! ```
//! use devlink::transport::BufferedEmitter;
//!
//! let bytes: Vec<u8> = BufferedEmitter::new(123, &[]).collect();
//! assert_eq!(bytes, [0x8E, 123, 0x67, 0xAC, 0x6C, 0xBA, 0x8E]);
//! ```

use bytes::{BufMut, BytesMut};

use crate::crc32c::Crc32c;

use super::{ESCAPE_CHARACTER, FRAME_DELIMITER, FRAME_OVERHEAD};

/// True for the two byte values that must be escaped inside a body.
#[inline]
fn needs_escaping(byte: u8) -> bool {
    byte == FRAME_DELIMITER || byte == ESCAPE_CHARACTER
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    OpeningDelimiter,
    Payload,
    TypeCode,
    Crc,
    ClosingDelimiter,
    Done,
}

/// Iterator over the wire bytes of one frame.
///
/// Emits the opening delimiter, the escaped payload, the escaped type
/// code, the four escaped little-endian CRC bytes, and the closing
/// delimiter. The CRC covers the pre-escape sequence payload ‖ type_code
/// and is computed incrementally as bytes are pulled.
pub struct BufferedEmitter<'a> {
    type_code: u8,
    payload: &'a [u8],
    index: usize,
    crc: Crc32c,
    crc_bytes: [u8; 4],
    stage: Stage,
    /// Second half of an escape sequence, if one is in flight.
    pending: Option<u8>,
}

impl<'a> BufferedEmitter<'a> {
    /// Prepare a frame with the given type code and payload.
    pub fn new(type_code: u8, payload: &'a [u8]) -> Self {
        Self {
            type_code,
            payload,
            index: 0,
            crc: Crc32c::new(),
            crc_bytes: [0; 4],
            stage: Stage::OpeningDelimiter,
            pending: None,
        }
    }

    /// Escape `byte` if needed, deferring the second byte of the pair.
    fn emit(&mut self, byte: u8) -> u8 {
        if needs_escaping(byte) {
            self.pending = Some(byte ^ 0xFF);
            ESCAPE_CHARACTER
        } else {
            byte
        }
    }
}

impl Iterator for BufferedEmitter<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if let Some(byte) = self.pending.take() {
            return Some(byte);
        }
        match self.stage {
            Stage::OpeningDelimiter => {
                self.stage = if self.payload.is_empty() {
                    Stage::TypeCode
                } else {
                    Stage::Payload
                };
                Some(FRAME_DELIMITER)
            }
            Stage::Payload => {
                let byte = self.payload[self.index];
                self.index += 1;
                if self.index == self.payload.len() {
                    self.stage = Stage::TypeCode;
                }
                self.crc.add(byte);
                Some(self.emit(byte))
            }
            Stage::TypeCode => {
                self.crc.add(self.type_code);
                self.crc_bytes = self.crc.value().to_le_bytes();
                self.index = 0;
                self.stage = Stage::Crc;
                let type_code = self.type_code;
                Some(self.emit(type_code))
            }
            Stage::Crc => {
                let byte = self.crc_bytes[self.index];
                self.index += 1;
                if self.index == 4 {
                    self.stage = Stage::ClosingDelimiter;
                }
                Some(self.emit(byte))
            }
            Stage::ClosingDelimiter => {
                self.stage = Stage::Done;
                Some(FRAME_DELIMITER)
            }
            Stage::Done => None,
        }
    }
}

/// Render a whole frame into a `BytesMut`, for host-side senders.
pub fn encode_frame(type_code: u8, payload: &[u8], dst: &mut BytesMut) {
    // Worst case every body byte escapes to two.
    dst.reserve(2 + 2 * (payload.len() + FRAME_OVERHEAD));
    for byte in BufferedEmitter::new(type_code, payload) {
        dst.put_u8(byte);
    }
}

/// Push-style emitter tied to a byte sink.
///
/// Construction writes the opening delimiter. Every payload byte pushed
/// in is CRC-accumulated and written with escape logic. [`finish`] writes
/// the frame tail; dropping the emitter without finishing aborts the
/// frame by writing only the closing delimiter, which the receiving
/// parser reports as extraneous data.
///
/// [`finish`]: StreamEmitter::finish
pub struct StreamEmitter<S: FnMut(u8)> {
    sink: S,
    type_code: u8,
    crc: Crc32c,
    finished: bool,
}

impl<S: FnMut(u8)> StreamEmitter<S> {
    /// Open a frame of the given type on `sink`.
    pub fn new(type_code: u8, mut sink: S) -> Self {
        sink(FRAME_DELIMITER);
        Self {
            sink,
            type_code,
            crc: Crc32c::new(),
            finished: false,
        }
    }

    fn write_escaped(&mut self, byte: u8) {
        if needs_escaping(byte) {
            (self.sink)(ESCAPE_CHARACTER);
            (self.sink)(byte ^ 0xFF);
        } else {
            (self.sink)(byte);
        }
    }

    /// Append one payload byte.
    pub fn push(&mut self, byte: u8) {
        self.crc.add(byte);
        self.write_escaped(byte);
    }

    /// Append a run of payload bytes.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push(byte);
        }
    }

    /// Write the type code, CRC and closing delimiter, completing the
    /// frame.
    pub fn finish(mut self) {
        let type_code = self.type_code;
        self.crc.add(type_code);
        self.write_escaped(type_code);
        for byte in self.crc.value().to_le_bytes() {
            self.write_escaped(byte);
        }
        (self.sink)(FRAME_DELIMITER);
        self.finished = true;
    }
}

impl<S: FnMut(u8)> Drop for StreamEmitter<S> {
    fn drop(&mut self) {
        if !self.finished {
            // Abandoned mid-frame: terminate so the receiver resyncs.
            (self.sink)(FRAME_DELIMITER);
        }
    }
}
