//! Self-synchronizing frame transport for byte-oriented links.
//!
//! Every frame carries one opaque payload plus an 8-bit type code, and is
//! protected by CRC-32C:
//!
//! ```text
//! ┌───────────┬─────────────────────────────────────────────┬───────────┐
//! │ Delimiter │ Payload (0..N) │ Type code │ CRC-32C (4, LE) │ Delimiter │
//! │ 0x8E      │          (delimiter/escape bytes escaped)   │ 0x8E      │
//! └───────────┴─────────────────────────────────────────────┴───────────┘
//! ```
//!
//! Inside the body, a delimiter or escape byte is replaced by the escape
//! byte followed by the original XOR 0xFF, so a delimiter on the wire
//! always marks a frame boundary and the receiver can resynchronize from
//! any point in the stream.
//!
//! [`Parser`] turns incoming bytes into frames (or extraneous data);
//! [`BufferedEmitter`] and [`StreamEmitter`] produce outgoing frames.

mod emitter;
mod parser;

pub use emitter::{encode_frame, BufferedEmitter, StreamEmitter};
pub use parser::{Event, Frame, Parser};

/// Byte that opens and closes every frame.
pub const FRAME_DELIMITER: u8 = 0x8E;

/// Byte that introduces a two-byte escape sequence inside a frame body.
pub const ESCAPE_CHARACTER: u8 = 0x9E;

/// Body bytes that follow the payload: type code plus CRC-32C.
pub const FRAME_OVERHEAD: usize = 5;

/// Minimum alignment of the payload view handed out by the parser.
pub const PARSER_BUFFER_ALIGNMENT: usize = 16;
