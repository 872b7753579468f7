//! Error types for devlink.

use thiserror::Error;

/// Reasons a message or field can fail to decode.
///
/// Encoding never fails: output sinks are caller-sized and the encoder
/// simply stops counting once a sink rejects bytes. Framing problems are
/// not errors either — the transport parser reports them as extraneous
/// data instead (see [`crate::transport::Parser`]).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer too short to contain the two-byte message header.
    #[error("message header is truncated")]
    TruncatedHeader,

    /// The reserved high bit of the message ID is set.
    #[error("reserved message ID bit is set")]
    ReservedIdBit,

    /// The message ID does not match the expected record type.
    #[error("unexpected message ID: expected {expected}, found {found}")]
    UnexpectedMessageId {
        /// ID the record type expects.
        expected: u16,
        /// ID found on the wire.
        found: u16,
    },

    /// The body is shorter than the minimum or longer than the maximum
    /// encoded size of the record type.
    #[error("encoded body size {len} is out of bounds")]
    SizeOutOfBounds {
        /// Body length in bytes, excluding the header.
        len: usize,
    },

    /// A register value carried a type tag outside the known range.
    #[error("unknown register value tag {0}")]
    UnknownValueTag(u8),

    /// A register name announced a length over its capacity.
    #[error("register name length {0} is out of range")]
    BadNameLength(u8),

    /// A register name announced more bytes than the buffer holds,
    /// or the length byte itself is missing.
    #[error("register name is truncated")]
    TruncatedName,

    /// An enumerated field carried a value outside its defined set.
    #[error("invalid value {value} for {field}")]
    InvalidEnum {
        /// Field name, for diagnostics.
        field: &'static str,
        /// Raw wire value.
        value: u16,
    },
}

/// Result type alias using DecodeError.
pub type Result<T> = std::result::Result<T, DecodeError>;
