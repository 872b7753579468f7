//! # devlink
//!
//! Point-to-point binary messaging between embedded devices and host
//! tools over a byte-oriented link, typically a serial UART.
//!
//! The crate has three layers:
//!
//! - **Transport** ([`transport`]): a self-synchronizing framing of
//!   opaque payloads with a type code and CRC-32C, parsed one byte at a
//!   time with no allocation.
//! - **Codec** ([`codec`]): streaming little-endian encoders and
//!   decoders for fixed-width fields.
//! - **Messages** ([`message`]): the standard records layered on top —
//!   endpoint identification, register data and discovery, device
//!   management, and bootloader image transfer.
//!
//! Everything runs to completion synchronously; nothing blocks,
//! suspends or spawns. The parser and emitters are single-owner types —
//! cross-thread use needs external exclusion or one instance per
//! thread.
//!
//! ## Example
//!
//! ```
//! use devlink::message::{Message, RegisterDataRequest, RegisterName};
//! use devlink::transport::{encode_frame, Event, Parser};
//!
//! // Host side: encode a register read request and frame it.
//! let mut request = RegisterDataRequest::default();
//! request.name = RegisterName::from("uart.baudrate");
//! let mut payload: Vec<u8> = Vec::new();
//! request.encode(&mut payload);
//!
//! let mut wire = bytes::BytesMut::new();
//! encode_frame(0, &payload, &mut wire);
//!
//! // Device side: deframe and decode.
//! let mut parser: Parser = Parser::new();
//! for &byte in wire.iter() {
//!     if let Some(Event::Frame(frame)) = parser.feed(byte) {
//!         let decoded = RegisterDataRequest::try_decode(frame.payload).unwrap();
//!         assert_eq!(decoded, request);
//!     }
//! }
//! ```

pub mod codec;
pub mod crc32c;
pub mod error;
pub mod message;
pub mod transport;

pub use error::{DecodeError, Result};
