//! Codec module - streaming little-endian field serialization.
//!
//! This module provides the presentation layer under the standard
//! messages:
//!
//! - [`Encoder`] - sequential writer of fixed-width little-endian fields
//! - [`Decoder`] - matching reader over a bounded byte slice
//! - [`ByteSink`] - one-byte-at-a-time output abstraction
//!
//! # Design
//!
//! The encoder pushes bytes into a caller-supplied [`ByteSink`] and counts
//! the bytes the sink accepted; a full sink silently stops accepting, so
//! encoding never fails. The decoder never fails either: fetching past the
//! end of the input yields the zero value of the requested type and clamps
//! the offset to the end, which keeps length-driven parsing of truncated
//! buffers linear and panic-free.
//!
//! # Example
//!
//! ```
//! use devlink::codec::{Decoder, Encoder};
//!
//! let mut buf: Vec<u8> = Vec::new();
//! let mut encoder = Encoder::new(&mut buf);
//! encoder.put_u16(0x1234);
//! encoder.put_i8(-1);
//! assert_eq!(encoder.offset(), 3);
//! assert_eq!(buf, [0x34, 0x12, 0xFF]);
//!
//! let mut decoder = Decoder::new(&buf);
//! assert_eq!(decoder.get_u16(), 0x1234);
//! assert_eq!(decoder.get_i8(), -1);
//! assert_eq!(decoder.remaining(), 0);
//! ```

mod decoder;
mod encoder;

pub use decoder::Decoder;
pub use encoder::{ByteSink, Encoder};
