//! Sequential field encoder over a byte sink.

use bytes::BufMut;

/// One-byte-at-a-time output abstraction used by [`Encoder`].
///
/// `put` returns whether the byte was accepted. A bounded sink that has
/// run out of room returns `false`, and the encoder stops advancing its
/// offset; the offset therefore always reflects the bytes actually
/// written.
pub trait ByteSink {
    /// Accept one byte. Returns `false` if the sink is full.
    fn put(&mut self, byte: u8) -> bool;
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn put(&mut self, byte: u8) -> bool {
        self.push(byte);
        true
    }
}

impl ByteSink for bytes::BytesMut {
    #[inline]
    fn put(&mut self, byte: u8) -> bool {
        self.put_u8(byte);
        true
    }
}

impl<const N: usize> ByteSink for heapless::Vec<u8, N> {
    #[inline]
    fn put(&mut self, byte: u8) -> bool {
        self.push(byte).is_ok()
    }
}

/// Writer of little-endian fixed-width fields into a [`ByteSink`].
///
/// All multi-byte integers and float bit patterns are written
/// little-endian regardless of the host.
pub struct Encoder<'a, S: ByteSink> {
    sink: &'a mut S,
    offset: usize,
}

impl<'a, S: ByteSink> Encoder<'a, S> {
    /// Wrap a sink. The offset starts at zero.
    pub fn new(sink: &'a mut S) -> Self {
        Self { sink, offset: 0 }
    }

    /// Number of bytes the sink has accepted so far.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    fn put_byte(&mut self, byte: u8) {
        if self.sink.put(byte) {
            self.offset += 1;
        }
    }

    /// Append raw bytes.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.put_byte(byte);
        }
    }

    /// Emit `fill` bytes until the offset reaches `target`.
    ///
    /// No-op when the offset is already at or past the target.
    pub fn fill_up_to(&mut self, target: usize, fill: u8) {
        while self.offset < target {
            if !self.sink.put(fill) {
                break;
            }
            self.offset += 1;
        }
    }

    /// Write an unsigned 8-bit integer.
    pub fn put_u8(&mut self, value: u8) {
        self.put_byte(value);
    }

    /// Write a signed 8-bit integer.
    pub fn put_i8(&mut self, value: i8) {
        self.put_byte(value as u8);
    }

    /// Write an unsigned 16-bit integer.
    pub fn put_u16(&mut self, value: u16) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Write a signed 16-bit integer.
    pub fn put_i16(&mut self, value: i16) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Write an unsigned 32-bit integer.
    pub fn put_u32(&mut self, value: u32) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Write a signed 32-bit integer.
    pub fn put_i32(&mut self, value: i32) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Write an unsigned 64-bit integer.
    pub fn put_u64(&mut self, value: u64) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Write a signed 64-bit integer.
    pub fn put_i64(&mut self, value: i64) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Write an IEEE-754 single-precision bit pattern.
    pub fn put_f32(&mut self, value: f32) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Write an IEEE-754 double-precision bit pattern.
    pub fn put_f64(&mut self, value: f64) {
        self.put_bytes(&value.to_le_bytes());
    }
}
