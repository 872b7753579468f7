//! Register values and names.
//!
//! A register is a named value on an endpoint. The name is ASCII, up to
//! 93 bytes, length-prefixed on the wire. The value is one of fourteen
//! tagged alternatives: a one-byte type tag followed by a body that runs
//! to the end of the containing field, so no element count travels on
//! the wire.

use heapless::{String, Vec};

use crate::codec::{ByteSink, Decoder, Encoder};
use crate::error::{DecodeError, Result};

/// Capacity of a register name, in bytes.
pub const REGISTER_NAME_CAPACITY: usize = 93;

/// ASCII name of a register, up to 93 bytes.
///
/// Dereferences to the underlying fixed-capacity string. Wire format is
/// one length byte followed by the name bytes, no terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterName(String<REGISTER_NAME_CAPACITY>);

impl RegisterName {
    /// Smallest wire footprint: the length byte alone.
    pub const MIN_ENCODED_SIZE: usize = 1;
    /// Largest wire footprint: length byte plus a full name.
    pub const MAX_ENCODED_SIZE: usize = 1 + REGISTER_NAME_CAPACITY;

    /// Create an empty name.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn encode<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        encoder.put_u8(self.0.len() as u8);
        encoder.put_bytes(self.0.as_bytes());
    }

    pub(crate) fn try_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        if decoder.remaining() == 0 {
            return Err(DecodeError::TruncatedName);
        }
        let length = decoder.get_u8();
        if usize::from(length) > REGISTER_NAME_CAPACITY {
            return Err(DecodeError::BadNameLength(length));
        }
        if decoder.remaining() < usize::from(length) {
            return Err(DecodeError::TruncatedName);
        }
        let mut name = String::new();
        for _ in 0..length {
            // All announced bytes are consumed so the next field stays
            // aligned; capacity was checked above.
            let byte = decoder.get_u8();
            let _ = name.push(byte as char);
        }
        Ok(Self(name))
    }
}

impl core::ops::Deref for RegisterName {
    type Target = String<REGISTER_NAME_CAPACITY>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl core::ops::DerefMut for RegisterName {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<&str> for RegisterName {
    /// Copies up to capacity; longer input is truncated.
    fn from(value: &str) -> Self {
        let mut name = String::new();
        for c in value.chars() {
            if name.push(c).is_err() {
                break;
            }
        }
        Self(name)
    }
}

impl PartialEq<&str> for RegisterName {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_str() == *other
    }
}

impl core::fmt::Display for RegisterName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// The value held by a register: exactly one of fourteen alternatives.
///
/// Vector capacities are chosen so that any encoded value, tag included,
/// fits in 257 bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterValue {
    /// No value. Carries nothing on the wire beyond the tag.
    Empty,
    /// ASCII text, not null-terminated on the wire.
    String(String<256>),
    /// Raw bytes with no further structure.
    Unstructured(Vec<u8, 256>),
    /// One byte per element, zero or non-zero.
    Boolean(Vec<bool, 256>),
    /// Packed little-endian 64-bit signed integers.
    I64(Vec<i64, 32>),
    /// Packed little-endian 32-bit signed integers.
    I32(Vec<i32, 64>),
    /// Packed little-endian 16-bit signed integers.
    I16(Vec<i16, 128>),
    /// Packed 8-bit signed integers.
    I8(Vec<i8, 256>),
    /// Packed little-endian 64-bit unsigned integers.
    U64(Vec<u64, 32>),
    /// Packed little-endian 32-bit unsigned integers.
    U32(Vec<u32, 64>),
    /// Packed little-endian 16-bit unsigned integers.
    U16(Vec<u16, 128>),
    /// Packed 8-bit unsigned integers.
    U8(Vec<u8, 256>),
    /// Packed little-endian IEEE-754 doubles.
    F64(Vec<f64, 32>),
    /// Packed little-endian IEEE-754 singles.
    F32(Vec<f32, 64>),
}

impl RegisterValue {
    /// Smallest wire footprint: the tag byte alone.
    pub const MIN_ENCODED_SIZE: usize = 1;
    /// Largest wire footprint: tag byte plus 256 bytes of body.
    pub const MAX_ENCODED_SIZE: usize = 257;

    /// The wire tag of the held alternative.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::String(_) => 1,
            Self::Unstructured(_) => 2,
            Self::Boolean(_) => 3,
            Self::I64(_) => 4,
            Self::I32(_) => 5,
            Self::I16(_) => 6,
            Self::I8(_) => 7,
            Self::U64(_) => 8,
            Self::U32(_) => 9,
            Self::U16(_) => 10,
            Self::U8(_) => 11,
            Self::F64(_) => 12,
            Self::F32(_) => 13,
        }
    }

    /// True when the value is the Empty alternative.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Write the tag and body.
    pub fn encode<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        encoder.put_u8(self.tag());
        match self {
            Self::Empty => {}
            Self::String(s) => encoder.put_bytes(s.as_bytes()),
            Self::Unstructured(v) => encoder.put_bytes(v),
            Self::Boolean(v) => {
                for &b in v {
                    encoder.put_u8(u8::from(b));
                }
            }
            Self::I64(v) => v.iter().for_each(|&x| encoder.put_i64(x)),
            Self::I32(v) => v.iter().for_each(|&x| encoder.put_i32(x)),
            Self::I16(v) => v.iter().for_each(|&x| encoder.put_i16(x)),
            Self::I8(v) => v.iter().for_each(|&x| encoder.put_i8(x)),
            Self::U64(v) => v.iter().for_each(|&x| encoder.put_u64(x)),
            Self::U32(v) => v.iter().for_each(|&x| encoder.put_u32(x)),
            Self::U16(v) => v.iter().for_each(|&x| encoder.put_u16(x)),
            Self::U8(v) => encoder.put_bytes(v),
            Self::F64(v) => v.iter().for_each(|&x| encoder.put_f64(x)),
            Self::F32(v) => v.iter().for_each(|&x| encoder.put_f32(x)),
        }
    }

    /// Read a tag and body from the rest of `decoder`'s range.
    ///
    /// A missing tag decodes as Empty; an out-of-range tag is a failure.
    /// For tag 0 any trailing bytes are ignored. Vector bodies consume
    /// whole elements only.
    pub fn try_decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        if decoder.remaining() == 0 {
            return Ok(Self::Empty);
        }
        let tag = decoder.get_u8();
        Ok(match tag {
            0 => Self::Empty,
            1 => Self::String(decoder.get_ascii_string()),
            2 => {
                let mut v = Vec::new();
                while decoder.remaining() > 0 && v.len() < v.capacity() {
                    v.push(decoder.get_u8()).ok();
                }
                Self::Unstructured(v)
            }
            3 => {
                let mut v = Vec::new();
                while decoder.remaining() > 0 && v.len() < v.capacity() {
                    v.push(decoder.get_u8() != 0).ok();
                }
                Self::Boolean(v)
            }
            4 => Self::I64(decode_elements(decoder, |d| d.get_i64())),
            5 => Self::I32(decode_elements(decoder, |d| d.get_i32())),
            6 => Self::I16(decode_elements(decoder, |d| d.get_i16())),
            7 => Self::I8(decode_elements(decoder, |d| d.get_i8())),
            8 => Self::U64(decode_elements(decoder, |d| d.get_u64())),
            9 => Self::U32(decode_elements(decoder, |d| d.get_u32())),
            10 => Self::U16(decode_elements(decoder, |d| d.get_u16())),
            11 => Self::U8(decode_elements(decoder, |d| d.get_u8())),
            12 => Self::F64(decode_elements(decoder, |d| d.get_f64())),
            13 => Self::F32(decode_elements(decoder, |d| d.get_f32())),
            _ => return Err(DecodeError::UnknownValueTag(tag)),
        })
    }
}

impl Default for RegisterValue {
    fn default() -> Self {
        Self::Empty
    }
}

/// Read whole trailing elements of one scalar type.
fn decode_elements<T, const CAP: usize>(
    decoder: &mut Decoder<'_>,
    get: impl Fn(&mut Decoder<'_>) -> T,
) -> Vec<T, CAP> {
    let mut out = Vec::new();
    while decoder.remaining() >= core::mem::size_of::<T>() && out.len() < CAP {
        out.push(get(&mut *decoder)).ok();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &RegisterValue) -> std::vec::Vec<u8> {
        let mut buf = std::vec::Vec::new();
        let mut encoder = Encoder::new(&mut buf);
        value.encode(&mut encoder);
        buf
    }

    fn decode(data: &[u8]) -> Result<RegisterValue> {
        RegisterValue::try_decode(&mut Decoder::new(data))
    }

    #[test]
    fn test_default_is_empty() {
        let value = RegisterValue::default();
        assert!(value.is_empty());
        assert_eq!(value.tag(), 0);
        assert_eq!(encode(&value), [0]);
    }

    #[test]
    fn test_string_encoding() {
        let mut s: String<256> = String::new();
        s.push_str("1234567").unwrap();
        let value = RegisterValue::String(s);
        assert_eq!(encode(&value), [1, 49, 50, 51, 52, 53, 54, 55]);
    }

    #[test]
    fn test_u64_vector_encoding() {
        let mut v: Vec<u64, 32> = Vec::new();
        while v.push(0xDEAD_BEEF_BADC_0FFE).is_ok() {}
        assert_eq!(v.len(), 32);
        let value = RegisterValue::U64(v);

        let mut expected = vec![8u8];
        for _ in 0..32 {
            expected.extend_from_slice(&0xDEAD_BEEF_BADC_0FFEu64.to_le_bytes());
        }
        assert_eq!(encode(&value), expected);
        assert_eq!(expected.len(), RegisterValue::MAX_ENCODED_SIZE);
    }

    #[test]
    fn test_boolean_encoding() {
        let mut v: Vec<bool, 256> = Vec::new();
        for b in [false, true, false, true] {
            v.push(b).unwrap();
        }
        assert_eq!(encode(&RegisterValue::Boolean(v)), [3, 0, 1, 0, 1]);
    }

    #[test]
    fn test_unstructured_encoding() {
        let mut v: Vec<u8, 256> = Vec::new();
        v.extend_from_slice(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(encode(&RegisterValue::Unstructured(v)), [2, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_decoding() {
        // Missing tag deduces Empty.
        assert_eq!(decode(&[]), Ok(RegisterValue::Empty));
        assert_eq!(decode(&[0]), Ok(RegisterValue::Empty));
        // Trailing bytes are ignored for empty values.
        assert_eq!(decode(&[0, 1, 2, 3]), Ok(RegisterValue::Empty));
        // Out-of-range tag.
        assert_eq!(decode(&[99]), Err(DecodeError::UnknownValueTag(99)));

        match decode(&[1, 48]).unwrap() {
            RegisterValue::String(s) => assert_eq!(s.as_str(), "0"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn test_round_trip_all_tags() {
        let mut f32s: Vec<f32, 64> = Vec::new();
        f32s.extend_from_slice(&[0.0, -0.0, f32::INFINITY, 1.5e-39]).unwrap();
        let mut f64s: Vec<f64, 32> = Vec::new();
        f64s.extend_from_slice(&[-1.0, f64::NEG_INFINITY, 2.5]).unwrap();
        let mut i16s: Vec<i16, 128> = Vec::new();
        i16s.extend_from_slice(&[-1, 0, i16::MIN, i16::MAX]).unwrap();
        let mut u32s: Vec<u32, 64> = Vec::new();
        u32s.extend_from_slice(&[0, u32::MAX, 0xDEAD_BEEF]).unwrap();

        let values = [
            RegisterValue::Empty,
            RegisterValue::String(String::try_from("hello").unwrap()),
            RegisterValue::F32(f32s),
            RegisterValue::F64(f64s),
            RegisterValue::I16(i16s),
            RegisterValue::U32(u32s),
        ];
        for value in values {
            let encoded = encode(&value);
            let decoded = decode(&encoded).unwrap();
            assert_eq!(decoded, value);
            // Re-encoding is byte-identical.
            assert_eq!(encode(&decoded), encoded);
        }
    }

    #[test]
    fn test_partial_trailing_element_is_ignored() {
        // Tag 8 (u64) with one full element and three stray bytes.
        let mut data = vec![8u8];
        data.extend_from_slice(&42u64.to_le_bytes());
        data.extend_from_slice(&[1, 2, 3]);
        match decode(&data).unwrap() {
            RegisterValue::U64(v) => assert_eq!(v.as_slice(), [42]),
            other => panic!("expected u64 vector, got {other:?}"),
        }
    }

    #[test]
    fn test_name_encoding() {
        let encode_name = |name: &RegisterName| {
            let mut buf = std::vec::Vec::new();
            let mut encoder = Encoder::new(&mut buf);
            name.encode(&mut encoder);
            buf
        };

        assert_eq!(encode_name(&RegisterName::new()), [0]);
        assert_eq!(encode_name(&RegisterName::from("123")), [3, 49, 50, 51]);

        let mut full = RegisterName::from("123");
        while full.push('Z').is_ok() {}
        assert_eq!(full.len(), REGISTER_NAME_CAPACITY);
        let encoded = encode_name(&full);
        assert_eq!(encoded.len(), RegisterName::MAX_ENCODED_SIZE);
        assert_eq!(encoded[0], 93);
        assert_eq!(&encoded[1..4], [49, 50, 51]);
        assert!(encoded[4..].iter().all(|&b| b == b'Z'));
    }

    #[test]
    fn test_name_decoding() {
        let decode_name = |data: &[u8]| RegisterName::try_decode(&mut Decoder::new(data));

        assert_eq!(decode_name(&[]), Err(DecodeError::TruncatedName));
        assert_eq!(decode_name(&[1]), Err(DecodeError::TruncatedName));
        assert_eq!(decode_name(&[94]), Err(DecodeError::BadNameLength(94)));
        assert_eq!(decode_name(&[0]).unwrap(), RegisterName::new());
        assert_eq!(decode_name(&[1, 49]).unwrap(), "1");

        let mut encoded = vec![93u8];
        encoded.extend_from_slice(&[b'Z'; 93]);
        let decoded = decode_name(&encoded).unwrap();
        assert_eq!(decoded.len(), 93);
        assert!(decoded.as_str().bytes().all(|b| b == b'Z'));
    }
}
