//! CRC-32C (Castagnoli) engine used by the frame transport.
//!
//! Parameters: polynomial 0x1EDC6F41, reflected input and output,
//! initial value 0xFFFFFFFF, final XOR 0xFFFFFFFF. The CRC travels on the
//! wire little-endian, directly after the frame type code.
//!
//! The engine is byte-at-a-time so the parser can fold CRC computation
//! into its per-byte state machine, and it exposes the residue check:
//! after feeding a message followed by its own little-endian CRC, the
//! internal register settles on a fixed constant regardless of content.
//!
//! # Example
//!
//! ```
//! use devlink::crc32c::Crc32c;
//!
//! let mut crc = Crc32c::new();
//! for byte in b"123456789" {
//!     crc.add(*byte);
//! }
//! assert_eq!(crc.value(), 0xE306_9283);
//! ```

/// Register value after a message and its own CRC have been consumed.
const RESIDUE: u32 = 0xB798_B438;

/// Reversed form of the Castagnoli polynomial 0x1EDC6F41.
const POLY_REFLECTED: u32 = 0x82F6_3B78;

const TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLY_REFLECTED
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Running CRC-32C computation.
#[derive(Debug, Clone)]
pub struct Crc32c {
    state: u32,
}

impl Crc32c {
    /// Create a fresh engine. `value()` of a fresh engine is 0.
    pub fn new() -> Self {
        Self { state: 0xFFFF_FFFF }
    }

    /// Discard all accumulated state.
    pub fn reset(&mut self) {
        self.state = 0xFFFF_FFFF;
    }

    /// Feed one byte.
    #[inline]
    pub fn add(&mut self, byte: u8) {
        let index = (self.state ^ u32::from(byte)) & 0xFF;
        self.state = (self.state >> 8) ^ TABLE[index as usize];
    }

    /// Feed a run of bytes.
    pub fn add_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.add(byte);
        }
    }

    /// The CRC of everything fed so far (final XOR applied).
    #[inline]
    pub fn value(&self) -> u32 {
        !self.state
    }

    /// True iff the bytes fed so far end with their own correct CRC.
    #[inline]
    pub fn is_residue_correct(&self) -> bool {
        self.state == RESIDUE
    }
}

impl Default for Crc32c {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_engine_value_is_zero() {
        let crc = Crc32c::new();
        assert_eq!(crc.value(), 0);
        assert!(!crc.is_residue_correct());
    }

    #[test]
    fn test_check_value() {
        // Standard CRC-32C check input.
        let mut crc = Crc32c::new();
        crc.add_bytes(b"123456789");
        assert_eq!(crc.value(), 0xE306_9283);
        assert!(!crc.is_residue_correct());
    }

    #[test]
    fn test_residue_after_appending_own_crc() {
        let mut crc = Crc32c::new();
        crc.add_bytes(b"123456789");
        crc.add_bytes(&[0x83, 0x92, 0x06, 0xE3]);
        assert!(crc.is_residue_correct());
    }

    #[test]
    fn test_residue_for_arbitrary_buffers() {
        for len in [0usize, 1, 7, 64, 300] {
            let data: Vec<u8> = (0..len).map(|i| (i * 31 + 7) as u8).collect();
            let mut crc = Crc32c::new();
            crc.add_bytes(&data);
            let trailer = crc.value().to_le_bytes();
            crc.add_bytes(&trailer);
            assert!(crc.is_residue_correct(), "len {len}");
        }
    }

    #[test]
    fn test_reset() {
        let mut crc = Crc32c::new();
        crc.add_bytes(b"garbage");
        crc.reset();
        crc.add_bytes(b"123456789");
        assert_eq!(crc.value(), 0xE306_9283);
    }
}
