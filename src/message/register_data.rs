//! Register access and discovery messages.

use crate::codec::{ByteSink, Decoder, Encoder};
use crate::error::Result;

use super::register_value::{RegisterName, RegisterValue};
use super::{Message, MessageId};

/// Register flags delivered with a data response.
///
/// Bit 0: the register is mutable. Bit 1: the register is persistent.
/// Unknown bits are preserved across decode and encode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterFlags(pub u8);

impl RegisterFlags {
    const MUTABLE: u8 = 1 << 0;
    const PERSISTENT: u8 = 1 << 1;

    /// The register can be written.
    #[inline]
    pub fn is_mutable(&self) -> bool {
        self.0 & Self::MUTABLE != 0
    }

    /// The register survives a restart.
    #[inline]
    pub fn is_persistent(&self) -> bool {
        self.0 & Self::PERSISTENT != 0
    }

    /// Set or clear the mutable bit.
    pub fn set_mutable(&mut self, value: bool) {
        self.set(Self::MUTABLE, value);
    }

    /// Set or clear the persistent bit.
    pub fn set_persistent(&mut self, value: bool) {
        self.set(Self::PERSISTENT, value);
    }

    fn set(&mut self, mask: u8, value: bool) {
        if value {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }
}

/// Read or write one register.
///
/// An Empty value asks the endpoint to report the register; any other
/// value asks it to assign the register first. The value may be omitted
/// from the wire entirely, in which case it decodes as Empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterDataRequest {
    /// Register to access.
    pub name: RegisterName,
    /// Value to assign, or Empty for a plain read.
    pub value: RegisterValue,
}

impl Message for RegisterDataRequest {
    const ID: MessageId = MessageId::RegisterDataRequest;
    const MIN_ENCODED_SIZE: usize = RegisterName::MIN_ENCODED_SIZE + RegisterValue::MIN_ENCODED_SIZE;
    const MAX_ENCODED_SIZE: usize = RegisterName::MAX_ENCODED_SIZE + RegisterValue::MAX_ENCODED_SIZE;

    fn encode_body<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        self.name.encode(encoder);
        self.value.encode(encoder);
    }

    fn decode_body(decoder: &mut Decoder<'_>) -> Result<Self> {
        let name = RegisterName::try_decode(decoder)?;
        let value = RegisterValue::try_decode(decoder)?;
        Ok(Self { name, value })
    }
}

/// State of one register, reported by the endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterDataResponse {
    /// Time of sampling, nanoseconds since the endpoint's epoch.
    pub timestamp: u64,
    /// Register traits.
    pub flags: RegisterFlags,
    /// Register name.
    pub name: RegisterName,
    /// Current value.
    pub value: RegisterValue,
}

impl Message for RegisterDataResponse {
    const ID: MessageId = MessageId::RegisterDataResponse;
    const MIN_ENCODED_SIZE: usize = 8 + 1 + RegisterName::MIN_ENCODED_SIZE + RegisterValue::MIN_ENCODED_SIZE;
    const MAX_ENCODED_SIZE: usize = 8 + 1 + RegisterName::MAX_ENCODED_SIZE + RegisterValue::MAX_ENCODED_SIZE;

    fn encode_body<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        encoder.put_u64(self.timestamp);
        encoder.put_u8(self.flags.0);
        self.name.encode(encoder);
        self.value.encode(encoder);
    }

    fn decode_body(decoder: &mut Decoder<'_>) -> Result<Self> {
        let timestamp = decoder.get_u64();
        let flags = RegisterFlags(decoder.get_u8());
        let name = RegisterName::try_decode(decoder)?;
        let value = RegisterValue::try_decode(decoder)?;
        Ok(Self {
            timestamp,
            flags,
            name,
            value,
        })
    }
}

/// Look up the name of the register at a zero-based index.
///
/// Endpoints answer indexes past the end with an empty name, which is
/// how a host learns the register count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterDiscoveryRequest {
    /// Zero-based register index.
    pub index: u16,
}

impl Message for RegisterDiscoveryRequest {
    const ID: MessageId = MessageId::RegisterDiscoveryRequest;
    const MIN_ENCODED_SIZE: usize = 2;
    const MAX_ENCODED_SIZE: usize = 2;

    fn encode_body<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        encoder.put_u16(self.index);
    }

    fn decode_body(decoder: &mut Decoder<'_>) -> Result<Self> {
        Ok(Self {
            index: decoder.get_u16(),
        })
    }
}

/// Name of the register at the requested index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterDiscoveryResponse {
    /// Echoed register index.
    pub index: u16,
    /// Register name; empty when the index is out of range.
    pub name: RegisterName,
}

impl Message for RegisterDiscoveryResponse {
    const ID: MessageId = MessageId::RegisterDiscoveryResponse;
    const MIN_ENCODED_SIZE: usize = 2 + RegisterName::MIN_ENCODED_SIZE;
    const MAX_ENCODED_SIZE: usize = 2 + RegisterName::MAX_ENCODED_SIZE;

    fn encode_body<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        encoder.put_u16(self.index);
        self.name.encode(encoder);
    }

    fn decode_body(decoder: &mut Decoder<'_>) -> Result<Self> {
        let index = decoder.get_u16();
        let name = RegisterName::try_decode(decoder)?;
        Ok(Self { index, name })
    }
}
