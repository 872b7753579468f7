//! Standard messages carried as frame payloads.
//!
//! Every standard message starts with a fixed two-byte header: the
//! little-endian 16-bit message ID, whose high bit is reserved zero. The
//! rest of the payload is the body, laid out per record type over the
//! [`crate::codec`] stream codec.
//!
//! Decoding validates the ID, the reserved bit, the body size bounds and
//! every enumerated field; any violation fails without partial side
//! effects. Encoding never fails.
//!
//! # Example
//!
//! ```
//! use devlink::message::{Message, RegisterDiscoveryRequest};
//!
//! let request = RegisterDiscoveryRequest { index: 12345 };
//! let mut buf: Vec<u8> = Vec::new();
//! request.encode(&mut buf);
//! assert_eq!(buf, [0x03, 0x00, 0x39, 0x30]);
//!
//! let decoded = RegisterDiscoveryRequest::try_decode(&buf).unwrap();
//! assert_eq!(decoded, request);
//! ```

mod bootloader;
mod device_management;
mod endpoint_info;
mod register_data;
mod register_value;

pub use bootloader::{
    BootloaderImageDataRequest, BootloaderImageDataResponse, BootloaderImageType,
    BootloaderState, BootloaderStatusRequest, BootloaderStatusResponse, IMAGE_DATA_CAPACITY,
};
pub use device_management::{
    CommandStatus, DeviceManagementCommand, DeviceManagementCommandRequest,
    DeviceManagementCommandResponse,
};
pub use endpoint_info::{EndpointInfo, HardwareVersion, Mode, SoftwareVersion, TEXT_FIELD_SIZE};
pub use register_data::{
    RegisterDataRequest, RegisterDataResponse, RegisterDiscoveryRequest,
    RegisterDiscoveryResponse, RegisterFlags,
};
pub use register_value::{RegisterName, RegisterValue, REGISTER_NAME_CAPACITY};

use crate::codec::{ByteSink, Decoder, Encoder};
use crate::error::{DecodeError, Result};

/// Message header size in bytes (the 16-bit message ID).
pub const MESSAGE_HEADER_SIZE: usize = 2;

/// Mask of the reserved high bit of the message ID.
const RESERVED_ID_BIT: u16 = 0x8000;

/// Identifiers of the standard messages.
///
/// IDs are 15-bit values; the high bit of the on-wire field is reserved
/// zero and rejected on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum MessageId {
    /// Endpoint identification, or its empty request form.
    EndpointInfo = 0,
    /// Register read (empty value) or write request.
    RegisterDataRequest = 1,
    /// Register state report.
    RegisterDataResponse = 2,
    /// Register enumeration by index.
    RegisterDiscoveryRequest = 3,
    /// Register enumeration result.
    RegisterDiscoveryResponse = 4,
    /// Device management command.
    DeviceManagementCommandRequest = 5,
    /// Device management command outcome.
    DeviceManagementCommandResponse = 6,
    /// Bootloader state query / transition request.
    BootloaderStatusRequest = 7,
    /// Bootloader state report.
    BootloaderStatusResponse = 8,
    /// Image block transfer request.
    BootloaderImageDataRequest = 9,
    /// Image block transfer response.
    BootloaderImageDataResponse = 10,
}

/// A standard message record: fixed ID, bounded body, stream-codec
/// field layout.
pub trait Message: Sized {
    /// Wire identifier of this record type.
    const ID: MessageId;
    /// Smallest valid body, in bytes, excluding the header.
    const MIN_ENCODED_SIZE: usize;
    /// Largest valid body, in bytes, excluding the header.
    const MAX_ENCODED_SIZE: usize;

    /// Write the body fields. The encoder's offset is already past the
    /// header.
    fn encode_body<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>);

    /// Read the body fields from a size-checked body decoder.
    fn decode_body(decoder: &mut Decoder<'_>) -> Result<Self>;

    /// Encode the header and body into `sink`. Returns the number of
    /// bytes the sink accepted.
    fn encode<S: ByteSink>(&self, sink: &mut S) -> usize {
        let mut encoder = Encoder::new(sink);
        encoder.put_u16(Self::ID as u16);
        self.encode_body(&mut encoder);
        encoder.offset()
    }

    /// Decode a whole message, header included.
    fn try_decode(data: &[u8]) -> Result<Self> {
        let body = expect_header(Self::ID, data)?;
        if body.len() < Self::MIN_ENCODED_SIZE || body.len() > Self::MAX_ENCODED_SIZE {
            return Err(DecodeError::SizeOutOfBounds { len: body.len() });
        }
        Self::decode_body(&mut Decoder::new(body))
    }
}

/// Validate the two-byte header and return the body slice.
pub(crate) fn expect_header(expected: MessageId, data: &[u8]) -> Result<&[u8]> {
    if data.len() < MESSAGE_HEADER_SIZE {
        return Err(DecodeError::TruncatedHeader);
    }
    let id = u16::from_le_bytes([data[0], data[1]]);
    if id & RESERVED_ID_BIT != 0 {
        return Err(DecodeError::ReservedIdBit);
    }
    if id != expected as u16 {
        return Err(DecodeError::UnexpectedMessageId {
            expected: expected as u16,
            found: id,
        });
    }
    Ok(&data[MESSAGE_HEADER_SIZE..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assigned_ids() {
        assert_eq!(MessageId::EndpointInfo as u16, 0);
        assert_eq!(MessageId::RegisterDataRequest as u16, 1);
        assert_eq!(MessageId::RegisterDataResponse as u16, 2);
        assert_eq!(MessageId::RegisterDiscoveryRequest as u16, 3);
        assert_eq!(MessageId::RegisterDiscoveryResponse as u16, 4);
        assert_eq!(MessageId::DeviceManagementCommandRequest as u16, 5);
        assert_eq!(MessageId::DeviceManagementCommandResponse as u16, 6);
        assert_eq!(MessageId::BootloaderStatusRequest as u16, 7);
        assert_eq!(MessageId::BootloaderStatusResponse as u16, 8);
        assert_eq!(MessageId::BootloaderImageDataRequest as u16, 9);
        assert_eq!(MessageId::BootloaderImageDataResponse as u16, 10);
    }

    #[test]
    fn test_expect_header() {
        assert_eq!(
            expect_header(MessageId::RegisterDataRequest, &[]),
            Err(DecodeError::TruncatedHeader)
        );
        assert_eq!(
            expect_header(MessageId::RegisterDataRequest, &[1]),
            Err(DecodeError::TruncatedHeader)
        );
        assert_eq!(
            expect_header(MessageId::RegisterDataRequest, &[1, 0, 7, 7]),
            Ok(&[7u8, 7][..])
        );
        assert_eq!(
            expect_header(MessageId::RegisterDataRequest, &[2, 0]),
            Err(DecodeError::UnexpectedMessageId {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_reserved_high_bit_rejected() {
        // ID 1 with the reserved bit set: 0x8001 little-endian.
        assert_eq!(
            expect_header(MessageId::RegisterDataRequest, &[0x01, 0x80, 0, 0]),
            Err(DecodeError::ReservedIdBit)
        );
    }
}
