//! Bootloader status and image transfer messages.
//!
//! The image data request and response share one body layout; a request
//! with an empty data field asks the bootloader to read back the block
//! at the given offset, a non-empty one writes it.

use heapless::Vec;

use crate::codec::{ByteSink, Decoder, Encoder};
use crate::error::{DecodeError, Result};

use super::{Message, MessageId};

/// Largest image block carried by one message.
pub const IMAGE_DATA_CAPACITY: usize = 256;

/// States of the endpoint's bootloader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum BootloaderState {
    /// No valid application image is present.
    #[default]
    NoAppToBoot = 0,
    /// Waiting before booting the application.
    BootDelay = 1,
    /// An automatic boot was cancelled by the host.
    BootCancelled = 2,
    /// An application upgrade is being written.
    AppUpgradeInProgress = 3,
    /// A valid application is about to start.
    ReadyToBoot = 4,
}

impl BootloaderState {
    fn from_u8(value: u8) -> Result<Self> {
        Ok(match value {
            0 => Self::NoAppToBoot,
            1 => Self::BootDelay,
            2 => Self::BootCancelled,
            3 => Self::AppUpgradeInProgress,
            4 => Self::ReadyToBoot,
            value => {
                return Err(DecodeError::InvalidEnum {
                    field: "bootloader state",
                    value: value.into(),
                })
            }
        })
    }
}

/// Kinds of image the bootloader can transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum BootloaderImageType {
    /// The application firmware image.
    #[default]
    Application = 0,
    /// The manufacturer certificate of authenticity.
    CertificateOfAuthenticity = 1,
}

impl BootloaderImageType {
    fn from_u8(value: u8) -> Result<Self> {
        Ok(match value {
            0 => Self::Application,
            1 => Self::CertificateOfAuthenticity,
            value => {
                return Err(DecodeError::InvalidEnum {
                    field: "image type",
                    value: value.into(),
                })
            }
        })
    }
}

/// Query the bootloader state, optionally requesting a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootloaderStatusRequest {
    /// State the host would like the bootloader to enter.
    pub desired_state: BootloaderState,
}

impl Message for BootloaderStatusRequest {
    const ID: MessageId = MessageId::BootloaderStatusRequest;
    const MIN_ENCODED_SIZE: usize = 1;
    const MAX_ENCODED_SIZE: usize = 1;

    fn encode_body<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        encoder.put_u8(self.desired_state as u8);
    }

    fn decode_body(decoder: &mut Decoder<'_>) -> Result<Self> {
        Ok(Self {
            desired_state: BootloaderState::from_u8(decoder.get_u8())?,
        })
    }
}

/// Bootloader state report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootloaderStatusResponse {
    /// Time of the report, nanoseconds since the endpoint's epoch.
    pub timestamp: u64,
    /// Implementation-defined status flags.
    pub flags: u64,
    /// Current state.
    pub state: BootloaderState,
}

impl Message for BootloaderStatusResponse {
    const ID: MessageId = MessageId::BootloaderStatusResponse;
    const MIN_ENCODED_SIZE: usize = 17;
    const MAX_ENCODED_SIZE: usize = 17;

    fn encode_body<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        encoder.put_u64(self.timestamp);
        encoder.put_u64(self.flags);
        encoder.put_u8(self.state as u8);
    }

    fn decode_body(decoder: &mut Decoder<'_>) -> Result<Self> {
        Ok(Self {
            timestamp: decoder.get_u64(),
            flags: decoder.get_u64(),
            state: BootloaderState::from_u8(decoder.get_u8())?,
        })
    }
}

/// Transfer one block of an image to the bootloader, or request one
/// back with an empty data field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootloaderImageDataRequest {
    /// Byte offset of the block within the image.
    pub image_offset: u64,
    /// Which image the block belongs to.
    pub image_type: BootloaderImageType,
    /// Block contents, up to 256 bytes.
    pub image_data: Vec<u8, IMAGE_DATA_CAPACITY>,
}

impl Message for BootloaderImageDataRequest {
    const ID: MessageId = MessageId::BootloaderImageDataRequest;
    const MIN_ENCODED_SIZE: usize = 9;
    const MAX_ENCODED_SIZE: usize = 9 + IMAGE_DATA_CAPACITY;

    fn encode_body<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        encode_image_body(encoder, self.image_offset, self.image_type, &self.image_data);
    }

    fn decode_body(decoder: &mut Decoder<'_>) -> Result<Self> {
        let (image_offset, image_type, image_data) = decode_image_body(decoder)?;
        Ok(Self {
            image_offset,
            image_type,
            image_data,
        })
    }
}

/// Mirror of [`BootloaderImageDataRequest`]: carries the data actually
/// written or read back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootloaderImageDataResponse {
    /// Byte offset of the block within the image.
    pub image_offset: u64,
    /// Which image the block belongs to.
    pub image_type: BootloaderImageType,
    /// Block contents, up to 256 bytes.
    pub image_data: Vec<u8, IMAGE_DATA_CAPACITY>,
}

impl Message for BootloaderImageDataResponse {
    const ID: MessageId = MessageId::BootloaderImageDataResponse;
    const MIN_ENCODED_SIZE: usize = 9;
    const MAX_ENCODED_SIZE: usize = 9 + IMAGE_DATA_CAPACITY;

    fn encode_body<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        encode_image_body(encoder, self.image_offset, self.image_type, &self.image_data);
    }

    fn decode_body(decoder: &mut Decoder<'_>) -> Result<Self> {
        let (image_offset, image_type, image_data) = decode_image_body(decoder)?;
        Ok(Self {
            image_offset,
            image_type,
            image_data,
        })
    }
}

fn encode_image_body<S: ByteSink>(
    encoder: &mut Encoder<'_, S>,
    image_offset: u64,
    image_type: BootloaderImageType,
    image_data: &[u8],
) {
    encoder.put_u64(image_offset);
    encoder.put_u8(image_type as u8);
    encoder.put_bytes(image_data);
}

fn decode_image_body(
    decoder: &mut Decoder<'_>,
) -> Result<(u64, BootloaderImageType, Vec<u8, IMAGE_DATA_CAPACITY>)> {
    let image_offset = decoder.get_u64();
    let image_type = BootloaderImageType::from_u8(decoder.get_u8())?;
    let mut image_data = Vec::new();
    while decoder.remaining() > 0 {
        // The size bound keeps the block within capacity.
        let _ = image_data.push(decoder.get_u8());
    }
    Ok((image_offset, image_type, image_data))
}
