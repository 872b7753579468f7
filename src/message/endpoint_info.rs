//! Endpoint identification message.
//!
//! The response body is 360 fixed bytes (versions, unique ID, four
//! 80-byte zero-padded ASCII text fields) followed by an optional
//! certificate of authenticity of up to 255 bytes. The request form is
//! an empty body: a node asks for identification by sending the bare
//! message header, and a body shorter than the fixed part decodes as
//! that request.

use heapless::{String, Vec};

use crate::codec::{ByteSink, Decoder, Encoder};
use crate::error::{DecodeError, Result};

use super::{expect_header, Message, MessageId};

/// Capacity of the endpoint name and description fields.
pub const TEXT_FIELD_SIZE: usize = 80;

/// Size of the fixed part of the body, before the certificate.
const FIXED_BODY_SIZE: usize = 360;

/// Largest certificate of authenticity.
const CERTIFICATE_CAPACITY: usize = 255;

/// Software version and build identity of the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftwareVersion {
    /// Semantic major version.
    pub major: u8,
    /// Semantic minor version.
    pub minor: u8,
    /// CRC of the firmware image, when known.
    pub image_crc: Option<u64>,
    /// Version control system commit identifier.
    pub vcs_commit_id: u32,
    /// Build timestamp, UTC seconds.
    pub build_timestamp_utc: u32,
    /// Built from a release configuration.
    pub release_build: bool,
    /// Built from a modified working tree.
    pub dirty_build: bool,
}

impl SoftwareVersion {
    const FLAG_IMAGE_CRC: u8 = 1 << 0;
    const FLAG_RELEASE_BUILD: u8 = 1 << 1;
    const FLAG_DIRTY_BUILD: u8 = 1 << 2;

    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.image_crc.is_some() {
            flags |= Self::FLAG_IMAGE_CRC;
        }
        if self.release_build {
            flags |= Self::FLAG_RELEASE_BUILD;
        }
        if self.dirty_build {
            flags |= Self::FLAG_DIRTY_BUILD;
        }
        flags
    }
}

/// Hardware version of the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HardwareVersion {
    /// Major version.
    pub major: u8,
    /// Minor version.
    pub minor: u8,
}

/// Operating mode reported by the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    /// Application firmware is running.
    #[default]
    Normal = 0,
    /// The bootloader is running.
    Bootloader = 1,
}

/// Endpoint identification record.
///
/// A default-constructed instance is the request form; see
/// [`EndpointInfo::is_request`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointInfo {
    /// Software identity.
    pub software_version: SoftwareVersion,
    /// Hardware identity.
    pub hardware_version: HardwareVersion,
    /// Current operating mode.
    pub mode: Mode,
    /// 128-bit globally unique identifier.
    pub globally_unique_id: [u8; 16],
    /// Human-readable endpoint name, e.g. "com.manufacturer.product".
    pub endpoint_name: String<TEXT_FIELD_SIZE>,
    /// Human-readable endpoint description.
    pub endpoint_description: String<TEXT_FIELD_SIZE>,
    /// Description of the build environment.
    pub build_environment_description: String<TEXT_FIELD_SIZE>,
    /// Description of the runtime environment.
    pub runtime_environment_description: String<TEXT_FIELD_SIZE>,
    /// Manufacturer-issued certificate of authenticity, possibly empty.
    pub certificate_of_authenticity: Vec<u8, CERTIFICATE_CAPACITY>,
}

impl EndpointInfo {
    /// True when this record only asks for identification: every field
    /// still holds its default value.
    pub fn is_request(&self) -> bool {
        *self == Self::default()
    }
}

impl Message for EndpointInfo {
    const ID: MessageId = MessageId::EndpointInfo;
    const MIN_ENCODED_SIZE: usize = FIXED_BODY_SIZE;
    const MAX_ENCODED_SIZE: usize = FIXED_BODY_SIZE + CERTIFICATE_CAPACITY;

    fn encode_body<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        let base = encoder.offset();
        let sw = &self.software_version;
        encoder.put_u64(sw.image_crc.unwrap_or(0));
        encoder.put_u32(sw.vcs_commit_id);
        encoder.put_u32(sw.build_timestamp_utc);
        encoder.put_u8(sw.major);
        encoder.put_u8(sw.minor);
        encoder.put_u8(self.hardware_version.major);
        encoder.put_u8(self.hardware_version.minor);
        encoder.put_u8(sw.flags());
        encoder.put_u8(self.mode as u8);
        encoder.fill_up_to(base + 24, 0); // Two reserved bytes.

        encoder.put_bytes(&self.globally_unique_id);

        for (text, end) in [
            (&self.endpoint_name, 120),
            (&self.endpoint_description, 200),
            (&self.build_environment_description, 280),
            (&self.runtime_environment_description, 360),
        ] {
            encoder.put_bytes(text.as_bytes());
            encoder.fill_up_to(base + end, 0);
        }

        encoder.put_bytes(&self.certificate_of_authenticity);
    }

    fn decode_body(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut msg = Self::default();

        let image_crc = decoder.get_u64();
        msg.software_version.vcs_commit_id = decoder.get_u32();
        msg.software_version.build_timestamp_utc = decoder.get_u32();
        msg.software_version.major = decoder.get_u8();
        msg.software_version.minor = decoder.get_u8();
        msg.hardware_version.major = decoder.get_u8();
        msg.hardware_version.minor = decoder.get_u8();

        let flags = decoder.get_u8();
        if flags & SoftwareVersion::FLAG_IMAGE_CRC != 0 {
            msg.software_version.image_crc = Some(image_crc);
        }
        msg.software_version.release_build = flags & SoftwareVersion::FLAG_RELEASE_BUILD != 0;
        msg.software_version.dirty_build = flags & SoftwareVersion::FLAG_DIRTY_BUILD != 0;

        msg.mode = match decoder.get_u8() {
            0 => Mode::Normal,
            1 => Mode::Bootloader,
            value => {
                return Err(DecodeError::InvalidEnum {
                    field: "mode",
                    value: value.into(),
                })
            }
        };
        decoder.skip_up_to(24);

        decoder.get_bytes(&mut msg.globally_unique_id);

        msg.endpoint_name = decoder.get_ascii_string();
        decoder.skip_up_to(120);
        msg.endpoint_description = decoder.get_ascii_string();
        decoder.skip_up_to(200);
        msg.build_environment_description = decoder.get_ascii_string();
        decoder.skip_up_to(280);
        msg.runtime_environment_description = decoder.get_ascii_string();
        decoder.skip_up_to(360);

        while decoder.remaining() > 0 {
            // The size bound keeps the certificate within capacity.
            let _ = msg.certificate_of_authenticity.push(decoder.get_u8());
        }

        Ok(msg)
    }

    fn try_decode(data: &[u8]) -> Result<Self> {
        let body = expect_header(Self::ID, data)?;
        if body.len() > Self::MAX_ENCODED_SIZE {
            return Err(DecodeError::SizeOutOfBounds { len: body.len() });
        }
        if body.len() < Self::MIN_ENCODED_SIZE {
            // Short form: a plain identification request.
            return Ok(Self::default());
        }
        Self::decode_body(&mut Decoder::new(body))
    }
}
