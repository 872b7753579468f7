//! Device management command messages.

use crate::codec::{ByteSink, Decoder, Encoder};
use crate::error::{DecodeError, Result};

use super::{Message, MessageId};

/// Commands a host can issue to an endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u16)]
pub enum DeviceManagementCommand {
    /// Restart the endpoint.
    #[default]
    Restart = 0,
    /// Power the endpoint off.
    PowerOff = 1,
    /// Reboot into the bootloader.
    LaunchBootloader = 2,
    /// Erase persistent configuration.
    FactoryReset = 3,
    /// Emit a brief diagnostic dump.
    PrintDiagnosticsBrief = 4,
    /// Emit a verbose diagnostic dump.
    PrintDiagnosticsVerbose = 5,
}

impl DeviceManagementCommand {
    fn from_u16(value: u16) -> Result<Self> {
        Ok(match value {
            0 => Self::Restart,
            1 => Self::PowerOff,
            2 => Self::LaunchBootloader,
            3 => Self::FactoryReset,
            4 => Self::PrintDiagnosticsBrief,
            5 => Self::PrintDiagnosticsVerbose,
            value => {
                return Err(DecodeError::InvalidEnum {
                    field: "command",
                    value,
                })
            }
        })
    }
}

/// Outcome of a device management command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandStatus {
    /// The command was accepted.
    #[default]
    Ok = 0,
    /// The command is not supported by this endpoint.
    BadCommand = 1,
    /// The endpoint cannot execute the command right now.
    MaybeLater = 2,
}

/// Ask the endpoint to execute a management command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceManagementCommandRequest {
    /// Command to execute.
    pub command: DeviceManagementCommand,
}

impl Message for DeviceManagementCommandRequest {
    const ID: MessageId = MessageId::DeviceManagementCommandRequest;
    const MIN_ENCODED_SIZE: usize = 2;
    const MAX_ENCODED_SIZE: usize = 2;

    fn encode_body<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        encoder.put_u16(self.command as u16);
    }

    fn decode_body(decoder: &mut Decoder<'_>) -> Result<Self> {
        Ok(Self {
            command: DeviceManagementCommand::from_u16(decoder.get_u16())?,
        })
    }
}

/// Report the outcome of a management command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceManagementCommandResponse {
    /// Echoed command.
    pub command: DeviceManagementCommand,
    /// Execution status.
    pub status: CommandStatus,
}

impl Message for DeviceManagementCommandResponse {
    const ID: MessageId = MessageId::DeviceManagementCommandResponse;
    const MIN_ENCODED_SIZE: usize = 3;
    const MAX_ENCODED_SIZE: usize = 3;

    fn encode_body<S: ByteSink>(&self, encoder: &mut Encoder<'_, S>) {
        encoder.put_u16(self.command as u16);
        encoder.put_u8(self.status as u8);
    }

    fn decode_body(decoder: &mut Decoder<'_>) -> Result<Self> {
        let command = DeviceManagementCommand::from_u16(decoder.get_u16())?;
        let status = match decoder.get_u8() {
            0 => CommandStatus::Ok,
            1 => CommandStatus::BadCommand,
            2 => CommandStatus::MaybeLater,
            value => {
                return Err(DecodeError::InvalidEnum {
                    field: "status",
                    value: value.into(),
                })
            }
        };
        Ok(Self { command, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<M: Message>(message: &M) -> Vec<u8> {
        let mut buf = Vec::new();
        message.encode(&mut buf);
        buf
    }

    #[test]
    fn test_request() {
        let msg = DeviceManagementCommandRequest::default();
        assert_eq!(msg.command, DeviceManagementCommand::Restart);
        assert_eq!(encode(&msg), [5, 0, 0, 0]);
        assert_eq!(
            DeviceManagementCommandRequest::try_decode(&encode(&msg)).unwrap(),
            msg
        );

        let msg = DeviceManagementCommandRequest {
            command: DeviceManagementCommand::FactoryReset,
        };
        assert_eq!(encode(&msg), [5, 0, 3, 0]);
        assert_eq!(
            DeviceManagementCommandRequest::try_decode(&encode(&msg)).unwrap(),
            msg
        );
    }

    #[test]
    fn test_response() {
        let msg = DeviceManagementCommandResponse::default();
        assert_eq!(encode(&msg), [6, 0, 0, 0, 0]);

        let msg = DeviceManagementCommandResponse {
            command: DeviceManagementCommand::FactoryReset,
            status: CommandStatus::MaybeLater,
        };
        assert_eq!(encode(&msg), [6, 0, 3, 0, 2]);

        let decoded = DeviceManagementCommandResponse::try_decode(&encode(&msg)).unwrap();
        assert_eq!(decoded.command, DeviceManagementCommand::FactoryReset);
        assert_eq!(decoded.status, CommandStatus::MaybeLater);
    }

    #[test]
    fn test_unknown_enumerations_rejected() {
        assert_eq!(
            DeviceManagementCommandRequest::try_decode(&[5, 0, 99, 0]),
            Err(DecodeError::InvalidEnum {
                field: "command",
                value: 99
            })
        );
        assert_eq!(
            DeviceManagementCommandResponse::try_decode(&[6, 0, 0, 0, 9]),
            Err(DecodeError::InvalidEnum {
                field: "status",
                value: 9
            })
        );
    }

    #[test]
    fn test_size_bounds() {
        assert!(DeviceManagementCommandRequest::try_decode(&[5, 0, 0]).is_err());
        assert!(DeviceManagementCommandRequest::try_decode(&[5, 0, 0, 0, 0]).is_err());
    }
}
