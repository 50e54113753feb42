// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Response status words and response error classification
//!
//! Each response frame is terminated by a big-endian status word, with
//! [SW_OK] indicating success. Any other status word is mapped
//! through a fixed table onto [DeviceStatus].

use core::fmt;

use byteorder::{BigEndian, ByteOrder};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter};

/// Success status word
pub const SW_OK: u16 = 0x9000;

/// Length of the status word trailer
pub const SW_LEN: usize = 2;

/// Known device status words
#[derive(
    Copy, Clone, PartialEq, Eq, Debug, Display, EnumIter, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u16)]
pub enum DeviceStatus {
    /// Device is locked (PIN required)
    #[strum(to_string = "device locked")]
    DeviceLocked = 0x5515,

    /// Command length not valid for instruction
    #[strum(to_string = "wrong length")]
    WrongLength = 0x6700,

    /// Security status not satisfied (app requires unlock)
    #[strum(to_string = "security status not satisfied")]
    SecurityStatus = 0x6982,

    /// Request declined by user on the device
    #[strum(to_string = "rejected by user")]
    RejectedByUser = 0x6985,

    /// Command payload rejected by the device
    #[strum(to_string = "invalid data")]
    InvalidData = 0x6a80,

    /// Invalid P1 / P2 parameters
    #[strum(to_string = "invalid p1/p2")]
    InvalidP1P2 = 0x6b00,

    /// Instruction not supported by the app
    #[strum(to_string = "instruction not supported")]
    InsNotSupported = 0x6d00,

    /// Class not supported (wrong app open)
    #[strum(to_string = "class not supported")]
    ClaNotSupported = 0x6e00,

    /// No app open on the device
    #[strum(to_string = "app not open")]
    AppNotOpen = 0x6e01,
}

/// Device error, a known [DeviceStatus] or an unrecognised raw status word
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DeviceError {
    Known(DeviceStatus),
    Unknown(u16),
}

impl DeviceError {
    /// Classify a (non-OK) status word
    pub fn from_status(sw: u16) -> Self {
        match DeviceStatus::try_from(sw) {
            Ok(s) => Self::Known(s),
            Err(_) => Self::Unknown(sw),
        }
    }

    /// Fetch the raw status word
    pub fn status_word(&self) -> u16 {
        match self {
            Self::Known(s) => (*s).into(),
            Self::Unknown(sw) => *sw,
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(s) => write!(f, "{} (0x{:04x})", s, self.status_word()),
            Self::Unknown(sw) => write!(f, "unknown device status (0x{sw:04x})"),
        }
    }
}

/// Malformed response errors
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DecodeError {
    /// Response too short to contain a status word
    Truncated(usize),
    /// Response payload length does not match the request
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated(n) => write!(f, "truncated response ({n} bytes)"),
            Self::LengthMismatch { expected, actual } => write!(
                f,
                "response length mismatch (expected {expected} bytes, got {actual})"
            ),
        }
    }
}

/// Response handling errors, distinguishing malformed responses
/// from explicit device rejections
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ResponseError {
    Decode(DecodeError),
    Device(DeviceError),
}

impl From<DecodeError> for ResponseError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<DeviceError> for ResponseError {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "{e}"),
            Self::Device(e) => write!(f, "{e}"),
        }
    }
}

/// Split a response frame into payload and status word, returning
/// the payload where the status word is [SW_OK]
pub fn check_status(frame: &[u8]) -> Result<&[u8], ResponseError> {
    if frame.len() < SW_LEN {
        return Err(DecodeError::Truncated(frame.len()).into());
    }

    let (payload, sw) = frame.split_at(frame.len() - SW_LEN);
    let sw = BigEndian::read_u16(sw);

    if sw != SW_OK {
        #[cfg(feature = "log")]
        log::debug!("device returned status: 0x{:04x}", sw);

        return Err(DeviceError::from_status(sw).into());
    }

    Ok(payload)
}
