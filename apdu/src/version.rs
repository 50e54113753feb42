// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Application version APDUs

use encdec::{DecodeOwned, Encode};

use super::{ApduError, ApduStatic, Instruction, ADA_APDU_CLA};
use crate::status::{check_status, DecodeError, ResponseError};

/// Fetch application version APDU
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct VersionReq {}

impl ApduStatic for VersionReq {
    const CLA: u8 = ADA_APDU_CLA;
    const INS: u8 = Instruction::GetVersion as u8;
}

impl Encode for VersionReq {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn encode(&self, _buff: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }
}

impl DecodeOwned for VersionReq {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(_buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        Ok((Self {}, 0))
    }
}

/// Application version response APDU
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     MAJOR     |     MINOR     |     PATCH     |     FLAGS     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AppVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub flags: AppFlags,
}

bitflags::bitflags! {
    /// Application version flags
    pub struct AppFlags: u8 {
        /// App built in debug mode
        const DEBUG = 1 << 0;

        /// App running without user interaction (simulator)
        const HEADLESS = 1 << 1;
    }
}

impl AppVersion {
    /// Create a new application version
    pub fn new(major: u8, minor: u8, patch: u8, flags: AppFlags) -> Self {
        Self {
            major,
            minor,
            patch,
            flags,
        }
    }

    /// Decode a response frame (including status word)
    pub fn decode_response(frame: &[u8]) -> Result<Self, ResponseError> {
        let payload = check_status(frame)?;

        match Self::decode_owned(payload) {
            Ok((v, 4)) if payload.len() == 4 => Ok(v),
            _ => Err(DecodeError::LengthMismatch {
                expected: 4,
                actual: payload.len(),
            }
            .into()),
        }
    }
}

impl core::fmt::Display for AppVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Encode for AppVersion {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(4)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.major;
        buff[1] = self.minor;
        buff[2] = self.patch;
        buff[3] = self.flags.bits();

        Ok(4)
    }
}

impl DecodeOwned for AppVersion {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        let v = Self {
            major: buff[0],
            minor: buff[1],
            patch: buff[2],
            flags: AppFlags::from_bits_truncate(buff[3]),
        };

        Ok((v, 4))
    }
}
