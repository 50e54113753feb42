// Copyright (c) 2022-2023 The MobileCoin Foundation

use ledger_ada_apdu::{
    path::PathError,
    status::{DecodeError, DeviceError, ResponseError},
    ApduError,
};
use tokio::time::error::Elapsed;

/// Ledger Cardano API Error Type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Derivation path rejected prior to device communication
    #[error("Invalid derivation path: {0}")]
    Validation(PathError),

    /// Malformed or unexpected response from the device
    #[error("Invalid response: {0}")]
    Decode(DecodeError),

    /// Request rejected by the device
    #[error("Device error: {0}")]
    Device(DeviceError),

    /// Transport error
    #[error("Transport error: {0}")]
    Transport(ledger_lib::Error),

    /// Request timeout
    #[error("Timeout waiting for device response")]
    RequestTimeout,

    /// Request could not be encoded
    #[error("Failed to encode request")]
    Encode,
}

/// Error kinds, for programmatic matching without inspecting error contents
#[derive(Copy, Clone, PartialEq, Eq, Debug, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Decode,
    Device,
    Transport,
    Timeout,
    Encode,
}

impl Error {
    /// Fetch the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Decode(_) => ErrorKind::Decode,
            Error::Device(_) => ErrorKind::Device,
            Error::Transport(_) => ErrorKind::Transport,
            Error::RequestTimeout => ErrorKind::Timeout,
            Error::Encode => ErrorKind::Encode,
        }
    }

    /// Fetch the error code where available.
    ///
    /// For validation errors this is the stable path error code (`5001`..`5003`),
    /// for device errors this is the raw status word.
    pub fn code(&self) -> Option<u16> {
        match self {
            Error::Validation(e) => Some(e.code()),
            Error::Device(e) => Some(e.status_word()),
            _ => None,
        }
    }
}

impl From<PathError> for Error {
    fn from(e: PathError) -> Self {
        Error::Validation(e)
    }
}

impl From<ResponseError> for Error {
    fn from(e: ResponseError) -> Self {
        match e {
            ResponseError::Decode(e) => Error::Decode(e),
            ResponseError::Device(e) => Error::Device(e),
        }
    }
}

impl From<ApduError> for Error {
    fn from(_: ApduError) -> Self {
        Error::Encode
    }
}

impl From<Elapsed> for Error {
    fn from(_: Elapsed) -> Self {
        Error::RequestTimeout
    }
}

impl From<ledger_lib::Error> for Error {
    fn from(e: ledger_lib::Error) -> Self {
        Error::Transport(e)
    }
}
