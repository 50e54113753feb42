// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::{
    path::{validate, DerivationIndex, DerivationPath, PathError},
    status::{DecodeError, DeviceError, DeviceStatus, ResponseError},
    version::{AppFlags, AppVersion, VersionReq},
    xpub::{ExtendedPublicKey, ExtendedPublicKeyReq, MAX_PATHS_PER_REQUEST},
};
