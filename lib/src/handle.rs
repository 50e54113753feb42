// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Handle for connected ledger devices
//!
//! This provides methods for interacting with the device
//! and is generic over [ledger_lib::Exchange] implementations.
//!
//! Each [DeviceHandle] is an explicit session, requests against a session
//! are serialised in arrival order and each request sees a complete
//! command / response cycle.

use std::{str::FromStr, sync::Arc, time::Duration};

use ledger_lib::Exchange;
use ledger_proto::ApduReq;
use log::debug;
use tokio::sync::Mutex;

use ledger_ada_apdu::{
    encode_command,
    path::DerivationPath,
    status::DecodeError,
    version::{AppVersion, VersionReq},
    xpub::{ExtendedPublicKey, ExtendedPublicKeyReq, MAX_PATHS_PER_REQUEST, XPUB_LEN},
};

use crate::Error;

/// Default timeout for APDU requests
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Additional time allowed to transports, so request timeouts are
/// reported by the handle rather than the transport
const TRANSPORT_TIMEOUT_MARGIN: Duration = Duration::from_secs(1);

/// Cardano handle for a connected ledger device.
///
/// This is generic over [Exchange] types to support different
/// underlying transports / providers
pub struct DeviceHandle<T: Exchange> {
    /// Device transport, locked for the duration of each request
    t: Arc<Mutex<T>>,
    /// Timeout for APDU requests
    request_timeout: Duration,
}

/// Create a [DeviceHandle] wrapper from a type implementing [Exchange]
impl<T: Exchange> From<T> for DeviceHandle<T> {
    fn from(t: T) -> Self {
        Self {
            t: Arc::new(Mutex::new(t)),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Clones share the underlying session
impl<T: Exchange> Clone for DeviceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            t: self.t.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

impl<T: Exchange + Send> DeviceHandle<T> {
    /// Set the APDU request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Fetch the APDU request timeout
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Fetch ledger application version
    pub async fn app_version(&self) -> Result<AppVersion, Error> {
        debug!("Requesting app version");

        let mut t = self.t.lock().await;

        let resp = self.request(&mut *t, &VersionReq {}).await?;
        let v = AppVersion::decode_response(&resp)?;

        debug!("App version: {} (flags: {:?})", v, v.flags);

        Ok(v)
    }

    /// Fetch the extended public key for a derivation path
    pub async fn get_extended_public_key(
        &self,
        path: &DerivationPath,
    ) -> Result<ExtendedPublicKey, Error> {
        let keys = self
            .get_extended_public_keys(core::slice::from_ref(path))
            .await?;

        keys.into_iter().next().ok_or(Error::Decode(DecodeError::LengthMismatch {
            expected: XPUB_LEN,
            actual: 0,
        }))
    }

    /// Parse a path string (eg. `44'/1815'/0'`) and fetch the associated extended public key
    pub async fn get_extended_public_key_str(
        &self,
        path: &str,
    ) -> Result<ExtendedPublicKey, Error> {
        let path = DerivationPath::from_str(path)?;
        self.get_extended_public_key(&path).await
    }

    /// Fetch extended public keys for a batch of derivation paths.
    ///
    /// All paths are validated before any request is issued, results are
    /// returned in request order and no partial results are returned on failure.
    pub async fn get_extended_public_keys(
        &self,
        paths: &[DerivationPath],
    ) -> Result<Vec<ExtendedPublicKey>, Error> {
        // Reject invalid paths prior to device communication
        for p in paths {
            if let Err(e) = p.validate() {
                debug!("Rejecting path {}: {}", p, e);
                return Err(e.into());
            }
        }

        if paths.is_empty() {
            return Ok(vec![]);
        }

        // Hold the session for the whole batch so requests are not interleaved
        let mut t = self.t.lock().await;

        let mut keys = Vec::with_capacity(paths.len());

        for chunk in paths.chunks(MAX_PATHS_PER_REQUEST) {
            debug!(
                "Requesting extended public keys for: {:?}",
                chunk.iter().map(|p| p.to_string()).collect::<Vec<_>>()
            );

            let req = ExtendedPublicKeyReq::batch(chunk)?;
            let resp = self.request(&mut *t, &req).await?;

            let decoded = req.decode_response(&resp)?;
            keys.extend(decoded.into_iter());
        }

        Ok(keys)
    }

    /// Close the session, the underlying transport is released once
    /// all clones of this handle have been dropped
    pub fn close(self) {
        debug!("Closing device session");
    }

    /// Encode and exchange a request with the device, the caller must hold the session lock
    async fn request<'a>(&self, t: &mut T, req: &impl ApduReq<'a>) -> Result<Vec<u8>, Error> {
        let mut buff = [0u8; 256];
        let n = encode_command(req, &mut buff)?;

        // A timeout drops the in-flight exchange, partial responses are never used
        let resp = tokio::time::timeout(
            self.request_timeout,
            t.exchange(&buff[..n], self.request_timeout + TRANSPORT_TIMEOUT_MARGIN),
        )
        .await??;

        Ok(resp)
    }
}
