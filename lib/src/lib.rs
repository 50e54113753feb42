// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Ledger Cardano API Library (and CLI)
//!
//! Provides validated extended public key retrieval from a Cardano
//! hardware wallet over any [Exchange] transport.
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! use ledger_ada::{transport::TcpOptions, Connect, LedgerProvider};
//!
//! // Open a session (speculos TCP transport)
//! let d = LedgerProvider.connect(&TcpOptions::default()).await?;
//!
//! // Fetch extended public key
//! let k = d.get_extended_public_key_str("44'/1815'/0'").await?;
//! println!("public key: {}", hex::encode(k.public_key));
//!
//! // Close the session
//! d.close();
//! # Ok(())
//! # }
//! ```

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Re-export transports for consumer use
pub mod transport;
pub use transport::Exchange;

/// Re-export `ledger-ada-apdu` for consumers
pub use ledger_ada_apdu::{self as apdu};

pub use ledger_ada_apdu::{
    path::{DerivationIndex, DerivationPath, PathError},
    xpub::ExtendedPublicKey,
};

mod handle;
pub use handle::{DeviceHandle, DEFAULT_REQUEST_TIMEOUT};

mod error;
pub use error::{Error, ErrorKind};

/// Ledger provider, opens sessions with ledger devices
#[derive(Copy, Clone, Debug, Default)]
pub struct LedgerProvider;

/// Connect trait for supported transports, opening a new session
#[async_trait]
pub trait Connect<T: Exchange> {
    type Options: Debug + Send + Sync;

    /// Connect to the specified device
    async fn connect(&self, opts: &Self::Options) -> Result<DeviceHandle<T>, Error>;
}

/// Connect implementation for TCP devices
#[cfg(feature = "transport_tcp")]
#[async_trait]
impl Connect<transport::TcpTransport> for LedgerProvider {
    type Options = transport::TcpOptions;

    async fn connect(
        &self,
        opts: &Self::Options,
    ) -> Result<DeviceHandle<transport::TcpTransport>, Error> {
        log::debug!("Connecting to TCP device: {:?}", opts);

        // Connect to device
        let t = transport::TcpTransport::new(opts).await?;

        // Create handle
        Ok(DeviceHandle::from(t))
    }
}

/// Hex encoded extended public key, for display and serialisation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct XpubInfo {
    /// Derivation path
    pub path: String,
    /// Hex encoded public key
    pub public_key: String,
    /// Hex encoded chain code
    pub chain_code: String,
}

impl XpubInfo {
    /// Create a new [XpubInfo] from a path and key
    pub fn new(path: &DerivationPath, key: &ExtendedPublicKey) -> Self {
        Self {
            path: path.to_string(),
            public_key: hex::encode(key.public_key),
            chain_code: hex::encode(key.chain_code),
        }
    }
}

impl std::fmt::Display for XpubInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} public_key: {} chain_code: {}",
            self.path, self.public_key, self.chain_code
        )
    }
}
