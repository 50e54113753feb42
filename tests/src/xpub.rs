// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Extended public key tests

use std::str::FromStr;

use log::{debug, info};

use ledger_ada::{DerivationPath, DeviceHandle, ErrorKind, Exchange, PathError};

use crate::vectors::Vector;

/// Fetch extended public keys for each vector and check these match expectations
pub async fn vectors<T>(d: &DeviceHandle<T>, vectors: &[Vector]) -> anyhow::Result<()>
where
    T: Exchange + Send,
{
    for v in vectors {
        info!("fetching extended public key for: {}", v.path);

        let k = d.get_extended_public_key(&v.path()).await?;

        info!("received public key: {}", hex::encode(k.public_key));
        info!("received chain code: {}", hex::encode(k.chain_code));

        assert_eq!(k, v.key(), "key mismatch for path: {}", v.path);
    }

    Ok(())
}

/// Check repeated requests for the same path return identical keys
pub async fn idempotent<T>(d: &DeviceHandle<T>, path: &str) -> anyhow::Result<()>
where
    T: Exchange + Send,
{
    let p = DerivationPath::from_str(path).map_err(|e| anyhow::anyhow!("{e}"))?;

    let a = d.get_extended_public_key(&p).await?;
    let b = d.get_extended_public_key(&p).await?;

    assert_eq!(a.public_key, b.public_key);
    assert_eq!(a.chain_code, b.chain_code);

    Ok(())
}

/// Invalid paths and the expected validation error
pub const INVALID_PATHS: &[(&str, PathError)] = &[
    ("44'/1815'/55'/non-number", PathError::InvalidValue),
    ("44'/1815'/33/125", PathError::InvalidPrefix),
    ("44'/1815'", PathError::PathTooShort),
    ("44'/abc", PathError::InvalidValue),
    ("1852'/1815'/0'", PathError::InvalidPrefix),
];

/// Check invalid paths are rejected with the expected error codes
pub async fn reject_invalid<T>(d: &DeviceHandle<T>) -> anyhow::Result<()>
where
    T: Exchange + Send,
{
    for (path, expected) in INVALID_PATHS {
        debug!("requesting invalid path: {}", path);

        let e = match d.get_extended_public_key_str(path).await {
            Ok(_) => return Err(anyhow::anyhow!("expected error for path: {path}")),
            Err(e) => e,
        };

        info!("path {} rejected: {}", path, e);

        assert_eq!(e.kind(), ErrorKind::Validation);
        assert_eq!(e.code(), Some(expected.code()));
        assert!(e.to_string().contains(&expected.code().to_string()));
    }

    Ok(())
}

/// Check batch requests return keys matching individual requests, in request order
pub async fn batch<T>(d: &DeviceHandle<T>, paths: &[DerivationPath]) -> anyhow::Result<()>
where
    T: Exchange + Send,
{
    info!("fetching {} extended public keys", paths.len());

    let keys = d.get_extended_public_keys(paths).await?;
    assert_eq!(keys.len(), paths.len());

    for (p, k) in paths.iter().zip(keys.iter()) {
        let single = d.get_extended_public_key(p).await?;
        assert_eq!(&single, k, "batch order mismatch for path: {p}");
    }

    Ok(())
}
