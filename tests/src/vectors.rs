// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Extended public key test vectors

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use ledger_ada::{DerivationPath, ExtendedPublicKey};

/// Default vectors, served by the mock device
const TEST_VECTOR_SRC: &str = include_str!("vectors.toml");

/// Extended public key test vector
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub path: String,
    pub public_key: String,
    pub chain_code: String,
}

impl Vector {
    /// Parse vector derivation path
    pub fn path(&self) -> DerivationPath {
        DerivationPath::from_str(&self.path).expect("invalid vector path")
    }

    /// Decode expected extended public key
    pub fn key(&self) -> ExtendedPublicKey {
        let mut k = ExtendedPublicKey {
            public_key: [0u8; 32],
            chain_code: [0u8; 32],
        };

        hex::decode_to_slice(&self.public_key, &mut k.public_key).expect("invalid public key");
        hex::decode_to_slice(&self.chain_code, &mut k.chain_code).expect("invalid chain code");

        k
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct VectorFile {
    pub vectors: Vec<Vector>,
}

/// Load vectors from a TOML string
pub fn load(s: &str) -> anyhow::Result<Vec<Vector>> {
    let f: VectorFile = toml::from_str(s)?;
    Ok(f.vectors)
}

lazy_static::lazy_static! {
    /// Default test vectors
    pub static ref TEST_VECTORS: Vec<Vector> = load(TEST_VECTOR_SRC).expect("invalid test vectors");
}

/// Lookup a default test vector by path string
pub fn find(path: &str) -> Option<&'static Vector> {
    TEST_VECTORS.iter().find(|v| v.path == path)
}
