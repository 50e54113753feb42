// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Extended public key APDUs, for fetching BIP32-ed25519 public keys
//! and chain codes for one or more derivation paths

use encdec::{DecodeOwned, Encode};
use heapless::Vec;

use super::{ApduError, ApduStatic, Instruction, ADA_APDU_CLA};
use crate::{
    helpers::arr,
    path::{DerivationPath, MAX_PATH_LEN},
    status::{check_status, DecodeError, ResponseError},
};

/// Maximum number of paths per request (bounded by response APDU size)
pub const MAX_PATHS_PER_REQUEST: usize = 3;

/// Encoded length of a single [ExtendedPublicKey] record
pub const XPUB_LEN: usize = 64;

/// Maximum encoded request payload length
pub const MAX_REQUEST_LEN: usize = 1 + MAX_PATHS_PER_REQUEST * (1 + MAX_PATH_LEN * 4);

/// Extended public key request APDU.
///
/// Requests extended public keys for up to [MAX_PATHS_PER_REQUEST] paths,
/// paths must be validated prior to encoding.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   PATH_COUNT  |                                               |
/// +-+-+-+-+-+-+-+-+                                               +
/// /                    PATH_0 (see DerivationPath)                /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                           PATH_N...                           /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ExtendedPublicKeyReq {
    /// Derivation paths, responses are returned in the same order
    pub paths: Vec<DerivationPath, MAX_PATHS_PER_REQUEST>,
}

impl ExtendedPublicKeyReq {
    /// Create a new [ExtendedPublicKeyReq] for a single path
    pub fn new(path: DerivationPath) -> Result<Self, ApduError> {
        Self::batch(&[path])
    }

    /// Create a new [ExtendedPublicKeyReq] for a batch of paths
    pub fn batch(paths: &[DerivationPath]) -> Result<Self, ApduError> {
        let paths = Vec::from_slice(paths).map_err(|_| ApduError::InvalidLength)?;
        Ok(Self { paths })
    }

    /// Expected response payload length for this request
    pub fn response_len(&self) -> usize {
        self.paths.len() * XPUB_LEN
    }

    /// Decode a response frame (including status word) for this request
    pub fn decode_response(
        &self,
        frame: &[u8],
    ) -> Result<Vec<ExtendedPublicKey, MAX_PATHS_PER_REQUEST>, ResponseError> {
        decode_response(frame, self.paths.len())
    }
}

impl ApduStatic for ExtendedPublicKeyReq {
    const CLA: u8 = ADA_APDU_CLA;
    const INS: u8 = Instruction::GetExtendedPublicKey as u8;
}

impl Encode for ExtendedPublicKeyReq {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        let mut n = 1;
        for p in self.paths.iter() {
            n += p.encode_len()?;
        }
        Ok(n)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.paths.len() as u8;
        let mut index = 1;

        for p in self.paths.iter() {
            index += p.encode(&mut buff[index..])?;
        }

        Ok(index)
    }
}

impl DecodeOwned for ExtendedPublicKeyReq {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        let (count, _) = buff.split_first().ok_or(ApduError::InvalidLength)?;

        let count = *count as usize;
        if count == 0 || count > MAX_PATHS_PER_REQUEST {
            return Err(ApduError::InvalidLength);
        }

        let mut paths = Vec::new();
        let mut index = 1;

        for _ in 0..count {
            let (p, n) = DerivationPath::decode_owned(&buff[index..])?;
            paths.push(p).map_err(|_| ApduError::InvalidLength)?;
            index += n;
        }

        Ok((Self { paths }, index))
    }
}

/// Extended public key, a 32-byte ed25519 public key with 32-byte chain code
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PUBLIC_KEY                           /
/// /                  (32-byte ed25519 public key)                 /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          CHAIN_CODE                           /
/// /                           (32-byte)                           /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ExtendedPublicKey {
    /// ed25519 public key
    pub public_key: [u8; 32],
    /// BIP32 chain code
    pub chain_code: [u8; 32],
}

impl Encode for ExtendedPublicKey {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(XPUB_LEN)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        let mut index = arr::enc(&self.public_key, buff)?;
        index += arr::enc(&self.chain_code, &mut buff[index..])?;
        Ok(index)
    }
}

impl DecodeOwned for ExtendedPublicKey {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        let (public_key, n) = arr::dec::<32>(buff)?;
        let (chain_code, m) = arr::dec::<32>(&buff[n..])?;

        Ok((
            Self {
                public_key,
                chain_code,
            },
            n + m,
        ))
    }
}

/// Decode a response frame containing `count` extended public keys.
///
/// The payload must be exactly `count * 64` bytes, no partial results
/// are returned.
pub fn decode_response(
    frame: &[u8],
    count: usize,
) -> Result<Vec<ExtendedPublicKey, MAX_PATHS_PER_REQUEST>, ResponseError> {
    let payload = check_status(frame)?;

    let expected = count * XPUB_LEN;
    let mismatch = DecodeError::LengthMismatch {
        expected,
        actual: payload.len(),
    };

    if count > MAX_PATHS_PER_REQUEST || payload.len() != expected {
        return Err(mismatch.into());
    }

    let mut keys = Vec::new();
    for chunk in payload.chunks_exact(XPUB_LEN) {
        // Lengths checked above so neither of these may fail
        let (k, _) = ExtendedPublicKey::decode_owned(chunk).map_err(|_| mismatch)?;
        keys.push(k).map_err(|_| mismatch)?;
    }

    Ok(keys)
}
