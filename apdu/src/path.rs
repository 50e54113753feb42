// Copyright (c) 2022-2023 The MobileCoin Foundation

//! BIP32 derivation path model and validation for the Cardano
//! `44'/1815'/ACCOUNT'/...` scheme
//!
//! Paths are validated on the host prior to any device interaction,
//! with failures reported via [PathError] using stable numeric codes.

use core::{fmt, str::FromStr};

use byteorder::{BigEndian, ByteOrder};
use encdec::{DecodeOwned, Encode};
use heapless::Vec;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::Display;

use crate::ApduError;

/// Hardened derivation flag (top bit of a raw BIP32 index)
pub const HARDENED: u32 = 0x8000_0000;

/// BIP44 purpose for Cardano wallets
pub const PURPOSE: u32 = 44;

/// SLIP-0044 coin type for Cardano
pub const COIN_TYPE: u32 = 1815;

/// Minimum path depth (purpose, coin type, account)
pub const MIN_PATH_LEN: usize = 3;

/// Maximum path depth accepted by the device
pub const MAX_PATH_LEN: usize = 10;

/// Path validation errors.
///
/// Discriminants are the stable error codes used by callers for matching,
/// these are also embedded in the display text for callers matching on messages.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum PathError {
    /// Path does not start with `44'/1815'/ACCOUNT'`
    #[strum(to_string = "invalid path prefix (5001)")]
    InvalidPrefix = 5001,

    /// Path has fewer than [MIN_PATH_LEN] elements
    #[strum(to_string = "path too short (5002)")]
    PathTooShort = 5002,

    /// Path contains a malformed element (or too many elements)
    #[strum(to_string = "invalid path value (5003)")]
    InvalidValue = 5003,
}

impl PathError {
    /// Fetch the stable numeric code for this error
    pub fn code(&self) -> u16 {
        (*self).into()
    }
}

/// Single derivation path element.
///
/// The logical index and hardened flag are held separately, these are only
/// combined (via [DerivationIndex::to_raw]) when encoding for the device.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct DerivationIndex {
    /// Logical index (without the hardened bit)
    pub index: u32,
    /// Hardened derivation flag
    pub hardened: bool,
}

impl DerivationIndex {
    /// Create a new [DerivationIndex]
    pub const fn new(index: u32, hardened: bool) -> Self {
        Self { index, hardened }
    }

    /// Create a hardened [DerivationIndex]
    pub const fn hardened(index: u32) -> Self {
        Self::new(index, true)
    }

    /// Create a non-hardened [DerivationIndex]
    pub const fn normal(index: u32) -> Self {
        Self::new(index, false)
    }

    /// Split a raw BIP32 index into logical index and hardened flag
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            index: raw & !HARDENED,
            hardened: raw & HARDENED != 0,
        }
    }

    /// Fold the hardened flag into the top bit of the index
    pub const fn to_raw(&self) -> u32 {
        match self.hardened {
            true => self.index | HARDENED,
            false => self.index,
        }
    }

    /// Check the logical index does not overlap the hardened bit
    pub const fn is_well_formed(&self) -> bool {
        self.index < HARDENED
    }
}

impl fmt::Display for DerivationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hardened {
            true => write!(f, "{}'", self.index),
            false => write!(f, "{}", self.index),
        }
    }
}

/// Parse a path element, accepting `'`, `h` or `H` as hardened markers
impl FromStr for DerivationIndex {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = match s.strip_suffix(['\'', 'h', 'H']) {
            Some(v) => (v, true),
            None => (s, false),
        };

        // `u32::from_str` accepts a leading `+`, require plain digits (no whitespace or signs)
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PathError::InvalidValue);
        }

        let index = u32::from_str(digits).map_err(|_| PathError::InvalidValue)?;

        let i = Self::new(index, hardened);
        if !i.is_well_formed() {
            return Err(PathError::InvalidValue);
        }

        Ok(i)
    }
}

/// BIP32 derivation path, an ordered sequence of [DerivationIndex]
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |    PATH_LEN   |        INDEX_0 (u32 big-endian, bit 31 =      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   hardened)   |               INDEX_1 ...                     /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DerivationPath(Vec<DerivationIndex, MAX_PATH_LEN>);

impl DerivationPath {
    /// Create a new (empty) derivation path
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a path from a slice of indices
    pub fn from_indices(indices: &[DerivationIndex]) -> Result<Self, PathError> {
        let v = Vec::from_slice(indices).map_err(|_| PathError::InvalidValue)?;
        Ok(Self(v))
    }

    /// Build a path from ordered `(index, hardened)` pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, bool)>) -> Result<Self, PathError> {
        let mut p = Self::new();
        for (index, hardened) in pairs {
            p.push(DerivationIndex::new(index, hardened))?;
        }
        Ok(p)
    }

    /// Build a path from raw BIP32 indices (hardened bit in bit 31)
    pub fn from_raw(raw: &[u32]) -> Result<Self, PathError> {
        Self::from_pairs(raw.iter().map(|r| {
            let i = DerivationIndex::from_raw(*r);
            (i.index, i.hardened)
        }))
    }

    /// Build a path from untyped segments (eg. `["44'", "1815'", "0'"]`).
    ///
    /// Any segment that is not a valid index fails with [PathError::InvalidValue],
    /// irrespective of path length or prefix.
    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Result<Self, PathError> {
        let mut p = Self::new();
        for s in segments {
            p.push(DerivationIndex::from_str(s)?)?;
        }
        Ok(p)
    }

    /// Append an index to the path
    pub fn push(&mut self, index: DerivationIndex) -> Result<(), PathError> {
        self.0.push(index).map_err(|_| PathError::InvalidValue)
    }

    /// Fetch path elements
    pub fn indices(&self) -> &[DerivationIndex] {
        &self.0
    }

    /// Iterate over path elements
    pub fn iter(&self) -> impl Iterator<Item = &DerivationIndex> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate this path, see [validate]
    pub fn validate(&self) -> Result<(), PathError> {
        validate(self)
    }
}

/// Validate a derivation path against the Cardano scheme rules.
///
/// Checks are applied in order and the first failure is returned:
/// 1. each element is well formed ([PathError::InvalidValue])
/// 2. the path has at least [MIN_PATH_LEN] elements ([PathError::PathTooShort])
/// 3. the path starts with `44'/1815'/ACCOUNT'` ([PathError::InvalidPrefix])
pub fn validate(path: &DerivationPath) -> Result<(), PathError> {
    if !path.iter().all(|i| i.is_well_formed()) {
        return Err(PathError::InvalidValue);
    }

    let p = path.indices();
    if p.len() < MIN_PATH_LEN {
        return Err(PathError::PathTooShort);
    }

    // Role / address elements beyond the account may be hardened or not
    let prefix_ok = p[0] == DerivationIndex::hardened(PURPOSE)
        && p[1] == DerivationIndex::hardened(COIN_TYPE)
        && p[2].hardened;
    if !prefix_ok {
        #[cfg(feature = "log")]
        log::debug!("rejecting path with invalid prefix: {}", path);

        return Err(PathError::InvalidPrefix);
    }

    Ok(())
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, i) in self.0.iter().enumerate() {
            if n > 0 {
                write!(f, "/")?;
            }
            write!(f, "{i}")?;
        }
        Ok(())
    }
}

/// Parse a path string (eg. `44'/1815'/1'/0/12'`, optionally prefixed with `m/`)
impl FromStr for DerivationPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("m/").unwrap_or(s);

        match s {
            "" | "m" => Ok(Self::new()),
            _ => Self::from_segments(s.split('/')),
        }
    }
}

impl TryFrom<&[DerivationIndex]> for DerivationPath {
    type Error = PathError;

    fn try_from(indices: &[DerivationIndex]) -> Result<Self, Self::Error> {
        Self::from_indices(indices)
    }
}

impl Encode for DerivationPath {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(1 + self.0.len() * 4)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        let n = self.encode_len()?;
        if buff.len() < n {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.0.len() as u8;

        for (i, d) in self.0.iter().enumerate() {
            BigEndian::write_u32(&mut buff[1 + i * 4..][..4], d.to_raw());
        }

        Ok(n)
    }
}

impl DecodeOwned for DerivationPath {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        let (len, data) = buff.split_first().ok_or(ApduError::InvalidLength)?;

        let n = *len as usize;
        if n > MAX_PATH_LEN || data.len() < n * 4 {
            return Err(ApduError::InvalidLength);
        }

        let mut p = Self::new();
        for c in data[..n * 4].chunks_exact(4) {
            p.push(DerivationIndex::from_raw(BigEndian::read_u32(c)))
                .map_err(|_| ApduError::InvalidLength)?;
        }

        Ok((p, 1 + n * 4))
    }
}
