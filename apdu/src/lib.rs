// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Protocol / APDU definitions for Cardano app communication
//!
//! This module provides the path model and validation rules for the
//! `44'/1815'/...` derivation scheme, along with request / response
//! encodings for fetching extended public keys from the device.
//!
//! Unlike most ledger app protocols, path elements are encoded big-endian
//! (matching BIP32 serialisation), with the hardened flag folded into the top bit
//! of each element on the wire.
//!
//! Every response from the device is terminated by a two byte status word,
//! see [status] for the mapping of these onto [status::DeviceStatus].

#![no_std]

#[cfg(test)]
extern crate std;

use encdec::Encode;

pub use ledger_proto::{ApduError, ApduHeader, ApduReq, ApduStatic};

pub mod path;
pub mod prelude;
pub mod status;
pub mod version;
pub mod xpub;

mod helpers;

/// Cardano APDU Class
pub const ADA_APDU_CLA: u8 = 0xd7;

/// Maximum APDU payload length
pub const MAX_APDU_PAYLOAD: usize = 255;

/// Cardano APDU instruction codes
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(u8)]
pub enum Instruction {
    /// Fetch application version
    GetVersion = 0x00,

    /// Fetch extended public key(s) for one or more derivation paths
    GetExtendedPublicKey = 0x10,
}

/// APDU header length (`CLA INS P1 P2`)
pub const APDU_HEADER_LEN: usize = 4;

/// Build a complete command frame (`CLA INS P1 P2 LC DATA`) for an APDU,
/// returning the number of bytes written to `buff`
pub fn encode_command<'a, A: ApduReq<'a>>(apdu: &A, buff: &mut [u8]) -> Result<usize, ApduError> {
    let h: ApduHeader = apdu.header();

    let n = apdu.encode_len()?;
    if n > MAX_APDU_PAYLOAD || buff.len() < APDU_HEADER_LEN + 1 + n {
        return Err(ApduError::InvalidLength);
    }

    buff[0] = h.cla;
    buff[1] = h.ins;
    buff[2] = h.p1;
    buff[3] = h.p2;
    buff[APDU_HEADER_LEN] = n as u8;

    let data = &mut buff[APDU_HEADER_LEN + 1..][..n];
    let m = apdu.encode(data)?;

    Ok(APDU_HEADER_LEN + 1 + m)
}
