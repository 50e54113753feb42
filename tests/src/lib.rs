// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Tests for Cardano wallet integration.
//!
//! Generic over [ledger_ada::Exchange] for reuse against simulators,
//! physical devices, and the in-process [mock::MockDevice].
//!

pub mod vectors;


pub mod xpub;
