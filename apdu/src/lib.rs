// Copyright (c) 2023 The Bytecoin Developers

//! Protocol / APDU definitions for Bytecoin (Amethyst) app communication
//!
//! This module provides a protocol specification and reference implementation for communication
//! with Bytecoin hardware wallets.
//!
//! APDUs use a primitive binary encoding matching the deployed wallet protocol, so the
//! field order and widths of each object are fixed:
//!
//! - integers are big-endian
//! - scalars are 32-byte little-endian values
//! - points are 32-byte compressed Ed25519 points
//! - variable length blobs are prefixed with a single length byte
//!
//! Long fields are split by the host into multiple requests (see `sig` chunking operations),
//! each request must fit a single APDU.

#![no_std]

pub use ledger_proto::{ApduError, ApduReq, ApduStatic};

use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, EnumString};

pub mod app_info;
pub mod key_image;
pub mod output_seed;
pub mod prelude;
pub mod scan;
pub mod sig;
pub mod state;
pub mod view_only;
pub mod wallet_keys;

mod helpers;

/// Bytecoin APDU Class
pub const BCN_APDU_CLA: u8 = 0xe0;

/// Maximum length of a length-prefixed blob in a single request
pub const MAX_DATA_LEN: usize = 200;

/// Maximum number of output keys per scan request
pub const MAX_SCAN_OUTPUTS: usize = 7;

/// Maximum number of ring member indexes per request
pub const MAX_OUTPUT_INDEXES: usize = 32;

/// Bytecoin APDU instruction codes
#[derive(Copy, Clone, Debug, PartialEq, EnumString, Display, EnumIter, TryFromPrimitive)]
#[repr(u8)]
pub enum Instruction {
    // General instructions
    /// Fetch application information
    GetAppInfo = 0x00,

    /// Reset signing state
    Reset = 0x01,

    // Wallet instructions
    /// Fetch public wallet keys
    GetWalletKeys = 0x10,

    /// Multiply output keys by the view secret
    ScanOutputs = 0x11,

    /// Compute the key image for an owned output
    GenerateKeyImage = 0x12,

    /// Compute the seed for an output in a transaction
    GenerateOutputSeed = 0x13,

    /// Export view-only wallet keys (requires approval)
    ExportViewOnly = 0x14,

    // Signing instructions
    /// Start a transaction signature
    SigStart = 0x20,

    /// Start adding an input
    SigAddInputStart = 0x21,

    /// Add ring member indexes for the current input
    SigAddInputIndexes = 0x22,

    /// Finish the current input
    SigAddInputFinish = 0x23,

    /// Add an output
    SigAddOutput = 0x24,

    /// Continue following user confirmation of outputs
    SigConfirmOutputs = 0x25,

    /// Add a chunk of transaction extra
    SigAddExtra = 0x26,

    /// Commitment step for an input
    SigStepA = 0x27,

    /// Add ring data to the commitment step
    SigStepAMoreData = 0x28,

    /// Fetch the ring challenge
    SigGetC0 = 0x29,

    /// Response step for an input
    SigStepB = 0x2a,

    /// Start an ownership proof
    SigProofStart = 0x2b,

    /// Fetch signing state
    SigGetInfo = 0x2f,
}

/// Response status words
#[derive(Copy, Clone, Debug, PartialEq, EnumString, Display, EnumIter, TryFromPrimitive)]
#[repr(u16)]
pub enum StatusWord {
    NoError = 0x9000,
    WrongLength = 0x6700,
    SecurityStatusNotSatisfied = 0x6982,
    ConditionsNotSatisfied = 0x6985,
    CommandNotAllowed = 0x6986,
    WrongData = 0x6a80,
    NotEnoughMemory = 0x6a84,
    InsNotSupported = 0x6d00,
    ClaNotSupported = 0x6e00,
    Unknown = 0x6f00,
}
