// Copyright (c) 2023 The Bytecoin Developers

//! Output registration APDUs

use curve25519_dalek::edwards::CompressedEdwardsY;
use encdec::{Decode, Encode};

use crate::{
    helpers::{be32, be64, flag, pt},
    ApduError, ApduStatic, Instruction, BCN_APDU_CLA,
};

/// Add an output to the transaction.
///
/// Change outputs are paid to the wallet address at `CHANGE_INDEX` and
/// ignore the destination fields, other outputs must all share the same
/// destination address.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |    CHANGE     |                    AMOUNT                     :
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// :                    (8-byte u64)               |  CHANGE_INDEX :
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// :                               |    DST_TAG    |               :
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                     DST_ADDRESS_S (32-byte)                   /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                    DST_ADDRESS_SV (32-byte)                   /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SigAddOutput {
    /// Output is change to this wallet
    #[encdec(with = "flag")]
    pub change: bool,
    /// Output amount
    #[encdec(with = "be64")]
    pub amount: u64,
    /// Wallet address index for change outputs
    #[encdec(with = "be32")]
    pub change_index: u32,
    /// Destination address tag (`0` linkable, `1` unlinkable)
    pub dst_tag: u8,
    /// Destination spend point
    #[encdec(with = "pt")]
    pub dst_s: CompressedEdwardsY,
    /// Destination view point
    #[encdec(with = "pt")]
    pub dst_sv: CompressedEdwardsY,
}

impl SigAddOutput {
    /// Create a change output request
    pub fn change(amount: u64, change_index: u32) -> Self {
        Self {
            change: true,
            amount,
            change_index,
            dst_tag: 0,
            dst_s: CompressedEdwardsY([0u8; 32]),
            dst_sv: CompressedEdwardsY([0u8; 32]),
        }
    }

    /// Create a destination output request
    pub fn destination(
        amount: u64,
        dst_tag: u8,
        dst_s: CompressedEdwardsY,
        dst_sv: CompressedEdwardsY,
    ) -> Self {
        Self {
            change: false,
            amount,
            change_index: 0,
            dst_tag,
            dst_s,
            dst_sv,
        }
    }
}

impl ApduStatic for SigAddOutput {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigAddOutput as u8;
}

/// Output key response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                    OUTPUT_PUBLIC (32-byte)                    /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                   ENCRYPTED_SECRET (32-byte)                  /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   ADDR_TYPE   |
/// +-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SigOutputKey {
    #[encdec(with = "pt")]
    pub public: CompressedEdwardsY,
    #[encdec(with = "pt")]
    pub encrypted_secret: CompressedEdwardsY,
    /// Address tag encrypted with the output address type byte
    pub encrypted_address_type: u8,
}

impl SigOutputKey {
    pub fn new(
        public: CompressedEdwardsY,
        encrypted_secret: CompressedEdwardsY,
        encrypted_address_type: u8,
    ) -> Self {
        Self {
            public,
            encrypted_secret,
            encrypted_address_type,
        }
    }
}
