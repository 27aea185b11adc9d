// Copyright (c) 2023 The Bytecoin Developers

//! View-only wallet export APDUs
//!
//! Export requires user approval, requests return
//! [`Pending`][crate::StatusWord::ConditionsNotSatisfied] until the
//! user has responded.

use curve25519_dalek::scalar::Scalar;
use encdec::{Decode, Encode};
use zeroize::Zeroize;

use super::{ApduError, ApduStatic, Instruction, BCN_APDU_CLA};
use crate::helpers::{arr, scalar};

/// Export view-only keys request APDU (0 length APDU)
///
/// Whether the view seed is included is chosen by the user on approval.
#[derive(Copy, Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct ViewOnlyReq;

impl ApduStatic for ViewOnlyReq {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::ExportViewOnly as u8;
}

/// View-only export response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                       AUDIT_BASE_SECRET                       /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                          VIEW_SECRET                          /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                    VIEW_SEED (or zeroes)                      /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                        PROOF_SH_C                             /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                        PROOF_SH_R                             /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct ViewOnlyResp {
    #[encdec(with = "scalar")]
    pub audit_base_secret: Scalar,
    #[encdec(with = "scalar")]
    pub view_secret: Scalar,
    #[encdec(with = "arr")]
    pub view_seed: [u8; 32],
    /// Proof of spend key knowledge, challenge
    #[encdec(with = "scalar")]
    pub proof_c: Scalar,
    /// Proof of spend key knowledge, response
    #[encdec(with = "scalar")]
    pub proof_r: Scalar,
}

impl Drop for ViewOnlyResp {
    fn drop(&mut self) {
        self.audit_base_secret.zeroize();
        self.view_secret.zeroize();
        self.view_seed.zeroize();
    }
}
