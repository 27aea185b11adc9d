// Copyright (c) 2023 The Bytecoin Developers

//! Signing State APDUs
//!

use encdec::{Decode, DecodeOwned, Encode};
use ledger_proto::ApduError;
use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

use super::{ApduStatic, Instruction, BCN_APDU_CLA};
use crate::helpers::be32;

/// Signing session state enumeration
/// used in [`SigInfo`] to communicate signing progress
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum SigState {
    Finished = 0x00,
    ExpectInputStart = 0x01,
    ExpectInputIndexes = 0x02,
    ExpectInputFinish = 0x03,
    ExpectOutput = 0x04,
    ExpectUserConfirmation = 0x05,
    ExpectExtraChunk = 0x06,
    ExpectStepA = 0x07,
    ExpectStepAMoreData = 0x08,
    ExpectStepB = 0x09,
}

impl Encode for SigState {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(1)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = *self as u8;
        Ok(1)
    }
}

impl DecodeOwned for SigState {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        match Self::try_from(buff[0]) {
            Ok(v) => Ok((v, 1)),
            Err(_) => Err(ApduError::InvalidEncoding),
        }
    }
}

/// Reset signing state (0 length APDU)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct ResetReq;

impl ApduStatic for ResetReq {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::Reset as u8;
}

/// Signing information request APDU
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SigInfoReq;

impl ApduStatic for SigInfoReq {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigGetInfo as u8;
}

/// Signing information response APDU.
///
/// Returned by signing commands without other outputs, contains the current
/// session state and the input and output counters to allow hosts to
/// resynchronise.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   SIG_STATE   |                 INPUTS_COUNTER                :
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// :               |                OUTPUTS_COUNTER                :
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// :               |
/// +-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SigInfo {
    /// Session state
    pub state: SigState,

    /// Inputs processed in the current phase
    #[encdec(with = "be32")]
    pub inputs_counter: u32,

    /// Outputs processed
    #[encdec(with = "be32")]
    pub outputs_counter: u32,
}

impl SigInfo {
    pub fn new(state: SigState, inputs_counter: u32, outputs_counter: u32) -> Self {
        Self {
            state,
            inputs_counter,
            outputs_counter,
        }
    }
}
