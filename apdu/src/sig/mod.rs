// Copyright (c) 2023 The Bytecoin Developers

//! Transaction signing APDUs
//!
//! A signing session is driven by the host as a sequence of requests,
//! see [`SigState`][crate::state::SigState] for the expected ordering.
//! Requests without other outputs return [`SigInfo`][crate::state::SigInfo].

use curve25519_dalek::scalar::Scalar;
use encdec::{Decode, Encode};

use super::{ApduError, ApduStatic, Instruction, BCN_APDU_CLA};
use crate::helpers::*;

mod input;
pub use input::*;

mod output;
pub use output::*;

mod extra;
pub use extra::*;

mod step;
pub use step::*;

/// Start a transaction signing session
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            VERSION                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          UNLOCK_TIME                          |
/// |                         (8-byte u64)                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          INPUTS_NUM                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          OUTPUTS_NUM                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          EXTRA_SIZE                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SigStart {
    /// Transaction version
    #[encdec(with = "be32")]
    pub version: u32,
    /// Transaction unlock time
    #[encdec(with = "be64")]
    pub unlock_time: u64,
    /// Number of inputs
    #[encdec(with = "be32")]
    pub inputs_num: u32,
    /// Number of outputs
    #[encdec(with = "be32")]
    pub outputs_num: u32,
    /// Length of transaction extra in bytes
    #[encdec(with = "be32")]
    pub extra_size: u32,
}

impl SigStart {
    pub fn new(
        version: u32,
        unlock_time: u64,
        inputs_num: u32,
        outputs_num: u32,
        extra_size: u32,
    ) -> Self {
        Self {
            version,
            unlock_time,
            inputs_num,
            outputs_num,
            extra_size,
        }
    }
}

impl ApduStatic for SigStart {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigStart as u8;
}

/// Start a single input ownership proof, the session proceeds
/// directly to extra chunks then step A / B for one input.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           EXTRA_LEN                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SigProofStart {
    #[encdec(with = "be32")]
    pub extra_len: u32,
}

impl SigProofStart {
    pub fn new(extra_len: u32) -> Self {
        Self { extra_len }
    }
}

impl ApduStatic for SigProofStart {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigProofStart as u8;
}

/// Confirm outputs following user approval (0 length APDU)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SigConfirmOutputs;

impl ApduStatic for SigConfirmOutputs {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigConfirmOutputs as u8;
}

/// Fetch ring challenge `c0` once step A is complete for all inputs (0 length APDU)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SigGetC0;

impl ApduStatic for SigGetC0 {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigGetC0 as u8;
}

/// Ring challenge response APDU (32-byte scalar)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SigC0 {
    #[encdec(with = "scalar")]
    pub c0: Scalar,
}

impl SigC0 {
    pub fn new(c0: Scalar) -> Self {
        Self { c0 }
    }
}

#[cfg(test)]
mod test {
    use rand::random;

    use super::*;
    use crate::test::encode_decode_apdu;

    #[test]
    fn encode_decode_sig_start() {
        let apdu = SigStart::new(1, random(), 2, 3, 4);

        let mut buff = [0u8; 256];
        let n = encode_decode_apdu(&mut buff, &apdu);

        assert_eq!(n, 24);
        assert_eq!(&buff[..4], &[0, 0, 0, 1]);
        assert_eq!(&buff[20..24], &[0, 0, 0, 4]);
    }

    #[test]
    fn encode_decode_proof_start() {
        let mut buff = [0u8; 256];
        let n = encode_decode_apdu(&mut buff, &SigProofStart::new(0x1234));

        assert_eq!(&buff[..n], &[0, 0, 0x12, 0x34]);
    }

    #[test]
    fn encode_decode_c0() {
        let mut buff = [0u8; 256];
        let n = encode_decode_apdu(&mut buff, &SigC0::new(Scalar::from(random::<u64>())));

        assert_eq!(n, 32);
    }
}
