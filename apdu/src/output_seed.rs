// Copyright (c) 2023 The Bytecoin Developers

//! Output seed APDUs, used by hosts to recover outgoing output secrets

use encdec::{Decode, Encode};

use super::{ApduError, ApduStatic, Instruction, BCN_APDU_CLA};
use crate::helpers::{arr, be32};

/// Fetch the seed for an output of a transaction
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                        TX_INPUTS_HASH                         /
/// /                        (32-byte hash)                         /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         OUTPUT_INDEX                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct OutputSeedReq {
    #[encdec(with = "arr")]
    pub tx_inputs_hash: [u8; 32],
    #[encdec(with = "be32")]
    pub output_index: u32,
}

impl OutputSeedReq {
    pub fn new(tx_inputs_hash: [u8; 32], output_index: u32) -> Self {
        Self {
            tx_inputs_hash,
            output_index,
        }
    }
}

impl ApduStatic for OutputSeedReq {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::GenerateOutputSeed as u8;
}

/// Output seed response APDU (32-byte seed)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct OutputSeedResp {
    #[encdec(with = "arr")]
    pub seed: [u8; 32],
}

impl OutputSeedResp {
    pub fn new(seed: [u8; 32]) -> Self {
        Self { seed }
    }
}

#[cfg(test)]
mod test {
    use rand::random;

    use super::*;
    use crate::test::encode_decode_apdu;

    #[test]
    fn encode_decode_output_seed() {
        let mut buff = [0u8; 256];

        let n = encode_decode_apdu(&mut buff, &OutputSeedReq::new(random(), 0x0a0b0c0d));
        assert_eq!(n, 36);
        assert_eq!(&buff[32..36], &[0x0a, 0x0b, 0x0c, 0x0d]);

        let n = encode_decode_apdu(&mut buff, &OutputSeedResp::new(random()));
        assert_eq!(n, 32);
    }
}
