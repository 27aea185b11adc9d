// Copyright (c) 2023 The Bytecoin Developers

//! Input registration APDUs

use encdec::{Decode, DecodeOwned, Encode};
use heapless::Vec;

use crate::{
    helpers::{be32, be64, secret},
    ApduError, ApduStatic, Instruction, BCN_APDU_CLA, MAX_OUTPUT_INDEXES,
};

/// Start an input, declaring the amount and ring size
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            AMOUNT                             |
/// |                         (8-byte u64)                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           RING_SIZE                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SigAddInputStart {
    #[encdec(with = "be64")]
    pub amount: u64,
    #[encdec(with = "be32")]
    pub ring_size: u32,
}

impl SigAddInputStart {
    pub fn new(amount: u64, ring_size: u32) -> Self {
        Self { amount, ring_size }
    }
}

impl ApduStatic for SigAddInputStart {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigAddInputStart as u8;
}

/// Ring member output indexes for the current input
pub type OutputIndexes = Vec<u32, MAX_OUTPUT_INDEXES>;

/// Add ring member indexes for the current input, may be split
/// across multiple requests for large rings.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     COUNT     |                OUTPUT_INDEX[0]                :
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// :               |                      ...                      /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Default)]
pub struct SigAddInputIndexes {
    pub indexes: OutputIndexes,
}

impl SigAddInputIndexes {
    pub fn new(indexes: &[u32]) -> Result<Self, ApduError> {
        Vec::from_slice(indexes)
            .map(|indexes| Self { indexes })
            .map_err(|_| ApduError::InvalidLength)
    }
}

impl ApduStatic for SigAddInputIndexes {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigAddInputIndexes as u8;
}

impl Encode for SigAddInputIndexes {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(1 + self.indexes.len() * 4)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.indexes.len() as u8;
        let mut index = 1;

        for i in &self.indexes {
            index += be32::enc(i, &mut buff[index..])?;
        }

        Ok(index)
    }
}

impl DecodeOwned for SigAddInputIndexes {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self, usize), ApduError> {
        let n = match buff.first() {
            Some(v) => *v as usize,
            None => return Err(ApduError::InvalidLength),
        };

        if n > MAX_OUTPUT_INDEXES {
            return Err(ApduError::InvalidLength);
        }

        let mut indexes = OutputIndexes::new();
        let mut index = 1;

        for _ in 0..n {
            let (v, l) = be32::dec(&buff[index..])?;
            index += l;

            indexes.push(v).map_err(|_| ApduError::InvalidLength)?;
        }

        Ok((Self { indexes }, index))
    }
}

/// Finish the current input, providing the output secret material
/// and address index to derive the input key image.
///
/// Encoded as `[SECRET_LEN, SECRET_MATERIAL, ADDRESS_INDEX]`, see
/// [`KeyImageReq`][crate::key_image::KeyImageReq].
#[derive(Clone, PartialEq, Debug)]
pub struct SigAddInputFinish<'a> {
    pub secret_material: &'a [u8],
    pub address_index: u32,
}

impl<'a> SigAddInputFinish<'a> {
    pub fn new(secret_material: &'a [u8], address_index: u32) -> Self {
        Self {
            secret_material,
            address_index,
        }
    }
}

impl<'a> ApduStatic for SigAddInputFinish<'a> {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigAddInputFinish as u8;
}

impl<'a> Encode for SigAddInputFinish<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(secret::enc_len(self.secret_material))
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        secret::enc(self.secret_material, self.address_index, buff)
    }
}

impl<'a> Decode<'a> for SigAddInputFinish<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let (secret_material, address_index, n) = secret::dec(buff)?;

        Ok((
            Self {
                secret_material,
                address_index,
            },
            n,
        ))
    }
}

#[cfg(test)]
mod test {
    use rand::random;

    use super::*;
    use crate::test::encode_decode_apdu;

    #[test]
    fn encode_decode_input_start() {
        let mut buff = [0u8; 256];
        let n = encode_decode_apdu(&mut buff, &SigAddInputStart::new(1_000_000_000, 11));

        assert_eq!(
            &buff[..n],
            &[0, 0, 0, 0, 0x3b, 0x9a, 0xca, 0x00, 0, 0, 0, 11]
        );
    }

    #[test]
    fn encode_decode_input_indexes() {
        let indexes: [u32; MAX_OUTPUT_INDEXES] = core::array::from_fn(|_| random());
        let apdu = SigAddInputIndexes::new(&indexes).unwrap();

        let mut buff = [0u8; 256];
        let n = encode_decode_apdu(&mut buff, &apdu);

        assert_eq!(n, 1 + 32 * 4);
    }

    #[test]
    fn reject_truncated_indexes() {
        let buff = [2u8, 0, 0, 0, 1, 0, 0];

        assert_eq!(
            SigAddInputIndexes::decode(&buff).err(),
            Some(ApduError::InvalidLength)
        );
    }

    #[test]
    fn encode_decode_input_finish() {
        let material = [0x5au8; 32];
        let apdu = SigAddInputFinish::new(&material, 3);

        let mut buff = [0u8; 256];
        let n = encode_decode_apdu(&mut buff, &apdu);

        assert_eq!(n, 37);
    }
}
