// Copyright (c) 2023 The Bytecoin Developers

//! Chunked data APDUs, for transaction extra and step A ring data

use encdec::{Decode, Encode};

use crate::{helpers::blob, ApduError, ApduStatic, Instruction, BCN_APDU_CLA};

/// Add a chunk of transaction extra
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   CHUNK_LEN   |                                               |
/// +-+-+-+-+-+-+-+-+                                               +
/// /                        CHUNK[CHUNK_LEN]                       /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct SigAddExtra<'a> {
    pub data: &'a [u8],
}

impl<'a> SigAddExtra<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> ApduStatic for SigAddExtra<'a> {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigAddExtra as u8;
}

impl<'a> Encode for SigAddExtra<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(blob::enc_len(self.data))
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        blob::enc(self.data, buff)
    }
}

impl<'a> Decode<'a> for SigAddExtra<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let (data, n) = blob::dec(buff)?;
        Ok((Self { data }, n))
    }
}

/// Add ring member data to the current step A commitment,
/// encoded as for [SigAddExtra].
#[derive(Clone, PartialEq, Debug)]
pub struct SigStepAMoreData<'a> {
    pub data: &'a [u8],
}

impl<'a> SigStepAMoreData<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> ApduStatic for SigStepAMoreData<'a> {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigStepAMoreData as u8;
}

impl<'a> Encode for SigStepAMoreData<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(blob::enc_len(self.data))
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        blob::enc(self.data, buff)
    }
}

impl<'a> Decode<'a> for SigStepAMoreData<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let (data, n) = blob::dec(buff)?;
        Ok((Self { data }, n))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{test::encode_decode_apdu, MAX_DATA_LEN};

    #[test]
    fn encode_decode_chunks() {
        let data = [0xa5u8; MAX_DATA_LEN];
        let mut buff = [0u8; 256];

        let n = encode_decode_apdu(&mut buff, &SigAddExtra::new(&data));
        assert_eq!(n, 1 + MAX_DATA_LEN);

        let n = encode_decode_apdu(&mut buff, &SigStepAMoreData::new(&data[..64]));
        assert_eq!(n, 65);
        assert_eq!(buff[0], 64);
    }

    #[test]
    fn reject_oversized_chunk() {
        let data = [0u8; MAX_DATA_LEN + 1];
        let mut buff = [0u8; 256];

        assert_eq!(
            SigAddExtra::new(&data).encode(&mut buff),
            Err(ApduError::InvalidLength)
        );

        buff[0] = (MAX_DATA_LEN + 1) as u8;
        assert_eq!(
            SigAddExtra::decode(&buff).err(),
            Some(ApduError::InvalidLength)
        );
    }
}
