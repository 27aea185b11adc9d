// Copyright (c) 2023 The Bytecoin Developers

//! Ring signature step APDUs

use curve25519_dalek::{edwards::CompressedEdwardsY, scalar::Scalar};
use encdec::{Decode, Encode};

use crate::{
    helpers::{arr, pt, scalar, secret},
    ApduError, ApduStatic, Instruction, BCN_APDU_CLA,
};

/// Step A (commitment) for the next input, encoded as
/// `[SECRET_LEN, SECRET_MATERIAL, ADDRESS_INDEX]`, see
/// [`KeyImageReq`][crate::key_image::KeyImageReq].
#[derive(Clone, PartialEq, Debug)]
pub struct SigStepA<'a> {
    pub secret_material: &'a [u8],
    pub address_index: u32,
}

impl<'a> SigStepA<'a> {
    pub fn new(secret_material: &'a [u8], address_index: u32) -> Self {
        Self {
            secret_material,
            address_index,
        }
    }
}

impl<'a> ApduStatic for SigStepA<'a> {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigStepA as u8;
}

impl<'a> Encode for SigStepA<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(secret::enc_len(self.secret_material))
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        secret::enc(self.secret_material, self.address_index, buff)
    }
}

impl<'a> Decode<'a> for SigStepA<'a> {
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

/// Step A response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                        SIG_P (32-byte)                        /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                          Y (32-byte)                          /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                          Z (32-byte)                          /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SigStepAResp {
    #[encdec(with = "pt")]
    pub sig_p: CompressedEdwardsY,
    #[encdec(with = "pt")]
    pub y: CompressedEdwardsY,
    #[encdec(with = "pt")]
    pub z: CompressedEdwardsY,
}

impl SigStepAResp {
    pub fn new(sig_p: CompressedEdwardsY, y: CompressedEdwardsY, z: CompressedEdwardsY) -> Self {
        Self { sig_p, y, z }
    }
}

/// Step B (response) for the next input
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  SECRET_LEN   |                                               |
/// +-+-+-+-+-+-+-+-+                                               +
/// /                    SECRET_MATERIAL[SECRET_LEN]                /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         ADDRESS_INDEX                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                     MY_C (32-byte scalar)                     /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct SigStepB<'a> {
    pub secret_material: &'a [u8],
    pub address_index: u32,
    /// Challenge for this input's ring position
    pub my_c: Scalar,
}

impl<'a> SigStepB<'a> {
    pub fn new(secret_material: &'a [u8], address_index: u32, my_c: Scalar) -> Self {
        Self {
            secret_material,
            address_index,
            my_c,
        }
    }
}

impl<'a> ApduStatic for SigStepB<'a> {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::SigStepB as u8;
}

impl<'a> Encode for SigStepB<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(secret::enc_len(self.secret_material) + 32)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let mut index = secret::enc(self.secret_material, self.address_index, buff)?;
        index += scalar::enc(&self.my_c, &mut buff[index..])?;
        Ok(index)
    }
}

impl<'a> Decode<'a> for SigStepB<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let (secret_material, address_index, mut index) = secret::dec(buff)?;

        let (my_c, n) = scalar::dec(&buff[index..])?;
        index += n;

        Ok((
            Self {
                secret_material,
                address_index,
                my_c,
            },
            index,
        ))
    }
}

/// Step B response APDU, containing encrypted response scalars and
/// the encryption key (zero until the final input, or on integrity failure)
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                      ENCRYPTED_RR (32-byte)                   /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                      ENCRYPTED_RS (32-byte)                   /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                      ENCRYPTED_RA (32-byte)                   /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                     ENCRYPTION_KEY (32-byte)                  /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct SigStepBResp {
    #[encdec(with = "arr")]
    pub rr: [u8; 32],
    #[encdec(with = "arr")]
    pub rs: [u8; 32],
    #[encdec(with = "arr")]
    pub ra: [u8; 32],
    #[encdec(with = "arr")]
    pub encryption_key: [u8; 32],
}

#[cfg(test)]
mod test {
    use rand::random;

    use super::*;
    use crate::{test::encode_decode_apdu, MAX_DATA_LEN};

    #[test]
    fn encode_decode_step_a() {
        let material = [0x11u8; 40];
        let mut buff = [0u8; 256];

        let n = encode_decode_apdu(&mut buff, &SigStepA::new(&material, 9));
        assert_eq!(n, 45);

        let apdu = SigStepAResp::new(
            CompressedEdwardsY(random()),
            CompressedEdwardsY(random()),
            CompressedEdwardsY(random()),
        );
        let n = encode_decode_apdu(&mut buff, &apdu);
        assert_eq!(n, 96);
    }

    #[test]
    fn encode_decode_step_b() {
        let material = [0x22u8; MAX_DATA_LEN];
        let mut buff = [0u8; 256];

        let apdu = SigStepB::new(&material, 1, Scalar::from(random::<u64>()));
        let n = encode_decode_apdu(&mut buff, &apdu);
        assert_eq!(n, 1 + MAX_DATA_LEN + 4 + 32);

        let apdu = SigStepBResp {
            rr: random(),
            rs: random(),
            ra: random(),
            encryption_key: random(),
        };
        let n = encode_decode_apdu(&mut buff, &apdu);
        assert_eq!(n, 128);
    }
}
