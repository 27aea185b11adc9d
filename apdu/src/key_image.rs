// Copyright (c) 2023 The Bytecoin Developers

//! Key Image APDUs, used for spent output detection

use curve25519_dalek::edwards::CompressedEdwardsY;
use encdec::{Decode, Encode};

use super::{ApduError, ApduStatic, Instruction, BCN_APDU_CLA};
use crate::helpers::{pt, secret};

/// Resolve a key image for an owned output, identified by the output
/// secret material and the address index the output was paid to
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
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct KeyImageReq<'a> {
    /// Output secret material
    pub secret_material: &'a [u8],
    /// Address index receiving the output
    pub address_index: u32,
}

impl<'a> KeyImageReq<'a> {
    /// Create a new key image request APDU
    pub fn new(secret_material: &'a [u8], address_index: u32) -> Self {
        Self {
            secret_material,
            address_index,
        }
    }
}

impl<'a> ApduStatic for KeyImageReq<'a> {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::GenerateKeyImage as u8;
}

impl<'a> Encode for KeyImageReq<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(secret::enc_len(self.secret_material))
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        secret::enc(self.secret_material, self.address_index, buff)
    }
}

impl<'a> Decode<'a> for KeyImageReq<'a> {
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

/// Key image response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                           KEY_IMAGE                           /
/// /                     (32-byte Ed25519 point)                   /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct KeyImageResp {
    /// Key image
    #[encdec(with = "pt")]
    pub key_image: CompressedEdwardsY,
}

impl KeyImageResp {
    /// Create a new key image response APDU
    pub fn new(key_image: CompressedEdwardsY) -> Self {
        Self { key_image }
    }
}
