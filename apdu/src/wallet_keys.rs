// Copyright (c) 2023 The Bytecoin Developers

//! Wallet key APDUs, for fetching public wallet keys

use curve25519_dalek::edwards::CompressedEdwardsY;
use encdec::{Decode, Encode};

use super::{ApduError, ApduStatic, Instruction, BCN_APDU_CLA};
use crate::helpers::*;

/// Wallet key request APDU (0 length)
#[derive(Copy, Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct WalletKeyReq;

impl ApduStatic for WalletKeyReq {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::GetWalletKeys as u8;
}

/// Wallet key response APDU
///
/// Contains the wallet identifier and public keys required by a host
/// to construct addresses and recognise outputs.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                          WALLET_KEY                           /
/// /                         (32-byte hash)                        /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                           A_PLUS_SH                           /
/// /                     (32-byte Ed25519 point)                   /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                        V_MUL_A_PLUS_SH                        /
/// /                     (32-byte Ed25519 point)                   /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                          VIEW_PUBLIC                          /
/// /                     (32-byte Ed25519 point)                   /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct WalletKeyResp {
    /// Wallet identifier
    #[encdec(with = "arr")]
    pub wallet_key: [u8; 32],
    /// Audit base public key plus spend public key, `A + s*H`
    #[encdec(with = "pt")]
    pub a_plus_sh: CompressedEdwardsY,
    /// `(A + s*H) * v`
    #[encdec(with = "pt")]
    pub v_mul_a_plus_sh: CompressedEdwardsY,
    /// View public key
    #[encdec(with = "pt")]
    pub view_public: CompressedEdwardsY,
}

impl WalletKeyResp {
    /// Create a new [WalletKeyResp] APDU
    pub fn new(
        wallet_key: [u8; 32],
        a_plus_sh: CompressedEdwardsY,
        v_mul_a_plus_sh: CompressedEdwardsY,
        view_public: CompressedEdwardsY,
    ) -> Self {
        Self {
            wallet_key,
            a_plus_sh,
            v_mul_a_plus_sh,
            view_public,
        }
    }
}

#[cfg(test)]
mod test {
    use rand::random;

    use super::*;
    use crate::test::encode_decode_apdu;

    #[test]
    fn encode_decode_wallet_keys() {
        let apdu = WalletKeyResp::new(
            random(),
            CompressedEdwardsY(random()),
            CompressedEdwardsY(random()),
            CompressedEdwardsY(random()),
        );

        let mut buff = [0u8; 256];
        let n = encode_decode_apdu(&mut buff, &apdu);

        assert_eq!(n, 128);
    }
}
