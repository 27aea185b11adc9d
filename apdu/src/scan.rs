// Copyright (c) 2023 The Bytecoin Developers

//! Output scanning APDUs
//!
//! Hosts submit batches of output public keys, receiving each key
//! multiplied by the wallet view secret for output recognition.

use curve25519_dalek::edwards::CompressedEdwardsY;
use encdec::{DecodeOwned, Encode};
use heapless::Vec;

use super::{ApduError, ApduStatic, Instruction, BCN_APDU_CLA, MAX_SCAN_OUTPUTS};

/// Batch of points for scan requests and responses
pub type ScanPoints = Vec<CompressedEdwardsY, MAX_SCAN_OUTPUTS>;

/// Scan outputs request APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     COUNT     |                                               |
/// +-+-+-+-+-+-+-+-+                                               +
/// /                   OUTPUT_PUBLIC_KEYS[COUNT]                   /
/// /                  (32-byte Ed25519 points)                     /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ScanOutputsReq {
    pub output_keys: ScanPoints,
}

impl ScanOutputsReq {
    /// Create a new [ScanOutputsReq] from a slice of output keys
    pub fn new(output_keys: &[CompressedEdwardsY]) -> Result<Self, ApduError> {
        Vec::from_slice(output_keys)
            .map(|output_keys| Self { output_keys })
            .map_err(|_| ApduError::InvalidLength)
    }
}

impl ApduStatic for ScanOutputsReq {
    const CLA: u8 = BCN_APDU_CLA;
    const INS: u8 = Instruction::ScanOutputs as u8;
}

/// Scan outputs response APDU, containing `output_key * view_secret`
/// for each requested key (same encoding as [ScanOutputsReq])
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ScanOutputsResp {
    pub results: ScanPoints,
}

impl ScanOutputsResp {
    /// Create a new [ScanOutputsResp] from scanned points
    pub fn new(results: ScanPoints) -> Self {
        Self { results }
    }
}

fn encode_points(points: &[CompressedEdwardsY], buff: &mut [u8]) -> Result<usize, ApduError> {
    if buff.len() < 1 + points.len() * 32 {
        return Err(ApduError::InvalidLength);
    }

    buff[0] = points.len() as u8;
    let mut index = 1;

    for p in points {
        buff[index..][..32].copy_from_slice(p.as_bytes());
        index += 32;
    }

    Ok(index)
}

fn decode_points(buff: &[u8]) -> Result<(ScanPoints, usize), ApduError> {
    let n = match buff.first() {
        Some(v) => *v as usize,
        None => return Err(ApduError::InvalidLength),
    };

    if n > MAX_SCAN_OUTPUTS || buff.len() < 1 + n * 32 {
        return Err(ApduError::InvalidLength);
    }

    let mut points = ScanPoints::new();
    let mut index = 1;

    for _ in 0..n {
        let mut d = [0u8; 32];
        d.copy_from_slice(&buff[index..][..32]);
        index += 32;

        points
            .push(CompressedEdwardsY(d))
            .map_err(|_| ApduError::InvalidLength)?;
    }

    Ok((points, index))
}

impl Encode for ScanOutputsReq {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(1 + self.output_keys.len() * 32)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        encode_points(&self.output_keys, buff)
    }
}

impl DecodeOwned for ScanOutputsReq {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self, usize), ApduError> {
        let (output_keys, n) = decode_points(buff)?;
        Ok((Self { output_keys }, n))
    }
}

impl Encode for ScanOutputsResp {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(1 + self.results.len() * 32)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        encode_points(&self.results, buff)
    }
}

impl DecodeOwned for ScanOutputsResp {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self, usize), ApduError> {
        let (results, n) = decode_points(buff)?;
        Ok((Self { results }, n))
    }
}

#[cfg(test)]
mod test {
    use encdec::Decode;
    use rand::random;

    use super::*;
    use crate::test::encode_decode_apdu;

    #[test]
    fn encode_decode_scan() {
        let keys: [CompressedEdwardsY; MAX_SCAN_OUTPUTS] =
            core::array::from_fn(|_| CompressedEdwardsY(random()));
        let apdu = ScanOutputsReq::new(&keys).unwrap();

        let mut buff = [0u8; 256];
        let n = encode_decode_apdu(&mut buff, &apdu);

        assert_eq!(n, 1 + 7 * 32);
    }

    #[test]
    fn reject_oversized_batch() {
        let keys = [CompressedEdwardsY([0u8; 32]); MAX_SCAN_OUTPUTS + 1];
        assert_eq!(ScanOutputsReq::new(&keys), Err(ApduError::InvalidLength));

        let mut buff = [0u8; 1 + 8 * 32];
        buff[0] = 8;
        assert_eq!(
            ScanOutputsResp::decode(&buff).err(),
            Some(ApduError::InvalidLength)
        );
    }
}
