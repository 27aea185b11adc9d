// Copyright (c) 2023 The Bytecoin Developers

//! Application Information APDUs

use encdec::{Decode, Encode};

use super::{ApduError, ApduStatic, Instruction, BCN_APDU_CLA};

/// Fetch application info APDU
#[derive(Copy, Clone, PartialEq, Debug, Default, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct AppInfoReq;

impl ApduStatic for AppInfoReq {
    /// Application Info command APDU is class `0xe0`
    const CLA: u8 = BCN_APDU_CLA;

    /// Application Info GET APDU is instruction `0x00`
    const INS: u8 = Instruction::GetAppInfo as u8;
}

/// Application information response APDU
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     MAJOR     |     MINOR     |     PATCH     |   NAME_LEN    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                             NAME...                           /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  VERSION_LEN  |              VERSION...                       /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   SPEC_LEN    |               SPEC...                         /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AppInfoResp<'a> {
    /// Application major version
    pub major: u8,
    /// Application minor version
    pub minor: u8,
    /// Application patch version
    pub patch: u8,

    /// Application name
    pub name: &'a str,

    /// Application version string
    pub version: &'a str,

    /// Protocol specification identifier
    pub spec: &'a str,
}

impl<'a> AppInfoResp<'a> {
    /// Create a new application info APDU
    pub fn new(
        (major, minor, patch): (u8, u8, u8),
        name: &'a str,
        version: &'a str,
        spec: &'a str,
    ) -> Self {
        Self {
            major,
            minor,
            patch,
            name,
            version,
            spec,
        }
    }
}

impl<'a> Encode for AppInfoResp<'a> {
    type Error = ApduError;

    /// Encode an app info APDU into the provided buffer
    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        // Write version header
        buff[0] = self.major;
        buff[1] = self.minor;
        buff[2] = self.patch;
        let mut index = 3;

        // Write length-prefixed strings
        for s in [self.name, self.version, self.spec] {
            if s.len() > u8::MAX as usize {
                return Err(ApduError::InvalidLength);
            }

            buff[index] = s.len() as u8;
            index += 1;

            buff[index..][..s.len()].copy_from_slice(s.as_bytes());
            index += s.len();
        }

        Ok(index)
    }

    /// Compute APDU encoded length
    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(3 + 3 + self.name.len() + self.version.len() + self.spec.len())
    }
}

/// Read a length-prefixed utf8 string
fn decode_str(buff: &[u8]) -> Result<(&str, usize), ApduError> {
    let len = match buff.first() {
        Some(v) => *v as usize,
        None => return Err(ApduError::InvalidLength),
    };

    if buff.len() < 1 + len {
        return Err(ApduError::InvalidLength);
    }

    match core::str::from_utf8(&buff[1..][..len]) {
        Ok(s) => Ok((s, 1 + len)),
        Err(_) => Err(ApduError::InvalidEncoding),
    }
}

impl<'a> Decode<'a> for AppInfoResp<'a> {
    type Output = Self;
    type Error = ApduError;

    /// Decode an app info APDU from the provided buffer
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        if buff.len() < 3 {
            return Err(ApduError::InvalidLength);
        }

        let (major, minor, patch) = (buff[0], buff[1], buff[2]);
        let mut index = 3;

        let (name, n) = decode_str(&buff[index..])?;
        index += n;

        let (version, n) = decode_str(&buff[index..])?;
        index += n;

        let (spec, n) = decode_str(&buff[index..])?;
        index += n;

        Ok((
            Self {
                major,
                minor,
                patch,
                name,
                version,
                spec,
            },
            index,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::encode_decode_apdu;

    #[test]
    fn encode_decode_app_info() {
        let apdu = AppInfoResp::new((1, 2, 3), "Bytecoin", "1.2.3", "amethyst");

        let mut buff = [0u8; 256];
        let n = encode_decode_apdu(&mut buff, &apdu);

        assert_eq!(n, 6 + 8 + 5 + 8);
    }

    #[test]
    fn decode_invalid_utf8() {
        let buff = [1, 0, 0, 2, 0xff, 0xfe, 0, 0];

        assert_eq!(
            AppInfoResp::decode(&buff).err(),
            Some(ApduError::InvalidEncoding)
        );
    }

    #[test]
    fn decode_truncated() {
        let buff = [1, 0, 0, 8, b'B'];

        assert_eq!(
            AppInfoResp::decode(&buff).err(),
            Some(ApduError::InvalidLength)
        );
    }
}
