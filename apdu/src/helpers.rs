// Copyright (c) 2023 The Bytecoin Developers

/// encdec helper module for big-endian u32 fields
pub(crate) mod be32 {
    use byteorder::{BigEndian, ByteOrder};
    use ledger_proto::ApduError;

    pub fn enc(v: &u32, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        BigEndian::write_u32(buff, *v);

        Ok(4)
    }

    pub fn enc_len(_v: &u32) -> Result<usize, ApduError> {
        Ok(4)
    }

    pub fn dec(buff: &[u8]) -> Result<(u32, usize), ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        Ok((BigEndian::read_u32(buff), 4))
    }
}

/// encdec helper module for big-endian u64 fields
pub(crate) mod be64 {
    use byteorder::{BigEndian, ByteOrder};
    use ledger_proto::ApduError;

    pub fn enc(v: &u64, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < 8 {
            return Err(ApduError::InvalidLength);
        }

        BigEndian::write_u64(buff, *v);

        Ok(8)
    }

    pub fn enc_len(_v: &u64) -> Result<usize, ApduError> {
        Ok(8)
    }

    pub fn dec(buff: &[u8]) -> Result<(u64, usize), ApduError> {
        if buff.len() < 8 {
            return Err(ApduError::InvalidLength);
        }

        Ok((BigEndian::read_u64(buff), 8))
    }
}

/// encdec helper module for boolean flags (single byte, non-zero is true)
pub(crate) mod flag {
    use ledger_proto::ApduError;

    pub fn enc(v: &bool, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = *v as u8;

        Ok(1)
    }

    pub fn enc_len(_v: &bool) -> Result<usize, ApduError> {
        Ok(1)
    }

    pub fn dec(buff: &[u8]) -> Result<(bool, usize), ApduError> {
        match buff.first() {
            Some(v) => Ok((*v != 0, 1)),
            None => Err(ApduError::InvalidLength),
        }
    }
}

/// encdec helper module for scalars (32-byte little-endian)
pub(crate) mod scalar {
    use curve25519_dalek::scalar::Scalar;
    use ledger_proto::ApduError;

    pub fn enc(s: &Scalar, buff: &mut [u8]) -> Result<usize, ApduError> {
        let d = s.to_bytes();

        if buff.len() < d.len() {
            return Err(ApduError::InvalidLength);
        }

        buff[..d.len()].copy_from_slice(&d);

        Ok(d.len())
    }

    pub fn enc_len(_s: &Scalar) -> Result<usize, ApduError> {
        Ok(32)
    }

    pub fn dec(buff: &[u8]) -> Result<(Scalar, usize), ApduError> {
        let mut d = [0u8; 32];

        if buff.len() < d.len() {
            return Err(ApduError::InvalidLength);
        }

        d.copy_from_slice(&buff[..32]);

        let s = Scalar::from_bytes_mod_order(d);

        Ok((s, d.len()))
    }
}

/// encdec helper module for compressed points.
///
/// Points are not validated here, decompression is left to the engine.
pub(crate) mod pt {
    use curve25519_dalek::edwards::CompressedEdwardsY;
    use ledger_proto::ApduError;

    pub fn enc(p: &CompressedEdwardsY, buff: &mut [u8]) -> Result<usize, ApduError> {
        let d = p.as_bytes();

        if buff.len() < d.len() {
            return Err(ApduError::InvalidLength);
        }

        buff[..d.len()].copy_from_slice(&d[..]);

        Ok(d.len())
    }

    pub fn enc_len(_p: &CompressedEdwardsY) -> Result<usize, ApduError> {
        Ok(32)
    }

    pub fn dec(buff: &[u8]) -> Result<(CompressedEdwardsY, usize), ApduError> {
        let mut d = [0u8; 32];

        if buff.len() < d.len() {
            return Err(ApduError::InvalidLength);
        }

        d.copy_from_slice(&buff[..32]);

        Ok((CompressedEdwardsY(d), 32))
    }
}

/// encdec helper module for fixed length byte arrays (hashes, encrypted scalars)
pub(crate) mod arr {
    use ledger_proto::ApduError;

    pub fn enc<const N: usize>(d: &[u8; N], buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < d.len() {
            return Err(ApduError::InvalidLength);
        }

        buff[..d.len()].copy_from_slice(&d[..]);

        Ok(d.len())
    }

    pub fn enc_len<const N: usize>(d: &[u8; N]) -> Result<usize, ApduError> {
        Ok(d.len())
    }

    pub fn dec<const N: usize>(buff: &[u8]) -> Result<([u8; N], usize), ApduError> {
        if buff.len() < N {
            return Err(ApduError::InvalidLength);
        }

        let mut d = [0u8; N];
        d.copy_from_slice(&buff[..N]);

        Ok((d, N))
    }
}

/// Length-prefixed blob helpers, for manual [`encdec`] implementations
pub(crate) mod blob {
    use ledger_proto::ApduError;

    use crate::MAX_DATA_LEN;

    /// Write a `u8` length prefix followed by `data`
    pub fn enc(data: &[u8], buff: &mut [u8]) -> Result<usize, ApduError> {
        if data.len() > MAX_DATA_LEN || buff.len() < data.len() + 1 {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = data.len() as u8;
        buff[1..][..data.len()].copy_from_slice(data);

        Ok(1 + data.len())
    }

    pub fn enc_len(data: &[u8]) -> usize {
        1 + data.len()
    }

    /// Read a `u8` length prefix and the following data
    pub fn dec(buff: &[u8]) -> Result<(&[u8], usize), ApduError> {
        let len = match buff.first() {
            Some(v) => *v as usize,
            None => return Err(ApduError::InvalidLength),
        };

        if len > MAX_DATA_LEN || buff.len() < len + 1 {
            return Err(ApduError::InvalidLength);
        }

        Ok((&buff[1..][..len], 1 + len))
    }
}

/// Secret material blob followed by a big-endian address index,
/// shared by key image and input signing requests
pub(crate) mod secret {
    use byteorder::{BigEndian, ByteOrder};
    use ledger_proto::ApduError;

    use super::blob;

    pub fn enc(data: &[u8], address_index: u32, buff: &mut [u8]) -> Result<usize, ApduError> {
        let mut index = blob::enc(data, buff)?;

        if buff.len() < index + 4 {
            return Err(ApduError::InvalidLength);
        }

        BigEndian::write_u32(&mut buff[index..], address_index);
        index += 4;

        Ok(index)
    }

    pub fn enc_len(data: &[u8]) -> usize {
        blob::enc_len(data) + 4
    }

    pub fn dec(buff: &[u8]) -> Result<(&[u8], u32, usize), ApduError> {
        let (data, mut index) = blob::dec(buff)?;

        if buff.len() < index + 4 {
            return Err(ApduError::InvalidLength);
        }

        let address_index = BigEndian::read_u32(&buff[index..]);
        index += 4;

        Ok((data, address_index, index))
    }
}
