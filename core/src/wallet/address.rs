// Copyright (c) 2023 The Bytecoin Developers

//! Address tags and the checksummed address byte layout
//! (`varint(prefix) ‖ S ‖ Sv ‖ keccak(..)[0..4]`), prior to Base58 encoding.

use heapless::Vec;
use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, EnumString};

use crate::{
    crypto::{
        keccak::{encode_varint, fast_hash},
        CompressedEdwardsY,
    },
    engine::Error,
};

/// Base58 prefix for legacy (linkable) addresses, text starts with "2"
pub const LEGACY_ADDRESS_PREFIX: u64 = 6;

/// Base58 prefix for Amethyst (unlinkable) addresses, text starts with "bcnZ"
pub const AMETHYST_ADDRESS_PREFIX: u64 = 572238;

/// Maximum assembled address length
pub const MAX_ADDRESS_LEN: usize = 72;

const CHECKSUM_LEN: usize = 4;

/// Assembled address bytes
pub type EncodedAddress = Vec<u8, MAX_ADDRESS_LEN>;

/// Address tag, selects the output key derivation scheme
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumIter, TryFromPrimitive)]
#[repr(u8)]
pub enum AddressTag {
    /// Legacy address, standard Diffie–Hellman one-time keys
    Linkable = 0,
    /// Amethyst address, blinded spend scalar one-time keys
    Unlinkable = 1,
}

/// Base58 prefix used when displaying an address with the provided tag
pub fn address_prefix(tag: AddressTag) -> u64 {
    match tag {
        AddressTag::Linkable => LEGACY_ADDRESS_PREFIX,
        AddressTag::Unlinkable => AMETHYST_ADDRESS_PREFIX,
    }
}

/// Assemble the checksummed address bytes for the text encoder
pub fn encode_address(
    prefix: u64,
    s: &CompressedEdwardsY,
    sv: &CompressedEdwardsY,
) -> Result<EncodedAddress, Error> {
    let p = encode_varint(prefix);

    if p.len() + 2 * 32 + CHECKSUM_LEN > MAX_ADDRESS_LEN {
        return Err(Error::BufferOverflow);
    }

    let mut out = Vec::new();
    for part in [&p[..], s.as_bytes(), sv.as_bytes()] {
        out.extend_from_slice(part)
            .map_err(|_| Error::BufferOverflow)?;
    }

    let h = fast_hash(&out);
    out.extend_from_slice(&h[..CHECKSUM_LEN])
        .map_err(|_| Error::BufferOverflow)?;

    Ok(out)
}
