// Copyright (c) 2023 The Bytecoin Developers

//! Keccak-256 hashing, varint encoding and digest to scalar reduction

use curve25519_dalek::scalar::Scalar;
use heapless::Vec;
use sha3::{Digest, Keccak256};

/// 256-bit Keccak digest
pub type Hash = [u8; 32];

/// Maximum encoded length of a 64-bit varint
pub const VARINT_MAX_LEN: usize = 10;

/// Encode a value as an LEB128-style varint (7-bit groups, low first)
pub fn encode_varint(mut v: u64) -> Vec<u8, VARINT_MAX_LEN> {
    let mut out = Vec::new();

    // At most ten groups fit a u64 so pushes cannot fail
    while v >= 0x80 {
        let _ = out.push((v as u8 & 0x7f) | 0x80);
        v >>= 7;
    }
    let _ = out.push(v as u8);

    out
}

/// Incremental Keccak-256 context.
///
/// Finalising consumes the context, use [`core::mem::take`] to finalise
/// a context held in a long-lived structure.
#[derive(Clone, Default)]
pub struct Hasher(Keccak256);

impl Hasher {
    pub fn new() -> Self {
        Self(Keccak256::new())
    }

    /// Append bytes
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        Digest::update(&mut self.0, data);
    }

    pub fn update_byte(&mut self, b: u8) {
        Digest::update(&mut self.0, [b]);
    }

    /// Append the varint encoding of `v`
    pub fn update_varint(&mut self, v: u64) {
        Digest::update(&mut self.0, encode_varint(v));
    }

    /// Chaining form of [`Hasher::update`]
    pub fn chain(mut self, data: impl AsRef<[u8]>) -> Self {
        self.update(data);
        self
    }

    /// Chaining form of [`Hasher::update_varint`]
    pub fn chain_varint(mut self, v: u64) -> Self {
        self.update_varint(v);
        self
    }

    pub fn finalize(self) -> Hash {
        self.0.finalize().into()
    }

    /// Finalise and reduce the 256-bit digest mod ℓ
    pub fn finalize_scalar(self) -> Scalar {
        reduce(&self.finalize())
    }

    /// Finalise and reduce a 512-bit extension of the digest mod ℓ
    pub fn finalize_scalar_wide(self) -> Scalar {
        reduce_wide(&self.finalize())
    }
}

impl core::fmt::Debug for Hasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Hasher(..)")
    }
}

/// One-shot Keccak-256
pub fn fast_hash(data: impl AsRef<[u8]>) -> Hash {
    Keccak256::digest(data).into()
}

/// Reduce a little-endian 256-bit value mod ℓ
pub fn reduce(h: &Hash) -> Scalar {
    Scalar::from_bytes_mod_order(*h)
}

/// Reduce `h ‖ keccak(h)` as a little-endian 512-bit value mod ℓ,
/// ie. `reduce(h) + reduce(keccak(h)) * 2^256`
pub fn reduce_wide(h: &Hash) -> Scalar {
    let mut wide = [0u8; 64];
    wide[..32].copy_from_slice(h);
    wide[32..].copy_from_slice(&fast_hash(h));

    Scalar::from_bytes_mod_order_wide(&wide)
}

pub fn hash_to_scalar(data: impl AsRef<[u8]>) -> Scalar {
    reduce(&fast_hash(data))
}

pub fn hash_to_scalar_wide(data: impl AsRef<[u8]>) -> Scalar {
    reduce_wide(&fast_hash(data))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keccak_empty() {
        assert_eq!(
            hex::encode(fast_hash(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn incremental_matches_one_shot() {
        let mut h = Hasher::new();
        h.update(b"byte");
        h.update(b"coin");
        h.update_varint(15);

        assert_eq!(
            hex::encode(h.finalize()),
            "4b62a1a3967c21756d72e040afa9cbd51aac0418b675b42d56037021971bdcb0"
        );
        assert_eq!(
            Hasher::new().chain(b"bytecoin").chain_varint(0).finalize(),
            fast_hash(b"bytecoin\x00")
        );
    }

    #[test]
    fn varint_encoding() {
        let tests: &[(u64, &[u8])] = &[
            (0, &[0x00]),
            (1, &[0x01]),
            (0x7f, &[0x7f]),
            (0x80, &[0x80, 0x01]),
            (300, &[0xac, 0x02]),
            (572238, &[0xce, 0xf6, 0x22]),
            (
                u64::MAX,
                &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01],
            ),
        ];

        for (v, e) in tests {
            assert_eq!(&encode_varint(*v)[..], *e, "varint {v}");
        }
    }

    #[test]
    fn reduce_is_idempotent() {
        for _ in 0..32 {
            let h: Hash = rand::random();

            let a = reduce(&h);
            assert_eq!(reduce(&a.to_bytes()), a);

            let b = reduce_wide(&h);
            assert_eq!(reduce(&b.to_bytes()), b);
        }
    }

    #[test]
    fn wide_reduction_composes() {
        let h: Hash = rand::random();
        let two_256 = Scalar::from_bytes_mod_order_wide(&{
            let mut w = [0u8; 64];
            w[32] = 1;
            w
        });

        let expected = reduce(&h) + reduce(&fast_hash(h)) * two_256;
        assert_eq!(reduce_wide(&h), expected);
    }
}
