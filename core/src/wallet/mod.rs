// Copyright (c) 2023 The Bytecoin Developers

//! Deterministic wallet key derivation
//!
//! All key material is derived from an opaque 256-bit root seed supplied by
//! the platform [`Driver`][crate::engine::Driver]. Per-index audit secrets
//! are cached in a single-entry [`AddressIndexCache`].

use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::crypto::{
    curve::{hash_to_point, mul_g, mul_h},
    keccak::{hash_to_scalar, reduce, Hash, Hasher},
    CompressedEdwardsY, EdwardsPoint, Scalar,
};

mod address;
pub use address::{
    address_prefix, encode_address, AddressTag, EncodedAddress, AMETHYST_ADDRESS_PREFIX,
    LEGACY_ADDRESS_PREFIX, MAX_ADDRESS_LEN,
};

mod output;
pub use output::{OutputKey, OutputSecrets};

const VIEW_SEED: &[u8] = b"view_seed";
const VIEW_KEY: &[u8] = b"view_key";
const VIEW_KEY_AUDIT: &[u8] = b"view_key_audit";
const SPEND_KEY: &[u8] = b"spend_key";
const WALLET_KEY: &[u8] = b"wallet_key";
const ADDRESS: &[u8] = b"address";

/// Root wallet key material, derived once from the platform seed
pub struct WalletKeys {
    view_seed: Hash,
    wallet_key: Hash,
    view_secret: Scalar,
    audit_base_secret: Scalar,
    spend_secret: Scalar,
    sh: EdwardsPoint,
    a_plus_sh: EdwardsPoint,
}

fn derive_hash(seed: &Hash, tag: &[u8]) -> Hash {
    Hasher::new().chain(seed).chain(tag).finalize()
}

fn derive_scalar(seed: &Hash, tag: &[u8]) -> Scalar {
    reduce(&derive_hash(seed, tag))
}

impl WalletKeys {
    /// Derive wallet keys from a 256-bit root seed
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn derive(seed: &Hash) -> Self {
        let view_seed = derive_hash(seed, VIEW_SEED);
        let wallet_key = derive_hash(seed, WALLET_KEY);
        let spend_secret = derive_scalar(seed, SPEND_KEY);
        let view_secret = derive_scalar(&view_seed, VIEW_KEY);
        let audit_base_secret = derive_scalar(&view_seed, VIEW_KEY_AUDIT);

        let sh = mul_h(&spend_secret);
        let a_plus_sh = mul_g(&audit_base_secret) + sh;

        Self {
            view_seed,
            wallet_key,
            view_secret,
            audit_base_secret,
            spend_secret,
            sh,
            a_plus_sh,
        }
    }

    /// Wallet identifier hash (public)
    pub fn wallet_key(&self) -> &Hash {
        &self.wallet_key
    }

    /// `A + sH`, the base from which per-index addresses are derived
    pub fn a_plus_sh(&self) -> &EdwardsPoint {
        &self.a_plus_sh
    }

    /// `sH`, the spend commitment shared by every address
    pub fn sh(&self) -> &EdwardsPoint {
        &self.sh
    }

    /// View public key `G * view_secret`
    pub fn view_public(&self) -> EdwardsPoint {
        mul_g(&self.view_secret)
    }

    pub(crate) fn view_seed(&self) -> &Hash {
        &self.view_seed
    }

    pub(crate) fn view_secret(&self) -> &Scalar {
        &self.view_secret
    }

    pub(crate) fn spend_secret(&self) -> &Scalar {
        &self.spend_secret
    }

    pub(crate) fn audit_base_secret(&self) -> &Scalar {
        &self.audit_base_secret
    }

    /// Compute the audit secret for an address index (uncached)
    pub(crate) fn address_secret(&self, index: u32) -> Scalar {
        let h = Hasher::new()
            .chain(self.a_plus_sh.compress().as_bytes())
            .chain(ADDRESS)
            .chain_varint(index as u64)
            .finalize_scalar();

        h + self.audit_base_secret
    }
}

impl Zeroize for WalletKeys {
    fn zeroize(&mut self) {
        self.view_seed.zeroize();
        self.wallet_key.zeroize();
        self.view_secret.zeroize();
        self.audit_base_secret.zeroize();
        self.spend_secret.zeroize();
        self.sh.zeroize();
        self.a_plus_sh.zeroize();
    }
}

impl Drop for WalletKeys {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl core::fmt::Debug for WalletKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WalletKeys")
            .field("wallet_key", &self.wallet_key)
            .field("a_plus_sh", &self.a_plus_sh.compress())
            .finish_non_exhaustive()
    }
}

/// Single-entry cache of the most recently used address audit secret
#[derive(Default)]
pub struct AddressIndexCache(Option<(u32, Scalar)>);

impl AddressIndexCache {
    pub const fn new() -> Self {
        Self(None)
    }

    /// Fetch the cached secret for `index`, computing it on a miss
    pub fn get(&mut self, keys: &WalletKeys, index: u32) -> Scalar {
        match &self.0 {
            Some((i, s)) if *i == index => *s,
            _ => {
                let s = keys.address_secret(index);
                self.clear();
                self.0 = Some((index, s));
                s
            }
        }
    }

    /// Index currently cached, if any
    pub fn index(&self) -> Option<u32> {
        self.0.as_ref().map(|(i, _)| *i)
    }

    pub fn clear(&mut self) {
        if let Some((_, s)) = &mut self.0 {
            s.zeroize();
        }
        self.0 = None;
    }
}

/// Public address for an index, `S = G * audit_i + sH` and `Sv = S * view`
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PublicAddress {
    pub s: EdwardsPoint,
    pub sv: EdwardsPoint,
}

/// Public wallet keys returned to the host
#[derive(Clone, PartialEq, Debug)]
pub struct WalletPublic {
    pub wallet_key: Hash,
    pub a_plus_sh: CompressedEdwardsY,
    pub v_mul_a_plus_sh: CompressedEdwardsY,
    pub view_public: CompressedEdwardsY,
}

/// One-time keys for a spent output, recovered from host-supplied secret material
pub struct InputKeys {
    /// `1 / hash_to_scalar(secret_material)`
    pub inv_hash: Scalar,
    /// Audit component `a`
    pub a: Scalar,
    /// Spend component `s`
    pub s: Scalar,
    /// One-time public key `G * a + H * s`
    pub public: EdwardsPoint,
}

impl InputKeys {
    /// Key image `a * hash_to_point(public)`
    pub fn key_image(&self) -> EdwardsPoint {
        key_image(&self.public, &self.a)
    }

    /// Big-endian bytes of the inverse hash, as committed during signing
    pub fn inv_hash_be(&self) -> Hash {
        let mut b = self.inv_hash.to_bytes();
        b.reverse();
        b
    }
}

impl Drop for InputKeys {
    fn drop(&mut self) {
        self.inv_hash.zeroize();
        self.a.zeroize();
        self.s.zeroize();
    }
}

/// Key image for a one-time key pair, `secret * hash_to_point(public)`
pub fn key_image(public: &EdwardsPoint, secret: &Scalar) -> EdwardsPoint {
    hash_to_point(public.compress().as_bytes()) * secret
}

/// Schnorr proof of knowledge of `s` for `s * H`
#[derive(Clone, PartialEq, Debug)]
pub struct ProofH {
    pub c: Scalar,
    pub r: Scalar,
}

/// Prove knowledge of `secret` for the commitment `sh = secret * H`,
/// `c = reduce(keccak(sH ‖ kH))`, `r = k - c * secret`
pub fn proof_h<RNG: CryptoRngCore>(secret: &Scalar, rng: &mut RNG) -> ProofH {
    let mut b = [0u8; 32];
    rng.fill_bytes(&mut b);
    let mut k = reduce(&b);
    b.zeroize();

    let sh = mul_h(secret).compress();
    let kh = mul_h(&k).compress();

    let c = Hasher::new()
        .chain(sh.as_bytes())
        .chain(kh.as_bytes())
        .finalize_scalar();
    let r = k - c * secret;

    k.zeroize();

    ProofH { c, r }
}

/// Check a [`ProofH`] against the commitment `sh`
pub fn verify_proof_h(sh: &EdwardsPoint, proof: &ProofH) -> bool {
    // kH = rH + c sH
    let kh = mul_h(&proof.r) + sh * proof.c;

    let c = Hasher::new()
        .chain(sh.compress().as_bytes())
        .chain(kh.compress().as_bytes())
        .finalize_scalar();

    c == proof.c
}

/// View-only wallet export
pub struct ViewOnlyExport {
    pub audit_base_secret: Scalar,
    pub view_secret: Scalar,
    /// View seed, zeroed unless outgoing addresses may be viewed
    pub view_seed: Hash,
    pub proof: ProofH,
}

impl Drop for ViewOnlyExport {
    fn drop(&mut self) {
        self.audit_base_secret.zeroize();
        self.view_secret.zeroize();
        self.view_seed.zeroize();
    }
}

/// Symmetric-encrypt a scalar for transport,
/// `keccak(key ‖ name ‖ varint(i)) XOR scalar`
pub fn encrypt_scalar(key: &Hash, scalar: &Scalar, i: u32, name: &[u8; 2]) -> Hash {
    let mut out = Hasher::new()
        .chain(key)
        .chain(name)
        .chain_varint(i as u64)
        .finalize();

    for (o, s) in out.iter_mut().zip(scalar.to_bytes().iter()) {
        *o ^= s;
    }

    out
}

/// Wallet instance, holding root keys and the address cache
#[derive(Debug)]
pub struct Wallet {
    keys: WalletKeys,
    cache: AddressIndexCache,
}

impl core::fmt::Debug for AddressIndexCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "AddressIndexCache({:?})", self.index())
    }
}

impl Wallet {
    pub fn new(keys: WalletKeys) -> Self {
        Self {
            keys,
            cache: AddressIndexCache::new(),
        }
    }

    /// Derive a wallet from a 256-bit root seed
    pub fn from_seed(seed: &Hash) -> Self {
        Self::new(WalletKeys::derive(seed))
    }

    pub fn keys(&self) -> &WalletKeys {
        &self.keys
    }

    /// Audit secret for an address index
    pub fn address_secret(&mut self, index: u32) -> Scalar {
        self.cache.get(&self.keys, index)
    }

    /// Public address `(S, Sv)` for an address index
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn address_public(&mut self, index: u32) -> PublicAddress {
        let mut a = self.address_secret(index);

        let s = mul_g(&a) + self.keys.sh;
        let sv = s * self.keys.view_secret;

        a.zeroize();

        PublicAddress { s, sv }
    }

    /// Public wallet keys for the host
    pub fn wallet_public(&self) -> WalletPublic {
        WalletPublic {
            wallet_key: self.keys.wallet_key,
            a_plus_sh: self.keys.a_plus_sh.compress(),
            v_mul_a_plus_sh: (self.keys.a_plus_sh * self.keys.view_secret).compress(),
            view_public: self.keys.view_public().compress(),
        }
    }

    /// `output_public * view_secret`, used by the host to recognise outputs
    pub fn scan_output(&self, output_public: &EdwardsPoint) -> EdwardsPoint {
        output_public * self.keys.view_secret
    }

    /// Recover one-time keys for an input from host secret material
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn input_keys(&mut self, secret_material: &[u8], address_index: u32) -> InputKeys {
        let inv_hash = hash_to_scalar(secret_material).invert();

        let mut audit = self.address_secret(address_index);
        let a = audit * inv_hash;
        let s = self.keys.spend_secret * inv_hash;
        audit.zeroize();

        let public = mul_g(&a) + mul_h(&s);

        InputKeys {
            inv_hash,
            a,
            s,
            public,
        }
    }

    /// Key image for an input identified by secret material and address index
    pub fn key_image_for_address(
        &mut self,
        secret_material: &[u8],
        address_index: u32,
    ) -> CompressedEdwardsY {
        self.input_keys(secret_material, address_index)
            .key_image()
            .compress()
    }

    /// Per-output seed, `keccak(view_seed ‖ tx_inputs_hash ‖ varint(index))`
    pub fn output_seed(&self, tx_inputs_hash: &Hash, output_index: u32) -> Hash {
        Hasher::new()
            .chain(self.keys.view_seed)
            .chain(tx_inputs_hash)
            .chain_varint(output_index as u64)
            .finalize()
    }

    /// Deterministic signing nonce for input `i`,
    /// `reduce_wide(keccak(random_seed ‖ spend_secret ‖ name ‖ varint(i)))`
    pub fn sign_secret(&self, random_seed: &Hash, name: &[u8; 2], i: u32) -> Scalar {
        let mut spend = self.keys.spend_secret.to_bytes();

        let s = Hasher::new()
            .chain(random_seed)
            .chain(spend)
            .chain(name)
            .chain_varint(i as u64)
            .finalize_scalar_wide();

        spend.zeroize();
        s
    }

    /// Export view-only keys with a proof of spend key knowledge
    pub fn export_view_only<RNG: CryptoRngCore>(
        &self,
        view_outgoing_addresses: bool,
        rng: &mut RNG,
    ) -> ViewOnlyExport {
        let view_seed = match view_outgoing_addresses {
            true => self.keys.view_seed,
            false => [0u8; 32],
        };

        ViewOnlyExport {
            audit_base_secret: self.keys.audit_base_secret,
            view_secret: self.keys.view_secret,
            view_seed,
            proof: proof_h(&self.keys.spend_secret, rng),
        }
    }
}
