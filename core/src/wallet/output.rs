// Copyright (c) 2023 The Bytecoin Developers

//! One-time output key derivation for linkable and unlinkable addresses

use zeroize::Zeroize;

use super::{AddressTag, PublicAddress};
use crate::crypto::{
    curve::{map_to_point, mul_g},
    keccak::{Hash, Hasher},
    EdwardsPoint, Scalar,
};

// These labels are crossed over relative to the values they produce,
// deployed wallets depend on this so they must not be swapped back.
const SECRET_SCALAR: &[u8] = b"output_secret_point";
const SECRET_POINT: &[u8] = b"output_secret_scalar";
const ADDRESS_TYPE: &[u8] = b"address_type";

/// Per-output secrets derived from an output seed
pub struct OutputSecrets {
    pub scalar: Scalar,
    pub point: EdwardsPoint,
    pub address_type: u8,
}

impl OutputSecrets {
    /// Derive output secrets from an output seed
    /// (see [`Wallet::output_seed`][super::Wallet::output_seed])
    pub fn derive(output_seed: &Hash) -> Self {
        let scalar = Hasher::new()
            .chain(output_seed)
            .chain(SECRET_SCALAR)
            .finalize_scalar();

        let h = Hasher::new().chain(output_seed).chain(SECRET_POINT).finalize();
        let point = map_to_point(&h).mul_by_cofactor();

        let address_type = Hasher::new().chain(output_seed).chain(ADDRESS_TYPE).finalize()[0];

        Self {
            scalar,
            point,
            address_type,
        }
    }
}

impl Drop for OutputSecrets {
    fn drop(&mut self) {
        self.scalar.zeroize();
        self.point.zeroize();
    }
}

/// One-time output key and the encrypted output secret for the recipient
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct OutputKey {
    pub public: EdwardsPoint,
    pub encrypted_secret: EdwardsPoint,
}

impl OutputKey {
    /// Derive the output key for an address using the scheme selected by `tag`
    pub fn derive(
        tag: AddressTag,
        secrets: &OutputSecrets,
        tx_inputs_hash: &Hash,
        output_index: u32,
        address: &PublicAddress,
    ) -> Self {
        match tag {
            AddressTag::Linkable => Self::linkable(secrets, tx_inputs_hash, output_index, address),
            AddressTag::Unlinkable => {
                Self::unlinkable(secrets, tx_inputs_hash, output_index, address)
            }
        }
    }

    /// Linkable scheme,
    /// `P = S + G * reduce(keccak(G * r ‖ tx_inputs_hash ‖ varint(i)))`, `E = Sv * r`
    pub fn linkable(
        secrets: &OutputSecrets,
        tx_inputs_hash: &Hash,
        output_index: u32,
        address: &PublicAddress,
    ) -> Self {
        let encrypted_secret = address.sv * secrets.scalar;
        let derivation = mul_g(&secrets.scalar);

        let mut dh = Hasher::new()
            .chain(derivation.compress().as_bytes())
            .chain(tx_inputs_hash)
            .chain_varint(output_index as u64)
            .finalize_scalar();

        let public = address.s + mul_g(&dh);
        dh.zeroize();

        Self {
            public,
            encrypted_secret,
        }
    }

    /// Unlinkable scheme, with `k = reduce(keccak(Q ‖ tx_inputs_hash ‖ varint(i)))`,
    /// `P = S / k`, `E = Q + Sv / k`
    pub fn unlinkable(
        secrets: &OutputSecrets,
        tx_inputs_hash: &Hash,
        output_index: u32,
        address: &PublicAddress,
    ) -> Self {
        let mut k = Hasher::new()
            .chain(secrets.point.compress().as_bytes())
            .chain(tx_inputs_hash)
            .chain_varint(output_index as u64)
            .finalize_scalar();

        let mut inv = k.invert();

        let public = address.s * inv;
        let encrypted_secret = secrets.point + address.sv * inv;

        k.zeroize();
        inv.zeroize();

        Self {
            public,
            encrypted_secret,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::wallet::Wallet;

    #[test]
    fn unlinkable_recovery() {
        let mut w = Wallet::from_seed(&[7u8; 32]);
        let addr = w.address_public(2);

        let tx_inputs_hash = [9u8; 32];
        let seed = w.output_seed(&tx_inputs_hash, 0);
        let secrets = OutputSecrets::derive(&seed);

        let k = OutputKey::derive(AddressTag::Unlinkable, &secrets, &tx_inputs_hash, 0, &addr);

        // Recipient recovers Q = E - P * view
        let view = *w.keys().view_secret();
        assert_eq!(k.encrypted_secret - k.public * view, secrets.point);

        // and S by scaling P back up
        let q = Hasher::new()
            .chain(secrets.point.compress().as_bytes())
            .chain(tx_inputs_hash)
            .chain_varint(0)
            .finalize_scalar();
        assert_eq!(k.public * q, addr.s);
    }

    #[test]
    fn linkable_recovery() {
        let mut w = Wallet::from_seed(&[7u8; 32]);
        let addr = w.address_public(0);

        let tx_inputs_hash = [3u8; 32];
        let secrets = OutputSecrets::derive(&w.output_seed(&tx_inputs_hash, 1));

        let k = OutputKey::linkable(&secrets, &tx_inputs_hash, 1, &addr);
        assert_eq!(k.encrypted_secret, addr.sv * secrets.scalar);
        assert_ne!(k.public, addr.s);

        // Output index is bound into the key
        let k2 = OutputKey::linkable(&secrets, &tx_inputs_hash, 2, &addr);
        assert_ne!(k.public, k2.public);
    }

    #[test]
    fn output_secrets_labels() {
        let seed = [5u8; 32];
        let s = OutputSecrets::derive(&seed);

        let expected = Hasher::new()
            .chain(seed)
            .chain(b"output_secret_point")
            .finalize_scalar();
        assert_eq!(s.scalar, expected);

        let h = Hasher::new().chain(seed).chain(b"output_secret_scalar").finalize();
        assert_eq!(s.point, map_to_point(&h).mul_by_cofactor());
    }
}
